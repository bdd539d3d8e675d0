//! ActorEntity trait implementation for the TrackingPoint domain type.

use crate::clients::OrderClient;
use crate::framework::ActorEntity;
use crate::model::{PointId, PointQuery, PointRecord, TrackingPoint};
use crate::order_actor::OrderError;
use crate::tracking_actor::TrackingError;
use async_trait::async_trait;
use chrono::Utc;
use std::convert::Infallible;

fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), TrackingError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(TrackingError::Validation(format!(
            "latitude out of range: {latitude}"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(TrackingError::Validation(format!(
            "longitude out of range: {longitude}"
        )));
    }
    Ok(())
}

/// Points are append-only: they have no updates and no actions.
#[async_trait]
impl ActorEntity for TrackingPoint {
    type Id = PointId;
    type Create = PointRecord;
    type Update = Infallible;
    type Action = Infallible;
    type ActionResult = ();
    type Query = PointQuery;
    type Context = OrderClient;
    type Error = TrackingError;

    fn from_create_params(id: PointId, params: PointRecord) -> Result<Self, Self::Error> {
        check_coordinates(params.latitude, params.longitude)?;
        if params.status_label.trim().is_empty() {
            return Err(TrackingError::Validation(
                "estado label is required".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            order_id: params.order_id,
            carrier_id: params.carrier_id,
            latitude: params.latitude,
            longitude: params.longitude,
            status_label: params.status_label,
            comment: params.comment,
            recorded_at: params.recorded_at.unwrap_or(now),
            created_at: now,
        })
    }

    fn matches(&self, query: &PointQuery) -> bool {
        match query {
            PointQuery::Order(order_id) => self.order_id == *order_id,
            PointQuery::Carrier(carrier_id) => self.carrier_id.as_ref() == Some(carrier_id),
        }
    }

    /// Rejects points for orders the order store does not know.
    async fn on_create(&mut self, orders: &OrderClient) -> Result<(), Self::Error> {
        match orders.get(self.order_id).await {
            Ok(_) => Ok(()),
            Err(OrderError::NotFound(id)) => Err(TrackingError::OrderNotFound(id)),
            Err(e) => Err(TrackingError::ActorCommunicationError(e.to_string())),
        }
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &OrderClient) -> Result<(), Self::Error> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: Infallible,
        _ctx: &OrderClient,
    ) -> Result<(), Self::Error> {
        match action {}
    }
}
