//! # Tracking Client
//!
//! High-level API over the tracking ledger: appending points and the read models
//! built on top of a filtered list (history, latest point, recent points per carrier).
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{OrderId, PointQuery, PointRecord, TrackingPoint};
use crate::tracking_actor::TrackingError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

/// Client for interacting with the Tracking actor.
#[derive(Clone)]
pub struct TrackingClient {
    inner: ResourceClient<TrackingPoint>,
}

impl TrackingClient {
    pub fn new(inner: ResourceClient<TrackingPoint>) -> Self {
        Self { inner }
    }

    /// Appends a live sample; event and recorded time are both "now".
    #[instrument(skip(self, record), fields(order_id = %record.order_id))]
    pub async fn record_point(&self, mut record: PointRecord) -> Result<TrackingPoint, TrackingError> {
        record.recorded_at = None;
        let point = self.inner.create(record).await.map_err(Self::map_error)?;
        debug!(point_id = %point.id, "Point recorded");
        Ok(point)
    }

    /// Appends a historical sample with an explicit event time.
    #[instrument(skip(self, record), fields(order_id = %record.order_id))]
    pub async fn seed_point(
        &self,
        mut record: PointRecord,
        at: DateTime<Utc>,
    ) -> Result<TrackingPoint, TrackingError> {
        record.recorded_at = Some(at);
        self.inner.create(record).await.map_err(Self::map_error)
    }

    /// Points of one order in append order (not necessarily sorted by event time).
    pub async fn history(&self, order_id: OrderId) -> Result<Vec<TrackingPoint>, TrackingError> {
        self.fetch_all(PointQuery::Order(order_id)).await
    }

    /// The point with the greatest event time, `None` when the order has none.
    ///
    /// On equal event times the point appended last wins.
    pub async fn latest(&self, order_id: OrderId) -> Result<Option<TrackingPoint>, TrackingError> {
        let history = self.history(order_id).await?;
        Ok(history.into_iter().max_by_key(|point| point.recorded_at))
    }

    /// The `limit` most recently appended points reported by a carrier, oldest first.
    pub async fn by_carrier(
        &self,
        carrier_id: &str,
        limit: usize,
    ) -> Result<Vec<TrackingPoint>, TrackingError> {
        let mut points = self
            .fetch_all(PointQuery::Carrier(carrier_id.to_string()))
            .await?;
        let skip = points.len().saturating_sub(limit);
        Ok(points.split_off(skip))
    }
}

#[async_trait]
impl ActorClient<TrackingPoint> for TrackingClient {
    type Error = TrackingError;

    fn inner(&self) -> &ResourceClient<TrackingPoint> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<TrackingError>() {
            Ok(e) => e,
            Err(other) => TrackingError::ActorCommunicationError(other.to_string()),
        }
    }
}
