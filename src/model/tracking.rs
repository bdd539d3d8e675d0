//! GPS samples attached to an order.
use crate::model::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Process-local, strictly increasing point identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub u64);

impl Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "point_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingPoint {
    #[serde(rename = "id_tracking")]
    pub id: PointId,
    #[serde(rename = "id_pedido")]
    pub order_id: OrderId,
    #[serde(rename = "id_transportista", skip_serializing_if = "Option::is_none", default)]
    pub carrier_id: Option<String>,
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
    #[serde(rename = "estado")]
    pub status_label: String,
    #[serde(rename = "comentario", skip_serializing_if = "Option::is_none", default)]
    pub comment: Option<String>,
    /// Event time.
    #[serde(rename = "fecha_hora")]
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a point.
///
/// `recorded_at` is `None` for live samples (stamped with the current time) and set
/// only when seeding historical points.
#[derive(Debug, Clone)]
pub struct PointRecord {
    pub order_id: OrderId,
    pub carrier_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status_label: String,
    pub comment: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl PointRecord {
    pub fn new(order_id: OrderId, latitude: f64, longitude: f64, status_label: impl Into<String>) -> Self {
        Self {
            order_id,
            carrier_id: None,
            latitude,
            longitude,
            status_label: status_label.into(),
            comment: None,
            recorded_at: None,
        }
    }

    pub fn with_carrier(mut self, carrier_id: impl Into<String>) -> Self {
        self.carrier_id = Some(carrier_id.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Filter for listing points.
#[derive(Debug, Clone, PartialEq)]
pub enum PointQuery {
    Order(OrderId),
    Carrier(String),
}
