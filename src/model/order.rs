//! A delivery request and its lifecycle.
//!
//! # Actor Framework
//! This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
//!
//! See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
//! - Creation parameters ([`OrderDraft`])
//! - Update parameters ([`OrderUpdate`])
//! - Custom actions ([`OrderAction`](crate::order_actor::OrderAction))
//!
//! Field names on the wire follow the delivery backend's schema.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of an order.
///
/// `Pendiente → Procesando → EnRuta → Entregado`, with `Cancelado` reachable from
/// every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pendiente,
    Procesando,
    EnRuta,
    Entregado,
    Cancelado,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Entregado | OrderStatus::Cancelado)
    }

    /// The state a carrier advances to from here, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pendiente => Some(OrderStatus::Procesando),
            OrderStatus::Procesando => Some(OrderStatus::EnRuta),
            OrderStatus::EnRuta => Some(OrderStatus::Entregado),
            OrderStatus::Entregado | OrderStatus::Cancelado => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition.
    ///
    /// Staying in the same state is allowed and changes nothing.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        if self == to {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        to == OrderStatus::Cancelado || self.next() == Some(to)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::Procesando => "procesando",
            OrderStatus::EnRuta => "en_ruta",
            OrderStatus::Entregado => "entregado",
            OrderStatus::Cancelado => "cancelado",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const TRACKING_PREFIX: &str = "TRK-";
const TRACKING_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TRACKING_LEN: usize = 10;

/// Generates a fresh `TRK-XXXXXXXXXX` code from a random UUID.
///
/// Uniqueness is not guaranteed here; the order store rejects duplicates.
pub fn generate_tracking_number() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut code = String::with_capacity(TRACKING_PREFIX.len() + TRACKING_LEN);
    code.push_str(TRACKING_PREFIX);
    for _ in 0..TRACKING_LEN {
        code.push(TRACKING_ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }
    code
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "id_pedido")]
    pub id: OrderId,
    #[serde(rename = "numero_tracking")]
    pub tracking_number: String,
    #[serde(rename = "id_perfil")]
    pub profile_id: String,
    #[serde(rename = "id_transportista", skip_serializing_if = "Option::is_none", default)]
    pub carrier_id: Option<String>,
    #[serde(rename = "id_direccion_origen")]
    pub origin_address_id: String,
    #[serde(rename = "id_direccion_destino")]
    pub destination_address_id: String,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(
        rename = "fecha_entrega_estimada",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(rename = "fecha_entrega_real", skip_serializing_if = "Option::is_none", default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(rename = "monto_total")]
    pub total_amount: f64,
    #[serde(rename = "Ubicacion", skip_serializing_if = "Option::is_none", default)]
    pub location_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new order.
///
/// `tracking_number` is filled in by [`OrderClient`](crate::clients::OrderClient);
/// leave it `None` when building a draft by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(rename = "id_perfil")]
    pub profile_id: String,
    #[serde(rename = "id_direccion_origen")]
    pub origin_address_id: String,
    #[serde(rename = "id_direccion_destino")]
    pub destination_address_id: String,
    #[serde(rename = "estado", default)]
    pub status: Option<OrderStatus>,
    #[serde(rename = "fecha_entrega_estimada", default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(rename = "monto_total")]
    pub total_amount: f64,
    #[serde(rename = "id_transportista", default)]
    pub carrier_id: Option<String>,
    #[serde(rename = "Ubicacion", default)]
    pub location_note: Option<String>,
    #[serde(skip)]
    pub tracking_number: Option<String>,
}

/// Partial update; only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub carrier_id: Option<String>,
    pub destination_address_id: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub total_amount: Option<f64>,
    pub location_note: Option<String>,
}

impl OrderUpdate {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Filter for listing orders. `All` returns every order.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderQuery {
    All,
    Profile(String),
    Carrier(String),
    Status(OrderStatus),
}
