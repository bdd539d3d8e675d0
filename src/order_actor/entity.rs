//! ActorEntity trait implementation for the Order domain type.
//!
//! All lifecycle rules live here; the actor applies each update to a copy and only
//! commits it when [`Order::apply`] accepts it.

use crate::framework::ActorEntity;
use crate::model::{
    generate_tracking_number, Order, OrderDraft, OrderId, OrderQuery, OrderStatus, OrderUpdate,
};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use chrono::Utc;

fn require(field: &str, value: &str) -> Result<(), OrderError> {
    if value.trim().is_empty() {
        return Err(OrderError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_amount(amount: f64) -> Result<(), OrderError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(OrderError::Validation(format!(
            "monto_total must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}

impl Order {
    /// Merges `update` into the order, enforcing the lifecycle.
    ///
    /// Re-stamps `updated_at`; stamps `delivered_at` when the order reaches `entregado`.
    /// An update that only repeats the current status changes nothing.
    pub fn apply(&mut self, update: OrderUpdate) -> Result<(), OrderError> {
        let from = self.status;

        if let Some(to) = update.status {
            if !from.can_transition_to(to) {
                return Err(OrderError::InvalidTransition { from, to });
            }
        }

        let touches_fields = update.carrier_id.is_some()
            || update.destination_address_id.is_some()
            || update.estimated_delivery.is_some()
            || update.total_amount.is_some()
            || update.location_note.is_some();
        if from.is_terminal() && touches_fields {
            return Err(OrderError::Finalized(from));
        }

        if let Some(destination) = &update.destination_address_id {
            require("id_direccion_destino", destination)?;
            if !matches!(from, OrderStatus::Pendiente | OrderStatus::Procesando) {
                return Err(OrderError::Validation(format!(
                    "destination can only change before the order ships (order is {from})"
                )));
            }
        }
        if let Some(carrier) = &update.carrier_id {
            require("id_transportista", carrier)?;
        }
        if let Some(amount) = update.total_amount {
            require_amount(amount)?;
        }

        // Re-asserting the current state with nothing else to change.
        if !touches_fields && update.status.map_or(true, |to| to == from) {
            return Ok(());
        }

        let now = Utc::now();
        if let Some(to) = update.status {
            if to == OrderStatus::Entregado && from != OrderStatus::Entregado {
                self.delivered_at = Some(now);
            }
            self.status = to;
        }
        if let Some(carrier) = update.carrier_id {
            self.carrier_id = Some(carrier);
        }
        if let Some(destination) = update.destination_address_id {
            self.destination_address_id = destination;
        }
        if let Some(eta) = update.estimated_delivery {
            self.estimated_delivery = Some(eta);
        }
        if let Some(amount) = update.total_amount {
            self.total_amount = amount;
        }
        if let Some(note) = update.location_note {
            self.location_note = Some(note);
        }
        self.updated_at = now;
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderDraft;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Query = OrderQuery;
    type Context = ();
    type Error = OrderError;

    /// Validates the draft and builds a `pendiente` order.
    fn from_create_params(id: OrderId, params: OrderDraft) -> Result<Self, Self::Error> {
        require("id_perfil", &params.profile_id)?;
        require("id_direccion_origen", &params.origin_address_id)?;
        require("id_direccion_destino", &params.destination_address_id)?;
        require_amount(params.total_amount)?;
        if let Some(status) = params.status.filter(|s| *s != OrderStatus::Pendiente) {
            return Err(OrderError::Validation(format!(
                "new orders start as pendiente, got {status}"
            )));
        }
        if let Some(carrier) = &params.carrier_id {
            require("id_transportista", carrier)?;
        }

        let now = Utc::now();
        Ok(Self {
            id,
            tracking_number: params
                .tracking_number
                .unwrap_or_else(generate_tracking_number),
            profile_id: params.profile_id,
            carrier_id: params.carrier_id,
            origin_address_id: params.origin_address_id,
            destination_address_id: params.destination_address_id,
            status: OrderStatus::Pendiente,
            estimated_delivery: params.estimated_delivery,
            delivered_at: None,
            total_amount: params.total_amount,
            location_note: params.location_note,
            created_at: now,
            updated_at: now,
        })
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        match query {
            OrderQuery::All => true,
            OrderQuery::Profile(profile_id) => &self.profile_id == profile_id,
            OrderQuery::Carrier(carrier_id) => self.carrier_id.as_ref() == Some(carrier_id),
            OrderQuery::Status(status) => self.status == *status,
        }
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.tracking_number.clone())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.apply(update)
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &(),
    ) -> Result<Order, Self::Error> {
        match action {
            OrderAction::Advance => {
                let next = self.status.next().ok_or(OrderError::Finalized(self.status))?;
                self.apply(OrderUpdate::status(next))?;
            }
            OrderAction::AssignCarrier(carrier_id) => {
                self.apply(OrderUpdate {
                    carrier_id: Some(carrier_id),
                    ..OrderUpdate::default()
                })?;
            }
        }
        Ok(self.clone())
    }
}
