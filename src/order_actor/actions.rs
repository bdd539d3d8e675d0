//! Custom actions for the Order actor.
//!
//! Carrier- and operator-driven operations that go beyond a field merge. They are
//! handled by [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action)
//! and follow the same lifecycle rules as updates.

/// Custom actions for Order entities.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// Moves the order to the next lifecycle state.
    ///
    /// # Errors
    /// Fails with `Finalized` once the order is delivered or cancelled.
    Advance,
    /// Assigns (or reassigns) the carrier responsible for the order.
    AssignCarrier(String),
}
