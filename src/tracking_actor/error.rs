//! Error types for the Tracking actor.

use thiserror::Error;

/// Errors that can occur while recording or reading tracking points.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TrackingError {
    /// The point data provided is invalid (coordinates out of range, empty label).
    #[error("Tracking validation error: {0}")]
    Validation(String),

    /// The point refers to an order the order store does not know.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl TrackingError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TrackingError::ActorCommunicationError(_))
    }
}
