//! Error types for location sampling and the polling loop.

use std::time::Duration;
use thiserror::Error;

/// Failures of the device location service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("Location service error: {0}")]
    Transport(String),

    #[error("Location request timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors returned to whoever starts the polling loop.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PollingError {
    /// The user refused location access; tracking cannot start.
    #[error("Location permission denied")]
    PermissionDenied,

    #[error(transparent)]
    Location(#[from] LocationError),
}
