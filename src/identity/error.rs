//! Error types for the identity provider.

use crate::user_actor::UserError;
use thiserror::Error;

/// Errors surfaced by login, registration and session storage.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    /// No user matches the email and password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration with an email that already has an account.
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// Malformed registration data.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The credential store or the user store could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<UserError> for AuthError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::AlreadyExists(email) => AuthError::DuplicateUser(email),
            UserError::Validation(msg) => AuthError::Validation(msg),
            UserError::NotFound(_) => AuthError::InvalidCredentials,
            UserError::ActorCommunicationError(msg) => AuthError::Transport(msg),
        }
    }
}
