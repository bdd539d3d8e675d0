//! # Identity Provider
//!
//! Holds at most one authenticated user and broadcasts every change.
//!
//! - Credentials are checked against the [`User`](crate::model::User) actor (mock
//!   check, plain-text password).
//! - The session token is persisted through a [`CredentialStore`] under
//!   [`SESSION_TOKEN_KEY`], so [`IdentityProvider::load_session`] can restore it after
//!   a restart.
//! - `login`, `register`, `logout` and `load_session` are queued: concurrent calls
//!   run one after the other, never interleaved.
//! - Observers either register a callback ([`IdentityProvider::subscribe`]) or hold a
//!   `watch` receiver ([`IdentityProvider::watch`]). Callbacks run after the state is
//!   fully updated and before the mutating call returns.

pub mod credential_store;
pub mod error;
pub mod listeners;
pub mod provider;

pub use credential_store::*;
pub use error::*;
pub use listeners::Subscription;
pub use provider::*;
