//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide `tracing` subscriber. Every store
//! actor, client, the identity provider and the location poller log through it.
//!
//! ## Configuration
//!
//! Levels come from `RUST_LOG`; the format is compact and hides the module prefix
//! (`with_target(false)`), so spans show inline (e.g. `poller:record_point`).
//!
//! ```bash
//! # Lifecycle events: created orders, logins, tracking started/stopped
//! RUST_LOG=info cargo run
//!
//! # Every store request, plus each recorded sample
//! RUST_LOG=debug cargo run
//!
//! # Only the poller
//! RUST_LOG=pedido_tracker::polling=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Store actors**: startup, shutdown and final size; every create, update, delete and action
//! - **Identity**: logins, registrations, logouts and session restores (passwords are never recorded)
//! - **Polling**: start and stop, failed samples, retries and dropped points
//!
//! With `RUST_LOG=info` a short demo run reads like:
//!
//! ```text
//! INFO Created entity_type="Order" id=... size=1
//! INFO login: Logged in user_id=... rol=transportista
//! INFO Tracking started order_id=... interval=5s
//! INFO Tracking stopped order_id=...
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
