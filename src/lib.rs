//! # Pedido Tracker
//!
//! The core of a parcel delivery tracking service: an order lifecycle store, an
//! append-only GPS tracking ledger, a role-based identity layer and a periodic
//! location poller, built on resource-oriented actors running on Tokio.
//!
//! ## Architecture Notes
//!
//! ### 1. One actor per store
//! Each store (users, products, orders, tracking points) is a [`ResourceActor`](framework::ResourceActor)
//! owning its records. Requests are processed one at a time, so every store operation
//! is atomic with respect to the others and no locks guard the records.
//!
//! ### 2. Type-safe errors
//! Every actor defines its own error enum ([`OrderError`](order_actor::OrderError),
//! [`TrackingError`](tracking_actor::TrackingError), ...). The domain clients recover it
//! from the framework error, so callers match on domain variants.
//!
//! ### 3. Context injection
//! Dependencies are passed to `run()`: the tracking actor receives an
//! [`OrderClient`](clients::OrderClient) and checks each point's order through it.
//!
//! ### 4. Observability
//! `tracing` everywhere; see [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`framework`]: the generic actor, its client and the test mock.
//! - [`model`]: plain records with their wire names (`id_pedido`, `estado`, ...).
//! - [`order_actor`], [`tracking_actor`], [`user_actor`], [`product_actor`]: entity rules.
//! - [`clients`]: the typed API everything else calls.
//! - [`identity`]: sessions, persisted tokens and auth-state listeners.
//! - [`polling`]: the location provider seam and the sampling loop.
//! - [`config`]: environment-driven settings.
//! - [`lifecycle`]: [`DeliverySystem`](lifecycle::DeliverySystem), demo seeding and tracing setup.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod framework;
pub mod identity;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod polling;
pub mod product_actor;
pub mod tracking_actor;
pub mod user_actor;
