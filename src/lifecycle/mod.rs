//! Wiring and lifetime of the whole system.
//!
//! - [`DeliverySystem`] starts the store actors, injects their dependencies and
//!   shuts them down in order.
//! - [`seed_demo_data`] fills a fresh system with demo accounts, products and orders.
//! - [`setup_tracing`] installs the log subscriber.

mod delivery_system;
pub mod seed;
pub mod tracing;

pub use delivery_system::DeliverySystem;
pub use seed::{seed_demo_data, DemoData, SeedError};
pub use self::tracing::setup_tracing;
