//! # Order Actor
//!
//! The order store: the only writer of [`Order`] records and the place where the
//! lifecycle is enforced.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`] type for type-safe error handling
//! - [`actions`] - [`OrderAction`] for carrier/operator operations
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Lifecycle
//!
//! ```text
//! pendiente → procesando → en_ruta → entregado
//!     └───────────┴───────────┴────→ cancelado
//! ```
//!
//! Every update and action is checked against this graph inside the actor, so an
//! illegal transition fails no matter which caller sends it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (actor, client) = order_actor::new(32);
//! tokio::spawn(actor.run(()));
//!
//! let order = client.create(draft).await?;
//! client.cancel(order.id).await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;
use crate::model::{Order, OrderId};

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, OrderId::new);
    let client = OrderClient::new(generic_client);

    (actor, client)
}
