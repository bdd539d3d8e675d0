//! # Product Actor
//!
//! The catalog customers pick from when placing an order.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! Ids come from an atomic counter starting at 1. Pricing a cart is done by
//! [`ProductClient::quote`], which reads the catalog without reserving stock.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ProductClient;
use crate::framework::ResourceActor;
use crate::model::{Product, ProductId};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Creates a new Product actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ProductClient) {
    let product_id_counter = Arc::new(AtomicU32::new(1));
    let next_product_id = move || ProductId(product_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_product_id);
    let client = ProductClient::new(generic_client);

    (actor, client)
}
