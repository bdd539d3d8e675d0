//! # Tracking Actor
//!
//! Append-only ledger of carrier-reported positions, one [`TrackingPoint`] per sample.
//!
//! - Depends on the order store (`Context = OrderClient`): a point for an unknown
//!   order is rejected in `on_create`.
//! - Ids come from an atomic counter starting at 1. The actor draws one per create
//!   request, in the order requests arrive, so ids grow strictly with append order
//!   even under concurrent writers.
//! - No updates, no actions.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::TrackingClient;
use crate::framework::ResourceActor;
use crate::model::{PointId, TrackingPoint};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Tracking actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<TrackingPoint>, TrackingClient) {
    let point_id_counter = Arc::new(AtomicU64::new(1));
    let next_point_id = move || PointId(point_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_point_id);
    let client = TrackingClient::new(generic_client);

    (actor, client)
}
