//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).
//!
//! Each client implements [`ActorClient`](crate::framework::ActorClient) for the shared
//! read/delete operations and adds the domain methods of its resource.

pub mod order_client;
pub mod product_client;
pub mod tracking_client;
pub mod user_client;

pub use order_client::*;
pub use product_client::*;
pub use tracking_client::*;
pub use user_client::*;
