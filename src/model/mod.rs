//! Pure data structures (DTOs) managed by the resource actors.
//!
//! The [`ActorEntity`](crate::framework::ActorEntity) implementations live next to
//! each actor (`order_actor::entity`, `tracking_actor::entity`, ...).

pub mod order;
pub mod product;
pub mod tracking;
pub mod user;

pub use order::*;
pub use product::*;
pub use tracking::*;
pub use user::*;
