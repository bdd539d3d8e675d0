//! Generic actor framework for resource management.
//!
//! This module provides the building blocks every store in the crate is made of:
//! a single-writer actor per resource type, answering typed requests over channels.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns the records of one entity type
//! - [`ResourceClient`] - Type-safe, cloneable handle for sending requests to an actor
//! - [`ActorClient`] - Trait giving domain clients shared read/delete operations
//! - [`FrameworkError`] - Errors raised by the plumbing itself
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients without spawning full actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
