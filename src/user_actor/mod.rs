//! # User Actor
//!
//! Credential records behind the identity provider.
//!
//! - No dependencies (`Context = ()`), no custom actions.
//! - UUID v4 ids.
//! - Emails are normalized to lowercase and indexed, so a second registration of the
//!   same address fails with [`UserError::AlreadyExists`] even when both arrive at once.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::UserClient;
use crate::framework::ResourceActor;
use crate::model::{User, UserId};

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, UserClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, UserId::new);
    let client = UserClient::new(generic_client);

    (actor, client)
}
