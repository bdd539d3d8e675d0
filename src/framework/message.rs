//! # Generic Messages
//!
//! The request type exchanged between a `ResourceClient` and its `ResourceActor`.

use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # The CRUD Pattern
/// The variants map to Create, Read (`Get`, `Lookup`, `List`), Update and Delete,
/// plus `Action` for resource-specific logic that doesn't fit the CRUD model.
///
/// - **Create**: builds a resource from [`ActorEntity::Create`].
/// - **Get**: fetches one resource by id.
/// - **Lookup**: fetches one resource by its [`ActorEntity::unique_key`].
/// - **List**: snapshot of every resource matching an [`ActorEntity::Query`], in insertion order.
/// - **Update**: applies an [`ActorEntity::Update`].
/// - **Delete**: removes a resource; answers `false` when nothing was there.
/// - **Action**: executes an [`ActorEntity::Action`].
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Lookup {
        key: String,
        respond_to: Response<Option<T>>,
    },
    List {
        query: T::Query,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<bool>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
