//! # ActorClient Trait
//!
//! Common interface for resource-specific clients: default `fetch`, `fetch_all` and
//! `remove` built on top of a generic `ResourceClient`, with errors translated into
//! the resource's own error type.
use crate::framework::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read/delete operations.
///
/// Implementors only provide access to the inner client and the error mapping.
/// The mapping should recover the entity error with
/// [`FrameworkError::downcast_entity`] so callers can match on typed variants.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by id, `None` when absent.
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Snapshot of every entity matching `query`, in creation order.
    #[tracing::instrument(skip(self))]
    async fn fetch_all(&self, query: T::Query) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(query).await.map_err(Self::map_error)
    }

    /// Delete an entity by id. Deleting something absent is not an error.
    #[tracing::instrument(skip(self))]
    async fn remove(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner()
            .delete(id)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }
}
