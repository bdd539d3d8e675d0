//! # User Client
//!
//! Provides a high‑level API for interacting with the `User` actor.
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Role, User, UserCreate, UserId, UserQuery, UserUpdate};
use crate::user_actor::UserError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    /// Registers a user. Fails with `AlreadyExists` when the email is taken.
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: UserId) -> Result<User, UserError> {
        self.fetch(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    /// Case-insensitive lookup by email.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.inner
            .lookup(User::normalize_email(email))
            .await
            .map_err(Self::map_error)
    }

    pub async fn list_by_role(&self, rol: Role) -> Result<Vec<User>, UserError> {
        self.fetch_all(UserQuery { rol: Some(rol) }).await
    }

    pub async fn update_profile(&self, id: UserId, update: UserUpdate) -> Result<User, UserError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<UserError>() {
            Ok(e) => e,
            Err(FrameworkError::NotFound(id)) => UserError::NotFound(id),
            Err(FrameworkError::Conflict(email)) => UserError::AlreadyExists(email),
            Err(other) => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;

    #[tokio::test]
    async fn test_conflict_maps_to_already_exists() {
        let mut mock = MockClient::<User>::new();
        mock.expect_create()
            .return_err(FrameworkError::Conflict("ana@example.com".to_string()));
        mock.expect_lookup("ana@example.com").return_ok(None);

        let client = UserClient::new(mock.client());
        let params = UserCreate {
            email: "Ana@Example.com".to_string(),
            password: crate::model::Password::new("pw"),
            nombre: "Ana".to_string(),
            apellido: "Rios".to_string(),
            rol: Role::Cliente,
        };
        assert_eq!(
            client.create(params).await,
            Err(UserError::AlreadyExists("ana@example.com".to_string()))
        );
        assert_eq!(client.find_by_email("  ANA@example.com ").await, Ok(None));
        mock.verify();
    }
}
