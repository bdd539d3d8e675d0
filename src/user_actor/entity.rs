//! ActorEntity trait implementation for the User domain type.
//!
//! Users are keyed by their normalized email, which makes the actor's unique index
//! the single place where duplicate registrations are rejected.

use crate::framework::ActorEntity;
use crate::model::{User, UserCreate, UserId, UserQuery, UserUpdate};
use crate::user_actor::UserError;
use async_trait::async_trait;
use chrono::Utc;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = Infallible;
    type ActionResult = ();
    type Query = UserQuery;
    type Context = ();
    type Error = UserError;

    /// Creates a new User from creation parameters.
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        let email = User::normalize_email(&params.email);
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::Validation(format!(
                "invalid email: {:?}",
                params.email
            )));
        }
        if params.password.is_empty() {
            return Err(UserError::Validation("password is required".to_string()));
        }

        Ok(Self {
            id,
            email,
            nombre: params.nombre,
            apellido: params.apellido,
            rol: params.rol,
            password: params.password,
            created_at: Utc::now(),
        })
    }

    fn matches(&self, query: &UserQuery) -> bool {
        query.rol.map_or(true, |rol| self.rol == rol)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    /// Handles updates to the User entity.
    ///
    /// # Fields Updated
    /// - `nombre`, `apellido`: display name
    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(nombre) = update.nombre {
            self.nombre = nombre;
        }
        if let Some(apellido) = update.apellido {
            self.apellido = apellido;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}
