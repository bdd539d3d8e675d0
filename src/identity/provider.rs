//! The identity provider: at most one active user, a persisted session token, and
//! change notification.

use crate::clients::UserClient;
use crate::identity::listeners::{ListenerRegistry, Subscription};
use crate::identity::{AuthError, CredentialStore};
use crate::model::{Password, Role, User, UserCreate};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

/// Key under which the session token is persisted.
pub const SESSION_TOKEN_KEY: &str = "auth_token";

/// Snapshot of the provider's state as seen by observers.
///
/// `is_loading` is `true` until the first [`IdentityProvider::load_session`] finishes,
/// which separates "not yet determined" from "determined absent".
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl AuthState {
    fn initial() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

struct Inner {
    users: UserClient,
    credentials: Arc<dyn CredentialStore>,
    state: watch::Sender<AuthState>,
    listeners: Arc<ListenerRegistry>,
    /// Held for the whole of every mutating operation, so they run one at a time.
    operations: Mutex<()>,
}

/// Cloneable handle to the identity provider; clones share one state.
#[derive(Clone)]
pub struct IdentityProvider {
    inner: Arc<Inner>,
}

impl IdentityProvider {
    pub fn new(users: UserClient, credentials: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(AuthState::initial());
        Self {
            inner: Arc::new(Inner {
                users,
                credentials,
                state,
                listeners: Arc::new(ListenerRegistry::default()),
                operations: Mutex::new(()),
            }),
        }
    }

    /// Replaces the state, then notifies every observer with the new snapshot.
    fn publish(&self, state: AuthState) {
        self.inner.state.send_replace(state.clone());
        self.inner.listeners.notify(&state);
    }

    /// Checks the credentials and starts a session.
    ///
    /// The current state is left untouched on any failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let _queue = self.inner.operations.lock().await;

        let user = match self.inner.users.find_by_email(email).await? {
            Some(user) if user.password.verify(password) => user,
            _ => {
                warn!("Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.inner
            .credentials
            .set(SESSION_TOKEN_KEY, &user.email)
            .await?;
        self.publish(AuthState {
            user: Some(user.clone()),
            is_loading: false,
        });
        info!(user_id = %user.id, rol = %user.rol, "Logged in");
        Ok(user)
    }

    /// Creates an account and starts a session for it.
    ///
    /// If the account is created but the token cannot be stored, the error is
    /// returned and no session starts; the account remains and can log in later.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nombre: &str,
        apellido: &str,
        rol: Role,
    ) -> Result<User, AuthError> {
        if !email.contains('@') {
            return Err(AuthError::Validation(format!("invalid email: {email:?}")));
        }
        if password.is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }

        let _queue = self.inner.operations.lock().await;

        let user = self
            .inner
            .users
            .create(UserCreate {
                email: email.to_string(),
                password: Password::new(password),
                nombre: nombre.to_string(),
                apellido: apellido.to_string(),
                rol,
            })
            .await?;

        self.inner
            .credentials
            .set(SESSION_TOKEN_KEY, &user.email)
            .await?;
        self.publish(AuthState {
            user: Some(user.clone()),
            is_loading: false,
        });
        info!(user_id = %user.id, rol = %user.rol, "Registered");
        Ok(user)
    }

    /// Ends the session. Never fails: a token that cannot be removed is only logged.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let _queue = self.inner.operations.lock().await;

        if let Err(e) = self.inner.credentials.delete(SESSION_TOKEN_KEY).await {
            warn!(error = %e, "Could not remove session token");
        }
        self.publish(AuthState {
            user: None,
            is_loading: false,
        });
        info!("Logged out");
    }

    /// Restores the session persisted by an earlier login, if any.
    ///
    /// Observers see `is_loading = true` first, then the outcome with
    /// `is_loading = false`. Storage failures count as "no session".
    #[instrument(skip(self))]
    pub async fn load_session(&self) -> Option<User> {
        let _queue = self.inner.operations.lock().await;

        self.publish(AuthState {
            user: self.current_user(),
            is_loading: true,
        });

        let token = match self.inner.credentials.get(SESSION_TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read session token");
                None
            }
        };

        let user = match token {
            None => None,
            Some(email) => match self.inner.users.find_by_email(&email).await {
                Ok(Some(user)) => Some(user),
                Ok(None) => {
                    debug!("Session token has no matching user");
                    if let Err(e) = self.inner.credentials.delete(SESSION_TOKEN_KEY).await {
                        warn!(error = %e, "Could not remove stale session token");
                    }
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Could not rehydrate session");
                    None
                }
            },
        };

        self.publish(AuthState {
            user: user.clone(),
            is_loading: false,
        });
        match &user {
            Some(user) => info!(user_id = %user.id, "Session restored"),
            None => info!("No session to restore"),
        }
        user
    }

    // --- Reads ---

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    fn has_role(&self, rol: Role) -> bool {
        self.inner
            .state
            .borrow()
            .user
            .as_ref()
            .is_some_and(|user| user.rol == rol)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_cliente(&self) -> bool {
        self.has_role(Role::Cliente)
    }

    pub fn is_transportista(&self) -> bool {
        self.has_role(Role::Transportista)
    }

    pub fn is_operador(&self) -> bool {
        self.has_role(Role::Operador)
    }

    /// The profile id orders are filed under, when a customer is signed in.
    pub fn profile_id(&self) -> Option<String> {
        self.id_for_role(Role::Cliente)
    }

    /// The carrier id tracking points are attributed to, when a carrier is signed in.
    pub fn carrier_id(&self) -> Option<String> {
        self.id_for_role(Role::Transportista)
    }

    fn id_for_role(&self, rol: Role) -> Option<String> {
        self.inner
            .state
            .borrow()
            .user
            .as_ref()
            .filter(|user| user.rol == rol)
            .map(|user| user.id.to_string())
    }

    // --- Observers ---

    /// Registers a callback invoked after every state change.
    pub fn subscribe(&self, callback: impl Fn(&AuthState) + Send + Sync + 'static) -> Subscription {
        self.inner.listeners.subscribe(callback)
    }

    /// Async alternative to [`IdentityProvider::subscribe`].
    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }
}
