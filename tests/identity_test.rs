use async_trait::async_trait;
use pedido_tracker::clients::UserClient;
use pedido_tracker::identity::{
    AuthError, AuthState, CredentialStore, FileCredentialStore, IdentityProvider,
    MemoryCredentialStore, SESSION_TOKEN_KEY,
};
use pedido_tracker::model::{Password, Role, UserCreate};
use pedido_tracker::user_actor;
use parking_lot::Mutex;
use std::sync::Arc;

fn users() -> UserClient {
    let (actor, users) = user_actor::new(8);
    tokio::spawn(actor.run(()));
    users
}

fn carrier() -> UserCreate {
    UserCreate {
        email: "transportista@example.com".to_string(),
        password: Password::new("password123"),
        nombre: "Maria".to_string(),
        apellido: "Gomez".to_string(),
        rol: Role::Transportista,
    }
}

/// Store whose writes succeed but whose deletes always fail.
#[derive(Default)]
struct StickyStore {
    inner: MemoryCredentialStore,
}

#[async_trait]
impl CredentialStore for StickyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, _key: &str) -> Result<(), AuthError> {
        Err(AuthError::Transport("keychain locked".to_string()))
    }
}

/// Store that cannot persist anything.
struct ReadOnlyStore;

#[async_trait]
impl CredentialStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, AuthError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), AuthError> {
        Err(AuthError::Transport("read-only".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_load_session_notifies_loading_then_result() {
    let users = users();
    users.create(carrier()).await.unwrap();
    let store = Arc::new(MemoryCredentialStore::new());
    store
        .set(SESSION_TOKEN_KEY, "transportista@example.com")
        .await
        .unwrap();

    let identity = IdentityProvider::new(users, store);
    let seen: Arc<Mutex<Vec<AuthState>>> = Arc::default();
    let sink = seen.clone();
    let _subscription = identity.subscribe(move |state| sink.lock().push(state.clone()));

    let user = identity.load_session().await.expect("session restored");
    assert_eq!(user.rol, Role::Transportista);

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].is_loading);
    assert!(seen[0].user.is_none());
    assert!(!seen[1].is_loading);
    assert_eq!(seen[1].user.as_ref().map(|u| u.id), Some(user.id));
    assert!(identity.is_transportista());
    assert_eq!(identity.carrier_id(), Some(user.id.to_string()));
}

#[tokio::test]
async fn test_session_survives_a_new_provider() {
    let dir = tempfile::tempdir().unwrap();
    let users = users();

    let first = IdentityProvider::new(
        users.clone(),
        Arc::new(FileCredentialStore::new(dir.path())),
    );
    first.load_session().await;
    assert!(!first.is_authenticated());
    let user = first
        .register("cliente@example.com", "password123", "Juan", "Perez", Role::Cliente)
        .await
        .unwrap();

    // Same user store, fresh provider reading the same directory
    let second = IdentityProvider::new(users, Arc::new(FileCredentialStore::new(dir.path())));
    assert!(second.is_loading());
    let restored = second.load_session().await.expect("session restored");
    assert_eq!(restored.id, user.id);
    assert!(!second.is_loading());
    assert!(second.is_cliente());
    assert_eq!(second.profile_id(), Some(user.id.to_string()));

    second.logout().await;
    let store = FileCredentialStore::new(dir.path());
    assert_eq!(store.get(SESSION_TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_stale_token_is_discarded() {
    let store = Arc::new(MemoryCredentialStore::new());
    store
        .set(SESSION_TOKEN_KEY, "ghost@example.com")
        .await
        .unwrap();

    let identity = IdentityProvider::new(users(), store.clone());
    assert!(identity.load_session().await.is_none());
    assert!(!identity.is_loading());
    assert_eq!(store.get(SESSION_TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_logout_succeeds_when_token_cannot_be_removed() {
    let users = users();
    users.create(carrier()).await.unwrap();
    let identity = IdentityProvider::new(users, Arc::new(StickyStore::default()));

    identity
        .login("Transportista@Example.com", "password123")
        .await
        .unwrap();
    assert!(identity.is_authenticated());

    identity.logout().await;
    assert!(!identity.is_authenticated());
    assert_eq!(identity.carrier_id(), None);
}

#[tokio::test]
async fn test_login_fails_without_persisting_when_store_is_read_only() {
    let users = users();
    users.create(carrier()).await.unwrap();
    let identity = IdentityProvider::new(users, Arc::new(ReadOnlyStore));
    identity.load_session().await;

    let result = identity
        .login("transportista@example.com", "password123")
        .await;
    assert!(matches!(result, Err(AuthError::Transport(_))));
    assert!(!identity.is_authenticated());
}

#[tokio::test]
async fn test_unsubscribed_listener_stops_receiving() {
    let identity = IdentityProvider::new(users(), Arc::new(MemoryCredentialStore::new()));
    let calls = Arc::new(Mutex::new(0usize));

    let counter = calls.clone();
    let subscription = identity.subscribe(move |_| *counter.lock() += 1);
    identity.load_session().await;
    assert_eq!(*calls.lock(), 2);

    assert!(subscription.unsubscribe());
    assert!(!subscription.unsubscribe());
    identity.logout().await;
    assert_eq!(*calls.lock(), 2);
}

#[tokio::test]
async fn test_watch_sees_latest_state() {
    let users = users();
    users.create(carrier()).await.unwrap();
    let identity = IdentityProvider::new(users, Arc::new(MemoryCredentialStore::new()));
    let mut watcher = identity.watch();
    assert!(watcher.borrow().is_loading);

    identity
        .login("transportista@example.com", "password123")
        .await
        .unwrap();
    watcher.changed().await.unwrap();
    assert!(watcher.borrow_and_update().user.is_some());
}
