//! # Mock Framework
//!
//! Utilities for testing code that talks to a resource actor without spawning one.
//!
//! | | MockClient | Real Actor |
//! |---|---|---|
//! | **State** | None, answers come from expectations | Real store |
//! | **Error injection** | `return_err` | Requires specific state |
//! | **Use case** | Logic *around* a client (hooks with dependencies) | The actor itself, full system |
//!
//! Two styles are available:
//!
//! - [`MockClient`]: queue expectations with `expect_*` and answer with
//!   `return_ok`/`return_err`, then call [`MockClient::verify`].
//! - [`create_mock_client`]: get the raw receiver and answer requests by hand with the
//!   `expect_*` free functions, for tests that need to inspect payloads.
//!
//! ```ignore
//! let mut orders = MockClient::<Order>::new();
//! orders.expect_get(order_id).return_ok(Some(order));
//!
//! let tracking = tracking_actor::new(8);
//! tokio::spawn(tracking.0.run(OrderClient::new(orders.client())));
//! // ... exercise the tracking client ...
//! orders.verify();
//! ```

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the answer to give it.
enum Expectation<T: ActorEntity> {
    Create {
        response: Result<T, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Lookup {
        key: String,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<bool, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Create { .. } => "Create".to_string(),
            Expectation::Get { id, .. } => format!("Get({id})"),
            Expectation::Lookup { key, .. } => format!("Lookup({key})"),
            Expectation::List { .. } => "List".to_string(),
            Expectation::Update { id, .. } => format!("Update({id})"),
            Expectation::Delete { id, .. } => format!("Delete({id})"),
            Expectation::Action { id, .. } => format!("Action({id})"),
        }
    }
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A fake actor answering requests from a queue of expectations, in order.
///
/// A request that does not match the next expectation (wrong kind or wrong id) is
/// recorded as a failure and its response channel is dropped, so the caller sees
/// [`FrameworkError::ActorDropped`]. [`MockClient::verify`] then panics with the
/// recorded failures.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    failures: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let failures = Arc::new(Mutex::new(Vec::new()));

        let queue = expectations.clone();
        let failed = failures.clone();
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().pop_front();
                if let Err(message) = answer(request, expectation) {
                    failed.lock().push(message);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            failures,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn builder<R>(
        &self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_lookup(&mut self, key: impl Into<String>) -> ExpectationBuilder<T, Option<T>> {
        let key = key.into();
        self.builder(move |response| Expectation::Lookup { key, response })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, bool> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |response| Expectation::Action { id, response })
    }

    /// Panics if a request went unanswered or an expectation was never used.
    pub fn verify(&self) {
        let failures = self.failures.lock();
        if !failures.is_empty() {
            panic!("Unexpected requests: {}", failures.join("; "));
        }
        let remaining = self.expectations.lock();
        if !remaining.is_empty() {
            let pending: Vec<String> = remaining.iter().map(Expectation::describe).collect();
            panic!(
                "Not all expectations were met. {} remaining: {}",
                pending.len(),
                pending.join(", ")
            );
        }
    }
}

fn check_id<Id: PartialEq + std::fmt::Display>(kind: &str, got: &Id, want: &Id) -> Result<(), String> {
    if got == want {
        Ok(())
    } else {
        Err(format!("{kind}: expected id {want}, got {got}"))
    }
}

fn answer<T: ActorEntity>(
    request: ResourceRequest<T>,
    expectation: Option<Expectation<T>>,
) -> Result<(), String> {
    match (request, expectation) {
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response })) => {
            check_id("Get", &id, &want)?;
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Lookup { key, respond_to },
            Some(Expectation::Lookup { key: want, response }),
        ) => {
            check_id("Lookup", &key, &want)?;
            let _ = respond_to.send(response);
        }
        (ResourceRequest::List { respond_to, .. }, Some(Expectation::List { response })) => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Update { id, respond_to, .. },
            Some(Expectation::Update { id: want, response }),
        ) => {
            check_id("Update", &id, &want)?;
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Delete { id, respond_to },
            Some(Expectation::Delete { id: want, response }),
        ) => {
            check_id("Delete", &id, &want)?;
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Action { id, respond_to, .. },
            Some(Expectation::Action { id: want, response }),
        ) => {
            check_id("Action", &id, &want)?;
            let _ = respond_to.send(response);
        }
        (request, Some(expectation)) => {
            return Err(format!(
                "expected {}, got {:?}",
                expectation.describe(),
                request
            ));
        }
        (request, None) => return Err(format!("no expectation left for {request:?}")),
    }
    Ok(())
}

/// Completes an `expect_*` call with the answer the mock should give.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Expectations<T>,
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        self.expectations.lock().push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.wrap)(Err(error));
        self.expectations.lock().push_back(expectation);
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver owned by the test.
///
/// The test plays the actor: it pulls each request with one of the `expect_*`
/// helpers, asserts on the payload, and answers through the returned sender.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Update request.
pub async fn expect_update<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    #[derive(Debug)]
    struct NoteCreate {
        text: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("note error")]
    struct NoteError;

    #[async_trait]
    impl ActorEntity for Note {
        type Id = u32;
        type Create = NoteCreate;
        type Update = String;
        type Action = ();
        type ActionResult = usize;
        type Query = ();
        type Context = ();
        type Error = NoteError;

        fn from_create_params(id: u32, params: NoteCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                text: params.text,
            })
        }

        fn matches(&self, _query: &()) -> bool {
            true
        }

        async fn on_update(&mut self, text: String, _ctx: &()) -> Result<(), Self::Error> {
            self.text = text;
            Ok(())
        }

        async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<usize, Self::Error> {
            Ok(self.text.len())
        }
    }

    fn note(id: u32, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_channel_level_mock() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(NoteCreate {
                    text: "hola".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.text, "hola");
        responder.send(Ok(note(1, "hola"))).unwrap();

        let created = create_task.await.unwrap().unwrap();
        assert_eq!(created, note(1, "hola"));
    }

    #[tokio::test]
    async fn test_expectations_answer_in_order() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_create().return_ok(note(1, "a"));
        mock.expect_get(1).return_ok(Some(note(1, "a")));
        mock.expect_list().return_ok(vec![note(1, "a")]);
        mock.expect_delete(1).return_ok(true);

        let client = mock.client();
        let created = client
            .create(NoteCreate {
                text: "a".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert!(client.get(1).await.unwrap().is_some());
        assert_eq!(client.list(()).await.unwrap().len(), 1);
        assert!(client.delete(1).await.unwrap());

        mock.verify();
    }

    #[tokio::test]
    async fn test_error_injection() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_action(7).return_err(FrameworkError::ActorClosed);

        let result = mock.client().perform_action(7, ()).await;
        assert!(matches!(result, Err(FrameworkError::ActorClosed)));
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected requests")]
    async fn test_wrong_id_is_reported() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_unused_expectation_is_reported() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_update(1).return_ok(note(1, "b"));
        mock.verify();
    }
}
