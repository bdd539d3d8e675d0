//! # Order Client
//!
//! Provides a high‑level API for interacting with the `Order` actor.
//! It wraps a `ResourceClient<Order>` and handles the orchestration the store itself
//! cannot do, like regenerating a tracking code after a collision.
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{
    generate_tracking_number, Order, OrderDraft, OrderId, OrderQuery, OrderStatus, OrderUpdate,
    Role, User,
};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// How many fresh tracking codes `create` tries before giving up.
const TRACKING_NUMBER_ATTEMPTS: usize = 5;

/// Client for interacting with the Order actor.
///
/// Lifecycle rules are enforced by the actor, so every method here is safe to call
/// from any role; illegal moves come back as [`OrderError::InvalidTransition`] or
/// [`OrderError::Finalized`].
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Creates a `pendiente` order with a fresh, unique tracking code.
    ///
    /// A draft that already carries a tracking code is tried once with that code.
    #[instrument(skip(self, draft), fields(profile_id = %draft.profile_id))]
    pub async fn create(&self, draft: OrderDraft) -> Result<Order, OrderError> {
        let attempts = if draft.tracking_number.is_some() {
            1
        } else {
            TRACKING_NUMBER_ATTEMPTS
        };

        let mut last_code = String::new();
        for attempt in 1..=attempts {
            let mut draft = draft.clone();
            let code = draft
                .tracking_number
                .take()
                .unwrap_or_else(generate_tracking_number);
            draft.tracking_number = Some(code.clone());
            debug!(attempt, tracking_number = %code, "Sending create");

            match self.inner.create(draft).await {
                Ok(order) => {
                    info!(order_id = %order.id, tracking_number = %order.tracking_number, "Order created");
                    return Ok(order);
                }
                Err(FrameworkError::Conflict(taken)) => {
                    warn!(attempt, tracking_number = %taken, "Tracking number collision");
                    last_code = taken;
                }
                Err(e) => return Err(Self::map_error(e)),
            }
        }
        Err(OrderError::DuplicateTrackingNumber(last_code))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Order, OrderError> {
        self.fetch(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn get_by_tracking_code(&self, code: &str) -> Result<Order, OrderError> {
        self.inner
            .lookup(code)
            .await
            .map_err(Self::map_error)?
            .ok_or_else(|| OrderError::NotFound(code.to_string()))
    }

    /// Every order, in creation order. The result is a copy.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        self.fetch_all(OrderQuery::All).await
    }

    pub async fn list_by_profile(&self, profile_id: &str) -> Result<Vec<Order>, OrderError> {
        self.fetch_all(OrderQuery::Profile(profile_id.to_string()))
            .await
    }

    pub async fn list_by_carrier(&self, carrier_id: &str) -> Result<Vec<Order>, OrderError> {
        self.fetch_all(OrderQuery::Carrier(carrier_id.to_string()))
            .await
    }

    pub async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        self.fetch_all(OrderQuery::Status(status)).await
    }

    /// The orders `user` is allowed to see.
    ///
    /// Customers see their own orders, carriers the orders assigned to them, admins
    /// and operators everything.
    #[instrument(skip(self, user), fields(user_id = %user.id, rol = %user.rol))]
    pub async fn list_for(&self, user: &User) -> Result<Vec<Order>, OrderError> {
        let own_id = user.id.to_string();
        match user.rol {
            Role::Cliente => self.list_by_profile(&own_id).await,
            Role::Transportista => self.list_by_carrier(&own_id).await,
            Role::Admin | Role::Operador => self.list_all().await,
        }
    }

    /// Merges `update` into the order. Nothing changes if any part is rejected.
    #[instrument(skip(self))]
    pub async fn update(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        self.inner
            .update(id, update)
            .await
            .map_err(Self::map_error)
    }

    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        self.update(id, OrderUpdate::status(OrderStatus::Cancelado))
            .await
    }

    /// Moves the order one step forward in its lifecycle.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, OrderAction::Advance)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn assign_carrier(&self, id: OrderId, carrier_id: &str) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, OrderAction::AssignCarrier(carrier_id.to_string()))
            .await
            .map_err(Self::map_error)
    }

    pub async fn change_destination(
        &self,
        id: OrderId,
        destination_address_id: &str,
    ) -> Result<Order, OrderError> {
        let update = OrderUpdate {
            destination_address_id: Some(destination_address_id.to_string()),
            ..OrderUpdate::default()
        };
        self.update(id, update).await
    }

    /// Removes the order. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: OrderId) -> Result<(), OrderError> {
        self.remove(id).await
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(e) => e,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(FrameworkError::Conflict(key)) => OrderError::DuplicateTrackingNumber(key),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_create, MockClient};
    use crate::framework::{ActorEntity, ResourceRequest};
    use crate::model::UserId;
    use chrono::Utc;

    fn draft() -> OrderDraft {
        OrderDraft {
            profile_id: "u1".to_string(),
            origin_address_id: "o".to_string(),
            destination_address_id: "d".to_string(),
            total_amount: 10.0,
            ..OrderDraft::default()
        }
    }

    #[tokio::test]
    async fn test_create_regenerates_tracking_number_on_collision() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(client);

        let task = tokio::spawn(async move { order_client.create(draft()).await });

        let (first, responder) = expect_create(&mut receiver).await.expect("first create");
        let first_code = first.tracking_number.clone().unwrap();
        responder
            .send(Err(FrameworkError::Conflict(first_code.clone())))
            .unwrap();

        let (second, responder) = expect_create(&mut receiver).await.expect("second create");
        let second_code = second.tracking_number.clone().unwrap();
        assert!(second_code.starts_with("TRK-"));
        let order = Order::from_create_params(OrderId::new(), second).unwrap();
        responder.send(Ok(order)).unwrap();

        let created = task.await.unwrap().unwrap();
        assert_eq!(created.tracking_number, second_code);
    }

    #[tokio::test]
    async fn test_create_gives_up_after_repeated_collisions() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(client);

        let task = tokio::spawn(async move { order_client.create(draft()).await });
        for _ in 0..TRACKING_NUMBER_ATTEMPTS {
            let (params, responder) = expect_create(&mut receiver).await.expect("create");
            let code = params.tracking_number.unwrap();
            responder.send(Err(FrameworkError::Conflict(code))).unwrap();
        }

        let result = task.await.unwrap();
        assert!(matches!(result, Err(OrderError::DuplicateTrackingNumber(_))));
    }

    #[tokio::test]
    async fn test_entity_errors_keep_their_type() {
        let mut mock = MockClient::<Order>::new();
        let id = OrderId::new();
        mock.expect_update(id)
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::InvalidTransition {
                    from: OrderStatus::Cancelado,
                    to: OrderStatus::EnRuta,
                },
            )));
        mock.expect_get(id).return_ok(None);

        let client = OrderClient::new(mock.client());
        let result = client
            .update(id, OrderUpdate::status(OrderStatus::EnRuta))
            .await;
        assert_eq!(
            result,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Cancelado,
                to: OrderStatus::EnRuta,
            })
        );
        assert_eq!(client.get(id).await, Err(OrderError::NotFound(id.to_string())));
        mock.verify();
    }

    #[tokio::test]
    async fn test_list_for_scopes_by_role() {
        let carrier = User {
            id: UserId::new(),
            email: "t@example.com".to_string(),
            nombre: "Maria".to_string(),
            apellido: "Gomez".to_string(),
            rol: Role::Transportista,
            password: Default::default(),
            created_at: Utc::now(),
        };
        let carrier_id = carrier.id.to_string();

        let (client, mut receiver) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(client);
        let task = tokio::spawn(async move { order_client.list_for(&carrier).await });

        match receiver.recv().await {
            Some(ResourceRequest::List { query, respond_to }) => {
                assert_eq!(query, OrderQuery::Carrier(carrier_id));
                respond_to.send(Ok(vec![])).unwrap();
            }
            other => panic!("expected List, got {other:?}"),
        }
        assert!(task.await.unwrap().unwrap().is_empty());
    }
}
