//! # Delivery System
//!
//! Starts the store actors, wires their dependencies and shuts them down.

use crate::clients::{OrderClient, ProductClient, TrackingClient, UserClient};
use crate::config::AppConfig;
use crate::identity::{CredentialStore, IdentityProvider};
use crate::polling::{LocationPoller, LocationProvider, PollerSettings};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info};

/// The runtime orchestrator of the delivery tracking core.
///
/// `DeliverySystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping every store actor
/// - **Dependency Wiring**: the tracking actor gets an `OrderClient` as its context,
///   the identity provider a `UserClient`
/// - **Handing out clients**: every field is a cheap, cloneable handle
///
/// # Example
///
/// ```ignore
/// let system = DeliverySystem::new(&config, Arc::new(MemoryCredentialStore::new()));
///
/// let order = system.orders.create(draft).await?;
/// system.tracking.record_point(PointRecord::new(order.id, -19.04, -65.25, "en_ruta")).await?;
///
/// system.shutdown().await?;
/// ```
pub struct DeliverySystem {
    pub users: UserClient,
    pub products: ProductClient,
    pub orders: OrderClient,
    pub tracking: TrackingClient,
    pub identity: IdentityProvider,
    poller_settings: PollerSettings,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl DeliverySystem {
    /// Creates every actor and spawns it. Must be called inside a Tokio runtime.
    pub fn new(config: &AppConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        let buffer = config.actor_buffer_size;

        // 1. Create actors (no dependencies yet)
        let (user_actor, users) = crate::user_actor::new(buffer);
        let (product_actor, products) = crate::product_actor::new(buffer);
        let (order_actor, orders) = crate::order_actor::new(buffer);
        let (tracking_actor, tracking) = crate::tracking_actor::new(buffer);

        // 2. Start actors with injected context
        let user_handle = tokio::spawn(user_actor.run(()));
        let product_handle = tokio::spawn(product_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(()));
        // Points are checked against the order store (Context = OrderClient)
        let tracking_handle = tokio::spawn(tracking_actor.run(orders.clone()));

        let identity = IdentityProvider::new(users.clone(), credentials);

        Self {
            users,
            products,
            orders,
            tracking,
            identity,
            poller_settings: PollerSettings::from(config),
            handles: vec![tracking_handle, order_handle, product_handle, user_handle],
        }
    }

    /// A poller reporting through this system's tracking ledger and identity.
    pub fn poller(&self, location: Arc<dyn LocationProvider>) -> LocationPoller {
        LocationPoller::new(
            location,
            self.tracking.clone(),
            self.identity.clone(),
            self.poller_settings,
        )
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Drops the system's clients, which closes the actors' channels, then waits for
    /// every actor task. Clones of the clients held elsewhere (including pollers)
    /// keep their actor alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down system...");

        drop(self.identity);
        drop(self.tracking);
        drop(self.orders);
        drop(self.products);
        drop(self.users);

        // Tracking first: it holds an OrderClient until it exits.
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e);
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
