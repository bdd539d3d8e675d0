//! The polling loop: one cancellable task per tracked order.

use crate::clients::TrackingClient;
use crate::config::AppConfig;
use crate::identity::IdentityProvider;
use crate::model::{OrderId, PointRecord, OrderStatus};
use crate::polling::{LocationError, LocationProvider, Permission, PollingError, Position};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    RequestingPermission,
    Active { order_id: OrderId },
}

/// Timing knobs of the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollerSettings {
    pub poll_interval: Duration,
    pub location_timeout: Duration,
    /// Total tries per sample, first one included.
    pub record_retry_attempts: u32,
    /// Wait before retry `n` is `n * record_retry_backoff`.
    pub record_retry_backoff: Duration,
}

impl From<&AppConfig> for PollerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            location_timeout: config.location_timeout,
            record_retry_attempts: config.record_retry_attempts,
            record_retry_backoff: config.record_retry_backoff,
        }
    }
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

struct RunningTask {
    order_id: OrderId,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Everything a tick needs, shared with the spawned task.
#[derive(Clone)]
struct Sampler {
    location: Arc<dyn LocationProvider>,
    tracking: TrackingClient,
    identity: IdentityProvider,
    settings: PollerSettings,
    position: Arc<watch::Sender<Option<Position>>>,
}

/// Samples the device position while tracking is active and forwards each sample
/// to the tracking ledger, attributed to the signed-in carrier.
///
/// State machine: `Idle → RequestingPermission → Active → Idle`. Methods take
/// `&mut self`, so one poller never runs two loops.
pub struct LocationPoller {
    sampler: Sampler,
    state: watch::Sender<PollerState>,
    task: Option<RunningTask>,
}

impl LocationPoller {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        tracking: TrackingClient,
        identity: IdentityProvider,
        settings: PollerSettings,
    ) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        let (position, _) = watch::channel(None);
        Self {
            sampler: Sampler {
                location,
                tracking,
                identity,
                settings,
                position: Arc::new(position),
            },
            state,
            task: None,
        }
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<PollerState> {
        self.state.subscribe()
    }

    /// Most recent successful sample, kept even after `stop`.
    pub fn last_position(&self) -> Option<Position> {
        *self.sampler.position.borrow()
    }

    pub fn subscribe_position(&self) -> watch::Receiver<Option<Position>> {
        self.sampler.position.subscribe()
    }

    /// Starts tracking `order_id`.
    ///
    /// Already tracking the same order: nothing happens. Tracking another order: that
    /// loop is stopped first. On denial the poller returns to `Idle` and
    /// [`PollingError::PermissionDenied`] is returned.
    pub async fn start(&mut self, order_id: OrderId) -> Result<(), PollingError> {
        if let Some(task) = &self.task {
            if task.order_id == order_id && !task.handle.is_finished() {
                debug!(%order_id, "Already tracking");
                return Ok(());
            }
        }
        self.stop().await;

        self.state.send_replace(PollerState::RequestingPermission);
        match self.sampler.location.request_permission().await {
            Ok(Permission::Granted) => {}
            Ok(Permission::Denied) => {
                self.state.send_replace(PollerState::Idle);
                warn!(%order_id, "Location permission denied");
                return Err(PollingError::PermissionDenied);
            }
            Err(e) => {
                self.state.send_replace(PollerState::Idle);
                warn!(%order_id, error = %e, "Location permission request failed");
                return Err(e.into());
            }
        }

        let (shutdown, shutdown_rx) = oneshot::channel();
        let sampler = self.sampler.clone();
        let span = tracing::info_span!("poller", %order_id);
        let handle = tokio::spawn(sampler.run(order_id, shutdown_rx).instrument(span));

        self.task = Some(RunningTask {
            order_id,
            shutdown,
            handle,
        });
        self.state.send_replace(PollerState::Active { order_id });
        info!(%order_id, interval = ?self.sampler.settings.poll_interval, "Tracking started");
        Ok(())
    }

    /// Stops the loop and waits for it to finish.
    ///
    /// A sample already in flight completes and may record one last point; nothing is
    /// recorded after this returns.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            self.state.send_replace(PollerState::Idle);
            return;
        };

        let _ = task.shutdown.send(());
        self.state.send_replace(PollerState::Idle);
        if let Err(e) = task.handle.await {
            error!(order_id = %task.order_id, error = %e, "Polling task failed");
        }
        info!(order_id = %task.order_id, "Tracking stopped");
    }
}

impl Drop for LocationPoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.abort();
        }
    }
}

impl Sampler {
    async fn run(self, order_id: OrderId, mut shutdown: oneshot::Receiver<()>) {
        let period = self.settings.poll_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => self.tick(order_id).await,
            }
        }
        debug!("Polling loop exited");
    }

    async fn tick(&self, order_id: OrderId) {
        let sample = tokio::time::timeout(
            self.settings.location_timeout,
            self.location.current_position(),
        )
        .await
        .unwrap_or(Err(LocationError::Timeout(self.settings.location_timeout)));

        let position = match sample {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "Position sample failed");
                return;
            }
        };
        self.position.send_replace(Some(position));

        let Some(carrier_id) = self.identity.carrier_id() else {
            debug!("No carrier signed in, sample not recorded");
            return;
        };
        let record = PointRecord::new(
            order_id,
            position.latitude,
            position.longitude,
            OrderStatus::EnRuta.as_str(),
        )
        .with_carrier(carrier_id);
        self.record(record).await;
    }

    /// Records with bounded retries; only transport failures are retried.
    async fn record(&self, record: PointRecord) {
        let attempts = self.settings.record_retry_attempts.max(1);
        for attempt in 1..=attempts {
            match self.tracking.record_point(record.clone()).await {
                Ok(point) => {
                    debug!(point_id = %point.id, attempt, "Sample recorded");
                    return;
                }
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(attempt, error = %e, "Recording failed, retrying");
                    tokio::time::sleep(self.settings.record_retry_backoff * attempt).await;
                }
                Err(e) => {
                    error!(attempt, error = %e, "Sample dropped");
                    return;
                }
            }
        }
    }
}
