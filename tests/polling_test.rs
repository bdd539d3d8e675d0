use chrono::Utc;
use pedido_tracker::clients::TrackingClient;
use pedido_tracker::config::AppConfig;
use pedido_tracker::framework::mock::MockClient;
use pedido_tracker::framework::FrameworkError;
use pedido_tracker::identity::{IdentityProvider, MemoryCredentialStore};
use pedido_tracker::lifecycle::DeliverySystem;
use pedido_tracker::model::{Order, OrderDraft, OrderId, PointId, Role, TrackingPoint};
use pedido_tracker::polling::{
    LocationError, LocationPoller, PollerSettings, PollerState, PollingError,
    ScriptedLocationProvider,
};
use pedido_tracker::user_actor;
use std::sync::Arc;
use std::time::Duration;

const ROUTE: &[(f64, f64)] = &[(-19.0459, -65.2561), (-19.0431, -65.2590), (-19.0402, -65.2617)];

fn config() -> AppConfig {
    AppConfig {
        poll_interval: Duration::from_secs(5),
        location_timeout: Duration::from_secs(2),
        ..AppConfig::default()
    }
}

async fn system_with_order() -> (DeliverySystem, Order) {
    let system = DeliverySystem::new(&config(), Arc::new(MemoryCredentialStore::new()));
    let order = system
        .orders
        .create(OrderDraft {
            profile_id: "u1".to_string(),
            origin_address_id: "dir-origen".to_string(),
            destination_address_id: "dir-destino".to_string(),
            total_amount: 1500.0,
            ..OrderDraft::default()
        })
        .await
        .unwrap();
    (system, order)
}

async fn sign_in_carrier(system: &DeliverySystem) -> String {
    let user = system
        .identity
        .register(
            "transportista@example.com",
            "password123",
            "Maria",
            "Gomez",
            Role::Transportista,
        )
        .await
        .unwrap();
    user.id.to_string()
}

#[tokio::test(start_paused = true)]
async fn test_records_one_point_per_interval() {
    let (system, order) = system_with_order().await;
    let carrier_id = sign_in_carrier(&system).await;
    let location = Arc::new(ScriptedLocationProvider::granted().route(ROUTE));
    let mut poller = system.poller(location.clone());

    poller.start(order.id).await.unwrap();
    assert_eq!(poller.state(), PollerState::Active { order_id: order.id });

    // Ticks at 5s, 10s and 15s; none at start
    tokio::time::sleep(Duration::from_secs(16)).await;
    poller.stop().await;
    assert_eq!(poller.state(), PollerState::Idle);

    let history = system.tracking.history(order.id).await.unwrap();
    assert_eq!(history.len(), 3);
    for (point, &(latitude, longitude)) in history.iter().zip(ROUTE) {
        assert_eq!(point.latitude, latitude);
        assert_eq!(point.longitude, longitude);
        assert_eq!(point.status_label, "en_ruta");
        assert_eq!(point.carrier_id.as_deref(), Some(carrier_id.as_str()));
    }
    let last = poller.last_position().expect("a sample was taken");
    assert_eq!((last.latitude, last.longitude), ROUTE[2]);
    assert_eq!(location.permission_requests(), 1);

    drop(poller);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_permission_denied_stays_idle() {
    let (system, order) = system_with_order().await;
    sign_in_carrier(&system).await;
    let location = Arc::new(ScriptedLocationProvider::denied().route(ROUTE));
    let mut poller = system.poller(location.clone());

    let result = poller.start(order.id).await;
    assert!(matches!(result, Err(PollingError::PermissionDenied)));
    assert_eq!(poller.state(), PollerState::Idle);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(system.tracking.history(order.id).await.unwrap().is_empty());
    assert_eq!(location.samples_taken(), 0);

    drop(poller);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_permission_request_failure_stays_idle() {
    let (system, order) = system_with_order().await;
    let location = Arc::new(ScriptedLocationProvider::unavailable(
        LocationError::Transport("no GPS".to_string()),
    ));
    let mut poller = system.poller(location);

    let result = poller.start(order.id).await;
    assert!(matches!(result, Err(PollingError::Location(_))));
    assert_eq!(poller.state(), PollerState::Idle);

    drop(poller);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_for_same_order_keeps_one_loop() {
    let (system, order) = system_with_order().await;
    sign_in_carrier(&system).await;
    let location = Arc::new(ScriptedLocationProvider::granted().route(ROUTE));
    let mut poller = system.poller(location.clone());

    poller.start(order.id).await.unwrap();
    poller.start(order.id).await.unwrap();
    assert_eq!(location.permission_requests(), 1);

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(system.tracking.history(order.id).await.unwrap().len(), 2);

    drop(poller);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_switching_orders_restarts_the_loop() {
    let (system, first) = system_with_order().await;
    let second = system
        .orders
        .create(OrderDraft {
            profile_id: "u2".to_string(),
            origin_address_id: "dir-origen".to_string(),
            destination_address_id: "dir-destino".to_string(),
            total_amount: 800.0,
            ..OrderDraft::default()
        })
        .await
        .unwrap();
    sign_in_carrier(&system).await;
    let location = Arc::new(ScriptedLocationProvider::granted().route(ROUTE));
    let mut poller = system.poller(location.clone());

    poller.start(first.id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;
    poller.start(second.id).await.unwrap();
    assert_eq!(poller.state(), PollerState::Active { order_id: second.id });
    assert_eq!(location.permission_requests(), 2);

    tokio::time::sleep(Duration::from_secs(6)).await;
    poller.stop().await;

    assert_eq!(system.tracking.history(first.id).await.unwrap().len(), 1);
    assert_eq!(system.tracking.history(second.id).await.unwrap().len(), 1);

    drop(poller);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_stop_prevents_further_points() {
    let (system, order) = system_with_order().await;
    sign_in_carrier(&system).await;
    let location = Arc::new(ScriptedLocationProvider::granted().route(ROUTE));
    let mut poller = system.poller(location.clone());

    poller.start(order.id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(11)).await;
    poller.stop().await;
    let recorded = system.tracking.history(order.id).await.unwrap().len();
    assert_eq!(recorded, 2);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(system.tracking.history(order.id).await.unwrap().len(), recorded);
    assert_eq!(location.samples_taken(), 2);

    // Stopping again is harmless
    poller.stop().await;
    assert_eq!(poller.state(), PollerState::Idle);

    drop(poller);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_failed_and_slow_samples_are_skipped() {
    let (system, order) = system_with_order().await;
    sign_in_carrier(&system).await;
    let location = Arc::new(
        ScriptedLocationProvider::granted()
            .then_hang()
            .then_failure(LocationError::Transport("signal lost".to_string()))
            .then_position(-19.0459, -65.2561),
    );
    let mut poller = system.poller(location.clone());

    poller.start(order.id).await.unwrap();
    // 5s hangs until the 2s timeout, 10s fails, 15s records
    tokio::time::sleep(Duration::from_secs(16)).await;
    poller.stop().await;

    assert_eq!(location.samples_taken(), 3);
    assert_eq!(system.tracking.history(order.id).await.unwrap().len(), 1);

    drop(poller);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_invalid_sample_is_dropped_without_retry() {
    let (system, order) = system_with_order().await;
    sign_in_carrier(&system).await;
    let location = Arc::new(
        ScriptedLocationProvider::granted()
            .then_position(123.0, -65.2561)
            .then_position(-19.0459, -65.2561),
    );
    let mut poller = system.poller(location.clone());

    poller.start(order.id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(11)).await;
    poller.stop().await;

    let history = system.tracking.history(order.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].latitude, -19.0459);

    drop(poller);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_samples_without_a_carrier_are_not_recorded() {
    let (system, order) = system_with_order().await;
    system
        .identity
        .register("cliente@example.com", "pw", "Juan", "Perez", Role::Cliente)
        .await
        .unwrap();
    let location = Arc::new(ScriptedLocationProvider::granted().route(ROUTE));
    let mut poller = system.poller(location.clone());

    poller.start(order.id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(11)).await;
    poller.stop().await;

    assert_eq!(location.samples_taken(), 2);
    assert!(poller.last_position().is_some());
    assert!(system.tracking.history(order.id).await.unwrap().is_empty());

    drop(poller);
    system.shutdown().await.unwrap();
}

fn retry_settings() -> PollerSettings {
    PollerSettings {
        poll_interval: Duration::from_secs(5),
        location_timeout: Duration::from_secs(2),
        record_retry_attempts: 3,
        record_retry_backoff: Duration::from_millis(250),
    }
}

async fn signed_in_carrier() -> IdentityProvider {
    let (actor, users) = user_actor::new(8);
    tokio::spawn(actor.run(()));
    let identity = IdentityProvider::new(users, Arc::new(MemoryCredentialStore::new()));
    identity
        .register(
            "transportista@example.com",
            "password123",
            "Maria",
            "Gomez",
            Role::Transportista,
        )
        .await
        .unwrap();
    identity
}

fn recorded_point(order_id: OrderId) -> TrackingPoint {
    let now = Utc::now();
    TrackingPoint {
        id: PointId(1),
        order_id,
        carrier_id: Some("c1".to_string()),
        latitude: ROUTE[0].0,
        longitude: ROUTE[0].1,
        status_label: "en_ruta".to_string(),
        comment: None,
        recorded_at: now,
        created_at: now,
    }
}

/// Poller with a mocked tracking store: transport failures are retried
/// within the same tick until one succeeds.
#[tokio::test(start_paused = true)]
async fn test_transient_record_failures_are_retried() {
    let order_id = OrderId::new();
    let mut tracking_mock = MockClient::<TrackingPoint>::new();
    tracking_mock
        .expect_create()
        .return_err(FrameworkError::ActorClosed);
    tracking_mock
        .expect_create()
        .return_err(FrameworkError::ActorClosed);
    tracking_mock
        .expect_create()
        .return_ok(recorded_point(order_id));

    let location = Arc::new(ScriptedLocationProvider::granted().route(ROUTE));
    let mut poller = LocationPoller::new(
        location.clone(),
        TrackingClient::new(tracking_mock.client()),
        signed_in_carrier().await,
        retry_settings(),
    );

    poller.start(order_id).await.unwrap();
    // Tick at 5s, retries after 250ms and 500ms more
    tokio::time::sleep(Duration::from_millis(5_900)).await;
    poller.stop().await;

    assert_eq!(location.samples_taken(), 1);
    tracking_mock.verify();
}

#[tokio::test(start_paused = true)]
async fn test_sample_dropped_after_retries_run_out() {
    let order_id = OrderId::new();
    let settings = retry_settings();
    let mut tracking_mock = MockClient::<TrackingPoint>::new();
    for _ in 0..settings.record_retry_attempts {
        tracking_mock
            .expect_create()
            .return_err(FrameworkError::ActorClosed);
    }

    let location = Arc::new(ScriptedLocationProvider::granted().route(ROUTE));
    let mut poller = LocationPoller::new(
        location.clone(),
        TrackingClient::new(tracking_mock.client()),
        signed_in_carrier().await,
        settings,
    );

    poller.start(order_id).await.unwrap();
    // Stop before the second tick at 10s; a fourth create would fail `verify`
    tokio::time::sleep(Duration::from_secs(9)).await;
    poller.stop().await;

    assert_eq!(location.samples_taken(), 1);
    assert_eq!(poller.state(), PollerState::Idle);
    tracking_mock.verify();
}
