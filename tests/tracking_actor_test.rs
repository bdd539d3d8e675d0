use pedido_tracker::clients::OrderClient;
use pedido_tracker::framework::mock::MockClient;
use pedido_tracker::framework::{ActorEntity, FrameworkError};
use pedido_tracker::model::{Order, OrderDraft, OrderId, PointId, PointRecord};
use pedido_tracker::tracking_actor::{self, TrackingError};

fn order() -> Order {
    let draft = OrderDraft {
        profile_id: "u1".to_string(),
        origin_address_id: "o".to_string(),
        destination_address_id: "d".to_string(),
        total_amount: 10.0,
        ..OrderDraft::default()
    };
    Order::from_create_params(OrderId::new(), draft).unwrap()
}

/// Real Tracking actor with a mocked order store.
/// `TrackingPoint::on_create` asks the order store whether the order exists.
#[tokio::test]
async fn test_tracking_actor_checks_order_store() {
    let known = order();
    let unknown = OrderId::new();

    let mut order_mock = MockClient::<Order>::new();
    order_mock.expect_get(known.id).return_ok(Some(known.clone()));
    order_mock.expect_get(unknown).return_ok(None);
    order_mock.expect_get(known.id).return_ok(Some(known.clone()));

    let (actor, tracking) = tracking_actor::new(8);
    let handle = tokio::spawn(actor.run(OrderClient::new(order_mock.client())));

    let first = tracking
        .record_point(PointRecord::new(known.id, -19.04, -65.25, "en_ruta").with_carrier("c1"))
        .await
        .expect("point for a known order");
    assert_eq!(first.id, PointId(1));
    assert_eq!(first.carrier_id.as_deref(), Some("c1"));

    let rejected = tracking
        .record_point(PointRecord::new(unknown, -19.04, -65.25, "en_ruta"))
        .await;
    assert_eq!(
        rejected,
        Err(TrackingError::OrderNotFound(unknown.to_string()))
    );

    // Rejected appends do not consume a visible slot in the order's history
    let second = tracking
        .record_point(PointRecord::new(known.id, -19.03, -65.24, "en_ruta"))
        .await
        .unwrap();
    assert!(second.id > first.id);
    assert_eq!(tracking.history(known.id).await.unwrap().len(), 2);
    assert!(tracking.history(unknown).await.unwrap().is_empty());

    order_mock.verify();
    drop(tracking);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_invalid_coordinates_never_reach_the_order_store() {
    // No expectations: any call to the order store fails `verify`
    let order_mock = MockClient::<Order>::new();

    let (actor, tracking) = tracking_actor::new(8);
    let handle = tokio::spawn(actor.run(OrderClient::new(order_mock.client())));

    for (latitude, longitude) in [(91.0, 0.0), (0.0, -180.5), (f64::NAN, 0.0)] {
        let result = tracking
            .record_point(PointRecord::new(OrderId::new(), latitude, longitude, "en_ruta"))
            .await;
        assert!(matches!(result, Err(TrackingError::Validation(_))));
    }
    let blank = tracking
        .record_point(PointRecord::new(OrderId::new(), 0.0, 0.0, "  "))
        .await;
    assert!(matches!(blank, Err(TrackingError::Validation(_))));

    order_mock.verify();
    drop(tracking);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_order_store_failure_is_transient() {
    let known = order();
    let mut order_mock = MockClient::<Order>::new();
    order_mock
        .expect_get(known.id)
        .return_err(FrameworkError::ActorClosed);

    let (actor, tracking) = tracking_actor::new(8);
    let handle = tokio::spawn(actor.run(OrderClient::new(order_mock.client())));

    let result = tracking
        .record_point(PointRecord::new(known.id, -19.04, -65.25, "en_ruta"))
        .await;
    match result {
        Err(e) => assert!(e.is_transient(), "{e:?}"),
        Ok(point) => panic!("unexpected point {point:?}"),
    }

    order_mock.verify();
    drop(tracking);
    handle.await.unwrap();
}
