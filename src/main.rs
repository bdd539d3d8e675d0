//! Demo: seeds a system, signs in as the demo carrier and tracks one order along a
//! short scripted route.

use pedido_tracker::config::AppConfig;
use pedido_tracker::identity::FileCredentialStore;
use pedido_tracker::lifecycle::{seed, seed_demo_data, setup_tracing, DeliverySystem};
use pedido_tracker::polling::ScriptedLocationProvider;
use std::sync::Arc;
use tracing::{info, Instrument};

const ROUTE: &[(f64, f64)] = &[
    (-19.0459, -65.2561),
    (-19.0431, -65.2590),
    (-19.0402, -65.2617),
    (-19.0378, -65.2644),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = AppConfig::from_env()?;
    info!(?config, "Starting delivery tracker");

    let credentials = Arc::new(FileCredentialStore::new(config.session_dir.clone()));
    let system = DeliverySystem::new(&config, credentials);

    if let Some(user) = system.identity.load_session().await {
        info!(email = %user.email, "Previous session found");
    }

    let demo = seed_demo_data(&system)
        .instrument(tracing::info_span!("seeding"))
        .await?;
    let order = demo.en_route;
    info!(tracking_number = %order.tracking_number, "Tracking demo order");

    system
        .identity
        .login(&demo.transportista.email, seed::DEMO_PASSWORD)
        .await?;

    let location = Arc::new(ScriptedLocationProvider::granted().route(ROUTE));
    let mut poller = system.poller(location);
    poller.start(order.id).await?;

    let samples = ROUTE.len() as u32;
    tokio::time::sleep(config.poll_interval * samples + config.poll_interval / 2).await;
    poller.stop().await;
    drop(poller);

    let history = system.tracking.history(order.id).await?;
    info!(points = history.len(), "Tracking history");
    if let Some(latest) = system.tracking.latest(order.id).await? {
        info!(
            point_id = %latest.id,
            latitud = latest.latitude,
            longitud = latest.longitude,
            estado = %latest.status_label,
            "Latest position"
        );
    }

    system.identity.logout().await;
    system.shutdown().await?;

    info!("Demo completed");
    Ok(())
}
