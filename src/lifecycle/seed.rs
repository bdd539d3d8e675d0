//! Demo data: two accounts, a small catalog, two orders and their tracking history.
//!
//! Everything goes through the public operations, so seeding exercises the same
//! validation as live traffic.

use crate::lifecycle::DeliverySystem;
use crate::model::{
    CartLine, Order, OrderDraft, OrderStatus, Password, PointRecord, Product, ProductCreate,
    Role, User, UserCreate,
};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::tracking_actor::TrackingError;
use crate::user_actor::UserError;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::info;

pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_LATITUDE: f64 = -19.0459;
pub const DEMO_LONGITUDE: f64 = -65.2561;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

/// What [`seed_demo_data`] created.
#[derive(Debug, Clone)]
pub struct DemoData {
    pub cliente: User,
    pub transportista: User,
    /// On the road, with two tracking points.
    pub en_route: Order,
    /// Already delivered.
    pub delivered: Order,
}

pub async fn seed_demo_data(system: &DeliverySystem) -> Result<DemoData, SeedError> {
    let cliente = system
        .users
        .create(UserCreate {
            email: "cliente@example.com".to_string(),
            password: Password::new(DEMO_PASSWORD),
            nombre: "Juan".to_string(),
            apellido: "Perez".to_string(),
            rol: Role::Cliente,
        })
        .await?;
    let transportista = system
        .users
        .create(UserCreate {
            email: "transportista@example.com".to_string(),
            password: Password::new(DEMO_PASSWORD),
            nombre: "Maria".to_string(),
            apellido: "Gomez".to_string(),
            rol: Role::Transportista,
        })
        .await?;

    let catalog = [
        ("Laptop", "Laptop de última generación", 1500.0, 10, "Electrónica"),
        ("Smartphone", "Smartphone con cámara de alta resolución", 800.0, 25, "Electrónica"),
        ("Auriculares", "Auriculares con cancelación de ruido", 200.0, 50, "Accesorios"),
    ];
    let mut products = Vec::with_capacity(catalog.len());
    for (nombre, descripcion, precio, cantidad, categoria) in catalog {
        let product = system
            .products
            .create(ProductCreate {
                nombre: nombre.to_string(),
                descripcion: Some(descripcion.to_string()),
                precio,
                sku: None,
                cantidad,
                categoria: Some(categoria.to_string()),
            })
            .await?;
        products.push(product);
    }

    let profile_id = cliente.id.to_string();
    let carrier_id = transportista.id.to_string();

    let en_route = place_order(system, &products[0], &profile_id, &carrier_id).await?;
    let en_route = advance_to(system, en_route, OrderStatus::EnRuta).await?;
    let delivered = place_order(system, &products[1], &profile_id, &carrier_id).await?;
    let delivered = advance_to(system, delivered, OrderStatus::Entregado).await?;

    // The later append carries the earlier event time.
    let now = Utc::now();
    let current = PointRecord::new(en_route.id, DEMO_LATITUDE, DEMO_LONGITUDE, "en_ruta")
        .with_carrier(carrier_id.clone())
        .with_comment("El paquete está en camino");
    system.tracking.seed_point(current, now).await?;
    let earlier = PointRecord::new(en_route.id, DEMO_LATITUDE, DEMO_LONGITUDE, "preparando")
        .with_carrier(carrier_id)
        .with_comment("El paquete está siendo preparado");
    system
        .tracking
        .seed_point(earlier, now - Duration::hours(1))
        .await?;

    info!(
        cliente = %cliente.id,
        transportista = %transportista.id,
        products = products.len(),
        "Demo data seeded"
    );
    Ok(DemoData {
        cliente,
        transportista,
        en_route,
        delivered,
    })
}

/// One unit of `product`, quoted from the catalog and assigned to the carrier.
async fn place_order(
    system: &DeliverySystem,
    product: &Product,
    profile_id: &str,
    carrier_id: &str,
) -> Result<Order, SeedError> {
    let total = system
        .products
        .quote(&[CartLine {
            product_id: product.id,
            quantity: 1,
        }])
        .await?;
    let order = system
        .orders
        .create(OrderDraft {
            profile_id: profile_id.to_string(),
            origin_address_id: "dir-origen-1".to_string(),
            destination_address_id: "dir-destino-2".to_string(),
            total_amount: total,
            ..OrderDraft::default()
        })
        .await?;
    Ok(system.orders.assign_carrier(order.id, carrier_id).await?)
}

async fn advance_to(
    system: &DeliverySystem,
    mut order: Order,
    target: OrderStatus,
) -> Result<Order, OrderError> {
    while order.status != target {
        order = system.orders.advance(order.id).await?;
    }
    Ok(order)
}
