//! # Product Client
//!
//! Provides a high‑level API for interacting with the `Product` actor.
//! It wraps a `ResourceClient<Product>` and exposes domain‑specific methods.
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{CartLine, Product, ProductCreate, ProductId, ProductQuery, ProductUpdate};
use crate::product_actor::ProductError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, ProductError> {
        self.fetch(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// The catalog, optionally restricted to one category (case-insensitive).
    pub async fn list(&self, categoria: Option<&str>) -> Result<Vec<Product>, ProductError> {
        self.fetch_all(ProductQuery {
            categoria: categoria.map(str::to_string),
        })
        .await
    }

    pub async fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product, ProductError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Total price of a cart at current catalog prices.
    ///
    /// Every line must name an existing product, ask for at least one unit, and fit in
    /// the available stock. Stock is only checked, not reserved.
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn quote(&self, cart: &[CartLine]) -> Result<f64, ProductError> {
        let mut total = 0.0;
        for line in cart {
            if line.quantity == 0 {
                return Err(ProductError::Validation(format!(
                    "quantity for {} must be at least 1",
                    line.product_id
                )));
            }
            let product = self.get(line.product_id).await?;
            if line.quantity > product.cantidad {
                return Err(ProductError::InsufficientStock {
                    product: product.nombre,
                    requested: line.quantity,
                    available: product.cantidad,
                });
            }
            total += product.precio * f64::from(line.quantity);
        }
        debug!(total, "Cart quoted");
        Ok(total)
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<ProductError>() {
            Ok(e) => e,
            Err(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            Err(FrameworkError::Conflict(sku)) => {
                ProductError::Validation(format!("sku already in use: {sku}"))
            }
            Err(other) => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_get};

    fn laptop() -> Product {
        Product {
            id: ProductId(1),
            nombre: "Laptop".to_string(),
            descripcion: None,
            precio: 1500.0,
            sku: None,
            cantidad: 10,
            categoria: Some("Electrónica".to_string()),
        }
    }

    #[tokio::test]
    async fn test_quote_multiplies_price_by_quantity() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let task = tokio::spawn(async move {
            product_client
                .quote(&[CartLine {
                    product_id: ProductId(1),
                    quantity: 2,
                }])
                .await
        });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, ProductId(1));
        responder.send(Ok(Some(laptop()))).unwrap();

        assert_eq!(task.await.unwrap(), Ok(3000.0));
    }

    #[tokio::test]
    async fn test_quote_rejects_more_than_stock() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let task = tokio::spawn(async move {
            product_client
                .quote(&[CartLine {
                    product_id: ProductId(1),
                    quantity: 11,
                }])
                .await
        });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        responder.send(Ok(Some(laptop()))).unwrap();

        assert!(matches!(
            task.await.unwrap(),
            Err(ProductError::InsufficientStock { requested: 11, available: 10, .. })
        ));
    }
}
