//! ActorEntity trait implementation for the Product domain type.

use crate::framework::ActorEntity;
use crate::model::{Product, ProductCreate, ProductId, ProductQuery, ProductUpdate};
use crate::product_actor::ProductError;
use async_trait::async_trait;
use std::convert::Infallible;

fn check_price(precio: f64) -> Result<(), ProductError> {
    if !precio.is_finite() || precio < 0.0 {
        return Err(ProductError::Validation(format!(
            "precio must be a non-negative number, got {precio}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = Infallible;
    type ActionResult = ();
    type Query = ProductQuery;
    type Context = ();
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        if params.nombre.trim().is_empty() {
            return Err(ProductError::Validation("nombre is required".to_string()));
        }
        check_price(params.precio)?;

        Ok(Self {
            id,
            nombre: params.nombre,
            descripcion: params.descripcion,
            precio: params.precio,
            sku: params.sku,
            cantidad: params.cantidad,
            categoria: params.categoria,
        })
    }

    fn matches(&self, query: &ProductQuery) -> bool {
        match &query.categoria {
            None => true,
            Some(categoria) => self
                .categoria
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(categoria)),
        }
    }

    /// SKUs, when present, identify a product.
    fn unique_key(&self) -> Option<String> {
        self.sku.clone()
    }

    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(precio) = update.precio {
            check_price(precio)?;
            self.precio = precio;
        }
        if let Some(cantidad) = update.cantidad {
            self.cantidad = cantidad;
        }
        if let Some(descripcion) = update.descripcion {
            self.descripcion = Some(descripcion);
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}
