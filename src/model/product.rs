//! Catalog items a customer can put in an order.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub descripcion: Option<String>,
    pub precio: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sku: Option<String>,
    /// Units in stock.
    pub cantidad: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub categoria: Option<String>,
}

/// DTOs for Product creation and updates.
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub sku: Option<String>,
    pub cantidad: u32,
    pub categoria: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub precio: Option<f64>,
    pub cantidad: Option<u32>,
    pub descripcion: Option<String>,
}

/// Filter for listing products; `None` lists the whole catalog.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub categoria: Option<String>,
}

/// One line of a shopping cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}
