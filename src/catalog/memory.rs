//! In-memory product store for development and testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CatalogError;

use super::{NewProduct, Product, ProductStore};

/// Product store backed by an in-process vector.
///
/// The write lock serializes mutations; reads see a consistent snapshot.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, new: NewProduct) -> Result<Product, CatalogError> {
        let product = Product::from_new(new)?;
        let mut products = self.products.write().await;
        products.push(product.clone());
        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Product, CatalogError> {
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<Product, CatalogError> {
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        Ok(products.remove(index))
    }
}
