//! JSON-file backed product store.
//!
//! The full product list is kept in memory behind a `RwLock` and snapshotted
//! to disk on every mutation while the write lock is held. The snapshot is
//! written to a temp file, fsynced, and renamed over the live file, so a
//! crash mid-write leaves the previous snapshot intact. The in-memory state
//! is only committed after the snapshot succeeds; a failed write surfaces as
//! [`CatalogError::Storage`] and leaves the store in its pre-operation state.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::CatalogError;

use super::{NewProduct, Product, ProductStore};

/// Product store persisted as a JSON array of records.
pub struct JsonFileProductStore {
    path: PathBuf,
    products: RwLock<Vec<Product>>,
}

impl JsonFileProductStore {
    /// Open a store at `path`, loading any existing snapshot.
    ///
    /// A missing file is treated as an empty catalog; a file that exists but
    /// cannot be read or parsed is an error, not silently discarded data.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| CatalogError::Storage(e.to_string()))?;
            }
        }

        let products = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| CatalogError::Storage(format!("corrupt product file: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(CatalogError::Storage(e.to_string())),
        };

        debug!(path = %path.display(), "opened product store");

        Ok(Self {
            path,
            products: RwLock::new(products),
        })
    }

    /// Write a snapshot durably: temp file, fsync, atomic rename.
    ///
    /// Callers hold the write lock, so snapshots never interleave.
    async fn persist(&self, products: &[Product]) -> Result<(), CatalogError> {
        let bytes = serde_json::to_vec_pretty(products)
            .map_err(|e| CatalogError::Storage(e.to_string()))?;

        let tmp_path = tmp_path_for(&self.path);

        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?;

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl ProductStore for JsonFileProductStore {
    async fn create(&self, new: NewProduct) -> Result<Product, CatalogError> {
        let product = Product::from_new(new)?;

        let mut products = self.products.write().await;
        let mut next = products.clone();
        next.push(product.clone());

        self.persist(&next).await?;
        *products = next;

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

        let mut next = products.clone();
        let removed = next.remove(index);

        self.persist(&next).await?;
        *products = next;

        Ok(removed)
    }
}
