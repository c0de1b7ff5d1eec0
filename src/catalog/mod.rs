//! Product repository: the catalog's only mutable state.
//!
//! The [`ProductStore`] trait abstracts over the backing store so that
//! request handlers never touch a concrete backend. Two implementations are
//! provided:
//!
//! - [`MemoryProductStore`] - in-memory, for development and testing
//! - [`JsonFileProductStore`] - durable JSON snapshots behind a single-writer
//!   lock
//!
//! All mutations are serialized with respect to each other; reads observe a
//! consistent snapshot. A mutation only reports success once the backing
//! store has acknowledged the write.

pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub use json_file::JsonFileProductStore;
pub use memory::MemoryProductStore;

// =============================================================================
// Model
// =============================================================================

/// A catalog product record.
///
/// `id` and `created_at` are assigned by the store at creation and never
/// change. Records are never updated in place; the only lifecycle is
/// create then delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque unique identifier, assigned at creation
    pub id: String,

    /// Display name (non-empty)
    pub name: String,

    /// Filename of the product image in the image store (non-empty)
    pub img: String,

    /// Short description (defaults to empty)
    #[serde(default)]
    pub description: String,

    /// Minimum order quantity, free-form display string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order: Option<String>,

    /// Production lead time, free-form display string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_time: Option<String>,

    /// External shop link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopee_link: Option<String>,

    /// Creation timestamp, immutable
    pub created_at: DateTime<Utc>,
}

/// Client-supplied fields for creating a product.
///
/// Missing fields deserialize as empty/None so that validation produces the
/// repository's own error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub img: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub min_order: Option<String>,

    #[serde(default)]
    pub production_time: Option<String>,

    #[serde(default)]
    pub shopee_link: Option<String>,
}

impl Product {
    /// Build a full record from client-supplied fields.
    ///
    /// Fails with [`CatalogError::Validation`] if `name` or `img` is empty or
    /// whitespace-only. Assigns a fresh id and creation timestamp.
    pub fn from_new(new: NewProduct) -> Result<Self, CatalogError> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::Validation { field: "name" });
        }

        if new.img.trim().is_empty() {
            return Err(CatalogError::Validation { field: "img" });
        }

        Ok(Product {
            id: new_product_id(),
            name,
            img: new.img,
            description: new
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            min_order: new.min_order,
            production_time: new.production_time,
            shopee_link: new.shopee_link,
            created_at: Utc::now(),
        })
    }
}

/// Generate a fresh product id: 16 random bytes, hex-encoded.
///
/// Collision-resistant under concurrent creates, unlike the millisecond
/// timestamps some earlier revisions used.
pub fn new_product_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

// =============================================================================
// ProductStore Trait
// =============================================================================

/// Capability-based abstraction over the product backing store.
///
/// Implementations must serialize mutations with respect to each other and
/// must not report a mutation as successful before it is durable (where the
/// backend is durable at all).
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Validate, persist, and return a new product record.
    async fn create(&self, new: NewProduct) -> Result<Product, CatalogError>;

    /// All products in insertion order. Empty is not an error.
    async fn list(&self) -> Result<Vec<Product>, CatalogError>;

    /// Look up a single product by id.
    async fn get(&self, id: &str) -> Result<Product, CatalogError>;

    /// Remove a product, returning the removed record.
    async fn delete(&self, id: &str) -> Result<Product, CatalogError>;
}

// =============================================================================
// Tests
// =============================================================================
