//! # Catalog Server
//!
//! A single-process HTTP backend for a small product-catalog admin panel.
//! A public storefront lists products; an authenticated admin creates and
//! deletes product records and uploads their images.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`catalog`] - product model and swappable repository backends
//! - [`session`] - session stores and the authentication gate
//! - [`uploads`] - image blob store
//! - [`server`] - Axum-based HTTP routes, handlers, and auth middleware
//! - [`config`] - CLI and configuration types
//!
//! Storage is abstracted behind the [`catalog::ProductStore`] and
//! [`session::SessionStore`] traits so backends can be swapped by
//! configuration without touching request handlers. All mutations to a
//! store are serialized and made durable before an operation reports
//! success.

pub mod catalog;
pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod uploads;

// Re-export commonly used types
pub use catalog::{
    JsonFileProductStore, MemoryProductStore, NewProduct, Product, ProductStore,
};
pub use config::{Config, ProductBackend, SessionBackend};
pub use error::{CatalogError, ImageError};
pub use server::{create_router, AppState, RouterConfig, SESSION_COOKIE, SESSION_HEADER};
pub use session::{
    AuthError, AuthGate, FileSessionStore, MemorySessionStore, SessionStore,
};
pub use uploads::ImageStore;
