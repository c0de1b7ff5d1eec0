//! HTTP server layer for the catalog server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │   /login /products /add-product /upload-image /uploads/...      │
//! │                                                                 │
//! │  ┌─────────────┐  ┌──────────────┐  ┌────────────────────────┐  │
//! │  │  handlers   │  │     auth     │  │        routes          │  │
//! │  │ (requests)  │  │ (session gate)│ │   (router config)      │  │
//! │  └─────────────┘  └──────────────┘  └────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{extract_token, require_auth, Unauthorized, SESSION_COOKIE, SESSION_HEADER};
pub use handlers::{
    AddProductResponse, AppState, CheckAuthResponse, DeleteProductResponse, ErrorResponse,
    HealthResponse, LoginRequest, MessageResponse, ProductResponse, ProductsResponse,
    UploadResponse,
};
pub use routes::{create_router, RouterConfig};
