//! Router configuration for the catalog server.
//!
//! # Route Structure
//!
//! ```text
//! POST /login               - issue a session token (public)
//! POST /logout              - revoke a session token (public)
//! GET  /check-auth          - report session status (public)
//! GET  /health              - health check (public)
//! GET  /products            - list products (public)
//! GET  /products/{id}       - fetch one product (public)
//! GET  /uploads/{filename}  - serve a stored image (public)
//! POST   /add-product       - create a product (session required)
//! DELETE /products/{id}     - delete a product (session required)
//! POST   /upload-image      - upload an image (session required)
//! ```
//!
//! The auth middleware wraps the product and upload routes; it passes safe
//! methods through and requires a valid session for mutating ones, so every
//! mutating endpoint is gated without splitting `/products/{id}` across two
//! routers.

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{HeaderName, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{require_auth, SESSION_HEADER};
use super::handlers::{
    add_product_handler, check_auth_handler, delete_product_handler, fallback_handler,
    get_product_handler, health_handler, list_products_handler, login_handler, logout_handler,
    serve_upload_handler, upload_image_handler, AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with defaults: any CORS origin,
    /// tracing enabled.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Builds the complete Axum router with public session/read routes, gated
/// mutation routes, a JSON 404 fallback, CORS, and optional request tracing.
pub fn create_router(state: AppState, config: RouterConfig) -> Router {
    let cors = build_cors_layer(&config);

    // Catalog and upload routes share the auth middleware, which gates
    // mutating methods only. The upload route opts out of the default body
    // limit: the handler enforces the configured image limit while streaming.
    let gated_routes = Router::new()
        .route("/products", get(list_products_handler))
        .route(
            "/products/{id}",
            get(get_product_handler).delete(delete_product_handler),
        )
        .route("/add-product", post(add_product_handler))
        .route(
            "/upload-image",
            post(upload_image_handler).layer(DefaultBodyLimit::disable()),
        )
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_auth,
        ))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/check-auth", get(check_auth_handler))
        .route("/health", get(health_handler))
        .route("/uploads/{filename}", get(serve_upload_handler))
        .with_state(state);

    let router = Router::new()
        .merge(gated_routes)
        .merge(public_routes)
        .fallback(fallback_handler)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
///
/// The session header is exposed so browser clients can read the token from
/// the login response.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let session_header = HeaderName::from_static(SESSION_HEADER);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, session_header.clone()])
        .expose_headers([session_header])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
