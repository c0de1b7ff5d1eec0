//! HTTP request handlers for the catalog API.
//!
//! # Endpoints
//!
//! - `POST /login`, `POST /logout`, `GET /check-auth` - session management
//! - `GET /products`, `GET /products/{id}` - public catalog reads
//! - `POST /add-product`, `DELETE /products/{id}` - gated catalog mutations
//! - `POST /upload-image`, `GET /uploads/{filename}` - image upload/serving
//! - `GET /health` - health check

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::catalog::{NewProduct, Product, ProductStore};
use crate::error::{CatalogError, ImageError};
use crate::session::AuthGate;
use crate::uploads::{content_type_for, ImageStore};

use super::auth::{extract_token, SESSION_COOKIE, SESSION_HEADER};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state, passed to all handlers via Axum's State.
#[derive(Clone)]
pub struct AppState {
    /// The product repository
    pub products: Arc<dyn ProductStore>,

    /// The uploaded-image store
    pub images: Arc<ImageStore>,

    /// Credential validation and session gating
    pub auth: AuthGate,

    /// Cache-Control max-age for served uploads, in seconds
    pub cache_max_age: u32,
}

impl AppState {
    /// Create application state with the default upload cache max-age (1 hour).
    pub fn new(products: Arc<dyn ProductStore>, images: Arc<ImageStore>, auth: AuthGate) -> Self {
        Self {
            products,
            images,
            auth,
            cache_max_age: 3600,
        }
    }

    /// Set the Cache-Control max-age used when serving uploads.
    pub fn with_cache_max_age(mut self, cache_max_age: u32) -> Self {
        self.cache_max_age = cache_max_age;
        self
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// JSON error envelope returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Generic success envelope with a human-readable message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Response of `GET /check-auth`.
#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub success: bool,
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
}

/// Response of `GET /products`.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
    pub total: usize,
}

/// Response of `GET /products/{id}`.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

/// Response of `POST /add-product`.
#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    pub success: bool,
    pub message: String,
    pub product: Product,
    #[serde(rename = "totalProducts")]
    pub total_products: usize,
}

/// Response of `DELETE /products/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "deletedProduct")]
    pub deleted_product: Product,
}

/// Response of `POST /upload-image`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub filename: String,
    pub url: String,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert repository errors to HTTP responses.
///
/// 4xx errors are logged at WARN/DEBUG, 5xx at ERROR. Messages are safe to
/// expose; stack traces and internal paths never leave the process.
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::Validation { .. } => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();

        match &self {
            CatalogError::Storage(_) => {
                error!(status = status.as_u16(), "storage error: {}", message)
            }
            CatalogError::NotFound(_) => {
                debug!(status = status.as_u16(), "product not found: {}", message)
            }
            CatalogError::Validation { .. } => {
                warn!(status = status.as_u16(), "validation failed: {}", message)
            }
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Convert image store errors to HTTP responses.
impl IntoResponse for ImageError {
    fn into_response(self) -> Response {
        let status = match &self {
            ImageError::UnsupportedType(_)
            | ImageError::TooLarge { .. }
            | ImageError::MissingFile => StatusCode::BAD_REQUEST,
            ImageError::NotFound(_) => StatusCode::NOT_FOUND,
            ImageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();

        match &self {
            ImageError::Io(_) => error!(status = status.as_u16(), "image I/O error: {}", message),
            ImageError::NotFound(_) => {
                debug!(status = status.as_u16(), "image not found: {}", message)
            }
            _ => warn!(status = status.as_u16(), "upload rejected: {}", message),
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Session Handlers
// =============================================================================

/// Handle `POST /login`.
///
/// On success the session token is returned in the `x-session-id` response
/// header and a `session_id` cookie; the body is the success envelope.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, crate::session::AuthError> {
    let token = state.auth.login(&request.password).await?;

    let mut response = Json(MessageResponse::new("Login successful")).into_response();
    let headers = response.headers_mut();
    // Tokens are hex, always a valid header value
    headers.insert(SESSION_HEADER, token.parse().unwrap());
    headers.insert(
        header::SET_COOKIE,
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token)
            .parse()
            .unwrap(),
    );

    info!("admin logged in");
    Ok(response)
}

/// Handle `POST /logout`. Revoking an unknown or absent token is a no-op.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<MessageResponse> {
    if let Some(token) = extract_token(&headers) {
        state.auth.logout(&token).await;
    }
    Json(MessageResponse::new("Logged out"))
}

/// Handle `GET /check-auth`.
pub async fn check_auth_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<CheckAuthResponse> {
    let token = extract_token(&headers).unwrap_or_default();
    Json(CheckAuthResponse {
        success: true,
        is_authenticated: state.auth.authorize(&token).await,
    })
}

// =============================================================================
// Product Handlers
// =============================================================================

/// Handle `GET /products`.
pub async fn list_products_handler(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>, CatalogError> {
    let products = state.products.list().await?;
    let total = products.len();
    Ok(Json(ProductsResponse {
        success: true,
        products,
        total,
    }))
}

/// Handle `GET /products/{id}`.
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, CatalogError> {
    let product = state.products.get(&id).await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// Handle `POST /add-product` (gated).
pub async fn add_product_handler(
    State(state): State<AppState>,
    Json(new): Json<NewProduct>,
) -> Result<Json<AddProductResponse>, CatalogError> {
    let product = state.products.create(new).await?;
    let total_products = state.products.list().await?.len();

    info!(id = %product.id, name = %product.name, total = total_products, "product added");

    Ok(Json(AddProductResponse {
        success: true,
        message: "Product added successfully".to_string(),
        product,
        total_products,
    }))
}

/// Handle `DELETE /products/{id}` (gated).
///
/// The referenced image is deleted best-effort after the record is removed;
/// a missing or undeletable image does not fail the request.
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteProductResponse>, CatalogError> {
    let deleted = state.products.delete(&id).await?;

    state.images.delete(&deleted.img).await;

    info!(id = %deleted.id, name = %deleted.name, "product deleted");

    Ok(Json(DeleteProductResponse {
        success: true,
        message: "Product deleted successfully".to_string(),
        deleted_product: deleted,
    }))
}

// =============================================================================
// Upload Handlers
// =============================================================================

/// Handle `POST /upload-image` (gated).
///
/// Expects a multipart form with an `image` file field. The field is read in
/// chunks and aborted as soon as it exceeds the configured limit, so an
/// oversized upload is rejected with 400 without buffering the whole body.
pub async fn upload_image_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ImageError> {
    let limit = state.images.max_bytes();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ImageError::Io(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !mime.starts_with("image/") {
            return Err(ImageError::UnsupportedType(mime));
        }

        let extension = field
            .file_name()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let mut data = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ImageError::Io(e.to_string()))?
        {
            if data.len() + chunk.len() > limit {
                return Err(ImageError::TooLarge {
                    size: data.len() + chunk.len(),
                    limit,
                });
            }
            data.extend_from_slice(&chunk);
        }

        let filename = state.images.store(&data, &mime, &extension).await?;
        info!(filename = %filename, size = data.len(), "image uploaded");

        return Ok(Json(UploadResponse {
            success: true,
            message: "Image uploaded successfully".to_string(),
            url: format!("/uploads/{}", filename),
            filename,
        }));
    }

    Err(ImageError::MissingFile)
}

/// Handle `GET /uploads/{filename}` - serve a stored image back.
pub async fn serve_upload_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ImageError> {
    let bytes = state.images.resolve(&filename).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )
        .body(axum::body::Body::from(bytes))
        .unwrap();

    Ok(response)
}

// =============================================================================
// Misc Handlers
// =============================================================================

/// Handle `GET /health`.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes: JSON 404 instead of an empty body.
pub async fn fallback_handler(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("Resource not found: {}", uri.path()))),
    )
}
