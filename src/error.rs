use thiserror::Error;

/// Errors from the product repository.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// A required field is missing or empty (should map to HTTP 400)
    #[error("Missing required field: {field}")]
    Validation { field: &'static str },

    /// No product with the given id exists
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The backing store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors from the image store.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    /// The uploaded payload is not an image
    #[error("Unsupported media type: {0} (only image/* is accepted)")]
    UnsupportedType(String),

    /// The uploaded payload exceeds the configured size limit
    #[error("Image too large: {size} bytes (limit: {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    /// The request contained no image file field
    #[error("No image file uploaded")]
    MissingFile,

    /// No stored image with the given filename exists
    #[error("Image not found: {0}")]
    NotFound(String),

    /// Filesystem error while reading or writing the blob
    #[error("I/O error: {0}")]
    Io(String),
}
