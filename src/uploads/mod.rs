//! Image store for uploaded product images.
//!
//! Blobs are written under a content directory with generated
//! collision-resistant filenames (`{unix_millis}-{random}{ext}`). Lookups
//! never leave the content directory: filenames containing path separators
//! or parent references are rejected outright.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::ImageError;

/// Filesystem-backed store for uploaded images.
pub struct ImageStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    /// Open (creating if needed) the content directory.
    pub async fn open(root: impl Into<PathBuf>, max_bytes: usize) -> Result<Self, ImageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| ImageError::Io(e.to_string()))?;
        Ok(Self { root, max_bytes })
    }

    /// The configured upload size limit in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Persist an uploaded blob and return its generated filename.
    ///
    /// Fails with [`ImageError::UnsupportedType`] unless `mime` begins with
    /// `image/`, and with [`ImageError::TooLarge`] if the payload exceeds
    /// the configured limit. Nothing is written on failure.
    pub async fn store(
        &self,
        data: &[u8],
        mime: &str,
        original_extension: &str,
    ) -> Result<String, ImageError> {
        if !mime.starts_with("image/") {
            return Err(ImageError::UnsupportedType(mime.to_string()));
        }

        if data.len() > self.max_bytes {
            return Err(ImageError::TooLarge {
                size: data.len(),
                limit: self.max_bytes,
            });
        }

        let filename = generate_filename(original_extension);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| ImageError::Io(e.to_string()))?;

        debug!(filename = %filename, size = data.len(), "stored image");
        Ok(filename)
    }

    /// Best-effort delete. A missing file is a no-op; other failures are
    /// logged and swallowed.
    pub async fn delete(&self, filename: &str) {
        if !is_safe_filename(filename) {
            return;
        }

        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => debug!(filename = %filename, "deleted image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(filename = %filename, "failed to delete image: {}", e),
        }
    }

    /// Read a stored blob back.
    pub async fn resolve(&self, filename: &str) -> Result<Bytes, ImageError> {
        if !is_safe_filename(filename) {
            return Err(ImageError::NotFound(filename.to_string()));
        }

        match tokio::fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ImageError::NotFound(filename.to_string()))
            }
            Err(e) => Err(ImageError::Io(e.to_string())),
        }
    }
}

/// Generate a unique filename: millisecond timestamp, random integer, and
/// the sanitized original extension.
fn generate_filename(original_extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}{}", millis, suffix, sanitize_extension(original_extension))
}

/// Keep only a plausible extension: a single leading dot and alphanumerics.
fn sanitize_extension(extension: &str) -> String {
    let trimmed = extension.trim_start_matches('.');
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return String::new();
    }
    format!(".{}", trimmed.to_ascii_lowercase())
}

/// A stored filename must be a single path component.
fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains('/')
        && !filename.contains('\\')
}

/// Guess a Content-Type from a stored filename's extension.
pub fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Tests
// =============================================================================
