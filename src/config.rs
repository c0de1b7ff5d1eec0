//! Configuration management for the catalog server.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `CATALOG_` prefix
//! - Sensible defaults for local development
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the
//! `CATALOG_` prefix:
//!
//! - `CATALOG_HOST` - Server bind address (default: 0.0.0.0)
//! - `CATALOG_PORT` - Server port (default: 3000)
//! - `CATALOG_ADMIN_PASSWORD` - Administrator password (required in production)
//! - `CATALOG_PRODUCT_STORE` - Product store backend: `memory` or `json` (default: json)
//! - `CATALOG_SESSION_STORE` - Session store backend: `memory` or `file` (default: memory)
//! - `CATALOG_DATA_DIR` - Directory for persisted state (default: data)
//! - `CATALOG_UPLOAD_DIR` - Directory for uploaded images (default: uploads)
//! - `CATALOG_UPLOAD_LIMIT` - Upload size limit in bytes (default: 10485760)
//! - `CATALOG_SESSION_TTL` - Session lifetime in seconds (default: 86400)
//! - `CATALOG_CORS_ORIGINS` - Comma-separated allowed origins (default: any)
//! - `CATALOG_CACHE_MAX_AGE` - Cache-Control max-age for uploads (default: 3600)

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default upload size limit in bytes (10 MiB).
pub const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Default session lifetime in seconds (24 hours).
pub const DEFAULT_SESSION_TTL: u64 = 86_400;

/// Default HTTP cache max-age for served uploads (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

/// Development-only administrator password, used when none is configured.
///
/// The server logs a loud warning when this is active.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

// =============================================================================
// Backend Selection
// =============================================================================

/// Which product repository backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProductBackend {
    /// In-memory store, lost on restart. Development and testing only.
    Memory,
    /// JSON-file backed store with durable snapshotting.
    Json,
}

/// Which session store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SessionBackend {
    /// In-process map. Sessions are lost on restart.
    Memory,
    /// JSON-file backed map. Sessions survive restarts.
    File,
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// Catalog Server - a product-catalog admin backend.
///
/// Serves a public product listing plus authenticated endpoints for creating
/// and deleting products and uploading their images.
#[derive(Parser, Debug, Clone)]
#[command(name = "catalog-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "CATALOG_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "CATALOG_PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Administrator password for the login endpoint.
    ///
    /// If not provided, a development-only default is used and a warning is
    /// logged. Real deployments must set this.
    #[arg(long, env = "CATALOG_ADMIN_PASSWORD")]
    pub admin_password: Option<String>,

    /// Session store backend.
    #[arg(long, value_enum, default_value_t = SessionBackend::Memory, env = "CATALOG_SESSION_STORE")]
    pub session_store: SessionBackend,

    /// Session lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_SESSION_TTL, env = "CATALOG_SESSION_TTL")]
    pub session_ttl: u64,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// Product repository backend.
    #[arg(long, value_enum, default_value_t = ProductBackend::Json, env = "CATALOG_PRODUCT_STORE")]
    pub product_store: ProductBackend,

    /// Directory for persisted state (product records, file-backed sessions).
    #[arg(long, default_value = "data", env = "CATALOG_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Directory for uploaded images.
    #[arg(long, default_value = "uploads", env = "CATALOG_UPLOAD_DIR")]
    pub upload_dir: PathBuf,

    /// Maximum accepted upload size in bytes.
    #[arg(long, default_value_t = DEFAULT_UPLOAD_LIMIT, env = "CATALOG_UPLOAD_LIMIT")]
    pub upload_limit: usize,

    // =========================================================================
    // HTTP Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CATALOG_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// HTTP Cache-Control max-age in seconds for served uploads.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "CATALOG_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.upload_limit == 0 {
            return Err("upload_limit must be greater than 0".to_string());
        }

        if self.session_ttl == 0 {
            return Err("session_ttl must be greater than 0".to_string());
        }

        if let Some(ref password) = self.admin_password {
            if password.is_empty() {
                return Err(
                    "admin_password must not be empty. \
                     Unset it to use the development default, or set a real password"
                        .to_string(),
                );
            }
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err("upload_dir must not be empty".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the effective admin password and whether it is the insecure default.
    pub fn admin_password(&self) -> (&str, bool) {
        match self.admin_password.as_deref() {
            Some(password) => (password, false),
            None => (DEFAULT_ADMIN_PASSWORD, true),
        }
    }

    /// Path of the JSON product store file.
    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join("products.json")
    }

    /// Path of the file-backed session store.
    pub fn sessions_path(&self) -> PathBuf {
        self.data_dir.join("sessions.json")
    }
}

// =============================================================================
// Tests
// =============================================================================
