//! Catalog Server - product-catalog admin backend.
//!
//! This binary parses configuration, wires the configured storage backends
//! together, and starts the HTTP server.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_server::{
    config::{Config, ProductBackend, SessionBackend},
    server::{create_router, AppState, RouterConfig},
    session::{AuthGate, FileSessionStore, MemorySessionStore, SessionStore},
    uploads::ImageStore,
    JsonFileProductStore, MemoryProductStore, ProductStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Product store: {:?}", config.product_store);
    info!("  Session store: {:?}", config.session_store);
    info!("  Upload dir: {}", config.upload_dir.display());
    info!(
        "  Upload limit: {}MB",
        config.upload_limit / (1024 * 1024)
    );
    info!("  Session TTL: {}s", config.session_ttl);

    let (password, is_default_password) = config.admin_password();
    if is_default_password {
        warn!("  Admin password: DEFAULT - do not use in production");
        warn!("    Set --admin-password or CATALOG_ADMIN_PASSWORD");
    } else {
        info!("  Admin password: configured");
    }

    // Product repository
    let products: Arc<dyn ProductStore> = match config.product_store {
        ProductBackend::Memory => {
            warn!("  In-memory product store: records are lost on restart");
            Arc::new(MemoryProductStore::new())
        }
        ProductBackend::Json => {
            match JsonFileProductStore::open(config.products_path()).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Failed to open product store: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    // Session store and auth gate
    let sessions: Arc<dyn SessionStore> = match config.session_store {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::File => match FileSessionStore::open(config.sessions_path()).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                error!("Failed to open session store: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };
    let auth = AuthGate::new(password, sessions, Duration::from_secs(config.session_ttl));

    // Image store
    let images = match ImageStore::open(&config.upload_dir, config.upload_limit).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to open upload directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(products, images, auth).with_cache_max_age(config.cache_max_age);

    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    let router = create_router(state, router_config);

    let addr = config.bind_address();

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("  Product API: http://{}/products", addr);
    info!("  Health:      http://{}/health", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "catalog_server=debug,tower_http=debug"
    } else {
        "catalog_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
