//! Core library for the organization file service: file lifecycle domain,
//! record stores and the HTTP surface over them.

pub mod config;
pub mod database;
pub mod error;
pub mod extractors;
pub mod files;
pub mod handlers;
pub mod middleware;
pub mod store;

pub use config::AppConfig;
pub use database::{DatabaseManager, get_database_pool, run_migrations};
pub use error::{AppError, Result};
pub use files::{
    classify, CreateFileRequest, FileKind, FileLifecycleManager, FileRecord, FileRecordStore,
    SqliteFileRepository, UploadTarget, UploadTargetIssuer,
};
pub use handlers::routes::create_routes;
pub use store::MemoryFileStore;

use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub file_manager: FileLifecycleManager,
    pub db_manager: Option<DatabaseManager>,
}

impl AppState {
    pub fn new(file_manager: FileLifecycleManager) -> Self {
        Self {
            app_name: "Drive File Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            file_manager,
            db_manager: None,
        }
    }

    /// State backed by a process-local store.
    pub fn in_memory(issuer: UploadTargetIssuer) -> Self {
        Self::new(FileLifecycleManager::new(Arc::new(MemoryFileStore::new()), issuer))
    }

    /// State backed by SQLite; runs pending migrations first.
    pub async fn with_database(db_manager: DatabaseManager, issuer: UploadTargetIssuer) -> Result<Self> {
        run_migrations(db_manager.pool().clone()).await?;

        let repository = SqliteFileRepository::new(db_manager.pool().clone());
        let mut state = Self::new(FileLifecycleManager::new(Arc::new(repository), issuer));
        state.db_manager = Some(db_manager);

        Ok(state)
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let issuer = UploadTargetIssuer::from_config(&config.uploads);

        if config.database.is_memory() {
            info!("Using in-memory file store");
            return Ok(Self::in_memory(issuer));
        }

        let pool = get_database_pool(&config.database).await?;
        Self::with_database(DatabaseManager::new(pool), issuer).await
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    let router = create_routes()
        .layer(middleware::cors::cors_layer_from_config(&config.cors));

    middleware::logging::with_request_logging(router).with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
