//! Server setup and initialization
//!
//! Builds the dependency graph from configuration, wires the router and runs
//! the server until a shutdown signal arrives.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracker_common::{AppConfig, AppError, JwtService};
use tracker_db::{
    create_pool, run_migrations, spawn_token_reaper, PgTokenRepository, PgUserRepository,
    PgWorkspaceRepository,
};
use tracker_service::{ServiceContext, ServiceContextBuilder, ServiceSettings};
use tracker_storage::{S3Storage, S3StorageConfig};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_rate_limit(create_router(), &config.rate_limit);
    let router = health_routes().merge(api);
    apply_middleware(router, config).with_state(state)
}

/// Build the application around an already assembled service context
///
/// Used when the adapters are chosen by the caller, e.g. in-memory ones.
pub fn build_app(service_context: ServiceContext, config: AppConfig) -> Router {
    create_app(AppState::new(service_context, config))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("migrations failed: {e}")))?;
        info!("Database migrations applied");
    }

    let private_pem = config
        .jwt
        .read_private_key()
        .map_err(|e| AppError::Config(e.to_string()))?;
    let public_pem = config
        .jwt
        .read_public_key()
        .map_err(|e| AppError::Config(e.to_string()))?;
    let jwt_service = Arc::new(JwtService::new(&private_pem, &public_pem)?);

    let storage = S3Storage::new(S3StorageConfig::from(&config.storage))
        .await
        .map_err(|e| AppError::Config(e.to_string()))?;
    info!(bucket = %storage.bucket(), "Object storage client ready");

    let timeout = config.database.request_timeout();
    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .user_repo(Arc::new(PgUserRepository::with_timeout(pool.clone(), timeout)))
        .token_repo(Arc::new(PgTokenRepository::with_timeout(pool.clone(), timeout)))
        .workspace_repo(Arc::new(PgWorkspaceRepository::with_timeout(pool, timeout)))
        .storage(Arc::new(storage))
        .jwt_service(jwt_service)
        .settings(ServiceSettings::from_config(&config))
        .build()?;

    Ok(AppState::new(service_context, config))
}

/// Resolve when Ctrl-C or SIGTERM is received
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();
    let reaper_interval = config.database.token_reaper_interval();

    let state = create_app_state(config).await?;
    let pool = state.service_context().pool().cloned();
    let reaper = spawn_token_reaper(state.service_context().token_repo_handle(), reaper_interval);

    let app = create_app(state);

    let listener = TcpListener::bind(addr.as_str())
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;
    info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Server error: {e}")));

    reaper.abort();
    if let Some(pool) = pool {
        pool.close().await;
        info!("Database pool closed");
    }

    served
}
