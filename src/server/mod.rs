//! HTTP surface.
//!
//! - `POST /CodingChallenge/processFile`: multipart upload, guarded by `X-Api-Key`
//! - `GET /health`: unauthenticated liveness probe
//!
//! The upload handler buffers every file part, hands them to the [`Dispatcher`] on a blocking
//! thread, and answers `text/plain` with one line per file.

pub mod auth;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServiceConfig;
use crate::dispatch::{CompositeObserver, Dispatcher, TracingObserver, TransformObserver};
use crate::error::ServiceError;
use crate::metrics::FileMetrics;

pub use auth::{ApiKeyValidator, API_KEY_HEADER};

/// Path of the upload endpoint.
pub const PROCESS_FILE_PATH: &str = "/CodingChallenge/processFile";

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Arc<FileMetrics>,
    pub api_key: Arc<ApiKeyValidator>,
}

impl AppState {
    /// Build state from config.
    ///
    /// The dispatcher reports to `metrics` and to `tracing`. Fails when no API key is configured.
    pub fn from_config(config: &ServiceConfig, metrics: Arc<FileMetrics>) -> Result<Self, ServiceError> {
        let api_key = ApiKeyValidator::new(config.auth.api_key.clone().unwrap_or_default())?;

        let mut observers: Vec<Arc<dyn TransformObserver>> = Vec::new();
        observers.push(metrics.clone());
        observers.push(Arc::new(TracingObserver));

        let mut options = config.dispatch_options();
        options.observer = Some(Arc::new(CompositeObserver::new(observers)));

        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(options)),
            metrics,
            api_key: Arc::new(api_key),
        })
    }
}

/// Build the router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let protected = Router::new()
        .route(PROCESS_FILE_PATH, post(routes::process_files))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));

    Router::new()
        .route("/health", get(routes::health))
        .merge(protected)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.server.bind` and serve until Ctrl-C.
pub async fn serve(config: ServiceConfig) -> Result<(), ServiceError> {
    let metrics = Arc::new(FileMetrics::new());
    let state = AppState::from_config(&config, metrics.clone())?;
    let app = router(state, config.server.max_upload_bytes);

    let listener = TcpListener::bind(config.server.bind).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(metrics = %metrics.snapshot(), "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
