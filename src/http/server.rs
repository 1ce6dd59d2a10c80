//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the built-in handlers and caller routes
//! - Wire up middleware (tracing, request ID, CORS, panic recovery)
//! - Bind server to listener and drain on shutdown

use axum::{
    extract::State,
    http::{Method, Uri},
    middleware,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ConfigStore;
use crate::http::error::AppError;
use crate::http::middleware::{cors_middleware, recovery_layer};
use crate::http::request::UuidRequestId;
use crate::http::response::ApiResponse;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigStore>,
}

/// Payload of `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub version: String,
    pub mode: String,
    pub generation: u64,
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    config: Arc<ConfigStore>,
}

impl HttpServer {
    /// Server with only the built-in routes.
    pub fn new(config: Arc<ConfigStore>) -> Self {
        Self::with_routes(config, Router::new())
    }

    /// Server with caller routes merged next to the built-in ones.
    pub fn with_routes(config: Arc<ConfigStore>, routes: Router) -> Self {
        let state = AppState {
            config: config.clone(),
        };
        let router = Self::build_router(state, routes);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, routes: Router) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/status", get(status_handler))
            .with_state(state)
            .merge(routes)
            .method_not_allowed_fallback(method_not_allowed_handler)
            .fallback(not_found_handler)
            .layer(recovery_layer())
            .layer(middleware::from_fn(cors_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let snapshot = self.config.snapshot();
        tracing::info!(
            address = %addr,
            name = %snapshot.server.name,
            mode = snapshot.server.server_mode().as_str(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config store.
    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }
}

async fn health_handler() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "status": "ok" }))
}

async fn status_handler(State(state): State<AppState>) -> ApiResponse<ServiceStatus> {
    let current = state.config.versioned();
    ApiResponse::success(ServiceStatus {
        name: current.config.server.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: current.config.server.server_mode().as_str().to_string(),
        generation: current.generation,
    })
}

async fn not_found_handler(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "No route matched");
    AppError::NotFound(format!("no route for {}", uri.path()))
}

async fn method_not_allowed_handler(method: Method, uri: Uri) -> AppError {
    tracing::debug!(%method, path = %uri.path(), "Method not allowed");
    AppError::MethodNotAllowed(format!("{method} not allowed on {}", uri.path()))
}
