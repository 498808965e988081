//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the device handlers
//! - Wire up middleware (request ID, tracing, timeout, logging, auth)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{AuthConfig, ServiceConfig};
use crate::devices::{DeviceService, DeviceStore, MemoryStore};
use crate::http::handlers;
use crate::http::middleware::{basic_auth_middleware, logging_middleware};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub devices: DeviceService,
    pub auth: AuthConfig,
    pub body_limit: usize,
}

/// HTTP server for the device registry.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server backed by an empty in-memory store.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create a server over an existing store.
    pub fn with_store(config: ServiceConfig, store: Arc<dyn DeviceStore>) -> Self {
        let state = AppState {
            devices: DeviceService::new(store),
            auth: config.auth.clone(),
            body_limit: config.http_server.body_limit_bytes,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let timeout = Duration::from_secs(config.http_server.timeout_secs);

        Router::new()
            .route("/getDevice", any(handlers::get_device))
            .route("/createDevice", any(handlers::create_device))
            .route("/updateDevice", any(handlers::update_device))
            .route("/deleteDevice", any(handlers::delete_device))
            .layer(middleware::from_fn_with_state(state.clone(), basic_auth_middleware))
            .layer(middleware::from_fn_with_state(state.clone(), logging_middleware))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(timeout))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// A clone of the fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auth_enabled = self.config.auth.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
