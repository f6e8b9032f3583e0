//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one lazily built handler per mount
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener
//! - Stop accepting on the shutdown signal

use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::handler::HandlerService;
use crate::http::mount::lazy_mount;
use crate::lifecycle::ShutdownSignal;

/// HTTP server exposing the configured mounts.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// No mount handler is built here; each is built by its first request.
    pub fn new(config: ServerConfig) -> Self {
        let router = Self::build_router(&config);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig) -> Router {
        let mut router = Router::new();
        for mount in &config.mounts {
            tracing::debug!(prefix = %mount.path_prefix, "Registering lazy mount");
            let service = HandlerService::new(lazy_mount(mount.clone()))
                .with_body_limit(config.limits.max_body_bytes);
            router = router.nest_service(mount.path_prefix.trim_end_matches('/'), service);
        }

        router
            .fallback(not_found)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mounts = self.config.mounts.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "No handler mounted for this path")
}
