//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers around one injected
//! subscription registry.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::observability_routes::{health_routes, observability_routes};
use super::realtime_routes::{realtime_routes, RealtimeState};
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::realtime::SubscriptionRegistry;

/// HTTP server for the token relay
pub struct HttpServer {
    config: HttpServerConfig,
    registry: SubscriptionRegistry,
    shutdown: CancellationToken,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpServerConfig::default())
    }

    /// Create a new HTTP server with custom configuration and a fresh registry
    pub fn with_config(config: HttpServerConfig) -> Self {
        let registry = SubscriptionRegistry::with_limits(
            Arc::new(MetricsRegistry::new()),
            config.verified_capacity,
        );
        Self::with_registry(config, registry)
    }

    /// Create a new HTTP server around an existing registry
    pub fn with_registry(config: HttpServerConfig, registry: SubscriptionRegistry) -> Self {
        let shutdown = CancellationToken::new();
        let router = Self::build_router(&config, &registry, &shutdown);
        Self {
            config,
            registry,
            shutdown,
            router,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(
        config: &HttpServerConfig,
        registry: &SubscriptionRegistry,
        shutdown: &CancellationToken,
    ) -> Router {
        let realtime_state = Arc::new(RealtimeState::new(
            registry.clone(),
            config.keep_alive(),
            shutdown.clone(),
        ));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let token_routes = realtime_routes(realtime_state);
        let router = if config.route_prefix == "/" {
            Router::new().merge(token_routes)
        } else {
            Router::new().nest(&config.route_prefix, token_routes)
        };

        router
            .merge(health_routes())
            .nest("/observability", observability_routes(registry.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Registry shared by all handlers
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until ctrl-c
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        log_event(Event::Serving);
        info!(
            %addr,
            stream = %format!("{}/stream/{{token}}", self.config.route_prefix),
            verify = %format!("{}/verify/{{token}}", self.config.route_prefix),
            "listening"
        );

        self.serve(listener, ctrl_c()).await
    }

    /// Serve on an already bound listener until `signal` resolves
    ///
    /// Once the signal fires, every open stream is ended so the graceful
    /// drain can complete and each subscription's close hook runs.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                signal.await;
                log_event(Event::ShutdownStart);
                shutdown.cancel();
            })
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
