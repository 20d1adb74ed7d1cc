//! HTTP Server
//!
//! axum surface over the query service. The service itself is constructed
//! by the caller and shared into request handlers; nothing here loads
//! state lazily behind the API's back.

mod health;
mod routes;

pub use health::{HealthCheck, HealthReport, HealthStatus};

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::Result;
use crate::metrics::Metrics;
use crate::query::QueryService;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub bind: String,

    /// Port number
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5555,
        }
    }
}

impl Config {
    /// Create a new config with custom port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Create a new config with custom bind address
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryService>,
    pub metrics: Arc<Metrics>,
    pub health: Arc<HealthCheck>,
}

/// wordvec HTTP server
pub struct HttpServer {
    config: Config,
    state: AppState,
}

impl HttpServer {
    /// Create a new server over an already constructed query service.
    pub fn new(config: Config, query: Arc<QueryService>) -> Self {
        Self {
            config,
            state: AppState {
                query,
                metrics: Arc::new(Metrics::new()),
                health: Arc::new(HealthCheck::new()),
            },
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/nlp/ping", get(routes::ping))
            .route("/nlp/distance", get(routes::distance))
            .route("/nlp/destinations", get(routes::destinations))
            .route("/nlp/suggestions", get(routes::suggestions))
            .route("/health", get(routes::health))
            .route("/metrics", get(routes::metrics))
            .fallback(routes::not_found)
            .with_state(self.state.clone())
    }

    /// Run the server until a shutdown signal arrives, then release the
    /// store connection on the way out.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.bind, self.config.port);
        let listener = TcpListener::bind(&addr).await?;

        info!("wordvec server listening on {}", addr);

        let query = self.state.query.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        query.store().close().await?;
        info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_config_builders() {
        let config = Config::default().with_bind("127.0.0.1").with_port(8080);
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_router_builds() {
        let store =
            MemoryStore::from_entries(2, [("dog".to_string(), vec![1.0, 0.0])]).unwrap();
        let query = Arc::new(QueryService::new(Arc::new(store)));
        let server = HttpServer::new(Config::default(), query);

        // Router construction wires every route against the shared state
        let _router = server.router();
    }
}
