//! # HTTP Server
//!
//! Combines every route module under `/api` and serves it until a shutdown
//! signal arrives.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::store::DocumentStore;

use super::admin_routes::admin_routes;
use super::config::HttpServerConfig;
use super::content_routes::content_routes;
use super::course_routes::course_routes;
use super::observability_routes::{health_routes, observability_routes};
use super::state::AppState;
use super::user_routes::user_routes;

pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, store: Arc<DocumentStore>) -> Self {
        let state = AppState::new(store, config.list_limit);
        let router = Self::build_router(&config, state.clone());
        Self {
            config,
            state,
            router,
        }
    }

    fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
        if config.cors_origins.is_empty() {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
        }

        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }

    fn build_router(config: &HttpServerConfig, state: AppState) -> Router {
        let api = Router::new()
            .merge(health_routes())
            .merge(observability_routes(state.clone()))
            .merge(course_routes(state.clone()))
            .merge(user_routes(state.clone()))
            .merge(content_routes(state.clone()))
            .merge(admin_routes(state));

        Router::new()
            .nest("/api", api)
            .layer(Self::cors_layer(config))
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    pub async fn start<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        log_event_with_fields(Event::Serving, &[("addr", &addr)]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            Logger::error(Event::SignalHandlerFailed.as_str(), &[("error", &e.to_string())]);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                Logger::error(Event::SignalHandlerFailed.as_str(), &[("error", &e.to_string())]);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log_event(Event::ShutdownStart);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog;

    fn store() -> Arc<DocumentStore> {
        Arc::new(DocumentStore::in_memory(&catalog()))
    }

    #[test]
    fn test_server_socket_addr() {
        let server = HttpServer::new(HttpServerConfig::with_port(8080), store());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
        assert_eq!(server.state().list_limit, 50);
    }

    #[test]
    fn test_router_builds_with_and_without_origins() {
        let permissive = HttpServerConfig {
            cors_origins: vec![],
            ..HttpServerConfig::default()
        };
        let _ = HttpServer::new(permissive, store()).router();
        let _ = HttpServer::new(HttpServerConfig::default(), store()).router();
    }
}
