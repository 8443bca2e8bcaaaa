//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, auth gate)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header::InvalidHeaderValue, Request},
    middleware,
    routing::{delete, get},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::relay::relay_handler;
use crate::http::request::{request_id, MakeRelayRequestId, X_REQUEST_ID};
use crate::http::sessions::{clear_sessions, create_session, delete_session, list_sessions};
use crate::http::status::get_status;
use crate::relay::UpstreamFetcher;
use crate::security::auth::{require_user, AuthGate};
use crate::security::headers::EmbeddingHeaders;
use crate::sessions::SessionStore;

/// Error type for server construction.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid embedding header value: {0}")]
    Header(#[from] InvalidHeaderValue),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: UpstreamFetcher,
    pub store: Arc<dyn SessionStore>,
    pub proxy_endpoint: Arc<str>,
    pub embedding_headers: Arc<EmbeddingHeaders>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and session store.
    pub fn new(config: RelayConfig, store: Arc<dyn SessionStore>) -> Result<Self, ServerError> {
        let state = AppState {
            fetcher: UpstreamFetcher::new(&config.upstream)?,
            store,
            proxy_endpoint: config.relay.proxy_endpoint().into(),
            embedding_headers: Arc::new(EmbeddingHeaders::from_config(&config.relay)?),
        };
        let auth = Arc::new(AuthGate::new(&config.auth));

        let router = Self::build_router(&config, state, auth);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState, auth: Arc<AuthGate>) -> Router {
        let gated = Router::new()
            .route(&config.relay.endpoint_path, get(relay_handler))
            .route(
                "/api/sessions",
                get(list_sessions).post(create_session).delete(clear_sessions),
            )
            .route("/api/sessions/{id}", delete(delete_session))
            .route_layer(middleware::from_fn_with_state(auth, require_user));

        Router::new()
            .route("/health", get(get_status))
            .merge(gated)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRelayRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %request_id(req.headers()),
                            method = %req.method(),
                            path = %req.uri().path(),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint = %self.config.relay.endpoint_path,
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
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The fully layered router, for serving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }
}
