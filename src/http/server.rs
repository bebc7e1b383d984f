//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the API handlers and static assets
//! - Wire up middleware (request ID, tracing, body limit)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::assets;
use crate::http::relay::{search_handler, Upstream, UpstreamSetupError};
use crate::http::request::{make_request_span, MakeRequestUuidV4};
use crate::http::settings::{config_handler, ClientSettings};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<Upstream>,
    pub client_settings: Arc<ClientSettings>,
}

impl AppState {
    pub fn from_config(config: &RelayConfig) -> Result<Self, UpstreamSetupError> {
        Ok(Self {
            upstream: Arc::new(Upstream::from_config(&config.upstream)?),
            client_settings: Arc::new(ClientSettings::from(&config.client)),
        })
    }
}

/// HTTP server for the search relay.
pub struct HttpServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, UpstreamSetupError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config: Arc::new(config),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/search", post(search_handler))
            .route("/api/config", get(config_handler))
            .route_service("/", assets::index_service(&config.assets))
            .fallback_service(assets::asset_service(&config.assets))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
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
            endpoint = %self.upstream_host(),
            asset_root = %self.config.assets.root,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for serving through other means.
    pub fn into_router(self) -> Router {
        self.router
    }

    fn upstream_host(&self) -> String {
        self.config
            .upstream
            .resolve_endpoint()
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}
