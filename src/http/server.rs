//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the rule registry and routes from configuration
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Apply each matched route's header rules to the outgoing request
//! - Forward requests to the origin and stream responses back

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::join;
use crate::config::{register_rules, ProxyConfig, ValidationError};
use crate::headers::{HeaderInjector, Injection, RuleRegistry};
use crate::http::request::{request_id, X_REQUEST_ID};
use crate::routing::{RouteError, Router as ProxyRouter};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("header rules rejected: {}", join(.0))]
    Rules(Vec<ValidationError>),

    #[error("route rejected: {0}")]
    Route(#[from] RouteError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub injector: HeaderInjector,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    rules: RuleRegistry,
}

impl HttpServer {
    /// Create a server that reports rule failures through `tracing`.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        Self::with_injector(config, HeaderInjector::default())
    }

    /// Create a server with a caller-provided injector (and its diagnostic sink).
    pub fn with_injector(config: ProxyConfig, injector: HeaderInjector) -> Result<Self, ServerError> {
        let rules = register_rules(&config).map_err(ServerError::Rules)?;
        let proxy_router = Arc::new(ProxyRouter::build(&config, &rules)?);

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            router: proxy_router,
            injector,
            client,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            rules,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// Run the server until Ctrl+C or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.rules.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The active header rules.
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }
}

/// Main proxy handler.
/// Looks up the route, applies its header rules, and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers);

    let route = match state.router.match_request(&parts) {
        Some(r) => r,
        None => {
            tracing::warn!(request_id = %request_id, path = %parts.uri.path(), "No route matched");
            return (StatusCode::NOT_FOUND, "No matching route found").into_response();
        }
    };

    for rule in &route.rules {
        let outcome = state.injector.apply(rule, &mut parts.headers);
        if outcome == Injection::Abandoned {
            tracing::warn!(
                request_id = %request_id,
                route = %route.name,
                rule = %rule.label(),
                "Header rule skipped after failure"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                route = %route.name,
                rule = %rule.label(),
                outcome = ?outcome,
                "Header rule applied"
            );
        }
    }

    // URI rewrite
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Authority::from_str(&route.backend.to_string()).ok();
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream URI").into_response();
        }
    };

    let backend = route.backend;
    tracing::debug!(request_id = %request_id, backend = %backend, uri = %parts.uri, "Forwarding request");

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, backend = %backend, error = %e, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Wait for Ctrl+C or a shutdown broadcast.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}
