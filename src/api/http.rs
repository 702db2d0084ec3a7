use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::{ApiFailure, FieldError};
use super::validate;
use crate::config::HttpServerConfig;
use crate::engine::{
    GraphExplorer, GraphResponse, OneHopRequest, PathResponse, ResolveRequest, ResolveResponse,
    ShortestPathRequest,
};
use crate::error::{GraphError, Result};

/// HTTP front end over a [`GraphExplorer`]
pub struct HttpServer {
    explorer: GraphExplorer,
    host: String,
    port: u16,
    allowed_origins: Vec<String>,
}

impl HttpServer {
    pub fn new(explorer: GraphExplorer, config: &HttpServerConfig) -> Self {
        Self {
            explorer,
            host: config.host.clone(),
            port: config.port,
            allowed_origins: config.allowed_origins.clone(),
        }
    }

    /// Bind and serve until the process is stopped
    pub async fn run(&self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            GraphError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;

        log::info!("Graph API listening on http://{}", addr);
        log::info!("Endpoints: POST /api/v1/graph/{{one-hop,resolve,shortest-path}}, GET /health");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| GraphError::Io(std::io::Error::new(std::io::ErrorKind::Other, format!("HTTP server error: {}", e))))?;

        Ok(())
    }

    pub fn router(&self) -> Router {
        create_router(self.explorer.clone(), &self.allowed_origins)
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    explorer: GraphExplorer,
}

/// Build the API router.
///
/// With no configured origins every origin is allowed; otherwise CORS is
/// restricted to the listed ones.
pub fn create_router(explorer: GraphExplorer, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    log::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/api/v1/graph/one-hop", post(handle_one_hop))
        .route("/api/v1/graph/resolve", post(handle_resolve))
        .route("/api/v1/graph/shortest-path", post(handle_shortest_path))
        .route("/health", get(handle_health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(AppState { explorer })
}

fn check(fields: Vec<FieldError>) -> std::result::Result<(), ApiFailure> {
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiFailure::validation(fields))
    }
}

async fn handle_one_hop(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OneHopRequest>, JsonRejection>,
) -> std::result::Result<Json<GraphResponse>, ApiFailure> {
    let Json(request) = payload?;
    check(validate::one_hop(&request))?;
    Ok(Json(state.explorer.one_hop(request).await?))
}

async fn handle_resolve(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ResolveRequest>, JsonRejection>,
) -> std::result::Result<Json<ResolveResponse>, ApiFailure> {
    let Json(request) = payload?;
    check(validate::resolve(&request))?;
    Ok(Json(state.explorer.resolve(request).await?))
}

async fn handle_shortest_path(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortestPathRequest>, JsonRejection>,
) -> std::result::Result<Json<PathResponse>, ApiFailure> {
    let Json(request) = payload?;
    check(validate::shortest_path(&request))?;
    Ok(Json(state.explorer.shortest_path(request).await?))
}

/// `OK` when the store answers a probe, `NOT_OK` with 503 otherwise.
async fn handle_health(State(state): State<AppState>) -> Response {
    match state.explorer.store().ping().await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            log::warn!("Health probe failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "NOT_OK").into_response()
        }
    }
}
