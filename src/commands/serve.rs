//! The `serve` command: expose the grade lookup over HTTP
//!
//! `GET /grades?apogee=…&workers=…` runs the full workflow and returns the
//! two tables as an HTML fragment. Every error kind maps to its own status
//! code so callers can react differently to "no match" and "portal down".

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::PortalConfig;
use crate::error::{Error, SearchError};
use crate::portal::PortalClient;
use crate::render;

/// Shared state for the grade server
struct ServeState {
    config: PortalConfig,
}

/// Query parameters of the grades route
#[derive(Debug, Deserialize)]
struct GradesQuery {
    apogee: Option<String>,
    workers: Option<usize>,
}

/// Start the grade lookup server
pub async fn serve(host: String, port: u16) -> Result<()> {
    let config = PortalConfig::from_env()?;
    config.validate()?;

    let state = Arc::new(ServeState { config });

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/grades", get(grades_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {addr}"))?;

    tracing::info!(%addr, "grade server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Root handler - service description
async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "gradify grade server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "grades": "GET /grades?apogee=<id>[&workers=<n>]"
        }
    }))
}

/// Health check handler
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Run the full workflow for one student and render the tables as HTML
async fn grades_handler(
    State(state): State<Arc<ServeState>>,
    Query(query): Query<GradesQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let Some(apogee) = query.apogee.filter(|a| !a.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Missing apogee parameter".to_string(),
        ));
    };

    let workers = query.workers.unwrap_or(state.config.worker_bound);

    let client = PortalClient::new(state.config.clone())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match client.find_grades(&apogee, &[], workers).await {
        Ok(report) => Ok(Html(render::report_to_html(&report))),
        Err(e) => {
            tracing::warn!(apogee = %apogee, error = %e, "grade lookup failed");
            Err((status_for(&e), e.to_string()))
        }
    }
}

/// Map workflow errors onto distinct HTTP status codes
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Search(SearchError::NoMatch { .. }) => StatusCode::NOT_FOUND,
        Error::Search(SearchError::Unreachable { .. }) => StatusCode::BAD_GATEWAY,
        Error::Config(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
