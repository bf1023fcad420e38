use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use sitevoice_types::{EditRequest, EditResponse};

use crate::{ApiError, Result, ServerState};

pub const ORCHESTRATOR_PATH: &str = "/orchestrator";
/// Path used by the hosted function deployment; kept so existing clients work.
pub const LEGACY_ORCHESTRATOR_PATH: &str = "/.netlify/functions/orchestrator";

pub fn router() -> Router<Arc<ServerState>> {
    Router::new()
        .route("/health", get(health))
        .route(ORCHESTRATOR_PATH, orchestrator_route())
        .route(LEGACY_ORCHESTRATOR_PATH, orchestrator_route())
}

fn orchestrator_route() -> MethodRouter<Arc<ServerState>> {
    post(orchestrate).fallback(method_not_allowed)
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// An empty body is an empty request. A body that is valid JSON but not a
/// request object also reads as an empty request and fails on the command.
fn parse_request(body: &[u8]) -> Result<EditRequest> {
    if body.is_empty() {
        return Ok(EditRequest::default());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value).unwrap_or_default()),
        _ => Ok(EditRequest::default()),
    }
}

async fn orchestrate(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<EditResponse>> {
    let request = parse_request(&body)?;
    let response = state.editor.handle(request).await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
