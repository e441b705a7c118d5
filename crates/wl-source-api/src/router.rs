//! HTTP surface.
//!
//! `POST /sources/:id/update` runs the update workflow. `GET /health` and
//! `GET /metrics` are operational endpoints without authentication.

use crate::domain::outcome::UpdateOutcome;
use crate::metrics::HandlerMetrics;
use crate::ports::inbound::{SourceUpdateApi, UpdateRequest};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn SourceUpdateApi>,
    pub metrics: Arc<HandlerMetrics>,
}

impl AppState {
    pub fn new(api: Arc<dyn SourceUpdateApi>, metrics: Arc<HandlerMetrics>) -> Self {
        Self { api, metrics }
    }
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sources/:id/update", post(handle_update))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for UpdateOutcome {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body())).into_response();

        if matches!(self, UpdateOutcome::Unauthorized) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Header value as text. Non-text values count as absent.
fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Handle an update request
async fn handle_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<String>, PathRejection>,
) -> UpdateOutcome {
    // An undecodable id cannot name a source; the workflow reports it after auth.
    let source_id = id.ok().map(|Path(id)| id);
    state
        .api
        .request_update(UpdateRequest::new(authorization(&headers), source_id))
        .await
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Outcome counters
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}

/// Unmatched routes.
///
/// `POST /sources//update` has an empty id segment that the path router
/// cannot match; it still goes through the workflow so auth runs first.
async fn fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let empty_id = uri
        .path()
        .strip_prefix("/sources/")
        .and_then(|rest| rest.strip_suffix("/update"))
        .is_some_and(str::is_empty);

    if method == Method::POST && empty_id {
        return state
            .api
            .request_update(UpdateRequest::new(authorization(&headers), None))
            .await
            .into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": "Not found" })),
    )
        .into_response()
}
