//! # Run Log Endpoints
//!
//! | Endpoint | Response |
//! |----------|----------|
//! | `GET /logs` | JSON array of every run record, oldest first |
//! | `GET /logs/{id}` | a single run record, or 404 |
//!
//! Record fields: `id, timestamp, range_start, range_end, time_elapsed,
//! algorithm, num_primes, primes`.

use super::{error_response, AppState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

/// `GET /logs` — the full run history.
pub(super) async fn handler_logs(State(state): State<Arc<AppState>>) -> Response {
    match state.db.list_runs().await {
        Ok(runs) => Json(runs).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

/// `GET /logs/{id}` — one run by id.
pub(super) async fn handler_log_get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    match state.db.get_run(id).await {
        Ok(Some(run)) => Json(run).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "run not found"),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}
