//! # Prime Generation Endpoint
//!
//! `GET /primes?start=<i64>&end=<i64>&algorithm=<id>` decodes the range and the
//! algorithm id, runs the engine on the blocking pool, times the call, writes
//! the run to the log, and answers with:
//!
//! ```json
//! {"primes": [...], "start": 2, "end": 50, "algorithm": "sieve",
//!  "time_elapsed": 0.000012, "num_primes": 15}
//! ```
//!
//! | Condition | Status | Logged |
//! |-----------|--------|--------|
//! | success (including `start > end`) | 200 | yes |
//! | unknown algorithm id | 400 | no |
//! | missing or non-integer parameter | 400 | no |
//! | `end` above the algorithm's limit | 422 | no |
//! | run log write failure | 500 | no |

use super::{error_response, AppState};
use crate::db::NewRun;
use crate::engine::{Algorithm, EngineError};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Deserialize)]
pub(super) struct PrimesQuery {
    start: i64,
    end: i64,
    algorithm: String,
}

/// Body of a successful `GET /primes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimesResponse {
    pub primes: Vec<u64>,
    pub start: i64,
    pub end: i64,
    pub algorithm: Algorithm,
    /// Seconds spent inside the engine.
    pub time_elapsed: f64,
    pub num_primes: usize,
}

pub(super) async fn handler_primes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PrimesQuery>,
) -> Response {
    let algorithm = match params.algorithm.parse::<Algorithm>() {
        Ok(algorithm) => algorithm,
        Err(e) => {
            state.prom_metrics.reject("unknown_algorithm");
            warn!(algorithm = %params.algorithm, "rejected unknown algorithm");
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };
    let PrimesQuery { start, end, .. } = params;

    let engine = state.engine;
    let outcome = tokio::task::spawn_blocking(move || {
        let timer = Instant::now();
        let result = engine.generate(algorithm, start, end);
        (result, timer.elapsed())
    })
    .await;

    let (result, elapsed) = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, %algorithm, start, end, "engine task failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e);
        }
    };
    let primes = match result {
        Ok(primes) => primes,
        Err(e @ EngineError::RangeTooLarge { .. }) => {
            state.prom_metrics.reject("range_too_large");
            warn!(
                %algorithm,
                start,
                end,
                limit = engine.limit_for(algorithm),
                "rejected oversized range"
            );
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, e);
        }
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let time_elapsed = elapsed.as_secs_f64();
    state
        .prom_metrics
        .observe_generation(algorithm, primes.len(), time_elapsed);

    let run = NewRun {
        range_start: start,
        range_end: end,
        time_elapsed,
        algorithm,
        primes: &primes,
    };
    match state.db.log_run(&run).await {
        Ok(record) => {
            state.prom_metrics.runs_logged.inc();
            info!(
                run_id = record.id,
                %algorithm,
                start,
                end,
                count = primes.len(),
                time_elapsed,
                "primes generated"
            );
        }
        Err(e) => {
            error!(error = %e, %algorithm, start, end, "failed to log run");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e);
        }
    }

    let num_primes = primes.len();
    Json(PrimesResponse {
        primes,
        start,
        end,
        algorithm,
        time_elapsed,
        num_primes,
    })
    .into_response()
}

/// `GET /algorithms` — valid ids for the `algorithm` parameter.
pub(super) async fn handler_algorithms(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ids: Vec<&str> = Algorithm::ALL.iter().map(|a| a.as_str()).collect();
    Json(serde_json::json!({
        "algorithms": ids,
        "max_end": state.engine.max_end(),
        "max_end_division": state.engine.max_end_division(),
    }))
}
