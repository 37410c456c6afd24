//! # Dashboard — HTTP Gateway
//!
//! Runs an Axum HTTP server in front of the prime engine: decodes a range and
//! an algorithm id from the query string, runs the engine on a blocking
//! thread, records the run in the SQLite run log, and returns JSON. A second
//! endpoint serves the run history.
//!
//! | Endpoint | Purpose |
//! |----------|---------|
//! | `GET /primes?start&end&algorithm` | compute, log, and return primes |
//! | `GET /logs` | full run history, oldest first |
//! | `GET /logs/{id}` | a single run |
//! | `GET /algorithms` | valid algorithm ids and the range limit |
//! | `GET /healthz`, `/readyz`, `/metrics` | probes and Prometheus scrape |

mod routes_health;
mod routes_logs;
mod routes_primes;

pub use routes_primes::PrimesResponse;

use crate::config::Config;
use crate::engine::PrimeEngine;
use crate::{db, prom_metrics};
use anyhow::Result;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Instrument};

pub struct AppState {
    pub db: db::Database,
    pub engine: PrimeEngine,
    pub request_timeout: Duration,
    pub prom_metrics: prom_metrics::Metrics,
}

impl AppState {
    pub fn new(db: db::Database, config: &Config) -> Arc<Self> {
        Arc::new(AppState {
            db,
            engine: config.engine(),
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
            prom_metrics: prom_metrics::Metrics::new(),
        })
    }
}

/// `{"error": msg}` with the given status.
pub(super) fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (
        status,
        Json(serde_json::json!({"error": message.to_string()})),
    )
        .into_response()
}

/// Middleware that records HTTP request duration into the Prometheus histogram,
/// generates (or propagates) a request ID for correlation, and wraps the
/// request in a tracing span using `.instrument()` for proper async propagation.
async fn metrics_middleware(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let raw_path = req.uri().path().to_string();
    let norm_path = normalize_path(&raw_path);
    let start = std::time::Instant::now();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %raw_path,
    );
    let mut response = next.run(req).instrument(span).await;

    let duration = start.elapsed().as_secs_f64();
    state
        .prom_metrics
        .http_request_duration
        .get_or_create(&prom_metrics::HttpLabel {
            method,
            path: norm_path,
        })
        .observe(duration);

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Collapse numeric path segments (run ids) into `:id` so the latency
/// histogram keeps a bounded label set.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|seg| {
            if !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                seg
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let request_timeout = state.request_timeout;
    Router::new()
        .route("/primes", get(routes_primes::handler_primes))
        .route("/algorithms", get(routes_primes::handler_algorithms))
        .route("/logs", get(routes_logs::handler_logs))
        .route("/logs/{id}", get(routes_logs::handler_log_get))
        .route("/healthz", get(routes_health::handler_healthz))
        .route("/readyz", get(routes_health::handler_readyz))
        .route("/metrics", get(routes_health::handler_metrics))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CatchPanicLayer::new())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

/// Connect the run log, bind, and serve until SIGINT/SIGTERM.
pub async fn run(config: &Config, database_url: &str) -> Result<()> {
    let database = db::Database::connect(database_url).await?;
    let state = AppState::new(database.clone(), config);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        addr = %addr,
        max_end = config.engine.max_end,
        max_end_division = config.engine.max_end_division,
        database = database_url,
        "gateway running"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    database.close().await;
    info!("gateway shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT, shutting down"),
                    _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                ctrl_c.await.ok();
                info!("received SIGINT, shutting down");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("received SIGINT, shutting down");
    }
}
