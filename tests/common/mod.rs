//! Shared test helpers for integration tests.

#![allow(dead_code)]

use primegen::config::Config;
use primegen::dashboard::{build_router, AppState};
use primegen::db::Database;
use std::sync::Arc;

/// Each in-memory SQLite pool is its own private database, so every test
/// gets a clean run log without any truncation step.
pub const MEMORY_DB: &str = "sqlite::memory:";

/// Connect a fresh, empty run log.
pub async fn setup_test_db() -> Database {
    Database::connect(MEMORY_DB)
        .await
        .expect("Failed to open in-memory run log")
}

/// Application state over a fresh run log with the given config.
pub async fn build_test_state(config: &Config) -> Arc<AppState> {
    AppState::new(setup_test_db().await, config)
}

/// Build an Axum test router over a fresh run log with default config.
/// Returns the state too so tests can inspect the run log directly.
pub async fn build_test_app() -> (axum::Router, Arc<AppState>) {
    build_test_app_with(&Config::default()).await
}

pub async fn build_test_app_with(config: &Config) -> (axum::Router, Arc<AppState>) {
    let state = build_test_state(config).await;
    (build_router(state.clone()), state)
}
