//! # Database — SQLite Run Log
//!
//! Persists one record per gateway computation and lists them back, via
//! `sqlx::SqlitePool`. The pool is the handle: it is created once in `main`
//! (or a test), cloned into whatever needs it, and every operation acquires a
//! connection for its own duration only. There is no global connection.
//!
//! ## Schema
//!
//! - `logs`: id, timestamp, range_start, range_end, time_elapsed, algorithm,
//!   num_primes, primes (JSON array text)
//!
//! The table is created on connect with `CREATE TABLE IF NOT EXISTS`; the
//! schema has a single version.
//!
//! ## Module Structure
//!
//! - [`runs`] — run record insert, listing, lookup, and count
//!
//! ## In-memory databases
//!
//! Each SQLite connection to `sqlite::memory:` opens its own empty database,
//! so in-memory URLs get a pool pinned to one connection that never expires.

mod runs;

pub use runs::NewRun;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://primegen.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    range_start INTEGER NOT NULL,
    range_end INTEGER NOT NULL,
    time_elapsed REAL NOT NULL,
    algorithm TEXT NOT NULL,
    num_primes INTEGER NOT NULL,
    primes TEXT NOT NULL
)";

// ── Run types ───────────────────────────────────────────────────

/// One persisted computation. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: i64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub range_start: i64,
    pub range_end: i64,
    /// Seconds spent inside the engine.
    pub time_elapsed: f64,
    pub algorithm: String,
    pub num_primes: i64,
    pub primes: Vec<u64>,
}

// ── Database struct and connection ──────────────────────────────

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and ensure
    /// the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database URL {}", database_url))?
            .create_if_missing(true);
        let pool_opts = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };
        let pool = pool_opts
            .connect_with(opts)
            .await
            .with_context(|| format!("connecting to {}", database_url))?;
        let db = Database { pool };
        db.ensure_schema().await?;
        Ok(db)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Health check: execute `SELECT 1` to verify database connectivity.
    ///
    /// Used by the `/readyz` readiness probe.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Close every pooled connection. Later operations fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// ── Tests ───────────────────────────────────────────────────────
