//! Run record operations — insert, list, lookup, and count.
//!
//! The result set is stored as a JSON array in a TEXT column and decoded back
//! into `Vec<u64>` on read.

use super::{Database, RunRecord};
use crate::engine::Algorithm;
use anyhow::{Context, Result};
use chrono::{DateTime, SubsecRound, Utc};

/// Payload for [`Database::log_run`]. `id` and `timestamp` are assigned on
/// insert.
#[derive(Debug, Clone)]
pub struct NewRun<'a> {
    pub range_start: i64,
    pub range_end: i64,
    pub time_elapsed: f64,
    pub algorithm: Algorithm,
    pub primes: &'a [u64],
}

#[derive(sqlx::FromRow)]
struct RunRow {
    id: i64,
    timestamp: DateTime<Utc>,
    range_start: i64,
    range_end: i64,
    time_elapsed: f64,
    algorithm: String,
    num_primes: i64,
    primes: String,
}

impl TryFrom<RunRow> for RunRecord {
    type Error = anyhow::Error;

    fn try_from(row: RunRow) -> Result<Self> {
        let primes = serde_json::from_str(&row.primes)
            .with_context(|| format!("run {} has a malformed primes column", row.id))?;
        Ok(RunRecord {
            id: row.id,
            timestamp: row.timestamp,
            range_start: row.range_start,
            range_end: row.range_end,
            time_elapsed: row.time_elapsed,
            algorithm: row.algorithm,
            num_primes: row.num_primes,
            primes,
        })
    }
}

const SELECT_RUNS: &str = "SELECT id, timestamp, range_start, range_end, time_elapsed,
                                  algorithm, num_primes, primes
                           FROM logs";

impl Database {
    /// Append one run to the log and return it as stored.
    ///
    /// Acquires a single pooled connection for the insert and releases it
    /// before returning.
    pub async fn log_run(&self, run: &NewRun<'_>) -> Result<RunRecord> {
        let timestamp = Utc::now().trunc_subsecs(6);
        let primes_json = serde_json::to_string(run.primes)?;
        let num_primes = run.primes.len() as i64;

        let mut conn = self.pool.acquire().await?;
        let id = sqlx::query(
            "INSERT INTO logs (timestamp, range_start, range_end, time_elapsed, algorithm, num_primes, primes)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(timestamp)
        .bind(run.range_start)
        .bind(run.range_end)
        .bind(run.time_elapsed)
        .bind(run.algorithm.as_str())
        .bind(num_primes)
        .bind(&primes_json)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
        drop(conn);

        Ok(RunRecord {
            id,
            timestamp,
            range_start: run.range_start,
            range_end: run.range_end,
            time_elapsed: run.time_elapsed,
            algorithm: run.algorithm.as_str().to_string(),
            num_primes,
            primes: run.primes.to_vec(),
        })
    }

    /// Every run, oldest first.
    pub async fn list_runs(&self) -> Result<Vec<RunRecord>> {
        let rows = sqlx::query_as::<_, RunRow>(&format!("{} ORDER BY id ASC", SELECT_RUNS))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(RunRecord::try_from).collect()
    }

    pub async fn get_run(&self, id: i64) -> Result<Option<RunRecord>> {
        let row = sqlx::query_as::<_, RunRow>(&format!("{} WHERE id = ?", SELECT_RUNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(RunRecord::try_from).transpose()
    }

    pub async fn count_runs(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
