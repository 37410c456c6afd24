//! # Client — Blocking HTTP Client for the Gateway
//!
//! Used by the `request` and `logs` subcommands. Builds query URLs with `url`
//! and sends them with a `ureq` agent. Error responses from the gateway
//! (`{"error": ...}`) are surfaced as `anyhow` errors carrying the status and
//! message.

use crate::dashboard::PrimesResponse;
use crate::db::RunRecord;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::time::Duration;
use url::Url;

/// Gateway address used when `--server` is not given.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Large ranges produce multi-megabyte JSON bodies.
const MAX_BODY_BYTES: u64 = 512 * 1024 * 1024;

pub struct PrimeClient {
    base: Url,
    agent: ureq::Agent,
}

impl PrimeClient {
    pub fn new(server: &str) -> Result<Self> {
        let mut base =
            Url::parse(server).with_context(|| format!("invalid server URL {}", server))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_connect(Some(Duration::from_secs(5)))
                .timeout_global(Some(Duration::from_secs(300)))
                .http_status_as_error(false)
                .build(),
        );
        Ok(PrimeClient { base, agent })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("building URL for {}", path))
    }

    /// URL for `GET /primes` with the range and algorithm encoded.
    pub fn primes_url(&self, start: i64, end: i64, algorithm: &str) -> Result<Url> {
        let mut url = self.endpoint("primes")?;
        url.query_pairs_mut()
            .append_pair("start", &start.to_string())
            .append_pair("end", &end.to_string())
            .append_pair("algorithm", algorithm);
        Ok(url)
    }

    /// Ask the gateway to compute (and log) the primes of `[start, end]`.
    pub fn generate(&self, start: i64, end: i64, algorithm: &str) -> Result<PrimesResponse> {
        let url = self.primes_url(start, end, algorithm)?;
        self.get_json(&url)
    }

    /// Fetch the gateway's full run history.
    pub fn logs(&self) -> Result<Vec<RunRecord>> {
        let url = self.endpoint("logs")?;
        self.get_json(&url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .with_context(|| format!("GET {}", url))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(body);
            anyhow::bail!("server returned {}: {}", status, message.trim());
        }
        response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_json()
            .with_context(|| format!("decoding response from {}", url))
    }
}

/// Render one run the way the execution log prints it.
pub fn format_run(run: &RunRecord) -> String {
    let primes = run
        .primes
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let mut out = String::new();
    let _ = writeln!(out, "ID: {}", run.id);
    let _ = writeln!(out, "Timestamp: {}", run.timestamp.to_rfc3339());
    let _ = writeln!(out, "Range: {} to {}", run.range_start, run.range_end);
    let _ = writeln!(out, "Algorithm: {}", run.algorithm);
    let _ = writeln!(out, "Number of Primes: {}", run.num_primes);
    let _ = writeln!(out, "Primes: [{}]", primes);
    let _ = writeln!(out, "Time Elapsed: {} seconds", run.time_elapsed);
    let _ = writeln!(out, "{}", "-".repeat(50));
    out
}

/// Render the whole execution log.
pub fn format_logs(runs: &[RunRecord]) -> String {
    let mut out = String::from("\nExecution Logs:\n");
    for run in runs {
        out.push_str(&format_run(run));
    }
    out
}
