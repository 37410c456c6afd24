//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the execution
//! logic for each subcommand: in-process generation, cross-algorithm
//! comparison, the gateway client flow, and rayon configuration.

use anyhow::{Context, Result};
use primegen::client::{self, PrimeClient};
use primegen::config::{Config, Overrides};
use primegen::dashboard::PrimesResponse;
use primegen::{Algorithm, PrimeEngine};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{info, warn};

use super::Cli;

/// Load the config file (if any) and apply flag overrides.
pub fn load_config(cli: &Cli, port: Option<u16>, bind: Option<String>) -> Result<Config> {
    Config::load(cli.config.as_deref())?.with_overrides(Overrides {
        bind,
        port,
        max_end: cli.max_end,
        max_end_division: cli.max_end_division,
    })
}

// ── Local computation ───────────────────────────────────────────

pub fn run_generate(
    engine: &PrimeEngine,
    algorithm: Algorithm,
    start: i64,
    end: i64,
    json: bool,
) -> Result<()> {
    let timer = Instant::now();
    let primes = engine.generate(algorithm, start, end)?;
    let time_elapsed = timer.elapsed().as_secs_f64();
    info!(
        %algorithm,
        start,
        end,
        count = primes.len(),
        time_elapsed,
        "primes generated"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        let num_primes = primes.len();
        let response = PrimesResponse {
            primes,
            start,
            end,
            algorithm,
            time_elapsed,
            num_primes,
        };
        serde_json::to_writer_pretty(&mut out, &response)?;
        writeln!(out)?;
    } else {
        let line = primes
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub fn run_compare(engine: &PrimeEngine, start: i64, end: i64) -> Result<()> {
    let comparison = engine.compare(start, end)?;
    for run in &comparison.results {
        println!(
            "{:<20} {:>10} primes {:>12.6}s",
            run.algorithm.as_str(),
            run.primes.len(),
            run.elapsed.as_secs_f64()
        );
    }
    if !comparison.agree() {
        let dissenters: Vec<&str> = comparison
            .dissenters()
            .into_iter()
            .map(Algorithm::as_str)
            .collect();
        anyhow::bail!(
            "algorithms disagree on [{}, {}]: {} differ from {}",
            start,
            end,
            dissenters.join(", "),
            Algorithm::ALL[0]
        );
    }
    println!("all {} algorithms agree", comparison.results.len());
    Ok(())
}

pub fn run_algorithms() {
    for algorithm in Algorithm::ALL {
        let kind = if algorithm.is_sieve() { "sieve" } else { "division" };
        println!(
            "{:<20} {:<24} {}",
            algorithm.as_str(),
            algorithm.label(),
            kind
        );
    }
}

// ── Gateway client ──────────────────────────────────────────────

/// Print `label`, read one line, and return it trimmed.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("unexpected end of input at prompt {:?}", label.trim());
    }
    Ok(line.trim().to_string())
}

fn prompt_i64<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<i64> {
    let text = prompt(input, output, label)?;
    text.parse()
        .with_context(|| format!("{:?} is not an integer", text))
}

/// Fill in any of start/end/algorithm not given on the command line.
fn gather_request<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    start: Option<i64>,
    end: Option<i64>,
    algorithm: Option<String>,
) -> Result<(i64, i64, String)> {
    let start = match start {
        Some(start) => start,
        None => prompt_i64(input, output, "Enter the start of the range: ")?,
    };
    let end = match end {
        Some(end) => end,
        None => prompt_i64(input, output, "Enter the end of the range: ")?,
    };
    let algorithm = match algorithm {
        Some(algorithm) => algorithm,
        None => {
            let ids: Vec<&str> = Algorithm::ALL.iter().map(|a| a.as_str()).collect();
            let label = format!("Enter the algorithm ({}): ", ids.join(", "));
            prompt(input, output, &label)?
        }
    };
    Ok((start, end, algorithm))
}

pub fn run_request(
    server: &str,
    start: Option<i64>,
    end: Option<i64>,
    algorithm: Option<String>,
) -> Result<()> {
    let (start, end, algorithm) = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        gather_request(&mut input, &mut output, start, end, algorithm)?
    };

    let client = PrimeClient::new(server)?;
    let response = client.generate(start, end, &algorithm)?;
    println!(
        "Found {} primes in [{}, {}] using {} ({:.6} seconds)",
        response.num_primes, response.start, response.end, response.algorithm, response.time_elapsed
    );

    match client.logs() {
        Ok(runs) => print!("{}", client::format_logs(&runs)),
        Err(e) => warn!(error = %e, "could not fetch execution log"),
    }
    Ok(())
}

pub fn run_logs(server: &str) -> Result<()> {
    let client = PrimeClient::new(server)?;
    let runs = client.logs()?;
    print!("{}", client::format_logs(&runs));
    Ok(())
}

// ── Rayon ───────────────────────────────────────────────────────

pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
