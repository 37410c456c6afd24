//! # Main — CLI Entry Point
//!
//! Routes CLI subcommands to the engine, the HTTP gateway, and the gateway
//! client. Handles shared concerns: `.env` loading, structured logging, the
//! TOML config file, and the Rayon thread pool.
//!
//! ## Subcommands
//!
//! - `serve` — run the HTTP gateway with the SQLite run log.
//! - `generate` — compute primes in-process and print them.
//! - `compare` — run all five algorithms and check they agree.
//! - `request` — ask a running gateway for primes, then print its run log
//!   (prompts for any value not given as a flag).
//! - `logs` — print a running gateway's run log.
//! - `algorithms` — list the algorithm ids.
//!
//! ## Global Options
//!
//! - `--database-url` / `DATABASE_URL`: SQLite URL of the run log.
//! - `--config` / `PRIMEGEN_CONFIG`: TOML config file.
//! - `--max-end`: largest accepted range end for the sieves.
//! - `--max-end-division`: largest accepted range end for trial division and
//!   the wheel.
//! - `--threads`: Rayon thread pool size (0 = all cores).

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use primegen::{client, db, Algorithm};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "primegen",
    about = "Generate the primes of a range with a selectable algorithm"
)]
struct Cli {
    /// SQLite URL of the run log (or set DATABASE_URL env var)
    #[arg(long, env = "DATABASE_URL", default_value = db::DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Path to a TOML config file
    #[arg(long, env = "PRIMEGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Largest accepted range end for the sieves (overrides the config file)
    #[arg(long)]
    max_end: Option<u64>,

    /// Largest accepted range end for trial division and the wheel
    #[arg(long)]
    max_end_division: Option<u64>,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway (GET /primes, GET /logs)
    Serve {
        /// Port to listen on (default 5000)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind (default 0.0.0.0)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Compute the primes of a range in-process and print them
    Generate {
        /// Start of range (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        start: i64,
        /// End of range (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        end: i64,
        /// Algorithm id (sieve, simple_division, wheel_factorization, atkin_sieve, sundaram_sieve)
        #[arg(long)]
        algorithm: Algorithm,
        /// Print the gateway's JSON response shape instead of a plain list
        #[arg(long)]
        json: bool,
    },
    /// Run all five algorithms over a range and check that they agree
    Compare {
        /// Start of range (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        start: i64,
        /// End of range (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        end: i64,
    },
    /// Request primes from a running gateway, then print its execution log
    Request {
        /// Gateway URL
        #[arg(long, default_value = client::DEFAULT_SERVER)]
        server: String,
        /// Start of range (prompted for if omitted)
        #[arg(long, allow_negative_numbers = true)]
        start: Option<i64>,
        /// End of range (prompted for if omitted)
        #[arg(long, allow_negative_numbers = true)]
        end: Option<i64>,
        /// Algorithm id (prompted for if omitted)
        #[arg(long)]
        algorithm: Option<String>,
    },
    /// Print a running gateway's execution log
    Logs {
        /// Gateway URL
        #[arg(long, default_value = client::DEFAULT_SERVER)]
        server: String,
    },
    /// List the available algorithm ids
    Algorithms,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Serve { port, bind } => {
            let config = cli::load_config(&cli, *port, bind.clone())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(primegen::dashboard::run(&config, &cli.database_url))
        }
        Commands::Generate {
            start,
            end,
            algorithm,
            json,
        } => {
            let config = cli::load_config(&cli, None, None)?;
            cli::run_generate(&config.engine(), *algorithm, *start, *end, *json)
        }
        Commands::Compare { start, end } => {
            let config = cli::load_config(&cli, None, None)?;
            cli::run_compare(&config.engine(), *start, *end)
        }
        Commands::Request {
            server,
            start,
            end,
            algorithm,
        } => cli::run_request(server, *start, *end, algorithm.clone()),
        Commands::Logs { server } => cli::run_logs(server),
        Commands::Algorithms => {
            cli::run_algorithms();
            Ok(())
        }
    }
}
