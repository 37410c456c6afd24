//! # primegen
//!
//! Prime numbers of an inclusive integer range, by one of five
//! interchangeable algorithms, with every gateway computation recorded in a
//! run log.
//!
//! - [`engine`] — algorithm selection and range dispatch
//! - [`trial`] — trial division and wheel factorization
//! - [`sieve`] — Eratosthenes, Atkin, and Sundaram sieves
//! - [`dashboard`] — Axum HTTP gateway
//! - [`db`] — SQLite run log
//! - [`client`] — blocking HTTP client for the gateway
//! - [`config`] — TOML configuration
//! - [`prom_metrics`] — Prometheus registry

pub mod client;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod engine;
pub mod prom_metrics;
pub mod sieve;
pub mod trial;

pub use engine::{generate, Algorithm, EngineError, PrimeEngine};
