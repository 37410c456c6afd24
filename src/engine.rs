//! # Engine — Algorithm Selection and Range Dispatch
//!
//! Uniform entry point over the five prime generators in [`crate::trial`] and
//! [`crate::sieve`]. Callers pick a strategy with [`Algorithm`] (parsed from
//! its wire id) and get back the primes of an inclusive range as a strictly
//! increasing `Vec<u64>`.
//!
//! ## Range normalization
//!
//! Ranges arrive as `i64` from the HTTP and CLI boundaries:
//!
//! | Input | Result |
//! |-------|--------|
//! | `start > end` | `Ok(vec![])` |
//! | `end < 2` | `Ok(vec![])` |
//! | `start < 0` | treated as `start = 0` |
//! | `end > limit` | `Err(RangeTooLarge)` |
//!
//! The sieves allocate O(end) memory and the division strategies do
//! O((end − start)·√end) work. The engine has no cancellation hooks, so the
//! limit is the only protection against oversized requests, and it differs by
//! strategy: sieves are bounded by `max_end`, the division strategies by the
//! smaller `max_end_division`. Both are clamped to [`MAX_END_CEILING`].
//!
//! ## Selection
//!
//! The algorithm set is closed. An id outside the five below is a caller error
//! ([`EngineError::UnknownAlgorithm`]); there is no fallback strategy.
//!
//! | Id | Strategy |
//! |----|----------|
//! | `simple_division` | trial division |
//! | `sieve` | sieve of Eratosthenes |
//! | `wheel_factorization` | 2·3·5 wheel |
//! | `atkin_sieve` | sieve of Atkin |
//! | `sundaram_sieve` | sieve of Sundaram |

use crate::{sieve, trial};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Default upper bound on `end` for the sieves. Keeps the largest sieve array
/// near 50 MB.
pub const DEFAULT_MAX_END: u64 = 50_000_000;

/// Default upper bound on `end` for trial division and the wheel. Trial
/// division to 5·10^6 takes a few seconds in release builds; to 5·10^7 it
/// takes over a minute.
pub const DEFAULT_MAX_END_DIVISION: u64 = 5_000_000;

/// Hard ceiling for any configured limit. Keeps Atkin's `4x² + y²` (below
/// `5·end`) inside `u64` and the `end + 1` flag array inside a 32-bit `usize`.
pub const MAX_END_CEILING: u64 = (u32::MAX - 1) as u64;

/// One of the five interchangeable prime generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "simple_division")]
    TrialDivision,
    #[serde(rename = "sieve")]
    Eratosthenes,
    #[serde(rename = "wheel_factorization")]
    Wheel,
    #[serde(rename = "atkin_sieve")]
    Atkin,
    #[serde(rename = "sundaram_sieve")]
    Sundaram,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Eratosthenes,
        Algorithm::TrialDivision,
        Algorithm::Wheel,
        Algorithm::Atkin,
        Algorithm::Sundaram,
    ];

    /// Wire id used in query strings, the run log, and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::TrialDivision => "simple_division",
            Algorithm::Eratosthenes => "sieve",
            Algorithm::Wheel => "wheel_factorization",
            Algorithm::Atkin => "atkin_sieve",
            Algorithm::Sundaram => "sundaram_sieve",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::TrialDivision => "Trial Division",
            Algorithm::Eratosthenes => "Sieve of Eratosthenes",
            Algorithm::Wheel => "Wheel Factorization",
            Algorithm::Atkin => "Sieve of Atkin",
            Algorithm::Sundaram => "Sieve of Sundaram",
        }
    }

    /// Whether the strategy allocates an array proportional to `end`.
    pub fn is_sieve(self) -> bool {
        matches!(
            self,
            Algorithm::Eratosthenes | Algorithm::Atkin | Algorithm::Sundaram
        )
    }

    fn run(self, start: u64, end: u64) -> Vec<u64> {
        match self {
            Algorithm::TrialDivision => trial::trial_division(start, end),
            Algorithm::Eratosthenes => sieve::eratosthenes(start, end),
            Algorithm::Wheel => trial::wheel_factorization(start, end),
            Algorithm::Atkin => sieve::atkin(start, end),
            Algorithm::Sundaram => sieve::sundaram(start, end),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| EngineError::UnknownAlgorithm(s.to_string()))
    }
}

/// Caller errors from [`PrimeEngine`]. An inverted range is not one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The selector does not name one of the five strategies.
    UnknownAlgorithm(String),
    /// `end` exceeds the engine's configured bound.
    RangeTooLarge { end: i64, max_end: u64 },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::UnknownAlgorithm(name) => write!(f, "unknown algorithm: {}", name),
            EngineError::RangeTooLarge { end, max_end } => {
                write!(f, "range end {} exceeds maximum {}", end, max_end)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Stateless dispatcher. Each call allocates its own working memory, so one
/// engine can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeEngine {
    max_end: u64,
    max_end_division: u64,
}

impl Default for PrimeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_END).with_division_limit(DEFAULT_MAX_END_DIVISION)
    }
}

impl PrimeEngine {
    /// Engine whose limit is `max_end` for every strategy, clamped to
    /// [`MAX_END_CEILING`].
    pub fn new(max_end: u64) -> Self {
        let max_end = max_end.min(MAX_END_CEILING);
        PrimeEngine {
            max_end,
            max_end_division: max_end,
        }
    }

    /// Lower the limit for trial division and the wheel. Never raises it
    /// above `max_end`.
    pub fn with_division_limit(mut self, max_end_division: u64) -> Self {
        self.max_end_division = max_end_division.min(self.max_end);
        self
    }

    pub fn max_end(&self) -> u64 {
        self.max_end
    }

    pub fn max_end_division(&self) -> u64 {
        self.max_end_division
    }

    /// Largest accepted `end` for `algorithm`.
    pub fn limit_for(&self, algorithm: Algorithm) -> u64 {
        if algorithm.is_sieve() {
            self.max_end
        } else {
            self.max_end_division
        }
    }

    /// Normalize an `i64` range into the `u64` domain the generators use.
    /// `None` means the range holds no candidate ≥ 2.
    fn bounds(
        &self,
        start: i64,
        end: i64,
        limit: u64,
    ) -> Result<Option<(u64, u64)>, EngineError> {
        if start > end || end < 2 {
            return Ok(None);
        }
        if end as u64 > limit {
            return Err(EngineError::RangeTooLarge {
                end,
                max_end: limit,
            });
        }
        Ok(Some((start.max(0) as u64, end as u64)))
    }

    /// All primes in `[start, end]` using `algorithm`.
    pub fn generate(
        &self,
        algorithm: Algorithm,
        start: i64,
        end: i64,
    ) -> Result<Vec<u64>, EngineError> {
        Ok(match self.bounds(start, end, self.limit_for(algorithm))? {
            Some((lo, hi)) => algorithm.run(lo, hi),
            None => Vec::new(),
        })
    }

    /// Like [`generate`](Self::generate), selecting the algorithm by wire id.
    pub fn generate_named(
        &self,
        algorithm: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<u64>, EngineError> {
        self.generate(algorithm.parse()?, start, end)
    }

    /// Run every algorithm over the same range on the rayon pool. The range
    /// must fit the strictest limit, since every strategy runs.
    pub fn compare(&self, start: i64, end: i64) -> Result<Comparison, EngineError> {
        let limit = self.max_end.min(self.max_end_division);
        let bounds = self.bounds(start, end, limit)?;
        let results = Algorithm::ALL
            .par_iter()
            .map(|&algorithm| {
                let timer = Instant::now();
                let primes = match bounds {
                    Some((lo, hi)) => algorithm.run(lo, hi),
                    None => Vec::new(),
                };
                AlgorithmRun {
                    algorithm,
                    primes,
                    elapsed: timer.elapsed(),
                }
            })
            .collect();
        Ok(Comparison { results })
    }
}

/// Generate with the default engine.
pub fn generate(algorithm: Algorithm, start: i64, end: i64) -> Result<Vec<u64>, EngineError> {
    PrimeEngine::default().generate(algorithm, start, end)
}

/// One algorithm's output within a [`Comparison`].
#[derive(Debug, Clone)]
pub struct AlgorithmRun {
    pub algorithm: Algorithm,
    pub primes: Vec<u64>,
    pub elapsed: Duration,
}

/// Results of [`PrimeEngine::compare`], in [`Algorithm::ALL`] order.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub results: Vec<AlgorithmRun>,
}

impl Comparison {
    /// True when every algorithm produced the same sequence.
    pub fn agree(&self) -> bool {
        self.results
            .windows(2)
            .all(|pair| pair[0].primes == pair[1].primes)
    }

    /// Algorithms whose output differs from the first (Eratosthenes) result.
    pub fn dissenters(&self) -> Vec<Algorithm> {
        let Some(reference) = self.results.first() else {
            return Vec::new();
        };
        self.results
            .iter()
            .skip(1)
            .filter(|run| run.primes != reference.primes)
            .map(|run| run.algorithm)
            .collect()
    }
}
