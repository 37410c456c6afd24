//! Property-based tests for the prime engine.
//!
//! These tests use `proptest` to check that the five algorithms behave as one
//! function of the range, across thousands of random ranges. No database or
//! network access is required.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//!
//! # Increase case count for thorough testing (default is 256):
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```
//!
//! # Testing strategy
//!
//! - **Agreement**: every algorithm returns the same list for the same range.
//! - **Exactness**: every returned value is prime, and every prime in range is
//!   returned (checked against a naive reference test).
//! - **Shape**: output is strictly increasing and inside `[max(start, 0), end]`.
//! - **Composition**: the primes of a subrange are the filter of the primes of
//!   the enclosing range.
//!
//! Each property is named `prop_<subject>_<invariant>`.

use primegen::{generate, Algorithm, PrimeEngine};
use proptest::prelude::*;

/// Reference primality by plain trial division, independent of the crate.
fn naive_is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ALL.to_vec())
}

/// Ranges that straddle zero and include inverted and single-point cases.
fn range() -> impl Strategy<Value = (i64, i64)> {
    (-50i64..20_000, -10i64..3_000).prop_map(|(start, len)| (start, start + len))
}

proptest! {
    /// All five algorithms return identical lists.
    #[test]
    fn prop_algorithms_agree((start, end) in range()) {
        let reference = generate(Algorithm::Eratosthenes, start, end).unwrap();
        for alg in Algorithm::ALL {
            let primes = generate(alg, start, end).unwrap();
            prop_assert_eq!(&primes, &reference, "{} disagrees on [{}, {}]", alg, start, end);
        }
    }

    /// Output is exactly the primes of the clamped range.
    #[test]
    fn prop_output_is_exact(alg in algorithm(), (start, end) in range()) {
        let primes = generate(alg, start, end).unwrap();
        let expected: Vec<u64> = if end < 0 {
            Vec::new()
        } else {
            (start.max(0) as u64..=end as u64).filter(|&n| naive_is_prime(n)).collect()
        };
        prop_assert_eq!(primes, expected);
    }

    /// Output is strictly increasing and bounded by the range.
    #[test]
    fn prop_output_sorted_and_bounded(alg in algorithm(), (start, end) in range()) {
        let primes = generate(alg, start, end).unwrap();
        prop_assert!(primes.windows(2).all(|w| w[0] < w[1]));
        for &p in &primes {
            prop_assert!(p as i64 >= start.max(2));
            prop_assert!(p as i64 <= end);
        }
        if start > end {
            prop_assert!(primes.is_empty());
        }
    }

    /// Primes of a subrange are the primes of the outer range that fall in it.
    #[test]
    fn prop_subrange_is_filter(
        alg in algorithm(),
        start in -50i64..20_000,
        len in 0i64..3_000,
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let end = start + len;
        let lo = start + (len as f64 * a.min(b)) as i64;
        let hi = start + (len as f64 * a.max(b)) as i64;
        let outer = generate(alg, start, end).unwrap();
        let inner = generate(alg, lo, hi).unwrap();
        let filtered: Vec<u64> = outer
            .into_iter()
            .filter(|&p| p as i64 >= lo && p as i64 <= hi)
            .collect();
        prop_assert_eq!(inner, filtered);
    }

    /// Calling twice gives the same answer.
    #[test]
    fn prop_generate_is_deterministic(alg in algorithm(), (start, end) in range()) {
        prop_assert_eq!(generate(alg, start, end).unwrap(), generate(alg, start, end).unwrap());
    }

    /// A negative start behaves exactly like a start of zero.
    #[test]
    fn prop_negative_start_equals_zero(alg in algorithm(), neg in i64::MIN..0, end in 0i64..5_000) {
        prop_assert_eq!(generate(alg, neg, end).unwrap(), generate(alg, 0, end).unwrap());
    }

    /// The range bound is enforced by every algorithm, and only above it.
    #[test]
    fn prop_max_end_enforced(alg in algorithm(), max_end in 2u64..10_000, over in 1i64..1_000) {
        let engine = PrimeEngine::new(max_end);
        prop_assert!(engine.generate(alg, 0, max_end as i64).is_ok());
        prop_assert!(engine.generate(alg, 0, max_end as i64 + over).is_err());
    }
}

/// Deterministic full check up to one million: pi(10^6) = 78498 and all five
/// algorithms produce the same list.
#[test]
fn all_algorithms_agree_up_to_one_million() {
    let engine = PrimeEngine::default();
    let comparison = engine.compare(0, 1_000_000).unwrap();
    assert!(comparison.agree(), "dissenters: {:?}", comparison.dissenters());
    for run in &comparison.results {
        assert_eq!(run.primes.len(), 78_498, "{}", run.algorithm);
    }
    assert_eq!(comparison.results[0].primes.last(), Some(&999_983));
}
