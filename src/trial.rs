//! # Trial — Division-Based Prime Generators
//!
//! The two strategies that test every candidate in `[start, end]` on its own
//! instead of marking an array. Both use O(1) working space beyond the output
//! vector, at the cost of O(√n) divisions per candidate.
//!
//! - **Trial division** divides by every integer in `2..=⌊√n⌋`. It is the
//!   reference implementation the other strategies are checked against.
//! - **Wheel factorization** peels off 2, 3 and 5 with direct modulus tests,
//!   then divides only by numbers ≡ ±1 (mod 6) starting at 7, stepping
//!   +4, +2, +4, +2, … (7, 11, 13, 17, 19, 23, 25, …).
//!
//! Neither needs a `start > end` guard: the candidate range is simply empty.

/// Primality by exhaustive trial division.
pub fn is_prime_trial(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    let mut d = 2;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Primality with a 2·3 wheel after explicit 2, 3, 5 checks.
pub fn is_prime_wheel(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if matches!(n, 2 | 3 | 5) {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 || n % 5 == 0 {
        return false;
    }
    let mut i = 7;
    let mut step = 4;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += step;
        step = 6 - step;
    }
    true
}

/// All primes in `[start, end]` by trial division.
pub fn trial_division(start: u64, end: u64) -> Vec<u64> {
    (start.max(2)..=end).filter(|&n| is_prime_trial(n)).collect()
}

/// All primes in `[start, end]` by wheel factorization.
pub fn wheel_factorization(start: u64, end: u64) -> Vec<u64> {
    (start.max(2)..=end).filter(|&n| is_prime_wheel(n)).collect()
}
