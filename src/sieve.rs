//! # Sieve — Array-Marking Prime Generators
//!
//! The three sieve strategies of the engine. Each allocates its own working
//! array sized by `end`, marks composites (or candidates) in bulk, and then
//! collects the surviving indices inside `[start, end]`.
//!
//! 1. **Sieve of Eratosthenes** — crosses off multiples of every surviving
//!    prime p starting at p². O(n log log n) time, O(n) space.
//! 2. **Sieve of Atkin** — toggles flags according to three binary quadratic
//!    forms classified mod 12, then removes multiples of squares. O(n) time
//!    for the form enumeration, O(n) space.
//! 3. **Sieve of Sundaram** — works on the odd-only index space k → 2k+1 and
//!    removes every index of the form i + j + 2ij. O(n log n) time, O(n/2)
//!    space.
//!
//! All three treat `start > end` as an explicit guard returning the empty
//! vector, and return nothing for `end < 2` before allocating.
//!
//! ## Algorithm: Sieve of Atkin
//!
//! For square-free n, the number of representations by the forms below has
//! odd parity exactly when n is prime (restricted to the listed classes):
//!
//! | Form | Condition | n mod 12 |
//! |------|-----------|----------|
//! | 4x² + y² | x, y ≥ 1 | 1, 5 |
//! | 3x² + y² | x, y ≥ 1 | 7 |
//! | 3x² − y² | x > y ≥ 1 | 11 |
//!
//! Flags are *toggled* per representation, never set, so the final flag is
//! the parity. Non-square-free survivors are then cleared by striking every
//! multiple of n² for flagged n ≥ 5. 2 and 3 fall outside every class and are
//! added explicitly.
//!
//! ## Algorithm: Sieve of Sundaram
//!
//! An odd number 2k+1 is composite iff k = i + j + 2ij for some 1 ≤ i ≤ j,
//! since (2i+1)(2j+1) = 2(i + j + 2ij) + 1. With `half = ⌊(end − 1)/2⌋` the
//! surviving k in `[1, half]` map to the odd primes up to `end`.
//!
//! ## References
//!
//! - A. O. L. Atkin and D. J. Bernstein, "Prime sieves using binary quadratic
//!   forms", Mathematics of Computation, 73(246):1023–1030, 2004.
//! - S. P. Sundaram, 1934 (sieve on i + j + 2ij).
//! - OEIS A000720: pi(n), the prime counting function.

/// Exact integer square root: the largest r with r² ≤ n.
///
/// Starts from the f64 estimate and corrects it, since `(n as f64).sqrt()`
/// can be off by one for n above 2^52.
pub fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut r = (n as f64).sqrt() as u64;
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
        r += 1;
    }
    r
}

/// Collect every flagged index inside `[start, end]` of a sieve array of
/// length `end + 1`.
fn collect_marked(flags: &[bool], start: u64, end: u64) -> Vec<u64> {
    let lo = start as usize;
    let hi = end as usize;
    if lo > hi {
        return Vec::new();
    }
    flags[lo..=hi]
        .iter()
        .enumerate()
        .filter(|(_, &is_prime)| is_prime)
        .map(|(offset, _)| (lo + offset) as u64)
        .collect()
}

/// Sieve of Eratosthenes over `[start, end]`.
pub fn eratosthenes(start: u64, end: u64) -> Vec<u64> {
    if start > end || end < 2 {
        return Vec::new();
    }
    let limit = end as usize;
    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut p = 2usize;
    while p <= limit / p {
        if is_prime[p] {
            for multiple in (p * p..=limit).step_by(p) {
                is_prime[multiple] = false;
            }
        }
        p += 1;
    }

    collect_marked(&is_prime, start, end)
}

/// Sieve of Atkin over `[start, end]`.
pub fn atkin(start: u64, end: u64) -> Vec<u64> {
    if start > end || end < 2 {
        return Vec::new();
    }
    let limit = end as usize;
    let root = isqrt(end);
    let mut flags = vec![false; limit + 1];

    for x in 1..=root {
        let xx = x * x;
        for y in 1..=root {
            let yy = y * y;

            let n = 4 * xx + yy;
            if n <= end && matches!(n % 12, 1 | 5) {
                flags[n as usize] ^= true;
            }

            let n = 3 * xx + yy;
            if n <= end && n % 12 == 7 {
                flags[n as usize] ^= true;
            }

            if x > y {
                let n = 3 * xx - yy;
                if n <= end && n % 12 == 11 {
                    flags[n as usize] ^= true;
                }
            }
        }
    }

    // Survivors that are not square-free are false positives.
    for n in 5..=root as usize {
        if flags[n] {
            let square = n * n;
            for multiple in (square..=limit).step_by(square) {
                flags[multiple] = false;
            }
        }
    }

    flags[2] = true;
    if limit >= 3 {
        flags[3] = true;
    }

    collect_marked(&flags, start, end)
}

/// Sieve of Sundaram over `[start, end]`.
pub fn sundaram(start: u64, end: u64) -> Vec<u64> {
    if start > end || end < 2 {
        return Vec::new();
    }
    let half = ((end - 1) / 2) as usize;
    let mut keep = vec![true; half + 1];

    for i in 1..=half {
        // i + j + 2ij with j = i; each further j adds 2i + 1.
        let mut k = 2 * i * (i + 1);
        if k > half {
            break;
        }
        let step = 2 * i + 1;
        while k <= half {
            keep[k] = false;
            k += step;
        }
    }

    let mut primes = Vec::with_capacity(half / 4 + 1);
    if start <= 2 {
        primes.push(2);
    }
    primes.extend(
        keep.iter()
            .enumerate()
            .skip(1)
            .filter(|(_, &kept)| kept)
            .map(|(i, _)| 2 * i as u64 + 1)
            .filter(|&p| p >= start),
    );
    primes
}

#[cfg(test)]
mod tests {
    //! # Sieve Tests
    //!
    //! Each sieve is checked against hand-verified prime lists, the prime
    //! counting function pi(x), and the boundary cases that historically break
    //! array sieves: empty ranges, `end` in {0, 1, 2, 3}, `start` landing on or
    //! just past a prime, and `end` landing on a perfect square of a prime.

    use super::*;

    const PRIMES_TO_50: [u64; 15] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];

    fn all_sieves() -> [(&'static str, fn(u64, u64) -> Vec<u64>); 3] {
        [
            ("eratosthenes", eratosthenes),
            ("atkin", atkin),
            ("sundaram", sundaram),
        ]
    }

    // ── isqrt ──────────────────────────────────────────────────────────

    #[test]
    fn isqrt_small_values() {
        let expected = [0, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3];
        for (n, &r) in expected.iter().enumerate() {
            assert_eq!(isqrt(n as u64), r, "isqrt({})", n);
        }
    }

    /// Perfect squares and their neighbours: r² − 1 must round down to r − 1.
    #[test]
    fn isqrt_around_perfect_squares() {
        for r in [2u64, 7, 100, 4_294_967_295] {
            assert_eq!(isqrt(r * r), r);
            assert_eq!(isqrt(r * r - 1), r - 1);
            assert_eq!(isqrt(r * r + 1), r);
        }
    }

    #[test]
    fn isqrt_u64_max() {
        assert_eq!(isqrt(u64::MAX), 4_294_967_295);
    }

    // ── Shared behaviour ───────────────────────────────────────────────

    #[test]
    fn sieves_known_range_to_50() {
        for (name, sieve) in all_sieves() {
            assert_eq!(sieve(2, 50), PRIMES_TO_50, "{}", name);
        }
    }

    /// `start > end` is a defined empty result, not a failure. Each sieve
    /// guards it explicitly before allocating.
    #[test]
    fn sieves_inverted_range_is_empty() {
        for (name, sieve) in all_sieves() {
            assert!(sieve(10, 2).is_empty(), "{}", name);
            assert!(sieve(1_000, 999).is_empty(), "{}", name);
        }
    }

    /// `end` of 0 or 1 must not index past a one-element array; end = 2 and
    /// end = 3 exercise the forced flags of Atkin and the empty odd space of
    /// Sundaram (half = 0 for end = 2).
    #[test]
    fn sieves_tiny_limits() {
        for (name, sieve) in all_sieves() {
            assert!(sieve(0, 0).is_empty(), "{}", name);
            assert!(sieve(0, 1).is_empty(), "{}", name);
            assert_eq!(sieve(0, 2), vec![2], "{}", name);
            assert_eq!(sieve(0, 3), vec![2, 3], "{}", name);
            assert_eq!(sieve(3, 3), vec![3], "{}", name);
            assert_eq!(sieve(0, 4), vec![2, 3], "{}", name);
            assert_eq!(sieve(5, 5), vec![5], "{}", name);
        }
    }

    /// pi(x) for x in {100, 1000, 10000, 100000} — OEIS A000720.
    #[test]
    fn sieves_known_prime_counts() {
        for (name, sieve) in all_sieves() {
            assert_eq!(sieve(0, 100).len(), 25, "{}", name);
            assert_eq!(sieve(0, 1_000).len(), 168, "{}", name);
            assert_eq!(sieve(0, 10_000).len(), 1229, "{}", name);
            assert_eq!(sieve(0, 100_000).len(), 9592, "{}", name);
        }
    }

    /// A start bound sitting exactly on a prime includes it; one past excludes it.
    #[test]
    fn sieves_respect_start_bound() {
        for (name, sieve) in all_sieves() {
            assert_eq!(sieve(13, 30), vec![13, 17, 19, 23, 29], "{}", name);
            assert_eq!(sieve(14, 30), vec![17, 19, 23, 29], "{}", name);
            assert_eq!(sieve(3, 10), vec![3, 5, 7], "{}", name);
            assert!(sieve(24, 28).is_empty(), "{}", name);
        }
    }

    /// Squares of primes are the composites an off-by-one in the crossing-off
    /// bound (p² ≤ end) or in Sundaram's half-range lets through.
    #[test]
    fn sieves_exclude_prime_squares_at_end() {
        for (name, sieve) in all_sieves() {
            for square in [4u64, 9, 25, 49, 121, 169, 289, 361, 529] {
                let primes = sieve(0, square);
                assert!(
                    !primes.contains(&square),
                    "{} reported {} as prime",
                    name,
                    square
                );
            }
        }
    }

    /// The odd end of Sundaram's range: end = 2·half + 1 must be included
    /// when prime, end = 2·half + 2 must not add a phantom candidate.
    #[test]
    fn sundaram_boundary_primes_near_end() {
        assert_eq!(sundaram(0, 13).last(), Some(&13));
        assert_eq!(sundaram(0, 14).last(), Some(&13));
        assert_eq!(sundaram(0, 97).last(), Some(&97));
        assert_eq!(sundaram(90, 98), vec![97]);
    }

    /// Atkin is the only sieve whose marks are toggles. Composites with an even
    /// number of representations (65 = 4·2² + 7² = 4·4² + 1²) cancel out in the
    /// toggle pass; composites with an odd count that carry a square factor
    /// (25 = 4·2² + 3², 245 = 5·7²) survive it and must be struck by the
    /// square-multiple pass.
    #[test]
    fn atkin_clears_square_multiples() {
        let primes = atkin(0, 1_000);
        for composite in [25u64, 45, 49, 65, 85, 125, 169, 245, 325, 845] {
            assert!(!primes.contains(&composite), "atkin kept {}", composite);
        }
        assert_eq!(primes, eratosthenes(0, 1_000));
    }

    #[test]
    fn sieves_agree_on_offset_windows() {
        for (lo, hi) in [(0u64, 2_000u64), (997, 1_009), (7_900, 8_100), (65_521, 65_537)] {
            let reference = eratosthenes(lo, hi);
            assert_eq!(atkin(lo, hi), reference, "atkin [{}, {}]", lo, hi);
            assert_eq!(sundaram(lo, hi), reference, "sundaram [{}, {}]", lo, hi);
        }
    }

    #[test]
    fn sieve_output_strictly_increasing() {
        for (name, sieve) in all_sieves() {
            let primes = sieve(0, 5_000);
            assert!(
                primes.windows(2).all(|w| w[0] < w[1]),
                "{} output not strictly increasing",
                name
            );
        }
    }
}
