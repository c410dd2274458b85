//! Pure operations behind each request key.
//!
//! Nothing here allocates more than its output or touches shared state, so
//! every function is safe to call from any task.

/// Number of fibonacci terms that fit in a `u64`. Term 94 overflows.
pub const MAX_FIBONACCI_TERMS: u64 = 94;

/// First `n` terms of the fibonacci sequence starting `0, 1`.
///
/// Returns `None` if `n` exceeds [`MAX_FIBONACCI_TERMS`].
pub fn fibonacci(n: u64) -> Option<Vec<u64>> {
    if n > MAX_FIBONACCI_TERMS {
        return None;
    }

    let mut terms = Vec::with_capacity(n as usize);
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        terms.push(a);
        // The lookahead term is never emitted and may wrap on the last pass.
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    Some(terms)
}

/// Trial division primality test. Values below 2 are not prime.
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut divisor = 3;
    // `divisor <= n / divisor` is `divisor * divisor <= n` without overflow.
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Keeps the prime values of `candidates`, preserving order.
pub fn primes(candidates: &[i64]) -> Vec<i64> {
    candidates.iter().copied().filter(|&n| is_prime(n)).collect()
}

/// Euclid's algorithm.
///
/// Follows truncated remainder semantics, so negative inputs can produce a
/// negative divisor. `i64::MIN % -1` is taken as `0`.
pub const fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let r = a.wrapping_rem(b);
        a = b;
        b = r;
    }
    a
}

/// `a * b / gcd(a, b)`, or `None` if the result does not fit. `lcm(0, 0)` is
/// `0`.
pub fn lcm(a: i64, b: i64) -> Option<i64> {
    let divisor = gcd(a, b);
    if divisor == 0 {
        return Some(0);
    }
    // Divide first: `divisor` divides `a` exactly, so only the result can
    // overflow, never an intermediate product.
    a.checked_div(divisor)?.checked_mul(b)
}

/// Folds [`gcd`] left to right. `None` for an empty slice.
pub fn hcf_of(values: &[i64]) -> Option<i64> {
    let (&first, rest) = values.split_first()?;
    Some(rest.iter().fold(first, |acc, &v| gcd(acc, v)))
}

/// Folds [`lcm`] left to right.
///
/// The outer `Option` is `None` for an empty slice; the inner one is `None`
/// when an intermediate product overflows.
pub fn lcm_of(values: &[i64]) -> Option<Option<i64>> {
    let (&first, rest) = values.split_first()?;
    Some(rest.iter().try_fold(first, |acc, &v| lcm(acc, v)))
}

/// First whitespace-delimited token of `text` with every non-word character
/// (anything outside `[A-Za-z0-9_]`) removed.
pub fn first_word(text: &str) -> String {
    text.split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
