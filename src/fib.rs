//! Fibonacci numbers, plain and memoized, for comparing timings.

use crate::memoize;

pub fn fibonacci_recursive(n: u64) -> u64 {
    if n <= 1 {
        n
    } else {
        fibonacci_recursive(n - 1) + fibonacci_recursive(n - 2)
    }
}

/// Keeps the twelve most recently used results.
#[cfg(feature = "full")]
#[memoize(Capacity: 12)]
pub fn fibonacci_cached(n: u64) -> u64 {
    if n <= 1 {
        n
    } else {
        fibonacci_cached(n - 1) + fibonacci_cached(n - 2)
    }
}

#[memoize]
pub fn fibonacci_unbounded(n: u64) -> u64 {
    if n <= 1 {
        n
    } else {
        fibonacci_unbounded(n - 1) + fibonacci_unbounded(n - 2)
    }
}
