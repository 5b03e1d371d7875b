//! Injectable sources of time and randomness.
//!
//! Scoring formulas never read the wall clock or a RNG directly; they receive
//! one of these so tests can pin both.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Source of the synthetic values used when filling reply templates.
pub trait RandomSource: Send + Sync {
    /// A five digit order number.
    fn order_number(&self) -> u32;
}

/// Thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn order_number(&self) -> u32 {
        rand::thread_rng().gen_range(10_000..100_000)
    }
}

/// Always returns the same order number.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub u32);

impl RandomSource for FixedRandom {
    fn order_number(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_stays_five_digits() {
        let rng = ThreadRandom;
        for _ in 0..100 {
            let n = rng.order_number();
            assert!((10_000..100_000).contains(&n), "got {}", n);
        }
    }

    #[test]
    fn test_fixed_clock_is_frozen() {
        let at = Utc::now();
        let clock = FixedClock(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }
}
