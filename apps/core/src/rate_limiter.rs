use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Sliding-window limiter for automatic replies.
///
/// Tracks reply timestamps per sender so one chatty account cannot drain the
/// reply quota of a platform. The limit is supplied per call because it
/// differs between platforms. Senders with nothing left in the window are
/// forgotten.
pub struct RateLimiter {
    /// Reply timestamps for each sender key.
    replies: HashMap<String, Vec<Instant>>,
    /// The duration of the sliding window.
    window: Duration,
    /// When every key was last swept for expired timestamps.
    last_sweep: Option<Instant>,
}

impl RateLimiter {
    /// Creates a new `RateLimiter` with the given window.
    pub fn new(window: Duration) -> Self {
        RateLimiter {
            replies: HashMap::new(),
            window,
            last_sweep: None,
        }
    }

    /// A limiter with a one hour window.
    pub fn hourly() -> Self {
        Self::new(Duration::from_secs(60 * 60))
    }

    /// Whether `key` may receive another reply at `now`. Nothing is recorded.
    ///
    /// # Arguments
    ///
    /// * `key` - Sender identity, usually `platform:sender_id`.
    /// * `limit` - Replies allowed within the window. Zero blocks everything.
    /// * `now` - The instant of the attempt.
    pub fn allows_at(&mut self, key: &str, limit: usize, now: Instant) -> bool {
        self.sweep(now);

        let window = self.window;
        let used = match self.replies.get_mut(key) {
            Some(timestamps) => {
                // Drop timestamps that fell out of the window
                timestamps.retain(|&t| now.saturating_duration_since(t) < window);
                timestamps.len()
            }
            None => 0,
        };
        if used == 0 {
            self.replies.remove(key);
        }

        used < limit
    }

    /// Counts a reply sent to `key` at `now`.
    pub fn record_at(&mut self, key: &str, now: Instant) {
        self.replies.entry(key.to_string()).or_default().push(now);
    }

    /// [`allows_at`](Self::allows_at) followed by [`record_at`](Self::record_at) when allowed.
    pub fn check_at(&mut self, key: &str, limit: usize, now: Instant) -> bool {
        let allowed = self.allows_at(key, limit, now);
        if allowed {
            self.record_at(key, now);
        }
        allowed
    }

    /// [`check_at`](Self::check_at) with the current instant.
    pub fn check(&mut self, key: &str, limit: usize) -> bool {
        self.check_at(key, limit, Instant::now())
    }

    pub fn allows(&mut self, key: &str, limit: usize) -> bool {
        self.allows_at(key, limit, Instant::now())
    }

    pub fn record(&mut self, key: &str) {
        self.record_at(key, Instant::now())
    }

    /// Replies recorded for `key` that are still inside the window at `now`.
    pub fn in_window(&self, key: &str, now: Instant) -> usize {
        self.replies
            .get(key)
            .map(|ts| {
                ts.iter()
                    .filter(|&&t| now.saturating_duration_since(t) < self.window)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Number of senders currently tracked.
    pub fn tracked_senders(&self) -> usize {
        self.replies.len()
    }

    /// Drops expired timestamps of every sender, at most once per window.
    fn sweep(&mut self, now: Instant) {
        let due = self
            .last_sweep
            .map_or(true, |last| now.saturating_duration_since(last) >= self.window);
        if !due {
            return;
        }
        let window = self.window;
        self.replies.retain(|_, timestamps| {
            timestamps.retain(|&t| now.saturating_duration_since(t) < window);
            !timestamps.is_empty()
        });
        self.last_sweep = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_requests_within_limit() {
        let mut limiter = RateLimiter::hourly();
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.check_at("instagram:sarah", 5, now));
        }
        assert!(!limiter.check_at("instagram:sarah", 5, now));
        assert!(limiter.check_at("instagram:mike", 5, now));
    }

    #[test]
    fn test_resets_after_window() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        assert!(limiter.check_at("k", 2, start));
        assert!(limiter.check_at("k", 2, start + Duration::from_secs(1)));
        assert!(!limiter.check_at("k", 2, start + Duration::from_secs(2)));

        // only the first reply has aged out
        let later = start + Duration::from_millis(60_500);
        assert!(limiter.check_at("k", 2, later));
        assert_eq!(limiter.in_window("k", later), 2);
    }

    #[test]
    fn test_zero_limit_blocks() {
        let mut limiter = RateLimiter::hourly();
        assert!(!limiter.check("k", 0));
        assert_eq!(limiter.in_window("k", Instant::now()), 0);
        assert_eq!(limiter.tracked_senders(), 0);
    }

    #[test]
    fn test_allows_does_not_consume() {
        let mut limiter = RateLimiter::hourly();
        let now = Instant::now();
        assert!(limiter.allows_at("k", 1, now));
        assert!(limiter.allows_at("k", 1, now));
        assert_eq!(limiter.tracked_senders(), 0);

        limiter.record_at("k", now);
        assert!(!limiter.allows_at("k", 1, now));
    }

    #[test]
    fn test_expired_senders_are_forgotten() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        for i in 0..50 {
            assert!(limiter.check_at(&format!("instagram:fan_{}", i), 3, start));
        }
        assert_eq!(limiter.tracked_senders(), 50);

        // A different sender after the window sweeps out every stale key
        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at("email:new", 3, later));
        assert_eq!(limiter.tracked_senders(), 1);
        assert_eq!(limiter.in_window("instagram:fan_0", later), 0);

        // A key revisited after expiry is dropped rather than kept empty
        let much_later = later + Duration::from_secs(61);
        assert!(limiter.allows_at("email:new", 3, much_later));
        assert_eq!(limiter.tracked_senders(), 0);
    }
}
