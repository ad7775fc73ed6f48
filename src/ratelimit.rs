//! Fixed-window rate limiting keyed by client and action.
//!
//! Single-process: one counter map behind a lock, no coordination across
//! instances. A window that has elapsed resets its counter on the next
//! check.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct Window {
    started: Instant,
    count: u32,
}

/// Injectable fixed-window limiter.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    buckets: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a request by `client` for `action` is allowed right now.
    pub async fn check(&self, client: &str, action: &str) -> bool {
        self.check_at(client, action, Instant::now()).await
    }

    async fn check_at(&self, client: &str, action: &str, now: Instant) -> bool {
        let key = format!("{}:{}", client, action);
        let mut buckets = self.buckets.lock().await;
        let window = buckets.entry(key).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_then_deny_within_window() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.check_at("1.2.3.4", "plan", now).await);
        }
        assert!(!limiter.check_at("1.2.3.4", "plan", now).await);
    }

    #[tokio::test]
    async fn test_fresh_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("c", "a", now).await);
        assert!(!limiter.check_at("c", "a", now).await);

        let later = now + Duration::from_secs(61);
        assert!(limiter.check_at("c", "a", later).await);
    }

    #[tokio::test]
    async fn test_clients_and_actions_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", "plan", now).await);
        assert!(limiter.check_at("b", "plan", now).await);
        assert!(limiter.check_at("a", "webhook", now).await);
        assert!(!limiter.check_at("a", "plan", now).await);
    }
}
