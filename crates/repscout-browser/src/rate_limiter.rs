//! Per-run navigation throttle.
//!
//! A one-minute sliding window: at most `requests_per_minute` slots are handed
//! out in any 60 s window, and consecutive slots are at least
//! `60 s / requests_per_minute` apart. Each run owns its own limiter.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

const WINDOW: Duration = Duration::from_secs(60);

/// Extra wait after the oldest slot leaves the window.
const EXPIRY_BUFFER: Duration = Duration::from_millis(100);

/// Sliding-window rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    requests_per_minute: u32,
    min_interval: Duration,
    granted: VecDeque<Instant>,
}

impl RateLimiter {
    /// Limiter allowing `requests_per_minute` navigations per minute (minimum 1).
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let requests_per_minute = requests_per_minute.max(1);
        Self {
            requests_per_minute,
            min_interval: WINDOW / requests_per_minute,
            granted: VecDeque::new(),
        }
    }

    /// Minimum spacing between consecutive slots.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until another navigation is allowed, then claim the slot.
    pub async fn wait_for_slot(&mut self) {
        loop {
            let now = Instant::now();
            self.evict(now);

            let wait = if self.granted.len() >= self.requests_per_minute as usize {
                self.granted
                    .front()
                    .map(|oldest| (*oldest + WINDOW + EXPIRY_BUFFER).saturating_duration_since(now))
            } else {
                self.granted
                    .back()
                    .map(|last| (*last + self.min_interval).saturating_duration_since(now))
            };

            match wait {
                Some(wait) if !wait.is_zero() => {
                    trace!(wait_ms = wait.as_millis(), "waiting for rate limit slot");
                    tokio::time::sleep(wait).await;
                }
                _ => break,
            }
        }

        self.granted.push_back(Instant::now());
    }

    /// Slots still available in the current window.
    pub fn remaining(&mut self) -> u32 {
        self.evict(Instant::now());
        let used = u32::try_from(self.granted.len()).unwrap_or(u32::MAX);
        self.requests_per_minute.saturating_sub(used)
    }

    fn evict(&mut self, now: Instant) {
        while let Some(oldest) = self.granted.front() {
            if now.saturating_duration_since(*oldest) >= WINDOW {
                self.granted.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_slot_is_immediate() {
        let mut limiter = RateLimiter::per_minute(10);
        let start = Instant::now();
        limiter.wait_for_slot().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.remaining(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_between_slots() {
        let mut limiter = RateLimiter::per_minute(10);
        assert_eq!(limiter.min_interval(), Duration::from_secs(6));

        let start = Instant::now();
        limiter.wait_for_slot().await;
        limiter.wait_for_slot().await;
        limiter.wait_for_slot().await;
        assert!(start.elapsed() >= Duration::from_secs(12));
        assert!(start.elapsed() < Duration::from_secs(13));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_when_interval_already_passed() {
        let mut limiter = RateLimiter::per_minute(10);
        limiter.wait_for_slot().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        let before = Instant::now();
        limiter.wait_for_slot().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_never_exceeded() {
        let mut limiter = RateLimiter::per_minute(3);
        let start = Instant::now();
        let mut grants = Vec::new();
        for _ in 0..7 {
            limiter.wait_for_slot().await;
            grants.push(start.elapsed());
        }

        // Any 60 s window holds at most 3 grants
        for (i, t) in grants.iter().enumerate() {
            let in_window = grants[i..]
                .iter()
                .filter(|u| **u < *t + Duration::from_secs(60))
                .count();
            assert!(in_window <= 3, "window starting at {t:?} had {in_window}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_recovers_after_window() {
        let mut limiter = RateLimiter::per_minute(2);
        limiter.wait_for_slot().await;
        limiter.wait_for_slot().await;
        assert_eq!(limiter.remaining(), 0);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(limiter.remaining(), 2);
    }

    #[test]
    fn test_zero_rate_clamped() {
        let limiter = RateLimiter::per_minute(0);
        assert_eq!(limiter.min_interval(), Duration::from_secs(60));
    }
}
