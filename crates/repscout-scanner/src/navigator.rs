//! Throttled, retried navigation for one run.

use crate::context::RunContext;
use crate::extract::random_delay;
use repscout_browser::{PageActions, RateLimiter};
use repscout_core::config::DelayRange;
use repscout_core::{PacingConfig, RetryConfig};
use std::time::Duration;
use tracing::{debug, warn};

/// A run's page together with its rate limiter and pacing.
///
/// Every navigation claims a rate-limiter slot, then pauses. Failed
/// navigations are retried with exponential backoff; only the final failure is
/// recorded in the run's errors.
pub struct Navigator<'p, P> {
    page: &'p P,
    limiter: RateLimiter,
    retry: RetryConfig,
    pacing: PacingConfig,
}

impl<'p, P: PageActions> Navigator<'p, P> {
    /// Wrap `page` for a run.
    pub fn new(page: &'p P, limiter: RateLimiter, retry: RetryConfig, pacing: PacingConfig) -> Self {
        Self {
            page,
            limiter,
            retry,
            pacing,
        }
    }

    /// The underlying page.
    pub fn page(&self) -> &'p P {
        self.page
    }

    /// Pacing in effect.
    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    /// Navigate to `url`, returning whether it loaded.
    ///
    /// Does nothing once the run's record cap is reached.
    pub async fn goto(&mut self, url: &str, ctx: &mut RunContext) -> bool {
        if ctx.is_full() {
            return false;
        }

        let attempts = self.retry.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            self.limiter.wait_for_slot().await;
            random_delay(self.pacing.before_navigation).await;
            match self.page.navigate(url).await {
                Ok(()) => {
                    debug!(url, attempt = attempt + 1, "navigated");
                    ctx.record_navigation(true);
                    random_delay(self.pacing.after_navigation).await;
                    return true;
                }
                Err(e) => {
                    warn!(
                        url,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        error = %e,
                        "navigation failed"
                    );
                    last_error = Some(e);
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.retry.backoff(attempt)).await;
                    }
                }
            }
        }

        ctx.record_navigation(false);
        match last_error {
            Some(e) => ctx.log_error(format!("Failed to load {url}: {e}")),
            None => ctx.log_error(format!("Failed to load {url}")),
        }
        false
    }

    /// Sleep for a random duration within `range`.
    pub async fn pause(&self, range: DelayRange) {
        random_delay(range).await;
    }

    /// Scroll the configured number of viewports to trigger lazy content.
    ///
    /// Scroll failures are not worth failing a page over.
    pub async fn scroll(&self) {
        if self.pacing.scroll_count == 0 {
            return;
        }
        let delay = Duration::from_millis(self.pacing.scroll_delay_ms);
        if let Err(e) = self.page.scroll(self.pacing.scroll_count, delay).await {
            debug!(error = %e, "scroll failed");
        }
    }
}
