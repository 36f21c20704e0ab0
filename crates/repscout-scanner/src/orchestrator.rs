//! Run orchestration.
//!
//! The [`Orchestrator`] runs one strategy against one target: it opens a
//! browser session, creates a page, hands both to the strategy through a
//! [`Navigator`] and closes the session exactly once on every path out,
//! including strategy errors and panics.

use crate::context::RunContext;
use crate::error::{Result, ScanError};
use crate::navigator::Navigator;
use crate::options::RunOptions;
use crate::record::RunResult;
use crate::strategies::Strategy;
use futures::FutureExt;
use repscout_browser::{BrowserSession, RateLimiter, SessionManager};
use repscout_core::{AppConfig, PacingConfig, RetryConfig};
use repscout_targets::{SelectorTable, StrategyKind, TargetConfig};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs collection strategies over browser sessions from `M`.
pub struct Orchestrator<M> {
    sessions: M,
    selectors: Arc<SelectorTable>,
    pacing: PacingConfig,
    retry: RetryConfig,
}

impl<M: SessionManager> Orchestrator<M> {
    /// Create an orchestrator with default pacing and retry settings.
    pub fn new(sessions: M, selectors: SelectorTable) -> Self {
        Self {
            sessions,
            selectors: Arc::new(selectors),
            pacing: PacingConfig::default(),
            retry: RetryConfig::default(),
        }
    }

    /// Create an orchestrator using the pacing and retry sections of `config`.
    pub fn from_config(sessions: M, selectors: SelectorTable, config: &AppConfig) -> Self {
        Self::new(sessions, selectors)
            .with_pacing(config.pacing.clone())
            .with_retry(config.retry.clone())
    }

    /// Override the delays between page actions.
    #[must_use]
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Override navigation retry behavior.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The session manager.
    pub fn sessions(&self) -> &M {
        &self.sessions
    }

    /// Run the target's assigned strategy.
    pub async fn run(&self, target: &TargetConfig, options: &RunOptions) -> RunResult {
        self.run_strategy(target, target.strategy, options).await
    }

    /// Run a specific strategy against `target`.
    ///
    /// Never fails: every problem ends up in the result's `errors`.
    pub async fn run_strategy(
        &self,
        target: &TargetConfig,
        kind: StrategyKind,
        options: &RunOptions,
    ) -> RunResult {
        let strategy = Strategy::for_target(kind, target, &self.selectors);
        let mut ctx = RunContext::new(target, options.max_records);

        info!(
            slug = %target.slug,
            strategy = %kind,
            max_records = options.max_records,
            test_mode = options.test_mode,
            "starting run"
        );

        if let Some(reason) = strategy.unavailable_reason(target) {
            warn!(slug = %target.slug, strategy = %kind, reason, "strategy unavailable");
            ctx.log_error(reason);
            ctx.abort();
            return ctx.finish();
        }

        let mut session = match self.sessions.open().await {
            Ok(session) => session,
            Err(e) => {
                ctx.log_error(format!("Failed to open browser session: {e}"));
                ctx.abort();
                return ctx.finish();
            }
        };

        let outcome = AssertUnwindSafe(self.drive(&mut session, &strategy, target, options, &mut ctx))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ScanError::Panicked(panic_message(panic.as_ref()))));

        if let Err(e) = session.close().await {
            warn!(slug = %target.slug, error = %e, "failed to close browser session");
        }

        if let Err(e) = outcome {
            ctx.log_error(format!("Run failed: {e}"));
            ctx.abort();
        }

        let result = ctx.finish();
        info!(
            slug = %target.slug,
            strategy = %kind,
            success = result.success,
            records = result.records_found,
            emails = result.emails_found,
            errors = result.errors.len(),
            duration_ms = result.duration_ms,
            "run finished"
        );
        result
    }

    async fn drive(
        &self,
        session: &mut M::Session,
        strategy: &Strategy,
        target: &TargetConfig,
        options: &RunOptions,
        ctx: &mut RunContext,
    ) -> Result<()> {
        if ctx.is_full() {
            return Ok(());
        }
        let page = session.new_page().await?;
        let mut nav = Navigator::new(
            &page,
            RateLimiter::per_minute(target.rate_limit),
            self.retry.clone(),
            self.pacing.clone(),
        );
        strategy.collect(options, &mut nav, ctx).await
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
