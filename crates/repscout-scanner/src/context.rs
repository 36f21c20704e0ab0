//! Per-run accumulator.
//!
//! Owns everything a run collects: accepted records, the email set used for
//! deduplication, error messages and navigation counts. One context per run,
//! consumed by [`RunContext::finish`].

use crate::record::{CandidateRecord, Record, RunResult};
use repscout_targets::TargetConfig;
use std::collections::HashSet;
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, error};

/// Mutable state of one run.
#[derive(Debug)]
pub struct RunContext {
    target: TargetConfig,
    max_records: usize,
    records: Vec<Record>,
    seen_emails: HashSet<String>,
    errors: Vec<String>,
    started: Instant,
    navigations_ok: usize,
    navigations_failed: usize,
    aborted: bool,
}

impl RunContext {
    /// Start a run against `target`, accepting at most `max_records`.
    #[must_use]
    pub fn new(target: &TargetConfig, max_records: usize) -> Self {
        Self {
            target: target.clone(),
            max_records,
            records: Vec::new(),
            seen_emails: HashSet::new(),
            errors: Vec::new(),
            started: Instant::now(),
            navigations_ok: 0,
            navigations_failed: 0,
            aborted: false,
        }
    }

    /// The target being collected.
    #[must_use]
    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    /// Whether the record cap has been reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.max_records
    }

    /// Records accepted so far.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Errors logged so far.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Accept a candidate unless it is unusable, a duplicate email, or over
    /// the cap. Returns whether it was accepted.
    pub fn add_record(&mut self, candidate: CandidateRecord) -> bool {
        if self.is_full() || !candidate.is_usable() {
            return false;
        }

        let record = Record::from_candidate(candidate, &self.target);
        if let Some(key) = record.email_key() {
            if !self.seen_emails.insert(key) {
                debug!(slug = %self.target.slug, "duplicate email skipped");
                return false;
            }
        }

        debug!(
            slug = %self.target.slug,
            name = %record.full_name(),
            has_email = record.email.is_some(),
            total = self.records.len() + 1,
            "record accepted"
        );
        self.records.push(record);
        true
    }

    /// Record an error, prefixed with the target name.
    pub fn log_error(&mut self, message: impl Display) {
        let entry = format!("[{}] {message}", self.target.name);
        error!(slug = %self.target.slug, "{entry}");
        self.errors.push(entry);
    }

    /// Count a navigation outcome.
    pub fn record_navigation(&mut self, ok: bool) {
        if ok {
            self.navigations_ok += 1;
        } else {
            self.navigations_failed += 1;
        }
    }

    /// Mark the run as failed regardless of what else happens.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    /// Whether the run has done any of its work.
    ///
    /// A run succeeds unless it was aborted or every navigation it attempted
    /// failed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        !self.aborted && (self.navigations_ok > 0 || self.navigations_failed == 0)
    }

    /// Close the run into its result.
    #[must_use]
    pub fn finish(self) -> RunResult {
        let success = self.succeeded();
        RunResult::new(
            self.target.name,
            success,
            self.records,
            self.errors,
            self.started.elapsed(),
        )
    }
}
