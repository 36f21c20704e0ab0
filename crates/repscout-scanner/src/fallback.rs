//! Chained strategies for one target.

use crate::options::RunOptions;
use crate::orchestrator::Orchestrator;
use crate::record::{Record, RunResult};
use repscout_browser::SessionManager;
use repscout_core::RecordId;
use repscout_targets::{StrategyKind, TargetConfig};
use std::collections::HashSet;
use std::time::Duration;
use tracing::info;

impl<M: SessionManager> Orchestrator<M> {
    /// Run locator, search-engine and social strategies in turn until the
    /// record cap is met, merging what they find.
    ///
    /// The locator is skipped for targets without one. Each later strategy is
    /// only started while the merged set is below the cap, and is given the
    /// remaining headroom as its own cap.
    pub async fn run_with_fallbacks(&self, target: &TargetConfig, options: &RunOptions) -> RunResult {
        let mut merged = MergedRun::new(options.max_records);

        for kind in StrategyKind::ALL {
            if kind == StrategyKind::Locator && !target.has_locator() {
                continue;
            }
            let remaining = merged.remaining();
            if remaining == 0 {
                break;
            }

            let result = self
                .run_strategy(target, kind, &options.with_remaining(remaining))
                .await;
            let added = merged.absorb(result);
            info!(
                slug = %target.slug,
                strategy = %kind,
                added,
                total = merged.records.len(),
                "fallback step finished"
            );
        }

        merged.finish(&target.name)
    }
}

/// Accumulates several runs against one target.
#[derive(Debug)]
struct MergedRun {
    max_records: usize,
    records: Vec<Record>,
    emails: HashSet<String>,
    ids: HashSet<RecordId>,
    errors: Vec<String>,
    duration: Duration,
    any_success: bool,
}

impl MergedRun {
    fn new(max_records: usize) -> Self {
        Self {
            max_records,
            records: Vec::new(),
            emails: HashSet::new(),
            ids: HashSet::new(),
            errors: Vec::new(),
            duration: Duration::ZERO,
            any_success: false,
        }
    }

    fn remaining(&self) -> usize {
        self.max_records.saturating_sub(self.records.len())
    }

    /// Fold in one run; returns how many records were new.
    fn absorb(&mut self, result: RunResult) -> usize {
        self.any_success |= result.success;
        self.duration += result.duration();
        self.errors.extend(result.errors);

        let before = self.records.len();
        for record in result.records {
            if self.remaining() == 0 {
                break;
            }
            let fresh = match record.email_key() {
                Some(email) => self.emails.insert(email),
                None => !self.ids.contains(&record.id),
            };
            if fresh {
                self.ids.insert(record.id.clone());
                self.records.push(record);
            }
        }
        self.records.len() - before
    }

    fn finish(self, target_name: &str) -> RunResult {
        RunResult::new(
            target_name,
            self.any_success,
            self.records,
            self.errors,
            self.duration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CandidateRecord;
    use repscout_targets::TargetRegistry;

    fn record(first: &str, email: Option<&str>) -> Record {
        let registry = TargetRegistry::builtin().expect("builtin catalog");
        Record::from_candidate(
            CandidateRecord {
                first_name: Some(first.to_string()),
                email: email.map(str::to_string),
                ..CandidateRecord::default()
            },
            registry.find_by_slug("avon").expect("avon present"),
        )
    }

    fn result(success: bool, records: Vec<Record>, errors: &[&str]) -> RunResult {
        RunResult::new(
            "Avon",
            success,
            records,
            errors.iter().map(|e| (*e).to_string()).collect(),
            Duration::from_millis(100),
        )
    }

    #[test]
    fn test_merge_dedups_and_sums() {
        let mut merged = MergedRun::new(10);
        merged.absorb(result(
            false,
            vec![record("Ann", Some("ann@gmail.com")), record("Bea", None)],
            &["[Avon] locator down"],
        ));
        let added = merged.absorb(result(
            true,
            vec![
                record("Ann", Some("ANN@gmail.com")),
                record("Bea", None),
                record("Cy", None),
                record("Unknown", Some("u1@gmail.com")),
                record("Unknown", Some("u2@gmail.com")),
            ],
            &[],
        ));
        assert_eq!(added, 3);

        let result = merged.finish("Avon");
        assert!(result.success);
        assert_eq!(result.records_found, 5);
        assert_eq!(result.emails_found, 3);
        assert_eq!(result.errors, vec!["[Avon] locator down".to_string()]);
        assert_eq!(result.duration_ms, 200);
    }

    #[test]
    fn test_merge_respects_cap() {
        let mut merged = MergedRun::new(2);
        merged.absorb(result(
            true,
            vec![
                record("A", Some("a@gmail.com")),
                record("B", Some("b@gmail.com")),
                record("C", Some("c@gmail.com")),
            ],
            &[],
        ));
        assert_eq!(merged.remaining(), 0);
        assert_eq!(merged.finish("Avon").records_found, 2);
    }

    #[test]
    fn test_merge_all_failed() {
        let mut merged = MergedRun::new(5);
        merged.absorb(result(false, vec![], &["a"]));
        merged.absorb(result(false, vec![], &["b"]));
        let result = merged.finish("Avon");
        assert!(!result.success);
        assert_eq!(result.errors.len(), 2);
    }
}
