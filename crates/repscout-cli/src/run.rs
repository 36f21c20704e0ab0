//! Run loop over the selected targets and export of the merged record set.

use anyhow::{Context, Result};
use repscout_browser::SessionManager;
use repscout_core::{ExportFormat, Timestamp};
use repscout_scanner::{merge_records, Exporter, ExportedFiles, Orchestrator, RunOptions, RunResult};
use repscout_targets::{StrategyKind, TargetConfig};
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything one invocation collects.
#[derive(Debug, Default)]
pub struct Outcome {
    /// One result per target, in run order
    pub results: Vec<RunResult>,
    /// Records added on top of the previous export
    pub new_records: usize,
    /// Files written by the export
    pub files: ExportedFiles,
}

impl Outcome {
    /// Whether at least one target run succeeded.
    pub fn any_success(&self) -> bool {
        self.results.iter().any(|r| r.success)
    }
}

/// Where and how results are written.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub dir: PathBuf,
    pub format: ExportFormat,
}

/// Run every target in turn, then merge into the previous export and write.
pub async fn run_targets<M: SessionManager>(
    orchestrator: &Orchestrator<M>,
    targets: &[&TargetConfig],
    strategy: Option<StrategyKind>,
    options: &RunOptions,
    plan: &ExportPlan,
) -> Result<Outcome> {
    let exporter = Exporter::new(plan.dir.clone(), plan.format);
    let mut records = exporter
        .load_latest()
        .with_context(|| format!("loading previous records from {}", plan.dir.display()))?;
    let previous = records.len();

    let mut outcome = Outcome::default();
    for (index, target) in targets.iter().enumerate() {
        info!(
            slug = %target.slug,
            position = index + 1,
            of = targets.len(),
            "processing target"
        );

        let result = match strategy {
            Some(kind) => orchestrator.run_strategy(target, kind, options).await,
            None => orchestrator.run_with_fallbacks(target, options).await,
        };
        if !result.success {
            warn!(slug = %target.slug, errors = result.errors.len(), "target run failed");
        }

        let added = merge_records(&mut records, &result.records);
        info!(slug = %target.slug, found = result.records_found, added, "target merged");
        outcome.new_records += added;
        outcome.results.push(result);
    }

    outcome.files = exporter
        .export(&records, &outcome.results, &Timestamp::now())
        .with_context(|| format!("writing export to {}", plan.dir.display()))?;
    info!(
        previous,
        added = outcome.new_records,
        total = records.len(),
        "record set updated"
    );
    Ok(outcome)
}

/// Console summary of a finished invocation.
pub fn render_summary(outcome: &Outcome) -> String {
    let mut lines = Vec::new();
    for result in &outcome.results {
        let status = if result.success { '✓' } else { '✗' };
        lines.push(format!(
            "{status} {}: {} records, {} emails, {} errors ({:.1}s)",
            result.target,
            result.records_found,
            result.emails_found,
            result.errors.len(),
            result.duration().as_secs_f64()
        ));
    }
    lines.push(format!("{} new records", outcome.new_records));
    for path in &outcome.files.paths {
        lines.push(format!("  wrote {}", path.display()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use repscout_browser::mock::MockSite;
    use repscout_core::PacingConfig;
    use repscout_targets::{SelectorTable, TargetRegistry};
    use tempfile::TempDir;

    #[tokio::test(start_paused = true)]
    async fn test_run_targets_exports_and_merges() {
        let registry = TargetRegistry::builtin().expect("builtin catalog");
        let target = registry.find_by_slug("younique").expect("younique present");
        let options = RunOptions::with_max_records(5).test_mode(true);

        let query = repscout_scanner::strategies::SearchEngineStrategy::queries(target, &options)
            .into_iter()
            .next()
            .expect("at least one query");
        let manager = MockSite::new()
            .with_page(
                repscout_scanner::strategies::duckduckgo_url(&query),
                r#"<div class="results"><a class="result__a" href="https://amy.site/">Amy</a></div>"#,
            )
            .with_page("https://amy.site/", "<h1>Amy Lane</h1><p>amy.lane@gmail.com</p>")
            .build();
        let orchestrator = Orchestrator::new(manager, SelectorTable::builtin().expect("selectors"))
            .with_pacing(PacingConfig::none());

        let dir = TempDir::new().expect("create temp dir");
        let plan = ExportPlan {
            dir: dir.path().to_path_buf(),
            format: ExportFormat::Json,
        };

        let first = run_targets(&orchestrator, &[target], Some(StrategyKind::SearchEngine), &options, &plan)
            .await
            .expect("first run");
        assert!(first.any_success());
        assert_eq!(first.new_records, 1);
        assert!(render_summary(&first).contains("Younique: 1 records"));

        let second = run_targets(&orchestrator, &[target], Some(StrategyKind::SearchEngine), &options, &plan)
            .await
            .expect("second run");
        assert_eq!(second.new_records, 0);
        assert!(dir.path().join("records-latest.json").exists());
    }
}
