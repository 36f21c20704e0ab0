//! Catalog loading, listing and target selection.

use crate::args::{Args, TEST_MODE_MAX_TARGETS};
use anyhow::{bail, Context, Result};
use repscout_core::AppConfig;
use repscout_targets::{SelectorTable, TargetConfig, TargetLoader, TargetRegistry};
use std::fmt::Write as _;
use tracing::{info, warn};

/// Registry from the configured definitions directory, or the built-in catalog.
pub fn load_registry(config: &AppConfig) -> Result<TargetRegistry> {
    match &config.targets.definitions_dir {
        Some(dir) => {
            let loader = TargetLoader::new(dir)
                .with_context(|| format!("opening target definitions in {}", dir.display()))?;
            Ok(TargetRegistry::load_from(&loader)?)
        }
        None => Ok(TargetRegistry::builtin()?),
    }
}

/// Selector table from the configured file, or the built-in one.
pub fn load_selectors(config: &AppConfig) -> Result<SelectorTable> {
    match &config.targets.selectors_file {
        Some(path) => Ok(SelectorTable::load(path)?),
        None => Ok(SelectorTable::builtin()?),
    }
}

/// Targets to run: the named ones, the whole catalog with `--all`, or every
/// enabled one. Test mode keeps the first two.
pub fn select_targets<'r>(registry: &'r TargetRegistry, args: &Args) -> Result<Vec<&'r TargetConfig>> {
    let slugs = args.target_slugs();
    let mut targets = if args.all {
        let disabled = registry.all().iter().filter(|t| !t.enabled).count();
        if disabled > 0 {
            warn!(disabled, "--all includes targets disabled in the catalog");
        }
        registry.all().iter().collect()
    } else if slugs.is_empty() {
        registry.list_enabled()
    } else {
        let mut picked: Vec<&TargetConfig> = Vec::new();
        for slug in slugs {
            let target = registry.find_by_slug(slug)?;
            if !target.enabled {
                warn!(slug, "running a target that is disabled in the catalog");
            }
            if !picked.iter().any(|t| t.slug == target.slug) {
                picked.push(target);
            }
        }
        picked
    };

    if args.test && targets.len() > TEST_MODE_MAX_TARGETS {
        info!(kept = TEST_MODE_MAX_TARGETS, of = targets.len(), "test mode: trimming target list");
        targets.truncate(TEST_MODE_MAX_TARGETS);
    }
    if targets.is_empty() {
        bail!("no targets to run");
    }
    Ok(targets)
}

/// Catalog grouped by category, one target per line.
pub fn render_catalog(registry: &TargetRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} targets, {} enabled\n",
        registry.count(),
        registry.list_enabled().len()
    );
    for category in registry.categories() {
        let _ = writeln!(out, "{}:", category.display_name());
        for target in registry.list_by_category(category) {
            let mark = if target.enabled { '✓' } else { '✗' };
            let locator = if target.has_locator() { " [locator]" } else { "" };
            let _ = writeln!(
                out,
                "  {mark} {:<20} {}{locator} ({}, {}/min)",
                target.slug.as_str(),
                target.name,
                target.strategy,
                target.rate_limit
            );
        }
        out.push('\n');
    }
    out
}
