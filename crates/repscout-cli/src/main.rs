//! `repscout` - collect public representative records from the target catalog.

mod args;
mod catalog;
mod run;

use anyhow::{bail, Context, Result};
use args::Args;
use clap::Parser;
use repscout_browser::ChromiumSessionManager;
use repscout_core::AppConfig;
use repscout_scanner::{Orchestrator, RunOptions};
use std::time::Duration;
use tracing::info;

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "info,repscout=debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load().context("loading config")?,
    };
    config.apply_env();
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("Starting repscout v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let registry = catalog::load_registry(&config)?;

    if args.list {
        print!("{}", catalog::render_catalog(&registry));
        return Ok(());
    }

    let targets = catalog::select_targets(&registry, &args)?;
    let options = RunOptions::with_max_records(args.effective_max_records(config.run.max_records))
        .states(&args.states)
        .test_mode(args.test);
    let plan = run::ExportPlan {
        dir: args.output.clone().unwrap_or_else(|| config.run.output_dir.clone()),
        format: args.format.map_or(config.run.format, Into::into),
    };
    info!(
        targets = targets.len(),
        max_records = options.max_records,
        test_mode = options.test_mode,
        strategy = ?args.strategy,
        output = %plan.dir.display(),
        "run configured"
    );

    let sessions = ChromiumSessionManager::new(config.browser.clone())
        .with_keystroke_delay(Duration::from_millis(config.pacing.keystroke_delay_ms));
    let orchestrator = Orchestrator::from_config(sessions, catalog::load_selectors(&config)?, &config);

    let outcome = run::run_targets(&orchestrator, &targets, args.strategy.kind(), &options, &plan).await?;
    println!("{}", run::render_summary(&outcome));

    if !outcome.any_success() {
        bail!("every target run failed");
    }
    Ok(())
}
