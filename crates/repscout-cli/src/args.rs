//! Command-line arguments.

use clap::{Parser, ValueEnum};
use repscout_core::ExportFormat;
use repscout_targets::StrategyKind;
use std::path::PathBuf;

/// Record cap applied in test mode.
pub const TEST_MODE_MAX_RECORDS: usize = 10;

/// Targets processed in test mode.
pub const TEST_MODE_MAX_TARGETS: usize = 2;

#[derive(Debug, Parser)]
#[command(name = "repscout")]
#[command(version, about = "Collect public representative contact records from direct-sales directories")]
pub struct Args {
    /// Target slug; repeat the flag or pass a comma-separated list
    #[arg(short, long = "target", value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Run every catalog target, disabled ones included [default: enabled targets]
    #[arg(long, conflicts_with = "targets")]
    pub all: bool,

    /// Maximum records per target [default: from config, 100]
    #[arg(short, long)]
    pub max_records: Option<usize>,

    /// Restrict location searches to these state codes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub states: Vec<String>,

    /// Test mode: at most 10 records, 2 targets and shrunk location lists
    #[arg(long)]
    pub test: bool,

    /// Collection strategy; `auto` chains all three
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// Output directory [default: from config, ./output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format [default: from config, both]
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// List the target catalog and exit
    #[arg(long)]
    pub list: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file [default: ~/.config/repscout/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Record cap after applying the config default and test mode.
    pub fn effective_max_records(&self, configured: usize) -> usize {
        let max = self.max_records.unwrap_or(configured);
        if self.test {
            max.min(TEST_MODE_MAX_RECORDS)
        } else {
            max
        }
    }

    /// Requested target slugs, trimmed, blanks dropped.
    pub fn target_slugs(&self) -> Vec<&str> {
        self.targets
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Locator,
    SearchEngine,
    Social,
    Auto,
}

impl StrategyArg {
    /// The single strategy to run, or `None` for the fallback chain.
    pub fn kind(self) -> Option<StrategyKind> {
        match self {
            Self::Locator => Some(StrategyKind::Locator),
            Self::SearchEngine => Some(StrategyKind::SearchEngine),
            Self::Social => Some(StrategyKind::Social),
            Self::Auto => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
    Both,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Self::Json,
            FormatArg::Csv => Self::Csv,
            FormatArg::Both => Self::Both,
        }
    }
}
