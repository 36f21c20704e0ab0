//! Configuration management for repscout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/repscout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser session settings
    pub browser: BrowserConfig,
    /// Randomized delays between page actions
    pub pacing: PacingConfig,
    /// Navigation retry policy
    pub retry: RetryConfig,
    /// Run defaults
    pub run: RunConfig,
    /// Target catalog sources
    pub targets: TargetsConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `REPSCOUT_HEADLESS`: Override browser headless mode (true/false)
    /// - `REPSCOUT_MAX_RECORDS`: Override the default record cap per target
    /// - `REPSCOUT_OUTPUT_DIR`: Override the export directory
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides onto an already loaded config.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("REPSCOUT_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("REPSCOUT_MAX_RECORDS") {
            if let Ok(max) = val.parse() {
                self.run.max_records = max;
                tracing::debug!("Override run.max_records from env: {}", max);
            }
        }

        if let Ok(val) = std::env::var("REPSCOUT_OUTPUT_DIR") {
            if !val.is_empty() {
                tracing::debug!("Override run.output_dir from env: {}", val);
                self.run.output_dir = PathBuf::from(val);
            }
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "browser.window_width/window_height".to_string(),
                reason: "viewport dimensions must be non-zero".to_string(),
            });
        }

        for (field, range) in self.pacing.ranges() {
            if range.min_ms > range.max_ms {
                return Err(ConfigError::InvalidValue {
                    field: format!("pacing.{field}"),
                    reason: format!("min_ms {} exceeds max_ms {}", range.min_ms, range.max_ms),
                });
            }
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/repscout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "repscout", "repscout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Browser session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Explicit Chromium executable; auto-detected when unset
    pub executable: Option<PathBuf>,
    /// Value advertised through `Accept-Language` and `navigator.languages`
    pub accept_language: String,
}

impl BrowserConfig {
    /// Navigation timeout as a `Duration`.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
            executable: None,
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Inclusive range of milliseconds used for randomized waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    /// Lower bound in milliseconds
    pub min_ms: u64,
    /// Upper bound in milliseconds
    pub max_ms: u64,
}

impl DelayRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that never waits.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }
}

/// Randomized delays between page actions.
///
/// Every wait is drawn uniformly from its range so that action cadence never
/// settles into a fixed interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Before every navigation attempt
    pub before_navigation: DelayRange,
    /// After every navigation
    pub after_navigation: DelayRange,
    /// After the structured entry point first loads
    pub after_entry_point: DelayRange,
    /// After a search engine results page loads
    pub after_search: DelayRange,
    /// Between consecutive profile page visits
    pub between_profiles: DelayRange,
    /// Between consecutive search queries
    pub between_queries: DelayRange,
    /// After typing into a search input, before submitting
    pub after_typing: DelayRange,
    /// Added on top of a locator's own settle duration
    pub settle_jitter_ms: u64,
    /// Number of viewport-height scrolls used to trigger lazy content
    pub scroll_count: u32,
    /// Pause between scrolls
    pub scroll_delay_ms: u64,
    /// Per-keystroke delay when typing
    pub keystroke_delay_ms: u64,
}

impl PacingConfig {
    /// Pacing with every wait disabled.
    #[must_use]
    pub fn none() -> Self {
        Self {
            before_navigation: DelayRange::zero(),
            after_navigation: DelayRange::zero(),
            after_entry_point: DelayRange::zero(),
            after_search: DelayRange::zero(),
            between_profiles: DelayRange::zero(),
            between_queries: DelayRange::zero(),
            after_typing: DelayRange::zero(),
            settle_jitter_ms: 0,
            scroll_count: 0,
            scroll_delay_ms: 0,
            keystroke_delay_ms: 0,
        }
    }

    fn ranges(&self) -> [(&'static str, DelayRange); 7] {
        [
            ("before_navigation", self.before_navigation),
            ("after_navigation", self.after_navigation),
            ("after_entry_point", self.after_entry_point),
            ("after_search", self.after_search),
            ("between_profiles", self.between_profiles),
            ("between_queries", self.between_queries),
            ("after_typing", self.after_typing),
        ]
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            before_navigation: DelayRange::new(500, 1500),
            after_navigation: DelayRange::new(1000, 2000),
            after_entry_point: DelayRange::new(2000, 3000),
            after_search: DelayRange::new(2000, 4000),
            between_profiles: DelayRange::new(1500, 3000),
            between_queries: DelayRange::new(3000, 5000),
            after_typing: DelayRange::new(500, 1000),
            settle_jitter_ms: 2000,
            scroll_count: 2,
            scroll_delay_ms: 1000,
            keystroke_delay_ms: 50,
        }
    }
}

/// Bounded exponential backoff for navigation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per navigation, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt
    pub base_delay_ms: u64,
}

impl RetryConfig {
    /// Delay to wait after the given zero-based failed attempt.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Output format for exported record sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON
    Json,
    /// Comma-separated values
    Csv,
    /// Both JSON and CSV
    Both,
}

impl ExportFormat {
    /// Whether JSON output is requested.
    #[must_use]
    pub fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    /// Whether CSV output is requested.
    #[must_use]
    pub fn includes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }
}

/// Run defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum records collected per target
    pub max_records: usize,
    /// Directory receiving exported files
    pub output_dir: PathBuf,
    /// Export format
    pub format: ExportFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_records: 100,
            output_dir: PathBuf::from("./output"),
            format: ExportFormat::Both,
        }
    }
}

/// Target catalog sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Directory of TOML target definitions replacing the built-in catalog
    pub definitions_dir: Option<PathBuf>,
    /// TOML file of locator selector sets replacing the built-in table
    pub selectors_file: Option<PathBuf>,
}
