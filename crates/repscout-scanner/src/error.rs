//! Error types for collection runs.

use repscout_browser::BrowserError;
use repscout_targets::TargetError;
use thiserror::Error;

/// Errors that can occur while collecting or exporting records.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Browser session or page action failed
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Target catalog lookup or validation failed
    #[error("Target error: {0}")]
    Target(#[from] TargetError),

    /// A run panicked; the payload message is kept
    #[error("Run aborted unexpectedly: {0}")]
    Panicked(String),

    /// Filesystem error during export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record set (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for collection and export operations.
pub type Result<T> = std::result::Result<T, ScanError>;
