//! Repscout Core - Foundation crate for the repscout collection engine.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other repscout crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`TargetSlug`, `RecordId`, `Timestamp`)
//!
//! # Example
//!
//! ```rust
//! use repscout_core::{AppConfig, RecordId, TargetSlug};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert!(config.browser.headless);
//!
//! let slug = TargetSlug::new("mary-kay")?;
//! let id = RecordId::derive("Mary Kay", "Jane", "Doe");
//! assert_eq!(id, RecordId::derive("Mary Kay", "Jane", "Doe"));
//! # let _ = slug;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, ExportFormat, PacingConfig, RetryConfig, RunConfig, TargetsConfig,
};
pub use error::{ConfigError, ConfigResult, RepscoutError, Result};
pub use types::{RecordId, TargetSlug, Timestamp};
