//! Repscout Scanner - record collection engine.
//!
//! This crate turns a target from the catalog into a set of contact records.
//! It drives a browser session through one of three collection strategies,
//! extracts names, emails, phones and social links from the pages visited,
//! and exports the results.
//!
//! # Features
//!
//! - Structured locator search, search-engine discovery and social discovery
//! - Multi-strategy fallback with cross-strategy email deduplication
//! - Per-run rate limiting and navigation retry with exponential backoff
//! - Exactly-once browser session cleanup, including on errors and panics
//! - JSON, CSV, email-only CSV and Markdown report export
//!
//! # Example
//!
//! ```rust,ignore
//! use repscout_browser::ChromiumSessionManager;
//! use repscout_scanner::{Orchestrator, RunOptions};
//! use repscout_targets::{SelectorTable, TargetRegistry};
//!
//! let registry = TargetRegistry::builtin()?;
//! let orchestrator = Orchestrator::new(
//!     ChromiumSessionManager::new(config.browser.clone()),
//!     SelectorTable::builtin()?,
//! );
//!
//! let target = registry.find_by_slug("mary-kay")?;
//! let result = orchestrator
//!     .run_with_fallbacks(target, &RunOptions::with_max_records(50))
//!     .await;
//! println!("{} records, {} emails", result.records_found, result.emails_found);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod context;
pub mod dom;
pub mod error;
pub mod export;
pub mod extract;
mod fallback;
pub mod location;
pub mod names;
pub mod navigator;
pub mod options;
pub mod orchestrator;
pub mod record;
pub mod strategies;

pub use context::RunContext;
pub use error::{Result, ScanError};
pub use export::{merge_records, Exporter, ExportedFiles};
pub use extract::{
    extract_emails, extract_phones, extract_social_links, is_personal_email, is_valid_email,
    random_delay, Confidence, ExtractedEmail,
};
pub use names::{NameCleaner, ParsedName};
pub use navigator::Navigator;
pub use options::RunOptions;
pub use orchestrator::Orchestrator;
pub use record::{CandidateRecord, Record, RunResult, SocialLinks, SocialPlatform};
pub use strategies::Strategy;
