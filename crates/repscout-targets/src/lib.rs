//! Repscout Targets - catalog of target organizations.
//!
//! This crate holds the Target Registry: the immutable descriptors of every
//! organization whose public representatives are collected, and the
//! data-driven selector table that drives structured locator pages.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): `TargetConfig`, strategy and category enums
//! - **Loader** ([`loader`]): built-in catalog and TOML directory loading
//! - **Registry** ([`registry`]): read-only catalog with query support
//! - **Selectors** ([`selectors`]): slug-keyed locator selector sets with a default
//! - **Errors** ([`error`]): target-specific error types
//!
//! # Example
//!
//! ```rust
//! use repscout_targets::{SelectorTable, TargetRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TargetRegistry::builtin()?;
//! let selectors = SelectorTable::builtin()?;
//!
//! let target = registry.find_by_slug("mary-kay")?;
//! let set = selectors.for_slug(&target.slug);
//!
//! println!("{} -> {}", target.name, set.search_input);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;
pub mod selectors;

pub use definition::{StrategyKind, TargetCategory, TargetConfig, TargetFile, MAX_RATE_LIMIT};
pub use error::{Result, TargetError};
pub use loader::TargetLoader;
pub use registry::TargetRegistry;
pub use selectors::{LocatorSelectors, SelectorTable};
