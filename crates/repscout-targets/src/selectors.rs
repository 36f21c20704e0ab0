//! Locator selector sets.
//!
//! Each structured locator page is driven by a set of CSS selectors. Sets are
//! keyed by target slug with a mandatory `default` entry for targets that have
//! no dedicated set. The table is data, loaded from TOML.

use crate::error::{Result, TargetError};
use repscout_core::TargetSlug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const BUILTIN_LOCATORS: &str = include_str!("../data/locators.toml");

/// CSS selectors driving one locator search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorSelectors {
    /// Location search input
    pub search_input: String,
    /// Submit button; Enter is pressed when nothing matches
    pub search_button: String,
    /// Element wrapping the result list
    pub results_container: String,
    /// One result card per representative
    pub card: String,
    /// Profile link inside a card
    pub link: String,
    /// Name element inside a card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Location element inside a card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Wait after submitting before reading results, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Scroll to trigger lazy-loaded results
    #[serde(default)]
    pub needs_scroll: bool,
}

fn default_settle_ms() -> u64 {
    3000
}

/// Slug-keyed selector sets with a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorTable {
    /// Fallback set
    pub default: LocatorSelectors,
    /// Dedicated sets by slug
    #[serde(default)]
    pub targets: HashMap<String, LocatorSelectors>,
}

impl SelectorTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_LOCATORS, "<built-in>")
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TargetError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let table = Self::from_toml_str(&contents, &path.display().to_string())?;
        debug!(
            path = %path.display(),
            dedicated = table.targets.len(),
            "loaded locator selector table"
        );
        Ok(table)
    }

    /// Parse a table from TOML text; `origin` labels parse errors.
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|source| TargetError::ParseError {
            path: origin.to_string(),
            source,
        })
    }

    /// Selector set for a target, falling back to the default.
    #[must_use]
    pub fn for_slug(&self, slug: &TargetSlug) -> &LocatorSelectors {
        self.targets.get(slug.as_str()).unwrap_or(&self.default)
    }

    /// Whether a target has a dedicated set.
    #[must_use]
    pub fn has_dedicated(&self, slug: &TargetSlug) -> bool {
        self.targets.contains_key(slug.as_str())
    }
}
