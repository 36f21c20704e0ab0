//! Target definition types.
//!
//! A [`TargetConfig`] is an immutable descriptor of one organization whose
//! public representatives are collected. Strategy assignment and rate limit are
//! plain data so that one orchestrator can drive every collection method.

use crate::error::{Result, TargetError};
use repscout_core::TargetSlug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound accepted for `rate_limit`, in navigations per minute.
pub const MAX_RATE_LIMIT: u32 = 600;

/// Descriptor of one target organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Display name, e.g. "Mary Kay"
    pub name: String,

    /// URL-safe identifier, e.g. "mary-kay"
    pub slug: TargetSlug,

    /// Organization home page; recorded as the source of every record
    pub base_url: String,

    /// Structured "find a representative" entry point, if the target has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator_url: Option<String>,

    /// Catalog grouping
    pub category: TargetCategory,

    /// Whether "all enabled" runs include this target
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Collection method assigned to this target
    pub strategy: StrategyKind,

    /// Navigations per minute
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,

    /// Free-form remarks
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

fn default_enabled() -> bool {
    true
}

fn default_rate_limit() -> u32 {
    10
}

impl TargetConfig {
    /// Whether the target exposes a structured locator entry point.
    #[must_use]
    pub fn has_locator(&self) -> bool {
        self.locator_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Validate the definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("target name cannot be empty"));
        }

        Self::validate_url(&self.base_url)
            .map_err(|reason| self.invalid(format!("base_url {reason}")))?;

        if let Some(locator) = &self.locator_url {
            Self::validate_url(locator)
                .map_err(|reason| self.invalid(format!("locator_url {reason}")))?;
        }

        if self.rate_limit == 0 || self.rate_limit > MAX_RATE_LIMIT {
            return Err(self.invalid(format!(
                "rate_limit must be 1-{MAX_RATE_LIMIT}, got {}",
                self.rate_limit
            )));
        }

        Ok(())
    }

    fn validate_url(raw: &str) -> std::result::Result<(), String> {
        let parsed = url::Url::parse(raw).map_err(|e| format!("is not a valid URL: {e}"))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!("must use http or https, got {other}")),
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> TargetError {
        TargetError::ValidationError {
            slug: self.slug.to_string(),
            reason: reason.into(),
        }
    }
}

/// Collection method assigned to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Drive the target's own structured locator search form
    Locator,
    /// Discover personal pages through a general-purpose search engine
    SearchEngine,
    /// Discover public social-platform pages through site-scoped search
    Social,
}

impl StrategyKind {
    /// All strategies in fallback order.
    pub const ALL: [Self; 3] = [Self::Locator, Self::SearchEngine, Self::Social];

    /// Stable kebab-case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locator => "locator",
            Self::SearchEngine => "search-engine",
            Self::Social => "social",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "locator" => Ok(Self::Locator),
            "search-engine" | "search" => Ok(Self::SearchEngine),
            "social" => Ok(Self::Social),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// Catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetCategory {
    /// Skincare and makeup
    BeautyCosmetics,
    /// Essential oils
    WellnessEssentialOils,
    /// Supplements and weight management
    WellnessNutrition,
    /// Wellness and household goods
    WellnessHousehold,
    /// Cookware and storage
    HomeKitchen,
    /// Cleaning products
    HomeCleaning,
    /// Bags and home accessories
    HomeAccessories,
    /// Candles and wax melts
    HomeFragrance,
    /// Jewelry and accessories
    FashionJewelry,
    /// Clothing
    FashionClothing,
    /// Books
    BooksEducation,
    /// Broad product catalogs
    MultiCategory,
    /// Insurance and investments
    FinancialServices,
    /// Fitness programs
    Fitness,
    /// Wine
    Wine,
    /// Food and spices
    FoodSpices,
    /// Personal safety products
    SafetyProducts,
}

impl TargetCategory {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BeautyCosmetics => "Beauty & Cosmetics",
            Self::WellnessEssentialOils => "Wellness & Essential Oils",
            Self::WellnessNutrition => "Wellness & Nutrition",
            Self::WellnessHousehold => "Wellness & Household",
            Self::HomeKitchen => "Home & Kitchen",
            Self::HomeCleaning => "Home & Cleaning",
            Self::HomeAccessories => "Home & Accessories",
            Self::HomeFragrance => "Home Fragrance",
            Self::FashionJewelry => "Fashion & Jewelry",
            Self::FashionClothing => "Fashion & Clothing",
            Self::BooksEducation => "Books & Education",
            Self::MultiCategory => "Multi-Category",
            Self::FinancialServices => "Financial Services",
            Self::Fitness => "Fitness",
            Self::Wine => "Wine",
            Self::FoodSpices => "Food & Spices",
            Self::SafetyProducts => "Safety Products",
        }
    }
}

impl fmt::Display for TargetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// On-disk shape of a definition file: one or more `[[targets]]` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetFile {
    /// Definitions in file order
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}
