//! In-memory target registry with query support.

use crate::{
    definition::{TargetCategory, TargetConfig},
    error::{Result, TargetError},
    loader::TargetLoader,
};
use repscout_core::TargetSlug;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Read-only catalog of target definitions.
///
/// Definitions keep catalog order so "all enabled" runs are reproducible.
/// A registry is built once at startup and never mutated while runs execute.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<TargetConfig>,
}

impl TargetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry over the built-in catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_targets(TargetLoader::builtin_catalog()?)
    }

    /// Registry over every valid definition in a loader's directory.
    pub fn load_from(loader: &TargetLoader) -> Result<Self> {
        Self::from_targets(loader.load_all()?)
    }

    /// Build a registry from definitions; later duplicates replace earlier ones.
    pub fn from_targets(targets: impl IntoIterator<Item = TargetConfig>) -> Result<Self> {
        let mut registry = Self::new();
        for target in targets {
            registry.insert(target)?;
        }
        info!(count = registry.count(), "target registry ready");
        Ok(registry)
    }

    /// Add or replace a definition, keeping the original position on replace.
    pub fn insert(&mut self, target: TargetConfig) -> Result<()> {
        target.validate()?;

        if let Some(existing) = self.targets.iter_mut().find(|t| t.slug == target.slug) {
            debug!(slug = %target.slug, "replaced target definition");
            *existing = target;
        } else {
            debug!(slug = %target.slug, "inserted target definition");
            self.targets.push(target);
        }

        Ok(())
    }

    /// Enabled targets in catalog order.
    #[must_use]
    pub fn list_enabled(&self) -> Vec<&TargetConfig> {
        self.targets.iter().filter(|t| t.enabled).collect()
    }

    /// Look up a target by slug.
    ///
    /// # Errors
    /// Returns `NotFound` when no target has this slug.
    pub fn find_by_slug(&self, slug: &str) -> Result<&TargetConfig> {
        self.targets
            .iter()
            .find(|t| t.slug.as_str() == slug)
            .ok_or_else(|| TargetError::NotFound {
                slug: slug.to_string(),
            })
    }

    /// Look up a target by validated slug.
    pub fn get(&self, slug: &TargetSlug) -> Result<&TargetConfig> {
        self.find_by_slug(slug.as_str())
    }

    /// Targets in one category, in catalog order.
    #[must_use]
    pub fn list_by_category(&self, category: TargetCategory) -> Vec<&TargetConfig> {
        self.targets
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Distinct categories present, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<TargetCategory> {
        self.count_by_category().into_keys().collect()
    }

    /// Number of targets per category.
    #[must_use]
    pub fn count_by_category(&self) -> BTreeMap<TargetCategory, usize> {
        let mut counts = BTreeMap::new();
        for target in &self.targets {
            *counts.entry(target.category).or_insert(0) += 1;
        }
        counts
    }

    /// All targets in catalog order.
    #[must_use]
    pub fn all(&self) -> &[TargetConfig] {
        &self.targets
    }

    /// Total number of targets.
    #[must_use]
    pub fn count(&self) -> usize {
        self.targets.len()
    }

    /// Whether a target with this slug exists.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.targets.iter().any(|t| t.slug.as_str() == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::StrategyKind;

    fn create_test_target(slug: &str, category: TargetCategory, enabled: bool) -> TargetConfig {
        TargetConfig {
            name: format!("Test {slug}"),
            slug: TargetSlug::new(slug).expect("valid slug"),
            base_url: format!("https://{slug}.example.org"),
            locator_url: None,
            category,
            enabled,
            strategy: StrategyKind::SearchEngine,
            rate_limit: 10,
            notes: String::new(),
        }
    }

    fn sample_registry() -> TargetRegistry {
        TargetRegistry::from_targets([
            create_test_target("first-co", TargetCategory::Wine, true),
            create_test_target("second-co", TargetCategory::Fitness, false),
            create_test_target("third-co", TargetCategory::Wine, true),
        ])
        .expect("build registry")
    }

    #[test]
    fn test_registry_new() {
        assert_eq!(TargetRegistry::new().count(), 0);
    }

    #[test]
    fn test_list_enabled_preserves_order() {
        let registry = sample_registry();
        let enabled: Vec<_> = registry
            .list_enabled()
            .iter()
            .map(|t| t.slug.as_str())
            .collect();
        assert_eq!(enabled, vec!["first-co", "third-co"]);
    }

    #[test]
    fn test_find_by_slug() {
        let registry = sample_registry();
        let found = registry.find_by_slug("second-co").expect("find target");
        assert_eq!(found.name, "Test second-co");

        let result = registry.find_by_slug("nope");
        assert!(matches!(result, Err(TargetError::NotFound { .. })));
    }

    #[test]
    fn test_list_by_category() {
        let registry = sample_registry();
        assert_eq!(registry.list_by_category(TargetCategory::Wine).len(), 2);
        assert_eq!(registry.list_by_category(TargetCategory::Fitness).len(), 1);
        assert!(registry
            .list_by_category(TargetCategory::SafetyProducts)
            .is_empty());
        assert_eq!(
            registry.categories(),
            vec![TargetCategory::Fitness, TargetCategory::Wine]
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut registry = sample_registry();
        let mut updated = create_test_target("first-co", TargetCategory::Wine, true);
        updated.rate_limit = 30;
        registry.insert(updated).expect("replace target");

        assert_eq!(registry.count(), 3);
        assert_eq!(registry.all()[0].rate_limit, 30);
    }

    #[test]
    fn test_insert_rejects_invalid() {
        let mut registry = TargetRegistry::new();
        let mut bad = create_test_target("bad-co", TargetCategory::Wine, true);
        bad.rate_limit = 0;
        assert!(registry.insert(bad).is_err());
        assert!(!registry.contains("bad-co"));
    }

    #[test]
    fn test_builtin_registry() {
        let registry = TargetRegistry::builtin().expect("builtin registry");
        assert_eq!(registry.count(), 43);
        assert_eq!(registry.list_enabled().len(), 43);
        assert_eq!(registry.categories().len(), 17);

        let scentsy = registry.find_by_slug("scentsy").expect("scentsy present");
        assert!(scentsy.has_locator());
        assert_eq!(scentsy.category, TargetCategory::HomeFragrance);
    }
}
