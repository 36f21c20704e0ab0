//! Collection strategies.
//!
//! Each strategy discovers candidate pages for a target and turns them into
//! records through a [`RunContext`]. The orchestrator owns the browser session
//! and hands every strategy the same [`Navigator`].

mod locator;
mod search;
mod social;

pub use locator::LocatorStrategy;
pub use search::SearchEngineStrategy;
pub use social::SocialStrategy;

use crate::context::RunContext;
use crate::error::Result;
use crate::navigator::Navigator;
use crate::options::RunOptions;
use repscout_browser::PageActions;
use repscout_targets::{SelectorTable, StrategyKind, TargetConfig};

/// One of the three collection methods, configured for a target.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// The target's own structured locator
    Locator(LocatorStrategy),
    /// General-purpose search engine discovery
    SearchEngine(SearchEngineStrategy),
    /// Site-scoped social platform discovery
    Social(SocialStrategy),
}

impl Strategy {
    /// Configure `kind` for `target`.
    #[must_use]
    pub fn for_target(kind: StrategyKind, target: &TargetConfig, selectors: &SelectorTable) -> Self {
        match kind {
            StrategyKind::Locator => Self::Locator(LocatorStrategy::new(
                target,
                selectors.for_slug(&target.slug).clone(),
            )),
            StrategyKind::SearchEngine => Self::SearchEngine(SearchEngineStrategy::new(target)),
            StrategyKind::Social => Self::Social(SocialStrategy::new(target)),
        }
    }

    /// Which method this is.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Locator(_) => StrategyKind::Locator,
            Self::SearchEngine(_) => StrategyKind::SearchEngine,
            Self::Social(_) => StrategyKind::Social,
        }
    }

    /// Reason the strategy cannot run for `target` at all, checked before a
    /// session is opened.
    #[must_use]
    pub fn unavailable_reason(&self, target: &TargetConfig) -> Option<&'static str> {
        match self {
            Self::Locator(_) if !target.has_locator() => Some("No locator URL configured"),
            _ => None,
        }
    }

    /// Run the strategy's work loop.
    pub async fn collect<P: PageActions>(
        &self,
        options: &RunOptions,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
    ) -> Result<()> {
        match self {
            Self::Locator(s) => s.collect(options, nav, ctx).await,
            Self::SearchEngine(s) => s.collect(options, nav, ctx).await,
            Self::Social(s) => s.collect(options, nav, ctx).await,
        }
    }
}

/// DuckDuckGo web results for `query`.
#[must_use]
pub fn duckduckgo_url(query: &str) -> String {
    format!(
        "https://duckduckgo.com/?q={}&t=h_&ia=web",
        urlencoding::encode(query)
    )
}

/// Bing web results for `query`.
#[must_use]
pub fn bing_url(query: &str) -> String {
    format!("https://www.bing.com/search?q={}", urlencoding::encode(query))
}

/// Whether `url` points into any of `domains`.
fn mentions_any(url: &str, domains: &[&str]) -> bool {
    let lower = url.to_lowercase();
    domains.iter().any(|d| lower.contains(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use repscout_targets::TargetRegistry;

    #[test]
    fn test_search_urls_encode_query() {
        assert_eq!(
            duckduckgo_url("\"Avon\" consultant email"),
            "https://duckduckgo.com/?q=%22Avon%22%20consultant%20email&t=h_&ia=web"
        );
        assert_eq!(
            bing_url("site:facebook.com \"Avon\""),
            "https://www.bing.com/search?q=site%3Afacebook.com%20%22Avon%22"
        );
    }

    #[test]
    fn test_locator_unavailable_without_entry_point() {
        let registry = TargetRegistry::builtin().expect("builtin catalog");
        let selectors = SelectorTable::builtin().expect("builtin selectors");

        let youngliving = registry.find_by_slug("young-living").expect("young-living present");
        assert!(!youngliving.has_locator());
        let strategy = Strategy::for_target(StrategyKind::Locator, youngliving, &selectors);
        assert_eq!(strategy.kind(), StrategyKind::Locator);
        assert!(strategy.unavailable_reason(youngliving).is_some());

        let marykay = registry.find_by_slug("mary-kay").expect("mary-kay present");
        let strategy = Strategy::for_target(StrategyKind::Locator, marykay, &selectors);
        assert!(strategy.unavailable_reason(marykay).is_none());

        let strategy = Strategy::for_target(StrategyKind::Social, youngliving, &selectors);
        assert!(strategy.unavailable_reason(youngliving).is_none());
    }
}
