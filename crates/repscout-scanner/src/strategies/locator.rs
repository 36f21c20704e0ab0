//! Structured locator search.
//!
//! Drives a target's own "find a consultant" form city by city, following
//! result cards to profile pages.

use crate::context::RunContext;
use crate::dom::Document;
use crate::error::Result;
use crate::extract::{extract_emails, extract_phones, extract_social_links, random_delay};
use crate::location::CityState;
use crate::names::NameCleaner;
use crate::navigator::Navigator;
use crate::options::RunOptions;
use crate::record::CandidateRecord;
use repscout_browser::PageActions;
use repscout_core::config::DelayRange;
use repscout_targets::{LocatorSelectors, TargetConfig};
use std::time::Duration;
use tracing::{debug, info};

/// Profiles visited per searched city.
const PROFILES_PER_LOCATION: usize = 10;

/// Cities searched outside test mode.
const CITIES: usize = 25;

/// Cities searched in test mode.
const TEST_CITIES: usize = 3;

/// How long to wait for the results container after submitting.
const RESULTS_TIMEOUT: Duration = Duration::from_secs(5);

const NAME_SELECTORS: &[&str] = &[
    "h1",
    ".consultant-name",
    ".profile-name",
    ".rep-name",
    "[class*=\"name\"]",
    "h2",
];

const WEBSITE_SELECTOR: &str = "a[href*=\"website\"], a[rel=\"external\"]";

/// Locator strategy configured for one target.
#[derive(Debug, Clone)]
pub struct LocatorStrategy {
    selectors: LocatorSelectors,
    names: NameCleaner,
}

impl LocatorStrategy {
    /// Strategy for `target` using `selectors` to drive its form.
    #[must_use]
    pub fn new(target: &TargetConfig, selectors: LocatorSelectors) -> Self {
        Self {
            selectors,
            names: NameCleaner::profile_heading(&target.name),
        }
    }

    pub(crate) async fn collect<P: PageActions>(
        &self,
        options: &RunOptions,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
    ) -> Result<()> {
        let Some(entry_point) = ctx.target().locator_url.clone() else {
            ctx.log_error("No locator URL configured");
            ctx.abort();
            return Ok(());
        };

        if !nav.goto(&entry_point, ctx).await {
            ctx.abort();
            return Ok(());
        }
        nav.pause(nav.pacing().after_entry_point).await;

        for location in options.cities(CITIES, TEST_CITIES) {
            if ctx.is_full() {
                break;
            }
            info!(
                slug = %ctx.target().slug,
                city = location.city,
                state = location.state,
                "searching locator"
            );

            if let Err(e) = self.search_location(nav, ctx, location).await {
                ctx.log_error(format!(
                    "Search failed for {}, {}: {e}",
                    location.city, location.state
                ));
            }

            if ctx.is_full() {
                break;
            }
            // Reset the form for the next city
            if nav.goto(&entry_point, ctx).await {
                nav.pause(nav.pacing().after_navigation).await;
            }
        }

        Ok(())
    }

    async fn search_location<P: PageActions>(
        &self,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
        location: CityState,
    ) -> Result<()> {
        self.submit_search(nav, location).await?;

        let html = nav.page().content().await?;
        let base_url = ctx.target().base_url.clone();
        let links = Document::parse(&html, &base_url).card_links(&self.selectors.card, &self.selectors.link);
        debug!(
            city = location.city,
            state = location.state,
            profiles = links.len(),
            "collected profile links"
        );

        for url in links.iter().take(PROFILES_PER_LOCATION) {
            if ctx.is_full() {
                break;
            }
            if let Err(e) = self.visit_profile(nav, ctx, url, location).await {
                debug!(url = %url, error = %e, "profile skipped");
            }
            nav.pause(nav.pacing().between_profiles).await;
        }

        Ok(())
    }

    async fn submit_search<P: PageActions>(&self, nav: &Navigator<'_, P>, location: CityState) -> Result<()> {
        let page = nav.page();
        let query = format!("{}, {}", location.city, location.state);

        if !page.fill_field(&self.selectors.search_input, &query).await? {
            debug!(selector = %self.selectors.search_input, "search input not found");
            return Ok(());
        }
        nav.pause(nav.pacing().after_typing).await;

        if !page.click(&self.selectors.search_button).await? {
            page.press_enter(&self.selectors.search_input).await?;
        }

        let settle = self.selectors.settle_ms;
        random_delay(DelayRange::new(settle, settle + nav.pacing().settle_jitter_ms)).await;
        if self.selectors.needs_scroll {
            nav.scroll().await;
        }

        if let Err(e) = page
            .wait_for_selector(&self.selectors.results_container, RESULTS_TIMEOUT)
            .await
        {
            debug!(error = %e, "results container not found");
        }
        Ok(())
    }

    async fn visit_profile<P: PageActions>(
        &self,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
        url: &str,
        location: CityState,
    ) -> Result<()> {
        if !nav.goto(url, ctx).await {
            return Ok(());
        }
        nav.scroll().await;

        let html = nav.page().content().await?;
        let candidate = self.parse_profile(&html, url, location);
        if candidate.email.is_none() && candidate.first_name.is_none() {
            debug!(url, "profile had no name or email");
            return Ok(());
        }
        ctx.add_record(candidate);
        Ok(())
    }

    fn parse_profile(&self, html: &str, url: &str, location: CityState) -> CandidateRecord {
        let doc = Document::parse(html, url);

        let name = NAME_SELECTORS
            .iter()
            .filter_map(|css| doc.first_text(css))
            .find_map(|text| self.names.parse(&text));

        let (first_name, last_name) = match name {
            Some(n) => (Some(n.first), (!n.last.is_empty()).then_some(n.last)),
            None => (None, None),
        };

        CandidateRecord {
            first_name,
            last_name,
            email: extract_emails(html, url).into_iter().next().map(|e| e.email),
            phone: extract_phones(&doc.visible_text()).into_iter().next(),
            city: Some(location.city.to_string()),
            state: Some(location.state.to_string()),
            zip_code: None,
            profile_url: Some(url.to_string()),
            personal_website: doc.first_attr(WEBSITE_SELECTOR, "href"),
            social_links: extract_social_links(html),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repscout_targets::{SelectorTable, TargetRegistry};

    fn strategy() -> LocatorStrategy {
        let registry = TargetRegistry::builtin().expect("builtin catalog");
        let target = registry.find_by_slug("mary-kay").expect("mary-kay present");
        let selectors = SelectorTable::builtin().expect("builtin selectors");
        LocatorStrategy::new(target, selectors.for_slug(&target.slug).clone())
    }

    const AUSTIN: CityState = CityState {
        city: "Austin",
        state: "TX",
    };

    #[test]
    fn test_parse_profile() {
        let html = r#"<html><body>
            <h1>Jane Doe - Independent Beauty Consultant</h1>
            <p>Call 512-555-0101</p>
            <a href="mailto:Jane.Doe@Gmail.com">Email me</a>
            <a rel="external" href="https://janedoe.biz/">My site</a>
            <a href="https://www.instagram.com/janedoe_mk">ig</a>
        </body></html>"#;
        let candidate = strategy().parse_profile(html, "https://www.marykay.com/janedoe", AUSTIN);
        assert_eq!(candidate.first_name.as_deref(), Some("Jane"));
        assert_eq!(candidate.last_name.as_deref(), Some("Doe"));
        assert_eq!(candidate.email.as_deref(), Some("jane.doe@gmail.com"));
        assert_eq!(candidate.phone.as_deref(), Some("(512) 555-0101"));
        assert_eq!(candidate.city.as_deref(), Some("Austin"));
        assert_eq!(candidate.state.as_deref(), Some("TX"));
        assert_eq!(candidate.personal_website.as_deref(), Some("https://janedoe.biz/"));
        assert_eq!(candidate.social_links.len(), 1);
        assert_eq!(candidate.profile_url.as_deref(), Some("https://www.marykay.com/janedoe"));
    }

    #[test]
    fn test_parse_profile_skips_unusable_headings() {
        let html = r#"<html><body>
            <h1>Consultant</h1>
            <div class="profile-name">Ann Lee</div>
        </body></html>"#;
        let candidate = strategy().parse_profile(html, "https://www.marykay.com/ann", AUSTIN);
        assert_eq!(candidate.first_name.as_deref(), Some("Ann"));
        assert_eq!(candidate.last_name.as_deref(), Some("Lee"));
        assert_eq!(candidate.email, None);
    }

    #[test]
    fn test_parse_profile_single_name() {
        let html = "<html><body><h2>Bea</h2></body></html>";
        let candidate = strategy().parse_profile(html, "https://www.marykay.com/bea", AUSTIN);
        assert_eq!(candidate.first_name.as_deref(), Some("Bea"));
        assert_eq!(candidate.last_name, None);
    }
}
