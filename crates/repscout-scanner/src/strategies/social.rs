//! Social platform discovery.
//!
//! Per city: a Facebook-scoped Bing search, then two platform-agnostic Bing
//! searches. Only pages showing an email are kept.

use super::{bing_url, mentions_any};
use crate::context::RunContext;
use crate::dom::Document;
use crate::error::Result;
use crate::extract::{extract_emails, extract_phones};
use crate::location::CityState;
use crate::names::NameCleaner;
use crate::navigator::Navigator;
use crate::options::RunOptions;
use crate::record::{CandidateRecord, SocialPlatform};
use regex::Regex;
use repscout_browser::PageActions;
use repscout_targets::TargetConfig;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Pages visited per search.
const LINKS_PER_SEARCH: usize = 3;

/// Cities searched outside test mode.
const CITIES: usize = 8;

/// Cities searched in test mode.
const TEST_CITIES: usize = 2;

const FACEBOOK_LINK_SELECTOR: &str = "a[href*=\"facebook.com\"]";
const BING_RESULT_SELECTOR: &str = ".b_algo a";

const FACEBOOK_EXCLUDED_PATHS: &[&str] = &["/login", "/help"];
const GENERAL_EXCLUDED_DOMAINS: &[&str] = &["bing.com", "microsoft.com"];

/// What a visited page is recorded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    Facebook,
    Website,
}

fn bing_redirect_target() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&]u=a1([^&]+)").expect("valid pattern"))
}

/// Unwrap a Bing click-tracking URL to its destination.
///
/// Anything that is not a decodable Bing redirect is returned unchanged.
#[must_use]
pub fn clean_bing_url(url: &str) -> String {
    if !url.contains("bing.com/ck") {
        return url.to_string();
    }
    bing_redirect_target()
        .captures(url)
        .and_then(|caps| urlencoding::decode(&caps[1]).ok().map(|d| d.into_owned()))
        .unwrap_or_else(|| url.to_string())
}

/// Social strategy configured for one target.
#[derive(Debug, Clone)]
pub struct SocialStrategy {
    names: NameCleaner,
}

impl SocialStrategy {
    /// Strategy for `target`.
    #[must_use]
    pub fn new(target: &TargetConfig) -> Self {
        Self {
            names: NameCleaner::page_title(&target.name),
        }
    }

    pub(crate) async fn collect<P: PageActions>(
        &self,
        options: &RunOptions,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
    ) -> Result<()> {
        let cities = options.cities(CITIES, TEST_CITIES);
        info!(slug = %ctx.target().slug, cities = cities.len(), "running social searches");

        for location in cities {
            if ctx.is_full() {
                break;
            }

            let name = ctx.target().name.clone();
            let facebook_query = format!(
                "site:facebook.com \"{name}\" consultant {} {}",
                location.city, location.state
            );
            if let Err(e) = self.search(nav, ctx, &facebook_query, PageKind::Facebook, location).await {
                ctx.log_error(format!("Facebook search failed for {}: {e}", location.city));
            }
            nav.pause(nav.pacing().between_queries).await;

            for query in [
                format!("\"{name}\" independent consultant {} {} email", location.city, location.state),
                format!("\"{name}\" sales rep {} {} contact", location.city, location.state),
            ] {
                if ctx.is_full() {
                    break;
                }
                if let Err(e) = self.search(nav, ctx, &query, PageKind::Website, location).await {
                    ctx.log_error(format!("Search failed for {query}: {e}"));
                }
                nav.pause(nav.pacing().between_queries).await;
            }
        }

        Ok(())
    }

    async fn search<P: PageActions>(
        &self,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
        query: &str,
        kind: PageKind,
        location: CityState,
    ) -> Result<()> {
        debug!(query, "searching");
        let search_url = bing_url(query);
        if !nav.goto(&search_url, ctx).await {
            return Ok(());
        }
        nav.pause(nav.pacing().after_search).await;

        let html = nav.page().content().await?;
        let links = match kind {
            PageKind::Facebook => facebook_links(&html, &search_url),
            PageKind::Website => website_links(&html, &search_url),
        };
        debug!(query, links = links.len(), "result links");

        for link in links.iter().take(LINKS_PER_SEARCH) {
            if ctx.is_full() {
                break;
            }
            if let Err(e) = self.visit(nav, ctx, link, kind, location).await {
                debug!(url = %link, error = %e, "page skipped");
            }
        }
        Ok(())
    }

    async fn visit<P: PageActions>(
        &self,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
        url: &str,
        kind: PageKind,
        location: CityState,
    ) -> Result<()> {
        if !nav.goto(url, ctx).await {
            return Ok(());
        }
        if kind == PageKind::Website {
            nav.scroll().await;
        }

        let html = nav.page().content().await?;
        let title = nav.page().title().await?;
        match self.parse_page(&html, &title, url, kind, location) {
            Some(candidate) => {
                ctx.add_record(candidate);
            }
            None => debug!(url, "no email on page"),
        }
        Ok(())
    }

    fn parse_page(
        &self,
        html: &str,
        title: &str,
        url: &str,
        kind: PageKind,
        location: CityState,
    ) -> Option<CandidateRecord> {
        let email = extract_emails(html, url).into_iter().next()?.email;
        let text = Document::parse(html, url).visible_text();
        let name = self.names.parse(title);

        let mut candidate = CandidateRecord {
            first_name: Some(name.as_ref().map_or_else(|| "Unknown".to_string(), |n| n.first.clone())),
            last_name: name.map(|n| n.last).filter(|l| !l.is_empty()),
            email: Some(email),
            phone: extract_phones(&text).into_iter().next(),
            city: Some(location.city.to_string()),
            state: Some(location.state.to_string()),
            profile_url: Some(url.to_string()),
            ..CandidateRecord::default()
        };
        match kind {
            PageKind::Facebook => {
                candidate
                    .social_links
                    .insert(SocialPlatform::Facebook, url.to_string());
            }
            PageKind::Website => candidate.personal_website = Some(url.to_string()),
        }
        Some(candidate)
    }
}

/// Facebook pages linked from a results page, unwrapped and deduplicated.
fn facebook_links(html: &str, search_url: &str) -> Vec<String> {
    let mut links = Vec::new();
    for href in Document::parse(html, search_url).hrefs(FACEBOOK_LINK_SELECTOR) {
        if mentions_any(&href, FACEBOOK_EXCLUDED_PATHS) {
            continue;
        }
        let clean = clean_bing_url(&href);
        if clean.starts_with("http") && clean.contains("facebook.com") && !links.contains(&clean) {
            links.push(clean);
        }
    }
    links
}

/// Outbound organic results, unwrapped from Bing redirects and deduplicated.
fn website_links(html: &str, search_url: &str) -> Vec<String> {
    let mut links = Vec::new();
    for href in Document::parse(html, search_url).hrefs(BING_RESULT_SELECTOR) {
        let clean = clean_bing_url(&href);
        if clean.starts_with("http") && !mentions_any(&clean, GENERAL_EXCLUDED_DOMAINS) && !links.contains(&clean) {
            links.push(clean);
        }
    }
    links
}
