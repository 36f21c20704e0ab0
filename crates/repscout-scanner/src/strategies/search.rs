//! Search-engine discovery.
//!
//! Queries a general-purpose engine for the target's consultants, visits the
//! most promising result pages and keeps every page that shows an email.

use super::{duckduckgo_url, mentions_any};
use crate::context::RunContext;
use crate::dom::Document;
use crate::error::Result;
use crate::extract::{extract_emails, extract_phones, extract_social_links};
use crate::location::extract_location;
use crate::names::{name_from_email, NameCleaner, ParsedName};
use crate::navigator::Navigator;
use crate::options::RunOptions;
use crate::record::CandidateRecord;
use regex::Regex;
use repscout_browser::PageActions;
use repscout_targets::TargetConfig;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

/// Result pages visited per query.
const LINKS_PER_QUERY: usize = 5;

const RESULTS_SELECTOR: &str = ".results";
const RESULTS_TIMEOUT: Duration = Duration::from_secs(5);
const RESULT_LINK_SELECTOR: &str = "a[data-testid=\"result-title-a\"], .result__a, a.result__url";

const EXCLUDED_DOMAINS: &[&str] = &[
    "duckduckgo.com",
    "google.com",
    "bing.com",
    "facebook.com/login",
    "instagram.com/accounts",
];

const NAME_SELECTORS: &[&str] = &[
    "h1",
    ".consultant-name",
    ".rep-name",
    ".profile-name",
    "[class*=\"name\"]",
    "title",
];

fn personal_site_hint() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\.my[a-z]+\.com|consultant|rep/|independent|personal").expect("valid pattern")
    })
}

/// Search-engine strategy configured for one target.
#[derive(Debug, Clone)]
pub struct SearchEngineStrategy {
    names: NameCleaner,
}

impl SearchEngineStrategy {
    /// Strategy for `target`.
    #[must_use]
    pub fn new(target: &TargetConfig) -> Self {
        Self {
            names: NameCleaner::search_heading(&target.name),
        }
    }

    /// Queries for `target`: city-qualified ones first, then generic ones.
    #[must_use]
    pub fn queries(target: &TargetConfig, options: &RunOptions) -> Vec<String> {
        let name = &target.name;
        let states = options.search_states(10, 2);

        let mut queries: Vec<String> = options
            .cities(10, 3)
            .into_iter()
            .filter(|c| states.iter().any(|s| s == c.state))
            .map(|c| format!("\"{name}\" consultant {} {}", c.city, c.state))
            .collect();

        queries.extend([
            format!("\"{name}\" consultant email contact"),
            format!("\"{name}\" independent sales rep contact"),
            format!("\"{name}\" consultant site:.com email"),
            format!("\"{name}\" independent beauty consultant"),
            format!("{} consultant personal website", target.slug),
        ]);
        queries
    }

    pub(crate) async fn collect<P: PageActions>(
        &self,
        options: &RunOptions,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
    ) -> Result<()> {
        let queries = Self::queries(ctx.target(), options);
        info!(slug = %ctx.target().slug, queries = queries.len(), "running search queries");

        for query in &queries {
            if ctx.is_full() {
                break;
            }
            if let Err(e) = self.run_query(nav, ctx, query).await {
                ctx.log_error(format!("Search failed for {query}: {e}"));
            }
            nav.pause(nav.pacing().between_queries).await;
        }

        Ok(())
    }

    async fn run_query<P: PageActions>(
        &self,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
        query: &str,
    ) -> Result<()> {
        debug!(query, "searching");
        let search_url = duckduckgo_url(query);
        if !nav.goto(&search_url, ctx).await {
            return Ok(());
        }

        if let Err(e) = nav
            .page()
            .wait_for_selector(RESULTS_SELECTOR, RESULTS_TIMEOUT)
            .await
        {
            debug!(error = %e, "no results container");
        }
        nav.pause(nav.pacing().after_search).await;

        let html = nav.page().content().await?;
        let links = result_links(&html, &search_url);
        debug!(query, links = links.len(), "result links");

        for link in links.iter().take(LINKS_PER_QUERY) {
            if ctx.is_full() {
                break;
            }
            if let Err(e) = self.visit(nav, ctx, link).await {
                ctx.log_error(format!("Failed to scrape {link}: {e}"));
            }
            nav.pause(nav.pacing().between_profiles).await;
        }
        Ok(())
    }

    async fn visit<P: PageActions>(
        &self,
        nav: &mut Navigator<'_, P>,
        ctx: &mut RunContext,
        url: &str,
    ) -> Result<()> {
        if !nav.goto(url, ctx).await {
            return Ok(());
        }
        nav.scroll().await;

        let html = nav.page().content().await?;
        match self.parse_page(&html, url) {
            Some(candidate) => {
                ctx.add_record(candidate);
            }
            None => debug!(url, "no email on page"),
        }
        Ok(())
    }

    /// Candidate from a result page, or `None` when it shows no email.
    #[must_use]
    pub fn parse_page(&self, html: &str, url: &str) -> Option<CandidateRecord> {
        let email = extract_emails(html, url).into_iter().next()?.email;
        let doc = Document::parse(html, url);
        let text = doc.visible_text();

        let name = NAME_SELECTORS
            .iter()
            .filter_map(|css| doc.first_text(css))
            .find_map(|text| self.names.parse(&text))
            .or_else(|| name_from_email(&email))
            .unwrap_or_else(|| ParsedName {
                first: "Unknown".to_string(),
                last: String::new(),
            });
        let location = extract_location(&text);

        Some(CandidateRecord {
            first_name: Some(name.first),
            last_name: (!name.last.is_empty()).then_some(name.last),
            email: Some(email),
            phone: extract_phones(&text).into_iter().next(),
            city: location.city,
            state: location.state,
            zip_code: location.zip_code,
            profile_url: Some(url.to_string()),
            personal_website: Some(url.to_string()),
            social_links: extract_social_links(html),
        })
    }
}

/// Outbound result links, deduplicated, likely personal sites first.
fn result_links(html: &str, search_url: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for href in Document::parse(html, search_url).hrefs(RESULT_LINK_SELECTOR) {
        if href.starts_with("http") && !mentions_any(&href, EXCLUDED_DOMAINS) && !links.contains(&href) {
            links.push(href);
        }
    }
    // Stable: keeps engine order within each group
    links.sort_by_key(|link| !personal_site_hint().is_match(link));
    links
}
