//! In-memory browser for tests.
//!
//! Serves canned HTML per URL, simulates a search form that swaps in a result
//! document for a typed query, fails or crashes chosen navigations and
//! counts session lifecycle calls.

use crate::actions::PageActions;
use crate::error::{BrowserError, Result};
use crate::session::{BrowserSession, SessionManager};
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const EMPTY_PAGE: &str = "<html><head></head><body></body></html>";

/// Lifecycle and navigation counters shared with the test.
#[derive(Debug, Default)]
pub struct MockStats {
    opens: AtomicUsize,
    closes: AtomicUsize,
    pages: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

impl MockStats {
    /// Sessions opened.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Sessions closed.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Pages created.
    pub fn pages(&self) -> usize {
        self.pages.load(Ordering::SeqCst)
    }

    /// Every navigation attempt, in order, including failed ones.
    pub async fn navigations(&self) -> Vec<String> {
        self.navigations.lock().await.clone()
    }
}

/// Canned site contents and failure switches; `build` turns it into a manager.
#[derive(Debug, Default)]
pub struct MockSite {
    pages: HashMap<String, String>,
    searches: HashMap<String, String>,
    failures: HashMap<String, u32>,
    panics: HashSet<String>,
    fail_open: bool,
    fail_new_page: bool,
}

impl MockSite {
    /// An empty site; every URL serves a blank document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` at `url`. Unknown URLs serve an empty document.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// After `query` is typed into a field and submitted, show `html`.
    #[must_use]
    pub fn with_search_result(mut self, query: impl Into<String>, html: impl Into<String>) -> Self {
        self.searches.insert(query.into(), html.into());
        self
    }

    /// Every navigation to `url` fails.
    #[must_use]
    pub fn with_failing_url(self, url: impl Into<String>) -> Self {
        self.with_transient_failure(url, u32::MAX)
    }

    /// The first `times` navigations to `url` fail.
    #[must_use]
    pub fn with_transient_failure(mut self, url: impl Into<String>, times: u32) -> Self {
        self.failures.insert(url.into(), times);
        self
    }

    /// Navigating to `url` panics inside the page.
    #[must_use]
    pub fn with_panicking_url(mut self, url: impl Into<String>) -> Self {
        self.panics.insert(url.into());
        self
    }

    /// `open` fails.
    #[must_use]
    pub fn with_failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// `new_page` fails after the session opened.
    #[must_use]
    pub fn with_failing_new_page(mut self) -> Self {
        self.fail_new_page = true;
        self
    }

    /// Freeze the site into a session manager.
    pub fn build(mut self) -> MockSessionManager {
        let failures = std::mem::take(&mut self.failures);
        MockSessionManager {
            inner: Arc::new(Inner {
                site: self,
                failures: Mutex::new(failures),
                stats: Arc::new(MockStats::default()),
            }),
        }
    }
}

#[derive(Debug)]
struct Inner {
    site: MockSite,
    failures: Mutex<HashMap<String, u32>>,
    stats: Arc<MockStats>,
}

/// Session manager over a [`MockSite`].
#[derive(Debug, Clone)]
pub struct MockSessionManager {
    inner: Arc<Inner>,
}

impl MockSessionManager {
    /// Counters shared with every session this manager opens.
    pub fn stats(&self) -> Arc<MockStats> {
        Arc::clone(&self.inner.stats)
    }
}

#[async_trait::async_trait]
impl SessionManager for MockSessionManager {
    type Session = MockSession;

    async fn open(&self) -> Result<MockSession> {
        self.inner.stats.opens.fetch_add(1, Ordering::SeqCst);
        if self.inner.site.fail_open {
            return Err(BrowserError::SessionOpen(
                "mock browser refused to launch".to_string(),
            ));
        }
        Ok(MockSession {
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Session handed out by [`MockSessionManager`].
#[derive(Debug)]
pub struct MockSession {
    inner: Arc<Inner>,
}

#[async_trait::async_trait]
impl BrowserSession for MockSession {
    type Page = MockPage;

    async fn new_page(&mut self) -> Result<MockPage> {
        if self.inner.site.fail_new_page {
            return Err(BrowserError::ChromiumError("mock page creation failed".to_string()));
        }
        self.inner.stats.pages.fetch_add(1, Ordering::SeqCst);
        Ok(MockPage {
            inner: Arc::clone(&self.inner),
            state: Mutex::new(PageState::default()),
        })
    }

    async fn close(self) -> Result<()> {
        self.inner.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PageState {
    html: String,
    typed: Option<String>,
}

/// Page handle over canned documents.
#[derive(Debug)]
pub struct MockPage {
    inner: Arc<Inner>,
    state: Mutex<PageState>,
}

impl MockPage {
    async fn submit(&self, selector: &str) -> bool {
        let mut state = self.state.lock().await;
        if !matches_selector(&state.html, selector) {
            return false;
        }
        let result = state
            .typed
            .as_ref()
            .and_then(|q| self.inner.site.searches.get(q))
            .cloned();
        if let Some(html) = result {
            state.html = html;
            state.typed = None;
        }
        true
    }
}

#[async_trait::async_trait]
impl PageActions for MockPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.inner
            .stats
            .navigations
            .lock()
            .await
            .push(url.to_string());

        if self.inner.site.panics.contains(url) {
            panic!("page crashed loading {url}");
        }

        {
            let mut failures = self.inner.failures.lock().await;
            if let Some(remaining) = failures.get_mut(url) {
                if *remaining > 0 {
                    *remaining = remaining.saturating_sub(1);
                    return Err(BrowserError::navigation(url, "mock navigation failure"));
                }
            }
        }

        let html = self
            .inner
            .site
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| EMPTY_PAGE.to_string());

        let mut state = self.state.lock().await;
        state.html = html;
        state.typed = None;
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.state.lock().await.html.clone())
    }

    async fn title(&self) -> Result<String> {
        let state = self.state.lock().await;
        Ok(document_title(&state.html))
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        if !matches_selector(&state.html, selector) {
            return Ok(false);
        }
        state.typed = Some(value.to_string());
        Ok(true)
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        Ok(self.submit(selector).await)
    }

    async fn press_enter(&self, selector: &str) -> Result<bool> {
        Ok(self.submit(selector).await)
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let state = self.state.lock().await;
        if matches_selector(&state.html, selector) {
            Ok(())
        } else {
            Err(BrowserError::Timeout(format!(
                "selector {selector} not present after {timeout:?}"
            )))
        }
    }

    async fn scroll(&self, _times: u32, _delay: Duration) -> Result<()> {
        Ok(())
    }
}

fn matches_selector(html: &str, selector: &str) -> bool {
    let Ok(selector) = Selector::parse(selector) else {
        return false;
    };
    Html::parse_document(html).select(&selector).next().is_some()
}

fn document_title(html: &str) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    Html::parse_document(html)
        .select(&selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"<html><body><input name="zip"><button type="submit">Go</button></body></html>"#;

    #[tokio::test]
    async fn test_serves_pages_and_counts_lifecycle() {
        let manager = MockSite::new()
            .with_page("https://a.test/", "<html><head><title> A </title></head></html>")
            .build();
        let stats = manager.stats();

        let mut session = manager.open().await.expect("open session");
        let page = session.new_page().await.expect("new page");
        page.navigate("https://a.test/").await.expect("navigate");
        assert_eq!(page.title().await.expect("title"), "A");
        session.close().await.expect("close");

        assert_eq!(stats.opens(), 1);
        assert_eq!(stats.pages(), 1);
        assert_eq!(stats.closes(), 1);
        assert_eq!(stats.navigations().await, vec!["https://a.test/".to_string()]);
    }

    #[tokio::test]
    async fn test_search_form_swaps_document() {
        let manager = MockSite::new()
            .with_page("https://a.test/find", FORM)
            .with_search_result("Austin, TX", "<div class='card'>Jane</div>")
            .build();
        let mut session = manager.open().await.expect("open session");
        let page = session.new_page().await.expect("new page");
        page.navigate("https://a.test/find").await.expect("navigate");

        assert!(page.fill_field("input[name='zip']", "Austin, TX").await.expect("fill"));
        assert!(!page.click(".missing-button").await.expect("click"));
        assert!(page.click("button[type='submit']").await.expect("click"));
        assert!(page.content().await.expect("content").contains("Jane"));
        page.wait_for_selector(".card", Duration::from_secs(1))
            .await
            .expect("card present");
    }

    #[tokio::test]
    async fn test_transient_failure_then_success() {
        let manager = MockSite::new()
            .with_transient_failure("https://a.test/", 1)
            .build();
        let mut session = manager.open().await.expect("open session");
        let page = session.new_page().await.expect("new page");

        assert!(page.navigate("https://a.test/").await.is_err());
        assert!(page.navigate("https://a.test/").await.is_ok());
        assert_eq!(page.content().await.expect("content"), EMPTY_PAGE);
    }

    #[tokio::test]
    async fn test_failing_open() {
        let manager = MockSite::new().with_failing_open().build();
        assert!(manager.open().await.is_err());
        assert_eq!(manager.stats().opens(), 1);
        assert_eq!(manager.stats().closes(), 0);
    }
}
