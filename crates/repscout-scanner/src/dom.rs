//! Read-only queries over a page's serialized HTML.
//!
//! `scraper::Html` is not `Send`, so documents are parsed and dropped inside
//! synchronous helpers; nothing here is held across an `.await`.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Parsed page with its URL for resolving relative links.
pub struct Document {
    html: Html,
    base: Option<Url>,
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!(selector = css, error = %e, "invalid CSS selector");
            None
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Document {
    /// Parse `html` served from `base_url`.
    #[must_use]
    pub fn parse(html: &str, base_url: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            base: Url::parse(base_url).ok(),
        }
    }

    /// Whitespace-collapsed text of the first match, if non-empty.
    #[must_use]
    pub fn first_text(&self, css: &str) -> Option<String> {
        let selector = selector(css)?;
        let text = element_text(self.html.select(&selector).next()?);
        (!text.is_empty()).then_some(text)
    }

    /// Attribute of the first match that carries it.
    #[must_use]
    pub fn first_attr(&self, css: &str, attr: &str) -> Option<String> {
        let selector = selector(css)?;
        self.html
            .select(&selector)
            .find_map(|el| el.value().attr(attr))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// `href` of every match, in document order.
    #[must_use]
    pub fn hrefs(&self, css: &str) -> Vec<String> {
        let Some(selector) = selector(css) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
            .collect()
    }

    /// First `link` inside each `card`, made absolute, deduplicated in order.
    ///
    /// Root-relative links resolve against the page URL; anything that is
    /// neither root-relative nor absolute http(s) is dropped.
    #[must_use]
    pub fn card_links(&self, card: &str, link: &str) -> Vec<String> {
        let (Some(card), Some(link)) = (selector(card), selector(link)) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.html
            .select(&card)
            .filter_map(|c| c.select(&link).find_map(|a| a.value().attr("href")))
            .filter_map(|href| self.absolutize(href.trim()))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    /// Absolute form of `href`, if it is root-relative or http(s).
    #[must_use]
    pub fn absolutize(&self, href: &str) -> Option<String> {
        if href.starts_with("http") {
            return Some(href.to_string());
        }
        if href.starts_with('/') && !href.starts_with("//") {
            return self.base.as_ref()?.join(href).ok().map(String::from);
        }
        None
    }

    /// Document title, trimmed.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.first_text("title")
    }

    /// Text a reader would see: everything outside script, style and template
    /// elements, whitespace-collapsed.
    #[must_use]
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for node in self.html.tree.root().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|a| {
                a.value().as_element().is_some_and(|el| {
                    matches!(el.name(), "script" | "style" | "noscript" | "template" | "head")
                })
            });
            if !hidden {
                out.push_str(text);
                out.push(' ');
            }
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title> Find a Consultant </title><style>.x{}</style></head>
        <body>
          <h1>  Jane
              Doe </h1>
          <div class="card"><a href="/c/jane">Jane</a><a href="/other">x</a></div>
          <div class="card"><a href="https://jane.example.net/">Jane</a></div>
          <div class="card"><a href="/c/jane">dup</a></div>
          <div class="card"><a href="javascript:void(0)">js</a></div>
          <div class="card"><span>no link</span></div>
          <a rel="external" href=" https://janes.site/ ">site</a>
          <script>var email = "hidden@gmail.com";</script>
          <p>Austin, TX</p>
        </body></html>
    "#;

    fn doc() -> Document {
        Document::parse(PAGE, "https://www.brand.test/find/")
    }

    #[test]
    fn test_first_text_collapses_whitespace() {
        assert_eq!(doc().first_text("h1").as_deref(), Some("Jane Doe"));
        assert_eq!(doc().first_text("h2"), None);
        assert_eq!(doc().title().as_deref(), Some("Find a Consultant"));
    }

    #[test]
    fn test_card_links() {
        assert_eq!(
            doc().card_links(".card", "a"),
            vec![
                "https://www.brand.test/c/jane".to_string(),
                "https://jane.example.net/".to_string(),
            ]
        );
    }

    #[test]
    fn test_attr_and_hrefs() {
        assert_eq!(
            doc().first_attr(r#"a[href*="website"], a[rel="external"]"#, "href").as_deref(),
            Some("https://janes.site/")
        );
        assert_eq!(doc().hrefs(".card a").len(), 5);
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        assert_eq!(doc().first_text("a[[["), None);
        assert!(doc().card_links("][", "a").is_empty());
        assert!(doc().hrefs(":::").is_empty());
    }

    #[test]
    fn test_visible_text_skips_scripts() {
        let text = doc().visible_text();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Austin, TX"));
        assert!(!text.contains("hidden@gmail.com"));
        assert!(!text.contains("Find a Consultant"));
    }

    #[test]
    fn test_absolutize_without_base() {
        let doc = Document::parse("<html></html>", "not a url");
        assert_eq!(doc.absolutize("/x"), None);
        assert_eq!(doc.absolutize("https://a.test/x").as_deref(), Some("https://a.test/x"));
    }
}
