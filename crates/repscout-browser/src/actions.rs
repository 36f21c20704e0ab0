use crate::error::Result;
use std::time::Duration;

/// Page-level browser actions used by collection strategies.
///
/// Selector arguments accept CSS selector lists (`a, b, c`); the first
/// matching element is acted on. Markup inspection happens on the HTML
/// returned by [`PageActions::content`].
#[async_trait::async_trait]
pub trait PageActions: Send + Sync {
    /// Navigate to a URL and wait for the load to finish
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Serialized HTML of the current document
    async fn content(&self) -> Result<String>;

    /// Document title, empty when absent
    async fn title(&self) -> Result<String>;

    /// Click the first match, then type `value` into it. `Ok(false)` when nothing matches.
    async fn fill_field(&self, selector: &str, value: &str) -> Result<bool>;

    /// Click the first match. `Ok(false)` when nothing matches.
    async fn click(&self, selector: &str) -> Result<bool>;

    /// Press Enter in the first match. `Ok(false)` when nothing matches.
    async fn press_enter(&self, selector: &str) -> Result<bool>;

    /// Wait until a selector matches or the timeout elapses
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Scroll one viewport height `times` times, pausing `delay` after each
    async fn scroll(&self, times: u32, delay: Duration) -> Result<()>;
}
