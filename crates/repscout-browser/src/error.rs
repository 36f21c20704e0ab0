use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("failed to open browser session: {0}")]
    SessionOpen(String),

    #[error("navigation to {url} failed: {reason}")]
    NavigationError { url: String, reason: String },

    #[error("timeout: {0}")]
    Timeout(String),
}

impl BrowserError {
    /// Navigation failure for `url`.
    pub fn navigation(url: &str, reason: impl ToString) -> Self {
        Self::NavigationError {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::ChromiumError(err.to_string())
    }
}
