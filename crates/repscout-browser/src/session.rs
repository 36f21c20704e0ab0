//! Session lifecycle.
//!
//! A run opens exactly one session, creates one page in it and closes the
//! session once on the way out. `close` consumes the session, so a closed
//! session cannot be reused.

use crate::actions::PageActions;
use crate::error::Result;

/// Opens browser sessions.
#[async_trait::async_trait]
pub trait SessionManager: Send + Sync {
    /// Session type produced by this manager
    type Session: BrowserSession;

    /// Launch a new session.
    async fn open(&self) -> Result<Self::Session>;
}

/// One live browser session.
#[async_trait::async_trait]
pub trait BrowserSession: Send {
    /// Page handle type
    type Page: PageActions;

    /// Create a page inside this session.
    async fn new_page(&mut self) -> Result<Self::Page>;

    /// Terminate the session and release its resources.
    async fn close(self) -> Result<()>;
}
