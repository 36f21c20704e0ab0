//! Browser automation for directory collection.
//!
//! Provides session and page capabilities behind traits, a Chromium
//! implementation with anti-fingerprinting, and the per-run rate limiter
//! that paces navigations.

pub mod actions;
pub mod engine;
pub mod error;
pub mod fingerprint;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod rate_limiter;
pub mod session;

pub use actions::PageActions;
pub use engine::{ChromiumPage, ChromiumSession, ChromiumSessionManager};
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use rate_limiter::RateLimiter;
pub use session::{BrowserSession, SessionManager};
