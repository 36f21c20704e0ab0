use crate::actions::PageActions;
use crate::error::{BrowserError, Result};
use crate::fingerprint::{FingerprintConfig, STEALTH_SCRIPT};
use crate::session::{BrowserSession, SessionManager};
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use repscout_core::BrowserConfig;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches Chromium sessions with a randomized fingerprint.
pub struct ChromiumSessionManager {
    config: BrowserConfig,
    keystroke_delay: Duration,
}

impl ChromiumSessionManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            keystroke_delay: Duration::from_millis(50),
        }
    }

    /// Delay between typed characters in form fields.
    #[must_use]
    pub fn with_keystroke_delay(mut self, delay: Duration) -> Self {
        self.keystroke_delay = delay;
        self
    }

    fn launch_config(&self, fingerprint: &FingerprintConfig) -> Result<CdpConfig> {
        let mut builder = CdpConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .viewport(Viewport {
                width: fingerprint.viewport_width,
                height: fingerprint.viewport_height,
                ..Viewport::default()
            })
            .request_timeout(self.config.navigation_timeout())
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(fingerprint.window_size_arg());

        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.config.executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(BrowserError::SessionOpen)
    }
}

#[async_trait::async_trait]
impl SessionManager for ChromiumSessionManager {
    type Session = ChromiumSession;

    async fn open(&self) -> Result<ChromiumSession> {
        let fingerprint = FingerprintConfig::randomized(
            self.config.window_width,
            self.config.window_height,
            &self.config.accept_language,
        );

        let (browser, mut handler) = Browser::launch(self.launch_config(&fingerprint)?)
            .await
            .map_err(|e| BrowserError::SessionOpen(e.to_string()))?;

        // Spawn browser handler
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    trace!(error = %e, "browser handler event error");
                }
            }
        });

        info!(
            user_agent = %fingerprint.user_agent,
            width = fingerprint.viewport_width,
            height = fingerprint.viewport_height,
            headless = self.config.headless,
            "browser session opened"
        );

        Ok(ChromiumSession {
            browser,
            handler_task,
            fingerprint,
            navigation_timeout: self.config.navigation_timeout(),
            keystroke_delay: self.keystroke_delay,
        })
    }
}

/// A live Chromium process and its event handler task.
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    fingerprint: FingerprintConfig,
    navigation_timeout: Duration,
    keystroke_delay: Duration,
}

#[async_trait::async_trait]
impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn new_page(&mut self) -> Result<ChromiumPage> {
        let page = self.browser.new_page("about:blank").await?;

        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(self.fingerprint.user_agent.clone())
            .accept_language(self.fingerprint.accept_language.clone())
            .build()
            .map_err(BrowserError::ChromiumError)?;
        page.execute(user_agent).await?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
            .await?;

        debug!("page created");

        Ok(ChromiumPage {
            page,
            navigation_timeout: self.navigation_timeout,
            keystroke_delay: self.keystroke_delay,
        })
    }

    async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        if let Some(problem) = wait_failure(self.browser.wait().await) {
            warn!(error = %problem, "browser process did not shut down cleanly");
        }
        self.handler_task.abort();
        closed?;
        info!("browser session closed");
        Ok(())
    }
}

/// What went wrong waiting for the browser process to exit, if anything.
fn wait_failure(outcome: std::io::Result<Option<ExitStatus>>) -> Option<String> {
    match outcome {
        Ok(Some(status)) if !status.success() => Some(format!("browser exited with {status}")),
        Ok(_) => None,
        Err(e) => Some(e.to_string()),
    }
}

/// Page handle inside a [`ChromiumSession`].
pub struct ChromiumPage {
    page: Page,
    navigation_timeout: Duration,
    keystroke_delay: Duration,
}

impl ChromiumPage {
    async fn first_match(&self, selector: &str) -> Option<chromiumoxide::Element> {
        match self.page.find_element(selector).await {
            Ok(element) => Some(element),
            Err(e) => {
                trace!(selector, error = %e, "no element matched");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl PageActions for ChromiumPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::navigation(url, e)),
            Err(_) => Err(BrowserError::Timeout(format!(
                "navigation to {url} exceeded {:?}",
                self.navigation_timeout
            ))),
        }
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn title(&self) -> Result<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<bool> {
        let Some(element) = self.first_match(selector).await else {
            return Ok(false);
        };
        element.click().await?;
        for ch in value.chars() {
            element.type_str(ch.to_string()).await?;
            tokio::time::sleep(self.keystroke_delay).await;
        }
        Ok(true)
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        let Some(element) = self.first_match(selector).await else {
            return Ok(false);
        };
        element.click().await?;
        Ok(true)
    }

    async fn press_enter(&self, selector: &str) -> Result<bool> {
        let Some(element) = self.first_match(selector).await else {
            return Ok(false);
        };
        element.press_key("Enter").await?;
        Ok(true)
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "selector {selector} not present after {timeout:?}"
                )));
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn scroll(&self, times: u32, delay: Duration) -> Result<()> {
        for _ in 0..times {
            self.page
                .evaluate("window.scrollBy(0, window.innerHeight)")
                .await?;
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}
