use repscout_browser::{BrowserSession, ChromiumSessionManager, PageActions, SessionManager};
use repscout_core::BrowserConfig;
use std::time::Duration;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_session_open_and_close() {
    let manager = ChromiumSessionManager::new(BrowserConfig::default());
    let session = manager.open().await.expect("launch browser");
    session.close().await.expect("close browser");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_navigation_and_content() {
    let manager = ChromiumSessionManager::new(BrowserConfig::default());
    let mut session = manager.open().await.expect("launch browser");
    let page = session.new_page().await.expect("create page");

    page.navigate("https://example.com").await.expect("navigate");
    let html = page.content().await.expect("read content");
    assert!(html.contains("Example Domain"));
    page.wait_for_selector("h1", Duration::from_secs(5))
        .await
        .expect("heading present");

    session.close().await.expect("close browser");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_click_missing_selector_reports_false() {
    let manager = ChromiumSessionManager::new(BrowserConfig::default());
    let mut session = manager.open().await.expect("launch browser");
    let page = session.new_page().await.expect("create page");

    page.navigate("https://example.com").await.expect("navigate");
    assert!(!page.click("#definitely-not-here").await.expect("click"));

    session.close().await.expect("close browser");
}
