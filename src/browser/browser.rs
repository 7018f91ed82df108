use crate::ScoutResult;
use async_trait::async_trait;
use std::time::Duration;

/// The rendering collaborator. One instance owns one browser session.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn navigate(&self, url: &str) -> ScoutResult<()>;

    /// Polls until `css` matches something or `timeout` elapses. `false` on timeout.
    async fn wait_for_selector(&self, css: &str, timeout: Duration) -> bool;

    async fn scroll_to_bottom(&self) -> ScoutResult<()>;

    /// Current scroll height of the document.
    async fn page_extent(&self) -> ScoutResult<i64>;

    /// The rendered document as HTML.
    async fn page_source(&self) -> ScoutResult<String>;

    async fn click_link_with_text(&self, text: &str) -> ScoutResult<()>;

    /// Ends the session. Calling it twice is harmless.
    async fn close(&self) -> ScoutResult<()>;
}
