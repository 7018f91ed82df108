use super::Browser;
use crate::{ScoutError, ScoutResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// A canned page served by [`MockBrowser`].
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    pub html: String,
    /// Whether `wait_for_selector` succeeds on this page.
    pub ready: bool,
    /// Successive `page_extent` readings; the last one repeats.
    pub extents: Vec<i64>,
    /// `page_source` fails instead of returning `html`.
    pub broken_source: bool,
}

impl MockPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ready: true,
            extents: vec![1000],
            broken_source: false,
        }
    }

    pub fn with_extents(mut self, extents: Vec<i64>) -> Self {
        self.extents = extents;
        self
    }

    pub fn never_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn with_broken_source(mut self) -> Self {
        self.broken_source = true;
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    current: Option<String>,
    extent_reads: usize,
    navigations: Vec<String>,
    scrolls: usize,
    clicks: Vec<String>,
    closed: bool,
}

/// Scripted browser for exercising the pipeline without Chrome.
#[derive(Debug, Default)]
pub struct MockBrowser {
    pages: HashMap<String, MockPage>,
    state: Mutex<MockState>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, page: MockPage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().navigations.clone()
    }

    pub fn scrolls(&self) -> usize {
        self.state.lock().scrolls
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn current_page(&self) -> ScoutResult<&MockPage> {
        let state = self.state.lock();
        if state.closed {
            return Err(ScoutError::CollaboratorUnavailable(
                "mock session closed".to_string(),
            ));
        }
        state
            .current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| ScoutError::CollaboratorUnavailable("no page loaded".to_string()))
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn navigate(&self, url: &str) -> ScoutResult<()> {
        let mut state = self.state.lock();
        state.navigations.push(url.to_string());
        if state.closed || !self.pages.contains_key(url) {
            return Err(ScoutError::CollaboratorUnavailable(format!(
                "cannot load {}",
                url
            )));
        }
        state.current = Some(url.to_string());
        state.extent_reads = 0;
        Ok(())
    }

    async fn wait_for_selector(&self, _css: &str, _timeout: Duration) -> bool {
        self.current_page().map(|page| page.ready).unwrap_or(false)
    }

    async fn scroll_to_bottom(&self) -> ScoutResult<()> {
        self.current_page()?;
        self.state.lock().scrolls += 1;
        Ok(())
    }

    async fn page_extent(&self) -> ScoutResult<i64> {
        let page = self.current_page()?;
        let mut state = self.state.lock();
        let index = state.extent_reads.min(page.extents.len().saturating_sub(1));
        state.extent_reads += 1;
        Ok(page.extents.get(index).copied().unwrap_or_default())
    }

    async fn page_source(&self) -> ScoutResult<String> {
        let page = self.current_page()?;
        if page.broken_source {
            return Err(ScoutError::CollaboratorUnavailable(
                "document tree unavailable".to_string(),
            ));
        }
        Ok(page.html.clone())
    }

    async fn click_link_with_text(&self, text: &str) -> ScoutResult<()> {
        self.current_page()?;
        self.state.lock().clicks.push(text.to_string());
        Ok(())
    }

    async fn close(&self) -> ScoutResult<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}
