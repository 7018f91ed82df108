use super::config::ScoutConfig;
use super::source::ListingSource;
use crate::browser::Browser;
use crate::classify::annotate;
use crate::stats::StatsTracker;
use crate::ScoutResult;
use log::{debug, error, info, warn};
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    PageLoading,
    ScrollExpanding,
    Extracting,
    Classifying,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::PageLoading => "page loading",
            PipelineState::ScrollExpanding => "scroll expanding",
            PipelineState::Extracting => "extracting",
            PipelineState::Classifying => "classifying",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of scraping one location. `records` is empty whenever `state` is `Failed`.
#[derive(Debug, Clone)]
pub struct RunReport<R> {
    pub records: Vec<R>,
    pub state: PipelineState,
    pub diagnostic: Option<String>,
}

impl<R> RunReport<R> {
    fn failed(diagnostic: String) -> Self {
        Self {
            records: Vec::new(),
            state: PipelineState::Failed,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == PipelineState::Done
    }
}

/// Drives one browser session through listing pages, one location at a time.
pub struct Scout<B: Browser> {
    browser: B,
    config: ScoutConfig,
    stats: StatsTracker,
    state: PipelineState,
}

impl<B: Browser> Scout<B> {
    pub fn new(browser: B, config: ScoutConfig) -> Self {
        info!("Initializing scout");
        Self {
            browser,
            config,
            stats: StatsTracker::new(),
            state: PipelineState::Idle,
        }
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, source: &str, next: PipelineState) {
        debug!("[{}] {} -> {}", source, self.state, next);
        self.state = next;
    }

    async fn pause(delay: Duration) {
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    /// Scrapes a single listing page. Never errors: navigation and document failures end in
    /// `Failed` with a diagnostic, everything else degrades inside the run.
    pub async fn run<S: ListingSource>(&mut self, source: &S) -> RunReport<S::Record> {
        let name = source.name().to_string();
        self.state = PipelineState::Idle;

        self.transition(&name, PipelineState::PageLoading);
        let url = source.start_url();
        info!("[{}] Loading {}", name, url);
        if let Err(e) = self.browser.navigate(&url).await {
            return self.fail(&name, format!("navigation to {} failed: {}", url, e));
        }
        Self::pause(self.config.settle_delay).await;

        if !self
            .browser
            .wait_for_selector(source.ready_selector(), self.config.wait_timeout)
            .await
        {
            warn!(
                "[{}] Timed out waiting for '{}', extracting whatever rendered",
                name,
                source.ready_selector()
            );
            self.stats.record_timeout();
        }

        self.transition(&name, PipelineState::ScrollExpanding);
        if let Some(text) = source.expand_link_text() {
            match self.browser.click_link_with_text(text).await {
                Ok(()) => {
                    debug!("[{}] Clicked '{}'", name, text);
                    Self::pause(self.config.scroll_delay).await;
                }
                Err(e) => warn!("[{}] Could not click '{}': {}", name, text, e),
            }
        }
        if source.expands_on_scroll() {
            self.scroll_to_end(&name).await;
        }

        self.transition(&name, PipelineState::Extracting);
        let html = match self.browser.page_source().await {
            Ok(html) => html,
            Err(e) => return self.fail(&name, format!("could not read document: {}", e)),
        };
        let report = source.parse_document(&html);
        self.stats.record_extraction(
            &name,
            report.cards_found,
            report.records.len(),
            report.cards_skipped,
            report.cards_failed,
        );

        self.transition(&name, PipelineState::Classifying);
        let mut records = report.records;
        annotate(&mut records);

        self.transition(&name, PipelineState::Done);
        info!("[{}] Scraped {} records", name, records.len());
        RunReport {
            records,
            state: PipelineState::Done,
            diagnostic: None,
        }
    }

    /// Scrolls until the page stops growing or the scroll budget is spent.
    async fn scroll_to_end(&mut self, name: &str) {
        let mut last_extent = match self.browser.page_extent().await {
            Ok(extent) => extent,
            Err(e) => {
                warn!("[{}] Could not measure page, skipping scroll: {}", name, e);
                return;
            }
        };

        for attempt in 1..=self.config.max_scrolls {
            if let Err(e) = self.browser.scroll_to_bottom().await {
                warn!("[{}] Scroll {} failed: {}", name, attempt, e);
                break;
            }
            self.stats.record_scroll();
            Self::pause(self.config.scroll_delay).await;

            let extent = match self.browser.page_extent().await {
                Ok(extent) => extent,
                Err(e) => {
                    warn!("[{}] Could not measure page after scroll: {}", name, e);
                    break;
                }
            };
            debug!("[{}] Scroll {}: extent {} -> {}", name, attempt, last_extent, extent);
            if extent == last_extent {
                debug!("[{}] Reached the end of the listing", name);
                break;
            }
            last_extent = extent;
        }
    }

    fn fail<R>(&mut self, name: &str, diagnostic: String) -> RunReport<R> {
        error!("[{}] {}", name, diagnostic);
        self.stats.record_failure();
        self.transition(name, PipelineState::Failed);
        RunReport::failed(diagnostic)
    }

    /// Releases the browser session and stamps the run end time.
    pub async fn close(&self) -> ScoutResult<()> {
        self.stats.finish();
        self.browser.close().await
    }
}
