use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    /// Upper bound for the "element present" wait after navigation.
    pub wait_timeout: Duration,
    pub settle_delay: Duration,
    pub scroll_delay: Duration,
    pub max_scrolls: usize,
    pub output_dir: PathBuf,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            wait_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(5),
            scroll_delay: Duration::from_secs(3),
            max_scrolls: 5,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ScoutConfig {
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_scroll_delay(mut self, delay: Duration) -> Self {
        self.scroll_delay = delay;
        self
    }

    pub fn with_max_scrolls(mut self, max_scrolls: usize) -> Self {
        self.max_scrolls = max_scrolls;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// No waiting at all; used by tests driving a scripted browser.
    pub fn instant() -> Self {
        Self::default()
            .with_wait_timeout(Duration::ZERO)
            .with_settle_delay(Duration::ZERO)
            .with_scroll_delay(Duration::ZERO)
    }
}
