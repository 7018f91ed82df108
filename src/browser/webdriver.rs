use super::Browser;
use crate::core::ScoutConfig;
use crate::{ScoutError, ScoutResult};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::future::Future;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;
use tokio::time::sleep;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";
const EXTENT_SCRIPT: &str = "return document.body.scrollHeight";

/// Quotes `text` as an XPath string literal. XPath has no escapes, so text holding both quote
/// kinds is spliced together with `concat()`.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }
    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// A Chrome session driven over the WebDriver protocol.
///
/// The session is released by [`Browser::close`]; a session dropped while still open is
/// quit on the current runtime instead.
pub struct WebDriverBrowser {
    driver: Mutex<Option<WebDriver>>,
}

impl WebDriverBrowser {
    pub async fn connect(config: &ScoutConfig) -> ScoutResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless()?;
        }
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;
        caps.add_arg(&format!("--user-agent={}", config.user_agent))?;

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| {
                ScoutError::CollaboratorUnavailable(format!(
                    "could not start a browser session at {}: {}",
                    config.webdriver_url, e
                ))
            })?;
        info!("Chrome session started via {}", config.webdriver_url);

        Ok(Self {
            driver: Mutex::new(Some(driver)),
        })
    }

    fn driver(&self) -> ScoutResult<WebDriver> {
        self.driver.lock().clone().ok_or_else(|| {
            ScoutError::CollaboratorUnavailable("browser session already closed".to_string())
        })
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn navigate(&self, url: &str) -> ScoutResult<()> {
        debug!("Navigating to {}", url);
        self.driver()?.goto(url).await?;
        Ok(())
    }

    async fn wait_for_selector(&self, css: &str, timeout: Duration) -> bool {
        let Ok(driver) = self.driver() else {
            return false;
        };
        let deadline = Instant::now() + timeout;
        loop {
            if driver.find(By::Css(css)).await.is_ok() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn scroll_to_bottom(&self) -> ScoutResult<()> {
        self.driver()?.execute(SCROLL_SCRIPT, Vec::new()).await?;
        Ok(())
    }

    async fn page_extent(&self) -> ScoutResult<i64> {
        let ret = self.driver()?.execute(EXTENT_SCRIPT, Vec::new()).await?;
        Ok(ret.json().as_i64().unwrap_or_default())
    }

    async fn page_source(&self) -> ScoutResult<String> {
        Ok(self.driver()?.source().await?)
    }

    async fn click_link_with_text(&self, text: &str) -> ScoutResult<()> {
        let xpath = format!("//a[contains(text(), {})]", xpath_literal(text));
        self.driver()?.find(By::XPath(xpath.as_str())).await?.click().await?;
        Ok(())
    }

    async fn close(&self) -> ScoutResult<()> {
        let driver = self.driver.lock().take();
        if let Some(driver) = driver {
            driver.quit().await?;
            info!("Chrome session closed");
        }
        Ok(())
    }
}

/// Runs `task` on the current runtime if there is one. `false` (and an error log) otherwise.
fn spawn_detached<F>(task: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
            true
        }
        Err(e) => {
            error!(
                "No runtime to quit the browser session, it stays open until the driver exits: {}",
                e
            );
            false
        }
    }
}

impl Drop for WebDriverBrowser {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.get_mut().take() {
            warn!("Browser session dropped without close, quitting in background");
            spawn_detached(async move {
                if let Err(e) = driver.quit().await {
                    warn!("Failed to quit browser session: {}", e);
                }
            });
        }
    }
}
