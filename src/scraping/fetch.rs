use std::time::Duration;

use anyhow::{Context, Result};
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};

use crate::config::AppConfig;

/// One headless-browser session. Both site pipelines render through here;
/// every failure is absorbed into `None` so extraction never sees an error,
/// only an empty page.
pub struct PageFetcher {
    driver: WebDriver,
    settle: Duration,
}

impl PageFetcher {
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless().context("headless capability")?;
        }

        let driver = WebDriver::new(&config.webdriver_url, caps)
            .await
            .with_context(|| format!("webdriver connect failed at {}", config.webdriver_url))?;

        Ok(Self {
            driver,
            settle: Duration::from_secs(config.settle_secs),
        })
    }

    /// Navigates and returns the rendered page source, or `None` on any
    /// navigation/session failure.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        match self.page_source(url, 0).await {
            Ok(html) => Some(html),
            Err(err) => {
                log::error!("fetch failed for {url}: {err:#}");
                None
            }
        }
    }

    /// Like `fetch`, plus incremental scrolls with settle pauses so
    /// lazily-loaded listing content (prices in particular) populates.
    pub async fn fetch_scrolled(&self, url: &str) -> Option<String> {
        match self.page_source(url, 2).await {
            Ok(html) => Some(html),
            Err(err) => {
                log::error!("fetch failed for {url}: {err:#}");
                None
            }
        }
    }

    async fn page_source(&self, url: &str, scrolls: u32) -> Result<String> {
        self.driver.goto(url).await.context("navigation failed")?;
        tokio::time::sleep(self.settle).await;

        for _ in 0..scrolls {
            self.driver
                .execute("window.scrollBy(0, 1000);", Vec::new())
                .await
                .context("scroll failed")?;
            tokio::time::sleep(self.settle).await;
        }

        self.driver.source().await.context("page source unavailable")
    }

    pub async fn close(self) {
        if let Err(err) = self.driver.quit().await {
            log::warn!("webdriver session close failed: {err}");
        }
    }
}
