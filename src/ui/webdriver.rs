//! WebDriver-backed implementation of [`ControllerUi`]
//!
//! Talks to a chromedriver/geckodriver/selenium endpoint via `thirtyfour`
//! and navigates the NCuT the way a human operator would: link clicks,
//! list refreshes, and reads of the named controls the UI exposes
//! (`label`, `connect`, `active`, `activate`, `sender`).

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::extensions::query::ElementQueryable;
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver, WebElement};

use crate::common::config::SessionConfig;
use crate::common::{Error, Result};

use super::{ControllerUi, Readiness, UiRow};

/// CSS selector for the list view's refresh button
const REFRESH_SELECTOR: &str = "[aria-label='Refresh']";

/// CSS selector for resource table rows
const ROW_SELECTOR: &str = "tr";

/// Named controls a table row may carry
const ROW_CONTROLS: &[&str] = &["connect", "active", "activate"];

/// WebDriver session against a live NCuT
pub struct WebDriverUi {
    driver: WebDriver,
    /// Polling interval for bounded waits
    poll_interval: Duration,
}

impl WebDriverUi {
    /// Open a browser session and navigate to the NCuT's base URL
    pub async fn connect(session: &SessionConfig) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if session.headless {
            caps.set_headless()
                .map_err(|e| Error::SessionFailed {
                    url: session.webdriver_url.clone(),
                    reason: e.to_string(),
                })?;
        }

        let driver = WebDriver::new(session.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| Error::SessionFailed {
                url: session.webdriver_url.clone(),
                reason: e.to_string(),
            })?;

        driver.goto(session.ncut_url.as_str()).await?;
        tracing::info!(ncut_url = %session.ncut_url, "opened NCuT session");

        Ok(Self {
            driver,
            poll_interval: Duration::from_millis(250),
        })
    }

    /// Close the browser session
    ///
    /// Must be called explicitly; dropping the session leaves the browser
    /// window open.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }

    /// Table rows that carry a resource label, in page order
    ///
    /// Header and decoration rows have no `label` element and are skipped,
    /// so indices line up with [`ControllerUi::rows`] output.
    async fn row_elements(&self) -> Result<Vec<WebElement>> {
        let mut labelled = Vec::new();
        for row in self.driver.find_all(By::Css(ROW_SELECTOR)).await? {
            if !row.find_all(By::Name("label")).await?.is_empty() {
                labelled.push(row);
            }
        }
        Ok(labelled)
    }
}

#[async_trait]
impl ControllerUi for WebDriverUi {
    async fn open_link(&mut self, text: &str) -> Result<()> {
        let link = self
            .driver
            .find(By::LinkText(text))
            .await
            .map_err(|_| Error::element_not_found(format!("link with text '{text}'")))?;
        link.click().await?;
        Ok(())
    }

    async fn refresh_list(&mut self) -> Result<()> {
        let button = self
            .driver
            .find(By::Css(REFRESH_SELECTOR))
            .await
            .map_err(|_| Error::element_not_found(format!("selector {REFRESH_SELECTOR}")))?;
        button.click().await?;
        Ok(())
    }

    async fn wait_for(
        &mut self,
        control: &str,
        readiness: Readiness,
        timeout: Duration,
    ) -> Result<()> {
        let query = self
            .driver
            .query(By::Name(control))
            .wait(timeout, self.poll_interval);

        let found = match readiness {
            Readiness::Visible => query.and_displayed().first().await,
            Readiness::Clickable => query.and_clickable().first().await,
        };

        found
            .map(|_| ())
            .map_err(|_| Error::wait_timeout(control, readiness, timeout.as_secs()))
    }

    async fn click_control(&mut self, control: &str) -> Result<()> {
        let element = self
            .driver
            .find(By::Name(control))
            .await
            .map_err(|_| Error::element_not_found(format!("control '{control}'")))?;
        element.click().await?;
        Ok(())
    }

    async fn control_attribute(
        &mut self,
        control: &str,
        attribute: &str,
    ) -> Result<Option<String>> {
        let element = self
            .driver
            .find(By::Name(control))
            .await
            .map_err(|_| Error::element_not_found(format!("control '{control}'")))?;
        Ok(element.attr(attribute).await?)
    }

    async fn control_text(&mut self, control: &str) -> Result<String> {
        let element = self
            .driver
            .find(By::Name(control))
            .await
            .map_err(|_| Error::element_not_found(format!("control '{control}'")))?;
        Ok(element.text().await?)
    }

    async fn rows(&mut self) -> Result<Vec<UiRow>> {
        let mut rows = Vec::new();
        for element in self.row_elements().await? {
            // row_elements guarantees the label element exists
            let label = match element.find_all(By::Name("label")).await?.into_iter().next() {
                Some(el) => el.text().await?,
                None => continue,
            };

            let mut controls = BTreeMap::new();
            for &name in ROW_CONTROLS {
                if let Some(el) = element.find_all(By::Name(name)).await?.into_iter().next() {
                    controls.insert(name.to_string(), el.attr("value").await?);
                }
            }

            rows.push(UiRow { label, controls });
        }
        tracing::debug!(count = rows.len(), "extracted resource rows");
        Ok(rows)
    }

    async fn click_row_control(&mut self, index: usize, control: &str) -> Result<()> {
        let rows = self.row_elements().await?;
        let row = rows.get(index).ok_or(Error::RowIndexOutOfRange(index))?;

        let element = row
            .find_all(By::Name(control))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::element_not_found(format!("control '{control}' in row {index}"))
            })?;
        element.click().await?;
        Ok(())
    }

    async fn settle(&mut self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
