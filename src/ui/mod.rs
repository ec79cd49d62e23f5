//! Browser-facing view of the NCuT's UI
//!
//! Scenarios talk to the controller through the [`ControllerUi`] trait so
//! they can run against a real WebDriver session or against the simulated
//! controller used in tests. The trait deliberately mirrors what the
//! scenarios actually observe: links, named controls, and table rows.

pub mod webdriver;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::common::Result;

pub use webdriver::WebDriverUi;

/// Condition a control must reach before a scenario interacts with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Control is displayed
    Visible,
    /// Control is displayed and enabled
    Clickable,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::Clickable => write!(f, "clickable"),
        }
    }
}

/// One visible row of the controller's resource table
///
/// A row is extracted whole, label and controls together, so callers never
/// have to correlate separately fetched element lists by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiRow {
    /// Visible label text of the row's resource
    pub label: String,
    /// Value attribute of each named control present in the row
    ///
    /// Toggles carry `Some("true")`/`Some("false")`; plain buttons are
    /// present with `None`.
    pub controls: BTreeMap<String, Option<String>>,
}

impl UiRow {
    /// Value attribute of a named control, if the control is present and
    /// carries one
    pub fn control_value(&self, name: &str) -> Option<&str> {
        self.controls.get(name).and_then(|v| v.as_deref())
    }

    /// Whether the row carries the named control at all
    pub fn has_control(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }
}

/// Operations the scenarios need from the controller's UI
///
/// Every method acts on the shared session's current page; scenarios own
/// the navigation sequence and call these in order.
#[async_trait]
pub trait ControllerUi: Send {
    /// Click a link identified by its visible text
    async fn open_link(&mut self, text: &str) -> Result<()>;

    /// Trigger the current list view's refresh control
    async fn refresh_list(&mut self) -> Result<()>;

    /// Wait, up to `timeout`, for a named control to reach `readiness`
    async fn wait_for(&mut self, control: &str, readiness: Readiness, timeout: Duration)
        -> Result<()>;

    /// Click a named control on the current page
    async fn click_control(&mut self, control: &str) -> Result<()>;

    /// Read an attribute of a named control on the current page
    async fn control_attribute(&mut self, control: &str, attribute: &str)
        -> Result<Option<String>>;

    /// Read the visible text of a named control on the current page
    async fn control_text(&mut self, control: &str) -> Result<String>;

    /// Extract the current page's resource table as structured rows
    async fn rows(&mut self) -> Result<Vec<UiRow>>;

    /// Click a named control inside the row at `index`
    ///
    /// Indices refer to the most recent [`ControllerUi::rows`] extraction of
    /// the same page state.
    async fn click_row_control(&mut self, index: usize, control: &str) -> Result<()>;

    /// Let the UI settle for a fixed delay after an interaction
    async fn settle(&mut self, delay: Duration);
}
