//! Configuration file handling

use serde::Deserialize;
use std::time::Duration;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Browser session settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Timing settings
    #[serde(default)]
    pub timing: Timing,
}

/// Browser session configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// WebDriver endpoint (chromedriver/geckodriver/selenium hub)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Base URL of the NCuT web UI
    #[serde(default = "default_ncut_url")]
    pub ncut_url: String,

    /// Run the browser headless
    #[serde(default)]
    pub headless: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            ncut_url: default_ncut_url(),
            headless: false,
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_ncut_url() -> String {
    "http://localhost:3000".to_string()
}

/// Timing settings in seconds
///
/// Defaults match the pacing controller UIs generally need: a short pause
/// after a list refresh, a longer one after opening a detail tab.
#[derive(Debug, Deserialize, Clone)]
pub struct Timing {
    /// Bounded wait for a control to become visible/clickable
    #[serde(default = "default_element_wait")]
    pub element_wait_secs: u64,

    /// Pause after opening a detail view or activating a connection
    #[serde(default = "default_settle")]
    pub settle_secs: u64,

    /// Pause after triggering a list refresh
    #[serde(default = "default_refresh_settle")]
    pub refresh_settle_secs: u64,

    /// Pause after clicking a receiver's active toggle
    #[serde(default = "default_toggle_settle")]
    pub toggle_settle_secs: u64,

    /// Spacing between polls while watching for a disconnection
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Wall-clock bound on the disconnection watch
    #[serde(default = "default_disconnect_deadline")]
    pub disconnect_deadline_secs: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            element_wait_secs: default_element_wait(),
            settle_secs: default_settle(),
            refresh_settle_secs: default_refresh_settle(),
            toggle_settle_secs: default_toggle_settle(),
            poll_interval_secs: default_poll_interval(),
            disconnect_deadline_secs: default_disconnect_deadline(),
        }
    }
}

fn default_element_wait() -> u64 {
    10
}
fn default_settle() -> u64 {
    3
}
fn default_refresh_settle() -> u64 {
    1
}
fn default_toggle_settle() -> u64 {
    2
}
fn default_poll_interval() -> u64 {
    4
}
fn default_disconnect_deadline() -> u64 {
    120
}

impl Timing {
    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn refresh_settle(&self) -> Duration {
        Duration::from_secs(self.refresh_settle_secs)
    }

    pub fn toggle_settle(&self) -> Duration {
        Duration::from_secs(self.toggle_settle_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn disconnect_deadline(&self) -> Duration {
        Duration::from_secs(self.disconnect_deadline_secs)
    }
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}
