//! Error types for the NCuT harness
//!
//! Scenarios do not catch failures locally; everything here propagates to
//! the orchestrating test suite, which treats an error as a failed scenario.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the NCuT harness
#[derive(Error, Debug)]
pub enum Error {
    // === Session Errors ===
    #[error("Failed to open WebDriver session at {url}: {reason}")]
    SessionFailed { url: String, reason: String },

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    // === Element Resolution Errors ===
    #[error("No element matches {locator}")]
    ElementNotFound { locator: String },

    #[error("Control '{control}' did not become {condition} within {secs} seconds")]
    WaitTimeout {
        control: String,
        condition: String,
        secs: u64,
    },

    // === Correlation Errors ===
    #[error("No row with label '{label}' is visible on the current page")]
    RowNotFound { label: String },

    #[error("Row index {0} is out of range for the current page")]
    RowIndexOutOfRange(usize),

    #[error("No offered answer has resource label '{label}'")]
    AnswerNotFound { label: String },

    #[error("No receiver row shows an active connection")]
    NoActiveReceiver,

    // === Scenario Input Errors ===
    #[error("Scenario metadata is missing the '{0}' resource")]
    MissingMetadata(&'static str),

    // === Timeout Errors ===
    #[error("Receiver was still active after {0} seconds; giving up on disconnection")]
    DisconnectTimeout(u64),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an element-not-found error from any locator description
    pub fn element_not_found(locator: impl Into<String>) -> Self {
        Self::ElementNotFound {
            locator: locator.into(),
        }
    }

    /// Create a wait-timeout error for a named control
    pub fn wait_timeout(control: &str, condition: impl ToString, secs: u64) -> Self {
        Self::WaitTimeout {
            control: control.to_string(),
            condition: condition.to_string(),
            secs,
        }
    }

    /// Create a row-not-found error for a label scan that came up empty
    pub fn row_not_found(label: &str) -> Self {
        Self::RowNotFound {
            label: label.to_string(),
        }
    }
}
