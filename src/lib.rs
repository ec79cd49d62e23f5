//! NCuT Harness - Automated UI test scenarios for NMOS Controllers
//!
//! This library drives a browser session through the connection-management
//! checks of an NMOS Controller under test (NCuT), covering IS-05 connection
//! control and IS-04 query-update behavior as observed through the
//! controller's own UI.

pub mod common;
pub mod scenario;
pub mod testing;
pub mod ui;

// Re-export commonly used types for orchestrators and tests
pub use common::{Error, Result};
pub use scenario::{Answer, Metadata, Outcome, Scenario, ScenarioRunner};
