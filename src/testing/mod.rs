//! Simulated NCuT for exercising scenarios without a browser
//!
//! [`SimulatedController`] implements [`ControllerUi`] over an in-memory
//! model of the controller's receiver list, detail tabs, and sender rows.
//! Scripted behaviors (delayed disconnection, a misreported active sender)
//! let tests drive every scenario branch deterministically.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::common::{Error, Result};
use crate::ui::{ControllerUi, Readiness, UiRow};

/// One receiver known to the simulated controller
#[derive(Debug, Clone)]
pub struct SimReceiver {
    pub label: String,
    /// Whether the receiver exposes a Connection API (connect tab enabled)
    pub connectable: bool,
    /// Whether the receiver currently has an active connection
    pub active: bool,
    /// Label of the connected sender, when active
    pub connected_sender: Option<String>,
}

/// Which view the simulated browser is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    ReceiverList,
    ReceiverDetail(usize),
    ConnectTab(usize),
    ActiveTab(usize),
}

/// Disconnection scheduled to happen after a number of list refreshes
#[derive(Debug, Clone)]
struct PendingDisconnect {
    label: String,
    refreshes_left: u32,
}

/// In-memory stand-in for an NCuT web UI
pub struct SimulatedController {
    receivers: Vec<SimReceiver>,
    senders: Vec<String>,
    page: Page,
    pending_disconnect: Option<PendingDisconnect>,
    /// When set, the active sender label is shown as this value regardless
    /// of the actual connection. Used to exercise mismatch verdicts.
    reported_sender: Option<String>,
}

impl SimulatedController {
    pub fn new() -> Self {
        Self {
            receivers: Vec::new(),
            senders: Vec::new(),
            page: Page::ReceiverList,
            pending_disconnect: None,
            reported_sender: None,
        }
    }

    /// Add a receiver with no active connection
    pub fn with_receiver(mut self, label: &str, connectable: bool) -> Self {
        self.receivers.push(SimReceiver {
            label: label.to_string(),
            connectable,
            active: false,
            connected_sender: None,
        });
        self
    }

    /// Add a sender offered in every receiver's connect view
    pub fn with_sender(mut self, label: &str) -> Self {
        self.senders.push(label.to_string());
        self
    }

    /// Mark an existing receiver as actively connected to a sender
    pub fn with_active_connection(mut self, receiver: &str, sender: &str) -> Self {
        if let Some(rx) = self.receivers.iter_mut().find(|r| r.label == receiver) {
            rx.active = true;
            rx.connected_sender = Some(sender.to_string());
        }
        self
    }

    /// Show this label as the active sender, whatever is really connected
    pub fn with_reported_sender(mut self, label: &str) -> Self {
        self.reported_sender = Some(label.to_string());
        self
    }

    /// Schedule a receiver to go inactive after N list refreshes
    pub fn with_disconnect_after(mut self, receiver: &str, refreshes: u32) -> Self {
        self.pending_disconnect = Some(PendingDisconnect {
            label: receiver.to_string(),
            refreshes_left: refreshes,
        });
        self
    }

    /// Look up a receiver's current state, for test assertions
    pub fn receiver(&self, label: &str) -> Option<&SimReceiver> {
        self.receivers.iter().find(|r| r.label == label)
    }

    fn receiver_index(&self, label: &str) -> Option<usize> {
        self.receivers.iter().position(|r| r.label == label)
    }

    /// The sender label the UI would display for the given receiver
    fn displayed_sender(&self, receiver: usize) -> Option<String> {
        self.reported_sender
            .clone()
            .or_else(|| self.receivers[receiver].connected_sender.clone())
    }

    fn apply_pending_disconnect(&mut self) {
        if let Some(pending) = &mut self.pending_disconnect {
            pending.refreshes_left = pending.refreshes_left.saturating_sub(1);
            if pending.refreshes_left == 0 {
                let label = pending.label.clone();
                self.pending_disconnect = None;
                if let Some(rx) = self.receivers.iter_mut().find(|r| r.label == label) {
                    rx.active = false;
                    rx.connected_sender = None;
                }
            }
        }
    }
}

impl Default for SimulatedController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ControllerUi for SimulatedController {
    async fn open_link(&mut self, text: &str) -> Result<()> {
        if text == "Receivers" {
            self.page = Page::ReceiverList;
            return Ok(());
        }
        match self.receiver_index(text) {
            Some(index) => {
                self.page = Page::ReceiverDetail(index);
                Ok(())
            }
            None => Err(Error::element_not_found(format!("link with text '{text}'"))),
        }
    }

    async fn refresh_list(&mut self) -> Result<()> {
        if self.page != Page::ReceiverList {
            return Err(Error::element_not_found("selector [aria-label='Refresh']"));
        }
        self.apply_pending_disconnect();
        Ok(())
    }

    async fn wait_for(
        &mut self,
        control: &str,
        readiness: Readiness,
        timeout: Duration,
    ) -> Result<()> {
        let satisfied = match (self.page, control) {
            (Page::ReceiverDetail(_), "connect" | "active") => true,
            (Page::ConnectTab(i) | Page::ActiveTab(i), "sender") => {
                self.displayed_sender(i).is_some()
            }
            _ => false,
        };
        if satisfied {
            Ok(())
        } else {
            Err(Error::wait_timeout(control, readiness, timeout.as_secs()))
        }
    }

    async fn click_control(&mut self, control: &str) -> Result<()> {
        match (self.page, control) {
            (Page::ReceiverDetail(i), "connect") => {
                if self.receivers[i].connectable {
                    self.page = Page::ConnectTab(i);
                    Ok(())
                } else {
                    Err(Error::element_not_found("enabled connect tab"))
                }
            }
            (Page::ReceiverDetail(i), "active") => {
                self.page = Page::ActiveTab(i);
                Ok(())
            }
            _ => Err(Error::element_not_found(format!("control '{control}'"))),
        }
    }

    async fn control_attribute(
        &mut self,
        control: &str,
        attribute: &str,
    ) -> Result<Option<String>> {
        match (self.page, control, attribute) {
            (Page::ReceiverDetail(i), "connect", "aria-disabled") => {
                let disabled = !self.receivers[i].connectable;
                Ok(Some(disabled.to_string()))
            }
            _ => Ok(None),
        }
    }

    async fn control_text(&mut self, control: &str) -> Result<String> {
        match (self.page, control) {
            (Page::ConnectTab(i) | Page::ActiveTab(i), "sender") => self
                .displayed_sender(i)
                .ok_or_else(|| Error::element_not_found("control 'sender'")),
            _ => Err(Error::element_not_found(format!("control '{control}'"))),
        }
    }

    async fn rows(&mut self) -> Result<Vec<UiRow>> {
        match self.page {
            Page::ReceiverList => Ok(self
                .receivers
                .iter()
                .map(|rx| {
                    let mut controls = BTreeMap::new();
                    controls.insert("active".to_string(), Some(rx.active.to_string()));
                    UiRow {
                        label: rx.label.clone(),
                        controls,
                    }
                })
                .collect()),
            Page::ConnectTab(_) => Ok(self
                .senders
                .iter()
                .map(|label| {
                    let mut controls = BTreeMap::new();
                    controls.insert("activate".to_string(), None);
                    UiRow {
                        label: label.clone(),
                        controls,
                    }
                })
                .collect()),
            _ => Err(Error::element_not_found("resource rows")),
        }
    }

    async fn click_row_control(&mut self, index: usize, control: &str) -> Result<()> {
        match (self.page, control) {
            (Page::ReceiverList, "active") => {
                let rx = self
                    .receivers
                    .get_mut(index)
                    .ok_or(Error::RowIndexOutOfRange(index))?;
                // The switch is a toggle: clicking an inactive receiver
                // would activate it, which is why scenarios guard first.
                if rx.active {
                    rx.active = false;
                    rx.connected_sender = None;
                } else {
                    rx.active = true;
                }
                Ok(())
            }
            (Page::ConnectTab(receiver), "activate") => {
                let sender = self
                    .senders
                    .get(index)
                    .cloned()
                    .ok_or(Error::RowIndexOutOfRange(index))?;
                let rx = &mut self.receivers[receiver];
                rx.active = true;
                rx.connected_sender = Some(sender);
                Ok(())
            }
            _ => Err(Error::element_not_found(format!(
                "control '{control}' in row {index}"
            ))),
        }
    }

    async fn settle(&mut self, _delay: Duration) {
        // The simulation is immediate; settling is a no-op.
    }
}
