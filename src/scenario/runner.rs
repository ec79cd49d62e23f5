//! Scenario execution against the controller's UI
//!
//! Each procedure is a linear sequence of navigate / wait / read / compare
//! steps over the shared session. Failures are never caught here; the
//! orchestrating test suite observes them as a failed scenario.

use std::time::Instant;

use crate::common::config::Timing;
use crate::common::{Error, Result};
use crate::ui::{ControllerUi, Readiness, UiRow};

use super::{Answer, AnswerId, Metadata, Outcome, Scenario};

/// Link text of the receiver list page
const RECEIVERS_LINK: &str = "Receivers";

/// Runs scenarios over an explicitly supplied UI session
///
/// The session is owned for the duration of a checklist; scenarios mutate
/// its navigation state in sequence and rely on each invocation running to
/// completion before the next begins.
pub struct ScenarioRunner<U> {
    ui: U,
    timing: Timing,
}

impl<U: ControllerUi> ScenarioRunner<U> {
    pub fn new(ui: U, timing: Timing) -> Self {
        Self { ui, timing }
    }

    /// Hand the session back, e.g. to quit the browser
    pub fn into_ui(self) -> U {
        self.ui
    }

    /// Dispatch a scenario by name
    pub async fn run(
        &mut self,
        scenario: Scenario,
        answers: &[Answer],
        metadata: &Metadata,
    ) -> Result<Outcome> {
        tracing::info!(%scenario, "running scenario");
        let outcome = match scenario {
            Scenario::IdentifyControllableReceivers => {
                self.identify_controllable_receivers(answers).await
            }
            Scenario::SubscribeReceiverToSender => {
                self.subscribe_receiver_to_sender(metadata).await
            }
            Scenario::DisconnectReceiver => self.disconnect_receiver(metadata).await,
            Scenario::IdentifyActivatedReceiver => {
                self.identify_activated_receiver(answers).await
            }
            Scenario::IdentifyConnectedSender => {
                self.identify_connected_sender(answers, metadata).await
            }
            Scenario::AwaitDisconnection => self.await_disconnection(metadata).await,
        };
        match &outcome {
            Ok(result) => tracing::info!(%scenario, %result, "scenario finished"),
            Err(e) => tracing::warn!(%scenario, error = %e, "scenario failed"),
        }
        outcome
    }

    /// Identify which receivers are controllable via IS-05
    ///
    /// Opens every listed receiver and checks whether its connect tab is
    /// enabled, then maps the enabled labels onto the offered answers.
    pub async fn identify_controllable_receivers(
        &mut self,
        answers: &[Answer],
    ) -> Result<Outcome> {
        self.open_receiver_list().await?;

        let labels: Vec<String> = self
            .ui
            .rows()
            .await?
            .into_iter()
            .map(|row| row.label)
            .collect();

        let mut connectable = Vec::new();
        for label in &labels {
            self.ui.open_link(label).await?;
            self.ui
                .wait_for("connect", Readiness::Visible, self.timing.element_wait())
                .await?;
            self.ui.settle(self.timing.settle()).await;

            let disabled = self.ui.control_attribute("connect", "aria-disabled").await?;
            if disabled.as_deref() == Some("false") {
                connectable.push(label.clone());
            }
            tracing::debug!(receiver = %label, ?disabled, "checked connect tab");

            self.ui.open_link(RECEIVERS_LINK).await?;
        }

        let ids = answers
            .iter()
            .filter(|answer| connectable.contains(&answer.resource.label))
            .map(|answer| answer.answer_id.clone())
            .collect();
        Ok(Outcome::Answers(ids))
    }

    /// Instruct a receiver to subscribe to a sender's flow via IS-05
    pub async fn subscribe_receiver_to_sender(&mut self, metadata: &Metadata) -> Result<Outcome> {
        let sender = metadata.sender()?.clone();
        let receiver = metadata.receiver()?.clone();

        self.open_receiver_list().await?;
        self.ui.open_link(&receiver.label).await?;

        self.ui
            .wait_for("connect", Readiness::Clickable, self.timing.element_wait())
            .await?;
        self.ui.settle(self.timing.settle()).await;
        self.ui.click_control("connect").await?;

        // Activate the sender's row in the connect view
        let rows = self.ui.rows().await?;
        let index = find_row(&rows, &sender.label)?;
        self.ui.click_row_control(index, "activate").await?;
        self.ui.settle(self.timing.settle()).await;

        // The active sender label appears once the connection is made
        self.ui
            .wait_for("sender", Readiness::Visible, self.timing.element_wait())
            .await?;
        let active_sender = self.ui.control_text("sender").await?;

        if active_sender == sender.label {
            Ok(Outcome::Next)
        } else {
            tracing::warn!(
                expected = %sender.label,
                actual = %active_sender,
                "active sender does not match"
            );
            Ok(Outcome::SomethingWentWrong)
        }
    }

    /// Disconnect a receiver from its connected flow via IS-05
    ///
    /// A receiver whose toggle already reads inactive is left untouched;
    /// the post-condition holds, so this is safe to repeat.
    pub async fn disconnect_receiver(&mut self, metadata: &Metadata) -> Result<Outcome> {
        let receiver = metadata.receiver()?.clone();

        self.open_receiver_list().await?;

        let rows = self.ui.rows().await?;
        let index = find_row(&rows, &receiver.label)?;
        if rows[index].control_value("active") != Some("true") {
            return Ok(Outcome::Next);
        }

        self.ui.click_row_control(index, "active").await?;
        self.ui.settle(self.timing.toggle_settle()).await;

        let rows = self.ui.rows().await?;
        let index = find_row(&rows, &receiver.label)?;
        if rows[index].control_value("active") == Some("false") {
            Ok(Outcome::Next)
        } else {
            Ok(Outcome::SomethingWentWrong)
        }
    }

    /// Identify the receiver whose connection was just activated
    ///
    /// When several rows read active at once the first one in page order
    /// wins; that rule is deterministic and matches the list's sort.
    pub async fn identify_activated_receiver(&mut self, answers: &[Answer]) -> Result<Outcome> {
        self.open_receiver_list().await?;

        let rows = self.ui.rows().await?;
        let active = rows
            .iter()
            .find(|row| row.control_value("active") == Some("true"))
            .ok_or(Error::NoActiveReceiver)?;

        let id = answer_for_label(answers, &active.label)?;
        Ok(Outcome::Answer(id))
    }

    /// Identify the sender connected to the given receiver
    pub async fn identify_connected_sender(
        &mut self,
        answers: &[Answer],
        metadata: &Metadata,
    ) -> Result<Outcome> {
        let receiver = metadata.receiver()?.clone();

        self.ui.open_link(RECEIVERS_LINK).await?;
        self.ui.open_link(&receiver.label).await?;

        self.ui
            .wait_for("active", Readiness::Clickable, self.timing.element_wait())
            .await?;
        self.ui.settle(self.timing.settle()).await;
        self.ui.click_control("active").await?;

        let sender_label = self.ui.control_text("sender").await?;
        let id = answer_for_label(answers, &sender_label)?;
        Ok(Outcome::Answer(id))
    }

    /// Watch the given receiver until its connection goes inactive
    ///
    /// Polls the list at the configured interval, bounded by a wall-clock
    /// deadline rather than looping until the suite kills the session.
    pub async fn await_disconnection(&mut self, metadata: &Metadata) -> Result<Outcome> {
        let receiver = metadata.receiver()?.clone();

        self.open_receiver_list().await?;

        // Fail fast when the receiver isn't listed at all
        find_row(&self.ui.rows().await?, &receiver.label)?;

        let deadline = Instant::now() + self.timing.disconnect_deadline();
        loop {
            let rows = self.ui.rows().await?;
            let index = find_row(&rows, &receiver.label)?;
            if rows[index].control_value("active") != Some("true") {
                tracing::info!(receiver = %receiver.label, "disconnection observed");
                return Ok(Outcome::Next);
            }

            if Instant::now() >= deadline {
                return Err(Error::DisconnectTimeout(
                    self.timing.disconnect_deadline_secs,
                ));
            }

            self.ui.settle(self.timing.poll_interval()).await;
            self.ui.refresh_list().await?;
            self.ui.settle(self.timing.refresh_settle()).await;
        }
    }

    /// Navigate to the receiver list and refresh it
    async fn open_receiver_list(&mut self) -> Result<()> {
        self.ui.open_link(RECEIVERS_LINK).await?;
        self.ui.refresh_list().await?;
        self.ui.settle(self.timing.refresh_settle()).await;
        Ok(())
    }
}

/// Index of the first row whose label matches exactly
fn find_row(rows: &[UiRow], label: &str) -> Result<usize> {
    rows.iter()
        .position(|row| row.label == label)
        .ok_or_else(|| Error::row_not_found(label))
}

/// Answer id mapped to a UI label by exact match
fn answer_for_label(answers: &[Answer], label: &str) -> Result<AnswerId> {
    answers
        .iter()
        .find(|answer| answer.resource.label == label)
        .map(|answer| answer.answer_id.clone())
        .ok_or_else(|| Error::AnswerNotFound {
            label: label.to_string(),
        })
}
