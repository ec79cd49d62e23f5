//! Scenario tests against the simulated controller
//!
//! These exercise every scenario end to end without a browser: verdicts,
//! answer mapping, correlation failures, idempotence, and the bounded
//! disconnection watch.

use ncut_harness::common::config::Timing;
use ncut_harness::scenario::{Answer, Metadata, Resource, ResourceRef};
use ncut_harness::testing::SimulatedController;
use ncut_harness::{Error, Outcome, Scenario, ScenarioRunner};

/// Timing with no settle delays so tests run instantly
fn test_timing() -> Timing {
    Timing {
        element_wait_secs: 1,
        settle_secs: 0,
        refresh_settle_secs: 0,
        toggle_settle_secs: 0,
        poll_interval_secs: 0,
        disconnect_deadline_secs: 5,
    }
}

fn answer(id: &str, label: &str) -> Answer {
    Answer {
        answer_id: id.to_string(),
        resource: Resource {
            label: label.to_string(),
            extra: serde_json::Map::new(),
        },
    }
}

fn metadata(sender: Option<&str>, receiver: Option<&str>) -> Metadata {
    Metadata {
        sender: sender.map(|label| ResourceRef {
            label: label.to_string(),
        }),
        receiver: receiver.map(|label| ResourceRef {
            label: label.to_string(),
        }),
    }
}

#[tokio::test]
async fn identify_controllable_returns_exactly_the_enabled_receivers() {
    let ui = SimulatedController::new()
        .with_receiver("RX1", false)
        .with_receiver("RX2", true);
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let answers = [answer("a1", "RX1"), answer("a2", "RX2")];
    let outcome = runner
        .identify_controllable_receivers(&answers)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Answers(vec!["a2".to_string()]));
}

#[tokio::test]
async fn identify_controllable_ignores_answers_for_unlisted_receivers() {
    let ui = SimulatedController::new().with_receiver("RX1", true);
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let answers = [answer("a1", "RX1"), answer("a9", "RX9")];
    let outcome = runner
        .identify_controllable_receivers(&answers)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Answers(vec!["a1".to_string()]));
}

#[tokio::test]
async fn subscribe_returns_next_when_active_sender_matches() {
    let ui = SimulatedController::new()
        .with_receiver("RX2", true)
        .with_sender("SDR-A")
        .with_sender("SDR-B");
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let outcome = runner
        .subscribe_receiver_to_sender(&metadata(Some("SDR-A"), Some("RX2")))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Next);
    let ui = runner.into_ui();
    let rx = ui.receiver("RX2").unwrap();
    assert!(rx.active);
    assert_eq!(rx.connected_sender.as_deref(), Some("SDR-A"));
}

#[tokio::test]
async fn subscribe_reports_mismatched_active_sender() {
    let ui = SimulatedController::new()
        .with_receiver("RX2", true)
        .with_sender("SDR-A")
        .with_reported_sender("SDR-B");
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let outcome = runner
        .subscribe_receiver_to_sender(&metadata(Some("SDR-A"), Some("RX2")))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::SomethingWentWrong);
}

#[tokio::test]
async fn subscribe_fails_when_sender_row_is_missing() {
    let ui = SimulatedController::new()
        .with_receiver("RX2", true)
        .with_sender("SDR-B");
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let result = runner
        .subscribe_receiver_to_sender(&metadata(Some("SDR-A"), Some("RX2")))
        .await;

    assert!(matches!(result, Err(Error::RowNotFound { .. })));
}

#[tokio::test]
async fn subscribe_then_identify_connected_sender_round_trips() {
    let ui = SimulatedController::new()
        .with_receiver("RX2", true)
        .with_sender("SDR-A");
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let outcome = runner
        .subscribe_receiver_to_sender(&metadata(Some("SDR-A"), Some("RX2")))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Next);

    let answers = [answer("a-sdr", "SDR-A")];
    let outcome = runner
        .identify_connected_sender(&answers, &metadata(None, Some("RX2")))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Answer("a-sdr".to_string()));
}

#[tokio::test]
async fn disconnect_deactivates_an_active_receiver() {
    let ui = SimulatedController::new()
        .with_receiver("RX1", true)
        .with_active_connection("RX1", "SDR-A");
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let outcome = runner
        .disconnect_receiver(&metadata(None, Some("RX1")))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Next);
    let ui = runner.into_ui();
    let rx = ui.receiver("RX1").unwrap();
    assert!(!rx.active);
    assert!(rx.connected_sender.is_none());
}

#[tokio::test]
async fn disconnect_is_idempotent_on_an_inactive_receiver() {
    let ui = SimulatedController::new().with_receiver("RX1", true);
    let mut runner = ScenarioRunner::new(ui, test_timing());
    let metadata = metadata(None, Some("RX1"));

    let first = runner.disconnect_receiver(&metadata).await.unwrap();
    let second = runner.disconnect_receiver(&metadata).await.unwrap();

    assert_eq!(first, Outcome::Next);
    assert_eq!(second, Outcome::Next);
    // The toggle was never clicked, so the receiver stayed inactive
    assert!(!runner.into_ui().receiver("RX1").unwrap().active);
}

#[tokio::test]
async fn disconnect_fails_on_an_unlisted_receiver() {
    let ui = SimulatedController::new().with_receiver("RX1", true);
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let result = runner.disconnect_receiver(&metadata(None, Some("RX9"))).await;

    assert!(matches!(result, Err(Error::RowNotFound { .. })));
}

#[tokio::test]
async fn identify_activated_maps_the_active_receiver_to_its_answer() {
    let ui = SimulatedController::new()
        .with_receiver("RX1", true)
        .with_receiver("RX2", true)
        .with_active_connection("RX2", "SDR-A");
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let answers = [answer("a1", "RX1"), answer("a2", "RX2")];
    let outcome = runner.identify_activated_receiver(&answers).await.unwrap();

    assert_eq!(outcome, Outcome::Answer("a2".to_string()));
}

#[tokio::test]
async fn identify_activated_picks_the_first_of_multiple_active_rows() {
    let ui = SimulatedController::new()
        .with_receiver("RX1", true)
        .with_receiver("RX2", true)
        .with_active_connection("RX1", "SDR-A")
        .with_active_connection("RX2", "SDR-B");
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let answers = [answer("a1", "RX1"), answer("a2", "RX2")];
    let outcome = runner.identify_activated_receiver(&answers).await.unwrap();

    // First row in page order wins, deterministically
    assert_eq!(outcome, Outcome::Answer("a1".to_string()));
}

#[tokio::test]
async fn identify_activated_errors_when_nothing_is_active() {
    let ui = SimulatedController::new().with_receiver("RX1", true);
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let result = runner.identify_activated_receiver(&[answer("a1", "RX1")]).await;

    assert!(matches!(result, Err(Error::NoActiveReceiver)));
}

#[tokio::test]
async fn await_disconnection_returns_next_once_the_receiver_goes_inactive() {
    let ui = SimulatedController::new()
        .with_receiver("RX1", true)
        .with_active_connection("RX1", "SDR-A")
        .with_disconnect_after("RX1", 2);
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let outcome = runner
        .await_disconnection(&metadata(None, Some("RX1")))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Next);
}

#[tokio::test]
async fn await_disconnection_times_out_on_a_stuck_connection() {
    let ui = SimulatedController::new()
        .with_receiver("RX1", true)
        .with_active_connection("RX1", "SDR-A");
    let mut timing = test_timing();
    timing.disconnect_deadline_secs = 0;
    let mut runner = ScenarioRunner::new(ui, timing);

    let result = runner.await_disconnection(&metadata(None, Some("RX1"))).await;

    assert!(matches!(result, Err(Error::DisconnectTimeout(0))));
}

#[tokio::test]
async fn scenarios_requiring_metadata_fail_without_it() {
    let ui = SimulatedController::new().with_receiver("RX1", true);
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let result = runner.disconnect_receiver(&Metadata::default()).await;

    assert!(matches!(result, Err(Error::MissingMetadata("receiver"))));
}

#[tokio::test]
async fn run_dispatches_by_scenario_name() {
    let ui = SimulatedController::new()
        .with_receiver("RX1", false)
        .with_receiver("RX2", true);
    let mut runner = ScenarioRunner::new(ui, test_timing());

    let answers = [answer("a1", "RX1"), answer("a2", "RX2")];
    let outcome = runner
        .run(
            Scenario::IdentifyControllableReceivers,
            &answers,
            &Metadata::default(),
        )
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Answers(vec!["a2".to_string()]));
}
