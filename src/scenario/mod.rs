//! Scenario contract between the harness and the orchestrating test suite
//!
//! The test suite supplies candidate [`Answer`]s and per-question
//! [`Metadata`], invokes one [`Scenario`] at a time against the shared
//! browser session, and records the returned [`Outcome`].

mod runner;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use runner::ScenarioRunner;

/// Identifier the test suite uses to score a chosen answer
pub type AnswerId = String;

/// A candidate answer offered for a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Identifier reported back to the test suite
    pub answer_id: AnswerId,
    /// The resource this answer refers to
    pub resource: Resource,
}

/// Resource details attached to an answer
///
/// Only the label is matched against the UI; any other fields the test
/// suite sends along are preserved untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub label: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Reference to a resource named in scenario metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    pub label: String,
}

/// Per-question parameters supplied by the test suite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<ResourceRef>,
}

impl Metadata {
    /// The sender under test, or an error if the question didn't name one
    pub fn sender(&self) -> crate::Result<&ResourceRef> {
        self.sender
            .as_ref()
            .ok_or(crate::Error::MissingMetadata("sender"))
    }

    /// The receiver under test, or an error if the question didn't name one
    pub fn receiver(&self) -> crate::Result<&ResourceRef> {
        self.receiver
            .as_ref()
            .ok_or(crate::Error::MissingMetadata("receiver"))
    }
}

/// The scenarios the harness can run, one per test-suite question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Which receivers are controllable via IS-05?
    IdentifyControllableReceivers,
    /// Connect a given sender's flow to a given receiver
    SubscribeReceiverToSender,
    /// Remove the connection on a given receiver
    DisconnectReceiver,
    /// Which receiver was just activated?
    IdentifyActivatedReceiver,
    /// Which sender is connected to a given receiver?
    IdentifyConnectedSender,
    /// Notice, within a bound, that a receiver was disconnected
    AwaitDisconnection,
}

impl Scenario {
    /// All scenarios in checklist order
    pub const ALL: [Scenario; 6] = [
        Scenario::IdentifyControllableReceivers,
        Scenario::SubscribeReceiverToSender,
        Scenario::DisconnectReceiver,
        Scenario::IdentifyActivatedReceiver,
        Scenario::IdentifyConnectedSender,
        Scenario::AwaitDisconnection,
    ];
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IdentifyControllableReceivers => "identify_controllable_receivers",
            Self::SubscribeReceiverToSender => "subscribe_receiver_to_sender",
            Self::DisconnectReceiver => "disconnect_receiver",
            Self::IdentifyActivatedReceiver => "identify_activated_receiver",
            Self::IdentifyConnectedSender => "identify_connected_sender",
            Self::AwaitDisconnection => "await_disconnection",
        };
        write!(f, "{name}")
    }
}

/// Result of one scenario invocation
///
/// One tagged type covers the three shapes the test suite accepts: a single
/// answer identifier, a list of identifiers, or the literal `"Next"` /
/// `"Something went wrong"` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A single chosen answer
    Answer(AnswerId),
    /// A set of chosen answers, in no particular order
    Answers(Vec<AnswerId>),
    /// The checked condition held
    Next,
    /// The checked condition did not hold
    SomethingWentWrong,
}

impl Outcome {
    /// Serialize into the exact wire shape the test suite expects
    pub fn to_value(&self) -> Value {
        match self {
            Self::Answer(id) => Value::String(id.clone()),
            Self::Answers(ids) => serde_json::json!(ids),
            Self::Next => Value::String("Next".to_string()),
            Self::SomethingWentWrong => Value::String("Something went wrong".to_string()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer(id) => write!(f, "{id}"),
            Self::Answers(ids) => write!(f, "{}", ids.join(", ")),
            Self::Next => write!(f, "Next"),
            Self::SomethingWentWrong => write!(f, "Something went wrong"),
        }
    }
}
