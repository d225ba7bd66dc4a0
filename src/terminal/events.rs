//! Events published by the shell bridge and the sink abstraction that carries them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

pub const SHELL_OUTPUT_EVENT: &str = "shell-output";
pub const SHELL_STATE_EVENT: &str = "shell-state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamLabel {
    Stdout,
    Stderr,
}

impl StreamLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamLabel::Stdout => "stdout",
            StreamLabel::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    NotStarted,
    Starting,
    Running,
    Draining,
    Terminated,
}

impl SessionState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::NotStarted => "notstarted",
            SessionState::Starting => "starting",
            SessionState::Running => "running",
            SessionState::Draining => "draining",
            SessionState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// One read chunk from a shell stream, already decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellOutput {
    pub stream: StreamLabel,
    pub text: String,
    /// Raw bytes read before decoding.
    pub byte_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellStateChange {
    pub session_id: Uuid,
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Output(ShellOutput),
    State(ShellStateChange),
}

impl ShellEvent {
    /// Name of the frontend channel this event is delivered on.
    pub fn name(&self) -> &'static str {
        match self {
            ShellEvent::Output(_) => SHELL_OUTPUT_EVENT,
            ShellEvent::State(_) => SHELL_STATE_EVENT,
        }
    }
}

/// Destination for shell events. Publishing is fire-and-forget; an
/// implementation may await to apply back-pressure to the publishing pump.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn publish(&self, event: ShellEvent);
}

/// Bounded in-process sink. A full queue blocks the publisher.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<ShellEvent>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ShellEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn publish(&self, event: ShellEvent) {
        if let Err(e) = self.tx.send(event).await {
            debug!(event = e.0.name(), "Event receiver dropped; discarding shell event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_payload_uses_frontend_field_names() {
        let event = ShellOutput {
            stream: StreamLabel::Stderr,
            text: "oops".to_string(),
            byte_count: 4,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["stream"], "stderr");
        assert_eq!(json["text"], "oops");
        assert_eq!(json["byteCount"], 4);
    }

    #[test]
    fn state_payload_omits_missing_exit_code() {
        let change = ShellStateChange {
            session_id: Uuid::new_v4(),
            state: SessionState::Running,
            exit_code: None,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["state"], "running");
        assert!(json.get("exitCode").is_none());
        assert!(json.get("sessionId").is_some());
    }

    #[tokio::test]
    async fn channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        sink.publish(ShellEvent::Output(ShellOutput {
            stream: StreamLabel::Stdout,
            text: "lost".to_string(),
            byte_count: 4,
        }))
        .await;
    }
}
