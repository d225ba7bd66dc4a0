//! Persistent interactive shell bridge.
//!
//! A [`SessionManager`] owns one long-lived shell process. Its stdout and
//! stderr are drained by two independent [`pump::StreamPump`] tasks that
//! republish every read as a [`ShellEvent`]; writes go straight to stdin.

pub mod encoding;
pub mod events;
pub mod input;
pub mod manager;
pub mod oneshot;
pub mod pump;
pub mod session;

pub use events::{
    ChannelSink, EventSink, SessionState, ShellEvent, ShellOutput, ShellStateChange, StreamLabel,
};
pub use input::SubmitOutcome;
pub use manager::SessionManager;
pub use oneshot::run_command;
pub use session::SessionSummary;
