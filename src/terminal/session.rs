//! One interactive shell process and the pumps draining it.

use super::encoding::OutputDecoder;
use super::events::{EventSink, SessionState, ShellEvent, ShellStateChange, StreamLabel};
use super::input::ShellInput;
use super::pump::{PumpReport, StreamPump};
use crate::config::ShellConfig;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::process::Child;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub pid: Option<u32>,
    pub exit_code: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub pumps: Vec<PumpReport>,
}

pub struct ShellSession {
    id: Uuid,
    config: ShellConfig,
    sink: Arc<dyn EventSink>,
    input: Arc<ShellInput>,
    state: watch::Sender<SessionState>,
}

impl ShellSession {
    pub fn new(
        config: ShellConfig,
        sink: Arc<dyn EventSink>,
        input: Arc<ShellInput>,
        state: watch::Sender<SessionState>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            sink,
            input,
            state,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Drives the session to completion: launch, pump, wait for exit, drain.
    /// Returns only after both pumps have finished.
    #[instrument(skip(self), fields(session_id = %self.id, program = %self.config.program))]
    pub async fn run(self) -> Result<SessionSummary, AppError> {
        let started_at = Utc::now();
        self.transition(SessionState::Starting, None).await;

        let decoder = OutputDecoder::for_label(&self.config.output_encoding).unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to UTF-8 for shell output");
            OutputDecoder::utf8()
        });

        let mut child = match self.config.interactive_command().spawn() {
            Ok(child) => child,
            Err(source) => {
                error!(error = %source, "Failed to launch shell");
                self.transition(SessionState::Terminated, None).await;
                return Err(AppError::ShellSpawn {
                    program: self.config.program.clone(),
                    source,
                });
            }
        };
        let pid = child.id();

        let (stdin, stdout, stderr) = match (child.stdin.take(), child.stdout.take(), child.stderr.take()) {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            (stdin, stdout, _) => {
                let missing = if stdin.is_none() {
                    "stdin"
                } else if stdout.is_none() {
                    "stdout"
                } else {
                    "stderr"
                };
                error!(missing, pid = ?pid, "Shell started without all standard streams");
                reap(&mut child).await;
                self.transition(SessionState::Terminated, None).await;
                return Err(AppError::PipeUnavailable(missing));
            }
        };

        let stdout_pump =
            StreamPump::new(StreamLabel::Stdout, stdout, decoder, self.sink.clone()).spawn();
        let stderr_pump =
            StreamPump::new(StreamLabel::Stderr, stderr, decoder, self.sink.clone()).spawn();

        // Installed before `Running` is published; the init script is the first write.
        let attached = self.input.attach(stdin).await;
        self.transition(SessionState::Running, None).await;
        info!(pid = ?pid, encoding = decoder.name(), "Shell session running");
        attached.initialize(self.config.init_script.as_deref()).await;

        let exit_code = match child.wait().await {
            Ok(status) => {
                info!(exit_code = ?status.code(), "Shell process exited");
                status.code()
            }
            Err(e) => {
                warn!(error = %e, "Failed to wait for shell process");
                None
            }
        };

        self.input.detach().await;
        self.transition(SessionState::Draining, exit_code).await;

        let (stdout_report, stderr_report) = tokio::join!(stdout_pump, stderr_pump);
        let pumps = [stdout_report, stderr_report]
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(report) => Some(report),
                Err(e) => {
                    error!(error = %e, "Stream pump task failed");
                    None
                }
            })
            .collect();

        self.transition(SessionState::Terminated, exit_code).await;
        info!("Shell session terminated");

        Ok(SessionSummary {
            session_id: self.id,
            pid,
            exit_code,
            started_at,
            ended_at: Utc::now(),
            pumps,
        })
    }

    // The sink sees the change before watchers do, so a watcher observing
    // `Terminated` knows every event has already been handed to the sink.
    async fn transition(&self, state: SessionState, exit_code: Option<i32>) {
        self.sink
            .publish(ShellEvent::State(ShellStateChange {
                session_id: self.id,
                state,
                exit_code,
                at: Utc::now(),
            }))
            .await;
        self.state.send_replace(state);
    }
}

async fn reap(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        warn!(error = %e, "Failed to kill incomplete shell process");
        return;
    }
    if let Err(e) = child.wait().await {
        warn!(error = %e, "Failed to reap incomplete shell process");
    }
}
