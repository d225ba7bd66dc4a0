use super::events::{EventSink, SessionState};
use super::input::{ShellInput, SubmitOutcome};
use super::session::{SessionSummary, ShellSession};
use crate::config::ShellConfig;
use crate::error::AppError;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

enum Launch {
    Pending(watch::Sender<SessionState>),
    Started(JoinHandle<Result<SessionSummary, AppError>>),
    Collected,
}

/// Application-facing handle to the single interactive shell.
pub struct SessionManager {
    config: ShellConfig,
    sink: Arc<dyn EventSink>,
    input: Arc<ShellInput>,
    state: watch::Receiver<SessionState>,
    launch: StdMutex<Launch>,
}

impl SessionManager {
    pub fn new(config: ShellConfig, sink: Arc<dyn EventSink>) -> Self {
        let (state_tx, state_rx) = watch::channel(SessionState::NotStarted);
        Self {
            config,
            sink,
            input: Arc::new(ShellInput::new()),
            state: state_rx,
            launch: StdMutex::new(Launch::Pending(state_tx)),
        }
    }

    /// Starts the shell session in the background and returns immediately.
    /// Must be called from within a Tokio runtime. Only the first call has an effect.
    pub fn initiate(&self) -> bool {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "Cannot initiate shell session outside an async runtime");
                return false;
            }
        };

        let mut launch = self.launch.lock().unwrap_or_else(PoisonError::into_inner);
        let state_tx = match std::mem::replace(&mut *launch, Launch::Collected) {
            Launch::Pending(state_tx) => state_tx,
            other => {
                *launch = other;
                warn!("Shell session already initiated; ignoring");
                return false;
            }
        };

        let session = ShellSession::new(
            self.config.clone(),
            self.sink.clone(),
            self.input.clone(),
            state_tx,
        );
        info!(session_id = %session.id(), program = %self.config.program, "Initiating shell session");
        *launch = Launch::Started(runtime.spawn(session.run()));
        true
    }

    /// Forwards `payload` verbatim to the shell's stdin. Framing is the caller's job.
    /// Until the session is `Running` this is a logged no-op; callers that need
    /// readiness wait on [`SessionManager::subscribe`] first.
    #[instrument(skip(self, payload))]
    pub async fn submit(&self, payload: impl AsRef<[u8]>) -> SubmitOutcome {
        self.input.write(payload.as_ref()).await
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Waits for the session to end. `None` if it was never initiated or was
    /// already collected by an earlier call.
    pub async fn wait(&self) -> Option<Result<SessionSummary, AppError>> {
        let handle = {
            let mut launch = self.launch.lock().unwrap_or_else(PoisonError::into_inner);
            match std::mem::replace(&mut *launch, Launch::Collected) {
                Launch::Started(handle) => handle,
                other => {
                    *launch = other;
                    return None;
                }
            }
        };

        match handle.await {
            Ok(result) => Some(result),
            Err(e) => {
                error!(error = %e, "Shell session task failed");
                Some(Err(AppError::CommandExecutionError(format!(
                    "Shell session task failed: {}",
                    e
                ))))
            }
        }
    }
}
