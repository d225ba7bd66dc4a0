use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::ChildStdin;
use tokio::sync::{Mutex as TokioMutex, MutexGuard};
use tracing::{debug, warn};

/// Result of forwarding one payload to the shell. Never an error: a missing
/// or dead shell is an expected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitOutcome {
    Delivered,
    NotRunning,
    Failed,
}

/// The shell's stdin, present only while the process is alive.
/// Each payload is written under the lock, so concurrent writers never interleave.
#[derive(Debug, Default)]
pub struct ShellInput {
    writer: TokioMutex<Option<ChildStdin>>,
}

/// The input slot right after stdin was installed, still locked so the
/// initialization write goes out before any queued writer.
#[derive(Debug)]
pub(crate) struct AttachedInput<'a> {
    guard: MutexGuard<'a, Option<ChildStdin>>,
}

impl ShellInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never waits for the shell to come up: with no stdin installed this
    /// returns `NotRunning` at once. Otherwise waits only for the lock and
    /// the pipe write itself.
    pub async fn write(&self, payload: &[u8]) -> SubmitOutcome {
        let mut guard = self.writer.lock().await;
        let Some(stdin) = guard.as_mut() else {
            warn!(bytes = payload.len(), "Shell input is not available; dropping write");
            return SubmitOutcome::NotRunning;
        };
        match write_payload(stdin, payload).await {
            Ok(()) => {
                debug!(bytes = payload.len(), "Forwarded payload to shell");
                SubmitOutcome::Delivered
            }
            Err(e) => {
                warn!(error = %e, bytes = payload.len(), "Write to shell input failed");
                SubmitOutcome::Failed
            }
        }
    }

    pub(crate) async fn attach(&self, stdin: ChildStdin) -> AttachedInput<'_> {
        let mut guard = self.writer.lock().await;
        *guard = Some(stdin);
        AttachedInput { guard }
    }

    /// Drops stdin. Returns whether a handle was present.
    pub(crate) async fn detach(&self) -> bool {
        self.writer.lock().await.take().is_some()
    }
}

impl AttachedInput<'_> {
    /// Best-effort first write; releases the slot to other writers afterwards.
    pub(crate) async fn initialize(mut self, init_script: Option<&str>) {
        let (Some(script), Some(stdin)) = (init_script, self.guard.as_mut()) else {
            return;
        };
        if let Err(e) = write_payload(stdin, script.as_bytes()).await {
            warn!(error = %e, "Shell initialization write failed; continuing without it");
        }
    }
}

async fn write_payload(stdin: &mut ChildStdin, payload: &[u8]) -> std::io::Result<()> {
    stdin.write_all(payload).await?;
    stdin.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Stdio;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::process::Command;

    #[tokio::test]
    async fn write_without_shell_is_a_noop() {
        let input = ShellInput::new();
        assert_eq!(input.write(b"data").await, SubmitOutcome::NotRunning);
        assert!(!input.detach().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn writers_queue_behind_the_initialization_write() {
        let mut child = Command::new("cat")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let input = Arc::new(ShellInput::new());

        let attached = input.attach(child.stdin.take().unwrap()).await;
        let writer = {
            let input = input.clone();
            tokio::spawn(async move { input.write(b"after init\n").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!writer.is_finished());

        attached.initialize(Some("init\n")).await;
        assert_eq!(writer.await.unwrap(), SubmitOutcome::Delivered);

        assert!(input.detach().await);
        assert_eq!(child.wait().await.unwrap().code(), Some(0));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn write_to_exited_shell_reports_failure() {
        let mut child = Command::new("true").stdin(Stdio::piped()).spawn().unwrap();
        let stdin = child.stdin.take().unwrap();
        child.wait().await.unwrap();

        let input = ShellInput::new();
        input.attach(stdin).await.initialize(None).await;

        assert_eq!(input.write(b"echo nobody\n").await, SubmitOutcome::Failed);
        // The handle stays until the session detaches it.
        assert!(input.detach().await);
    }
}
