use ai_notebook::config::Config;
use ai_notebook::logging::setup_logging;
use ai_notebook::terminal::{ChannelSink, SessionManager, SessionState, ShellEvent, StreamLabel};
use anyhow::{Context, Result};
use std::io::BufRead;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

const EVENT_QUEUE_CAPACITY: usize = 256;

/// Reads our own stdin on a plain thread; a blocking stdin read would otherwise
/// keep the runtime from shutting down after the shell exits.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn write_flushed<W: AsyncWrite + Unpin>(out: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    out.write_all(bytes).await?;
    out.flush().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    setup_logging(&config.log_level, config.log_format)?;

    tracing::info!(version = %env!("CARGO_PKG_VERSION"), shell = %config.shell.program, "Starting headless shell bridge");

    let (sink, mut events) = ChannelSink::new(EVENT_QUEUE_CAPACITY);
    let manager = Arc::new(SessionManager::new(config.shell.clone(), Arc::new(sink)));
    manager.initiate();

    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        let mut stderr = tokio::io::stderr();
        while let Some(event) = events.recv().await {
            match event {
                ShellEvent::Output(output) => {
                    let written = match output.stream {
                        StreamLabel::Stdout => write_flushed(&mut stdout, output.text.as_bytes()).await,
                        StreamLabel::Stderr => write_flushed(&mut stderr, output.text.as_bytes()).await,
                    };
                    if let Err(e) = written {
                        tracing::warn!(error = %e, stream = %output.stream, "Failed to print shell output");
                    }
                }
                ShellEvent::State(change) => {
                    tracing::info!(state = %change.state, exit_code = ?change.exit_code, "Shell state changed");
                }
            }
        }
    });

    let forwarder = {
        let manager = manager.clone();
        let mut lines = spawn_stdin_reader();
        let mut state = manager.subscribe();
        tokio::spawn(async move {
            // Lines typed before the shell is up would be dropped by `submit`.
            let ready = state
                .wait_for(|s| !matches!(s, SessionState::NotStarted | SessionState::Starting))
                .await
                .is_ok();
            if !ready {
                return;
            }
            while let Some(line) = lines.recv().await {
                manager.submit(format!("{line}\n")).await;
            }
        })
    };

    let outcome = manager.wait().await;
    forwarder.abort();
    if let Err(e) = forwarder.await {
        tracing::debug!(error = %e, "Input forwarder stopped");
    }
    // Last sink reference goes with the manager; the printer then drains and stops.
    drop(manager);
    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "Output printer task failed");
    }

    match outcome {
        Some(Ok(summary)) => {
            tracing::info!(exit_code = ?summary.exit_code, pid = ?summary.pid, "Shell bridge finished");
            Ok(())
        }
        Some(Err(e)) => Err(e).context("Shell session failed"),
        None => anyhow::bail!("Shell session was never started"),
    }
}
