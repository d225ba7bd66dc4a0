use ai_notebook::terminal::{EventSink, ShellEvent};
use async_trait::async_trait;
use tauri::{AppHandle, Emitter};
use tracing::warn;

/// Broadcasts shell events to every webview as `shell-output` / `shell-state`.
pub struct TauriEventSink {
    app_handle: AppHandle,
}

impl TauriEventSink {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

#[async_trait]
impl EventSink for TauriEventSink {
    async fn publish(&self, event: ShellEvent) {
        let name = event.name();
        let emitted = match &event {
            ShellEvent::Output(output) => self.app_handle.emit(name, output),
            ShellEvent::State(change) => self.app_handle.emit(name, change),
        };
        if let Err(e) = emitted {
            warn!(event = name, error = %e, "Failed to emit shell event to webview");
        }
    }
}
