use crate::error::CommandError;
use crate::state::AppState;
use ai_notebook::terminal::{self, SessionState, SubmitOutcome};
use tauri::State;

/// Sends raw input to the persistent shell. Callers add their own line endings.
#[tauri::command(async)]
pub async fn write_to_shell(state: State<'_, AppState>, data: String) -> Result<SubmitOutcome, CommandError> {
    Ok(state.shell.submit(data).await)
}

#[tauri::command]
pub fn shell_state(state: State<'_, AppState>) -> SessionState {
    state.shell.state()
}

#[tauri::command(async)]
pub async fn terminal_command(state: State<'_, AppState>, command: String) -> Result<String, CommandError> {
    Ok(terminal::run_command(&state.config.shell, &command).await?)
}
