use crate::error::CommandError;
use crate::state::AppState;
use ai_notebook::utils::path_utils::{display_path, expand_tilde_path_buf};
use tauri::{AppHandle, State};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tokio::sync::oneshot;
use tracing::{debug, instrument};

const CONFIRM_LABEL: &str = "Yes";
const CANCEL_LABEL: &str = "No";

/// Native folder picker. `None` when the user cancels. Starts in
/// `default_path`, or the configured default directory when none is given.
#[tauri::command(async)]
#[instrument(skip(app_handle, state))]
pub async fn select_directory(
    app_handle: AppHandle,
    state: State<'_, AppState>,
    default_path: Option<String>,
) -> Result<Option<String>, CommandError> {
    let start_dir = default_path
        .filter(|p| !p.trim().is_empty())
        .map(|p| expand_tilde_path_buf(&p))
        .or_else(|| state.config.default_directory.clone());

    let (tx, rx) = oneshot::channel();
    let mut builder = app_handle.dialog().file().set_title("Select project folder");
    if let Some(dir) = start_dir {
        builder = builder.set_directory(dir);
    }
    builder.pick_folder(move |folder| {
        let _ = tx.send(folder);
    });

    let picked = rx
        .await
        .map_err(|_| CommandError::DialogError("Folder picker closed without a result".into()))?;
    match picked {
        Some(folder) => {
            let path = folder
                .into_path()
                .map_err(|e| CommandError::DialogError(e.to_string()))?;
            debug!(path = %path.display(), "Folder selected");
            Ok(Some(display_path(&path)))
        }
        None => Ok(None),
    }
}

#[tauri::command(async)]
#[instrument(skip(app_handle))]
pub async fn show_confirmation_dialog(
    app_handle: AppHandle,
    title: String,
    message: String,
) -> Result<bool, CommandError> {
    let (tx, rx) = oneshot::channel();
    app_handle
        .dialog()
        .message(message)
        .title(title)
        .kind(MessageDialogKind::Warning)
        .buttons(MessageDialogButtons::OkCancelCustom(
            CONFIRM_LABEL.to_string(),
            CANCEL_LABEL.to_string(),
        ))
        .show(move |confirmed| {
            let _ = tx.send(confirmed);
        });

    rx.await
        .map_err(|_| CommandError::DialogError("Confirmation dialog closed without a result".into()))
}
