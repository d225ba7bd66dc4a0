use crate::error::CommandError;
use crate::state::AppState;
use ai_notebook::tools::chat_tool::ChatFile;
use tauri::State;

#[tauri::command]
pub fn get_chat_session_path(
    state: State<'_, AppState>,
    base_dir: String,
    file_name: String,
) -> Result<String, CommandError> {
    Ok(state.chats.session_path(&base_dir, &file_name)?)
}

#[tauri::command(async)]
pub async fn load_chat_sessions(
    state: State<'_, AppState>,
    project_dir: String,
) -> Result<Vec<ChatFile>, CommandError> {
    Ok(state.chats.load_sessions(&project_dir).await?)
}

#[tauri::command(async)]
pub async fn save_chat_session(
    state: State<'_, AppState>,
    file_path: String,
    content: String,
) -> Result<(), CommandError> {
    Ok(state.chats.save_session(&file_path, &content).await?)
}

#[tauri::command(async)]
pub async fn delete_chat_session(
    state: State<'_, AppState>,
    file_path: String,
) -> Result<(), CommandError> {
    Ok(state.chats.delete_session(&file_path).await?)
}
