use crate::error::CommandError;
use ai_notebook::tools::filesystem_tool::{self, FileEntry};

#[tauri::command(async)]
pub async fn read_file(path: String) -> Result<String, CommandError> {
    Ok(filesystem_tool::read_file(&path).await?)
}

#[tauri::command(async)]
pub async fn write_file(path: String, content: String) -> Result<(), CommandError> {
    Ok(filesystem_tool::write_file(&path, &content).await?)
}

#[tauri::command(async)]
pub async fn check_file_exists(path: String) -> Result<bool, CommandError> {
    Ok(filesystem_tool::check_file_exists(&path).await?)
}

#[tauri::command(async)]
pub async fn list_files(path: String) -> Result<Vec<FileEntry>, CommandError> {
    Ok(filesystem_tool::list_directory(&path).await?)
}
