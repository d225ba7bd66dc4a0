use crate::error::AppError;
use crate::utils::path_utils::{display_path, resolve_user_path};
use serde::Serialize;
use std::io::ErrorKind;
use tokio::fs;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub is_directory: bool,
    pub path: String,
}

#[instrument]
pub async fn read_file(path: &str) -> Result<String, AppError> {
    let resolved = resolve_user_path(path)?;
    let bytes = fs::read(&resolved).await?;
    debug!(bytes = bytes.len(), "Read file");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[instrument(skip(content), fields(bytes = content.len()))]
pub async fn write_file(path: &str, content: &str) -> Result<(), AppError> {
    let resolved = resolve_user_path(path)?;
    fs::write(&resolved, content).await?;
    Ok(())
}

/// `Ok(false)` only for not-found; any other failure is reported.
#[instrument]
pub async fn check_file_exists(path: &str) -> Result<bool, AppError> {
    let resolved = resolve_user_path(path)?;
    match fs::metadata(&resolved).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Lists one directory level, sorted by name.
#[instrument]
pub async fn list_directory(path: &str) -> Result<Vec<FileEntry>, AppError> {
    let dir = resolve_user_path(path)?;
    let mut reader = fs::read_dir(&dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let is_directory = entry.file_type().await?.is_dir();
        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_directory,
            path: display_path(&dir.join(entry.file_name())),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = entries.len(), "Listed directory");
    Ok(entries)
}
