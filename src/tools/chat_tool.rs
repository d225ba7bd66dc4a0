//! Chat transcripts stored as Markdown files inside a project directory.

use crate::error::AppError;
use crate::utils::path_utils::{display_path, resolve_user_path, validate_file_name};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument, warn};

const CHAT_EXTENSION: &str = "md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ChatStore {
    chats_dir: PathBuf,
}

impl ChatStore {
    /// `chats_dir` is relative to each project directory.
    pub fn new(chats_dir: impl Into<PathBuf>) -> Self {
        Self {
            chats_dir: chats_dir.into(),
        }
    }

    pub fn chats_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.chats_dir)
    }

    pub fn session_path(&self, base_dir: &str, file_name: &str) -> Result<String, AppError> {
        let base = resolve_user_path(base_dir)?;
        let file_name = validate_file_name(file_name)?;
        Ok(display_path(&self.chats_dir(&base).join(file_name)))
    }

    /// Loads every `*.md` transcript. A project without a chat folder has no chats.
    #[instrument(skip(self))]
    pub async fn load_sessions(&self, project_dir: &str) -> Result<Vec<ChatFile>, AppError> {
        let dir = self.chats_dir(&resolve_user_path(project_dir)?);
        let mut reader = match fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Failed to read chats directory");
                return Err(e.into());
            }
        };

        let mut chats = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if !is_file || path.extension().and_then(|e| e.to_str()) != Some(CHAT_EXTENSION) {
                continue;
            }
            match fs::read(&path).await {
                Ok(bytes) => chats.push(ChatFile {
                    path: display_path(&path),
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                }),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable chat file"),
            }
        }

        chats.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(count = chats.len(), "Loaded chat sessions");
        Ok(chats)
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn save_session(&self, file_path: &str, content: &str) -> Result<(), AppError> {
        let path = resolve_user_path(file_path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(path = %parent.display(), error = %e, "Failed to create chats directory");
                AppError::from(e)
            })?;
        }
        fs::write(&path, content).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to save chat file");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_session(&self, file_path: &str) -> Result<(), AppError> {
        let path = resolve_user_path(file_path)?;
        fs::remove_file(&path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to delete chat file");
            AppError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CHATS_DIR;
    use tempfile::tempdir;

    fn store() -> ChatStore {
        ChatStore::new(DEFAULT_CHATS_DIR)
    }

    #[tokio::test]
    async fn missing_chat_folder_means_no_chats() {
        let project = tempdir().unwrap();
        let chats = store()
            .load_sessions(&project.path().to_string_lossy())
            .await
            .unwrap();
        assert!(chats.is_empty());
    }

    #[tokio::test]
    async fn save_creates_folder_and_load_filters_markdown() {
        let project = tempdir().unwrap();
        let project_str = project.path().to_string_lossy().into_owned();
        let store = store();

        let second = store.session_path(&project_str, "b-chat.md").unwrap();
        let first = store.session_path(&project_str, "a-chat.md").unwrap();
        store.save_session(&second, "---\ntitle: B\n---").await.unwrap();
        store.save_session(&first, "---\ntitle: A\n---").await.unwrap();

        let chats_dir = store.chats_dir(project.path());
        std::fs::write(chats_dir.join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(chats_dir.join("folder.md")).unwrap();

        let chats = store.load_sessions(&project_str).await.unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].path, first);
        assert_eq!(chats[0].content, "---\ntitle: A\n---");
        assert_eq!(chats[1].path, second);
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let project = tempdir().unwrap();
        let store = store();
        let path = store
            .session_path(&project.path().to_string_lossy(), "gone.md")
            .unwrap();
        store.save_session(&path, "bye").await.unwrap();

        store.delete_session(&path).await.unwrap();
        assert!(!Path::new(&path).exists());
        assert!(store.delete_session(&path).await.is_err());
    }

    #[test]
    fn session_path_rejects_escaping_names() {
        let err = store().session_path("/projects/demo", "../../etc/passwd").unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn session_path_lives_under_chats_dir() {
        let path = store().session_path("/projects/demo", "today.md").unwrap();
        assert!(PathBuf::from(path).ends_with(Path::new(".ai-notebook").join("chats").join("today.md")));
    }
}
