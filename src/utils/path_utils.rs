use crate::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

// No separators, drive colons, wildcards or control characters.
static PLAIN_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[^/\\:*?"<>|\x00-\x1f]+$"#).expect("file name pattern is a valid regex")
});

/// Expands tilde (~) in a path string to the user's home directory.
pub fn expand_tilde_path_buf(path_str: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path_str).as_ref())
}

/// Tilde-expands a caller supplied path, rejecting empty input.
pub fn resolve_user_path(path_str: &str) -> Result<PathBuf, AppError> {
    let trimmed = path_str.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidPath("Path must not be empty".to_string()));
    }
    Ok(expand_tilde_path_buf(trimmed))
}

/// Renders a path for the frontend, without the `\\?\` prefix on Windows.
pub fn display_path(path: &Path) -> String {
    dunce::simplified(path).to_string_lossy().into_owned()
}

/// Accepts only a bare file name that cannot escape its directory.
pub fn validate_file_name(name: &str) -> Result<&str, AppError> {
    if name == "." || name == ".." || !PLAIN_FILE_NAME.is_match(name) {
        return Err(AppError::InvalidPath(format!("Not a plain file name: {:?}", name)));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand_tilde_path_buf("~/notes");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("notes"));
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(resolve_user_path("   "), Err(AppError::InvalidPath(_))));
    }

    #[test]
    fn file_names_with_separators_are_rejected() {
        assert!(validate_file_name("2024-05-01 chat.md").is_ok());
        for bad in ["../escape.md", "a/b.md", "a\\b.md", "..", ".", "", "c:chat.md"] {
            assert!(validate_file_name(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
