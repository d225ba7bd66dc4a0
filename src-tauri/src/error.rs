use ai_notebook::AppError;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error surface of the invoke handlers. Core failures pass through untouched.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Dialog error: {0}")]
    DialogError(String),
}

impl Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_message() {
        let err: CommandError = AppError::InvalidInputArgument("empty command".into()).into();
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            "\"Invalid input argument: empty command\""
        );
    }
}
