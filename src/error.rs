use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to launch shell '{program}': {source}")]
    ShellSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Shell {0} pipe could not be acquired")]
    PipeUnavailable(&'static str),

    #[error("Command execution error: {0}")]
    CommandExecutionError(String),

    #[error("Command exited with code {code:?}: {output}")]
    CommandFailed { code: Option<i32>, output: String },

    #[error("Unsupported output encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid input argument: {0}")]
    InvalidInputArgument(String),
}

// Frontend callers only ever see the message.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.to_string()
    }
}
