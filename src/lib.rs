//! Backend of the local-first LLM notebook.
//!
//! - [`terminal`]: the persistent interactive shell bridge and one-shot commands
//! - [`tools`]: filesystem access and chat transcript storage
//! - [`config`], [`logging`], [`error`]: shared plumbing for the desktop and headless hosts

pub mod config;
pub mod error;
pub mod logging;
pub mod terminal;
pub mod tools;
pub mod utils;

pub use config::{Config, LogFormat, ShellConfig};
pub use error::AppError;
