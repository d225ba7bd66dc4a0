use crate::terminal::encoding::OutputDecoder;
use crate::utils::path_utils::expand_tilde_path_buf;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::str::FromStr;
use tokio::process::Command;
use tracing::warn;

/// Relative location of chat transcripts inside a project directory.
pub const DEFAULT_CHATS_DIR: &str = ".ai-notebook/chats";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub shell: ShellConfig,
    pub default_directory: Option<PathBuf>,
    pub chats_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}. Valid options are 'pretty', 'json'.", s)),
        }
    }
}

/// How the interactive shell (and one-shot commands) are launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Flag that makes `program` run a single command string and exit.
    pub command_flag: String,
    /// Written to stdin once the shell is running. Must carry its own line terminator.
    pub init_script: Option<String>,
    /// WHATWG encoding label used to decode stdout/stderr.
    pub output_encoding: String,
}

impl Default for ShellConfig {
    #[cfg(windows)]
    fn default() -> Self {
        Self {
            program: "powershell.exe".to_string(),
            args: ["-NoLogo", "-NoExit", "-Command", "-"].map(String::from).to_vec(),
            command_flag: "-Command".to_string(),
            init_script: Some(
                "chcp 65001 > $null; [Console]::OutputEncoding = [System.Text.Encoding]::UTF8\r\n".to_string(),
            ),
            output_encoding: "utf-8".to_string(),
        }
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-s".to_string()],
            command_flag: "-c".to_string(),
            init_script: Some("export LANG=C.UTF-8 LC_ALL=C.UTF-8\n".to_string()),
            output_encoding: "utf-8".to_string(),
        }
    }
}

impl ShellConfig {
    /// Long-lived shell with all three standard streams piped.
    pub(crate) fn interactive_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    }

    pub(crate) fn oneshot_command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.command_flag)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    }
}

fn with_line_terminator(mut script: String) -> String {
    if !script.ends_with('\n') {
        script.push_str(if cfg!(windows) { "\r\n" } else { "\n" });
    }
    script
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_level = var("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_format = var("LOG_FORMAT")
            .map(|s| LogFormat::from_str(&s))
            .transpose()?
            .unwrap_or(LogFormat::Pretty);

        let mut shell = ShellConfig::default();
        if let Some(program) = var("NOTEBOOK_SHELL") {
            shell.program = program;
        }
        if let Some(args) = var("NOTEBOOK_SHELL_ARGS") {
            shell.args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(flag) = var("NOTEBOOK_SHELL_COMMAND_FLAG") {
            shell.command_flag = flag;
        }
        if let Some(init) = var("NOTEBOOK_SHELL_INIT") {
            shell.init_script = if init.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(with_line_terminator(init))
            };
        }
        if let Some(label) = var("NOTEBOOK_SHELL_ENCODING") {
            shell.output_encoding = label;
        }
        OutputDecoder::for_label(&shell.output_encoding)
            .with_context(|| format!("Invalid NOTEBOOK_SHELL_ENCODING: {}", shell.output_encoding))?;

        if which::which(&shell.program).is_err() {
            warn!(program = %shell.program, "Shell executable not found in PATH; the interactive session will fail to start.");
        }

        let default_directory = var("NOTEBOOK_DEFAULT_DIR").map(|s| expand_tilde_path_buf(&s));

        let chats_dir = var("NOTEBOOK_CHATS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHATS_DIR));
        if chats_dir.is_absolute() {
            anyhow::bail!(
                "NOTEBOOK_CHATS_DIR must be relative to the project directory: {}",
                chats_dir.display()
            );
        }

        Ok(Config {
            log_level,
            log_format,
            shell,
            default_directory,
            chats_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.shell, ShellConfig::default());
        assert_eq!(config.chats_dir, PathBuf::from(DEFAULT_CHATS_DIR));
        assert!(config.default_directory.is_none());
    }

    #[test]
    fn shell_overrides_are_applied() {
        let config = load(&[
            ("NOTEBOOK_SHELL", "bash"),
            ("NOTEBOOK_SHELL_ARGS", "--norc  --noprofile"),
            ("NOTEBOOK_SHELL_INIT", "export FOO=1"),
            ("NOTEBOOK_SHELL_ENCODING", "ibm866"),
        ])
        .unwrap();
        assert_eq!(config.shell.program, "bash");
        assert_eq!(config.shell.args, vec!["--norc", "--noprofile"]);
        assert!(config.shell.init_script.unwrap().starts_with("export FOO=1"));
        assert_eq!(config.shell.output_encoding, "ibm866");
    }

    #[test]
    fn init_script_can_be_disabled() {
        let config = load(&[("NOTEBOOK_SHELL_INIT", "none")]).unwrap();
        assert!(config.shell.init_script.is_none());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("LOG_LEVEL", "  "), ("NOTEBOOK_SHELL", "")]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.shell.program, ShellConfig::default().program);
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let err = load(&[("NOTEBOOK_SHELL_ENCODING", "klingon-8")]).unwrap_err();
        assert!(err.to_string().contains("NOTEBOOK_SHELL_ENCODING"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(load(&[("LOG_FORMAT", "xml")]).is_err());
        assert_eq!(load(&[("LOG_FORMAT", "JSON")]).unwrap().log_format, LogFormat::Json);
    }

    #[test]
    fn absolute_chats_dir_is_rejected() {
        let absolute = if cfg!(windows) { "C:\\chats" } else { "/var/chats" };
        assert!(load(&[("NOTEBOOK_CHATS_DIR", absolute)]).is_err());
    }
}
