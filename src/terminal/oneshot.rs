use super::encoding::OutputDecoder;
use crate::config::ShellConfig;
use crate::error::AppError;
use tracing::{debug, instrument, warn};

/// Runs `command` to completion with the configured shell and returns stdout
/// followed by stderr. A non-zero exit is an error that still carries the output.
#[instrument(skip(shell), fields(program = %shell.program))]
pub async fn run_command(shell: &ShellConfig, command: &str) -> Result<String, AppError> {
    if command.trim().is_empty() {
        return Err(AppError::InvalidInputArgument("Command must not be empty".to_string()));
    }

    let output = shell
        .oneshot_command(command)
        .output()
        .await
        .map_err(|source| AppError::ShellSpawn {
            program: shell.program.clone(),
            source,
        })?;

    let decoder = OutputDecoder::for_label(&shell.output_encoding)?;
    let mut text = decoder.decode(&output.stdout);
    text.push_str(&decoder.decode(&output.stderr));

    if output.status.success() {
        debug!(bytes = text.len(), "Command finished");
        Ok(text)
    } else {
        warn!(exit_code = ?output.status.code(), "Command exited unsuccessfully");
        Err(AppError::CommandFailed {
            code: output.status.code(),
            output: text,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_stdout_then_stderr() {
        let out = run_command(&ShellConfig::default(), "echo out; echo err 1>&2")
            .await
            .unwrap();
        assert_eq!(out, "out\nerr\n");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error_with_output() {
        let err = run_command(&ShellConfig::default(), "echo partial; exit 3")
            .await
            .unwrap_err();
        match err {
            AppError::CommandFailed { code, output } => {
                assert_eq!(code, Some(3));
                assert_eq!(output, "partial\n");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_command_is_rejected() {
        assert!(matches!(
            run_command(&ShellConfig::default(), "  ").await,
            Err(AppError::InvalidInputArgument(_))
        ));
    }

    #[tokio::test]
    async fn missing_shell_is_a_spawn_error() {
        let shell = ShellConfig {
            program: "definitely-not-a-shell-4c1d".to_string(),
            ..ShellConfig::default()
        };
        assert!(matches!(
            run_command(&shell, "echo hi").await,
            Err(AppError::ShellSpawn { .. })
        ));
    }
}
