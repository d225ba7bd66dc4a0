use crate::config::LogFormat;
use anyhow::{Context, Result};
use tracing_subscriber::{filter::EnvFilter, fmt::format::FmtSpan, FmtSubscriber};

/// Installs the global tracing subscriber. `RUST_LOG` wins over `log_level_str`.
pub fn setup_logging(log_level_str: &str, format: LogFormat) -> Result<()> {
    let level = match log_level_str.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("ai_notebook={level},ai_notebook_tauri_lib={level}"))
    });

    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    match format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
    }
    .context("Failed to set tracing subscriber")
}
