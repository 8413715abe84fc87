use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Target prefixes match every `maph_*` crate as well as the binary.
const DEFAULT_FILTER: &str = "warn,maph=info";

const LOG_FILE_PREFIX: &str = "maph.log";

/// Installs the global subscriber.
///
/// Logs always go to a daily rolling file under `log_dir`. With `verbose`
/// they are mirrored to stderr. The filter comes from `level`, then
/// `RUST_LOG`, then [`DEFAULT_FILTER`].
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(log_dir: &Path, level: Option<&str>, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter(level)?);

    let stderr_layer = if verbose {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .with_filter(filter(level)?);
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install the log subscriber")?;

    Ok(guard)
}

fn filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter '{}'", directives)),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}
