//! Tracing setup for the command line client
//!
//! - Human-readable console output on stderr (stdout carries replies)
//! - Optional JSON formatted logs to file, size and daily rotation

use anyhow::Result;
use rolling_file::{RollingConditionBasic, RollingFileAppender};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "nudb=info,nudb_cli=info,nudb_rs=info,nudb_core=info";

/// Initialize tracing, with a JSON file layer when `log_dir` is given.
///
/// Returns a guard that must be kept alive to ensure file logs are flushed
pub fn init_telemetry(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;

            // nudb.log.YYYY-MM-DD, rotated daily or at 10MB
            let file_appender = RollingFileAppender::new(
                dir.join("nudb.log"),
                RollingConditionBasic::new()
                    .daily()
                    .max_size(10 * 1024 * 1024),
                9,
            )?;
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_current_span(true)
                .with_target(true)
                .with_thread_ids(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    if let Some(dir) = log_dir {
        tracing::debug!("File logging to {:?}", dir);
    }

    Ok(guard)
}

/// Shutdown telemetry gracefully
pub fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_shows_client_info() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        for directive in ["nudb_rs=info", "nudb_core=info"] {
            assert!(
                DEFAULT_FILTER.split(',').any(|d| d == directive),
                "missing {} in {}",
                directive,
                DEFAULT_FILTER
            );
        }
    }
}
