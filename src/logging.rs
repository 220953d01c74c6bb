//! Session logging
//!
//! The terminal is owned by the UI, so logs only go to
//! `<log_dir>/rpg_asset_maker.log`, cleared at every start.
//! `RUST_LOG` overrides the configured level.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive; drop it to flush.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

pub fn default_log_file() -> &'static str {
    "rpg_asset_maker.log"
}

/// Set up the global file logger.
pub fn init_logging(log_dir: &Path, default_level: &str) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, default_log_file())?;

    let file_appender = tracing_appender::rolling::never(log_dir, default_log_file());
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create the log directory and truncate the previous session's file.
fn prepare_log_file(log_dir: &Path, log_file: &str) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_nested_directory() {
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join("deep").join("logs");

        prepare_log_file(&log_dir, "test.log").unwrap();

        assert!(log_dir.join("test.log").exists());
    }

    #[test]
    fn test_prepare_clears_previous_session() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("test.log");
        fs::write(&log_path, "old session").unwrap();

        prepare_log_file(temp.path(), "test.log").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_default_log_file() {
        assert_eq!(default_log_file(), "rpg_asset_maker.log");
    }
}
