//! Tracing setup.
//!
//! Everything at `info` and above goes to stderr (overridable through
//! `RUST_LOG`). Warnings and errors also go to a log file, truncated at
//! startup, which ends up listing every unit of work that failed in the run.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::ExtractError;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Open `path` for writing, creating it or discarding earlier contents.
fn open_log_file(path: &Path) -> Result<File, ExtractError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| ExtractError::LogFile {
            path: path.display().to_string(),
            source,
        })
}

/// Stderr output filtered by `console`; the file always gets warnings and
/// errors regardless of `console`.
fn subscriber(console: EnvFilter, file: File) -> impl Subscriber + Send + Sync + 'static {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
}

/// Install the global subscriber.
pub fn init_tracing(log_file: &Path) -> Result<(), ExtractError> {
    let file = open_log_file(log_file)?;
    let console = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    subscriber(console, file).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.log");

        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn log_file_starts_empty_each_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.log");
        std::fs::write(&path, "previous run error\n").unwrap();

        let mut file = open_log_file(&path).unwrap();
        file.write_all(b"new\n").unwrap();
        drop(file);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn log_file_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("errors.log");

        let err = open_log_file(&path).unwrap_err();
        assert!(matches!(err, ExtractError::LogFile { .. }));
        assert!(err.to_string().contains("errors.log"));
    }

    #[test]
    fn quiet_console_still_logs_warnings_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.log");
        let file = open_log_file(&path).unwrap();

        let subscriber = subscriber(EnvFilter::new("error"), file);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("station 1/2");
            tracing::warn!("cursor did not advance on a full page");
        });

        let log = std::fs::read_to_string(&path).unwrap();
        assert!(log.contains("cursor did not advance"));
        assert!(!log.contains("station 1/2"));
    }
}
