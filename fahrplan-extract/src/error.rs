//! Top-level error for the extraction binary.

use crate::config::ConfigError;
use crate::fahrplan::FahrplanError;
use crate::stations::StationError;
use crate::store::StoreError;

/// Anything that stops a run before or instead of producing a report.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load stations: {0}")]
    Stations(#[from] StationError),

    #[error("document store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to create API client: {0}")]
    Client(#[from] FahrplanError),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(#[from] tracing_subscriber::util::TryInitError),
}
