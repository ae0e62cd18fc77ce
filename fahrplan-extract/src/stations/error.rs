//! Station list error types.

/// Errors that can occur when loading the station reference list.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Reading a local file failed
    #[error("failed to read station list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote source returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The file is not valid delimited text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header
    #[error("station list has no {0} column")]
    MissingColumn(&'static str),
}
