//! Station list parsing and loading.

use std::io::Read;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::domain::EvaNumber;

use super::error::StationError;

/// Column holding the station's EVA number.
pub const EVA_COLUMN: &str = "EVA_NR";

/// Column holding the service level (`FV`, `RV`, `nur DPN`, ...).
pub const TRAFFIC_COLUMN: &str = "Verkehr";

/// `Verkehr` value of stations served by long-distance trains.
pub const LONG_DISTANCE: &str = "FV";

/// One row of the station list.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// The station's EVA number.
    pub eva: EvaNumber,

    /// Service level, from the `Verkehr` column.
    pub traffic: String,

    /// Every column of the row, keyed by header.
    pub attributes: Map<String, Value>,
}

impl Station {
    /// Whether long-distance trains call here.
    pub fn is_long_distance(&self) -> bool {
        self.traffic == LONG_DISTANCE
    }

    /// The document written to the `station` collection.
    pub fn to_document(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

/// Parse a delimited station list.
///
/// Rows whose EVA number is not a valid code are skipped with a warning.
/// Cells that are not valid UTF-8 are decoded lossily; the export has
/// historically shipped in Latin-1.
pub fn parse_stations(reader: impl Read, delimiter: u8) -> Result<Vec<Station>, StationError> {
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    let eva_idx = headers
        .iter()
        .position(|h| h == EVA_COLUMN)
        .ok_or(StationError::MissingColumn(EVA_COLUMN))?;
    let traffic_idx = headers
        .iter()
        .position(|h| h == TRAFFIC_COLUMN)
        .ok_or(StationError::MissingColumn(TRAFFIC_COLUMN))?;

    let mut stations = Vec::new();

    for (row, record) in csv.byte_records().enumerate() {
        let record = record?;
        let cell = |idx: usize| {
            record
                .get(idx)
                .map(|b| String::from_utf8_lossy(b).trim().to_string())
                .unwrap_or_default()
        };

        let raw_eva = cell(eva_idx);
        let eva = match EvaNumber::parse(&raw_eva) {
            Ok(eva) => eva,
            Err(e) => {
                // Header is line 1, first data row is line 2
                warn!(line = row + 2, value = %raw_eva, "skipping station: {e}");
                continue;
            }
        };

        let attributes = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.clone(), Value::String(cell(idx))))
            .collect();

        stations.push(Station {
            eva,
            traffic: cell(traffic_idx),
            attributes,
        });
    }

    Ok(stations)
}

/// Keep only stations served by long-distance trains, preserving order.
pub fn long_distance(stations: &[Station]) -> Vec<Station> {
    stations
        .iter()
        .filter(|s| s.is_long_distance())
        .cloned()
        .collect()
}

/// Load the station list from a local path or an `http(s)://` URL.
pub async fn load_stations(source: &str, delimiter: u8) -> Result<Vec<Station>, StationError> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::get(source).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response.bytes().await?.to_vec()
    } else {
        std::fs::read(source).map_err(|e| StationError::Io {
            path: source.to_string(),
            source: e,
        })?
    };

    let stations = parse_stations(bytes.as_slice(), delimiter)?;
    info!(source, count = stations.len(), "loaded station list");
    Ok(stations)
}
