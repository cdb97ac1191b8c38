//! Raw CPU samples as delivered by the upstream collector.
//!
//! A [`CpuSample`] is one timestamped observation. The per-core readings are
//! carried as a packed JSON string inside the record (the upstream wire
//! shape), so decoding them is fallible and surfaced as [`SampleError`].

use serde::{Deserialize, Serialize};

/// Core id used by the collector for the whole-machine aggregate.
///
/// Aggregate readings are excluded from per-core chart series.
pub const AGGREGATE_CORE_ID: &str = "_total";

/// One decoded per-core reading: core id and utilization percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoreReading {
    pub core: String,
    pub value: f64,
}

/// One timestamped observation: per-core CPU percentages (packed as a JSON
/// string, see [`CpuSample::core_readings`]) plus the database server CPU.
///
/// Field names follow the upstream records so whole datasets deserialize
/// directly with serde_json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSample {
    /// ISO-8601 / RFC 3339 timestamp of the observation.
    #[serde(rename = "DateTime")]
    pub timestamp: String,
    /// Hostname of the observed server.
    #[serde(rename = "WinServer")]
    pub server: String,
    /// JSON-encoded array of `{"Core": .., "Value": ..}` objects.
    #[serde(rename = "PercentProcessorTimeCore")]
    pub per_core: String,
    /// Database server CPU percentage (auxiliary metric).
    #[serde(rename = "SqlServerCPU")]
    pub sql_server_cpu: f64,
}

/// Errors raised while decoding a single sample.
///
/// Both variants carry the offending sample's timestamp so callers can point
/// at the exact record when skipping or aborting.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// The packed per-core payload did not parse as `[{Core, Value}, ..]`.
    #[error("malformed per-core payload in sample at {timestamp}: {source}")]
    MalformedPayload {
        timestamp: String,
        #[source]
        source: serde_json::Error,
    },
    /// The sample timestamp is not valid RFC 3339.
    #[error("unparseable timestamp {timestamp:?}: {source}")]
    BadTimestamp {
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl SampleError {
    /// Timestamp of the sample that failed to decode.
    pub fn timestamp(&self) -> &str {
        match self {
            SampleError::MalformedPayload { timestamp, .. } => timestamp,
            SampleError::BadTimestamp { timestamp, .. } => timestamp,
        }
    }
}

impl CpuSample {
    /// Decode the packed per-core payload.
    ///
    /// The aggregate reading (core id [`AGGREGATE_CORE_ID`]) is returned as-is;
    /// filtering it out is the series builder's job.
    pub fn core_readings(&self) -> Result<Vec<CoreReading>, SampleError> {
        serde_json::from_str(&self.per_core).map_err(|source| SampleError::MalformedPayload {
            timestamp: self.timestamp.clone(),
            source,
        })
    }

    /// Parse the sample timestamp to milliseconds since the UNIX epoch.
    pub fn timestamp_millis(&self) -> Result<i64, SampleError> {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.timestamp_millis())
            .map_err(|source| SampleError::BadTimestamp {
                timestamp: self.timestamp.clone(),
                source,
            })
    }
}
