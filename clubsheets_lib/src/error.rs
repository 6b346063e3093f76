//! Error types for the library layer.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::dataset::Dataset;

/// A dataset could not be read from the spreadsheet.
///
/// Query methods return this instead of an empty result: an empty list means
/// the sheet genuinely had no rows, this means the sheet is unavailable.
#[derive(Error, Debug, Clone)]
pub enum UpstreamError {
    /// The row source returned an error (network, auth, or quota).
    #[error("failed to fetch {dataset}: {source}")]
    Source {
        dataset: Dataset,
        source: sheets_api::Error,
    },
    /// The row source did not answer within the fetch timeout.
    #[error("fetching {dataset} timed out after {}s", .timeout.as_secs_f64())]
    Timeout { dataset: Dataset, timeout: Duration },
}

impl UpstreamError {
    pub fn dataset(&self) -> Dataset {
        match self {
            Self::Source { dataset, .. } | Self::Timeout { dataset, .. } => *dataset,
        }
    }

    /// Upstream quota was exhausted (HTTP 429).
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, Self::Source { source, .. } if source.is_quota_exhausted())
    }

    /// Upstream rejected the credentials (HTTP 401/403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Source { source, .. } if source.is_auth_failure())
    }
}

/// Why a row was left out of a projection.
///
/// Never returned to query callers: dropped rows only shrink the output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingAnomaly {
    /// An account row lacks its last name, type, or certificate number.
    #[error("account row {row} is missing {field}")]
    MissingAccountField { row: usize, field: &'static str },
    /// An overdue row whose name/number columns look shifted.
    #[error("overdue row {row} looks shifted (last name {last_name:?}, certificate {certificate_number:?})")]
    ShiftedOverdueRow {
        row: usize,
        last_name: String,
        certificate_number: String,
    },
}

/// Errors produced by the library layer outside the per-query fetch path.
#[derive(Debug)]
pub enum ClubSheetsError {
    /// A dataset fetch failed.
    Upstream(UpstreamError),
    /// Configuration is missing, malformed, or inconsistent with the schemas.
    Config(String),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// JSON or TOML serialization failed.
    Serialization(String),
}

impl fmt::Display for ClubSheetsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream(e) => write!(f, "Upstream error: {}", e),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ClubSheetsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Upstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UpstreamError> for ClubSheetsError {
    fn from(e: UpstreamError) -> Self {
        Self::Upstream(e)
    }
}

impl From<serde_json::Error> for ClubSheetsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for ClubSheetsError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
