//! Error types for the values client.

/// Errors that can occur when reading a spreadsheet range.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// The request failed (network error, timeout, or unparsable response).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}

impl Error {
    /// True when the upstream rejected the call for quota reasons (HTTP 429).
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, Error::HttpStatus { status: 429, .. })
    }

    /// True when the API key or credentials were rejected (HTTP 401/403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::HttpStatus { status: 401 | 403, .. })
    }
}
