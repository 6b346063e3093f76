//! HTTP client for the spreadsheet values API.

use std::time::Duration;

use url::Url;

use crate::{query::Query, types::ValueRange, Error};

/// Read-only client for `spreadsheets.values.get`.
///
/// Authenticates with an API key and tags every call with a caller-supplied
/// `quotaUser`, which the upstream uses to attribute quota. The underlying
/// `reqwest::Client` is built once with a 30-second timeout.
pub struct Client {
    /// Base URL for the API. Defaults to `https://sheets.googleapis.com/v4`.
    base_api_url: String,
    spreadsheet_id: String,
    api_key: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client pointing at the production Sheets API.
    pub fn new(spreadsheet_id: &str, api_key: &str) -> Result<Self, Error> {
        Self::with_base_url("https://sheets.googleapis.com/v4", spreadsheet_id, api_key)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, spreadsheet_id: &str, api_key: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    fn get_url(&self, range: &str, quota_user: &str, query: &impl Query) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.base_api_url, e);
            Error::RequestFailed
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL cannot carry a path: {}", self.base_api_url);
                Error::RequestFailed
            })?
            .pop_if_empty()
            .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("quotaUser", quota_user);
        Ok(query.add_to_url(&url))
    }

    /// Reads the cells of one A1 range (e.g. `Members!A2:S`).
    pub async fn get_values(
        &self,
        range: &str,
        quota_user: &str,
        query: &impl Query,
    ) -> Result<ValueRange, Error> {
        let url = self.get_url(range, quota_user, query)?;
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get range {}: {}", range, e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Range {} failed with status {}: {}", range, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        serde_json::from_str::<ValueRange>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse range {}: {} | body: {}", range, e, snippet);
            Error::RequestFailed
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
