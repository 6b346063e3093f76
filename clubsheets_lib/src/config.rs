//! Service configuration: which spreadsheet to read, how to reach it, and
//! the range and TTL of every dataset.
//!
//! Settings come from an optional TOML file and are then overlaid by
//! `CLUBSHEETS_*` environment variables.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::MAX_TTL;
use crate::dataset::Dataset;
use crate::error::ClubSheetsError;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Range and cache lifetime of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSettings {
    pub range: String,
    pub ttl: Duration,
}

impl DatasetSettings {
    pub fn defaults_for(dataset: Dataset) -> Self {
        Self {
            range: dataset.default_range().to_string(),
            ttl: dataset.default_ttl(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_key: String,
    /// Overrides the production API base URL.
    pub base_url: Option<String>,
    /// Upper bound on one upstream fetch, retries included.
    pub fetch_timeout: Duration,
    /// Coalesce concurrent cache misses for a dataset into one upstream call.
    pub single_flight: bool,
    pub members: DatasetSettings,
    pub accounts: DatasetSettings,
    pub overdue: DatasetSettings,
    pub sign_ins: DatasetSettings,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    spreadsheet_id: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    fetch_timeout_secs: Option<u64>,
    single_flight: Option<bool>,
    members: Option<DatasetFile>,
    accounts: Option<DatasetFile>,
    overdue: Option<DatasetFile>,
    signins: Option<DatasetFile>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DatasetFile {
    range: Option<String>,
    ttl_secs: Option<u64>,
}

impl DatasetFile {
    fn into_settings(self, dataset: Dataset) -> DatasetSettings {
        let defaults = DatasetSettings::defaults_for(dataset);
        DatasetSettings {
            range: self.range.unwrap_or(defaults.range),
            ttl: self.ttl_secs.map(Duration::from_secs).unwrap_or(defaults.ttl),
        }
    }
}

impl SheetsConfig {
    /// Default settings for a spreadsheet; everything but the id and key is optional.
    pub fn new(spreadsheet_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            api_key: api_key.into(),
            base_url: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            single_flight: true,
            members: DatasetSettings::defaults_for(Dataset::Members),
            accounts: DatasetSettings::defaults_for(Dataset::Accounts),
            overdue: DatasetSettings::defaults_for(Dataset::Overdue),
            sign_ins: DatasetSettings::defaults_for(Dataset::SignIns),
        }
    }

    /// Parses a TOML document. Missing credentials are left empty so the
    /// environment can supply them; call [`validate`](Self::validate) after.
    pub fn from_toml_str(toml_content: &str) -> Result<Self, ClubSheetsError> {
        let file: ConfigFile = toml::from_str(toml_content)?;
        let mut config = Self::new(
            file.spreadsheet_id.unwrap_or_default(),
            file.api_key.unwrap_or_default(),
        );
        config.base_url = file.base_url;
        if let Some(secs) = file.fetch_timeout_secs {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(on) = file.single_flight {
            config.single_flight = on;
        }
        config.members = file.members.unwrap_or_default().into_settings(Dataset::Members);
        config.accounts = file.accounts.unwrap_or_default().into_settings(Dataset::Accounts);
        config.overdue = file.overdue.unwrap_or_default().into_settings(Dataset::Overdue);
        config.sign_ins = file.signins.unwrap_or_default().into_settings(Dataset::SignIns);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ClubSheetsError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClubSheetsError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults overlaid by the process environment.
    pub fn from_env() -> Result<Self, ClubSheetsError> {
        let mut config = Self::new("", "");
        config.apply_env()?;
        Ok(config)
    }

    /// Overlays `CLUBSHEETS_*` variables from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ClubSheetsError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Overlays settings from any key lookup (the environment, in practice).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ClubSheetsError> {
        if let Some(id) = lookup("CLUBSHEETS_SHEET_ID") {
            self.spreadsheet_id = id;
        }
        if let Some(key) = lookup("CLUBSHEETS_API_KEY") {
            self.api_key = key;
        }
        if let Some(url) = lookup("CLUBSHEETS_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(secs) = parse_var(&lookup, "CLUBSHEETS_FETCH_TIMEOUT_SECS")? {
            self.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("CLUBSHEETS_SINGLE_FLIGHT") {
            self.single_flight = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(ClubSheetsError::Config(format!(
                        "CLUBSHEETS_SINGLE_FLIGHT must be a boolean, got '{}'",
                        other
                    )))
                }
            };
        }
        for dataset in Dataset::ALL {
            let var = format!("CLUBSHEETS_TTL_{}_SECS", dataset.cache_key().to_uppercase());
            if let Some(secs) = parse_var(&lookup, &var)? {
                self.settings_mut(dataset).ttl = Duration::from_secs(secs);
            }
        }
        Ok(())
    }

    pub fn settings(&self, dataset: Dataset) -> &DatasetSettings {
        match dataset {
            Dataset::Members => &self.members,
            Dataset::Accounts => &self.accounts,
            Dataset::Overdue => &self.overdue,
            Dataset::SignIns => &self.sign_ins,
        }
    }

    pub fn settings_mut(&mut self, dataset: Dataset) -> &mut DatasetSettings {
        match dataset {
            Dataset::Members => &mut self.members,
            Dataset::Accounts => &mut self.accounts,
            Dataset::Overdue => &mut self.overdue,
            Dataset::SignIns => &mut self.sign_ins,
        }
    }

    /// Rejects missing credentials, zero durations, and ranges too narrow
    /// for their column schema.
    pub fn validate(&self) -> Result<(), ClubSheetsError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ClubSheetsError::Config(
                "spreadsheet id is not set (CLUBSHEETS_SHEET_ID)".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(ClubSheetsError::Config(
                "API key is not set (CLUBSHEETS_API_KEY)".to_string(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ClubSheetsError::Config(
                "fetch timeout must be greater than zero".to_string(),
            ));
        }
        self.validate_datasets()
    }

    /// The per-dataset half of [`validate`](Self::validate), which needs no credentials.
    pub fn validate_datasets(&self) -> Result<(), ClubSheetsError> {
        for dataset in Dataset::ALL {
            let settings = self.settings(dataset);
            if settings.ttl.is_zero() {
                return Err(ClubSheetsError::Config(format!(
                    "{} TTL must be greater than zero",
                    dataset
                )));
            }
            if settings.ttl > MAX_TTL {
                return Err(ClubSheetsError::Config(format!(
                    "{} TTL of {}s exceeds the maximum of {}s",
                    dataset,
                    settings.ttl.as_secs(),
                    MAX_TTL.as_secs()
                )));
            }
            dataset.schema().validate(&settings.range)?;
        }
        Ok(())
    }
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<u64>, ClubSheetsError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
            ClubSheetsError::Config(format!("{} must be a whole number, got '{}'", key, raw))
        }),
    }
}
