//! The four logical row collections read from the spreadsheet.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::schema::{self, ColumnSchema};

/// One sheet-backed dataset, with its cache key, default range, TTL and schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Members,
    Accounts,
    Overdue,
    #[serde(rename = "signins")]
    SignIns,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [
        Dataset::Members,
        Dataset::Accounts,
        Dataset::Overdue,
        Dataset::SignIns,
    ];

    /// Fixed key the dataset's raw rows are cached under.
    pub fn cache_key(self) -> &'static str {
        match self {
            Dataset::Members => "members",
            Dataset::Accounts => "accounts",
            Dataset::Overdue => "overdue",
            Dataset::SignIns => "signins",
        }
    }

    /// A1 range read when the config does not override it.
    pub fn default_range(self) -> &'static str {
        match self {
            Dataset::Members => "Members!A2:S",
            Dataset::Accounts => "Accounts!A4:AR",
            Dataset::Overdue => "Over-Due!A4:R",
            Dataset::SignIns => "SignIn!A2:M",
        }
    }

    /// Default time-to-live, tuned to how often each sheet changes.
    pub fn default_ttl(self) -> Duration {
        match self {
            Dataset::Members => Duration::from_secs(5 * 60),
            Dataset::Accounts => Duration::from_secs(60 * 60),
            Dataset::Overdue => Duration::from_secs(60),
            Dataset::SignIns => Duration::from_secs(24 * 60 * 60),
        }
    }

    pub fn schema(self) -> &'static ColumnSchema {
        match self {
            Dataset::Members => &schema::MEMBER_SCHEMA,
            Dataset::Accounts => &schema::ACCOUNT_SCHEMA,
            Dataset::Overdue => &schema::OVERDUE_SCHEMA,
            Dataset::SignIns => &schema::SIGN_IN_SCHEMA,
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cache_key())
    }
}

impl std::str::FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "members" => Ok(Dataset::Members),
            "accounts" => Ok(Dataset::Accounts),
            "overdue" | "over-due" => Ok(Dataset::Overdue),
            "signins" | "sign-ins" => Ok(Dataset::SignIns),
            other => Err(format!("unknown dataset '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            Dataset::ALL.iter().map(|d| d.cache_key()).collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn default_ttls() {
        assert_eq!(Dataset::Members.default_ttl(), Duration::from_secs(300));
        assert_eq!(Dataset::Accounts.default_ttl(), Duration::from_secs(3600));
        assert_eq!(Dataset::Overdue.default_ttl(), Duration::from_secs(60));
        assert_eq!(Dataset::SignIns.default_ttl(), Duration::from_secs(86400));
    }

    #[test]
    fn default_ranges_fit_their_schemas() {
        for dataset in Dataset::ALL {
            assert!(
                dataset.schema().validate(dataset.default_range()).is_ok(),
                "{} schema does not fit {}",
                dataset,
                dataset.default_range()
            );
        }
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("Over-Due".parse::<Dataset>(), Ok(Dataset::Overdue));
        assert_eq!("signins".parse::<Dataset>(), Ok(Dataset::SignIns));
        assert!("payments".parse::<Dataset>().is_err());
    }
}
