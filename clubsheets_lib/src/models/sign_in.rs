//! Sign-in records from the SignIn sheet.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Record;

/// Full sign-in record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignIn {
    pub id: String,
    /// `None` when the timestamp cell could not be parsed.
    pub timestamp: Option<NaiveDateTime>,
    pub last_name: String,
    #[serde(rename = "type")]
    pub member_type: String,
    pub dropped_off_kids: String,
    pub family_members: String,
    pub number_of_members: String,
    pub number_of_guests: String,
    pub primary_phone: String,
    pub secondary_phone: String,
    pub primary_email: String,
    pub secondary_email: String,
}

impl Record for SignIn {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Abbreviated sign-in: who, when, and head counts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignInLite {
    pub id: String,
    pub timestamp: Option<NaiveDateTime>,
    pub number_of_members: String,
    pub number_of_guests: String,
    pub dropped_off_kids: String,
}

impl Record for SignInLite {
    fn id(&self) -> &str {
        &self.id
    }
}

impl From<&SignIn> for SignInLite {
    fn from(s: &SignIn) -> Self {
        SignInLite {
            id: s.id.clone(),
            timestamp: s.timestamp,
            number_of_members: s.number_of_members.clone(),
            number_of_guests: s.number_of_guests.clone(),
            dropped_off_kids: s.dropped_off_kids.clone(),
        }
    }
}
