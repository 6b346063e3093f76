//! Account records from the Accounts sheet.

use serde::{Deserialize, Serialize};

use super::{OverdueFee, Record};

/// Full account record. Only rows with a last name, type and certificate
/// number become accounts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub certificate_number: String,
    pub last_name: String,
    #[serde(rename = "type")]
    pub member_type: String,
    /// The money-owed column holds anything at all.
    pub money_owed: bool,
    /// The eligible-to-reserve column holds anything at all.
    pub eligible_to_reserve: bool,
}

impl Record for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Abbreviated account: identity and the two status flags.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountLite {
    pub id: String,
    pub money_owed: bool,
    pub eligible_to_reserve: bool,
}

impl Record for AccountLite {
    fn id(&self) -> &str {
        &self.id
    }
}

impl From<&Account> for AccountLite {
    fn from(a: &Account) -> Self {
        AccountLite {
            id: a.id.clone(),
            money_owed: a.money_owed,
            eligible_to_reserve: a.eligible_to_reserve,
        }
    }
}

/// A member's own account view: status flags plus any overdue breakdown.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    #[serde(flatten)]
    pub account: AccountLite,
    pub dues: Option<OverdueFee>,
}
