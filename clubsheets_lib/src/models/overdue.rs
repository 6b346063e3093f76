//! Overdue fee records from the Over-Due sheet.

use serde::{Deserialize, Serialize};

use super::Record;

/// Display names of the fee categories, in the order they are shown.
pub const FEE_CATEGORIES: [&str; 9] = [
    "Membership Dues",
    "Unpaid Carryover",
    "Startup Fee",
    "Late Fee",
    "Nanny Fee",
    "Guest Fee",
    "Workday Fee",
    "Assessment Fee",
    "Equity Share",
];

/// One named amount in a fee breakdown. Amounts are kept as the sheet
/// formats them (e.g. "$1,200.00").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeeLine {
    pub name: String,
    pub amount: String,
}

/// What a member owes, with a fixed-order breakdown by category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OverdueFee {
    pub id: String,
    pub certificate_number: String,
    pub total_owed: String,
    /// Always the nine categories of [`FEE_CATEGORIES`], in that order.
    pub dues: Vec<FeeLine>,
}

impl OverdueFee {
    /// Amount for a category by display name.
    pub fn amount_for(&self, category: &str) -> Option<&str> {
        self.dues
            .iter()
            .find(|line| line.name == category)
            .map(|line| line.amount.as_str())
    }
}

impl Record for OverdueFee {
    fn id(&self) -> &str {
        &self.id
    }
}
