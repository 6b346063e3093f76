//! Fixed column layouts for each sheet.
//!
//! The sheets have no header contract, so every field lives at a known,
//! zero-based offset from the first column of the configured range. The
//! per-dataset modules hold the offsets the mappers read; the
//! [`ColumnSchema`] tables describe the same layout as data so it can be
//! checked against a range once, when the service is built.

use crate::error::ClubSheetsError;

/// Column offsets in the Members sheet.
pub mod member {
    pub const LAST_NAME: usize = 0;
    pub const CERTIFICATE_NUMBER: usize = 1;
    pub const TYPE: usize = 2;
    pub const SALUTATION: usize = 3;
    pub const ADDRESS: usize = 4;
    pub const LOCATION: usize = 5;
    pub const ZIP: usize = 6;
    pub const PRIMARY_PHONE: usize = 7;
    pub const SECONDARY_PHONE: usize = 8;
    pub const PRIMARY_EMAIL: usize = 9;
    pub const SECONDARY_EMAIL: usize = 10;
    pub const DIRECTOR_NAME: usize = 11;
    pub const DIRECTOR_EMAIL: usize = 12;
    pub const DIRECTOR_PHONE: usize = 13;
    pub const FAMILY_MEMBERS: usize = 14;
    pub const NOTES: usize = 15;
    pub const NUMBER_OF_MEMBERS: usize = 16;
    /// Present in the sheet but superseded by the Accounts sheet.
    pub const OWES_MONEY: usize = 17;
}

/// Column offsets in the Accounts sheet.
pub mod account {
    pub const CERTIFICATE_NUMBER: usize = 0;
    pub const LAST_NAME: usize = 1;
    pub const TYPE: usize = 2;
    pub const MONEY_OWED: usize = 41;
    pub const ELIGIBLE_TO_RESERVE: usize = 43;
}

/// Column offsets in the Over-Due sheet.
pub mod overdue {
    pub const LAST_NAME: usize = 0;
    pub const CERTIFICATE_NUMBER: usize = 2;
    pub const TOTAL_OWED: usize = 4;
    pub const STARTUP_FEE: usize = 5;
    pub const EQUITY_SHARE: usize = 6;
    pub const UNPAID_CARRYOVER: usize = 7;
    pub const MEMBERSHIP_DUES: usize = 8;
    pub const LATE_FEE: usize = 9;
    pub const WORKDAY_FEE: usize = 10;
    pub const GUEST_FEE: usize = 11;
    pub const NANNY_FEE: usize = 12;
    pub const ASSESSMENT_FEE: usize = 13;
    pub const MEMBERSHIP_TYPE: usize = 17;
}

/// Column offsets in the SignIn sheet.
pub mod sign_in {
    pub const TIMESTAMP: usize = 0;
    pub const LAST_NAME: usize = 1;
    pub const CERTIFICATE_NUMBER: usize = 2;
    pub const NUMBER_OF_MEMBERS: usize = 3;
    pub const NUMBER_OF_GUESTS: usize = 4;
    pub const DROPPED_OFF_KIDS: usize = 5;
    pub const FAMILY_MEMBERS: usize = 6;
    pub const TYPE: usize = 7;
    pub const PRIMARY_PHONE: usize = 8;
    pub const PRIMARY_EMAIL: usize = 9;
    pub const SECONDARY_PHONE: usize = 10;
    pub const SECONDARY_EMAIL: usize = 11;
}

/// A named field-to-column table for one sheet.
#[derive(Debug)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub columns: &'static [(&'static str, usize)],
}

pub static MEMBER_SCHEMA: ColumnSchema = ColumnSchema {
    name: "members",
    columns: &[
        ("lastName", member::LAST_NAME),
        ("certificateNumber", member::CERTIFICATE_NUMBER),
        ("type", member::TYPE),
        ("salutation", member::SALUTATION),
        ("address", member::ADDRESS),
        ("location", member::LOCATION),
        ("zip", member::ZIP),
        ("primaryPhone", member::PRIMARY_PHONE),
        ("secondaryPhone", member::SECONDARY_PHONE),
        ("primaryEmail", member::PRIMARY_EMAIL),
        ("secondaryEmail", member::SECONDARY_EMAIL),
        ("directorName", member::DIRECTOR_NAME),
        ("directorEmail", member::DIRECTOR_EMAIL),
        ("directorPhone", member::DIRECTOR_PHONE),
        ("familyMembers", member::FAMILY_MEMBERS),
        ("notes", member::NOTES),
        ("numberOfMembers", member::NUMBER_OF_MEMBERS),
        ("owesMoney", member::OWES_MONEY),
    ],
};

pub static ACCOUNT_SCHEMA: ColumnSchema = ColumnSchema {
    name: "accounts",
    columns: &[
        ("certificateNumber", account::CERTIFICATE_NUMBER),
        ("lastName", account::LAST_NAME),
        ("type", account::TYPE),
        ("moneyOwed", account::MONEY_OWED),
        ("eligibleToReserve", account::ELIGIBLE_TO_RESERVE),
    ],
};

pub static OVERDUE_SCHEMA: ColumnSchema = ColumnSchema {
    name: "overdue",
    columns: &[
        ("lastName", overdue::LAST_NAME),
        ("certificateNumber", overdue::CERTIFICATE_NUMBER),
        ("totalOwed", overdue::TOTAL_OWED),
        ("startupFee", overdue::STARTUP_FEE),
        ("equityShare", overdue::EQUITY_SHARE),
        ("unpaidCarryover", overdue::UNPAID_CARRYOVER),
        ("membershipDues", overdue::MEMBERSHIP_DUES),
        ("lateFee", overdue::LATE_FEE),
        ("workdayFee", overdue::WORKDAY_FEE),
        ("guestFee", overdue::GUEST_FEE),
        ("nannyFee", overdue::NANNY_FEE),
        ("assessmentFee", overdue::ASSESSMENT_FEE),
        ("membershipType", overdue::MEMBERSHIP_TYPE),
    ],
};

pub static SIGN_IN_SCHEMA: ColumnSchema = ColumnSchema {
    name: "signins",
    columns: &[
        ("timestamp", sign_in::TIMESTAMP),
        ("lastName", sign_in::LAST_NAME),
        ("certificateNumber", sign_in::CERTIFICATE_NUMBER),
        ("numberOfMembers", sign_in::NUMBER_OF_MEMBERS),
        ("numberOfGuests", sign_in::NUMBER_OF_GUESTS),
        ("droppedOffKids", sign_in::DROPPED_OFF_KIDS),
        ("familyMembers", sign_in::FAMILY_MEMBERS),
        ("type", sign_in::TYPE),
        ("primaryPhone", sign_in::PRIMARY_PHONE),
        ("primaryEmail", sign_in::PRIMARY_EMAIL),
        ("secondaryPhone", sign_in::SECONDARY_PHONE),
        ("secondaryEmail", sign_in::SECONDARY_EMAIL),
    ],
};

impl ColumnSchema {
    /// Column offset of a named field.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, idx)| *idx)
    }

    /// Narrowest row that holds every field of this schema.
    pub fn min_width(&self) -> usize {
        self.columns.iter().map(|(_, idx)| idx + 1).max().unwrap_or(0)
    }

    /// Checks that every column falls inside `range`. Ranges without an end
    /// column (a bare sheet name, or row-only bounds) are unbounded and pass.
    pub fn validate(&self, range: &str) -> Result<(), ClubSheetsError> {
        let Some(width) = range_width(range)? else {
            return Ok(());
        };
        if self.min_width() > width {
            let (field, idx) = self
                .columns
                .iter()
                .max_by_key(|(_, idx)| *idx)
                .copied()
                .unwrap_or(("", 0));
            return Err(ClubSheetsError::Config(format!(
                "{} schema needs {} columns (field '{}' at offset {}) but range '{}' is {} wide",
                self.name,
                self.min_width(),
                field,
                idx,
                range,
                width
            )));
        }
        Ok(())
    }
}

/// Number of columns an A1 range spans, e.g. `Members!A2:S` is 19 wide.
/// Returns `Ok(None)` when the range has no right-hand column bound.
pub fn range_width(range: &str) -> Result<Option<usize>, ClubSheetsError> {
    let cells = match range.rfind('!') {
        Some(pos) => &range[pos + 1..],
        None => range,
    };
    let Some((start, end)) = cells.split_once(':') else {
        return Ok(None);
    };
    let (Some(first), Some(last)) = (column_number(start, range)?, column_number(end, range)?)
    else {
        return Ok(None);
    };
    if last < first {
        return Err(ClubSheetsError::Config(format!(
            "range '{}' ends before it starts",
            range
        )));
    }
    Ok(Some(last - first + 1))
}

/// 1-based column number of the letter prefix of an A1 cell ("AR4" -> 44).
fn column_number(cell: &str, range: &str) -> Result<Option<usize>, ClubSheetsError> {
    let letters: String = cell
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return Ok(None);
    }
    letters
        .chars()
        .try_fold(0usize, |acc, c| {
            acc.checked_mul(26)?
                .checked_add(c.to_ascii_uppercase() as usize - 'A' as usize + 1)
        })
        .map(Some)
        .ok_or_else(|| {
            ClubSheetsError::Config(format!(
                "column '{}' in range '{}' is out of bounds",
                letters, range
            ))
        })
}
