//! Row-to-record mapping for each sheet.
//!
//! Every function here is pure: the same row always maps to the same
//! record. Rows may be shorter than the schema (the API drops trailing
//! empty cells); a missing cell reads as "".

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::MappingAnomaly;
use crate::models::{
    composite_id, Account, AccountLite, FeeLine, Member, MemberLite, OverdueFee, SignIn,
    SignInLite, FEE_CATEGORIES,
};
use crate::schema::{account, member, overdue, sign_in};

/// Cell at `idx`, or "" past the end of a short row.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn owned(row: &[String], idx: usize) -> String {
    cell(row, idx).to_string()
}

/// Lower-cases and trims an email; "" stays "".
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Flag columns count as set when they hold anything at all.
fn flag(row: &[String], idx: usize) -> bool {
    !cell(row, idx).is_empty()
}

/// Trimmed, non-empty, and parses as a finite number ("42", " 1023 ", "3.5").
pub fn parses_as_number(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

// -- Members --

pub fn map_member(row: &[String]) -> Member {
    Member {
        id: composite_id(
            cell(row, member::CERTIFICATE_NUMBER),
            cell(row, member::TYPE),
        ),
        last_name: owned(row, member::LAST_NAME),
        certificate_number: owned(row, member::CERTIFICATE_NUMBER),
        member_type: owned(row, member::TYPE),
        salutation: owned(row, member::SALUTATION),
        address: owned(row, member::ADDRESS),
        location: owned(row, member::LOCATION),
        zip: owned(row, member::ZIP),
        primary_phone: owned(row, member::PRIMARY_PHONE),
        secondary_phone: owned(row, member::SECONDARY_PHONE),
        primary_email: normalize_email(cell(row, member::PRIMARY_EMAIL)),
        secondary_email: normalize_email(cell(row, member::SECONDARY_EMAIL)),
        director_name: owned(row, member::DIRECTOR_NAME),
        director_email: normalize_email(cell(row, member::DIRECTOR_EMAIL)),
        director_phone: owned(row, member::DIRECTOR_PHONE),
        family_members: owned(row, member::FAMILY_MEMBERS),
        notes: owned(row, member::NOTES),
        number_of_members: owned(row, member::NUMBER_OF_MEMBERS),
    }
}

pub fn map_member_lite(row: &[String]) -> MemberLite {
    MemberLite {
        id: composite_id(
            cell(row, member::CERTIFICATE_NUMBER),
            cell(row, member::TYPE),
        ),
        last_name: owned(row, member::LAST_NAME),
        certificate_number: owned(row, member::CERTIFICATE_NUMBER),
        member_type: owned(row, member::TYPE),
    }
}

// -- Accounts --

/// Maps an account row without the acceptability check.
pub fn map_account(row: &[String]) -> Account {
    Account {
        id: composite_id(
            cell(row, account::CERTIFICATE_NUMBER),
            cell(row, account::TYPE),
        ),
        certificate_number: owned(row, account::CERTIFICATE_NUMBER),
        last_name: owned(row, account::LAST_NAME),
        member_type: owned(row, account::TYPE),
        money_owed: flag(row, account::MONEY_OWED),
        eligible_to_reserve: flag(row, account::ELIGIBLE_TO_RESERVE),
    }
}

/// An account needs a last name, a type, and a certificate number.
pub fn check_account(row_idx: usize, acct: &Account) -> Result<(), MappingAnomaly> {
    let missing = if acct.last_name.is_empty() {
        Some("lastName")
    } else if acct.member_type.is_empty() {
        Some("type")
    } else if acct.certificate_number.is_empty() {
        Some("certificateNumber")
    } else {
        None
    };
    match missing {
        Some(field) => Err(MappingAnomaly::MissingAccountField {
            row: row_idx,
            field,
        }),
        None => Ok(()),
    }
}

/// Maps and checks an account row; unacceptable rows yield `None`.
pub fn accept_account(row_idx: usize, row: &[String]) -> Option<Account> {
    let acct = map_account(row);
    match check_account(row_idx, &acct) {
        Ok(()) => Some(acct),
        Err(anomaly) => {
            tracing::trace!("dropping row: {}", anomaly);
            None
        }
    }
}

pub fn accept_account_lite(row_idx: usize, row: &[String]) -> Option<AccountLite> {
    accept_account(row_idx, row).map(|acct| AccountLite::from(&acct))
}

// -- Overdue --

pub fn map_overdue(row: &[String]) -> OverdueFee {
    let amounts = [
        overdue::MEMBERSHIP_DUES,
        overdue::UNPAID_CARRYOVER,
        overdue::STARTUP_FEE,
        overdue::LATE_FEE,
        overdue::NANNY_FEE,
        overdue::GUEST_FEE,
        overdue::WORKDAY_FEE,
        overdue::ASSESSMENT_FEE,
        overdue::EQUITY_SHARE,
    ];
    let dues = FEE_CATEGORIES
        .iter()
        .zip(amounts)
        .map(|(name, idx)| FeeLine {
            name: name.to_string(),
            amount: owned(row, idx),
        })
        .collect();

    OverdueFee {
        id: composite_id(
            cell(row, overdue::CERTIFICATE_NUMBER),
            cell(row, overdue::MEMBERSHIP_TYPE),
        ),
        certificate_number: owned(row, overdue::CERTIFICATE_NUMBER),
        total_owed: owned(row, overdue::TOTAL_OWED),
        dues,
    }
}

/// Guards against rows that slid sideways in the sheet: the last name must
/// be present and not a number, and the certificate number must be one.
pub fn check_overdue(row_idx: usize, row: &[String]) -> Result<(), MappingAnomaly> {
    let last_name = cell(row, overdue::LAST_NAME);
    let certificate_number = cell(row, overdue::CERTIFICATE_NUMBER);
    if !last_name.is_empty() && !parses_as_number(last_name) && parses_as_number(certificate_number)
    {
        Ok(())
    } else {
        Err(MappingAnomaly::ShiftedOverdueRow {
            row: row_idx,
            last_name: last_name.to_string(),
            certificate_number: certificate_number.to_string(),
        })
    }
}

pub fn overdue_acceptable(row: &[String]) -> bool {
    check_overdue(0, row).is_ok()
}

pub fn accept_overdue(row_idx: usize, row: &[String]) -> Option<OverdueFee> {
    match check_overdue(row_idx, row) {
        Ok(()) => Some(map_overdue(row)),
        Err(anomaly) => {
            tracing::trace!("dropping row: {}", anomaly);
            None
        }
    }
}

// -- Sign-ins --

pub fn map_sign_in(row: &[String]) -> SignIn {
    SignIn {
        id: composite_id(
            cell(row, sign_in::CERTIFICATE_NUMBER),
            cell(row, sign_in::TYPE),
        ),
        timestamp: parse_timestamp(cell(row, sign_in::TIMESTAMP)),
        last_name: owned(row, sign_in::LAST_NAME),
        member_type: owned(row, sign_in::TYPE),
        dropped_off_kids: owned(row, sign_in::DROPPED_OFF_KIDS),
        family_members: owned(row, sign_in::FAMILY_MEMBERS),
        number_of_members: owned(row, sign_in::NUMBER_OF_MEMBERS),
        number_of_guests: owned(row, sign_in::NUMBER_OF_GUESTS),
        primary_phone: owned(row, sign_in::PRIMARY_PHONE),
        secondary_phone: owned(row, sign_in::SECONDARY_PHONE),
        primary_email: normalize_email(cell(row, sign_in::PRIMARY_EMAIL)),
        secondary_email: normalize_email(cell(row, sign_in::SECONDARY_EMAIL)),
    }
}

pub fn map_sign_in_lite(row: &[String]) -> SignInLite {
    SignInLite {
        id: composite_id(
            cell(row, sign_in::CERTIFICATE_NUMBER),
            cell(row, sign_in::TYPE),
        ),
        timestamp: parse_timestamp(cell(row, sign_in::TIMESTAMP)),
        number_of_members: owned(row, sign_in::NUMBER_OF_MEMBERS),
        number_of_guests: owned(row, sign_in::NUMBER_OF_GUESTS),
        dropped_off_kids: owned(row, sign_in::DROPPED_OFF_KIDS),
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Parses a form timestamp. Form responses arrive as "3/14/2021 10:22:33";
/// RFC 3339 and ISO dates are accepted too. Anything else is `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
