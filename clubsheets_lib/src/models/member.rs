//! Member records from the Members sheet.

use serde::{Deserialize, Serialize};

use super::Record;

/// Full member record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub last_name: String,
    pub certificate_number: String,
    #[serde(rename = "type")]
    pub member_type: String,
    pub salutation: String,
    pub address: String,
    pub location: String,
    pub zip: String,
    pub primary_phone: String,
    pub secondary_phone: String,
    /// Lower-cased and trimmed; "" when absent.
    pub primary_email: String,
    /// Lower-cased and trimmed; "" when absent.
    pub secondary_email: String,
    pub director_name: String,
    /// Lower-cased and trimmed; "" when absent.
    pub director_email: String,
    pub director_phone: String,
    pub family_members: String,
    pub notes: String,
    pub number_of_members: String,
}

impl Member {
    /// True if `email` matches the primary or secondary address, ignoring case.
    pub fn has_email(&self, email: &str) -> bool {
        let wanted = email.trim().to_lowercase();
        !wanted.is_empty() && (self.primary_email == wanted || self.secondary_email == wanted)
    }

    pub fn membership(&self) -> MemberType {
        MemberType::from_code(&self.member_type)
    }
}

impl Record for Member {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Abbreviated member: identity and display name only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberLite {
    pub id: String,
    pub last_name: String,
    pub certificate_number: String,
    #[serde(rename = "type")]
    pub member_type: String,
}

impl Record for MemberLite {
    fn id(&self) -> &str {
        &self.id
    }
}

impl From<&Member> for MemberLite {
    fn from(m: &Member) -> Self {
        MemberLite {
            id: m.id.clone(),
            last_name: m.last_name.clone(),
            certificate_number: m.certificate_number.clone(),
            member_type: m.member_type.clone(),
        }
    }
}

/// Membership type codes used in the type column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberType {
    /// PM
    Permanent,
    /// BD
    Board,
    /// CO
    ClubOwned,
    /// PL
    Leased,
    /// SL
    Sold,
    /// CL
    ClubOwnedLeasing,
    /// EL
    ExtendedLease,
    /// BE
    BoardExtendedLease,
    /// LE: a non-PM member leasing a PM membership.
    LeasingPermanent,
    /// Any code the club has not defined.
    Other(String),
}

impl MemberType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "PM" => MemberType::Permanent,
            "BD" => MemberType::Board,
            "CO" => MemberType::ClubOwned,
            "PL" => MemberType::Leased,
            "SL" => MemberType::Sold,
            "CL" => MemberType::ClubOwnedLeasing,
            "EL" => MemberType::ExtendedLease,
            "BE" => MemberType::BoardExtendedLease,
            "LE" => MemberType::LeasingPermanent,
            other => MemberType::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            MemberType::Permanent => "PM",
            MemberType::Board => "BD",
            MemberType::ClubOwned => "CO",
            MemberType::Leased => "PL",
            MemberType::Sold => "SL",
            MemberType::ClubOwnedLeasing => "CL",
            MemberType::ExtendedLease => "EL",
            MemberType::BoardExtendedLease => "BE",
            MemberType::LeasingPermanent => "LE",
            MemberType::Other(code) => code,
        }
    }

    /// Human-readable name; unknown codes come back as given.
    pub fn label(&self) -> &str {
        match self {
            MemberType::Permanent => "Permanent",
            MemberType::Board => "Board",
            MemberType::ClubOwned => "Club owned",
            MemberType::Leased => "Leased",
            MemberType::Sold => "Sold",
            MemberType::ClubOwnedLeasing => "Club owned, leasing",
            MemberType::ExtendedLease => "Extended lease",
            MemberType::BoardExtendedLease => "Board, extended lease",
            MemberType::LeasingPermanent => "Leasing permanent",
            MemberType::Other(code) => code,
        }
    }
}

impl std::fmt::Display for MemberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_type_codes_round_trip() {
        for code in ["PM", "BD", "CO", "PL", "SL", "CL", "EL", "BE", "LE"] {
            assert_eq!(MemberType::from_code(code).code(), code);
        }
        assert_eq!(MemberType::from_code("ZZ"), MemberType::Other("ZZ".to_string()));
    }

    #[test]
    fn labels() {
        assert_eq!(MemberType::LeasingPermanent.label(), "Leasing permanent");
        assert_eq!(MemberType::from_code(" BD ").label(), "Board");
        assert_eq!(MemberType::from_code("ZZ").label(), "ZZ");
    }

    #[test]
    fn serializes_with_camel_case_and_type_key() {
        let lite = MemberLite {
            id: "1023PM".to_string(),
            last_name: "Smith".to_string(),
            certificate_number: "1023".to_string(),
            member_type: "PM".to_string(),
        };
        let json = serde_json::to_value(&lite).unwrap();
        assert_eq!(json["lastName"], "Smith");
        assert_eq!(json["type"], "PM");
        assert_eq!(json["certificateNumber"], "1023");
    }
}
