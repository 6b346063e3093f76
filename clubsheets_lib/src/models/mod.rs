//! Typed records mapped from sheet rows.
//!
//! Every record is keyed by its composite id: certificate number and
//! membership type concatenated ("1023" + "PM" = "1023PM"). The id is the
//! join key across all four sheets and is never parsed back apart.

mod account;
pub use self::account::{Account, AccountLite, AccountSummary};

mod member;
pub use self::member::{Member, MemberLite, MemberType};

mod overdue;
pub use self::overdue::{FeeLine, OverdueFee, FEE_CATEGORIES};

mod sign_in;
pub use self::sign_in::{SignIn, SignInLite};

/// A record with a composite identifier.
pub trait Record {
    fn id(&self) -> &str;
}

/// Builds the composite identifier shared by all sheets.
pub fn composite_id(certificate_number: &str, membership_type: &str) -> String {
    let mut id = String::with_capacity(certificate_number.len() + membership_type.len());
    id.push_str(certificate_number);
    id.push_str(membership_type);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_id_is_plain_concatenation() {
        assert_eq!(composite_id("1023", "PM"), "1023PM");
        assert_eq!(composite_id("", "PM"), "PM");
        assert_eq!(composite_id("1023", ""), "1023");
    }
}
