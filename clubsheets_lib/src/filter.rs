//! Member/account cross-reference.
//!
//! Joins are plain map lookups on the composite id. Inputs are borrowed and
//! never modified; filtered output is a new collection.

use std::collections::BTreeMap;

use crate::models::{Account, AccountLite, Record};
use crate::projector::{Keyed, Listing};

/// The two account facts the joins consult.
pub trait AccountView: Record {
    fn eligible_to_reserve(&self) -> bool;
}

impl AccountView for Account {
    fn eligible_to_reserve(&self) -> bool {
        self.eligible_to_reserve
    }
}

impl AccountView for AccountLite {
    fn eligible_to_reserve(&self) -> bool {
        self.eligible_to_reserve
    }
}

/// Accounts indexed by id, in either projection.
pub trait AccountIndex {
    fn has_account(&self, id: &str) -> bool;

    /// True only when an account exists for `id` and may reserve.
    fn may_reserve(&self, id: &str) -> bool;
}

impl<A: AccountView> AccountIndex for BTreeMap<String, A> {
    fn has_account(&self, id: &str) -> bool {
        self.contains_key(id)
    }

    fn may_reserve(&self, id: &str) -> bool {
        self.get(id).is_some_and(AccountView::eligible_to_reserve)
    }
}

impl AccountIndex for Keyed<Account, AccountLite> {
    fn has_account(&self, id: &str) -> bool {
        self.contains_id(id)
    }

    fn may_reserve(&self, id: &str) -> bool {
        match self {
            Keyed::Full(map) => map.may_reserve(id),
            Keyed::Lite(map) => map.may_reserve(id),
        }
    }
}

/// A collection of records that can be narrowed by id without being
/// modified.
pub trait MemberCollection: Sized {
    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self;
}

impl<M: Record + Clone> MemberCollection for Vec<M> {
    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        self.iter().filter(|m| keep(m.id())).cloned().collect()
    }
}

impl<M: Clone> MemberCollection for BTreeMap<String, M> {
    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        self.iter()
            .filter(|(id, _)| keep(id))
            .map(|(id, m)| (id.clone(), m.clone()))
            .collect()
    }
}

impl<F: Record + Clone, L: Record + Clone> MemberCollection for Listing<F, L> {
    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        self.clone().retain_ids(keep)
    }
}

impl<F: Record + Clone, L: Record + Clone> MemberCollection for Keyed<F, L> {
    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        self.clone().retain_ids(keep)
    }
}

/// Members that have an account, whatever its state.
pub fn members_with_account<C, I>(members: &C, accounts: &I) -> C
where
    C: MemberCollection,
    I: AccountIndex + ?Sized,
{
    members.filtered(|id| accounts.has_account(id))
}

/// Members whose account is eligible to reserve.
pub fn eligible_members<C, I>(members: &C, accounts: &I) -> C
where
    C: MemberCollection,
    I: AccountIndex + ?Sized,
{
    members.filtered(|id| accounts.may_reserve(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberLite;
    use crate::projector::index_by_id;

    fn member(cert: &str, ty: &str, name: &str) -> MemberLite {
        MemberLite {
            id: format!("{cert}{ty}"),
            last_name: name.to_string(),
            certificate_number: cert.to_string(),
            member_type: ty.to_string(),
        }
    }

    fn account(id: &str, eligible: bool) -> Account {
        Account {
            id: id.to_string(),
            certificate_number: id.trim_end_matches(char::is_alphabetic).to_string(),
            last_name: "X".to_string(),
            member_type: id.trim_start_matches(char::is_numeric).to_string(),
            money_owed: false,
            eligible_to_reserve: eligible,
        }
    }

    fn fixture() -> (Vec<MemberLite>, BTreeMap<String, Account>) {
        let members = vec![
            member("1", "PM", "Able"),
            member("2", "PM", "Baker"),
            member("3", "BD", "Cole"),
        ];
        let accounts = index_by_id(vec![account("1PM", true), account("3BD", false)]);
        (members, accounts)
    }

    #[test]
    fn with_account_ignores_eligibility() {
        let (members, accounts) = fixture();
        let kept = members_with_account(&members, &accounts);
        let ids: Vec<&str> = kept.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1PM", "3BD"]);
    }

    #[test]
    fn eligible_requires_flag() {
        let (members, accounts) = fixture();
        let kept = eligible_members(&members, &accounts);
        let ids: Vec<&str> = kept.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1PM"]);
    }

    #[test]
    fn lite_accounts_answer_the_same() {
        let (members, accounts) = fixture();
        let lite: BTreeMap<String, AccountLite> = accounts
            .iter()
            .map(|(id, a)| (id.clone(), AccountLite::from(a)))
            .collect();
        assert_eq!(
            eligible_members(&members, &lite),
            eligible_members(&members, &accounts)
        );
        assert_eq!(
            members_with_account(&members, &lite),
            members_with_account(&members, &accounts)
        );

        let keyed: Keyed<Account, AccountLite> = Keyed::Lite(lite);
        assert_eq!(eligible_members(&members, &keyed).len(), 1);
        assert_eq!(members_with_account(&members, &keyed).len(), 2);
    }

    #[test]
    fn inputs_are_untouched() {
        let (members, accounts) = fixture();
        let before_members = members.clone();
        let before_accounts = accounts.clone();
        let _ = eligible_members(&members, &accounts);
        let _ = members_with_account(&members, &accounts);
        assert_eq!(members, before_members);
        assert_eq!(accounts, before_accounts);
    }

    #[test]
    fn keyed_members_filter_by_key() {
        let (members, accounts) = fixture();
        let keyed = index_by_id(members);
        assert_eq!(members_with_account(&keyed, &accounts).len(), 2);
        let eligible = eligible_members(&keyed, &accounts);
        assert_eq!(eligible.keys().collect::<Vec<_>>(), vec!["1PM"]);
        assert_eq!(keyed.len(), 3);
    }

    #[test]
    fn projections_filter_in_their_own_shape() {
        let (members, accounts) = fixture();
        let listing: Listing<crate::models::Member, MemberLite> = Listing::Lite(members.clone());
        let kept = eligible_members(&listing, &accounts);
        assert_eq!(kept.ids(), vec!["1PM"]);
        assert_eq!(listing.len(), 3);

        let keyed: Keyed<crate::models::Member, MemberLite> = Keyed::Lite(index_by_id(members));
        let kept = members_with_account(&keyed, &accounts);
        assert!(kept.contains_id("3BD"));
        assert!(!kept.contains_id("2PM"));
    }

    #[test]
    fn no_accounts_means_no_members() {
        let (members, _) = fixture();
        let empty: BTreeMap<String, Account> = BTreeMap::new();
        assert!(members_with_account(&members, &empty).is_empty());
        assert!(eligible_members(&members, &empty).is_empty());
    }
}
