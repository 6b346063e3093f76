//! Output shapes: {full, lite} x {ordered list, map keyed by id}.
//!
//! Lists keep the sheet's row order. Keyed maps are built from the list, so
//! when two rows share an id the later row wins.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::mapper;
use crate::models::{Account, AccountLite, Member, MemberLite, OverdueFee, Record, SignIn, SignInLite};

/// How one sheet's rows become full and abbreviated records. Either mapping
/// may decline a row, which drops it from the output.
pub trait Projection {
    type Full: Record;
    type Lite: Record;

    fn full(row_idx: usize, row: &[String]) -> Option<Self::Full>;
    fn lite(row_idx: usize, row: &[String]) -> Option<Self::Lite>;
}

pub struct MemberProjection;

impl Projection for MemberProjection {
    type Full = Member;
    type Lite = MemberLite;

    fn full(_: usize, row: &[String]) -> Option<Member> {
        Some(mapper::map_member(row))
    }

    fn lite(_: usize, row: &[String]) -> Option<MemberLite> {
        Some(mapper::map_member_lite(row))
    }
}

pub struct AccountProjection;

impl Projection for AccountProjection {
    type Full = Account;
    type Lite = AccountLite;

    fn full(row_idx: usize, row: &[String]) -> Option<Account> {
        mapper::accept_account(row_idx, row)
    }

    fn lite(row_idx: usize, row: &[String]) -> Option<AccountLite> {
        mapper::accept_account_lite(row_idx, row)
    }
}

/// Overdue records have no abbreviated form.
pub struct OverdueProjection;

impl Projection for OverdueProjection {
    type Full = OverdueFee;
    type Lite = OverdueFee;

    fn full(row_idx: usize, row: &[String]) -> Option<OverdueFee> {
        mapper::accept_overdue(row_idx, row)
    }

    fn lite(row_idx: usize, row: &[String]) -> Option<OverdueFee> {
        mapper::accept_overdue(row_idx, row)
    }
}

pub struct SignInProjection;

impl Projection for SignInProjection {
    type Full = SignIn;
    type Lite = SignInLite;

    fn full(_: usize, row: &[String]) -> Option<SignIn> {
        Some(mapper::map_sign_in(row))
    }

    fn lite(_: usize, row: &[String]) -> Option<SignInLite> {
        Some(mapper::map_sign_in_lite(row))
    }
}

/// Records in sheet order, full or abbreviated.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Listing<F, L> {
    Full(Vec<F>),
    Lite(Vec<L>),
}

/// Records keyed by composite id, full or abbreviated.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Keyed<F, L> {
    Full(BTreeMap<String, F>),
    Lite(BTreeMap<String, L>),
}

pub fn full_list<P: Projection>(rows: &[Vec<String>]) -> Vec<P::Full> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| P::full(idx, row))
        .collect()
}

pub fn lite_list<P: Projection>(rows: &[Vec<String>]) -> Vec<P::Lite> {
    rows.iter()
        .enumerate()
        .filter_map(|(idx, row)| P::lite(idx, row))
        .collect()
}

pub fn list<P: Projection>(rows: &[Vec<String>], lite: bool) -> Listing<P::Full, P::Lite> {
    if lite {
        Listing::Lite(lite_list::<P>(rows))
    } else {
        Listing::Full(full_list::<P>(rows))
    }
}

pub fn keyed<P: Projection>(rows: &[Vec<String>], lite: bool) -> Keyed<P::Full, P::Lite> {
    list::<P>(rows, lite).into()
}

/// Indexes records by id in order; a later record replaces an earlier one.
pub fn index_by_id<T: Record>(records: Vec<T>) -> BTreeMap<String, T> {
    let mut map = BTreeMap::new();
    for record in records {
        map.insert(record.id().to_string(), record);
    }
    map
}

impl<F: Record, L: Record> From<Listing<F, L>> for Keyed<F, L> {
    fn from(listing: Listing<F, L>) -> Self {
        match listing {
            Listing::Full(items) => Keyed::Full(index_by_id(items)),
            Listing::Lite(items) => Keyed::Lite(index_by_id(items)),
        }
    }
}

impl<F: Record, L: Record> Listing<F, L> {
    pub fn len(&self) -> usize {
        match self {
            Listing::Full(items) => items.len(),
            Listing::Lite(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Listing::Full(items) => items.iter().map(Record::id).collect(),
            Listing::Lite(items) => items.iter().map(Record::id).collect(),
        }
    }

    /// Keeps the records whose id passes `keep`, preserving order.
    pub fn retain_ids(self, keep: impl Fn(&str) -> bool) -> Self {
        match self {
            Listing::Full(mut items) => {
                items.retain(|r| keep(r.id()));
                Listing::Full(items)
            }
            Listing::Lite(mut items) => {
                items.retain(|r| keep(r.id()));
                Listing::Lite(items)
            }
        }
    }
}

impl<F: Record, L: Record> Keyed<F, L> {
    pub fn len(&self) -> usize {
        match self {
            Keyed::Full(map) => map.len(),
            Keyed::Lite(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_id(&self, id: &str) -> bool {
        match self {
            Keyed::Full(map) => map.contains_key(id),
            Keyed::Lite(map) => map.contains_key(id),
        }
    }

    /// Keeps the entries whose key passes `keep`.
    pub fn retain_ids(self, keep: impl Fn(&str) -> bool) -> Self {
        match self {
            Keyed::Full(mut map) => {
                map.retain(|id, _| keep(id));
                Keyed::Full(map)
            }
            Keyed::Lite(mut map) => {
                map.retain(|id, _| keep(id));
                Keyed::Lite(map)
            }
        }
    }
}
