//! The query surface: fetch, map, join, and project per call.

use std::collections::BTreeMap;
use std::sync::Arc;

use sheets_api::Client;

use crate::cache::RangeCache;
use crate::config::SheetsConfig;
use crate::dataset::Dataset;
use crate::error::{ClubSheetsError, UpstreamError};
use crate::fetcher::RawDatasetFetcher;
use crate::filter;
use crate::models::{
    Account, AccountLite, AccountSummary, Member, MemberLite, OverdueFee, Record, SignIn,
    SignInLite,
};
use crate::projector::{
    self, AccountProjection, Keyed, Listing, MemberProjection, OverdueProjection,
    SignInProjection,
};
use crate::source::{RowSource, Rows, SheetsRowSource};

/// Result of looking a member up by email address.
#[derive(Debug, Clone, PartialEq)]
pub enum EmailMatch {
    Unique(Member),
    NotFound,
    /// More than one member lists the address; their ids in sheet order.
    Ambiguous(Vec<String>),
}

/// How one dataset fared in [`ClubData::prefetch`].
#[derive(Debug, Clone)]
pub struct PrefetchOutcome {
    pub dataset: Dataset,
    /// Row count on success.
    pub result: Result<usize, UpstreamError>,
}

/// Read-only, cached view over the club spreadsheet.
///
/// Holds one [`RawDatasetFetcher`] per dataset, all sharing one
/// [`RangeCache`]. Records are recomputed from the cached rows on every
/// call; only the raw rows are shared between calls.
pub struct ClubData<S> {
    cache: Arc<RangeCache>,
    members: RawDatasetFetcher<S>,
    accounts: RawDatasetFetcher<S>,
    overdue: RawDatasetFetcher<S>,
    sign_ins: RawDatasetFetcher<S>,
}

impl ClubData<SheetsRowSource> {
    /// Builds the production stack: spreadsheet client, retrying row
    /// source, and a fresh cache.
    pub fn from_config(config: &SheetsConfig) -> Result<Self, ClubSheetsError> {
        config.validate()?;
        let client = match &config.base_url {
            Some(base) => Client::with_base_url(base, &config.spreadsheet_id, &config.api_key),
            None => Client::new(&config.spreadsheet_id, &config.api_key),
        }
        .map_err(|e| ClubSheetsError::Config(format!("cannot build HTTP client: {}", e)))?;
        Self::new(config, Arc::new(SheetsRowSource::new(client)))
    }
}

impl<S: RowSource + 'static> ClubData<S> {
    /// Wires the fetchers over `source` with a fresh cache. Fails if any
    /// dataset's range is too narrow for its column schema.
    pub fn new(config: &SheetsConfig, source: Arc<S>) -> Result<Self, ClubSheetsError> {
        Self::with_cache(config, source, Arc::new(RangeCache::new()))
    }

    pub fn with_cache(
        config: &SheetsConfig,
        source: Arc<S>,
        cache: Arc<RangeCache>,
    ) -> Result<Self, ClubSheetsError> {
        config.validate_datasets()?;
        let build = |dataset: Dataset| {
            RawDatasetFetcher::new(
                dataset,
                config.settings(dataset),
                Arc::clone(&source),
                Arc::clone(&cache),
            )
            .with_timeout(config.fetch_timeout)
            .with_single_flight(config.single_flight)
        };
        Ok(Self {
            members: build(Dataset::Members),
            accounts: build(Dataset::Accounts),
            overdue: build(Dataset::Overdue),
            sign_ins: build(Dataset::SignIns),
            cache,
        })
    }

    pub fn fetcher(&self, dataset: Dataset) -> &RawDatasetFetcher<S> {
        match dataset {
            Dataset::Members => &self.members,
            Dataset::Accounts => &self.accounts,
            Dataset::Overdue => &self.overdue,
            Dataset::SignIns => &self.sign_ins,
        }
    }

    // -- Members --

    /// Members that have an account, in sheet order.
    pub async fn members(&self, lite: bool) -> Result<Listing<Member, MemberLite>, UpstreamError> {
        let (members, accounts) = self.members_and_accounts().await?;
        let members = projector::list::<MemberProjection>(&members, lite);
        Ok(filter::members_with_account(&members, &accounts))
    }

    pub async fn members_keyed(
        &self,
        lite: bool,
    ) -> Result<Keyed<Member, MemberLite>, UpstreamError> {
        let (members, accounts) = self.members_and_accounts().await?;
        let members = projector::keyed::<MemberProjection>(&members, lite);
        Ok(filter::members_with_account(&members, &accounts))
    }

    /// Members whose account is eligible to reserve, in sheet order.
    pub async fn paid_members(
        &self,
        lite: bool,
    ) -> Result<Listing<Member, MemberLite>, UpstreamError> {
        let (members, accounts) = self.members_and_accounts().await?;
        let members = projector::list::<MemberProjection>(&members, lite);
        Ok(filter::eligible_members(&members, &accounts))
    }

    pub async fn paid_members_keyed(
        &self,
        lite: bool,
    ) -> Result<Keyed<Member, MemberLite>, UpstreamError> {
        let (members, accounts) = self.members_and_accounts().await?;
        let members = projector::keyed::<MemberProjection>(&members, lite);
        Ok(filter::eligible_members(&members, &accounts))
    }

    /// Every row of the members sheet, account or not.
    pub async fn roster(&self, lite: bool) -> Result<Listing<Member, MemberLite>, UpstreamError> {
        let rows = self.members.fetch().await?;
        Ok(projector::list::<MemberProjection>(&rows, lite))
    }

    /// Finds the member (with an account) who lists `email` as primary or
    /// secondary address.
    pub async fn find_member_by_email(&self, email: &str) -> Result<EmailMatch, ClubSheetsError> {
        if email.trim().is_empty() {
            return Err(ClubSheetsError::InvalidInput(
                "email must not be empty".to_string(),
            ));
        }
        let Listing::Full(members) = self.members(false).await? else {
            return Ok(EmailMatch::NotFound);
        };
        let mut matches: Vec<Member> = members.into_iter().filter(|m| m.has_email(email)).collect();
        Ok(match matches.len() {
            0 => EmailMatch::NotFound,
            1 => EmailMatch::Unique(matches.remove(0)),
            _ => {
                tracing::warn!("{} members share email {}", matches.len(), email.trim());
                EmailMatch::Ambiguous(matches.iter().map(|m| m.id().to_string()).collect())
            }
        })
    }

    async fn members_and_accounts(
        &self,
    ) -> Result<(Arc<Rows>, BTreeMap<String, Account>), UpstreamError> {
        let (members, accounts) = tokio::try_join!(self.members.fetch(), self.accounts.fetch())?;
        let accounts = projector::index_by_id(projector::full_list::<AccountProjection>(&accounts));
        Ok((members, accounts))
    }

    // -- Accounts --

    pub async fn accounts(
        &self,
        lite: bool,
    ) -> Result<Listing<Account, AccountLite>, UpstreamError> {
        let rows = self.accounts.fetch().await?;
        Ok(projector::list::<AccountProjection>(&rows, lite))
    }

    pub async fn accounts_keyed(
        &self,
        lite: bool,
    ) -> Result<Keyed<Account, AccountLite>, UpstreamError> {
        let rows = self.accounts.fetch().await?;
        Ok(projector::keyed::<AccountProjection>(&rows, lite))
    }

    /// A member's account flags and overdue breakdown; `None` when the id
    /// has no account.
    pub async fn account_summary(
        &self,
        member_id: &str,
    ) -> Result<Option<AccountSummary>, UpstreamError> {
        let (accounts, overdue) = tokio::try_join!(self.accounts.fetch(), self.overdue.fetch())?;
        let accounts = projector::index_by_id(projector::lite_list::<AccountProjection>(&accounts));
        let Some(account) = accounts.get(member_id) else {
            return Ok(None);
        };
        let mut dues = projector::index_by_id(projector::full_list::<OverdueProjection>(&overdue));
        Ok(Some(AccountSummary {
            account: account.clone(),
            dues: dues.remove(member_id),
        }))
    }

    // -- Overdue --

    pub async fn overdue(&self) -> Result<Vec<OverdueFee>, UpstreamError> {
        let rows = self.overdue.fetch().await?;
        Ok(projector::full_list::<OverdueProjection>(&rows))
    }

    pub async fn overdue_keyed(&self) -> Result<BTreeMap<String, OverdueFee>, UpstreamError> {
        Ok(projector::index_by_id(self.overdue().await?))
    }

    // -- Sign-ins --

    pub async fn sign_ins(&self, lite: bool) -> Result<Listing<SignIn, SignInLite>, UpstreamError> {
        let rows = self.sign_ins.fetch().await?;
        Ok(projector::list::<SignInProjection>(&rows, lite))
    }

    pub async fn sign_ins_keyed(
        &self,
        lite: bool,
    ) -> Result<Keyed<SignIn, SignInLite>, UpstreamError> {
        let rows = self.sign_ins.fetch().await?;
        Ok(projector::keyed::<SignInProjection>(&rows, lite))
    }

    // -- Cache control --

    /// Drops one dataset's cached rows.
    pub fn invalidate(&self, dataset: Dataset) {
        self.fetcher(dataset).invalidate();
        tracing::debug!("{} cache invalidated", dataset);
    }

    pub fn invalidate_all(&self) {
        self.cache.clear();
        tracing::debug!("all cached datasets invalidated");
    }

    /// Fetches all four datasets concurrently. One dataset failing does not
    /// stop the others.
    pub async fn prefetch(&self) -> Vec<PrefetchOutcome> {
        let (members, accounts, overdue, sign_ins) = tokio::join!(
            self.members.fetch(),
            self.accounts.fetch(),
            self.overdue.fetch(),
            self.sign_ins.fetch(),
        );
        [
            (Dataset::Members, members),
            (Dataset::Accounts, accounts),
            (Dataset::Overdue, overdue),
            (Dataset::SignIns, sign_ins),
        ]
        .into_iter()
        .map(|(dataset, result)| PrefetchOutcome {
            dataset,
            result: result.map(|rows| rows.len()),
        })
        .collect()
    }
}
