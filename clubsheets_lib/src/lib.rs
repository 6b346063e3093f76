//! Library layer for Club Sheets: a read-only, cached domain view over the
//! club's spreadsheet.
//!
//! Raw ranges are fetched through a [`RowSource`] and held in a TTL
//! [`RangeCache`], mapped into typed records with fixed column schemas,
//! joined against the accounts sheet, and shaped into full or abbreviated
//! projections by [`ClubData`].

pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod mapper;
pub mod models;
pub mod projector;
pub mod schema;
pub mod service;
pub mod source;

pub use sheets_api;

pub use cache::RangeCache;
pub use config::{DatasetSettings, SheetsConfig};
pub use dataset::Dataset;
pub use error::{ClubSheetsError, MappingAnomaly, UpstreamError};
pub use fetcher::RawDatasetFetcher;
pub use models::{
    Account, AccountLite, AccountSummary, FeeLine, Member, MemberLite, MemberType, OverdueFee,
    Record, SignIn, SignInLite, FEE_CATEGORIES,
};
pub use projector::{Keyed, Listing};
pub use service::{ClubData, EmailMatch, PrefetchOutcome};
pub use source::{RowSource, Rows, SheetsRowSource};
