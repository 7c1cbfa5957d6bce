//! Marketplace listing browser: load, filter, sort, compare.

pub mod compare;
pub mod demo;
pub mod domain;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod normalizer;
pub mod selection;
pub mod session;
pub mod sort;
pub mod source;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod fixtures;

pub use compare::{comparison_table, ComparisonEntry};
pub use demo::{DemoListings, EmptyStateProvider};
pub use domain::{Broker, Listing, ListingId, ListingStatus};
pub use filter::{filter, matches, FilterConfig, NumericRange};
pub use loader::{ListingLoader, LoadError};
pub use selection::{SelectionChange, SelectionError, SelectionSets, COMPARE_LIMIT};
pub use session::{ListingCard, MarketplaceSession, SessionSnapshot};
pub use sort::{sort, SortKey, UnknownSortKey};
pub use source::{FileListingSource, HttpListingSource, ListingSource, SourceError};
pub use store::{ListingDataSource, ListingStore, LoadOutcome, LoadState, LoadTicket};
pub use view::{derive, ViewCache, ViewState, ViewStats};
