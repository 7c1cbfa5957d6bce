use super::domain::Listing;
use super::filter::{filter, FilterConfig};
use super::sort::{sort, SortKey};
use super::store::ListingStore;
use serde::{Deserialize, Serialize};

/// Browser state owned by the presentation layer and passed into the pure view functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewState {
    pub filters: FilterConfig,
    pub sort: SortKey,
}

impl ViewState {
    pub fn new(filters: FilterConfig, sort: SortKey) -> Self {
        Self { filters, sort }
    }
}

/// Filtered then sorted listings of the current store snapshot.
pub fn derive(store: &ListingStore, filters: &FilterConfig, key: SortKey) -> Vec<Listing> {
    sort(&filter(store.all(), filters), key)
}

/// Aggregates over a derived view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewStats {
    pub total_count: usize,
    pub total_asking_price: f64,
    /// Mean ROI with missing values counted as zero; `0` for an empty view.
    pub average_roi: f64,
    pub verified_count: usize,
    pub featured_count: usize,
}

impl ViewStats {
    pub fn from_listings(listings: &[Listing]) -> Self {
        let total_count = listings.len();
        let total_asking_price = listings.iter().map(Listing::asking_price_or_zero).sum();
        let roi_sum: f64 = listings.iter().map(Listing::roi_or_zero).sum();
        let average_roi = if total_count > 0 {
            roi_sum / total_count as f64
        } else {
            0.0
        };

        Self {
            total_count,
            total_asking_price,
            average_roi,
            verified_count: listings.iter().filter(|listing| listing.verified).count(),
            featured_count: listings.iter().filter(|listing| listing.featured).count(),
        }
    }
}

/// Memoizes the derived view on `(store generation, filters, sort key)`.
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<(u64, ViewState)>,
    listings: Vec<Listing>,
    stats: ViewStats,
}

impl ViewCache {
    pub fn get(&mut self, store: &ListingStore, state: &ViewState) -> (&[Listing], &ViewStats) {
        let fresh = matches!(
            &self.key,
            Some((generation, cached)) if *generation == store.generation() && cached == state
        );

        if !fresh {
            self.listings = derive(store, &state.filters, state.sort);
            self.stats = ViewStats::from_listings(&self.listings);
            self.key = Some((store.generation(), state.clone()));
        }

        (&self.listings, &self.stats)
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
