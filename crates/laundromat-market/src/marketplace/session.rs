use super::compare::{comparison_table, ComparisonEntry};
use super::domain::{Listing, ListingId};
use super::filter::FilterConfig;
use super::metrics::{format_currency, format_percent, payback_period_label};
use super::selection::{SelectionChange, SelectionError, SelectionSets};
use super::sort::SortKey;
use super::store::{ListingStore, LoadState};
use super::view::{ViewCache, ViewState, ViewStats};
use serde::Serialize;

/// A listing decorated for the browser grid.
#[derive(Debug, Clone, Serialize)]
pub struct ListingCard {
    pub listing: Listing,
    pub status_label: &'static str,
    pub asking_price_display: String,
    pub roi_display: String,
    pub payback_display: String,
    pub is_favorite: bool,
    pub is_compared: bool,
}

/// Everything the browser needs to render one frame.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub view: ViewState,
    pub load_state: LoadState,
    pub stats: ViewStats,
    pub listings: Vec<ListingCard>,
    pub compare_count: usize,
}

/// One browsing session: the store, the view state, the selections and the view cache.
#[derive(Debug, Default)]
pub struct MarketplaceSession {
    store: ListingStore,
    view: ViewState,
    selections: SelectionSets,
    cache: ViewCache,
}

impl MarketplaceSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ListingStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ListingStore {
        &mut self.store
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn set_view_state(&mut self, view: ViewState) {
        self.view = view;
    }

    pub fn set_filters(&mut self, filters: FilterConfig) {
        self.view.filters = filters;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.sort = sort;
    }

    pub fn selections(&self) -> &SelectionSets {
        &self.selections
    }

    /// Derived view for the current store and view state, recomputed only when either changed.
    pub fn derived(&mut self) -> (&[Listing], &ViewStats) {
        self.cache.get(&self.store, &self.view)
    }

    pub fn snapshot(&mut self) -> SessionSnapshot {
        let (listings, stats) = self.cache.get(&self.store, &self.view);
        let listings = listings
            .iter()
            .map(|listing| ListingCard {
                listing: listing.clone(),
                status_label: listing.status.label(),
                asking_price_display: format_currency(listing.asking_price),
                roi_display: format_percent(listing.roi),
                payback_display: payback_period_label(
                    listing.asking_price,
                    listing.monthly_income(),
                ),
                is_favorite: self.selections.is_favorite(&listing.id),
                is_compared: self.selections.is_selected_for_compare(&listing.id),
            })
            .collect();

        SessionSnapshot {
            view: self.view.clone(),
            load_state: self.store.state().clone(),
            stats: stats.clone(),
            listings,
            compare_count: self.selections.compare_ids().len(),
        }
    }

    pub fn toggle_favorite(&mut self, id: &ListingId) -> SelectionChange {
        self.selections.toggle_favorite(id)
    }

    pub fn toggle_compare(&mut self, id: &ListingId) -> Result<SelectionChange, SelectionError> {
        self.selections.toggle_compare(id)
    }

    pub fn clear_compare(&mut self) {
        self.selections.clear_compare();
    }

    pub fn is_favorite(&self, id: &ListingId) -> bool {
        self.selections.is_favorite(id)
    }

    pub fn is_selected_for_compare(&self, id: &ListingId) -> bool {
        self.selections.is_selected_for_compare(id)
    }

    pub fn comparison(&self) -> Vec<ComparisonEntry> {
        comparison_table(&self.store, &self.selections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded_session() -> MarketplaceSession {
        let mut session = MarketplaceSession::new();
        session.store_mut().load(vec![
            json!({"id": "a", "askingPrice": 100000, "roi": 30, "monthlyProfit": 2500}),
            json!({"id": "b", "askingPrice": 200000, "roi": 10}),
            json!({"id": "c", "askingPrice": 300000, "roi": 25, "verified": true}),
        ]);
        session
    }

    #[test]
    fn selections_survive_reload_and_stale_ids_are_inert() {
        let mut session = loaded_session();
        session.toggle_favorite(&ListingId::new("a"));
        session
            .toggle_compare(&ListingId::new("b"))
            .expect("room available");

        session.store_mut().load(vec![json!({"id": "b", "askingPrice": 5})]);

        assert!(session.is_favorite(&ListingId::new("a")));
        assert!(session.is_selected_for_compare(&ListingId::new("b")));
        let table = session.comparison();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].asking_price, Some(5.0));
    }

    #[test]
    fn snapshot_decorates_cards_without_changing_membership() {
        let mut session = loaded_session();
        session.set_sort(SortKey::RoiDesc);
        session.toggle_favorite(&ListingId::new("c"));

        let snapshot = session.snapshot();
        let ids: Vec<_> = snapshot
            .listings
            .iter()
            .map(|card| card.listing.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "c", "b"]);
        assert!(snapshot.listings[1].is_favorite);
        assert!(!snapshot.listings[0].is_favorite);
        assert_eq!(snapshot.listings[0].asking_price_display, "$100,000");
        assert_eq!(snapshot.listings[0].payback_display, "3.3");
        assert_eq!(snapshot.listings[1].payback_display, "N/A");
        assert_eq!(snapshot.stats.total_count, 3);
    }

    #[test]
    fn card_and_comparison_agree_on_payback_from_net_income() {
        let mut session = MarketplaceSession::new();
        session
            .store_mut()
            .load(vec![json!({"id": "p", "askingPrice": 720000, "netIncome": 151000})]);
        session
            .toggle_compare(&ListingId::new("p"))
            .expect("room available");

        let card = session.snapshot().listings.remove(0);
        let entry = session.comparison().remove(0);
        assert_eq!(card.payback_display, "4.8");
        assert_eq!(card.payback_display, entry.payback_display);
    }

    #[test]
    fn filters_update_the_derived_view() {
        let mut session = loaded_session();
        session.set_filters(FilterConfig::default().verified_only());
        let (listings, stats) = session.derived();
        assert_eq!(listings.len(), 1);
        assert_eq!(stats.average_roi, 25.0);
    }
}
