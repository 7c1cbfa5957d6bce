use super::domain::{Listing, ListingId};
use super::metrics::{
    format_currency, format_percent, payback_period_label, payback_period_years,
    price_per_square_foot,
};
use super::selection::SelectionSets;
use super::store::ListingStore;
use serde::Serialize;

/// One column of the side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub id: ListingId,
    pub location: String,
    pub status_label: &'static str,
    pub business_type: String,
    pub asking_price: Option<f64>,
    pub asking_price_display: String,
    pub roi: Option<f64>,
    pub roi_display: String,
    pub annual_income: Option<f64>,
    pub annual_income_display: String,
    pub payback_years: Option<f64>,
    pub payback_display: String,
    pub price_per_square_foot: Option<f64>,
    pub machine_count: Option<u32>,
    pub grade: Option<String>,
    pub verified: bool,
    pub featured: bool,
}

impl ComparisonEntry {
    pub fn from_listing(listing: &Listing) -> Self {
        let annual_income = listing.annual_income();
        let monthly = listing.monthly_income();

        Self {
            id: listing.id.clone(),
            location: listing.location.clone(),
            status_label: listing.status.label(),
            business_type: listing.business_type.clone(),
            asking_price: listing.asking_price,
            asking_price_display: format_currency(listing.asking_price),
            roi: listing.roi,
            roi_display: format_percent(listing.roi),
            annual_income,
            annual_income_display: format_currency(annual_income),
            payback_years: payback_period_years(listing.asking_price, monthly),
            payback_display: payback_period_label(listing.asking_price, monthly),
            price_per_square_foot: price_per_square_foot(listing.asking_price, listing.square_feet),
            machine_count: listing.machine_count(),
            grade: listing.grade.clone(),
            verified: listing.verified,
            featured: listing.featured,
        }
    }
}

/// Comparison columns for the compare picks still present in the store, in pick order.
pub fn comparison_table(store: &ListingStore, selection: &SelectionSets) -> Vec<ComparisonEntry> {
    selection
        .compare_ids()
        .iter()
        .filter_map(|id| store.get(id))
        .map(ComparisonEntry::from_listing)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::fixtures::{listing, store_with};

    #[test]
    fn table_follows_pick_order_and_skips_stale_ids() {
        let store = store_with(vec![
            listing("a", 100_000.0, 10.0),
            listing("b", 200_000.0, 20.0),
        ]);
        let mut selection = SelectionSets::new();
        for raw in ["b", "gone", "a"] {
            selection
                .toggle_compare(&ListingId::new(raw))
                .expect("room available");
        }

        let table = comparison_table(&store, &selection);
        let ids: Vec<_> = table.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(table[0].asking_price_display, "$200,000");
        assert_eq!(table[0].roi_display, "20.0%");
    }

    #[test]
    fn entry_falls_back_to_sentinels() {
        let mut sparse = listing("sparse", 0.0, 0.0);
        sparse.asking_price = None;
        sparse.roi = None;
        let entry = ComparisonEntry::from_listing(&sparse);
        assert_eq!(entry.asking_price_display, "$0");
        assert_eq!(entry.payback_display, "N/A");
        assert_eq!(entry.roi_display, "N/A");
        assert!(entry.price_per_square_foot.is_none());
    }

    #[test]
    fn entry_uses_net_income_for_payback_when_monthly_missing() {
        let mut candidate = listing("c", 480_000.0, 25.0);
        candidate.net_income = Some(120_000.0);
        candidate.square_feet = Some(2_400);
        candidate.washer_count = Some(20);
        candidate.dryer_count = Some(18);

        let entry = ComparisonEntry::from_listing(&candidate);
        assert_eq!(entry.payback_years, Some(4.0));
        assert_eq!(entry.annual_income_display, "$120,000");
        assert_eq!(entry.price_per_square_foot, Some(200.0));
        assert_eq!(entry.machine_count, Some(38));
    }
}
