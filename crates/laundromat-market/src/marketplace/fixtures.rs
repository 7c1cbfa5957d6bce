use super::domain::{Listing, ListingId, ListingStatus};
use super::store::ListingStore;

pub(crate) fn listing(id: &str, asking_price: f64, roi: f64) -> Listing {
    Listing {
        id: ListingId::new(id),
        location: format!("{id} location"),
        description: String::new(),
        broker: None,
        asking_price: Some(asking_price),
        monthly_profit: None,
        net_income: None,
        roi: Some(roi),
        status: ListingStatus::Active,
        business_type: "coin-operated".to_string(),
        verified: false,
        featured: false,
        square_feet: None,
        washer_count: None,
        dryer_count: None,
        days_on_market: None,
        grade: None,
        created_at: None,
        highlights: Vec::new(),
        images: Vec::new(),
    }
}

pub(crate) fn store_with(listings: Vec<Listing>) -> ListingStore {
    let mut store = ListingStore::new();
    store.replace(listings);
    store
}
