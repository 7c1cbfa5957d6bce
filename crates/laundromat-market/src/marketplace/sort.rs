use super::domain::Listing;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Orderings offered by the listing browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    RoiAsc,
    RoiDesc,
    #[default]
    Newest,
    GradeDesc,
    IncomeDesc,
    DaysAsc,
}

impl SortKey {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::PriceAsc,
            Self::PriceDesc,
            Self::RoiAsc,
            Self::RoiDesc,
            Self::Newest,
            Self::GradeDesc,
            Self::IncomeDesc,
            Self::DaysAsc,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::RoiAsc => "roi-asc",
            Self::RoiDesc => "roi-desc",
            Self::Newest => "newest",
            Self::GradeDesc => "grade-desc",
            Self::IncomeDesc => "income-desc",
            Self::DaysAsc => "days-asc",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::RoiAsc => "ROI: Low to High",
            Self::RoiDesc => "ROI: High to Low",
            Self::Newest => "Newest First",
            Self::GradeDesc => "Best Location Grade",
            Self::IncomeDesc => "Highest Income",
            Self::DaysAsc => "Fewest Days on Market",
        }
    }

    /// Comparator for this key. Missing numeric fields compare as zero.
    pub fn compare(self, left: &Listing, right: &Listing) -> Ordering {
        match self {
            Self::PriceAsc => left
                .asking_price_or_zero()
                .total_cmp(&right.asking_price_or_zero()),
            Self::PriceDesc => right
                .asking_price_or_zero()
                .total_cmp(&left.asking_price_or_zero()),
            Self::RoiAsc => left.roi_or_zero().total_cmp(&right.roi_or_zero()),
            Self::RoiDesc => right.roi_or_zero().total_cmp(&left.roi_or_zero()),
            Self::Newest => right.created_at.cmp(&left.created_at),
            Self::GradeDesc => right.grade_rank().cmp(&left.grade_rank()),
            Self::IncomeDesc => income_or_zero(right).total_cmp(&income_or_zero(left)),
            Self::DaysAsc => left
                .days_on_market
                .unwrap_or(0)
                .cmp(&right.days_on_market.unwrap_or(0)),
        }
    }
}

fn income_or_zero(listing: &Listing) -> f64 {
    listing.annual_income().unwrap_or(0.0)
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ordered()
            .into_iter()
            .find(|key| key.key() == normalized)
            .ok_or_else(|| UnknownSortKey(raw.to_string()))
    }
}

/// Returns a new sequence ordered by `key`. Ties keep their input order.
pub fn sort(listings: &[Listing], key: SortKey) -> Vec<Listing> {
    let mut ordered = listings.to_vec();
    ordered.sort_by(|left, right| key.compare(left, right));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::fixtures::listing;
    use chrono::{TimeZone, Utc};

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|listing| listing.id.as_str()).collect()
    }

    #[test]
    fn price_orders_ascending_and_descending() {
        let listings = vec![
            listing("p300", 300_000.0, 0.0),
            listing("p100", 100_000.0, 0.0),
            listing("p200", 200_000.0, 0.0),
        ];
        assert_eq!(
            ids(&sort(&listings, SortKey::PriceAsc)),
            ["p100", "p200", "p300"]
        );
        assert_eq!(
            ids(&sort(&listings, SortKey::PriceDesc)),
            ["p300", "p200", "p100"]
        );
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let listings = vec![
            listing("first", 100.0, 15.0),
            listing("top", 100.0, 30.0),
            listing("second", 100.0, 15.0),
            listing("third", 100.0, 15.0),
        ];
        assert_eq!(
            ids(&sort(&listings, SortKey::RoiDesc)),
            ["top", "first", "second", "third"]
        );
        assert_eq!(
            ids(&sort(&listings, SortKey::RoiAsc)),
            ["first", "second", "third", "top"]
        );
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let listings = vec![listing("b", 2.0, 0.0), listing("a", 1.0, 0.0)];
        let _ = sort(&listings, SortKey::PriceAsc);
        assert_eq!(ids(&listings), ["b", "a"]);
    }

    #[test]
    fn missing_numbers_sort_as_zero() {
        let mut missing = listing("missing", 0.0, 0.0);
        missing.asking_price = None;
        let listings = vec![
            listing("positive", 10.0, 0.0),
            missing,
            listing("negative", -5.0, 0.0),
        ];
        assert_eq!(
            ids(&sort(&listings, SortKey::PriceAsc)),
            ["negative", "missing", "positive"]
        );
    }

    #[test]
    fn grade_desc_ranks_unknown_grades_last() {
        let graded = |id: &str, grade: Option<&str>| {
            let mut candidate = listing(id, 0.0, 0.0);
            candidate.grade = grade.map(str::to_string);
            candidate
        };
        let listings = vec![
            graded("unknown", Some("Z")),
            graded("b", Some("B")),
            graded("none", None),
            graded("a-plus", Some("A+")),
            graded("a-minus", Some("A-")),
        ];
        assert_eq!(
            ids(&sort(&listings, SortKey::GradeDesc)),
            ["a-plus", "a-minus", "b", "unknown", "none"]
        );
    }

    #[test]
    fn newest_puts_missing_timestamps_last() {
        let stamped = |id: &str, day: Option<u32>| {
            let mut candidate = listing(id, 0.0, 0.0);
            candidate.created_at = day.map(|day| {
                Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0)
                    .single()
                    .expect("valid date")
            });
            candidate
        };
        let listings = vec![
            stamped("old", Some(1)),
            stamped("undated", None),
            stamped("recent", Some(20)),
        ];
        assert_eq!(
            ids(&sort(&listings, SortKey::Newest)),
            ["recent", "old", "undated"]
        );
    }

    #[test]
    fn income_and_days_use_derived_fields() {
        let mut monthly = listing("monthly", 0.0, 0.0);
        monthly.monthly_profit = Some(5_000.0);
        monthly.days_on_market = Some(40);
        let mut annual = listing("annual", 0.0, 0.0);
        annual.net_income = Some(50_000.0);
        annual.days_on_market = Some(3);
        let none = listing("none", 0.0, 0.0);

        let listings = vec![none, annual, monthly];
        assert_eq!(
            ids(&sort(&listings, SortKey::IncomeDesc)),
            ["monthly", "annual", "none"]
        );
        assert_eq!(
            ids(&sort(&listings, SortKey::DaysAsc)),
            ["none", "annual", "monthly"]
        );
    }

    #[test]
    fn parses_keys_leniently() {
        assert_eq!("price-asc".parse::<SortKey>(), Ok(SortKey::PriceAsc));
        assert_eq!(" ROI_DESC ".parse::<SortKey>(), Ok(SortKey::RoiDesc));
        assert_eq!(
            "cheapest".parse::<SortKey>(),
            Err(UnknownSortKey("cheapest".to_string()))
        );
        for key in SortKey::ordered() {
            assert_eq!(key.key().parse::<SortKey>(), Ok(key));
        }
    }
}
