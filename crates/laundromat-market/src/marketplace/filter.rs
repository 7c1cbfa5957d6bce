use super::domain::Listing;
use super::normalizer::{flag, number, status_filter_key};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inclusive numeric bounds. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Inverted or non-finite bounds impose no restriction.
    pub fn contains(&self, value: f64) -> bool {
        let min = self.min.filter(|bound| bound.is_finite());
        let max = self.max.filter(|bound| bound.is_finite());

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return true;
            }
        }

        min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Filter criteria for the derived view. The default restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    pub search_term: String,
    pub price_range: NumericRange,
    pub roi_range: NumericRange,
    /// `None` matches every status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `None` matches every business type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    pub verified: bool,
    pub featured: bool,
}

impl FilterConfig {
    /// Builds a config from loosely typed key/value pairs such as a query string.
    ///
    /// Unknown keys and unparsable values are ignored.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in params {
            config.apply_param(key.as_ref(), value.as_ref());
        }
        config
    }

    fn apply_param(&mut self, key: &str, value: &str) {
        let raw = Value::String(value.to_string());
        match key {
            "search" | "q" | "searchTerm" | "search_term" => {
                self.search_term = value.to_string();
            }
            "minPrice" | "min_price" => self.price_range.min = number(&raw),
            "maxPrice" | "max_price" => self.price_range.max = number(&raw),
            "minRoi" | "min_roi" => self.roi_range.min = number(&raw),
            "maxRoi" | "max_roi" => self.roi_range.max = number(&raw),
            "status" => self.status = selector(value),
            "type" | "businessType" | "business_type" => self.business_type = selector(value),
            "verified" => self.verified = flag(&raw),
            "featured" => self.featured = flag(&raw),
            _ => {}
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = NumericRange::new(min, max);
        self
    }

    pub fn with_roi_range(mut self, min: f64, max: f64) -> Self {
        self.roi_range = NumericRange::new(min, max);
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = selector(status);
        self
    }

    pub fn with_type(mut self, business_type: &str) -> Self {
        self.business_type = selector(business_type);
        self
    }

    pub fn verified_only(mut self) -> Self {
        self.verified = true;
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured = true;
        self
    }
}

/// `all` and blank selections mean no restriction.
fn selector(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// True when the listing satisfies every criterion of `config`.
pub fn matches(listing: &Listing, config: &FilterConfig) -> bool {
    matches_search(listing, &config.search_term)
        && config.price_range.contains(listing.asking_price_or_zero())
        && config.roi_range.contains(listing.roi_or_zero())
        && matches_status(listing, config.status.as_deref())
        && matches_type(listing, config.business_type.as_deref())
        && (!config.verified || listing.verified)
        && (!config.featured || listing.featured)
}

/// Listings satisfying `config`, in input order.
pub fn filter(listings: &[Listing], config: &FilterConfig) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| matches(listing, config))
        .cloned()
        .collect()
}

fn matches_search(listing: &Listing, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        Some(listing.location.as_str()),
        listing.broker_name(),
        Some(listing.description.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

fn matches_status(listing: &Listing, status: Option<&str>) -> bool {
    match status.and_then(selector) {
        Some(wanted) => listing.status.key() == status_filter_key(&wanted),
        None => true,
    }
}

fn matches_type(listing: &Listing, business_type: Option<&str>) -> bool {
    match business_type.and_then(selector) {
        Some(wanted) => listing.business_type.eq_ignore_ascii_case(&wanted),
        None => true,
    }
}
