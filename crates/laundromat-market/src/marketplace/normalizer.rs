//! Defensive normalization of raw listing records.
//!
//! Upstream records arrive in several shapes: camelCase or snake_case keys,
//! numbers encoded as strings with currency punctuation, missing enums. Every
//! default is applied here so downstream filter/sort/view code can rely on
//! fully typed fields. Normalizing the serialized form of a [`Listing`] yields
//! the same `Listing`.

use super::domain::{status_key, Broker, Listing, ListingId, ListingStatus, UNKNOWN_BUSINESS_TYPE};
use super::metrics::roi_from_income;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

const ID_KEYS: &[&str] = &["id", "_id", "listingId", "listing_id"];
const LOCATION_KEYS: &[&str] = &["location", "address", "city"];
const DESCRIPTION_KEYS: &[&str] = &["description", "summary", "title"];
const BROKER_KEYS: &[&str] = &["broker"];
const BROKER_NAME_KEYS: &[&str] = &["brokerName", "broker_name"];
const BROKER_COMPANY_KEYS: &[&str] = &["brokerCompany", "broker_company"];
const BROKER_CONTACT_KEYS: &[&str] = &["brokerContact", "broker_contact", "brokerEmail"];
const PRICE_KEYS: &[&str] = &["askingPrice", "asking_price", "price"];
const MONTHLY_PROFIT_KEYS: &[&str] = &["monthlyProfit", "monthly_profit"];
const NET_INCOME_KEYS: &[&str] = &[
    "netIncome",
    "net_income",
    "annualNetIncome",
    "annual_net_income",
];
const ROI_KEYS: &[&str] = &["roi", "ROI", "returnOnInvestment"];
const STATUS_KEYS: &[&str] = &["status"];
const TYPE_KEYS: &[&str] = &["type", "businessType", "business_type"];
const VERIFIED_KEYS: &[&str] = &["verified", "isVerified", "is_verified"];
const FEATURED_KEYS: &[&str] = &["featured", "isFeatured", "is_featured"];
const SQUARE_FEET_KEYS: &[&str] = &["squareFeet", "square_feet", "sqft"];
const WASHER_KEYS: &[&str] = &["washerCount", "washer_count", "washers"];
const DRYER_KEYS: &[&str] = &["dryerCount", "dryer_count", "dryers"];
const DAYS_KEYS: &[&str] = &["daysOnMarket", "days_on_market", "daysListed"];
const GRADE_KEYS: &[&str] = &["grade", "locationGrade", "location_grade"];
const CREATED_KEYS: &[&str] = &["createdAt", "created_at", "listedAt", "listed_at"];
const HIGHLIGHT_KEYS: &[&str] = &["highlights", "features"];
const IMAGE_KEYS: &[&str] = &["images", "photos"];

/// Result of normalizing one load batch.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub listings: Vec<Listing>,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Extracts the record array from an upstream payload.
///
/// Accepts a bare array or an object wrapping one under `listings`, `data` or
/// `results`. Any other shape yields `None`.
pub fn records_from_payload(payload: Value) -> Option<Vec<Value>> {
    match payload {
        Value::Array(records) => Some(records),
        Value::Object(mut map) => ["listings", "data", "results"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            }),
        _ => None,
    }
}

/// Normalizes a batch, skipping non-object entries and dropping later duplicates of an id.
pub fn normalize_batch(records: Vec<Value>) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    let mut seen: HashSet<ListingId> = HashSet::new();

    for (index, record) in records.into_iter().enumerate() {
        let Value::Object(map) = record else {
            warn!(position = index + 1, "skipping listing record that is not an object");
            batch.skipped += 1;
            continue;
        };

        let listing = normalize_record(&map, index + 1);
        if !seen.insert(listing.id.clone()) {
            warn!(id = %listing.id, "dropping duplicate listing id");
            batch.duplicates += 1;
            continue;
        }

        batch.listings.push(listing);
    }

    debug!(
        count = batch.listings.len(),
        skipped = batch.skipped,
        duplicates = batch.duplicates,
        "normalized listing batch"
    );
    batch
}

/// Normalizes one raw record. `position` is its 1-based place in the batch and
/// only used to mint an id when the record carries none.
pub fn normalize_record(map: &Map<String, Value>, position: usize) -> Listing {
    let id = pick(map, ID_KEYS)
        .and_then(text)
        .map(ListingId)
        .unwrap_or_else(|| ListingId(format!("listing-{position}")));

    let asking_price = pick(map, PRICE_KEYS).and_then(number);
    let monthly_profit = pick(map, MONTHLY_PROFIT_KEYS).and_then(number);
    let net_income = pick(map, NET_INCOME_KEYS).and_then(number);
    let roi = pick(map, ROI_KEYS).and_then(number).or_else(|| {
        net_income
            .or_else(|| monthly_profit.map(|monthly| monthly * 12.0))
            .map(|annual| roi_from_income(Some(annual), asking_price))
    });

    let status = pick(map, STATUS_KEYS)
        .and_then(text)
        .map(|raw| ListingStatus::parse(&raw))
        .unwrap_or_default();

    let business_type = pick(map, TYPE_KEYS)
        .and_then(text)
        .map(|raw| raw.to_ascii_lowercase())
        .unwrap_or_else(|| UNKNOWN_BUSINESS_TYPE.to_string());

    Listing {
        id,
        location: pick(map, LOCATION_KEYS).and_then(text).unwrap_or_default(),
        description: pick(map, DESCRIPTION_KEYS).and_then(text).unwrap_or_default(),
        broker: broker(map),
        asking_price,
        monthly_profit,
        net_income,
        roi,
        status,
        business_type,
        verified: pick(map, VERIFIED_KEYS).map(flag).unwrap_or(false),
        featured: pick(map, FEATURED_KEYS).map(flag).unwrap_or(false),
        square_feet: pick(map, SQUARE_FEET_KEYS).and_then(count),
        washer_count: pick(map, WASHER_KEYS).and_then(count),
        dryer_count: pick(map, DRYER_KEYS).and_then(count),
        days_on_market: pick(map, DAYS_KEYS).and_then(count),
        grade: pick(map, GRADE_KEYS)
            .and_then(text)
            .map(|grade| grade.to_ascii_uppercase()),
        created_at: pick(map, CREATED_KEYS).and_then(timestamp),
        highlights: pick(map, HIGHLIGHT_KEYS).map(string_list).unwrap_or_default(),
        images: pick(map, IMAGE_KEYS).map(string_list).unwrap_or_default(),
    }
}

/// First present, non-null value among `keys`.
fn pick<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn text(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(raw) => raw.replace(['\u{feff}', '\u{200b}'], ""),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => {
            let cleaned: String = raw
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '%' | '_') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

fn count(value: &Value) -> Option<u32> {
    number(value)
        .filter(|value| *value >= 0.0)
        .map(|value| value.trunc().min(u32::MAX as f64) as u32)
}

pub(crate) fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        Value::String(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        _ => false,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp(raw),
        Value::Number(number) => {
            let raw = number.as_f64()?;
            if !raw.is_finite() {
                return None;
            }
            // Browser clients send epoch milliseconds; anything smaller is seconds.
            if raw.abs() >= 1e11 {
                DateTime::from_timestamp_millis(raw as i64)
            } else {
                DateTime::from_timestamp(raw as i64, 0)
            }
        }
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn broker(map: &Map<String, Value>) -> Option<Broker> {
    let mut broker = match pick(map, BROKER_KEYS) {
        Some(Value::Object(fields)) => Broker {
            name: pick(fields, &["name"]).and_then(text),
            company: pick(fields, &["company"]).and_then(text),
            contact: pick(fields, &["contact", "email", "phone"]).and_then(text),
        },
        Some(other) => Broker {
            name: text(other),
            ..Broker::default()
        },
        None => Broker::default(),
    };

    if broker.name.is_none() {
        broker.name = pick(map, BROKER_NAME_KEYS).and_then(text);
    }
    if broker.company.is_none() {
        broker.company = pick(map, BROKER_COMPANY_KEYS).and_then(text);
    }
    if broker.contact.is_none() {
        broker.contact = pick(map, BROKER_CONTACT_KEYS).and_then(text);
    }

    if broker.is_empty() {
        None
    } else {
        Some(broker)
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(fields) => pick(fields, &["url", "src"]).and_then(text),
                other => text(other),
            })
            .collect(),
        other => text(other).into_iter().collect(),
    }
}

/// Normalized key used when comparing a configured status against a listing.
pub(crate) fn status_filter_key(raw: &str) -> String {
    status_key(raw)
}
