use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque listing identifier, unique within one store snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Sale status of a listing. Unrecognized keys are preserved in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ListingStatus {
    #[default]
    Active,
    Pending,
    UnderContract,
    Sold,
    New,
    Other(String),
}

impl ListingStatus {
    /// Parses a raw status, normalizing case and separators. Empty input yields `Active`.
    pub fn parse(raw: &str) -> Self {
        let key = status_key(raw);
        match key.as_str() {
            "" | "active" => Self::Active,
            "pending" => Self::Pending,
            "under_contract" => Self::UnderContract,
            "sold" => Self::Sold,
            "new" => Self::New,
            _ => Self::Other(key),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::UnderContract => "under_contract",
            Self::Sold => "sold",
            Self::New => "new",
            Self::Other(key) => key,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::UnderContract => "Under Contract",
            Self::Sold => "Sold",
            Self::New => "New",
            Self::Other(_) => "Listed",
        }
    }
}

impl Serialize for ListingStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for ListingStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

pub(crate) fn status_key(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

pub const UNKNOWN_BUSINESS_TYPE: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Broker {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.company.is_none() && self.contact.is_none()
    }
}

/// Letter grades from best to worst.
pub const GRADE_SCALE: [&str; 13] = [
    "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
];

/// Rank of a grade where higher is better. Unrecognized grades have no rank.
pub fn grade_rank(grade: &str) -> Option<usize> {
    let normalized = grade.trim().to_ascii_uppercase();
    GRADE_SCALE
        .iter()
        .position(|candidate| *candidate == normalized)
        .map(|index| GRADE_SCALE.len() - index)
}

/// One laundromat business for sale, fully normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker: Option<Broker>,
    pub asking_price: Option<f64>,
    pub monthly_profit: Option<f64>,
    pub net_income: Option<f64>,
    pub roi: Option<f64>,
    pub status: ListingStatus,
    #[serde(rename = "type")]
    pub business_type: String,
    pub verified: bool,
    pub featured: bool,
    pub square_feet: Option<u32>,
    pub washer_count: Option<u32>,
    pub dryer_count: Option<u32>,
    pub days_on_market: Option<u32>,
    pub grade: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Listing {
    pub fn asking_price_or_zero(&self) -> f64 {
        self.asking_price.unwrap_or(0.0)
    }

    pub fn roi_or_zero(&self) -> f64 {
        self.roi.unwrap_or(0.0)
    }

    /// Net income per year, falling back to twelve months of profit.
    pub fn annual_income(&self) -> Option<f64> {
        self.net_income
            .or_else(|| self.monthly_profit.map(|monthly| monthly * 12.0))
    }

    /// Profit per month, falling back to a twelfth of net income.
    pub fn monthly_income(&self) -> Option<f64> {
        self.monthly_profit
            .or_else(|| self.net_income.map(|annual| annual / 12.0))
    }

    pub fn broker_name(&self) -> Option<&str> {
        self.broker.as_ref().and_then(|broker| broker.name.as_deref())
    }

    pub fn machine_count(&self) -> Option<u32> {
        match (self.washer_count, self.dryer_count) {
            (None, None) => None,
            (washers, dryers) => Some(washers.unwrap_or(0).saturating_add(dryers.unwrap_or(0))),
        }
    }

    pub fn grade_rank(&self) -> Option<usize> {
        self.grade.as_deref().and_then(grade_rank)
    }
}
