use super::domain::{Listing, ListingId};
use super::normalizer::normalize_batch;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

/// Where the current snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingDataSource {
    Api,
    File,
    Demo,
    Inline,
}

impl ListingDataSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Api => "Marketplace API",
            Self::File => "Local export",
            Self::Demo => "Demo listings",
            Self::Inline => "Inline records",
        }
    }
}

/// Presentation-facing state of the most recent load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Ready {
        count: usize,
        source: ListingDataSource,
    },
    Failed {
        message: String,
    },
}

/// Tag identifying one load request. Only the most recently issued ticket may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Applied {
        count: usize,
        source: ListingDataSource,
    },
    Failed {
        message: String,
    },
    /// A newer request was issued before this one resolved.
    Stale,
}

/// Authoritative listing snapshot for a session. Reloads replace it wholesale.
#[derive(Debug)]
pub struct ListingStore {
    listings: Vec<Listing>,
    generation: u64,
    issued: u64,
    state: LoadState,
}

impl Default for ListingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingStore {
    pub fn new() -> Self {
        Self {
            listings: Vec::new(),
            generation: 0,
            issued: 0,
            state: LoadState::Idle,
        }
    }

    /// Normalizes `records` and replaces the snapshot.
    pub fn load(&mut self, records: Vec<Value>) -> usize {
        let ticket = self.begin_load();
        match self.apply_load(ticket, records, ListingDataSource::Inline) {
            LoadOutcome::Applied { count, .. } => count,
            LoadOutcome::Failed { .. } | LoadOutcome::Stale => 0,
        }
    }

    /// Current snapshot in load order.
    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: &ListingId) -> Option<&Listing> {
        self.listings.iter().find(|listing| &listing.id == id)
    }

    pub fn contains(&self, id: &ListingId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Incremented on every snapshot replacement.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Replaces the snapshot with already normalized listings, keeping the first of any duplicate id.
    ///
    /// Counts as a load of its own: any load still in flight becomes stale.
    pub fn replace(&mut self, listings: Vec<Listing>) {
        self.issued += 1;
        let mut seen: HashSet<ListingId> = HashSet::with_capacity(listings.len());
        self.listings = listings
            .into_iter()
            .filter(|listing| {
                let fresh = seen.insert(listing.id.clone());
                if !fresh {
                    warn!(id = %listing.id, "dropping duplicate listing id");
                }
                fresh
            })
            .collect();
        self.generation += 1;
        self.state = LoadState::Ready {
            count: self.listings.len(),
            source: ListingDataSource::Inline,
        };
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.issued)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.issued
    }

    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        records: Vec<Value>,
        source: ListingDataSource,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            warn!(
                ticket = ticket.0,
                current = self.issued,
                "ignoring listings from superseded load"
            );
            return LoadOutcome::Stale;
        }

        let batch = normalize_batch(records);
        let count = batch.listings.len();
        self.listings = batch.listings;
        self.generation += 1;
        self.state = LoadState::Ready { count, source };

        info!(
            ticket = ticket.0,
            count,
            skipped = batch.skipped,
            duplicates = batch.duplicates,
            source = source.label(),
            "listing snapshot replaced"
        );
        LoadOutcome::Applied { count, source }
    }

    /// Records a failed load. The previous snapshot stays in place.
    pub fn fail_load(&mut self, ticket: LoadTicket, message: impl Into<String>) -> LoadOutcome {
        if !self.is_current(ticket) {
            return LoadOutcome::Stale;
        }

        let message = message.into();
        warn!(ticket = ticket.0, error = %message, kept = self.listings.len(), "listing load failed");
        self.state = LoadState::Failed {
            message: message.clone(),
        };
        LoadOutcome::Failed { message }
    }
}
