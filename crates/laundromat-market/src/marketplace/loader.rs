use super::demo::EmptyStateProvider;
use super::session::MarketplaceSession;
use super::source::{ListingSource, SourceError};
use super::store::{ListingDataSource, LoadOutcome};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("listing load timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Drives one source into a session's store.
///
/// Each load takes a ticket before awaiting the source; a response is only
/// applied if no newer load was started in the meantime. The session lock is
/// never held across the await.
#[derive(Clone)]
pub struct ListingLoader {
    source: Arc<dyn ListingSource>,
    empty_state: Option<Arc<dyn EmptyStateProvider>>,
    timeout: Duration,
}

impl std::fmt::Debug for ListingLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingLoader")
            .field("source", &self.source.kind())
            .field("empty_state", &self.empty_state.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ListingLoader {
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self {
            source,
            empty_state: None,
            timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Falls back to `provider` when the source returns no records.
    pub fn with_empty_state(mut self, provider: Arc<dyn EmptyStateProvider>) -> Self {
        self.empty_state = Some(provider);
        self
    }

    /// Fetches raw records, applying the timeout and empty-state fallback.
    pub async fn fetch(&self) -> Result<(Vec<Value>, ListingDataSource), LoadError> {
        let fetched = tokio::time::timeout(self.timeout, self.source.fetch())
            .await
            .map_err(|_| LoadError::Timeout(self.timeout))??;

        if fetched.records.is_empty() {
            if let Some(provider) = &self.empty_state {
                info!("listing source returned no records; using demo listings");
                return Ok((provider.records(), ListingDataSource::Demo));
            }
        }

        Ok((fetched.records, self.source.kind()))
    }

    pub async fn load_into(&self, session: &RwLock<MarketplaceSession>) -> LoadOutcome {
        let ticket = session.write().store_mut().begin_load();
        info!(
            ticket = ticket.sequence(),
            source = self.source.kind().label(),
            "listing load started"
        );

        let result = self.fetch().await;

        let mut guard = session.write();
        match result {
            Ok((records, source)) => guard.store_mut().apply_load(ticket, records, source),
            Err(err) => guard.store_mut().fail_load(ticket, err.to_string()),
        }
    }
}
