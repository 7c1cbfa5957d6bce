use laundromat_market::config::MarketplaceConfig;
use laundromat_market::marketplace::{
    DemoListings, EmptyStateProvider, HttpListingSource, ListingDataSource, ListingLoader,
    LoadError, LoadOutcome, MarketplaceSession,
};
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type SharedSession = Arc<RwLock<MarketplaceSession>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) session: SharedSession,
    /// `None` when no upstream is configured; reloads then reseed the demo listings.
    pub(crate) loader: Option<Arc<ListingLoader>>,
}

/// Loader for the configured upstream, or `None` when no listings URL is set.
pub(crate) fn build_loader(
    config: &MarketplaceConfig,
    url_override: Option<String>,
) -> Result<Option<ListingLoader>, LoadError> {
    let Some(url) = url_override.or_else(|| config.listings_url.clone()) else {
        return Ok(None);
    };

    let source = HttpListingSource::new(url, config.request_timeout)?
        .with_bearer_token(config.api_token.clone());
    let mut loader = ListingLoader::new(Arc::new(source)).with_timeout(config.request_timeout);
    if config.demo_fallback {
        loader = loader.with_empty_state(Arc::new(DemoListings));
    }

    Ok(Some(loader))
}

/// Replaces the session's listings with the demo set through the regular load path.
pub(crate) fn seed_demo(session: &mut MarketplaceSession) -> LoadOutcome {
    let store = session.store_mut();
    let ticket = store.begin_load();
    store.apply_load(ticket, DemoListings.records(), ListingDataSource::Demo)
}

pub(crate) async fn reload(state: &AppState) -> LoadOutcome {
    match &state.loader {
        Some(loader) => loader.load_into(&state.session).await,
        None => {
            let mut session = state.session.write();
            seed_demo(&mut session)
        }
    }
}
