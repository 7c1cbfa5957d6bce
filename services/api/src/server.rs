use crate::cli::ServeArgs;
use crate::infra::{build_loader, reload, AppState};
use crate::routes::marketplace_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use laundromat_market::config::AppConfig;
use laundromat_market::error::AppError;
use laundromat_market::marketplace::{LoadOutcome, MarketplaceSession};
use laundromat_market::telemetry;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let loader = build_loader(&config.marketplace, args.listings_url.take())?;
    if loader.is_none() {
        info!("MARKETPLACE_LISTINGS_URL not set; serving demo listings");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        session: Arc::new(RwLock::new(MarketplaceSession::new())),
        loader: loader.map(Arc::new),
    };

    match reload(&app_state).await {
        LoadOutcome::Applied { count, source } => {
            info!(count, source = source.label(), "initial listings loaded")
        }
        LoadOutcome::Failed { message } => {
            warn!(error = %message, "initial listing load failed; retry via POST /api/v1/marketplace/reload")
        }
        LoadOutcome::Stale => {}
    }

    let app = marketplace_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "laundromat marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}
