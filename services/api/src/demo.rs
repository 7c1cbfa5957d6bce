use crate::infra::{build_loader, seed_demo};
use chrono::Local;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Args;
use laundromat_market::config::AppConfig;
use laundromat_market::error::AppError;
use laundromat_market::marketplace::metrics::format_currency;
use laundromat_market::marketplace::{
    ComparisonEntry, FileListingSource, FilterConfig, ListingId, ListingLoader, ListingSource,
    LoadOutcome, MarketplaceSession, SelectionError, SessionSnapshot, SortKey,
};
use laundromat_market::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FilterArgs {
    /// Case-insensitive match on location, broker or description
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long)]
    pub(crate) min_price: Option<f64>,
    #[arg(long)]
    pub(crate) max_price: Option<f64>,
    #[arg(long)]
    pub(crate) min_roi: Option<f64>,
    #[arg(long)]
    pub(crate) max_roi: Option<f64>,
    /// Listing status key (active, pending, under_contract, sold, new)
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Business type key such as coin-operated
    #[arg(long = "type")]
    pub(crate) business_type: Option<String>,
    /// Only verified listings
    #[arg(long)]
    pub(crate) verified: bool,
    /// Only featured listings
    #[arg(long)]
    pub(crate) featured: bool,
}

impl FilterArgs {
    pub(crate) fn to_config(&self) -> FilterConfig {
        let mut config = FilterConfig::default();
        if let Some(term) = &self.search {
            config = config.with_search(term.clone());
        }
        config.price_range.min = self.min_price;
        config.price_range.max = self.max_price;
        config.roi_range.min = self.min_roi;
        config.roi_range.max = self.max_roi;
        if let Some(status) = &self.status {
            config = config.with_status(status);
        }
        if let Some(business_type) = &self.business_type {
            config = config.with_type(business_type);
        }
        if self.verified {
            config = config.verified_only();
        }
        if self.featured {
            config = config.featured_only();
        }
        config
    }
}

#[derive(Args, Debug)]
pub(crate) struct BrowseArgs {
    /// Listings endpoint (defaults to MARKETPLACE_LISTINGS_URL)
    #[arg(long, conflicts_with = "file")]
    pub(crate) url: Option<String>,
    /// Local JSON or CSV broker export
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Sort order
    #[arg(long, default_value = "newest", value_parser = sort_key_parser())]
    pub(crate) sort: SortKey,
    /// Maximum number of listings to print
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Sort order
    #[arg(long, default_value = "roi-desc", value_parser = sort_key_parser())]
    pub(crate) sort: SortKey,
}

/// Accepts exactly the keys of [`SortKey::ordered`], which clap lists in `--help`.
fn sort_key_parser() -> impl TypedValueParser<Value = SortKey> {
    PossibleValuesParser::new(SortKey::ordered().map(SortKey::key))
        .map(|raw| raw.parse::<SortKey>().unwrap_or_default())
}

pub(crate) fn load_summary(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Applied { count, source } => {
            format!("Loaded {count} listings from {}.", source.label())
        }
        LoadOutcome::Failed { message } => format!("Listing load failed: {message}"),
        LoadOutcome::Stale => "Listing load was superseded by a newer one.".to_string(),
    }
}

pub(crate) async fn run_browse(args: BrowseArgs) -> Result<(), AppError> {
    let BrowseArgs {
        url,
        file,
        filters,
        sort,
        limit,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let loader = match file {
        Some(path) => {
            let source: Arc<dyn ListingSource> = Arc::new(FileListingSource::new(path));
            Some(ListingLoader::new(source).with_timeout(config.marketplace.request_timeout))
        }
        None => build_loader(&config.marketplace, url)?,
    };

    let mut session = MarketplaceSession::new();
    let outcome = match loader {
        Some(loader) => {
            let (records, source) = loader.fetch().await?;
            let store = session.store_mut();
            let ticket = store.begin_load();
            store.apply_load(ticket, records, source)
        }
        None => {
            println!("No listings source configured; showing demo listings.");
            seed_demo(&mut session)
        }
    };
    println!("{}", load_summary(&outcome));

    session.set_filters(filters.to_config());
    session.set_sort(sort);
    render_snapshot(&session.snapshot(), limit);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut session = MarketplaceSession::new();
    seed_demo(&mut session);

    println!("Laundromat marketplace demo");
    session.set_sort(args.sort);
    render_snapshot(&session.snapshot(), None);

    println!("\nVerified listings under $500,000");
    session.set_filters(
        FilterConfig::default()
            .with_price_range(0.0, 500_000.0)
            .verified_only(),
    );
    render_snapshot(&session.snapshot(), None);
    session.set_filters(FilterConfig::default());

    let picks: Vec<ListingId> = session
        .derived()
        .0
        .iter()
        .map(|listing| listing.id.clone())
        .collect();

    if let Some(first) = picks.first() {
        session.toggle_favorite(first);
        println!("\nSaved {} to favorites", first);
    }

    println!("\nAdding listings to the comparison");
    for id in picks.iter().take(4) {
        match session.toggle_compare(id) {
            Ok(change) => println!("- {id}: {change:?}"),
            Err(SelectionError::CapacityExceeded { limit }) => {
                println!("- {id}: skipped, comparison holds at most {limit} listings")
            }
        }
    }

    render_comparison(&session.comparison());
    Ok(())
}

fn render_snapshot(snapshot: &SessionSnapshot, limit: Option<usize>) {
    println!(
        "Listings as of {} | sort: {}",
        Local::now().format("%Y-%m-%d %H:%M"),
        snapshot.view.sort.label()
    );
    println!(
        "- {} matching | {} total asking | {:.1}% average ROI | {} verified | {} featured",
        snapshot.stats.total_count,
        format_currency(Some(snapshot.stats.total_asking_price)),
        snapshot.stats.average_roi,
        snapshot.stats.verified_count,
        snapshot.stats.featured_count
    );

    if snapshot.listings.is_empty() {
        println!("  No listings match the current filters.");
        return;
    }

    let shown = limit.unwrap_or(snapshot.listings.len());
    for card in snapshot.listings.iter().take(shown) {
        let mut markers = Vec::new();
        if card.listing.verified {
            markers.push("verified");
        }
        if card.listing.featured {
            markers.push("featured");
        }
        if card.is_favorite {
            markers.push("favorite");
        }
        println!(
            "  - [{}] {} | {} | ROI {} | payback {} yrs | {}{}",
            card.status_label,
            card.listing.location,
            card.asking_price_display,
            card.roi_display,
            card.payback_display,
            card.listing.business_type,
            if markers.is_empty() {
                String::new()
            } else {
                format!(" ({})", markers.join(", "))
            }
        );
    }
    if shown < snapshot.listings.len() {
        println!("  ... {} more", snapshot.listings.len() - shown);
    }
}

fn render_comparison(entries: &[ComparisonEntry]) {
    println!("\nSide-by-side comparison");
    if entries.is_empty() {
        println!("  Nothing selected for comparison.");
        return;
    }
    for entry in entries {
        println!(
            "  - {} [{}] asking {} | ROI {} | income {} | payback {} yrs | {} machines",
            entry.location,
            entry.status_label,
            entry.asking_price_display,
            entry.roi_display,
            entry.annual_income_display,
            entry.payback_display,
            entry
                .machine_count
                .map(|count| count.to_string())
                .unwrap_or_else(|| "N/A".to_string())
        );
    }
}
