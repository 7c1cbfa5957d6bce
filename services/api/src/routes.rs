use crate::infra::{reload, AppState};
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use laundromat_market::marketplace::{
    ComparisonEntry, FilterConfig, ListingId, LoadOutcome, LoadState, SelectionChange,
    SelectionError, SessionSnapshot, SortKey,
};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub(crate) struct FavoriteResponse {
    pub(crate) id: ListingId,
    pub(crate) change: SelectionChange,
    pub(crate) is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompareToggleResponse {
    pub(crate) id: ListingId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) change: Option<SelectionChange>,
    pub(crate) capacity_exceeded: bool,
    pub(crate) compare: Vec<ListingId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ComparisonResponse {
    pub(crate) ids: Vec<ListingId>,
    pub(crate) entries: Vec<ComparisonEntry>,
}

pub(crate) fn marketplace_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/marketplace/listings", get(listings_endpoint))
        .route("/api/v1/marketplace/reload", post(reload_endpoint))
        .route("/api/v1/marketplace/favorites/:id", post(favorite_endpoint))
        .route("/api/v1/marketplace/compare/:id", post(compare_toggle_endpoint))
        .route(
            "/api/v1/marketplace/compare",
            get(comparison_endpoint).delete(clear_compare_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let load_state = state.session.read().store().state().clone();
    let payload = if ready {
        json!({ "status": "ready", "listings": load_state })
    } else {
        json!({ "status": "initializing", "listings": load_state })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Query keys map onto [`FilterConfig::from_params`]; `sort` selects the order.
/// Unknown sort keys fall back to the default order.
pub(crate) async fn listings_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<SessionSnapshot> {
    let sort = params
        .get("sort")
        .and_then(|raw| raw.parse::<SortKey>().ok())
        .unwrap_or_default();
    let filters = FilterConfig::from_params(params.iter().filter(|(key, _)| *key != "sort"));

    let mut session = state.session.write();
    session.set_filters(filters);
    session.set_sort(sort);
    Json(session.snapshot())
}

pub(crate) async fn reload_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    match reload(&state).await {
        LoadOutcome::Applied { count, source } => {
            info!(count, source = source.label(), "listings reloaded");
            (
                StatusCode::OK,
                Json(json!({ "status": "applied", "count": count, "source": source })),
            )
        }
        LoadOutcome::Stale => (StatusCode::OK, Json(json!({ "status": "stale" }))),
        LoadOutcome::Failed { message } => {
            warn!(error = %message, "listing reload failed");
            let listings: LoadState = state.session.read().store().state().clone();
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": message, "listings": listings })),
            )
        }
    }
}

pub(crate) async fn favorite_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Json<FavoriteResponse> {
    let id = ListingId::new(id);
    let mut session = state.session.write();
    let change = session.toggle_favorite(&id);
    let is_favorite = session.is_favorite(&id);
    Json(FavoriteResponse {
        id,
        change,
        is_favorite,
    })
}

/// A full compare set is reported with `capacity_exceeded` rather than an error status.
pub(crate) async fn compare_toggle_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Json<CompareToggleResponse> {
    let id = ListingId::new(id);
    let mut session = state.session.write();
    let (change, capacity_exceeded) = match session.toggle_compare(&id) {
        Ok(change) => (Some(change), false),
        Err(SelectionError::CapacityExceeded { limit }) => {
            info!(id = %id, limit, "compare set full");
            (None, true)
        }
    };

    Json(CompareToggleResponse {
        id,
        change,
        capacity_exceeded,
        compare: session.selections().compare_ids().to_vec(),
    })
}

pub(crate) async fn comparison_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<ComparisonResponse> {
    let session = state.session.read();
    Json(ComparisonResponse {
        ids: session.selections().compare_ids().to_vec(),
        entries: session.comparison(),
    })
}

pub(crate) async fn clear_compare_endpoint(
    Extension(state): Extension<AppState>,
) -> StatusCode {
    state.session.write().clear_compare();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::seed_demo;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use laundromat_market::marketplace::MarketplaceSession;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use parking_lot::RwLock;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app(ready: bool) -> (Router, AppState) {
        let mut session = MarketplaceSession::new();
        session.store_mut().load(vec![
            json!({"id": "a", "location": "Tampa, FL", "askingPrice": 100000, "roi": 30, "verified": true}),
            json!({"id": "b", "location": "Austin, TX", "askingPrice": 200000, "roi": 10}),
            json!({"id": "c", "location": "Phoenix, AZ", "askingPrice": 300000, "roi": 25, "status": "pending"}),
            json!({"id": "d", "location": "Columbus, OH", "askingPrice": 150000, "roi": 18}),
        ]);

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            session: Arc::new(RwLock::new(session)),
            loader: None,
        };
        let app = marketplace_router().layer(Extension(state.clone()));
        (app, state)
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    fn ids(body: &Value) -> Vec<String> {
        body["listings"]
            .as_array()
            .expect("listings array")
            .iter()
            .map(|card| card["listing"]["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn listings_apply_query_filters_and_sort() {
        let (app, _) = test_app(true);
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/marketplace/listings?minRoi=15&sort=roi-desc",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), ["a", "c", "d"]);
        assert_eq!(body["stats"]["total_count"], 3);
        assert_eq!(body["view"]["sort"], "roi-desc");
    }

    #[tokio::test]
    async fn unknown_sort_falls_back_to_default() {
        let (app, _) = test_app(true);
        let (status, body) =
            send(&app, Method::GET, "/api/v1/marketplace/listings?sort=cheapest").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["sort"], "newest");
        assert_eq!(ids(&body).len(), 4);
    }

    #[tokio::test]
    async fn compare_capacity_is_reported_without_changing_the_set() {
        let (app, state) = test_app(true);
        for id in ["a", "b", "c"] {
            let (_, body) =
                send(&app, Method::POST, &format!("/api/v1/marketplace/compare/{id}")).await;
            assert_eq!(body["capacity_exceeded"], false);
            assert_eq!(body["change"], "added");
        }

        let (status, body) = send(&app, Method::POST, "/api/v1/marketplace/compare/d").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["capacity_exceeded"], true);
        assert_eq!(body["compare"], json!(["a", "b", "c"]));
        assert_eq!(state.session.read().selections().compare_ids().len(), 3);

        let (_, table) = send(&app, Method::GET, "/api/v1/marketplace/compare").await;
        let entries = table["entries"].as_array().expect("entries");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["asking_price_display"], "$100,000");

        let (status, _) = send(&app, Method::DELETE, "/api/v1/marketplace/compare").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.session.read().selections().compare_ids().is_empty());
    }

    #[tokio::test]
    async fn favorites_toggle_and_decorate_cards() {
        let (app, _) = test_app(true);
        let (_, body) = send(&app, Method::POST, "/api/v1/marketplace/favorites/b").await;
        assert_eq!(body["change"], "added");
        assert_eq!(body["is_favorite"], true);

        let (_, listings) = send(&app, Method::GET, "/api/v1/marketplace/listings?search=austin").await;
        assert_eq!(listings["listings"][0]["is_favorite"], true);

        let (_, body) = send(&app, Method::POST, "/api/v1/marketplace/favorites/b").await;
        assert_eq!(body["change"], "removed");
        assert_eq!(body["is_favorite"], false);
    }

    #[tokio::test]
    async fn reload_without_upstream_reseeds_demo_listings() {
        let (app, state) = test_app(true);
        let (status, body) = send(&app, Method::POST, "/api/v1/marketplace/reload").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "applied");
        assert_eq!(body["source"], "demo");

        let mut expected = MarketplaceSession::new();
        seed_demo(&mut expected);
        assert_eq!(
            state.session.read().store().len(),
            expected.store().len()
        );
    }

    #[tokio::test]
    async fn readiness_reports_load_state() {
        let (app, _) = test_app(false);
        let (status, body) = send(&app, Method::GET, "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");
        assert_eq!(body["listings"]["state"], "ready");
    }
}
