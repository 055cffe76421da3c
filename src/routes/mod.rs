use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    db::HistoryStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{providers::VideoProvider, PreferenceService, RecommendationService, SearchService},
};

pub mod library;
pub mod preferences;
pub mod recommendations;
pub mod videos;

/// Shared handler state
pub struct AppState {
    pub store: Arc<dyn HistoryStore>,
    pub provider: Arc<dyn VideoProvider>,
    pub preferences: PreferenceService,
    pub recommendations: RecommendationService,
    pub search: SearchService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn HistoryStore>,
        provider: Arc<dyn VideoProvider>,
        config: &Config,
    ) -> Self {
        let preferences = PreferenceService::new(store.clone());
        let recommendations = RecommendationService::new(
            preferences.clone(),
            provider.clone(),
            config.trending_fetch_limit,
        );
        let search = SearchService::new(
            preferences.clone(),
            provider.clone(),
            config.search_fetch_limit,
            config.max_results,
        );

        Self {
            store,
            provider,
            preferences,
            recommendations,
            search,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/preferences/channels", get(preferences::channels))
        .route("/preferences/keywords", get(preferences::keywords))
        .route("/preferences/blocked-keywords", get(preferences::blocked_keywords))
        .route("/preferences/categories", get(preferences::categories))
        .route(
            "/preferences/categories/personalized",
            get(preferences::personalized_categories),
        )
        .route("/preferences/relevance", post(preferences::relevance))
        .route("/preferences/rank", post(preferences::rank))
        .route("/preferences/filter", post(preferences::filter))
        .route("/search/enhance", get(preferences::enhance))
        .route("/videos/search", get(videos::search))
        .route("/videos/resolve", get(videos::resolve))
        .route("/videos/:id", get(videos::details))
        .route("/channels/:id", get(videos::channel))
        .route("/recommendations", get(recommendations::combined))
        .route("/recommendations/topics", get(recommendations::topics))
        .route("/recommendations/trending", get(recommendations::trending))
        .route(
            "/library/approved",
            get(library::approved).post(library::approve),
        )
        .route("/library/approved/:id", delete(library::remove_approved))
        .route("/library/blocked", get(library::blocked).post(library::block))
        .route("/library/blocked/:id", delete(library::remove_blocked))
        .route(
            "/library/blocked-channels",
            get(library::blocked_channels).post(library::block_channel),
        )
        .route(
            "/library/blocked-channels/:id",
            delete(library::unblock_channel),
        )
        .route(
            "/library/history",
            get(library::history)
                .post(library::record_watch)
                .delete(library::clear_history),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
