use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        AgeGroup, CategoryScores, ChannelAffinity, PersonalizedCategories, RankedVideo,
        VideoRecord,
    },
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct EnhanceQuery {
    q: String,
    age_group: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnhancedQuery {
    query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceResponse {
    relevance_score: u32,
}

pub async fn channels(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<ChannelAffinity>>> {
    Ok(Json(state.preferences.preferred_channels().await?))
}

pub async fn keywords(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.preferences.preferred_keywords().await?))
}

pub async fn blocked_keywords(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.preferences.blocked_keywords().await?))
}

pub async fn categories(State(state): State<Arc<AppState>>) -> AppResult<Json<CategoryScores>> {
    Ok(Json(state.preferences.category_preferences().await?))
}

/// `null` until enough videos are approved
pub async fn personalized_categories(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Option<PersonalizedCategories>>> {
    Ok(Json(state.preferences.personalized_categories().await?))
}

pub async fn relevance(
    State(state): State<Arc<AppState>>,
    Json(video): Json<VideoRecord>,
) -> AppResult<Json<RelevanceResponse>> {
    let relevance_score = state.preferences.calculate_video_relevance(&video).await?;
    Ok(Json(RelevanceResponse { relevance_score }))
}

pub async fn rank(
    State(state): State<Arc<AppState>>,
    Json(videos): Json<Vec<VideoRecord>>,
) -> AppResult<Json<Vec<RankedVideo>>> {
    Ok(Json(state.preferences.rank_search_results(videos).await?))
}

pub async fn filter(
    State(state): State<Arc<AppState>>,
    Json(videos): Json<Vec<VideoRecord>>,
) -> AppResult<Json<Vec<VideoRecord>>> {
    Ok(Json(state.preferences.filter_search_results(videos).await?))
}

/// Unknown age groups are ignored rather than rejected
pub async fn enhance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EnhanceQuery>,
) -> AppResult<Json<EnhancedQuery>> {
    let age_group = AgeGroup::parse_lenient(params.age_group.as_deref());
    let query = state
        .preferences
        .enhance_search_query(&params.q, age_group)
        .await?;
    Ok(Json(EnhancedQuery { query }))
}
