use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    format::{extract_video_id, is_valid_youtube_url},
    models::{AgeGroup, ChannelRecord, VideoRecord},
    services::{SearchRequest, SearchResults},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    age_group: Option<String>,
    /// Minutes; absent or zero means no floor
    min_duration: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    url: String,
}

/// Personalized search: enhance, fetch, filter, rank
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResults>> {
    let request = SearchRequest {
        query: params.q,
        age_group: AgeGroup::parse_lenient(params.age_group.as_deref()),
        min_duration_minutes: params.min_duration.unwrap_or(0),
    };

    Ok(Json(state.search.search(request).await?))
}

/// Looks up the video behind a pasted YouTube link
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> AppResult<Json<VideoRecord>> {
    if !is_valid_youtube_url(&params.url) {
        return Err(AppError::InvalidInput("Not a valid YouTube link".to_string()));
    }
    let video_id = extract_video_id(&params.url).ok_or_else(|| {
        AppError::InvalidInput("No video id found in the link".to_string())
    })?;

    Ok(Json(state.provider.video_details(&video_id).await?))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<VideoRecord>> {
    Ok(Json(state.provider.video_details(&id).await?))
}

pub async fn channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<ChannelRecord>> {
    Ok(Json(state.provider.channel_info(&id).await?))
}
