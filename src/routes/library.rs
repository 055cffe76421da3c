use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{ApprovedVideo, BlockedChannel, BlockedVideo, ChannelRecord, HistoryEntry, VideoRecord},
};

use super::AppState;

pub async fn approved(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<ApprovedVideo>>> {
    Ok(Json(state.store.get_approved_videos().await?))
}

pub async fn approve(
    State(state): State<Arc<AppState>>,
    Json(video): Json<VideoRecord>,
) -> AppResult<(StatusCode, Json<Vec<ApprovedVideo>>)> {
    let approved = state.store.approve_video(video).await?;
    Ok((StatusCode::CREATED, Json(approved)))
}

pub async fn remove_approved(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ApprovedVideo>>> {
    Ok(Json(state.store.remove_approved_video(&id).await?))
}

pub async fn blocked(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<BlockedVideo>>> {
    Ok(Json(state.store.get_blocked_videos().await?))
}

pub async fn block(
    State(state): State<Arc<AppState>>,
    Json(video): Json<VideoRecord>,
) -> AppResult<(StatusCode, Json<Vec<BlockedVideo>>)> {
    let blocked = state.store.block_video(video).await?;
    Ok((StatusCode::CREATED, Json(blocked)))
}

pub async fn remove_blocked(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BlockedVideo>>> {
    Ok(Json(state.store.remove_blocked_video(&id).await?))
}

pub async fn blocked_channels(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<BlockedChannel>>> {
    Ok(Json(state.store.get_blocked_channels().await?))
}

pub async fn block_channel(
    State(state): State<Arc<AppState>>,
    Json(channel): Json<ChannelRecord>,
) -> AppResult<(StatusCode, Json<Vec<BlockedChannel>>)> {
    let blocked = state.store.block_channel(channel).await?;
    Ok((StatusCode::CREATED, Json(blocked)))
}

pub async fn unblock_channel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BlockedChannel>>> {
    Ok(Json(state.store.unblock_channel(&id).await?))
}

/// Newest first
pub async fn history(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(state.store.get_watch_history().await?))
}

pub async fn record_watch(
    State(state): State<Arc<AppState>>,
    Json(video): Json<VideoRecord>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(state.store.record_watch(video).await?))
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> AppResult<StatusCode> {
    state.store.clear_watch_history().await?;
    Ok(StatusCode::NO_CONTENT)
}
