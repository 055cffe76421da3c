/// YouTube Data API v3 provider
///
/// Searches are restricted to embeddable videos in the Education category with
/// strict safe search. Every search is a two-step flow:
/// 1. `/search` returns ids and snippets
/// 2. `/videos` returns durations and view counts for those ids
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    format::{format_duration, parse_iso8601_duration},
    models::{AgeGroup, ChannelRecord, VideoRecord},
    services::providers::VideoProvider,
};
use chrono::{SecondsFormat, Utc};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const TRENDING_CACHE_TTL: u64 = 21600; // 6 hours
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const EDUCATION_CATEGORY_ID: &str = "27";
const MAX_PAGE_SIZE: u32 = 50;
const TRENDING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
struct ApiSearchResponse {
    #[serde(default)]
    items: Vec<ApiSearchItem>,
}

#[derive(Debug, Deserialize)]
struct ApiSearchItem {
    id: ApiSearchId,
    snippet: ApiSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSearchId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: ApiThumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct ApiThumbnails {
    medium: Option<ApiThumbnail>,
    default: Option<ApiThumbnail>,
}

impl ApiThumbnails {
    fn best_url(self) -> Option<String> {
        self.medium.or(self.default).map(|t| t.url)
    }
}

#[derive(Debug, Deserialize)]
struct ApiThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiVideosResponse {
    #[serde(default)]
    items: Vec<ApiVideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiVideoItem {
    id: String,
    #[serde(default)]
    snippet: Option<ApiSnippet>,
    #[serde(default)]
    content_details: Option<ApiContentDetails>,
    #[serde(default)]
    statistics: Option<ApiStatistics>,
}

#[derive(Debug, Deserialize)]
struct ApiContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiStatistics {
    #[serde(default)]
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChannelsResponse {
    #[serde(default)]
    items: Vec<ApiChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ApiChannelItem {
    id: String,
    snippet: ApiChannelSnippet,
    #[serde(default)]
    statistics: Option<ApiChannelStatistics>,
}

#[derive(Debug, Deserialize)]
struct ApiChannelSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiChannelStatistics {
    #[serde(default)]
    subscriber_count: Option<String>,
}

/// Duration/view details keyed by video id
struct VideoStats {
    duration_seconds: Option<u64>,
    view_count: Option<u64>,
}

fn video_from_snippet(id: String, snippet: ApiSnippet) -> VideoRecord {
    VideoRecord {
        id,
        title: snippet.title,
        description: Some(snippet.description),
        channel: snippet.channel_title,
        channel_id: Some(snippet.channel_id).filter(|c| !c.is_empty()),
        thumbnail: snippet.thumbnails.best_url(),
        duration: None,
        duration_seconds: None,
        view_count: None,
        published_at: snippet.published_at,
    }
}

fn video_from_search_item(item: ApiSearchItem) -> Option<VideoRecord> {
    let id = item.id.video_id?;
    Some(video_from_snippet(id, item.snippet))
}

fn stats_from_item(item: &ApiVideoItem) -> VideoStats {
    VideoStats {
        duration_seconds: item
            .content_details
            .as_ref()
            .and_then(|d| parse_iso8601_duration(&d.duration)),
        view_count: item
            .statistics
            .as_ref()
            .and_then(|s| s.view_count.as_deref())
            .and_then(|v| v.parse().ok()),
    }
}

fn apply_stats(video: &mut VideoRecord, stats: &VideoStats) {
    video.duration_seconds = stats.duration_seconds;
    video.duration = stats.duration_seconds.map(format_duration);
    video.view_count = stats.view_count;
}

/// Attaches durations and view counts to search results, keeping result order
fn merge_details(videos: &mut [VideoRecord], details: &[ApiVideoItem]) {
    let stats: HashMap<&str, VideoStats> = details
        .iter()
        .map(|item| (item.id.as_str(), stats_from_item(item)))
        .collect();

    for video in videos.iter_mut() {
        if let Some(s) = stats.get(video.id.as_str()) {
            apply_stats(video, s);
        }
    }
}

fn video_from_details_item(item: ApiVideoItem) -> Option<VideoRecord> {
    let stats = stats_from_item(&item);
    let mut video = video_from_snippet(item.id, item.snippet?);
    apply_stats(&mut video, &stats);
    Some(video)
}

fn channel_from_item(item: ApiChannelItem) -> ChannelRecord {
    ChannelRecord {
        id: item.id,
        name: item.snippet.title,
        subscriber_count: item
            .statistics
            .and_then(|s| s.subscriber_count)
            .and_then(|c| c.parse().ok()),
    }
}

/// Maps a failed YouTube response onto the error taxonomy
fn error_for_status(status: StatusCode, body: &str) -> AppError {
    match status {
        StatusCode::FORBIDDEN => {
            AppError::QuotaExceeded("YouTube API quota exceeded or invalid API key".to_string())
        }
        StatusCode::BAD_REQUEST => AppError::InvalidInput("Invalid search query".to_string()),
        _ => AppError::ExternalApi(format!("API returned status {}: {}", status, body)),
    }
}

async fn ensure_success(response: reqwest::Response) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(status = %status, body = %body, "YouTube API request failed");
    Err(error_for_status(status, &body))
}

#[derive(Clone)]
pub struct YouTubeProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl YouTubeProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    fn ensure_configured(&self) -> AppResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }
        Ok(())
    }

    async fn fetch_video_items(&self, ids: &str, part: &str) -> AppResult<Vec<ApiVideoItem>> {
        let url = format!("{}/videos", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("part", part), ("id", ids), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let videos: ApiVideosResponse = ensure_success(response).await?.json().await?;
        Ok(videos.items)
    }

    /// Runs `/search` with the safe-search defaults plus `params`, then fills in details
    async fn search_with_details(&self, params: &[(&str, String)]) -> AppResult<Vec<VideoRecord>> {
        let url = format!("{}/search", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("safeSearch", "strict"),
                ("videoEmbeddable", "true"),
                ("videoCategoryId", EDUCATION_CATEGORY_ID),
                ("key", self.api_key.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let search: ApiSearchResponse = ensure_success(response).await?.json().await?;
        let mut videos: Vec<VideoRecord> = search
            .items
            .into_iter()
            .filter_map(video_from_search_item)
            .collect();

        if videos.is_empty() {
            return Ok(videos);
        }

        let ids = videos
            .iter()
            .map(|v| v.id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let details = self
            .fetch_video_items(&ids, "contentDetails,statistics")
            .await?;
        merge_details(&mut videos, &details);

        Ok(videos)
    }
}

#[async_trait::async_trait]
impl VideoProvider for YouTubeProvider {
    async fn search_videos(&self, query: &str, limit: u32) -> AppResult<Vec<VideoRecord>> {
        self.ensure_configured()?;
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::VideoSearch {
                query: query.to_string(),
                limit,
            },
            SEARCH_CACHE_TTL,
            async move {
                let videos = self
                    .search_with_details(&[
                        ("q", query.to_string()),
                        ("maxResults", limit.min(MAX_PAGE_SIZE).to_string()),
                    ])
                    .await?;

                tracing::info!(
                    query = %query,
                    results = videos.len(),
                    provider = "youtube",
                    "Video search completed"
                );

                Ok::<_, AppError>(videos)
            }
        )
    }

    async fn trending_videos_for_age(
        &self,
        age_group: AgeGroup,
        limit: u32,
    ) -> AppResult<Vec<VideoRecord>> {
        self.ensure_configured()?;

        cached!(
            self.cache,
            CacheKey::Trending { age_group, limit },
            TRENDING_CACHE_TTL,
            async move {
                let published_after = (Utc::now() - chrono::Duration::days(TRENDING_WINDOW_DAYS))
                    .to_rfc3339_opts(SecondsFormat::Secs, true);

                let videos = self
                    .search_with_details(&[
                        ("q", age_group.trending_query().to_string()),
                        ("maxResults", limit.min(MAX_PAGE_SIZE).to_string()),
                        ("order", "viewCount".to_string()),
                        ("publishedAfter", published_after),
                    ])
                    .await?;

                tracing::info!(
                    age_group = %age_group,
                    results = videos.len(),
                    provider = "youtube",
                    "Trending videos fetched"
                );

                Ok::<_, AppError>(videos)
            }
        )
    }

    async fn video_details(&self, video_id: &str) -> AppResult<VideoRecord> {
        self.ensure_configured()?;

        cached!(
            self.cache,
            CacheKey::VideoDetails(video_id.to_string()),
            DETAILS_CACHE_TTL,
            async move {
                let items = self
                    .fetch_video_items(video_id, "snippet,contentDetails,statistics")
                    .await?;

                items
                    .into_iter()
                    .next()
                    .and_then(video_from_details_item)
                    .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
            }
        )
    }

    async fn channel_info(&self, channel_id: &str) -> AppResult<ChannelRecord> {
        self.ensure_configured()?;

        cached!(
            self.cache,
            CacheKey::ChannelInfo(channel_id.to_string()),
            DETAILS_CACHE_TTL,
            async move {
                let url = format!("{}/channels", self.api_url);
                let response = self
                    .http_client
                    .get(&url)
                    .query(&[
                        ("part", "snippet,statistics"),
                        ("id", channel_id),
                        ("key", self.api_key.as_str()),
                    ])
                    .send()
                    .await?;

                let channels: ApiChannelsResponse = ensure_success(response).await?.json().await?;

                channels
                    .items
                    .into_iter()
                    .next()
                    .map(channel_from_item)
                    .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))
            }
        )
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn create_test_provider(api_key: &str) -> YouTubeProvider {
        YouTubeProvider::new(
            Cache::new(redis::Client::open("redis://localhost:6379").unwrap())
                .await
                .0,
            api_key.to_string(),
            "http://test.local".to_string(),
        )
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let provider = create_test_provider("").await;

        let result = provider.search_videos("science", 10).await;
        assert!(matches!(result, Err(AppError::MissingApiKey)));

        let result = provider
            .trending_videos_for_age(AgeGroup::Preschool, 25)
            .await;
        assert!(matches!(result, Err(AppError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_cache_outage_reaches_the_api() {
        let provider = YouTubeProvider::new(
            Cache::new(redis::Client::open("redis://127.0.0.1:1").unwrap())
                .await
                .0,
            "test-key".to_string(),
            "http://127.0.0.1:1".to_string(),
        );

        let result = provider.search_videos("science", 10).await;

        // The cache miss falls through to the HTTP call, which then fails
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }

    #[test]
    fn test_search_item_conversion() {
        let response: ApiSearchResponse = serde_json::from_value(json!({
            "items": [
                {
                    "id": { "kind": "youtube#video", "videoId": "abc123def45" },
                    "snippet": {
                        "title": "Учим цифры",
                        "description": "Счет до 10",
                        "channelTitle": "Kids Channel",
                        "channelId": "UC1",
                        "publishedAt": "2024-05-01T10:00:00Z",
                        "thumbnails": {
                            "default": { "url": "https://i.ytimg.com/default.jpg" },
                            "medium": { "url": "https://i.ytimg.com/medium.jpg" }
                        }
                    }
                },
                {
                    "id": { "kind": "youtube#channel", "channelId": "UC2" },
                    "snippet": { "title": "A channel result" }
                }
            ]
        }))
        .unwrap();

        let videos: Vec<VideoRecord> = response
            .items
            .into_iter()
            .filter_map(video_from_search_item)
            .collect();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "abc123def45");
        assert_eq!(videos[0].channel, "Kids Channel");
        assert_eq!(videos[0].channel_id(), Some("UC1"));
        assert_eq!(
            videos[0].thumbnail.as_deref(),
            Some("https://i.ytimg.com/medium.jpg")
        );
    }

    #[test]
    fn test_merge_details_attaches_duration_and_views() {
        let mut videos = vec![
            VideoRecord {
                id: "a".into(),
                ..Default::default()
            },
            VideoRecord {
                id: "b".into(),
                ..Default::default()
            },
        ];

        let details: ApiVideosResponse = serde_json::from_value(json!({
            "items": [
                {
                    "id": "b",
                    "contentDetails": { "duration": "PT1H2M10S" },
                    "statistics": { "viewCount": "1500" }
                }
            ]
        }))
        .unwrap();

        merge_details(&mut videos, &details.items);

        assert_eq!(videos[0].duration_seconds, None);
        assert_eq!(videos[1].duration_seconds, Some(3730));
        assert_eq!(videos[1].duration.as_deref(), Some("1:02:10"));
        assert_eq!(videos[1].view_count, Some(1500));
    }

    #[test]
    fn test_details_item_without_snippet_is_skipped() {
        let details: ApiVideosResponse =
            serde_json::from_value(json!({ "items": [ { "id": "x" } ] })).unwrap();
        let video = details.items.into_iter().next().and_then(video_from_details_item);
        assert!(video.is_none());
    }

    #[test]
    fn test_channel_conversion() {
        let channels: ApiChannelsResponse = serde_json::from_value(json!({
            "items": [
                {
                    "id": "UC1",
                    "snippet": { "title": "Kids Channel" },
                    "statistics": { "subscriberCount": "25000" }
                }
            ]
        }))
        .unwrap();

        let channel = channel_from_item(channels.items.into_iter().next().unwrap());
        assert_eq!(channel.id, "UC1");
        assert_eq!(channel.name, "Kids Channel");
        assert_eq!(channel.subscriber_count, Some(25000));
    }

    #[test]
    fn test_error_for_status() {
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN, ""),
            AppError::QuotaExceeded(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::BAD_REQUEST, ""),
            AppError::InvalidInput(_)
        ));

        let err = error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(err.to_string().contains("boom"));
    }
}
