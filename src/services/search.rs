use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{AgeGroup, RankedVideo},
    services::{
        preferences::{filter_by_min_duration, PreferenceService},
        providers::VideoProvider,
    },
};

#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub age_group: Option<AgeGroup>,
    /// Zero disables the duration floor
    pub min_duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub enhanced_query: String,
    pub results: Vec<RankedVideo>,
}

/// Personalized video search
///
/// Enhances the query, fetches candidates, drops blocked channels and short
/// videos, ranks by relevance and keeps the best `max_results`.
#[derive(Clone)]
pub struct SearchService {
    preferences: PreferenceService,
    provider: Arc<dyn VideoProvider>,
    fetch_limit: u32,
    max_results: usize,
}

impl SearchService {
    pub fn new(
        preferences: PreferenceService,
        provider: Arc<dyn VideoProvider>,
        fetch_limit: u32,
        max_results: usize,
    ) -> Self {
        Self {
            preferences,
            provider,
            fetch_limit,
            max_results,
        }
    }

    pub async fn search(&self, request: SearchRequest) -> AppResult<SearchResults> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let enhanced_query = self
            .preferences
            .enhance_search_query(query, request.age_group)
            .await?;

        let candidates = self
            .provider
            .search_videos(&enhanced_query, self.fetch_limit)
            .await?;
        let fetched = candidates.len();

        let allowed = self.preferences.filter_search_results(candidates).await?;
        let allowed = filter_by_min_duration(allowed, u64::from(request.min_duration_minutes) * 60);

        let mut results = self.preferences.rank_search_results(allowed).await?;
        results.truncate(self.max_results);

        tracing::info!(
            query = %query,
            enhanced_query = %enhanced_query,
            provider = self.provider.name(),
            fetched,
            returned = results.len(),
            "Search completed"
        );

        Ok(SearchResults {
            query: query.to_string(),
            enhanced_query,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{HistoryStore, MockHistoryStore},
        models::{ApprovedVideo, BlockedChannel, ChannelRecord, VideoRecord},
        services::providers::MockVideoProvider,
    };
    use chrono::Utc;
    use mockall::predicate::eq;
    use tokio_test::assert_err;

    fn video(id: &str, title: &str, channel_id: &str, seconds: u64) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: title.to_string(),
            channel: format!("Channel {}", channel_id),
            channel_id: Some(channel_id.to_string()),
            duration_seconds: Some(seconds),
            ..Default::default()
        }
    }

    fn store() -> Arc<dyn HistoryStore> {
        let approved = vec![ApprovedVideo {
            video: video("a1", "Динозавры", "fav", 300),
            approved_at: Utc::now(),
        }];
        let blocked_channels = vec![BlockedChannel {
            channel: ChannelRecord::new("bad", "Bad Channel"),
            blocked_at: Utc::now(),
        }];

        let mut store = MockHistoryStore::new();
        store
            .expect_get_approved_videos()
            .returning(move || Ok(approved.clone()));
        store.expect_get_blocked_videos().returning(|| Ok(vec![]));
        store
            .expect_get_blocked_channels()
            .returning(move || Ok(blocked_channels.clone()));
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_search_pipeline() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_search_videos()
            .with(
                eq("рисование educational kids preschool динозавры"),
                eq(20),
            )
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    video("1", "Рисуем цветы", "other", 600),
                    video("2", "Рисуем динозавра", "bad", 600),
                    video("3", "Рисуем с мамой", "fav", 600),
                    video("4", "Короткое видео", "other", 60),
                    video("5", "Динозавры и краски", "other", 600),
                ])
            });
        provider.expect_name().return_const("mock");

        let service = SearchService::new(PreferenceService::new(store()), Arc::new(provider), 20, 10);

        let results = service
            .search(SearchRequest {
                query: "рисование".to_string(),
                age_group: Some(AgeGroup::Preschool),
                min_duration_minutes: 5,
            })
            .await
            .unwrap();

        let ids: Vec<&str> = results.results.iter().map(|r| r.video.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "5", "1"]);
        assert_eq!(results.results[0].relevance_score, 10);
        assert_eq!(results.results[1].relevance_score, 2);
        assert_eq!(
            results.enhanced_query,
            "рисование educational kids preschool динозавры"
        );
    }

    #[tokio::test]
    async fn test_search_truncates_to_max_results() {
        let mut provider = MockVideoProvider::new();
        provider.expect_search_videos().returning(|_, _| {
            Ok((0..20)
                .map(|i| video(&i.to_string(), "Урок", "other", 600))
                .collect())
        });
        provider.expect_name().return_const("mock");

        let service = SearchService::new(PreferenceService::new(store()), Arc::new(provider), 20, 10);

        let results = service
            .search(SearchRequest {
                query: "урок".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(results.results.len(), 10);
        assert_eq!(results.results[0].video.id, "0");
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let provider = MockVideoProvider::new();
        let service = SearchService::new(
            PreferenceService::new(Arc::new(MockHistoryStore::new())),
            Arc::new(provider),
            20,
            10,
        );

        let result = service
            .search(SearchRequest {
                query: "   ".to_string(),
                ..Default::default()
            })
            .await;

        let err = assert_err!(result);
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_search_videos()
            .returning(|_, _| Err(AppError::MissingApiKey));

        let service = SearchService::new(PreferenceService::new(store()), Arc::new(provider), 20, 10);

        let result = service
            .search(SearchRequest {
                query: "space".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::MissingApiKey)));
    }
}
