use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{AgeGroup, ChannelAffinity, CombinedRecommendations, Topic, VideoRecord},
    services::{keywords::extract_keywords, preferences::PreferenceService, providers::VideoProvider},
};

const KEYWORD_TOPIC_COUNT: usize = 5;
const CHANNEL_TOPIC_COUNT: usize = 3;
const TRENDING_KEYWORD_LIMIT: usize = 12;
/// Titles are repeated so their words outweigh incidental ones
const TRENDING_TITLE_WEIGHT: usize = 4;
const MIN_EXPECTED_TRENDING_KEYWORDS: usize = 5;

/// Keyword topics from the top keywords, then channel topics from the top channels
pub fn smart_topics(keywords: &[String], channels: &[ChannelAffinity]) -> Vec<Topic> {
    keywords
        .iter()
        .take(KEYWORD_TOPIC_COUNT)
        .map(|k| Topic::keyword(k))
        .chain(
            channels
                .iter()
                .take(CHANNEL_TOPIC_COUNT)
                .map(|c| Topic::channel(&c.id, &c.name)),
        )
        .collect()
}

/// Extracts trending topics from popular video titles
pub fn trending_topics(videos: &[VideoRecord]) -> Vec<Topic> {
    let text = videos
        .iter()
        .map(|v| vec![v.title.as_str(); TRENDING_TITLE_WEIGHT].join(" "))
        .collect::<Vec<_>>()
        .join(" ");

    extract_keywords(&text, TRENDING_KEYWORD_LIMIT)
        .iter()
        .map(|k| Topic::trending(k))
        .collect()
}

/// Builds topic suggestions from family history and platform trends
#[derive(Clone)]
pub struct RecommendationService {
    preferences: PreferenceService,
    provider: Arc<dyn VideoProvider>,
    trending_fetch_limit: u32,
}

impl RecommendationService {
    pub fn new(
        preferences: PreferenceService,
        provider: Arc<dyn VideoProvider>,
        trending_fetch_limit: u32,
    ) -> Self {
        Self {
            preferences,
            provider,
            trending_fetch_limit,
        }
    }

    pub async fn generate_smart_topics(&self) -> AppResult<Vec<Topic>> {
        let keywords = self.preferences.preferred_keywords().await?;
        let channels = self.preferences.preferred_channels().await?;
        Ok(smart_topics(&keywords, &channels))
    }

    /// Trending topics for an age band.
    ///
    /// Provider failures and empty samples yield an empty list.
    pub async fn trending_topics_for_age(&self, age_group: AgeGroup) -> Vec<Topic> {
        let videos = match self
            .provider
            .trending_videos_for_age(age_group, self.trending_fetch_limit)
            .await
        {
            Ok(videos) => videos,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    age_group = %age_group,
                    provider = self.provider.name(),
                    "Trending fetch failed, returning no trending topics"
                );
                return Vec::new();
            }
        };

        tracing::info!(age_group = %age_group, videos = videos.len(), "Fetched trending videos");

        if videos.is_empty() {
            tracing::warn!(age_group = %age_group, "No trending videos for age group");
            return Vec::new();
        }

        let topics = trending_topics(&videos);
        if topics.len() < MIN_EXPECTED_TRENDING_KEYWORDS {
            tracing::warn!(
                age_group = %age_group,
                keywords = topics.len(),
                "Few trending keywords extracted"
            );
        }

        topics
    }

    /// Personal and trending topics computed concurrently
    pub async fn combined_recommendations(
        &self,
        age_group: AgeGroup,
    ) -> AppResult<CombinedRecommendations> {
        let (personal, trending) = tokio::join!(
            self.generate_smart_topics(),
            self.trending_topics_for_age(age_group)
        );

        Ok(CombinedRecommendations::new(personal?, trending))
    }
}
