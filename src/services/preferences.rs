//! Preference aggregation and relevance scoring over a family's history.
//!
//! The free functions are pure transforms of history slices. [`PreferenceService`]
//! fetches fresh history from the [`HistoryStore`] on every call and feeds it
//! through them; it keeps no state between calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    db::HistoryStore,
    error::AppResult,
    models::{
        AgeGroup, ChannelAffinity, ChannelRecord, CategoryScores, PersonalizedCategories,
        RankedVideo, VideoRecord,
    },
    services::{categories::score_categories, keywords::extract_keywords},
};

pub const PREFERRED_KEYWORD_LIMIT: usize = 20;
pub const BLOCKED_KEYWORD_LIMIT: usize = 15;
/// Approved videos needed before categories are personalized
pub const MIN_VIDEOS_FOR_PERSONALIZATION: usize = 5;

const KEYWORD_MATCH_BONUS: i64 = 2;
const PREFERRED_CHANNEL_BONUS: i64 = 10;
const BLOCKED_KEYWORD_PENALTY: i64 = 3;
const QUERY_SUFFIX: &str = "educational kids";

fn joined_text<V: AsRef<VideoRecord>>(videos: &[V]) -> String {
    videos
        .iter()
        .map(|v| v.as_ref().text())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Approved-video counts per channel, most approved first.
///
/// Videos without a channel id are skipped and blocked channels never appear.
/// Channels with equal counts keep the order they were first seen in.
pub fn preferred_channels<V, C>(approved: &[V], blocked_channels: &[C]) -> Vec<ChannelAffinity>
where
    V: AsRef<VideoRecord>,
    C: AsRef<ChannelRecord>,
{
    let blocked: HashSet<&str> = blocked_channels
        .iter()
        .map(|c| c.as_ref().id.as_str())
        .collect();

    let mut channels: Vec<ChannelAffinity> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for video in approved {
        let video = video.as_ref();
        let Some(channel_id) = video.channel_id() else {
            continue;
        };
        if blocked.contains(channel_id) {
            continue;
        }

        match positions.get(channel_id) {
            Some(&idx) => channels[idx].count += 1,
            None => {
                positions.insert(channel_id, channels.len());
                channels.push(ChannelAffinity {
                    id: channel_id.to_string(),
                    name: video.channel.clone(),
                    count: 1,
                });
            }
        }
    }

    channels.sort_by(|a, b| b.count.cmp(&a.count));
    channels
}

pub fn preferred_keywords<V: AsRef<VideoRecord>>(approved: &[V]) -> Vec<String> {
    extract_keywords(&joined_text(approved), PREFERRED_KEYWORD_LIMIT)
}

pub fn blocked_keywords<V: AsRef<VideoRecord>>(blocked: &[V]) -> Vec<String> {
    extract_keywords(&joined_text(blocked), BLOCKED_KEYWORD_LIMIT)
}

/// `None` until there are at least [`MIN_VIDEOS_FOR_PERSONALIZATION`] approved videos
pub fn personalized_categories<V: AsRef<VideoRecord>>(
    approved: &[V],
) -> Option<PersonalizedCategories> {
    if approved.len() < MIN_VIDEOS_FOR_PERSONALIZATION {
        return None;
    }

    let scores = score_categories(approved);
    Some(PersonalizedCategories {
        top_categories: scores.ranked(),
        scores,
        has_enough_data: true,
    })
}

/// Everything relevance scoring needs, derived once from history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceProfile {
    pub preferred_keywords: Vec<String>,
    pub preferred_channel_ids: HashSet<String>,
    pub blocked_keywords: Vec<String>,
}

impl RelevanceProfile {
    pub fn from_history<A, B, C>(approved: &[A], blocked: &[B], blocked_channels: &[C]) -> Self
    where
        A: AsRef<VideoRecord>,
        B: AsRef<VideoRecord>,
        C: AsRef<ChannelRecord>,
    {
        Self {
            preferred_keywords: preferred_keywords(approved),
            preferred_channel_ids: preferred_channels(approved, blocked_channels)
                .into_iter()
                .map(|c| c.id)
                .collect(),
            blocked_keywords: blocked_keywords(blocked),
        }
    }

    /// +2 per preferred keyword in the text, +10 for a preferred channel,
    /// -3 per blocked keyword, floored at zero.
    pub fn score(&self, video: &VideoRecord) -> u32 {
        let text = video.search_text();

        let keyword_hits = self
            .preferred_keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count() as i64;
        let blocked_hits = self
            .blocked_keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count() as i64;
        let channel_bonus = match video.channel_id() {
            Some(id) if self.preferred_channel_ids.contains(id) => PREFERRED_CHANNEL_BONUS,
            _ => 0,
        };

        let score = keyword_hits * KEYWORD_MATCH_BONUS + channel_bonus
            - blocked_hits * BLOCKED_KEYWORD_PENALTY;

        u32::try_from(score.max(0)).unwrap_or(u32::MAX)
    }

    /// Scores every video and sorts by score, highest first; ties keep input order
    pub fn rank(&self, videos: Vec<VideoRecord>) -> Vec<RankedVideo> {
        let mut ranked: Vec<RankedVideo> = videos
            .into_iter()
            .map(|video| RankedVideo {
                relevance_score: self.score(&video),
                video,
            })
            .collect();

        ranked.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        ranked
    }
}

/// Appends the educational suffix, the age phrase and the first preferred
/// keyword the query does not already contain.
pub fn enhance_query(query: &str, age_group: Option<AgeGroup>, preferred_keywords: &[String]) -> String {
    let mut enhanced = format!("{} {}", query, QUERY_SUFFIX);

    if let Some(age_group) = age_group {
        enhanced.push(' ');
        enhanced.push_str(age_group.search_phrase());
    }

    let lowered = query.to_lowercase();
    if let Some(keyword) = preferred_keywords
        .iter()
        .find(|k| !lowered.contains(k.as_str()))
    {
        enhanced.push(' ');
        enhanced.push_str(keyword);
    }

    enhanced.trim().to_string()
}

/// Drops videos from blocked channels, keeping the order of the rest
pub fn filter_blocked<C: AsRef<ChannelRecord>>(
    videos: Vec<VideoRecord>,
    blocked_channels: &[C],
) -> Vec<VideoRecord> {
    let blocked: HashSet<&str> = blocked_channels
        .iter()
        .map(|c| c.as_ref().id.as_str())
        .collect();

    videos
        .into_iter()
        .filter(|v| v.channel_id().map_or(true, |id| !blocked.contains(id)))
        .collect()
}

/// Drops videos shorter than `min_seconds`; zero disables the floor.
///
/// Videos whose duration is unknown are kept.
pub fn filter_by_min_duration(videos: Vec<VideoRecord>, min_seconds: u64) -> Vec<VideoRecord> {
    if min_seconds == 0 {
        return videos;
    }

    videos
        .into_iter()
        .filter(|v| v.duration_secs().map_or(true, |secs| secs >= min_seconds))
        .collect()
}

/// Preference engine bound to one family's history
#[derive(Clone)]
pub struct PreferenceService {
    store: Arc<dyn HistoryStore>,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    pub async fn preferred_channels(&self) -> AppResult<Vec<ChannelAffinity>> {
        let approved = self.store.get_approved_videos().await?;
        let blocked_channels = self.store.get_blocked_channels().await?;

        let channels = preferred_channels(&approved, &blocked_channels);
        tracing::debug!(
            approved = approved.len(),
            channels = channels.len(),
            "Computed preferred channels"
        );
        Ok(channels)
    }

    pub async fn preferred_keywords(&self) -> AppResult<Vec<String>> {
        let approved = self.store.get_approved_videos().await?;
        Ok(preferred_keywords(&approved))
    }

    pub async fn blocked_keywords(&self) -> AppResult<Vec<String>> {
        let blocked = self.store.get_blocked_videos().await?;
        Ok(blocked_keywords(&blocked))
    }

    pub async fn category_preferences(&self) -> AppResult<CategoryScores> {
        let approved = self.store.get_approved_videos().await?;
        Ok(score_categories(&approved))
    }

    pub async fn personalized_categories(&self) -> AppResult<Option<PersonalizedCategories>> {
        let approved = self.store.get_approved_videos().await?;
        Ok(personalized_categories(&approved))
    }

    /// Fetches history once and builds the scoring profile
    pub async fn relevance_profile(&self) -> AppResult<RelevanceProfile> {
        let approved = self.store.get_approved_videos().await?;
        let blocked = self.store.get_blocked_videos().await?;
        let blocked_channels = self.store.get_blocked_channels().await?;

        Ok(RelevanceProfile::from_history(
            &approved,
            &blocked,
            &blocked_channels,
        ))
    }

    pub async fn calculate_video_relevance(&self, video: &VideoRecord) -> AppResult<u32> {
        let profile = self.relevance_profile().await?;
        Ok(profile.score(video))
    }

    pub async fn rank_search_results(&self, videos: Vec<VideoRecord>) -> AppResult<Vec<RankedVideo>> {
        let profile = self.relevance_profile().await?;
        Ok(profile.rank(videos))
    }

    pub async fn filter_search_results(&self, videos: Vec<VideoRecord>) -> AppResult<Vec<VideoRecord>> {
        let blocked_channels = self.store.get_blocked_channels().await?;
        let before = videos.len();
        let filtered = filter_blocked(videos, &blocked_channels);

        tracing::debug!(
            before,
            after = filtered.len(),
            "Filtered blocked channels from results"
        );
        Ok(filtered)
    }

    pub async fn enhance_search_query(
        &self,
        query: &str,
        age_group: Option<AgeGroup>,
    ) -> AppResult<String> {
        let keywords = self.preferred_keywords().await?;
        Ok(enhance_query(query, age_group, &keywords))
    }
}
