/// Video platform abstraction
///
/// The preference engine never talks to a video platform directly. Searches,
/// trending samples and detail lookups go through [`VideoProvider`] so the
/// platform client can be swapped or mocked.
use crate::{
    error::AppResult,
    models::{AgeGroup, ChannelRecord, VideoRecord},
};

pub mod youtube;

pub use youtube::YouTubeProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoProvider: Send + Sync {
    /// Searches child-safe videos matching the query
    ///
    /// May fail with quota, invalid-query or unconfigured-key errors.
    async fn search_videos(&self, query: &str, limit: u32) -> AppResult<Vec<VideoRecord>>;

    /// Currently popular videos for an age band
    async fn trending_videos_for_age(
        &self,
        age_group: AgeGroup,
        limit: u32,
    ) -> AppResult<Vec<VideoRecord>>;

    async fn video_details(&self, video_id: &str) -> AppResult<VideoRecord>;

    async fn channel_info(&self, channel_id: &str) -> AppResult<ChannelRecord>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
