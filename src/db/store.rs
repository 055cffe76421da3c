use crate::{
    error::AppResult,
    models::{
        ApprovedVideo, BlockedChannel, BlockedVideo, ChannelRecord, HistoryEntry, VideoRecord,
    },
};

/// Newest watch history entries kept per family
pub const WATCH_HISTORY_LIMIT: usize = 50;

/// Read/write access to one family's approval history
///
/// The preference engine only ever reads through this trait and re-fetches on
/// every call. Writes mirror what the parent dashboard does: approving and
/// blocking are idempotent per id and stamp the time of the decision.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    /// Approved videos in approval order
    async fn get_approved_videos(&self) -> AppResult<Vec<ApprovedVideo>>;

    /// Blocked videos in blocking order
    async fn get_blocked_videos(&self) -> AppResult<Vec<BlockedVideo>>;

    async fn get_blocked_channels(&self) -> AppResult<Vec<BlockedChannel>>;

    /// Watch history, newest first
    async fn get_watch_history(&self) -> AppResult<Vec<HistoryEntry>>;

    /// Approves a video unless already approved; returns the approved list
    async fn approve_video(&self, video: VideoRecord) -> AppResult<Vec<ApprovedVideo>>;

    async fn remove_approved_video(&self, video_id: &str) -> AppResult<Vec<ApprovedVideo>>;

    /// Blocks a video unless already blocked; returns the blocked list
    async fn block_video(&self, video: VideoRecord) -> AppResult<Vec<BlockedVideo>>;

    async fn remove_blocked_video(&self, video_id: &str) -> AppResult<Vec<BlockedVideo>>;

    /// Blocks a channel unless already blocked; returns the blocked channels
    async fn block_channel(&self, channel: ChannelRecord) -> AppResult<Vec<BlockedChannel>>;

    async fn unblock_channel(&self, channel_id: &str) -> AppResult<Vec<BlockedChannel>>;

    async fn is_channel_blocked(&self, channel_id: &str) -> AppResult<bool> {
        let channels = self.get_blocked_channels().await?;
        Ok(channels.iter().any(|c| c.channel.id == channel_id))
    }

    /// Moves the video to the front of the history, keeping [`WATCH_HISTORY_LIMIT`] entries
    async fn record_watch(&self, video: VideoRecord) -> AppResult<Vec<HistoryEntry>>;

    async fn clear_watch_history(&self) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
