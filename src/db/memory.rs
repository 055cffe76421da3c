use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    db::store::{HistoryStore, WATCH_HISTORY_LIMIT},
    error::AppResult,
    models::{
        ApprovedVideo, BlockedChannel, BlockedVideo, ChannelRecord, HistoryEntry, VideoRecord,
    },
};

#[derive(Default)]
struct Library {
    approved: Vec<ApprovedVideo>,
    blocked: Vec<BlockedVideo>,
    channels: Vec<BlockedChannel>,
    history: Vec<HistoryEntry>,
}

/// Process-local history store
///
/// Used when no database is reachable, and in tests. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryHistoryStore {
    inner: Arc<RwLock<Library>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn get_approved_videos(&self) -> AppResult<Vec<ApprovedVideo>> {
        Ok(self.inner.read().await.approved.clone())
    }

    async fn get_blocked_videos(&self) -> AppResult<Vec<BlockedVideo>> {
        Ok(self.inner.read().await.blocked.clone())
    }

    async fn get_blocked_channels(&self) -> AppResult<Vec<BlockedChannel>> {
        Ok(self.inner.read().await.channels.clone())
    }

    async fn get_watch_history(&self) -> AppResult<Vec<HistoryEntry>> {
        Ok(self.inner.read().await.history.clone())
    }

    async fn approve_video(&self, video: VideoRecord) -> AppResult<Vec<ApprovedVideo>> {
        let mut inner = self.inner.write().await;
        if !inner.approved.iter().any(|v| v.video.id == video.id) {
            inner.approved.push(ApprovedVideo {
                video,
                approved_at: Utc::now(),
            });
        }
        Ok(inner.approved.clone())
    }

    async fn remove_approved_video(&self, video_id: &str) -> AppResult<Vec<ApprovedVideo>> {
        let mut inner = self.inner.write().await;
        inner.approved.retain(|v| v.video.id != video_id);
        Ok(inner.approved.clone())
    }

    async fn block_video(&self, video: VideoRecord) -> AppResult<Vec<BlockedVideo>> {
        let mut inner = self.inner.write().await;
        if !inner.blocked.iter().any(|v| v.video.id == video.id) {
            inner.blocked.push(BlockedVideo {
                video,
                blocked_at: Utc::now(),
            });
        }
        Ok(inner.blocked.clone())
    }

    async fn remove_blocked_video(&self, video_id: &str) -> AppResult<Vec<BlockedVideo>> {
        let mut inner = self.inner.write().await;
        inner.blocked.retain(|v| v.video.id != video_id);
        Ok(inner.blocked.clone())
    }

    async fn block_channel(&self, channel: ChannelRecord) -> AppResult<Vec<BlockedChannel>> {
        let mut inner = self.inner.write().await;
        if !inner.channels.iter().any(|c| c.channel.id == channel.id) {
            inner.channels.push(BlockedChannel {
                channel,
                blocked_at: Utc::now(),
            });
        }
        Ok(inner.channels.clone())
    }

    async fn unblock_channel(&self, channel_id: &str) -> AppResult<Vec<BlockedChannel>> {
        let mut inner = self.inner.write().await;
        inner.channels.retain(|c| c.channel.id != channel_id);
        Ok(inner.channels.clone())
    }

    async fn record_watch(&self, video: VideoRecord) -> AppResult<Vec<HistoryEntry>> {
        let mut inner = self.inner.write().await;
        inner.history.retain(|h| h.video_id != video.id);
        inner
            .history
            .insert(0, HistoryEntry::from_video(&video, Utc::now()));
        inner.history.truncate(WATCH_HISTORY_LIMIT);
        Ok(inner.history.clone())
    }

    async fn clear_watch_history(&self) -> AppResult<()> {
        self.inner.write().await.history.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, channel_id: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: format!("Video {}", id),
            channel: "Kids Channel".to_string(),
            channel_id: Some(channel_id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_approve_is_idempotent_per_id() {
        let store = MemoryHistoryStore::new();
        store.approve_video(video("1", "ch1")).await.unwrap();
        store.approve_video(video("2", "ch1")).await.unwrap();
        let approved = store.approve_video(video("1", "ch1")).await.unwrap();

        let ids: Vec<&str> = approved.iter().map(|v| v.video.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_remove_approved_video() {
        let store = MemoryHistoryStore::new();
        store.approve_video(video("1", "ch1")).await.unwrap();
        let approved = store.remove_approved_video("1").await.unwrap();
        assert!(approved.is_empty());
    }

    #[tokio::test]
    async fn test_block_and_unblock_channel() {
        let store = MemoryHistoryStore::new();
        store
            .block_channel(ChannelRecord::new("bad", "Bad Channel"))
            .await
            .unwrap();
        store
            .block_channel(ChannelRecord::new("bad", "Bad Channel"))
            .await
            .unwrap();

        assert_eq!(store.get_blocked_channels().await.unwrap().len(), 1);
        assert!(store.is_channel_blocked("bad").await.unwrap());

        store.unblock_channel("bad").await.unwrap();
        assert!(!store.is_channel_blocked("bad").await.unwrap());
    }

    #[tokio::test]
    async fn test_block_video_is_idempotent() {
        let store = MemoryHistoryStore::new();
        store.block_video(video("9", "ch9")).await.unwrap();
        let blocked = store.block_video(video("9", "ch9")).await.unwrap();
        assert_eq!(blocked.len(), 1);

        let blocked = store.remove_blocked_video("9").await.unwrap();
        assert!(blocked.is_empty());
    }

    #[tokio::test]
    async fn test_record_watch_moves_to_front_and_caps() {
        let store = MemoryHistoryStore::new();
        for i in 0..(WATCH_HISTORY_LIMIT + 5) {
            store.record_watch(video(&i.to_string(), "ch1")).await.unwrap();
        }
        let history = store.record_watch(video("10", "ch1")).await.unwrap();

        assert_eq!(history.len(), WATCH_HISTORY_LIMIT);
        assert_eq!(history[0].video_id, "10");
        assert_eq!(history.iter().filter(|h| h.video_id == "10").count(), 1);
        assert_eq!(history[1].video_id, (WATCH_HISTORY_LIMIT + 4).to_string());
    }

    #[tokio::test]
    async fn test_clear_watch_history() {
        let store = MemoryHistoryStore::new();
        store.record_watch(video("1", "ch1")).await.unwrap();
        store.clear_watch_history().await.unwrap();
        assert!(store.get_watch_history().await.unwrap().is_empty());
    }
}
