use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::store::{HistoryStore, WATCH_HISTORY_LIMIT},
    error::AppResult,
    models::{
        ApprovedVideo, BlockedChannel, BlockedVideo, ChannelRecord, HistoryEntry, VideoRecord,
    },
};

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Counts above `i64::MAX` are stored as NULL rather than wrapping negative
fn to_db_count(value: Option<u64>) -> Option<i64> {
    value.and_then(|v| i64::try_from(v).ok())
}

#[derive(sqlx::FromRow)]
struct VideoRow {
    video_id: String,
    title: String,
    description: Option<String>,
    channel: String,
    channel_id: Option<String>,
    thumbnail: Option<String>,
    duration: Option<String>,
    duration_seconds: Option<i64>,
    view_count: Option<i64>,
    published_at: Option<String>,
    decided_at: DateTime<Utc>,
}

impl VideoRow {
    fn into_parts(self) -> (VideoRecord, DateTime<Utc>) {
        let video = VideoRecord {
            id: self.video_id,
            title: self.title,
            description: self.description,
            channel: self.channel,
            channel_id: self.channel_id,
            thumbnail: self.thumbnail,
            duration: self.duration,
            duration_seconds: self.duration_seconds.and_then(|v| u64::try_from(v).ok()),
            view_count: self.view_count.and_then(|v| u64::try_from(v).ok()),
            published_at: self.published_at,
        };
        (video, self.decided_at)
    }
}

#[derive(sqlx::FromRow)]
struct ChannelRow {
    channel_id: String,
    name: String,
    subscriber_count: Option<i64>,
    blocked_at: DateTime<Utc>,
}

impl From<ChannelRow> for BlockedChannel {
    fn from(row: ChannelRow) -> Self {
        BlockedChannel {
            channel: ChannelRecord {
                id: row.channel_id,
                name: row.name,
                subscriber_count: row.subscriber_count.and_then(|v| u64::try_from(v).ok()),
            },
            blocked_at: row.blocked_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    video_id: String,
    title: String,
    channel: String,
    thumbnail: Option<String>,
    watched_at: DateTime<Utc>,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry {
            video_id: row.video_id,
            title: row.title,
            channel: row.channel,
            thumbnail: row.thumbnail,
            watched_at: row.watched_at,
        }
    }
}

/// Which of the two video decision tables a query targets
#[derive(Clone, Copy)]
enum VideoTable {
    Approved,
    Blocked,
}

impl VideoTable {
    fn table(self) -> &'static str {
        match self {
            VideoTable::Approved => "approved_videos",
            VideoTable::Blocked => "blocked_videos",
        }
    }

    fn timestamp_column(self) -> &'static str {
        match self {
            VideoTable::Approved => "approved_at",
            VideoTable::Blocked => "blocked_at",
        }
    }
}

/// History store backed by Postgres, scoped to one family
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
    family_id: Uuid,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool, family_id: Uuid) -> Self {
        Self { pool, family_id }
    }

    async fn fetch_videos(&self, table: VideoTable) -> AppResult<Vec<(VideoRecord, DateTime<Utc>)>> {
        let sql = format!(
            r#"
            SELECT video_id, title, description, channel, channel_id, thumbnail,
                   duration, duration_seconds, view_count, published_at,
                   {ts} AS decided_at
            FROM {table}
            WHERE family_id = $1
            ORDER BY seq
            "#,
            ts = table.timestamp_column(),
            table = table.table(),
        );

        let rows: Vec<VideoRow> = sqlx::query_as(&sql)
            .bind(self.family_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            table = table.table(),
            rows = rows.len(),
            "Fetched video history"
        );

        Ok(rows.into_iter().map(VideoRow::into_parts).collect())
    }

    async fn insert_video(&self, table: VideoTable, video: &VideoRecord) -> AppResult<()> {
        let sql = format!(
            r#"
            INSERT INTO {table} (
                family_id, video_id, title, description, channel, channel_id, thumbnail,
                duration, duration_seconds, view_count, published_at, {ts}
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            ON CONFLICT (family_id, video_id) DO NOTHING
            "#,
            ts = table.timestamp_column(),
            table = table.table(),
        );

        sqlx::query(&sql)
            .bind(self.family_id)
            .bind(&video.id)
            .bind(&video.title)
            .bind(&video.description)
            .bind(&video.channel)
            .bind(&video.channel_id)
            .bind(&video.thumbnail)
            .bind(&video.duration)
            .bind(to_db_count(video.duration_seconds))
            .bind(to_db_count(video.view_count))
            .bind(&video.published_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_video(&self, table: VideoTable, video_id: &str) -> AppResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE family_id = $1 AND video_id = $2",
            table.table()
        );

        sqlx::query(&sql)
            .bind(self.family_id)
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn approved(&self) -> AppResult<Vec<ApprovedVideo>> {
        let rows = self.fetch_videos(VideoTable::Approved).await?;
        Ok(rows
            .into_iter()
            .map(|(video, approved_at)| ApprovedVideo { video, approved_at })
            .collect())
    }

    async fn blocked(&self) -> AppResult<Vec<BlockedVideo>> {
        let rows = self.fetch_videos(VideoTable::Blocked).await?;
        Ok(rows
            .into_iter()
            .map(|(video, blocked_at)| BlockedVideo { video, blocked_at })
            .collect())
    }
}

#[async_trait::async_trait]
impl HistoryStore for PgHistoryStore {
    async fn get_approved_videos(&self) -> AppResult<Vec<ApprovedVideo>> {
        self.approved().await
    }

    async fn get_blocked_videos(&self) -> AppResult<Vec<BlockedVideo>> {
        self.blocked().await
    }

    async fn get_blocked_channels(&self) -> AppResult<Vec<BlockedChannel>> {
        let rows: Vec<ChannelRow> = sqlx::query_as(
            r#"
            SELECT channel_id, name, subscriber_count, blocked_at
            FROM blocked_channels
            WHERE family_id = $1
            ORDER BY seq
            "#,
        )
        .bind(self.family_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BlockedChannel::from).collect())
    }

    async fn get_watch_history(&self) -> AppResult<Vec<HistoryEntry>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT video_id, title, channel, thumbnail, watched_at
            FROM watch_history
            WHERE family_id = $1
            ORDER BY watched_at DESC
            "#,
        )
        .bind(self.family_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }

    async fn approve_video(&self, video: VideoRecord) -> AppResult<Vec<ApprovedVideo>> {
        self.insert_video(VideoTable::Approved, &video).await?;
        tracing::info!(video_id = %video.id, family_id = %self.family_id, "Video approved");
        self.approved().await
    }

    async fn remove_approved_video(&self, video_id: &str) -> AppResult<Vec<ApprovedVideo>> {
        self.delete_video(VideoTable::Approved, video_id).await?;
        self.approved().await
    }

    async fn block_video(&self, video: VideoRecord) -> AppResult<Vec<BlockedVideo>> {
        self.insert_video(VideoTable::Blocked, &video).await?;
        tracing::info!(video_id = %video.id, family_id = %self.family_id, "Video blocked");
        self.blocked().await
    }

    async fn remove_blocked_video(&self, video_id: &str) -> AppResult<Vec<BlockedVideo>> {
        self.delete_video(VideoTable::Blocked, video_id).await?;
        self.blocked().await
    }

    async fn block_channel(&self, channel: ChannelRecord) -> AppResult<Vec<BlockedChannel>> {
        sqlx::query(
            r#"
            INSERT INTO blocked_channels (family_id, channel_id, name, subscriber_count, blocked_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (family_id, channel_id) DO NOTHING
            "#,
        )
        .bind(self.family_id)
        .bind(&channel.id)
        .bind(&channel.name)
        .bind(to_db_count(channel.subscriber_count))
        .execute(&self.pool)
        .await?;

        tracing::info!(channel_id = %channel.id, family_id = %self.family_id, "Channel blocked");

        self.get_blocked_channels().await
    }

    async fn unblock_channel(&self, channel_id: &str) -> AppResult<Vec<BlockedChannel>> {
        sqlx::query("DELETE FROM blocked_channels WHERE family_id = $1 AND channel_id = $2")
            .bind(self.family_id)
            .bind(channel_id)
            .execute(&self.pool)
            .await?;

        self.get_blocked_channels().await
    }

    async fn is_channel_blocked(&self, channel_id: &str) -> AppResult<bool> {
        let blocked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM blocked_channels WHERE family_id = $1 AND channel_id = $2)",
        )
        .bind(self.family_id)
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(blocked)
    }

    async fn record_watch(&self, video: VideoRecord) -> AppResult<Vec<HistoryEntry>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM watch_history WHERE family_id = $1 AND video_id = $2")
            .bind(self.family_id)
            .bind(&video.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO watch_history (family_id, video_id, title, channel, thumbnail, watched_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            "#,
        )
        .bind(self.family_id)
        .bind(&video.id)
        .bind(&video.title)
        .bind(&video.channel)
        .bind(&video.thumbnail)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM watch_history
            WHERE family_id = $1
              AND video_id NOT IN (
                  SELECT video_id FROM watch_history
                  WHERE family_id = $1
                  ORDER BY watched_at DESC
                  LIMIT $2
              )
            "#,
        )
        .bind(self.family_id)
        .bind(WATCH_HISTORY_LIMIT as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_watch_history().await
    }

    async fn clear_watch_history(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM watch_history WHERE family_id = $1")
            .bind(self.family_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
