use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::format::parse_clock_duration;

/// Counts arrive as JSON numbers from storage but as strings from the YouTube API
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseCount {
    Number(u64),
    Text(String),
}

pub(crate) fn loose_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseCount>::deserialize(deserializer)? {
        Some(LooseCount::Number(n)) => Some(n),
        Some(LooseCount::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Stored/wire shape of a video, accepting both spellings storage has used over time
#[derive(Debug, Deserialize)]
struct RawVideoRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default, rename = "channelId")]
    channel_id_camel: Option<String>,
    #[serde(default, rename = "channel_id")]
    channel_id_snake: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default, rename = "durationSeconds", deserialize_with = "loose_count")]
    duration_seconds_camel: Option<u64>,
    #[serde(default, rename = "duration_seconds", deserialize_with = "loose_count")]
    duration_seconds_snake: Option<u64>,
    #[serde(default, rename = "viewCount", deserialize_with = "loose_count")]
    view_count_camel: Option<u64>,
    #[serde(default, rename = "view_count", deserialize_with = "loose_count")]
    view_count_snake: Option<u64>,
    #[serde(default, rename = "publishedAt")]
    published_at_camel: Option<String>,
    #[serde(default, rename = "published_at")]
    published_at_snake: Option<String>,
}

impl From<RawVideoRecord> for VideoRecord {
    fn from(raw: RawVideoRecord) -> Self {
        VideoRecord {
            id: raw.id.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            description: raw.description,
            channel: raw.channel.unwrap_or_default(),
            channel_id: non_empty(raw.channel_id_camel).or(non_empty(raw.channel_id_snake)),
            thumbnail: raw.thumbnail,
            duration: raw.duration,
            duration_seconds: raw.duration_seconds_camel.or(raw.duration_seconds_snake),
            view_count: raw.view_count_camel.or(raw.view_count_snake),
            published_at: raw.published_at_camel.or(raw.published_at_snake),
        }
    }
}

/// A video as seen by the preference engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawVideoRecord")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Channel display name
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Human-readable duration such as `10:25`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl VideoRecord {
    /// `title + ' ' + description`, description defaulting to empty
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or(""))
    }

    /// Lowercased [`VideoRecord::text`], used for substring matching
    pub fn search_text(&self) -> String {
        self.text().to_lowercase()
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref()
    }

    /// Duration in seconds, falling back to the display string for older records
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration_seconds
            .or_else(|| self.duration.as_deref().and_then(parse_clock_duration))
    }
}

impl AsRef<VideoRecord> for VideoRecord {
    fn as_ref(&self) -> &VideoRecord {
        self
    }
}

/// A video a parent has allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedVideo {
    #[serde(flatten)]
    pub video: VideoRecord,
    #[serde(alias = "approved_at")]
    pub approved_at: DateTime<Utc>,
}

impl AsRef<VideoRecord> for ApprovedVideo {
    fn as_ref(&self) -> &VideoRecord {
        &self.video
    }
}

/// A video a parent has disallowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedVideo {
    #[serde(flatten)]
    pub video: VideoRecord,
    #[serde(alias = "blocked_at")]
    pub blocked_at: DateTime<Utc>,
}

impl AsRef<VideoRecord> for BlockedVideo {
    fn as_ref(&self) -> &VideoRecord {
        &self.video
    }
}

/// One entry of the child's watch history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(alias = "video_id")]
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(alias = "watched_at")]
    pub watched_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_video(video: &VideoRecord, watched_at: DateTime<Utc>) -> Self {
        Self {
            video_id: video.id.clone(),
            title: video.title.clone(),
            channel: video.channel.clone(),
            thumbnail: video.thumbnail.clone(),
            watched_at,
        }
    }
}

/// A search candidate with its transient relevance score attached
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedVideo {
    #[serde(flatten)]
    pub video: VideoRecord,
    pub relevance_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_snake_case_channel_id() {
        let video: VideoRecord = serde_json::from_value(json!({
            "id": "1",
            "title": "Учим алфавит",
            "channel": "Kids Channel",
            "channel_id": "ch1"
        }))
        .unwrap();

        assert_eq!(video.channel_id(), Some("ch1"));
        assert_eq!(video.description, None);
    }

    #[test]
    fn test_camel_case_wins_when_both_present() {
        let video: VideoRecord = serde_json::from_value(json!({
            "id": "1",
            "title": "t",
            "channelId": "camel",
            "channel_id": "snake"
        }))
        .unwrap();

        assert_eq!(video.channel_id(), Some("camel"));
    }

    #[test]
    fn test_empty_channel_id_is_absent() {
        let video: VideoRecord =
            serde_json::from_value(json!({ "id": "1", "title": "t", "channelId": "" })).unwrap();
        assert_eq!(video.channel_id(), None);
    }

    #[test]
    fn test_view_count_as_string_or_number() {
        let from_api: VideoRecord =
            serde_json::from_value(json!({ "id": "1", "viewCount": "1234" })).unwrap();
        let from_storage: VideoRecord =
            serde_json::from_value(json!({ "id": "1", "view_count": 1234 })).unwrap();

        assert_eq!(from_api.view_count, Some(1234));
        assert_eq!(from_storage.view_count, Some(1234));
    }

    #[test]
    fn test_serializes_camel_case() {
        let video = VideoRecord {
            id: "1".into(),
            title: "t".into(),
            channel_id: Some("ch1".into()),
            duration_seconds: Some(60),
            ..Default::default()
        };

        let value = serde_json::to_value(&video).unwrap();
        assert_eq!(value["channelId"], "ch1");
        assert_eq!(value["durationSeconds"], 60);
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_duration_falls_back_to_display_string() {
        let video = VideoRecord {
            duration: Some("10:25".into()),
            ..Default::default()
        };
        assert_eq!(video.duration_secs(), Some(625));

        let unknown = VideoRecord {
            duration: Some("N/A".into()),
            ..Default::default()
        };
        assert_eq!(unknown.duration_secs(), None);
    }

    #[test]
    fn test_text_defaults_missing_description() {
        let video = VideoRecord {
            title: "Рисование".into(),
            ..Default::default()
        };
        assert_eq!(video.text(), "Рисование ");
        assert_eq!(video.search_text(), "рисование ");
    }

    #[test]
    fn test_approved_video_accepts_both_timestamp_spellings() {
        let camel: ApprovedVideo = serde_json::from_value(json!({
            "id": "1",
            "title": "t",
            "channelId": "ch1",
            "approvedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let snake: ApprovedVideo = serde_json::from_value(json!({
            "id": "1",
            "title": "t",
            "channel_id": "ch1",
            "approved_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(camel, snake);
        assert_eq!(camel.video.channel_id(), Some("ch1"));
    }

    #[test]
    fn test_ranked_video_flattens() {
        let ranked = RankedVideo {
            video: VideoRecord {
                id: "1".into(),
                ..Default::default()
            },
            relevance_score: 12,
        };

        let value = serde_json::to_value(&ranked).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["relevanceScore"], 12);
    }
}
