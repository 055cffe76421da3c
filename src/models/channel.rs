use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::video::loose_count;

#[derive(Debug, Deserialize)]
struct RawChannelRecord {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "subscriberCount", deserialize_with = "loose_count")]
    subscriber_count_camel: Option<u64>,
    #[serde(default, rename = "subscriber_count", deserialize_with = "loose_count")]
    subscriber_count_snake: Option<u64>,
}

impl From<RawChannelRecord> for ChannelRecord {
    fn from(raw: RawChannelRecord) -> Self {
        ChannelRecord {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            subscriber_count: raw.subscriber_count_camel.or(raw.subscriber_count_snake),
        }
    }
}

/// A video platform channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawChannelRecord")]
pub struct ChannelRecord {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_count: Option<u64>,
}

impl ChannelRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subscriber_count: None,
        }
    }
}

impl AsRef<ChannelRecord> for ChannelRecord {
    fn as_ref(&self) -> &ChannelRecord {
        self
    }
}

/// A channel a parent has disallowed; acts as a hard filter on search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedChannel {
    #[serde(flatten)]
    pub channel: ChannelRecord,
    #[serde(alias = "blocked_at")]
    pub blocked_at: DateTime<Utc>,
}

impl AsRef<ChannelRecord> for BlockedChannel {
    fn as_ref(&self) -> &ChannelRecord {
        &self.channel
    }
}

/// How strongly the approval history leans toward one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAffinity {
    pub id: String,
    pub name: String,
    /// Approved videos from this channel
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscriber_count_spellings() {
        let camel: ChannelRecord =
            serde_json::from_value(json!({ "id": "c", "name": "n", "subscriberCount": "1500" }))
                .unwrap();
        let snake: ChannelRecord =
            serde_json::from_value(json!({ "id": "c", "name": "n", "subscriber_count": 1500 }))
                .unwrap();

        assert_eq!(camel.subscriber_count, Some(1500));
        assert_eq!(camel, snake);
    }

    #[test]
    fn test_name_is_optional() {
        let channel: ChannelRecord = serde_json::from_value(json!({ "id": "c" })).unwrap();
        assert_eq!(channel, ChannelRecord::new("c", ""));
    }
}
