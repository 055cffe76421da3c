use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Keyword,
    Channel,
    Trending,
}

/// A suggested search topic, recomputed per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(rename = "type")]
    pub kind: TopicKind,
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

impl Topic {
    pub fn keyword(keyword: &str) -> Self {
        Self {
            kind: TopicKind::Keyword,
            value: keyword.to_string(),
            label: capitalize(keyword),
            channel_id: None,
        }
    }

    pub fn channel(id: &str, name: &str) -> Self {
        Self {
            kind: TopicKind::Channel,
            value: name.to_string(),
            label: format!("More from {}", name),
            channel_id: Some(id.to_string()),
        }
    }

    pub fn trending(keyword: &str) -> Self {
        Self {
            kind: TopicKind::Trending,
            value: keyword.to_string(),
            label: format!("🔥 {}", capitalize(keyword)),
            channel_id: None,
        }
    }
}

/// Uppercases the first character only
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Personal and trending topics side by side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRecommendations {
    pub personal: Vec<Topic>,
    pub trending: Vec<Topic>,
    pub has_personal: bool,
    pub has_trending: bool,
}

impl CombinedRecommendations {
    pub fn new(personal: Vec<Topic>, trending: Vec<Topic>) -> Self {
        Self {
            has_personal: !personal.is_empty(),
            has_trending: !trending.is_empty(),
            personal,
            trending,
        }
    }
}
