mod age_group;
mod category;
mod channel;
mod topic;
mod video;

pub use age_group::AgeGroup;
pub use category::{Category, CategoryScores, PersonalizedCategories};
pub use channel::{BlockedChannel, ChannelAffinity, ChannelRecord};
pub use topic::{capitalize, CombinedRecommendations, Topic, TopicKind};
pub use video::{ApprovedVideo, BlockedVideo, HistoryEntry, RankedVideo, VideoRecord};
