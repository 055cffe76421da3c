use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Child age band used to tune searches and trending topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "0-2")]
    Toddler,
    #[serde(rename = "3-5")]
    Preschool,
    #[serde(rename = "6-8")]
    EarlySchool,
    #[serde(rename = "9-12")]
    Preteen,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Toddler,
        AgeGroup::Preschool,
        AgeGroup::EarlySchool,
        AgeGroup::Preteen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Toddler => "0-2",
            AgeGroup::Preschool => "3-5",
            AgeGroup::EarlySchool => "6-8",
            AgeGroup::Preteen => "9-12",
        }
    }

    /// English phrase appended to search queries for this band
    pub fn search_phrase(&self) -> &'static str {
        match self {
            AgeGroup::Toddler => "baby toddler",
            AgeGroup::Preschool => "preschool",
            AgeGroup::EarlySchool => "children elementary",
            AgeGroup::Preteen => "kids teens",
        }
    }

    /// Query used to sample currently popular videos for this band
    pub fn trending_query(&self) -> &'static str {
        match self {
            AgeGroup::Toddler => "baby songs nursery rhymes",
            AgeGroup::Preschool => "preschool learning",
            AgeGroup::EarlySchool => "kids science experiments",
            AgeGroup::Preteen => "science for kids explained",
        }
    }

    /// Lenient parse: unknown bands become `None` instead of an error
    pub fn parse_lenient(value: Option<&str>) -> Option<AgeGroup> {
        value.and_then(|v| v.parse().ok())
    }
}

impl FromStr for AgeGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s.trim())
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown age group: {}", s)))
    }
}

impl Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
