use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{AgeGroup, CombinedRecommendations, Topic},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct AgeGroupQuery {
    age_group: String,
}

impl AgeGroupQuery {
    fn parse(&self) -> AppResult<AgeGroup> {
        self.age_group.parse()
    }
}

/// Personal and trending topics for the home screen
pub async fn combined(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AgeGroupQuery>,
) -> AppResult<Json<CombinedRecommendations>> {
    let age_group = params.parse()?;
    Ok(Json(
        state
            .recommendations
            .combined_recommendations(age_group)
            .await?,
    ))
}

pub async fn topics(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Topic>>> {
    Ok(Json(state.recommendations.generate_smart_topics().await?))
}

/// Always succeeds once the age group parses; platform failures give `[]`
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AgeGroupQuery>,
) -> AppResult<Json<Vec<Topic>>> {
    let age_group = params.parse()?;
    Ok(Json(
        state
            .recommendations
            .trending_topics_for_age(age_group)
            .await,
    ))
}
