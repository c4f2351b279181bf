use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::Recommendation,
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct PersonalizedQuery {
    pub user_id: i64,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// Handler for personalized recommendations
pub async fn for_me(
    State(state): State<AppState>,
    Query(params): Query<PersonalizedQuery>,
) -> AppResult<Json<Recommendation>> {
    let result =
        recommendations::personalized(state.catalog.as_ref(), params.user_id, params.limit)
            .await?;
    Ok(Json(result))
}

/// Handler for the popularity list
pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PopularQuery>,
) -> AppResult<Json<Recommendation>> {
    let result = recommendations::popularity_based(state.catalog.as_ref(), params.limit).await?;
    Ok(Json(result))
}
