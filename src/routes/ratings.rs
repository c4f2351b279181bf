use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{rating, Rating},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    pub user_id: i64,
    pub movie_id: i64,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: i64,
}

/// Handler for recording a rating
///
/// Re-rating an already-rated movie overwrites the previous score.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRatingRequest>,
) -> AppResult<(StatusCode, Json<Rating>)> {
    if !Rating::validate_score(request.score) {
        return Err(AppError::InvalidInput(format!(
            "Score must be between {} and {}",
            rating::MIN_SCORE,
            rating::MAX_SCORE
        )));
    }

    if state.catalog.get_movie(request.movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    let rating = state
        .catalog
        .upsert_rating(request.user_id, request.movie_id, request.score)
        .await?;

    Ok((StatusCode::CREATED, Json(rating)))
}

/// Handler for a user's rating history
pub async fn my_ratings(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = state.catalog.ratings_for_user(params.user_id).await?;
    Ok(Json(ratings))
}

/// Handler for removing a rating
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<Value>> {
    let deleted = state.catalog.delete_rating(id, params.user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Rating not found".to_string()));
    }

    Ok(Json(json!({ "message": "Rating deleted successfully" })))
}
