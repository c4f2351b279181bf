use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, Recommendation},
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_page_size")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_page_size")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecommendLimitQuery {
    #[serde(default = "default_recommendation_count")]
    pub limit: usize,
}

fn default_page_size() -> i64 {
    20
}

fn default_recommendation_count() -> usize {
    10
}

/// Handler for the paginated catalogue listing
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.list_movies(params.skip, params.limit).await?;
    Ok(Json(movies))
}

/// Handler for a single movie lookup
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .catalog
        .get_movie(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;
    Ok(Json(movie))
}

/// Handler for title search
pub async fn search(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.search_movies(&query, params.limit).await?;
    Ok(Json(movies))
}

/// Handler for genre browsing
pub async fn by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.movies_by_genre(&genre, params.limit).await?;
    Ok(Json(movies))
}

/// Handler for the most-voted listing
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.trending_movies(params.limit).await?;
    Ok(Json(movies))
}

/// Handler for content-based recommendations for a movie
pub async fn similar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<RecommendLimitQuery>,
) -> AppResult<Json<Recommendation>> {
    let result =
        recommendations::content_based(state.catalog.as_ref(), id, params.limit).await?;
    Ok(Json(result))
}
