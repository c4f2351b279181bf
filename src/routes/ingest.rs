use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    error::AppResult,
    routes::AppState,
    services::ingest::{self, IngestSummary},
};

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    #[serde(default = "default_pages")]
    pub pages: u32,
}

fn default_pages() -> u32 {
    1
}

/// Handler for pulling popular movies into the catalogue
pub async fn sync_popular(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> AppResult<Json<IngestSummary>> {
    tracing::info!(pages = request.pages, "Starting popular-movie ingestion");

    let summary = ingest::sync_popular(
        state.catalog.as_ref(),
        state.provider.as_ref(),
        request.pages,
    )
    .await?;

    Ok(Json(summary))
}
