use serde::Serialize;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    services::providers::MetadataProvider,
};

/// Outcome of one ingestion run
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IngestSummary {
    pub pages_fetched: u32,
    pub movies_upserted: u32,
    pub movies_failed: u32,
}

/// Pulls popular movies from the metadata provider into the catalogue
///
/// Walks up to `pages` popular pages, fetches the full metadata bundle for
/// each listed movie, and upserts it. A failed bundle is logged and skipped;
/// the run only fails outright when nothing could be ingested at all.
pub async fn sync_popular(
    store: &dyn CatalogStore,
    provider: &dyn MetadataProvider,
    pages: u32,
) -> AppResult<IngestSummary> {
    if pages == 0 {
        return Err(AppError::InvalidInput(
            "Must ingest at least one page".to_string(),
        ));
    }

    let mut summary = IngestSummary {
        pages_fetched: 0,
        movies_upserted: 0,
        movies_failed: 0,
    };

    for page in 1..=pages {
        let listing = provider.popular_movies(page).await?;
        summary.pages_fetched += 1;

        for entry in &listing.results {
            match provider.movie_bundle(entry.id).await {
                Ok(movie) => {
                    store.upsert_movie(&movie).await?;
                    summary.movies_upserted += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        tmdb_id = entry.id,
                        title = %entry.title,
                        error = %e,
                        "Skipping movie, bundle fetch failed"
                    );
                    summary.movies_failed += 1;
                }
            }
        }

        if page >= listing.total_pages {
            break;
        }
    }

    if summary.movies_upserted == 0 && summary.movies_failed > 0 {
        return Err(AppError::ExternalApi(
            "Failed to ingest any movie".to_string(),
        ));
    }

    tracing::info!(
        pages = summary.pages_fetched,
        upserted = summary.movies_upserted,
        failed = summary.movies_failed,
        provider = provider.name(),
        "Ingestion completed"
    );

    Ok(summary)
}
