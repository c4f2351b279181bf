/// External movie metadata provider abstraction
///
/// The catalogue is populated from a third-party movie database; this trait
/// keeps ingestion independent of the concrete source. Providers are invoked
/// before the recommendation core runs, never during ranking.
use crate::{
    error::AppResult,
    models::{NewMovie, TmdbMovieSummary, TmdbPage},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// One page of currently popular movies
    async fn popular_movies(&self, page: u32) -> AppResult<TmdbPage<TmdbMovieSummary>>;

    /// Full catalogue payload for one movie: details, credits, and keywords
    /// combined
    async fn movie_bundle(&self, tmdb_id: i64) -> AppResult<NewMovie>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
