/// TMDB (The Movie Database) provider
///
/// Fetches popular listings and per-movie metadata bundles over the TMDB v3
/// REST API. Responses are read-through cached in Redis: popular pages churn
/// hourly, movie bundles are stable for a week.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{NewMovie, TmdbCredits, TmdbKeywords, TmdbMovieDetails, TmdbMovieSummary, TmdbPage},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const POPULAR_CACHE_TTL: u64 = 3600; // 1 hour
const MOVIE_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    /// Issues a GET against the TMDB API and deserializes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn popular_movies(&self, page: u32) -> AppResult<TmdbPage<TmdbMovieSummary>> {
        if page == 0 {
            return Err(AppError::InvalidInput(
                "TMDB pages are numbered from 1".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::TmdbPopular(page),
            POPULAR_CACHE_TTL,
            async move {
                let result: TmdbPage<TmdbMovieSummary> = self
                    .get_json("movie/popular", &[("page", page.to_string())])
                    .await?;

                tracing::info!(
                    page,
                    results = result.results.len(),
                    provider = "tmdb",
                    "Popular movies fetched"
                );

                Ok::<_, AppError>(result)
            }
        )
    }

    async fn movie_bundle(&self, tmdb_id: i64) -> AppResult<NewMovie> {
        cached!(
            self.cache,
            CacheKey::TmdbMovie(tmdb_id),
            MOVIE_CACHE_TTL,
            async move {
                let details: TmdbMovieDetails =
                    self.get_json(&format!("movie/{}", tmdb_id), &[]).await?;
                let credits: TmdbCredits = self
                    .get_json(&format!("movie/{}/credits", tmdb_id), &[])
                    .await?;
                let keywords: TmdbKeywords = self
                    .get_json(&format!("movie/{}/keywords", tmdb_id), &[])
                    .await?;

                let movie = NewMovie::from_tmdb(details, credits, keywords);

                tracing::debug!(
                    tmdb_id,
                    title = %movie.title,
                    provider = "tmdb",
                    "Movie bundle fetched"
                );

                Ok::<_, AppError>(movie)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
