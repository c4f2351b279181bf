use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A movie in the local catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
    /// Genre names, e.g. ["Action", "Comedy"]. Empty when unknown, never null.
    pub genres: Vec<String>,
    /// Aggregate rating on a 0-10 scale
    pub rating: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i64>,
    pub director: Option<String>,
    pub cast: Vec<String>,
    /// Descriptive keywords, consumed by content-based recommendations
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting or updating a catalogue movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i64>,
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of a TMDB list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbPage<T> {
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// Movie entry as it appears in TMDB list endpoints (popular, search, discover)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Full movie details from GET /movie/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

/// Cast and crew from GET /movie/{id}/credits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCrewMember {
    pub name: String,
    pub job: String,
}

/// Keywords from GET /movie/{id}/keywords
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbKeywords {
    #[serde(default)]
    pub keywords: Vec<TmdbKeyword>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbKeyword {
    pub name: String,
}

/// Number of cast members carried over from TMDB credits
const CAST_LIMIT: usize = 10;

impl NewMovie {
    /// Combines TMDB details, credits, and keywords into a catalogue payload
    ///
    /// The director is the first crew member with the "Director" job; the cast
    /// list is truncated to the top billed names.
    pub fn from_tmdb(
        details: TmdbMovieDetails,
        credits: TmdbCredits,
        keywords: TmdbKeywords,
    ) -> Self {
        let director = credits
            .crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| member.name.clone());

        let cast: Vec<String> = credits
            .cast
            .into_iter()
            .take(CAST_LIMIT)
            .map(|member| member.name)
            .collect();

        Self {
            title: details.title,
            overview: details.overview,
            release_date: details.release_date,
            runtime: details.runtime,
            genres: details.genres.into_iter().map(|g| g.name).collect(),
            rating: details.vote_average,
            vote_count: details.vote_count,
            poster_path: details.poster_path,
            backdrop_path: details.backdrop_path,
            imdb_id: details.imdb_id,
            tmdb_id: Some(details.id),
            director,
            cast,
            keywords: keywords.keywords.into_iter().map(|k| k.name).collect(),
        }
    }
}
