use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Movie, NewMovie, Rating},
};

/// Persistence seam for the movie catalogue and rating history
///
/// The recommendation engine and the HTTP layer consume this trait rather
/// than a concrete database handle, so both can run against an in-memory
/// store in tests. All reads return rows in the order the query defines;
/// callers rely on that order (ranking, popularity sorting).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// A page of the catalogue, ordered by id
    async fn list_movies(&self, offset: i64, limit: i64) -> AppResult<Vec<Movie>>;

    /// The full catalogue snapshot, ordered by id
    ///
    /// This is the corpus the content vectorizer operates on; the snapshot
    /// is taken once per recommendation request.
    async fn list_all_movies(&self) -> AppResult<Vec<Movie>>;

    async fn get_movie(&self, id: i64) -> AppResult<Option<Movie>>;

    /// Case-insensitive title substring search
    async fn search_movies(&self, query: &str, limit: i64) -> AppResult<Vec<Movie>>;

    async fn movies_by_genre(&self, genre: &str, limit: i64) -> AppResult<Vec<Movie>>;

    /// Most-voted movies first
    async fn trending_movies(&self, limit: i64) -> AppResult<Vec<Movie>>;

    /// Movies passing both quality thresholds, ordered by rating descending
    /// then vote count descending
    async fn top_rated_movies(
        &self,
        min_rating: f64,
        min_votes: i64,
        limit: i64,
    ) -> AppResult<Vec<Movie>>;

    /// Movies carrying `genre`, excluding the given ids, with rating at least
    /// `min_rating`, ordered by rating descending
    async fn movies_with_genre_excluding(
        &self,
        genre: &str,
        excluded_ids: &[i64],
        min_rating: f64,
        limit: i64,
    ) -> AppResult<Vec<Movie>>;

    /// Batch lookup; rows for unknown ids are simply absent
    async fn movies_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Movie>>;

    /// Inserts a movie, or refreshes the existing row with the same TMDB id
    async fn upsert_movie(&self, movie: &NewMovie) -> AppResult<Movie>;

    async fn ratings_for_user(&self, user_id: i64) -> AppResult<Vec<Rating>>;

    /// Records a score, overwriting any previous rating by this user for
    /// this movie
    async fn upsert_rating(&self, user_id: i64, movie_id: i64, score: f64) -> AppResult<Rating>;

    /// Removes a rating owned by the user; `false` when no such row exists
    async fn delete_rating(&self, rating_id: i64, user_id: i64) -> AppResult<bool>;
}

/// PostgreSQL-backed catalogue store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_movies(&self, offset: i64, limit: i64) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn list_all_movies(&self) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>("SELECT * FROM movies ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(movies)
    }

    async fn get_movie(&self, id: i64) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(movie)
    }

    async fn search_movies(&self, query: &str, limit: i64) -> AppResult<Vec<Movie>> {
        let pattern = format!("%{}%", query);
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies WHERE title ILIKE $1 ORDER BY id LIMIT $2",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn movies_by_genre(&self, genre: &str, limit: i64) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies WHERE $1 = ANY(genres) ORDER BY id LIMIT $2",
        )
        .bind(genre)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn trending_movies(&self, limit: i64) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies ORDER BY vote_count DESC NULLS LAST LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn top_rated_movies(
        &self,
        min_rating: f64,
        min_votes: i64,
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT * FROM movies
            WHERE rating >= $1 AND vote_count >= $2
            ORDER BY rating DESC, vote_count DESC
            LIMIT $3
            "#,
        )
        .bind(min_rating)
        .bind(min_votes)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn movies_with_genre_excluding(
        &self,
        genre: &str,
        excluded_ids: &[i64],
        min_rating: f64,
        limit: i64,
    ) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT * FROM movies
            WHERE $1 = ANY(genres)
              AND NOT (id = ANY($2))
              AND rating >= $3
            ORDER BY rating DESC
            LIMIT $4
            "#,
        )
        .bind(genre)
        .bind(excluded_ids)
        .bind(min_rating)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn movies_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn upsert_movie(&self, movie: &NewMovie) -> AppResult<Movie> {
        let row = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (
                title, overview, release_date, runtime, genres, rating,
                vote_count, poster_path, backdrop_path, imdb_id, tmdb_id,
                director, "cast", keywords
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (tmdb_id) DO UPDATE SET
                title = EXCLUDED.title,
                overview = EXCLUDED.overview,
                release_date = EXCLUDED.release_date,
                runtime = EXCLUDED.runtime,
                genres = EXCLUDED.genres,
                rating = EXCLUDED.rating,
                vote_count = EXCLUDED.vote_count,
                poster_path = EXCLUDED.poster_path,
                backdrop_path = EXCLUDED.backdrop_path,
                imdb_id = EXCLUDED.imdb_id,
                director = EXCLUDED.director,
                "cast" = EXCLUDED."cast",
                keywords = EXCLUDED.keywords
            RETURNING *
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(&movie.release_date)
        .bind(movie.runtime)
        .bind(&movie.genres)
        .bind(movie.rating)
        .bind(movie.vote_count)
        .bind(&movie.poster_path)
        .bind(&movie.backdrop_path)
        .bind(&movie.imdb_id)
        .bind(movie.tmdb_id)
        .bind(&movie.director)
        .bind(&movie.cast)
        .bind(&movie.keywords)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn ratings_for_user(&self, user_id: i64) -> AppResult<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(
            "SELECT * FROM ratings WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    async fn upsert_rating(&self, user_id: i64, movie_id: i64, score: f64) -> AppResult<Rating> {
        let rating = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (user_id, movie_id, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, movie_id) DO UPDATE SET
                score = EXCLUDED.score,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(score)
        .fetch_one(&self.pool)
        .await?;

        Ok(rating)
    }

    async fn delete_rating(&self, rating_id: i64, user_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1 AND user_id = $2")
            .bind(rating_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
