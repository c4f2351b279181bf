use std::collections::BTreeMap;

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Movie, Recommendation, RecommendationType},
};

pub mod ranker;
pub mod vectorizer;

/// Quality thresholds for popularity-based results
const MIN_POPULAR_RATING: f64 = 7.0;
const MIN_POPULAR_VOTES: i64 = 100;

/// A rating at or above this score marks the movie as liked
const LIKED_SCORE_THRESHOLD: f64 = 4.0;

/// Movies similar to a given movie, ranked by content similarity
///
/// Vectorizes the full catalogue snapshot (genres, keywords, director) with
/// TF-IDF and ranks every other movie by cosine similarity against the
/// target. An unknown `movie_id` yields an empty result rather than an
/// error; callers that need to distinguish "no such movie" from "no similar
/// movies" check movie existence separately.
pub async fn content_based(
    store: &dyn CatalogStore,
    movie_id: i64,
    limit: usize,
) -> AppResult<Recommendation> {
    if store.get_movie(movie_id).await?.is_none() {
        tracing::info!(movie_id, "Content-based target not found");
        return Ok(Recommendation::new(vec![], RecommendationType::ContentBased));
    }

    let corpus = store.list_all_movies().await?;

    // The snapshot is taken after the existence check; tolerate the target
    // disappearing in between.
    let Some(target_idx) = corpus.iter().position(|movie| movie.id == movie_id) else {
        return Ok(Recommendation::new(vec![], RecommendationType::ContentBased));
    };

    let vectors = vectorizer::vectorize_corpus(&corpus);
    let ranked = ranker::rank_similar(target_idx, &vectors, limit);

    tracing::info!(
        movie_id,
        corpus_size = corpus.len(),
        returned = ranked.len(),
        "Content-based recommendations computed"
    );

    let movies: Vec<Movie> = ranked.into_iter().map(|idx| corpus[idx].clone()).collect();
    Ok(Recommendation::new(movies, RecommendationType::ContentBased))
}

/// Globally popular movies: high rating, meaningful vote count
///
/// Also the fallback whenever personalization has no signal.
pub async fn popularity_based(store: &dyn CatalogStore, limit: usize) -> AppResult<Recommendation> {
    let movies = store
        .top_rated_movies(MIN_POPULAR_RATING, MIN_POPULAR_VOTES, limit as i64)
        .await?;

    Ok(Recommendation::new(movies, RecommendationType::Popularity))
}

/// Recommendations derived from a user's rating history
///
/// Infers the user's favourite genre from liked ratings (score >= 4.0) and
/// returns well-rated movies of that genre the user has not rated yet. Users
/// without ratings, without liked movies, or whose liked movies carry no
/// genres fall back to the popularity list.
pub async fn personalized(
    store: &dyn CatalogStore,
    user_id: i64,
    limit: usize,
) -> AppResult<Recommendation> {
    let ratings = store.ratings_for_user(user_id).await?;

    if ratings.is_empty() {
        tracing::info!(user_id, "No rating history, falling back to popularity");
        let fallback = popularity_based(store, limit).await?;
        return Ok(Recommendation::new(
            fallback.movies,
            RecommendationType::Personalized,
        ));
    }

    let liked_ids: Vec<i64> = ratings
        .iter()
        .filter(|r| r.score >= LIKED_SCORE_THRESHOLD)
        .map(|r| r.movie_id)
        .collect();
    let liked_movies = store.movies_by_ids(&liked_ids).await?;

    let Some(top_genre) = favorite_genre(&liked_movies) else {
        tracing::info!(user_id, "No liked genres, falling back to popularity");
        let fallback = popularity_based(store, limit).await?;
        return Ok(Recommendation::new(
            fallback.movies,
            RecommendationType::Personalized,
        ));
    };

    // Exclude everything the user has rated, liked or not
    let rated_ids: Vec<i64> = ratings.iter().map(|r| r.movie_id).collect();
    let movies = store
        .movies_with_genre_excluding(&top_genre, &rated_ids, MIN_POPULAR_RATING, limit as i64)
        .await?;

    tracing::info!(
        user_id,
        top_genre = %top_genre,
        rated = rated_ids.len(),
        returned = movies.len(),
        "Personalized recommendations computed"
    );

    Ok(Recommendation::new(movies, RecommendationType::Personalized))
}

/// The most frequent genre across the given movies
///
/// Ties resolve to the lexicographically smallest genre name, which keeps the
/// selection deterministic across runs.
fn favorite_genre(movies: &[Movie]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for movie in movies {
        for genre in &movie.genres {
            *counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (genre, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((genre, count)),
        }
    }

    best.map(|(genre, _)| genre.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppResult;
    use crate::models::{NewMovie, Rating};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::cmp::Ordering;

    /// In-memory catalogue with the same ordering semantics as the SQL store
    struct StubCatalog {
        movies: Vec<Movie>,
        ratings: Vec<Rating>,
    }

    impl StubCatalog {
        fn new(movies: Vec<Movie>) -> Self {
            Self {
                movies,
                ratings: vec![],
            }
        }

        fn with_ratings(mut self, ratings: Vec<Rating>) -> Self {
            self.ratings = ratings;
            self
        }
    }

    fn by_rating_desc(a: &Movie, b: &Movie) -> Ordering {
        let a_key = (a.rating.unwrap_or(0.0), a.vote_count.unwrap_or(0));
        let b_key = (b.rating.unwrap_or(0.0), b.vote_count.unwrap_or(0));
        b_key
            .partial_cmp(&a_key)
            .unwrap_or(Ordering::Equal)
    }

    #[async_trait]
    impl CatalogStore for StubCatalog {
        async fn list_movies(&self, offset: i64, limit: i64) -> AppResult<Vec<Movie>> {
            Ok(self
                .movies
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn list_all_movies(&self) -> AppResult<Vec<Movie>> {
            Ok(self.movies.clone())
        }

        async fn get_movie(&self, id: i64) -> AppResult<Option<Movie>> {
            Ok(self.movies.iter().find(|m| m.id == id).cloned())
        }

        async fn search_movies(&self, query: &str, limit: i64) -> AppResult<Vec<Movie>> {
            let query = query.to_lowercase();
            Ok(self
                .movies
                .iter()
                .filter(|m| m.title.to_lowercase().contains(&query))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn movies_by_genre(&self, genre: &str, limit: i64) -> AppResult<Vec<Movie>> {
            Ok(self
                .movies
                .iter()
                .filter(|m| m.genres.iter().any(|g| g == genre))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn trending_movies(&self, limit: i64) -> AppResult<Vec<Movie>> {
            let mut movies = self.movies.clone();
            movies.sort_by_key(|m| std::cmp::Reverse(m.vote_count.unwrap_or(0)));
            movies.truncate(limit as usize);
            Ok(movies)
        }

        async fn top_rated_movies(
            &self,
            min_rating: f64,
            min_votes: i64,
            limit: i64,
        ) -> AppResult<Vec<Movie>> {
            let mut movies: Vec<Movie> = self
                .movies
                .iter()
                .filter(|m| {
                    m.rating.is_some_and(|r| r >= min_rating)
                        && m.vote_count.is_some_and(|v| v >= min_votes)
                })
                .cloned()
                .collect();
            movies.sort_by(by_rating_desc);
            movies.truncate(limit as usize);
            Ok(movies)
        }

        async fn movies_with_genre_excluding(
            &self,
            genre: &str,
            excluded_ids: &[i64],
            min_rating: f64,
            limit: i64,
        ) -> AppResult<Vec<Movie>> {
            let mut movies: Vec<Movie> = self
                .movies
                .iter()
                .filter(|m| {
                    m.genres.iter().any(|g| g == genre)
                        && !excluded_ids.contains(&m.id)
                        && m.rating.is_some_and(|r| r >= min_rating)
                })
                .cloned()
                .collect();
            movies.sort_by(by_rating_desc);
            movies.truncate(limit as usize);
            Ok(movies)
        }

        async fn movies_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Movie>> {
            Ok(self
                .movies
                .iter()
                .filter(|m| ids.contains(&m.id))
                .cloned()
                .collect())
        }

        async fn upsert_movie(&self, _movie: &NewMovie) -> AppResult<Movie> {
            unimplemented!("not exercised by engine tests")
        }

        async fn ratings_for_user(&self, user_id: i64) -> AppResult<Vec<Rating>> {
            Ok(self
                .ratings
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn upsert_rating(
            &self,
            _user_id: i64,
            _movie_id: i64,
            _score: f64,
        ) -> AppResult<Rating> {
            unimplemented!("not exercised by engine tests")
        }

        async fn delete_rating(&self, _rating_id: i64, _user_id: i64) -> AppResult<bool> {
            unimplemented!("not exercised by engine tests")
        }
    }

    fn movie(id: i64, genres: &[&str], rating: f64, votes: i64) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            overview: None,
            release_date: None,
            runtime: None,
            genres: genres.iter().map(|s| s.to_string()).collect(),
            rating: Some(rating),
            vote_count: Some(votes),
            poster_path: None,
            backdrop_path: None,
            imdb_id: None,
            tmdb_id: None,
            director: None,
            cast: vec![],
            keywords: vec![],
            created_at: Utc::now(),
        }
    }

    fn rating(user_id: i64, movie_id: i64, score: f64) -> Rating {
        Rating {
            id: movie_id,
            user_id,
            movie_id,
            score,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_favorite_genre_counts_across_movies() {
        let movies = vec![
            movie(1, &["Action", "Sci-Fi"], 8.0, 500),
            movie(2, &["Action"], 7.5, 300),
            movie(3, &["Drama"], 8.5, 900),
        ];
        assert_eq!(favorite_genre(&movies), Some("Action".to_string()));
    }

    #[test]
    fn test_favorite_genre_tie_breaks_lexicographically() {
        let movies = vec![
            movie(1, &["Thriller"], 8.0, 500),
            movie(2, &["Action"], 7.5, 300),
        ];
        assert_eq!(favorite_genre(&movies), Some("Action".to_string()));
    }

    #[test]
    fn test_favorite_genre_empty() {
        assert_eq!(favorite_genre(&[]), None);
        assert_eq!(favorite_genre(&[movie(1, &[], 8.0, 100)]), None);
    }

    #[tokio::test]
    async fn test_content_based_excludes_target() {
        let store = StubCatalog::new(vec![
            movie(1, &["Action", "Sci-Fi"], 8.0, 500),
            movie(2, &["Action"], 7.0, 200),
            movie(3, &["Drama"], 6.0, 100),
        ]);

        let result = content_based(&store, 1, 10).await.unwrap();
        assert!(result.movies.iter().all(|m| m.id != 1));
        assert!(result.movies.len() <= 2);
    }

    #[tokio::test]
    async fn test_content_based_unknown_movie_is_empty() {
        let store = StubCatalog::new(vec![movie(1, &["Action"], 8.0, 500)]);

        let result = content_based(&store, 999, 10).await.unwrap();
        assert!(result.movies.is_empty());
        assert_eq!(result.recommendation_type, RecommendationType::ContentBased);
        assert_eq!(result.confidence_score, Some(0.8));
    }

    #[tokio::test]
    async fn test_content_based_prefers_higher_vocabulary_overlap() {
        // B shares "action" with A; C shares nothing
        let store = StubCatalog::new(vec![
            movie(1, &["Action", "Sci-Fi"], 8.0, 500),
            movie(2, &["Action"], 7.0, 200),
            movie(3, &["Drama"], 6.0, 100),
        ]);

        let result = content_based(&store, 1, 2).await.unwrap();
        assert_eq!(result.movies[0].id, 2);
    }

    #[tokio::test]
    async fn test_content_based_respects_limit() {
        let store = StubCatalog::new(
            (1..=8).map(|id| movie(id, &["Action"], 7.0, 100)).collect(),
        );

        let result = content_based(&store, 1, 3).await.unwrap();
        assert_eq!(result.movies.len(), 3);
    }

    #[tokio::test]
    async fn test_content_based_single_movie_corpus() {
        let store = StubCatalog::new(vec![movie(1, &["Action"], 8.0, 500)]);

        let result = content_based(&store, 1, 10).await.unwrap();
        assert!(result.movies.is_empty());
    }

    #[tokio::test]
    async fn test_content_based_is_deterministic() {
        let store = StubCatalog::new(vec![
            movie(1, &["Action", "Sci-Fi"], 8.0, 500),
            movie(2, &["Action", "Thriller"], 7.0, 200),
            movie(3, &["Sci-Fi", "Drama"], 6.0, 100),
            movie(4, &["Thriller"], 7.5, 400),
        ]);

        let first: Vec<i64> = content_based(&store, 1, 4)
            .await
            .unwrap()
            .movies
            .iter()
            .map(|m| m.id)
            .collect();

        for _ in 0..5 {
            let again: Vec<i64> = content_based(&store, 1, 4)
                .await
                .unwrap()
                .movies
                .iter()
                .map(|m| m.id)
                .collect();
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn test_popularity_filters_and_sorts() {
        let store = StubCatalog::new(vec![
            movie(1, &["Action"], 7.2, 150),
            movie(2, &["Drama"], 9.0, 50),    // too few votes
            movie(3, &["Drama"], 6.9, 2000),  // rating too low
            movie(4, &["Comedy"], 8.1, 300),
            movie(5, &["Comedy"], 8.1, 900),
        ]);

        let result = popularity_based(&store, 10).await.unwrap();
        let ids: Vec<i64> = result.movies.iter().map(|m| m.id).collect();

        // 8.1/900 before 8.1/300 (vote count breaks the tie), then 7.2/150
        assert_eq!(ids, vec![5, 4, 1]);
        assert!(result
            .movies
            .iter()
            .all(|m| m.rating.unwrap() >= 7.0 && m.vote_count.unwrap() >= 100));
        assert_eq!(result.recommendation_type, RecommendationType::Popularity);
        assert_eq!(result.confidence_score, None);
    }

    #[tokio::test]
    async fn test_popularity_does_not_pad() {
        let store = StubCatalog::new(vec![
            movie(1, &["Action"], 8.0, 500),
            movie(2, &["Drama"], 7.5, 200),
            movie(3, &["Drama"], 5.0, 2000),
        ]);

        let result = popularity_based(&store, 5).await.unwrap();
        assert_eq!(result.movies.len(), 2);
    }

    #[tokio::test]
    async fn test_personalized_cold_start_matches_popularity() {
        let store = StubCatalog::new(vec![
            movie(1, &["Action"], 8.0, 500),
            movie(2, &["Drama"], 7.5, 200),
            movie(3, &["Comedy"], 9.0, 1000),
        ]);

        let popular = popularity_based(&store, 10).await.unwrap();
        let personal = personalized(&store, 42, 10).await.unwrap();

        assert_eq!(personal.movies, popular.movies);
        assert_eq!(personal.recommendation_type, RecommendationType::Personalized);
        assert_eq!(personal.confidence_score, Some(0.9));
    }

    #[tokio::test]
    async fn test_personalized_favors_liked_genre() {
        let store = StubCatalog::new(vec![
            movie(1, &["Action"], 8.0, 500),  // rated 5.0
            movie(2, &["Drama"], 8.5, 700),   // rated 2.0
            movie(3, &["Action"], 8.2, 400),
            movie(4, &["Drama"], 9.0, 1200),
            movie(5, &["Action"], 7.4, 150),
        ])
        .with_ratings(vec![rating(7, 1, 5.0), rating(7, 2, 2.0)]);

        let result = personalized(&store, 7, 10).await.unwrap();
        let ids: Vec<i64> = result.movies.iter().map(|m| m.id).collect();

        // Action candidates only, rated movies excluded, rating descending
        assert_eq!(ids, vec![3, 5]);
    }

    #[tokio::test]
    async fn test_personalized_excludes_all_rated_movies() {
        let store = StubCatalog::new(vec![
            movie(1, &["Action"], 8.0, 500),
            movie(2, &["Action"], 7.2, 300),  // rated low, still excluded
            movie(3, &["Action"], 8.2, 400),
        ])
        .with_ratings(vec![rating(7, 1, 5.0), rating(7, 2, 1.5)]);

        let result = personalized(&store, 7, 10).await.unwrap();
        let ids: Vec<i64> = result.movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn test_personalized_without_liked_movies_falls_back() {
        let store = StubCatalog::new(vec![
            movie(1, &["Action"], 8.0, 500),
            movie(2, &["Drama"], 7.5, 200),
        ])
        .with_ratings(vec![rating(7, 1, 2.0)]);

        let popular = popularity_based(&store, 10).await.unwrap();
        let personal = personalized(&store, 7, 10).await.unwrap();
        assert_eq!(personal.movies, popular.movies);
    }

    #[tokio::test]
    async fn test_personalized_with_genreless_liked_movies_falls_back() {
        let store = StubCatalog::new(vec![
            movie(1, &[], 8.0, 500),
            movie(2, &["Drama"], 7.5, 200),
        ])
        .with_ratings(vec![rating(7, 1, 4.5)]);

        let popular = popularity_based(&store, 10).await.unwrap();
        let personal = personalized(&store, 7, 10).await.unwrap();
        assert_eq!(personal.movies, popular.movies);
    }
}
