use std::cmp::Ordering;

use super::vectorizer::ContentVector;

/// Ranks corpus members by cosine similarity against a target
///
/// Scores every corpus vector, including the target itself (which scores 1.0
/// and is excluded from the result). Returns at most `limit` corpus indices,
/// most similar first. The sort is stable, so ties keep the original corpus
/// iteration order. A corpus with fewer than `limit` other members simply
/// returns what exists.
pub fn rank_similar(
    target_idx: usize,
    vectors: &[ContentVector],
    limit: usize,
) -> Vec<usize> {
    let target = &vectors[target_idx];

    let mut scored: Vec<(usize, f64)> = vectors
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != target_idx)
        .map(|(idx, vector)| (idx, target.dot(vector)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    scored.into_iter().take(limit).map(|(idx, _)| idx).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use crate::services::recommendations::vectorizer::vectorize_corpus;
    use chrono::Utc;

    fn movie_with_genres(id: i64, genres: &[&str]) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            overview: None,
            release_date: None,
            runtime: None,
            genres: genres.iter().map(|s| s.to_string()).collect(),
            rating: None,
            vote_count: None,
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

    #[test]
    fn test_excludes_target() {
        let movies = vec![
            movie_with_genres(1, &["Action"]),
            movie_with_genres(2, &["Action"]),
            movie_with_genres(3, &["Drama"]),
        ];
        let vectors = vectorize_corpus(&movies);

        let ranked = rank_similar(0, &vectors, 10);
        assert!(!ranked.contains(&0));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_orders_by_similarity() {
        let movies = vec![
            movie_with_genres(1, &["Action", "Sci-Fi"]),
            movie_with_genres(2, &["Action"]),
            movie_with_genres(3, &["Drama"]),
        ];
        let vectors = vectorize_corpus(&movies);

        // Movie 2 shares "action" with the target; movie 3 shares nothing
        let ranked = rank_similar(0, &vectors, 2);
        assert_eq!(ranked, vec![1, 2]);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        // Both candidates are identical to each other and disjoint from the
        // target, so they tie at 0.0
        let movies = vec![
            movie_with_genres(1, &["Horror"]),
            movie_with_genres(2, &["Comedy"]),
            movie_with_genres(3, &["Comedy"]),
        ];
        let vectors = vectorize_corpus(&movies);

        let ranked = rank_similar(0, &vectors, 3);
        assert_eq!(ranked, vec![1, 2]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let movies: Vec<Movie> = (1..=6)
            .map(|id| movie_with_genres(id, &["Action"]))
            .collect();
        let vectors = vectorize_corpus(&movies);

        let ranked = rank_similar(0, &vectors, 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_short_corpus_returns_all_available() {
        let movies = vec![
            movie_with_genres(1, &["Action"]),
            movie_with_genres(2, &["Action"]),
        ];
        let vectors = vectorize_corpus(&movies);

        let ranked = rank_similar(0, &vectors, 10);
        assert_eq!(ranked, vec![1]);
    }

    #[test]
    fn test_single_movie_corpus() {
        let movies = vec![movie_with_genres(1, &["Action"])];
        let vectors = vectorize_corpus(&movies);

        let ranked = rank_similar(0, &vectors, 10);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_deterministic_for_fixed_corpus() {
        let movies = vec![
            movie_with_genres(1, &["Action", "Sci-Fi"]),
            movie_with_genres(2, &["Action", "Thriller"]),
            movie_with_genres(3, &["Sci-Fi", "Drama"]),
            movie_with_genres(4, &["Thriller"]),
        ];
        let vectors = vectorize_corpus(&movies);

        let first = rank_similar(0, &vectors, 4);
        for _ in 0..10 {
            assert_eq!(rank_similar(0, &vectors, 4), first);
        }
    }
}
