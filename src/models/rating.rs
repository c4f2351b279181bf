use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score a user may assign to a movie, bounded to the 1.0-5.0 star scale
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// A user's rating of a movie
///
/// At most one rating exists per (user, movie) pair; re-rating a movie
/// overwrites the previous score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub movie_id: i64,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rating {
    /// Validates that a score falls within the accepted range
    pub fn validate_score(score: f64) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_score_in_range() {
        assert!(Rating::validate_score(1.0));
        assert!(Rating::validate_score(3.5));
        assert!(Rating::validate_score(5.0));
    }

    #[test]
    fn test_validate_score_out_of_range() {
        assert!(!Rating::validate_score(0.5));
        assert!(!Rating::validate_score(5.1));
        assert!(!Rating::validate_score(f64::NAN));
    }
}
