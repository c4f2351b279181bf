use serde::{Deserialize, Serialize};

use super::Movie;

/// Strategy that produced a recommendation list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    ContentBased,
    Popularity,
    Personalized,
}

impl RecommendationType {
    /// Static confidence attached to results of this strategy
    ///
    /// These are fixed per-strategy constants, not derived from the ranking
    /// scores. Plain popularity lists carry no confidence.
    pub fn confidence(self) -> Option<f64> {
        match self {
            RecommendationType::ContentBased => Some(0.8),
            RecommendationType::Personalized => Some(0.9),
            RecommendationType::Popularity => None,
        }
    }
}

/// An ordered recommendation list; insertion order is rank order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub movies: Vec<Movie>,
    pub recommendation_type: RecommendationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl Recommendation {
    /// Wraps a ranked movie list with its strategy tag and confidence
    pub fn new(movies: Vec<Movie>, recommendation_type: RecommendationType) -> Self {
        Self {
            movies,
            recommendation_type,
            confidence_score: recommendation_type.confidence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_type_serialization() {
        assert_eq!(
            serde_json::to_string(&RecommendationType::ContentBased).unwrap(),
            "\"content_based\""
        );
        assert_eq!(
            serde_json::to_string(&RecommendationType::Popularity).unwrap(),
            "\"popularity\""
        );
        assert_eq!(
            serde_json::to_string(&RecommendationType::Personalized).unwrap(),
            "\"personalized\""
        );
    }

    #[test]
    fn test_confidence_constants() {
        assert_eq!(RecommendationType::ContentBased.confidence(), Some(0.8));
        assert_eq!(RecommendationType::Personalized.confidence(), Some(0.9));
        assert_eq!(RecommendationType::Popularity.confidence(), None);
    }

    #[test]
    fn test_new_attaches_confidence() {
        let rec = Recommendation::new(vec![], RecommendationType::Personalized);
        assert_eq!(rec.confidence_score, Some(0.9));
        assert!(rec.movies.is_empty());
    }
}
