pub mod movie;
pub mod rating;
pub mod recommendation;

pub use movie::{
    Movie, NewMovie, TmdbCredits, TmdbKeywords, TmdbMovieDetails, TmdbMovieSummary, TmdbPage,
};
pub use rating::Rating;
pub use recommendation::{Recommendation, RecommendationType};
