use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::models::Movie;

/// Common English stop words excluded from the vocabulary
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
        "been", "before", "being", "between", "both", "but", "by", "can", "could", "did", "do",
        "does", "down", "during", "each", "few", "for", "from", "further", "had", "has", "have",
        "he", "her", "here", "him", "his", "how", "if", "in", "into", "is", "it", "its", "just",
        "more", "most", "no", "not", "now", "of", "off", "on", "once", "only", "or", "other",
        "our", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
        "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
        "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
        "when", "where", "which", "while", "who", "why", "will", "with", "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Sparse TF-IDF vector over the corpus vocabulary, L2-normalized
///
/// Weights are corpus-relative: the same movie vectorized against a different
/// corpus snapshot produces different weights. Vectors are never cached or
/// persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentVector {
    weights: HashMap<String, f64>,
}

impl ContentVector {
    /// Dot product with another vector built over the same corpus
    ///
    /// Both operands are unit-length, so this is their cosine similarity.
    pub fn dot(&self, other: &ContentVector) -> f64 {
        // Iterate the smaller map
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };

        small
            .iter()
            .filter_map(|(term, weight)| large.get(term).map(|w| weight * w))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[cfg(test)]
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }
}

/// Tokenizes content text: lowercase, split on non-alphanumeric characters,
/// drop single-character tokens and stop words
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 1 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Builds the descriptive document for a movie
///
/// Genre names first, then keyword strings, then the director name, joined by
/// single spaces. Missing fields contribute nothing; a movie with no genres,
/// keywords, or director yields an empty document.
pub fn build_document(movie: &Movie) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(movie.genres.iter().map(String::as_str));
    parts.extend(movie.keywords.iter().map(String::as_str));
    if let Some(director) = movie.director.as_deref() {
        parts.push(director);
    }
    parts.join(" ")
}

/// Vectorizes the full corpus snapshot
///
/// Returns one vector per movie, in corpus order. IDF is smoothed as
/// `ln((1 + n) / (1 + df)) + 1`; term weights are raw term frequency times
/// IDF, then L2-normalized per document.
pub fn vectorize_corpus(movies: &[Movie]) -> Vec<ContentVector> {
    let documents: Vec<Vec<String>> = movies
        .iter()
        .map(|movie| tokenize(&build_document(movie)))
        .collect();

    // Document frequency per term
    let mut df: HashMap<&str, usize> = HashMap::new();
    for tokens in &documents {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    let corpus_size = documents.len() as f64;
    documents
        .iter()
        .map(|tokens| {
            let mut tf: HashMap<&str, f64> = HashMap::new();
            for term in tokens {
                *tf.entry(term).or_insert(0.0) += 1.0;
            }

            let mut weights: HashMap<String, f64> = tf
                .into_iter()
                .map(|(term, count)| {
                    let doc_freq = df[term] as f64;
                    let idf = ((1.0 + corpus_size) / (1.0 + doc_freq)).ln() + 1.0;
                    (term.to_string(), count * idf)
                })
                .collect();

            let norm: f64 = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in weights.values_mut() {
                    *weight /= norm;
                }
            }

            ContentVector { weights }
        })
        .collect()
}
