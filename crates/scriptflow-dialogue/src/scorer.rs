//! Phrase similarity scoring.
//!
//! - `SimilarityScorer` is the seam intent matching and replay detection
//!   score through. Learned scorers plug in here.
//! - `JaccardScorer` compares the character sets of two strings. It ignores
//!   order and frequency, which existing scenario scripts are tuned against.

use std::collections::HashSet;

/// Scores how alike two phrases are.
///
/// Implementations must be deterministic, symmetric and return a value in
/// `[0, 1]`.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Jaccard index over the characters of both strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardScorer;

impl SimilarityScorer for JaccardScorer {
    fn score(&self, a: &str, b: &str) -> f64 {
        let left: HashSet<char> = a.chars().collect();
        let right: HashSet<char> = b.chars().collect();

        let union = left.union(&right).count();
        if union == 0 {
            return 0.0;
        }
        let intersection = left.intersection(&right).count();
        intersection as f64 / union as f64
    }
}
