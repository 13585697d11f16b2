//! Replay request detection.

use std::sync::Arc;

use scriptflow_core::config::{RepeatConfig, RepeatStrategy};

use crate::scorer::SimilarityScorer;

/// Decides whether an utterance asks to hear the previous answer again.
///
/// Stateless; the replay counter lives in the session memory.
#[derive(Clone)]
pub struct RepeatDetector {
    strategy: RepeatStrategy,
    phrases: Vec<String>,
    threshold: f64,
    scorer: Arc<dyn SimilarityScorer>,
}

impl RepeatDetector {
    pub fn new(config: &RepeatConfig, scorer: Arc<dyn SimilarityScorer>) -> Self {
        Self {
            strategy: config.strategy,
            phrases: config
                .phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            threshold: config.similarity_threshold,
            scorer,
        }
    }

    pub fn is_repeat(&self, utterance: &str) -> bool {
        let utterance = utterance.trim().to_lowercase();
        if utterance.is_empty() {
            return false;
        }
        match self.strategy {
            RepeatStrategy::Keyword => self.phrases.iter().any(|p| contains_phrase(&utterance, p)),
            RepeatStrategy::Similarity => self
                .phrases
                .iter()
                .any(|p| self.scorer.score(&utterance, p) > self.threshold),
        }
    }
}

/// Substring search where a phrase edge that is an ASCII letter or digit
/// must not run into another ASCII letter or digit. Scripts without word
/// separators, such as Chinese, match as plain substrings.
fn contains_phrase(utterance: &str, phrase: &str) -> bool {
    let word_char = |c: char| c.is_ascii_alphanumeric();
    let check_start = phrase.starts_with(word_char);
    let check_end = phrase.ends_with(word_char);
    utterance.match_indices(phrase).any(|(at, _)| {
        let before = utterance[..at].chars().next_back();
        let after = utterance[at + phrase.len()..].chars().next();
        !(check_start && before.is_some_and(word_char))
            && !(check_end && after.is_some_and(word_char))
    })
}
