//! Intent matching over the session frontier.

use std::sync::Arc;

use scriptflow_core::ScenarioNode;
use tracing::warn;

use crate::graph::ScenarioGraph;
use crate::scorer::SimilarityScorer;

/// Score reported when there was nothing to match against.
///
/// Lower than any real score, so "no candidates" stays distinguishable from
/// "best candidate scored zero".
pub const NO_CANDIDATE_SCORE: f64 = -1.0;

/// Result of matching an utterance against a candidate set.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentMatch {
    pub node_id: Option<String>,
    pub score: f64,
}

impl IntentMatch {
    fn none() -> Self {
        Self {
            node_id: None,
            score: NO_CANDIDATE_SCORE,
        }
    }
}

/// Picks the best-scoring node among candidates.
#[derive(Clone)]
pub struct IntentMatcher {
    scorer: Arc<dyn SimilarityScorer>,
}

impl IntentMatcher {
    pub fn new(scorer: Arc<dyn SimilarityScorer>) -> Self {
        Self { scorer }
    }

    /// Highest score of the utterance against any of the node's intents.
    pub fn node_score(&self, utterance: &str, node: &ScenarioNode) -> f64 {
        node.intents
            .iter()
            .map(|phrase| self.scorer.score(utterance, phrase))
            .fold(NO_CANDIDATE_SCORE, f64::max)
    }

    /// Best candidate by node score. Ties keep the earliest candidate.
    ///
    /// Candidates missing from the graph are skipped. Returns
    /// [`NO_CANDIDATE_SCORE`] and no node when nothing could be scored.
    pub fn best_match(
        &self,
        utterance: &str,
        candidates: &[String],
        graph: &ScenarioGraph,
    ) -> IntentMatch {
        let mut best = IntentMatch::none();
        for id in candidates {
            let Some(node) = graph.get(id) else {
                warn!(node = %id, "Skipping candidate missing from scenario graph");
                continue;
            };
            let score = self.node_score(utterance, node);
            if score > best.score {
                best = IntentMatch {
                    node_id: Some(id.clone()),
                    score,
                };
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::JaccardScorer;

    fn node(id: &str, intents: &[&str]) -> ScenarioNode {
        ScenarioNode {
            id: id.to_string(),
            intents: intents.iter().map(|s| s.to_string()).collect(),
            slots: vec![],
            children: vec![],
            response_template: String::new(),
        }
    }

    fn graph() -> ScenarioGraph {
        ScenarioGraph::from_nodes(vec![
            node("buy", &["我要买衣服", "买衣服"]),
            node("movie", &["我想看电影"]),
            node("buy_again", &["我要买衣服"]),
        ])
        .unwrap()
    }

    fn matcher() -> IntentMatcher {
        IntentMatcher::new(Arc::new(JaccardScorer))
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_node_score_takes_best_intent() {
        let g = graph();
        let score = matcher().node_score("买衣服", g.get("buy").unwrap());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_best_match_picks_highest() {
        let found = matcher().best_match("我想看电影", &ids(&["buy", "movie"]), &graph());
        assert_eq!(found.node_id.as_deref(), Some("movie"));
        assert_eq!(found.score, 1.0);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let m = matcher();
        let g = graph();
        let found = m.best_match("我要买衣服", &ids(&["buy", "buy_again"]), &g);
        assert_eq!(found.node_id.as_deref(), Some("buy"));

        let found = m.best_match("我要买衣服", &ids(&["buy_again", "buy"]), &g);
        assert_eq!(found.node_id.as_deref(), Some("buy_again"));
    }

    #[test]
    fn test_empty_candidates() {
        let found = matcher().best_match("anything", &[], &graph());
        assert_eq!(found.node_id, None);
        assert_eq!(found.score, NO_CANDIDATE_SCORE);
    }

    #[test]
    fn test_zero_score_still_matches() {
        let found = matcher().best_match("xyz", &ids(&["movie"]), &graph());
        assert_eq!(found.node_id.as_deref(), Some("movie"));
        assert_eq!(found.score, 0.0);
    }

    #[test]
    fn test_missing_candidate_skipped() {
        let found = matcher().best_match("我想看电影", &ids(&["ghost", "movie"]), &graph());
        assert_eq!(found.node_id.as_deref(), Some("movie"));

        let found = matcher().best_match("我想看电影", &ids(&["ghost"]), &graph());
        assert_eq!(found.node_id, None);
        assert_eq!(found.score, NO_CANDIDATE_SCORE);
    }
}
