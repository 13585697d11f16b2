//! Dialogue manager: runs one turn of the NLU -> DST -> DPO -> NLG pipeline.
//!
//! The manager owns the read-only scenario graph and slot catalog and holds
//! no per-conversation state, so one instance can serve any number of
//! sessions. All conversation state lives in the caller's [`SessionMemory`].

use std::sync::Arc;

use scriptflow_core::{DialogueState, Policy, ScenarioNode, ScriptflowConfig};
use tracing::{debug, info};

use crate::catalog::SlotCatalog;
use crate::error::DialogueError;
use crate::graph::ScenarioGraph;
use crate::intent::IntentMatcher;
use crate::memory::SessionMemory;
use crate::repeat::RepeatDetector;
use crate::response::render_reply;
use crate::scorer::{JaccardScorer, SimilarityScorer};
use crate::slots::SlotFiller;

/// Output of a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResponse {
    /// Text to show the user.
    pub text: String,
    /// Action class of this turn.
    pub policy: Policy,
    /// Conversation state after the turn.
    pub state: DialogueState,
}

/// Scripted, slot-filling dialogue manager.
pub struct DialogueManager {
    graph: ScenarioGraph,
    catalog: SlotCatalog,
    matcher: IntentMatcher,
    filler: SlotFiller,
    repeat: RepeatDetector,
    config: ScriptflowConfig,
}

impl DialogueManager {
    /// Create a manager scoring with [`JaccardScorer`].
    pub fn new(
        graph: ScenarioGraph,
        catalog: SlotCatalog,
        config: ScriptflowConfig,
    ) -> Result<Self, DialogueError> {
        Self::with_scorer(graph, catalog, config, Arc::new(JaccardScorer))
    }

    /// Create a manager with a custom similarity scorer.
    ///
    /// Fails if the configuration is out of range or a node requires a slot
    /// the catalog does not define.
    pub fn with_scorer(
        graph: ScenarioGraph,
        catalog: SlotCatalog,
        config: ScriptflowConfig,
        scorer: Arc<dyn SimilarityScorer>,
    ) -> Result<Self, DialogueError> {
        config.validate()?;
        catalog.check_graph(&graph)?;

        let matcher = IntentMatcher::new(Arc::clone(&scorer));
        let repeat = RepeatDetector::new(&config.repeat, scorer);

        info!(
            nodes = graph.len(),
            slots = catalog.len(),
            "Dialogue manager ready"
        );

        Ok(Self {
            graph,
            catalog,
            matcher,
            filler: SlotFiller,
            repeat,
            config,
        })
    }

    pub fn graph(&self) -> &ScenarioGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ScriptflowConfig {
        &self.config
    }

    /// Start a conversation whose frontier is `roots`.
    pub fn start_session(&self, roots: Vec<String>) -> Result<SessionMemory, DialogueError> {
        if roots.is_empty() {
            return Err(DialogueError::EmptyFrontier);
        }
        if let Some(unknown) = roots.iter().find(|id| !self.graph.contains(id)) {
            return Err(DialogueError::UnknownStartNode(unknown.clone()));
        }
        let memory = SessionMemory::new(roots);
        info!(session = %memory.id(), roots = ?memory.root_nodes(), "Session started");
        Ok(memory)
    }

    /// Start a conversation at every root of the graph.
    pub fn start_default_session(&self) -> Result<SessionMemory, DialogueError> {
        self.start_session(self.graph.root_ids())
    }

    /// Process one user utterance and update `memory`.
    ///
    /// Always produces a response. Replay requests are answered before any
    /// intent matching and leave the frontier and per-turn fields untouched.
    pub fn run(&self, utterance: &str, memory: &mut SessionMemory) -> TurnResponse {
        if self.repeat.is_repeat(utterance) {
            return self.replay(memory);
        }

        self.switch_scenario(utterance, memory);

        // NLU: intent
        let found = self
            .matcher
            .best_match(utterance, &memory.available_nodes, &self.graph);
        memory.intent_score = Some(found.score);

        let node = found
            .node_id
            .as_deref()
            .filter(|_| found.score > self.config.matching.min_intent_score)
            .and_then(|id| self.graph.get(id));

        let Some(node) = node else {
            memory.hit_node = None;
            memory.require_slot = None;
            memory.policy = Some(Policy::NoMatch);
            let text = self.config.responses.no_match.clone();
            return self.finish_turn(memory, text, Policy::NoMatch);
        };
        memory.hit_node = Some(node.id.clone());
        if memory.root_nodes.contains(&node.id) {
            memory.active_root = Some(node.id.clone());
        }

        // NLU: slots
        self.filler
            .fill(utterance, node, &self.catalog, &mut memory.filled_slots);

        // DST
        memory.require_slot = node
            .slots
            .iter()
            .find(|name| !memory.filled_slots.contains_key(*name))
            .cloned();

        // DPO
        let policy = if memory.require_slot.is_some() {
            memory.set_frontier(vec![node.id.clone()]);
            Policy::Request
        } else {
            memory.set_frontier(node.children.clone());
            Policy::Reply
        };
        memory.policy = Some(policy);
        if policy == Policy::Reply && node.is_terminal() {
            info!(session = %memory.id(), node = %node.id, "Conversation reached a terminal node");
        }

        // NLG
        let text = self.generate(node, policy, memory);
        self.finish_turn(memory, text, policy)
    }

    fn generate(&self, node: &ScenarioNode, policy: Policy, memory: &SessionMemory) -> String {
        match (policy, memory.require_slot.as_deref()) {
            (Policy::Request, Some(slot)) => self
                .catalog
                .get(slot)
                .map(|s| s.prompt.clone())
                .unwrap_or_else(|| self.config.responses.no_match.clone()),
            _ => render_reply(node, &memory.filled_slots),
        }
    }

    fn finish_turn(&self, memory: &mut SessionMemory, text: String, policy: Policy) -> TurnResponse {
        memory.last_response = Some(text.clone());
        memory.repeat_count = 0;
        memory.turn_count += 1;

        let state = memory.state();
        debug!(
            session = %memory.id(),
            turn = memory.turn_count,
            policy = %policy,
            state = %state,
            hit = ?memory.hit_node,
            score = ?memory.intent_score,
            require_slot = ?memory.require_slot,
            "Turn processed"
        );

        TurnResponse {
            text,
            policy,
            state,
        }
    }

    fn replay(&self, memory: &mut SessionMemory) -> TurnResponse {
        let limit = self.config.repeat.max_repeat_count;
        let text = if memory.repeat_count >= limit {
            debug!(session = %memory.id(), limit, "Replay limit reached");
            self.config.responses.repeat_limit.clone()
        } else {
            memory.repeat_count += 1;
            match memory.last_response.as_deref() {
                Some(previous) => format!("{}{}", self.config.repeat.replay_prefix, previous),
                None => self.config.responses.nothing_to_repeat.clone(),
            }
        };
        debug!(session = %memory.id(), count = memory.repeat_count, "Replaying");

        TurnResponse {
            text,
            policy: Policy::Repeat,
            state: DialogueState::Replay,
        }
    }

    /// Restart the session at a root of another scenario when the utterance
    /// clearly targets it.
    ///
    /// The active scenario's root and roots already on the frontier are
    /// never candidates, so a completed node cannot be re-entered this way.
    fn switch_scenario(&self, utterance: &str, memory: &mut SessionMemory) {
        let Some(threshold) = self.config.matching.scenario_switch_threshold else {
            return;
        };
        let candidates: Vec<String> = memory
            .root_nodes
            .iter()
            .filter(|id| memory.active_root.as_ref() != Some(*id))
            .filter(|id| !memory.available_nodes.contains(id))
            .cloned()
            .collect();
        let found = self.matcher.best_match(utterance, &candidates, &self.graph);
        if let Some(root) = found.node_id.filter(|_| found.score > threshold) {
            info!(session = %memory.id(), root = %root, score = found.score, "Switching scenario");
            memory.enter_scenario(root);
        }
    }
}
