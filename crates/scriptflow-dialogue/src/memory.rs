//! Per-conversation session memory.
//!
//! The only mutable state in the dialogue pipeline. Each conversation owns
//! one `SessionMemory`; the manager mutates it once per turn and never keeps
//! a reference to it.

use std::collections::BTreeMap;

use chrono::Local;
use scriptflow_core::{DialogueState, Policy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMemory {
    pub(crate) id: Uuid,
    pub(crate) started_at: i64,
    /// Frontier the session started with.
    pub(crate) root_nodes: Vec<String>,
    /// Root of the scenario currently in progress.
    #[serde(default)]
    pub(crate) active_root: Option<String>,
    /// Current frontier, without duplicates.
    pub(crate) available_nodes: Vec<String>,
    /// Accumulated across turns, never overwritten.
    pub(crate) filled_slots: BTreeMap<String, String>,

    // Recomputed on every substantive turn.
    pub(crate) hit_node: Option<String>,
    pub(crate) intent_score: Option<f64>,
    pub(crate) require_slot: Option<String>,
    pub(crate) policy: Option<Policy>,

    pub(crate) last_response: Option<String>,
    /// Consecutive replays since the last substantive turn.
    pub(crate) repeat_count: u32,
    /// Substantive (non-replay) turns processed.
    pub(crate) turn_count: u64,
}

impl SessionMemory {
    pub(crate) fn new(roots: Vec<String>) -> Self {
        let roots = dedup(roots);
        Self {
            id: Uuid::new_v4(),
            started_at: Local::now().timestamp(),
            available_nodes: roots.clone(),
            root_nodes: roots,
            active_root: None,
            filled_slots: BTreeMap::new(),
            hit_node: None,
            intent_score: None,
            require_slot: None,
            policy: None,
            last_response: None,
            repeat_count: 0,
            turn_count: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Session start as epoch seconds.
    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn root_nodes(&self) -> &[String] {
        &self.root_nodes
    }

    pub fn active_root(&self) -> Option<&str> {
        self.active_root.as_deref()
    }

    pub fn available_nodes(&self) -> &[String] {
        &self.available_nodes
    }

    pub fn filled_slots(&self) -> &BTreeMap<String, String> {
        &self.filled_slots
    }

    pub fn slot(&self, name: &str) -> Option<&str> {
        self.filled_slots.get(name).map(String::as_str)
    }

    pub fn hit_node(&self) -> Option<&str> {
        self.hit_node.as_deref()
    }

    pub fn intent_score(&self) -> Option<f64> {
        self.intent_score
    }

    pub fn require_slot(&self) -> Option<&str> {
        self.require_slot.as_deref()
    }

    /// Policy of the last substantive turn. Replays leave it untouched.
    pub fn policy(&self) -> Option<Policy> {
        self.policy
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    /// True once a node has completed and nothing is reachable.
    pub fn is_exhausted(&self) -> bool {
        self.available_nodes.is_empty() && self.policy.is_some()
    }

    /// Conversation state implied by the last substantive turn.
    pub fn state(&self) -> DialogueState {
        if self.is_exhausted() {
            return DialogueState::Exhausted;
        }
        match self.policy {
            None | Some(Policy::NoMatch) => DialogueState::AwaitingInput,
            Some(Policy::Request) => DialogueState::SlotMissing,
            Some(Policy::Reply) => DialogueState::NodeComplete,
            Some(Policy::Repeat) => DialogueState::Replay,
        }
    }

    pub(crate) fn set_frontier(&mut self, nodes: Vec<String>) {
        self.available_nodes = dedup(nodes);
    }

    /// Begin a fresh scenario at `root`, dropping everything the previous
    /// scenario collected. Replay history is kept.
    pub(crate) fn enter_scenario(&mut self, root: String) {
        self.filled_slots.clear();
        self.hit_node = None;
        self.intent_score = None;
        self.require_slot = None;
        self.policy = None;
        self.available_nodes = vec![root.clone()];
        self.active_root = Some(root);
    }
}

/// Drop repeated ids, keeping first occurrences in order.
fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
