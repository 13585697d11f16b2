use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Scenario data
// =============================================================================

/// One conversational step of a scenario, after namespacing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioNode {
    /// Globally unique id, `<scenario_name>_<local_id>`.
    pub id: String,
    /// Reference phrases the utterance is scored against.
    pub intents: Vec<String>,
    /// Slot names that must be filled before the node replies.
    #[serde(default)]
    pub slots: Vec<String>,
    /// Namespaced ids of the nodes reachable after this one completes.
    #[serde(default)]
    pub children: Vec<String>,
    /// Reply text; slot names appearing in it are substituted verbatim.
    #[serde(default)]
    pub response_template: String,
}

impl ScenarioNode {
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

/// Declaration of a slot as it appears in a slot template.
///
/// Accepts both the field names used here and the `slot` / `query` /
/// `values` column names of existing slot templates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDefinition {
    /// Placeholder token, e.g. `#size#`.
    #[serde(alias = "slot")]
    pub name: String,
    /// Question asked when the slot is missing.
    #[serde(alias = "query")]
    pub prompt: String,
    /// Regular expression; the first match in an utterance becomes the value.
    #[serde(alias = "values")]
    pub pattern: String,
}

impl SlotDefinition {
    pub fn new(
        name: impl Into<String>,
        prompt: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            pattern: pattern.into(),
        }
    }
}

// =============================================================================
// Turn outcome enums
// =============================================================================

/// Action class chosen for a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Ask the user for a missing slot.
    Request,
    /// Render the completed node's response.
    Reply,
    /// Replay the previous response.
    Repeat,
    /// Nothing on the frontier matched.
    NoMatch,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Policy::Request => "request",
            Policy::Reply => "reply",
            Policy::Repeat => "repeat",
            Policy::NoMatch => "no_match",
        };
        f.write_str(s)
    }
}

/// Conversation state as observed through the session memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    /// Start of the conversation, or after an unmatched utterance.
    AwaitingInput,
    /// The hit node still has an unfilled slot.
    SlotMissing,
    /// The hit node replied and the frontier advanced to its children.
    NodeComplete,
    /// The turn replayed the previous response.
    Replay,
    /// A node completed and left nothing reachable.
    Exhausted,
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DialogueState::AwaitingInput => "awaiting_input",
            DialogueState::SlotMissing => "slot_missing",
            DialogueState::NodeComplete => "node_complete",
            DialogueState::Replay => "replay",
            DialogueState::Exhausted => "exhausted",
        };
        f.write_str(s)
    }
}
