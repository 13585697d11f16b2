//! Error types for the dialogue manager.
//!
//! Every variant is a load-time configuration error. Turn processing never
//! fails; unmatched input and unfillable slots become policy branches.

use scriptflow_core::ScriptflowError;

/// Errors raised while building a scenario graph, slot catalog or session.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("scenario graph is empty")]
    EmptyGraph,
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),
    #[error("node {node} references missing child {child}")]
    DanglingChild { node: String, child: String },
    #[error("node {0} has no intent phrases")]
    NodeWithoutIntents(String),
    #[error("node {node} requires slot {slot} which is not in the catalog")]
    UnknownSlot { node: String, slot: String },
    #[error("duplicate slot: {0}")]
    DuplicateSlot(String),
    #[error("invalid pattern for slot {slot}: {reason}")]
    InvalidPattern { slot: String, reason: String },
    #[error("start node not found: {0}")]
    UnknownStartNode(String),
    #[error("a session needs at least one start node")]
    EmptyFrontier,
    #[error("scenario parse error: {0}")]
    ScenarioParse(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ScriptflowError> for DialogueError {
    fn from(err: ScriptflowError) -> Self {
        DialogueError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DialogueError {
    fn from(err: serde_json::Error) -> Self {
        DialogueError::ScenarioParse(err.to_string())
    }
}
