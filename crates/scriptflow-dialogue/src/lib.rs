//! Scripted multi-turn dialogue management.
//!
//! Turns a graph of scenario nodes plus raw user utterances into system
//! responses: intent matching over the current frontier, regex slot filling
//! across turns, slot-request / reply policy selection, template rendering,
//! and "say that again" replay.

pub mod catalog;
pub mod error;
pub mod graph;
pub mod intent;
pub mod manager;
pub mod memory;
pub mod repeat;
pub mod response;
pub mod scorer;
pub mod slots;

pub use catalog::{Slot, SlotCatalog};
pub use error::DialogueError;
pub use graph::{ScenarioGraph, ScenarioSource, SourceNode};
pub use intent::{IntentMatch, IntentMatcher, NO_CANDIDATE_SCORE};
pub use manager::{DialogueManager, TurnResponse};
pub use memory::SessionMemory;
pub use repeat::RepeatDetector;
pub use response::render_reply;
pub use scorer::{JaccardScorer, SimilarityScorer};
pub use slots::SlotFiller;
