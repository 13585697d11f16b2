//! Slot catalog: prompts and compiled value patterns, keyed by slot name.

use std::collections::HashMap;

use regex::Regex;
use scriptflow_core::SlotDefinition;
use tracing::info;

use crate::error::DialogueError;
use crate::graph::ScenarioGraph;

/// A slot with its pattern compiled.
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: String,
    pub prompt: String,
    pub pattern: Regex,
}

impl Slot {
    /// First substring of `utterance` matching the slot pattern.
    pub fn extract<'a>(&self, utterance: &'a str) -> Option<&'a str> {
        self.pattern.find(utterance).map(|m| m.as_str())
    }
}

/// Read-only slot lookup shared by every session.
#[derive(Debug, Clone, Default)]
pub struct SlotCatalog {
    slots: HashMap<String, Slot>,
}

impl SlotCatalog {
    /// Compile every slot pattern. Fails on duplicates or invalid regexes.
    pub fn new(definitions: Vec<SlotDefinition>) -> Result<Self, DialogueError> {
        let mut slots = HashMap::with_capacity(definitions.len());
        for def in definitions {
            if slots.contains_key(&def.name) {
                return Err(DialogueError::DuplicateSlot(def.name));
            }
            let pattern = Regex::new(&def.pattern).map_err(|e| DialogueError::InvalidPattern {
                slot: def.name.clone(),
                reason: e.to_string(),
            })?;
            slots.insert(
                def.name.clone(),
                Slot {
                    name: def.name,
                    prompt: def.prompt,
                    pattern,
                },
            );
        }
        info!(slots = slots.len(), "Slot catalog compiled");
        Ok(Self { slots })
    }

    /// Parse slot definitions from a JSON array of template rows.
    pub fn from_json(json: &str) -> Result<Self, DialogueError> {
        let definitions: Vec<SlotDefinition> = serde_json::from_str(json)?;
        Self::new(definitions)
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every slot a node requires must be in the catalog.
    pub fn check_graph(&self, graph: &ScenarioGraph) -> Result<(), DialogueError> {
        for node in graph.nodes() {
            if let Some(slot) = node.slots.iter().find(|s| !self.slots.contains_key(*s)) {
                return Err(DialogueError::UnknownSlot {
                    node: node.id.clone(),
                    slot: slot.clone(),
                });
            }
        }
        Ok(())
    }
}
