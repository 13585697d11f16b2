//! Slot filling by pattern search.

use std::collections::BTreeMap;

use scriptflow_core::ScenarioNode;
use tracing::{debug, warn};

use crate::catalog::SlotCatalog;

/// Extracts values for a node's declared slots from an utterance.
///
/// Already-filled slots are never overwritten, and each slot's pattern is
/// applied to the raw utterance independently of the others.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotFiller;

impl SlotFiller {
    /// Fill what the utterance provides. Returns the names filled this call.
    pub fn fill(
        &self,
        utterance: &str,
        node: &ScenarioNode,
        catalog: &SlotCatalog,
        filled: &mut BTreeMap<String, String>,
    ) -> Vec<String> {
        let mut newly_filled = Vec::new();
        for name in &node.slots {
            if filled.contains_key(name) {
                continue;
            }
            let Some(slot) = catalog.get(name) else {
                warn!(node = %node.id, slot = %name, "Slot missing from catalog");
                continue;
            };
            if let Some(value) = slot.extract(utterance) {
                debug!(slot = %name, value = %value, "Slot filled");
                filled.insert(name.clone(), value.to_string());
                newly_filled.push(name.clone());
            }
        }
        newly_filled
    }
}
