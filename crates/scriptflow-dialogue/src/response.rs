//! Response template rendering.

use std::collections::BTreeMap;

use scriptflow_core::ScenarioNode;

/// Substitute the node's filled slots into its response template.
///
/// Only slots the node declares are substituted; any other placeholder text
/// in the template is left as written.
pub fn render_reply(node: &ScenarioNode, filled: &BTreeMap<String, String>) -> String {
    node.slots
        .iter()
        .filter_map(|name| filled.get(name).map(|value| (name, value)))
        .fold(node.response_template.clone(), |text, (name, value)| {
            text.replace(name.as_str(), value)
        })
}
