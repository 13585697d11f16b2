//! Scenario graph construction.
//!
//! Scenario scripts use local node ids. Building a graph namespaces every
//! id as `<scenario_name>_<local_id>`, rewrites child references to match,
//! and checks referential integrity once. The resulting graph is immutable.

use std::collections::{HashMap, HashSet};

use scriptflow_core::ScenarioNode;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::DialogueError;

// =============================================================================
// Scenario sources
// =============================================================================

/// A node as written in a scenario script, before namespacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceNode {
    pub id: String,
    #[serde(default, alias = "intent")]
    pub intents: Vec<String>,
    #[serde(default, alias = "slot")]
    pub slots: Vec<String>,
    #[serde(default, alias = "childnode")]
    pub children: Vec<String>,
    #[serde(default, alias = "response_template")]
    pub response: String,
}

/// One named scenario script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSource {
    pub name: String,
    pub nodes: Vec<SourceNode>,
}

impl ScenarioSource {
    pub fn new(name: impl Into<String>, nodes: Vec<SourceNode>) -> Self {
        Self {
            name: name.into(),
            nodes,
        }
    }

    /// Parse a scenario script: a JSON array of node objects.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, DialogueError> {
        let nodes: Vec<SourceNode> = serde_json::from_str(json)?;
        Ok(Self::new(name, nodes))
    }

    fn qualify(&self, local_id: &str) -> String {
        format!("{}_{}", self.name, local_id)
    }
}

// =============================================================================
// ScenarioGraph
// =============================================================================

/// Validated, read-only mapping from namespaced node id to node.
#[derive(Debug, Clone)]
pub struct ScenarioGraph {
    nodes: HashMap<String, ScenarioNode>,
    /// Node ids in insertion order.
    order: Vec<String>,
}

impl ScenarioGraph {
    /// Merge one or more scenario scripts into a single graph.
    pub fn build(sources: Vec<ScenarioSource>) -> Result<Self, DialogueError> {
        let mut nodes = Vec::new();
        for source in &sources {
            debug!(scenario = %source.name, nodes = source.nodes.len(), "Namespacing scenario");
            for node in &source.nodes {
                nodes.push(ScenarioNode {
                    id: source.qualify(&node.id),
                    intents: node.intents.clone(),
                    slots: node.slots.clone(),
                    children: node.children.iter().map(|c| source.qualify(c)).collect(),
                    response_template: node.response.clone(),
                });
            }
        }
        Self::from_nodes(nodes)
    }

    /// Build a graph from nodes whose ids are already namespaced.
    pub fn from_nodes(nodes: Vec<ScenarioNode>) -> Result<Self, DialogueError> {
        if nodes.is_empty() {
            return Err(DialogueError::EmptyGraph);
        }

        let mut map = HashMap::with_capacity(nodes.len());
        let mut order = Vec::with_capacity(nodes.len());
        for node in nodes {
            if node.intents.is_empty() {
                return Err(DialogueError::NodeWithoutIntents(node.id));
            }
            if map.contains_key(&node.id) {
                return Err(DialogueError::DuplicateNode(node.id));
            }
            order.push(node.id.clone());
            map.insert(node.id.clone(), node);
        }

        for id in &order {
            let node = &map[id];
            if let Some(child) = node.children.iter().find(|c| !map.contains_key(*c)) {
                return Err(DialogueError::DanglingChild {
                    node: id.clone(),
                    child: child.clone(),
                });
            }
        }

        info!(nodes = order.len(), "Scenario graph built");
        Ok(Self { nodes: map, order })
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ScenarioNode> {
        self.order.iter().map(move |id| &self.nodes[id])
    }

    /// Ids of nodes that no other node lists as a child, in insertion order.
    ///
    /// These are the natural starting frontier for a session.
    pub fn root_ids(&self) -> Vec<String> {
        let referenced: HashSet<&str> = self
            .nodes
            .values()
            .flat_map(|n| n.children.iter().map(String::as_str))
            .collect();
        self.order
            .iter()
            .filter(|id| !referenced.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOTHES: &str = r##"[
        {"id": "node1", "intent": ["我要买衣服"], "slot": ["#size#"], "childnode": ["node2"],
         "response": "好的"},
        {"id": "node2", "intent": ["确认"], "response": "已下单，尺码#size#"}
    ]"##;

    const MOVIE: &str = r##"[
        {"id": "node1", "intent": ["我想看电影"], "slot": ["#movie#"], "response": "为您预定#movie#"}
    ]"##;

    fn source_node(id: &str, children: &[&str]) -> SourceNode {
        SourceNode {
            id: id.to_string(),
            intents: vec![format!("intent of {}", id)],
            slots: vec![],
            children: children.iter().map(|c| c.to_string()).collect(),
            response: String::new(),
        }
    }

    // =====================================================================
    // Parsing
    // =====================================================================

    #[test]
    fn test_from_json_reads_script_fields() {
        let source = ScenarioSource::from_json("clothes", CLOTHES).unwrap();
        assert_eq!(source.nodes.len(), 2);
        assert_eq!(source.nodes[0].slots, vec!["#size#".to_string()]);
        assert_eq!(source.nodes[0].children, vec!["node2".to_string()]);
        assert!(source.nodes[1].slots.is_empty());
        assert!(source.nodes[1].children.is_empty());
    }

    #[test]
    fn test_from_json_malformed() {
        let err = ScenarioSource::from_json("bad", "{not json").unwrap_err();
        assert!(matches!(err, DialogueError::ScenarioParse(_)));
    }

    // =====================================================================
    // Namespacing
    // =====================================================================

    #[test]
    fn test_build_namespaces_ids_and_children() {
        let graph =
            ScenarioGraph::build(vec![ScenarioSource::from_json("clothes", CLOTHES).unwrap()])
                .unwrap();
        assert_eq!(graph.len(), 2);
        let root = graph.get("clothes_node1").unwrap();
        assert_eq!(root.children, vec!["clothes_node2".to_string()]);
        assert_eq!(root.response_template, "好的");
        assert!(graph.contains("clothes_node2"));
        assert!(!graph.contains("node1"));
    }

    #[test]
    fn test_build_merges_scenarios_without_collision() {
        let graph = ScenarioGraph::build(vec![
            ScenarioSource::from_json("clothes", CLOTHES).unwrap(),
            ScenarioSource::from_json("movie", MOVIE).unwrap(),
        ])
        .unwrap();
        assert_eq!(graph.len(), 3);
        assert!(graph.contains("clothes_node1"));
        assert!(graph.contains("movie_node1"));
    }

    #[test]
    fn test_root_ids_in_insertion_order() {
        let graph = ScenarioGraph::build(vec![
            ScenarioSource::from_json("clothes", CLOTHES).unwrap(),
            ScenarioSource::from_json("movie", MOVIE).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            graph.root_ids(),
            vec!["clothes_node1".to_string(), "movie_node1".to_string()]
        );
    }

    #[test]
    fn test_nodes_iterates_in_insertion_order() {
        let graph =
            ScenarioGraph::build(vec![ScenarioSource::from_json("clothes", CLOTHES).unwrap()])
                .unwrap();
        let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["clothes_node1", "clothes_node2"]);
    }

    // =====================================================================
    // Integrity errors
    // =====================================================================

    #[test]
    fn test_empty_graph_rejected() {
        assert!(matches!(
            ScenarioGraph::build(vec![]),
            Err(DialogueError::EmptyGraph)
        ));
        assert!(matches!(
            ScenarioGraph::build(vec![ScenarioSource::new("empty", vec![])]),
            Err(DialogueError::EmptyGraph)
        ));
    }

    #[test]
    fn test_dangling_child_rejected() {
        let source = ScenarioSource::new("s", vec![source_node("a", &["missing"])]);
        match ScenarioGraph::build(vec![source]) {
            Err(DialogueError::DanglingChild { node, child }) => {
                assert_eq!(node, "s_a");
                assert_eq!(child, "s_missing");
            }
            other => panic!("expected DanglingChild, got {:?}", other),
        }
    }

    #[test]
    fn test_child_in_other_scenario_is_dangling() {
        // Child references are local to their own scenario.
        let first = ScenarioSource::new("one", vec![source_node("a", &["b"])]);
        let second = ScenarioSource::new("two", vec![source_node("b", &[])]);
        assert!(matches!(
            ScenarioGraph::build(vec![first, second]),
            Err(DialogueError::DanglingChild { .. })
        ));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let source = ScenarioSource::new("s", vec![source_node("a", &[]), source_node("a", &[])]);
        match ScenarioGraph::build(vec![source]) {
            Err(DialogueError::DuplicateNode(id)) => assert_eq!(id, "s_a"),
            other => panic!("expected DuplicateNode, got {:?}", other),
        }
    }

    #[test]
    fn test_node_without_intents_rejected() {
        let mut node = source_node("a", &[]);
        node.intents.clear();
        let source = ScenarioSource::new("s", vec![node]);
        assert!(matches!(
            ScenarioGraph::build(vec![source]),
            Err(DialogueError::NodeWithoutIntents(_))
        ));
    }
}
