pub mod connection;
pub mod ids;
pub mod node;
mod store;
pub mod template;

use petgraph::{
    Direction as EdgeDirection,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::NodeType;

pub use connection::{Connection, ConnectionId};
pub use ids::{IdAllocator, RandomIds, SequentialIds};
pub use node::{Node, NodeId, Position, Rect};
pub use store::{ConfigUpdate, GraphStore};
pub use template::{Template, TemplateConnection, TemplateNode};

/// Direction for moving a node within the node list.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Snapshot of all live nodes and connections.
///
/// Node order is insertion order, adjusted by reordering; it drives stacking
/// and iteration order only, never geometry.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn connection(
        &self,
        id: &str,
    ) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn contains_node_type(
        &self,
        node_type: &NodeType,
    ) -> bool {
        self.nodes.iter().any(|n| &n.node_type == node_type)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Connections leaving the given node, in creation order.
    pub fn outgoing(
        &self,
        id: &str,
    ) -> Vec<&Connection> {
        self.connections.iter().filter(|c| c.source_id == id).collect()
    }

    /// Connections entering the given node, in creation order.
    pub fn incoming(
        &self,
        id: &str,
    ) -> Vec<&Connection> {
        self.connections.iter().filter(|c| c.target_id == id).collect()
    }

    /// Output a human-readable representation of the graph
    pub fn schema(&self) -> String {
        let mut graph: DiGraph<&Node, &Connection> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();
        for node in &self.nodes {
            index.insert(node.id.as_str(), graph.add_node(node));
        }
        for conn in &self.connections {
            if let (Some(source), Some(target)) = (index.get(conn.source_id.as_str()), index.get(conn.target_id.as_str())) {
                graph.add_edge(*source, *target, conn);
            }
        }

        let mut lines = Vec::new();

        lines.push("=== Workflow Graph ===".to_string());
        lines.push(format!("Nodes: {}, Connections: {}", graph.node_count(), graph.edge_count()));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for idx in graph.node_indices() {
            let node = graph[idx];
            lines.push(format!(
                "[{}] {} (type: {}, at: {},{})",
                node.id, node.title, node.node_type, node.position.x, node.position.y
            ));
        }
        lines.push(String::new());

        lines.push("--- Connections ---".to_string());
        for idx in graph.edge_indices() {
            let conn = graph[idx];
            lines.push(format!("{} --> {} (id: {})", conn.source_id, conn.target_id, conn.id));
        }
        lines.push(String::new());

        lines.push("--- Graph Structure ---".to_string());
        for idx in graph.node_indices() {
            let node = graph[idx];
            let outgoing: Vec<String> =
                graph.edges_directed(idx, EdgeDirection::Outgoing).map(|e| graph[e.target()].id.clone()).collect();

            if outgoing.is_empty() {
                lines.push(format!("{} -> (end)", node.id));
            } else {
                lines.push(format!("{} -> {}", node.id, outgoing.join(", ")));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_graph_schema() {
        let mut store = GraphStore::new(Arc::new(Catalog::builtin()), Box::new(SequentialIds::new()));
        store.replace_with(&Template::farmers_alert()).unwrap();
        let graph = store.snapshot();

        let schema = graph.schema();
        assert!(schema.starts_with("=== Workflow Graph ===\nNodes: 3, Connections: 2"));
        assert!(schema.contains("[node-1] Workflow Input (type: input, at: 50,50)"));
        assert!(schema.contains("node-1 --> node-2 (id: conn-1)"));
        assert!(schema.contains("node-2 -> node-3"));
        assert!(schema.ends_with("node-3 -> (end)"));
    }

    #[test]
    fn test_graph_neighbours() {
        let mut store = GraphStore::new(Arc::new(Catalog::builtin()), Box::new(SequentialIds::new()));
        store.replace_with(&Template::ecitizen_assistant()).unwrap();
        let graph = store.graph();

        assert_eq!(graph.outgoing("node-1").len(), 1);
        assert!(graph.incoming("node-1").is_empty());
        assert_eq!(graph.incoming("node-4").len(), 1);
        assert!(graph.contains_node_type(&NodeType::from("verification")));
        assert!(!graph.contains_node_type(&NodeType::from("payment")));
    }
}
