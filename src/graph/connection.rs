//! Directed connections between node ports.

use serde::{Deserialize, Serialize};

use crate::graph::node::NodeId;

/// Unique identifier for a connection.
pub type ConnectionId = String;

/// Directed edge from one node's output port to another node's input port.
///
/// Connections are never edited in place: moving an endpoint means deleting
/// the edge and creating a new one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Unique connection identifier.
    pub id: ConnectionId,
    /// ID of the node owning the output port.
    pub source_id: NodeId,
    /// ID of the node owning the input port.
    pub target_id: NodeId,
}

impl Connection {
    /// Check if this connection touches the given node.
    pub fn involves(
        &self,
        node_id: &str,
    ) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }

    /// Check if this connection runs from `source` to `target`.
    pub fn links(
        &self,
        source: &str,
        target: &str,
    ) -> bool {
        self.source_id == source && self.target_id == target
    }
}
