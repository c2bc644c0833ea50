//! Id allocation for nodes and connections.
//!
//! The store owns one allocator per editor instance. Allocators only propose
//! ids; the store rejects any proposal it has seen before, so an allocator
//! that repeats itself cannot break uniqueness.

use crate::graph::{connection::ConnectionId, node::NodeId};

/// Length of the random part of generated ids.
const RANDOM_ID_LEN: usize = 12;

pub trait IdAllocator: Send {
    fn next_node_id(&mut self) -> NodeId;

    fn next_connection_id(&mut self) -> ConnectionId;
}

/// Monotonic counters: `node-1`, `node-2`, ... and `conn-1`, `conn-2`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    nodes: u64,
    connections: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdAllocator for SequentialIds {
    fn next_node_id(&mut self) -> NodeId {
        self.nodes += 1;
        format!("node-{}", self.nodes)
    }

    fn next_connection_id(&mut self) -> ConnectionId {
        self.connections += 1;
        format!("conn-{}", self.connections)
    }
}

/// Random ids backed by nanoid, e.g. `node-V1StGXR8_Z5j`.
#[derive(Debug, Clone, Default)]
pub struct RandomIds;

impl IdAllocator for RandomIds {
    fn next_node_id(&mut self) -> NodeId {
        format!("node-{}", nanoid::nanoid!(RANDOM_ID_LEN))
    }

    fn next_connection_id(&mut self) -> ConnectionId {
        format!("conn-{}", nanoid::nanoid!(RANDOM_ID_LEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_count_independently() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_node_id(), "node-1");
        assert_eq!(ids.next_node_id(), "node-2");
        assert_eq!(ids.next_connection_id(), "conn-1");
        assert_eq!(ids.next_node_id(), "node-3");
    }

    #[test]
    fn test_random_ids_are_prefixed() {
        let mut ids = RandomIds;
        let id = ids.next_node_id();
        assert!(id.starts_with("node-"));
        assert_eq!(id.len(), "node-".len() + RANDOM_ID_LEN);
        assert_ne!(ids.next_connection_id(), ids.next_connection_id());
    }
}
