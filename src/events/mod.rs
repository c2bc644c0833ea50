//! Editor events.
//!
//! Every applied mutation, selection change and trigger transition is
//! published as an [`EditorEvent`] to the subscribers registered on the
//! editor's channel. Ignored operations publish nothing.

mod channel;

use crate::{
    editor::DeployStatus,
    graph::{ConnectionId, Direction, NodeId},
};

pub(crate) use channel::Channel;
pub use channel::{EventFilter, EventHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    NodeAdded(NodeId),
    NodeMoved(NodeId),
    NodeRemoved {
        node_id: NodeId,
        connections: Vec<ConnectionId>,
    },
    NodeReordered {
        node_id: NodeId,
        direction: Direction,
    },
    NodeConfigured {
        node_id: NodeId,
        field: String,
    },
    NodeRenamed(NodeId),
    ConnectionAdded {
        connection_id: ConnectionId,
        source_id: NodeId,
        target_id: NodeId,
    },
    ConnectionRemoved {
        connection_id: ConnectionId,
        source_id: NodeId,
        target_id: NodeId,
    },
    SelectionChanged(Option<NodeId>),
    TemplateApplied(String),
    GraphLoaded,
    DeployChanged(DeployStatus),
    Saved,
}

impl EditorEvent {
    pub fn str(&self) -> &str {
        match self {
            EditorEvent::NodeAdded(_) => "NodeAdded",
            EditorEvent::NodeMoved(_) => "NodeMoved",
            EditorEvent::NodeRemoved { .. } => "NodeRemoved",
            EditorEvent::NodeReordered { .. } => "NodeReordered",
            EditorEvent::NodeConfigured { .. } => "NodeConfigured",
            EditorEvent::NodeRenamed(_) => "NodeRenamed",
            EditorEvent::ConnectionAdded { .. } => "ConnectionAdded",
            EditorEvent::ConnectionRemoved { .. } => "ConnectionRemoved",
            EditorEvent::SelectionChanged(_) => "SelectionChanged",
            EditorEvent::TemplateApplied(_) => "TemplateApplied",
            EditorEvent::GraphLoaded => "GraphLoaded",
            EditorEvent::DeployChanged(_) => "DeployChanged",
            EditorEvent::Saved => "Saved",
        }
    }

    /// Node ids the event is about. Connection events name both endpoints.
    pub fn node_ids(&self) -> Vec<&str> {
        match self {
            EditorEvent::NodeAdded(id) | EditorEvent::NodeMoved(id) | EditorEvent::NodeRenamed(id) => vec![id.as_str()],
            EditorEvent::NodeRemoved { node_id, .. } | EditorEvent::NodeReordered { node_id, .. } | EditorEvent::NodeConfigured { node_id, .. } => {
                vec![node_id.as_str()]
            }
            EditorEvent::ConnectionAdded { source_id, target_id, .. } | EditorEvent::ConnectionRemoved { source_id, target_id, .. } => {
                vec![source_id.as_str(), target_id.as_str()]
            }
            EditorEvent::SelectionChanged(Some(id)) => vec![id.as_str()],
            EditorEvent::SelectionChanged(None)
            | EditorEvent::TemplateApplied(_)
            | EditorEvent::GraphLoaded
            | EditorEvent::DeployChanged(_)
            | EditorEvent::Saved => Vec::new(),
        }
    }
}
