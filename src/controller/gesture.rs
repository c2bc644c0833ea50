use serde::{Deserialize, Serialize};

use crate::{
    catalog::{ConfigValue, NodeType, PortKind},
    graph::{ConnectionId, Direction, NodeId, Position},
};

/// Transient gesture state. Never part of the graph.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Interaction {
    #[default]
    Idle,
    /// A palette entry is being dragged; no node exists yet.
    Dragging { node_type: NodeType },
    /// A connection was started from a port and waits for the opposite port.
    ConnectingFrom { node_id: NodeId, port: PortKind },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn str(&self) -> &str {
        match self {
            Interaction::Idle => "Idle",
            Interaction::Dragging { .. } => "Dragging",
            Interaction::ConnectingFrom { .. } => "ConnectingFrom",
        }
    }
}

/// A user gesture, already resolved to the element it hit.
///
/// Drop points are in client space; the controller converts them to canvas
/// space using its canvas bounds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum Gesture {
    PaletteDragStart { node_type: NodeType },
    PaletteDrop { at: Position },
    /// The palette drag ended without a drop.
    PaletteDragCancel,
    /// A placed node was dragged and released.
    NodeDrop { node_id: NodeId, at: Position },
    NodeClick { node_id: NodeId },
    PortClick { node_id: NodeId, port: PortKind },
    CancelConnection,
    DeleteNode { node_id: NodeId },
    DeleteConnection { connection_id: ConnectionId },
    Reorder { node_id: NodeId, direction: Direction },
    EditConfig { node_id: NodeId, field: String, value: ConfigValue },
    /// Config edit straight from a text input; parsed into the field's kind.
    EditConfigText { node_id: NodeId, field: String, raw: String },
    Rename { node_id: NodeId, title: String },
    ApplyTemplate { name: String },
}

impl Gesture {
    pub fn palette_drag(node_type: &str) -> Self {
        Gesture::PaletteDragStart {
            node_type: NodeType::from(node_type),
        }
    }

    pub fn palette_drop(
        x: f64,
        y: f64,
    ) -> Self {
        Gesture::PaletteDrop {
            at: Position::new(x, y),
        }
    }

    pub fn node_click(node_id: &str) -> Self {
        Gesture::NodeClick {
            node_id: node_id.to_string(),
        }
    }

    pub fn output_port(node_id: &str) -> Self {
        Gesture::PortClick {
            node_id: node_id.to_string(),
            port: PortKind::Output,
        }
    }

    pub fn input_port(node_id: &str) -> Self {
        Gesture::PortClick {
            node_id: node_id.to_string(),
            port: PortKind::Input,
        }
    }

    pub fn delete_node(node_id: &str) -> Self {
        Gesture::DeleteNode {
            node_id: node_id.to_string(),
        }
    }

    pub fn apply_template(name: &str) -> Self {
        Gesture::ApplyTemplate {
            name: name.to_string(),
        }
    }

    pub fn edit_config(
        node_id: &str,
        field: &str,
        value: impl Into<ConfigValue>,
    ) -> Self {
        Gesture::EditConfig {
            node_id: node_id.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }
}
