use serde::{Deserialize, Serialize};

use crate::catalog::{NodeConfig, NodeType, PortKind};

/// node id
pub type NodeId = String;

/// A point in canvas space, top-left anchored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            x,
            y,
        }
    }

    pub fn offset(
        &self,
        dx: f64,
        dy: f64,
    ) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(
        &self,
        other: &Position,
    ) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned rectangle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Edges are inclusive on the top/left and exclusive on the bottom/right.
    pub fn contains(
        &self,
        point: Position,
    ) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.x + self.width && point.y < self.y + self.height
    }

    pub fn top_center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y)
    }

    pub fn bottom_center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height)
    }
}

/// A placed node on the canvas.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Node {
    /// node id, unique for the lifetime of the editing session
    pub id: NodeId,
    /// node type, fixed at creation
    pub node_type: NodeType,
    /// node title, seeded from the catalog
    pub title: String,
    /// top-left corner in canvas space
    pub position: Position,
    /// input port names
    pub inputs: Vec<String>,
    /// output port names
    pub outputs: Vec<String>,
    /// per-node settings
    pub config: NodeConfig,
}

impl Node {
    pub fn has_port(
        &self,
        kind: PortKind,
    ) -> bool {
        match kind {
            PortKind::Input => !self.inputs.is_empty(),
            PortKind::Output => !self.outputs.is_empty(),
        }
    }
}
