//! Render geometry, derived from the graph on every call.
//!
//! Nothing here is cached: moving a node and projecting again is all it
//! takes for its edges to follow.

use serde::Serialize;
use tracing::trace;

use crate::{
    catalog::PortKind,
    config::LayoutConfig,
    graph::{ConnectionId, Graph, Node, NodeId, Position, Rect},
};

const SELECTED_Z_INDEX: i32 = 10;
const DEFAULT_Z_INDEX: i32 = 2;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: NodeId,
    pub rect: Rect,
    pub z_index: i32,
}

/// Clickable circle at an edge midpoint; a hit deletes the connection.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DeleteHandle {
    pub connection_id: ConnectionId,
    pub center: Position,
    pub radius: f64,
}

impl DeleteHandle {
    pub fn contains(
        &self,
        point: Position,
    ) -> bool {
        self.center.distance(&point) <= self.radius
    }
}

/// A connection drawn as a cubic bezier from the source's bottom-center to
/// the target's top-center.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub connection_id: ConnectionId,
    pub source: Position,
    pub target: Position,
    pub control1: Position,
    pub control2: Position,
    pub handle: DeleteHandle,
}

impl EdgePath {
    /// SVG path data, `M sx,sy C c1 c2 t`.
    pub fn svg_path(&self) -> String {
        format!(
            "M{},{} C{},{} {},{} {},{}",
            self.source.x, self.source.y, self.control1.x, self.control1.y, self.control2.x, self.control2.y, self.target.x, self.target.y
        )
    }

    /// Point on the curve at `t` in `[0, 1]`.
    pub fn point_at(
        &self,
        t: f64,
    ) -> Position {
        let t = t.clamp(0.0, 1.0);
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let (p0, p1, p2, p3) = (self.source, self.control1, self.control2, self.target);
        Position::new(
            mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x,
            mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y,
        )
    }

    pub fn midpoint(&self) -> Position {
        Position::new((self.source.x + self.target.x) / 2.0, (self.source.y + self.target.y) / 2.0)
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub nodes: Vec<NodeBox>,
    pub edges: Vec<EdgePath>,
}

impl Projection {
    /// Connection whose delete handle lies under `point`, topmost first.
    pub fn hit_handle(
        &self,
        point: Position,
    ) -> Option<&str> {
        self.edges.iter().rev().find(|e| e.handle.contains(point)).map(|e| e.connection_id.as_str())
    }

    pub fn edge(
        &self,
        connection_id: &str,
    ) -> Option<&EdgePath> {
        self.edges.iter().find(|e| e.connection_id == connection_id)
    }

    pub fn node(
        &self,
        node_id: &str,
    ) -> Option<&NodeBox> {
        self.nodes.iter().find(|n| n.id == node_id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Projector {
    layout: LayoutConfig,
}

impl Projector {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn node_rect(
        &self,
        node: &Node,
    ) -> Rect {
        Rect::new(node.position.x, node.position.y, self.layout.node_width, self.layout.node_height)
    }

    /// Where edges attach: outputs at the bottom-center, inputs at the top-center.
    pub fn port_anchor(
        &self,
        node: &Node,
        kind: PortKind,
    ) -> Position {
        let rect = self.node_rect(node);
        match kind {
            PortKind::Output => rect.bottom_center(),
            PortKind::Input => rect.top_center(),
        }
    }

    pub fn edge(
        &self,
        connection_id: &str,
        source: &Node,
        target: &Node,
    ) -> EdgePath {
        let from = self.port_anchor(source, PortKind::Output);
        let to = self.port_anchor(target, PortKind::Input);
        let offset = self.layout.curve_offset;

        let mut path = EdgePath {
            connection_id: connection_id.to_string(),
            source: from,
            target: to,
            control1: from.offset(0.0, offset),
            control2: to.offset(0.0, -offset),
            handle: DeleteHandle {
                connection_id: connection_id.to_string(),
                center: Position::default(),
                radius: self.layout.handle_radius,
            },
        };
        path.handle.center = path.midpoint();
        path
    }

    /// Project the whole graph. Node boxes keep graph order; the selected
    /// node is raised above the others.
    pub fn project(
        &self,
        graph: &Graph,
        selected: Option<&str>,
    ) -> Projection {
        let nodes = graph
            .nodes
            .iter()
            .map(|node| NodeBox {
                id: node.id.clone(),
                rect: self.node_rect(node),
                z_index: if selected == Some(node.id.as_str()) {
                    SELECTED_Z_INDEX
                } else {
                    DEFAULT_Z_INDEX
                },
            })
            .collect();

        let mut edges = Vec::with_capacity(graph.connections.len());
        for conn in &graph.connections {
            let (Some(source), Some(target)) = (graph.node(&conn.source_id), graph.node(&conn.target_id)) else {
                trace!(connection_id = %conn.id, "edge skipped: dangling endpoint");
                continue;
            };
            edges.push(self.edge(&conn.id, source, target));
        }

        trace!(nodes = graph.nodes.len(), edges = edges.len(), "graph projected");
        Projection {
            nodes,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        catalog::{Catalog, NodeType},
        graph::{GraphStore, SequentialIds},
    };

    fn store() -> GraphStore {
        GraphStore::new(Arc::new(Catalog::builtin()), Box::new(SequentialIds::new()))
    }

    #[test]
    fn test_edge_anchors_and_path() {
        let mut store = store();
        let a = store.add_node(&NodeType::from("input"), Position::new(0.0, 0.0));
        let b = store.add_node(&NodeType::from("output"), Position::new(0.0, 200.0));
        let conn = store.add_connection(&a.id, &b.id).unwrap();

        let projection = Projector::default().project(store.graph(), None);
        let edge = projection.edge(&conn.id).unwrap();
        assert_eq!(edge.source, Position::new(150.0, 50.0));
        assert_eq!(edge.target, Position::new(150.0, 200.0));
        assert_eq!(edge.svg_path(), "M150,50 C150,100 150,150 150,200");
    }

    #[test]
    fn test_midpoint_lies_on_curve() {
        let mut store = store();
        let a = store.add_node(&NodeType::from("transform"), Position::new(40.0, 10.0));
        let b = store.add_node(&NodeType::from("condition"), Position::new(420.0, 330.0));
        let conn = store.add_connection(&a.id, &b.id).unwrap();

        let projection = Projector::default().project(store.graph(), None);
        let edge = projection.edge(&conn.id).unwrap();
        let mid = edge.point_at(0.5);
        assert!((mid.x - edge.midpoint().x).abs() < 1e-9);
        assert!((mid.y - edge.midpoint().y).abs() < 1e-9);
        assert_eq!(edge.handle.center, edge.midpoint());
        assert_eq!(edge.point_at(0.0), edge.source);
        assert_eq!(edge.point_at(1.0), edge.target);
    }

    #[test]
    fn test_edges_follow_moved_node() {
        let mut store = store();
        let a = store.add_node(&NodeType::from("input"), Position::new(0.0, 0.0));
        let b = store.add_node(&NodeType::from("output"), Position::new(0.0, 200.0));
        let conn = store.add_connection(&a.id, &b.id).unwrap();
        let projector = Projector::default();

        let before = projector.project(store.graph(), None);
        store.move_node(&b.id, Position::new(300.0, 400.0));
        let after = projector.project(store.graph(), None);

        assert_eq!(before.edge(&conn.id).unwrap().source, after.edge(&conn.id).unwrap().source);
        assert_eq!(after.edge(&conn.id).unwrap().target, Position::new(450.0, 400.0));
    }

    #[test]
    fn test_selected_node_is_raised() {
        let mut store = store();
        let a = store.add_node(&NodeType::from("payment"), Position::new(0.0, 0.0));
        let b = store.add_node(&NodeType::from("messaging"), Position::new(0.0, 100.0));

        let projection = Projector::default().project(store.graph(), Some(&b.id));
        assert_eq!(projection.node(&a.id).unwrap().z_index, 2);
        assert_eq!(projection.node(&b.id).unwrap().z_index, 10);
        assert_eq!(projection.node(&a.id).unwrap().rect, Rect::new(0.0, 0.0, 300.0, 50.0));
    }

    #[test]
    fn test_hit_handle() {
        let mut store = store();
        let a = store.add_node(&NodeType::from("input"), Position::new(0.0, 0.0));
        let b = store.add_node(&NodeType::from("output"), Position::new(0.0, 200.0));
        let conn = store.add_connection(&a.id, &b.id).unwrap();

        let projection = Projector::default().project(store.graph(), None);
        assert_eq!(projection.hit_handle(Position::new(150.0, 125.0)), Some(conn.id.as_str()));
        assert_eq!(projection.hit_handle(Position::new(155.0, 130.0)), Some(conn.id.as_str()));
        assert_eq!(projection.hit_handle(Position::new(150.0, 140.0)), None);
    }

    #[test]
    fn test_custom_layout() {
        let layout = LayoutConfig {
            node_width: 200.0,
            node_height: 80.0,
            curve_offset: 20.0,
            handle_radius: 4.0,
        };
        let mut store = store();
        let a = store.add_node(&NodeType::from("input"), Position::new(10.0, 10.0));
        let b = store.add_node(&NodeType::from("output"), Position::new(10.0, 300.0));
        let conn = store.add_connection(&a.id, &b.id).unwrap();

        let projection = Projector::new(layout).project(store.graph(), None);
        let edge = projection.edge(&conn.id).unwrap();
        assert_eq!(edge.svg_path(), "M110,90 C110,110 110,280 110,300");
        assert_eq!(edge.handle.radius, 4.0);
    }

    #[test]
    fn test_empty_graph() {
        let projection = Projector::default().project(&Graph::new(), None);
        assert!(projection.nodes.is_empty());
        assert!(projection.edges.is_empty());
        assert_eq!(projection.hit_handle(Position::new(0.0, 0.0)), None);
    }
}
