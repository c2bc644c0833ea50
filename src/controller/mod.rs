//! Interaction controller: turns gestures into graph mutations.
//!
//! The controller owns only transient UI state: the current [`Interaction`]
//! and the selected node. The graph itself stays in the [`GraphStore`] passed
//! to [`Controller::apply`].
//!
//! ```text
//! Idle --PaletteDragStart--> Dragging
//! Dragging --PaletteDrop(inside canvas)--> Idle   (+ add node)
//! Dragging --PaletteDrop(outside)|PaletteDragCancel--> Idle
//! Idle --PortClick--> ConnectingFrom
//! ConnectingFrom --opposite PortClick on another node--> Idle   (+ add connection)
//! ConnectingFrom --same-kind PortClick on another node--> ConnectingFrom (restarted there)
//! ConnectingFrom --any click on the origin node|CancelConnection--> Idle
//! ```

mod gesture;

use tracing::{debug, warn};

use crate::{
    catalog::PortKind,
    events::EditorEvent,
    graph::{ConfigUpdate, GraphStore, NodeId, Position, Rect, Template},
};

pub use gesture::{Gesture, Interaction};

pub struct Controller {
    /// canvas bounds in client space
    canvas: Rect,
    interaction: Interaction,
    selected: Option<NodeId>,
    templates: Vec<Template>,
}

impl Controller {
    pub fn new(
        canvas: Rect,
        templates: Vec<Template>,
    ) -> Self {
        Self {
            canvas,
            interaction: Interaction::Idle,
            selected: None,
            templates,
        }
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Origin of the connection in progress, if any.
    pub fn pending(&self) -> Option<(&str, PortKind)> {
        match &self.interaction {
            Interaction::ConnectingFrom { node_id, port } => Some((node_id.as_str(), *port)),
            _ => None,
        }
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    /// Update the canvas bounds, e.g. after the surrounding layout resized.
    pub fn set_canvas(
        &mut self,
        canvas: Rect,
    ) {
        self.canvas = canvas;
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Whether clicking this port would complete the pending connection.
    pub fn accepts_port(
        &self,
        node_id: &str,
        port: PortKind,
    ) -> bool {
        match self.pending() {
            Some((origin, origin_port)) => origin != node_id && origin_port.opposite() == port,
            None => false,
        }
    }

    /// Hint shown while a connection is pending.
    pub fn prompt(&self) -> Option<&'static str> {
        self.pending().map(|(_, port)| match port {
            PortKind::Output => "Select a target node to connect",
            PortKind::Input => "Select a source node to connect",
        })
    }

    /// Drop selection and any gesture in progress.
    pub fn reset(&mut self) {
        self.interaction = Interaction::Idle;
        self.selected = None;
    }

    /// Apply one gesture and return the events for what actually changed.
    pub fn apply(
        &mut self,
        store: &mut GraphStore,
        gesture: Gesture,
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();

        match gesture {
            Gesture::PaletteDragStart { node_type } => {
                if let Interaction::ConnectingFrom { node_id, .. } = &self.interaction {
                    debug!(node_id = %node_id, "pending connection dropped by palette drag");
                }
                self.transition(Interaction::Dragging { node_type });
            }
            Gesture::PaletteDrop { at } => {
                let node_type = match &self.interaction {
                    Interaction::Dragging { node_type } => node_type.clone(),
                    _ => {
                        debug!("drop ignored: no palette drag in progress");
                        return events;
                    }
                };
                self.transition(Interaction::Idle);
                match self.to_canvas(at) {
                    Some(position) => match store.try_add_node(&node_type, position) {
                        Ok(node) => events.push(EditorEvent::NodeAdded(node.id)),
                        Err(e) => warn!(node_type = %node_type, error = %e, "palette drop rejected"),
                    },
                    None => debug!(x = at.x, y = at.y, "drop outside canvas discarded"),
                }
            }
            Gesture::PaletteDragCancel => {
                if matches!(self.interaction, Interaction::Dragging { .. }) {
                    self.transition(Interaction::Idle);
                }
            }
            Gesture::NodeDrop { node_id, at } => match self.to_canvas(at) {
                Some(position) => {
                    if store.move_node(&node_id, position) {
                        events.push(EditorEvent::NodeMoved(node_id));
                    }
                }
                None => debug!(node_id = %node_id, "node drop outside canvas discarded"),
            },
            Gesture::NodeClick { node_id } => {
                if self.pending().is_some_and(|(origin, _)| origin == node_id) {
                    self.transition(Interaction::Idle);
                    return events;
                }
                if store.node(&node_id).is_none() {
                    return events;
                }
                let next = if self.selected.as_deref() == Some(node_id.as_str()) {
                    None
                } else {
                    Some(node_id)
                };
                self.selected = next.clone();
                events.push(EditorEvent::SelectionChanged(next));
            }
            Gesture::PortClick { node_id, port } => {
                self.port_click(store, node_id, port, &mut events);
            }
            Gesture::CancelConnection => {
                if self.pending().is_some() {
                    self.transition(Interaction::Idle);
                }
            }
            Gesture::DeleteNode { node_id } => {
                let Some((node, removed)) = store.delete_node(&node_id) else {
                    return events;
                };
                if self.pending().is_some_and(|(origin, _)| origin == node.id) {
                    self.transition(Interaction::Idle);
                }
                events.push(EditorEvent::NodeRemoved {
                    node_id: node.id.clone(),
                    connections: removed.into_iter().map(|c| c.id).collect(),
                });
                if self.selected.as_deref() == Some(node.id.as_str()) {
                    self.selected = None;
                    events.push(EditorEvent::SelectionChanged(None));
                }
            }
            Gesture::DeleteConnection { connection_id } => {
                if let Some(conn) = store.delete_connection(&connection_id) {
                    events.push(EditorEvent::ConnectionRemoved {
                        connection_id: conn.id,
                        source_id: conn.source_id,
                        target_id: conn.target_id,
                    });
                }
            }
            Gesture::Reorder { node_id, direction } => {
                if store.reorder_node(&node_id, direction) {
                    events.push(EditorEvent::NodeReordered {
                        node_id,
                        direction,
                    });
                }
            }
            Gesture::EditConfig { node_id, field, value } => {
                configured(store.set_node_config(&node_id, &field, value), node_id, field, &mut events);
            }
            Gesture::EditConfigText { node_id, field, raw } => {
                configured(store.set_node_config_text(&node_id, &field, &raw), node_id, field, &mut events);
            }
            Gesture::Rename { node_id, title } => {
                if store.set_node_title(&node_id, &title) {
                    events.push(EditorEvent::NodeRenamed(node_id));
                }
            }
            Gesture::ApplyTemplate { name } => {
                let Some(template) = self.templates.iter().find(|t| t.name == name) else {
                    debug!(template = %name, "unknown template ignored");
                    return events;
                };
                if let Err(e) = store.replace_with(template) {
                    warn!(template = %name, error = %e, "template rejected");
                    return events;
                }
                self.transition(Interaction::Idle);
                events.push(EditorEvent::TemplateApplied(name));
                if self.selected.take().is_some() {
                    events.push(EditorEvent::SelectionChanged(None));
                }
            }
        }

        events
    }

    fn port_click(
        &mut self,
        store: &mut GraphStore,
        node_id: NodeId,
        port: PortKind,
        events: &mut Vec<EditorEvent>,
    ) {
        if !store.node(&node_id).is_some_and(|n| n.has_port(port)) {
            debug!(node_id = %node_id, port = port.as_ref(), "port click ignored: no such port");
            return;
        }

        match &self.interaction {
            Interaction::Dragging { .. } => {
                debug!(node_id = %node_id, "port click ignored while dragging");
            }
            Interaction::Idle => {
                self.transition(Interaction::ConnectingFrom {
                    node_id,
                    port,
                });
            }
            Interaction::ConnectingFrom { node_id: origin, port: origin_port } => {
                if *origin == node_id {
                    self.transition(Interaction::Idle);
                } else if *origin_port == port {
                    // latest start wins
                    self.transition(Interaction::ConnectingFrom {
                        node_id,
                        port,
                    });
                } else {
                    let (source, target) = match origin_port {
                        PortKind::Output => (origin.clone(), node_id),
                        PortKind::Input => (node_id, origin.clone()),
                    };
                    self.transition(Interaction::Idle);
                    if let Some(conn) = store.add_connection(&source, &target) {
                        events.push(EditorEvent::ConnectionAdded {
                            connection_id: conn.id,
                            source_id: conn.source_id,
                            target_id: conn.target_id,
                        });
                    }
                }
            }
        }
    }

    /// Client point to canvas point; `None` outside the canvas.
    fn to_canvas(
        &self,
        at: Position,
    ) -> Option<Position> {
        if !self.canvas.contains(at) {
            return None;
        }
        let origin = self.canvas.origin();
        Some(Position::new(at.x - origin.x, at.y - origin.y))
    }

    fn transition(
        &mut self,
        next: Interaction,
    ) {
        let from = self.interaction.str().to_string();
        self.interaction = next;
        debug!(from = %from, to = self.interaction.str(), "interaction transition");
    }
}

fn configured(
    update: ConfigUpdate,
    node_id: NodeId,
    field: String,
    events: &mut Vec<EditorEvent>,
) {
    if update.is_applied() {
        events.push(EditorEvent::NodeConfigured {
            node_id,
            field,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        Direction,
        catalog::{Catalog, ConfigValue, NodeType},
        graph::SequentialIds,
    };

    fn setup() -> (Controller, GraphStore) {
        let controller = Controller::new(Rect::new(100.0, 50.0, 800.0, 600.0), Template::builtin());
        let store = GraphStore::new(Arc::new(Catalog::builtin()), Box::new(SequentialIds::new()));
        (controller, store)
    }

    fn place(
        controller: &mut Controller,
        store: &mut GraphStore,
        node_type: &str,
    ) -> NodeId {
        controller.apply(store, Gesture::palette_drag(node_type));
        let events = controller.apply(store, Gesture::palette_drop(150.0, 100.0));
        match events.as_slice() {
            [EditorEvent::NodeAdded(id)] => id.clone(),
            other => panic!("expected NodeAdded, got {:?}", other),
        }
    }

    #[test]
    fn test_palette_drop_inside_canvas_adds_node_relative_to_origin() {
        let (mut controller, mut store) = setup();
        controller.apply(&mut store, Gesture::palette_drag("payment"));
        assert_eq!(
            controller.interaction(),
            &Interaction::Dragging {
                node_type: NodeType::from("payment")
            }
        );
        assert!(store.nodes().is_empty());

        let events = controller.apply(&mut store, Gesture::palette_drop(340.0, 170.0));
        assert_eq!(events.len(), 1);
        assert!(controller.interaction().is_idle());
        assert_eq!(store.nodes()[0].position, Position::new(240.0, 120.0));
        assert_eq!(store.nodes()[0].node_type, NodeType::from("payment"));
    }

    #[test]
    fn test_palette_drop_outside_canvas_creates_nothing() {
        let (mut controller, mut store) = setup();
        controller.apply(&mut store, Gesture::palette_drag("payment"));
        let events = controller.apply(&mut store, Gesture::palette_drop(20.0, 20.0));
        assert!(events.is_empty());
        assert!(store.nodes().is_empty());
        assert!(controller.interaction().is_idle());
    }

    #[test]
    fn test_drop_without_drag_is_ignored() {
        let (mut controller, mut store) = setup();
        assert!(controller.apply(&mut store, Gesture::palette_drop(300.0, 300.0)).is_empty());
        assert!(store.nodes().is_empty());
    }

    #[test]
    fn test_drop_of_unregistered_type_is_rejected() {
        let (mut controller, mut store) = setup();
        controller.apply(&mut store, Gesture::palette_drag("telegram"));
        let events = controller.apply(&mut store, Gesture::palette_drop(300.0, 300.0));
        assert!(events.is_empty());
        assert!(store.nodes().is_empty());
        assert!(controller.interaction().is_idle());
    }

    #[test]
    fn test_palette_drag_cancel() {
        let (mut controller, mut store) = setup();
        controller.apply(&mut store, Gesture::palette_drag("messaging"));
        controller.apply(&mut store, Gesture::PaletteDragCancel);
        assert!(controller.interaction().is_idle());
    }

    #[test]
    fn test_node_drop_moves_without_touching_connections() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "input");
        let b = place(&mut controller, &mut store, "output");
        store.add_connection(&a, &b).unwrap();
        let before = store.connections().to_vec();

        let events = controller.apply(
            &mut store,
            Gesture::NodeDrop {
                node_id: b.clone(),
                at: Position::new(600.0, 450.0),
            },
        );
        assert_eq!(events, vec![EditorEvent::NodeMoved(b.clone())]);
        assert_eq!(store.node(&b).unwrap().position, Position::new(500.0, 400.0));
        assert_eq!(store.connections(), before.as_slice());

        let outside = controller.apply(
            &mut store,
            Gesture::NodeDrop {
                node_id: b.clone(),
                at: Position::new(5000.0, 5.0),
            },
        );
        assert!(outside.is_empty());
        assert_eq!(store.node(&b).unwrap().position, Position::new(500.0, 400.0));
    }

    #[test]
    fn test_node_click_toggles_single_selection() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "payment");
        let b = place(&mut controller, &mut store, "messaging");

        controller.apply(&mut store, Gesture::node_click(&a));
        assert_eq!(controller.selected(), Some(a.as_str()));
        controller.apply(&mut store, Gesture::node_click(&b));
        assert_eq!(controller.selected(), Some(b.as_str()));
        let events = controller.apply(&mut store, Gesture::node_click(&b));
        assert_eq!(events, vec![EditorEvent::SelectionChanged(None)]);
        assert_eq!(controller.selected(), None);

        assert!(controller.apply(&mut store, Gesture::node_click("node-404")).is_empty());
    }

    #[test]
    fn test_connect_output_to_input_once() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");
        let b = place(&mut controller, &mut store, "transform");

        controller.apply(&mut store, Gesture::output_port(&a));
        assert_eq!(controller.pending(), Some((a.as_str(), PortKind::Output)));
        assert!(controller.accepts_port(&b, PortKind::Input));
        assert!(!controller.accepts_port(&b, PortKind::Output));
        assert!(!controller.accepts_port(&a, PortKind::Input));
        assert_eq!(controller.prompt(), Some("Select a target node to connect"));

        let events = controller.apply(&mut store, Gesture::input_port(&b));
        assert_eq!(events.len(), 1);
        assert!(controller.interaction().is_idle());
        assert_eq!(store.connections().len(), 1);
        assert!(store.connections()[0].links(&a, &b));

        // same gesture again is a duplicate; pending still clears
        controller.apply(&mut store, Gesture::output_port(&a));
        let events = controller.apply(&mut store, Gesture::input_port(&b));
        assert!(events.is_empty());
        assert!(controller.interaction().is_idle());
        assert_eq!(store.connections().len(), 1);
    }

    #[test]
    fn test_connect_from_input_resolves_direction() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "input");
        let b = place(&mut controller, &mut store, "output");

        controller.apply(&mut store, Gesture::input_port(&b));
        assert_eq!(controller.prompt(), Some("Select a source node to connect"));
        controller.apply(&mut store, Gesture::output_port(&a));
        assert_eq!(store.connections().len(), 1);
        assert_eq!(store.connections()[0].source_id, a);
        assert_eq!(store.connections()[0].target_id, b);
    }

    #[test]
    fn test_click_same_node_cancels_pending() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");

        controller.apply(&mut store, Gesture::output_port(&a));
        controller.apply(&mut store, Gesture::output_port(&a));
        assert!(controller.interaction().is_idle());

        controller.apply(&mut store, Gesture::output_port(&a));
        controller.apply(&mut store, Gesture::input_port(&a));
        assert!(controller.interaction().is_idle());

        controller.apply(&mut store, Gesture::output_port(&a));
        let events = controller.apply(&mut store, Gesture::node_click(&a));
        assert!(events.is_empty());
        assert!(controller.interaction().is_idle());
        assert_eq!(controller.selected(), None);
        assert!(store.connections().is_empty());
    }

    #[test]
    fn test_explicit_cancel() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");
        controller.apply(&mut store, Gesture::output_port(&a));
        controller.apply(&mut store, Gesture::CancelConnection);
        assert!(controller.interaction().is_idle());
        assert_eq!(controller.prompt(), None);
        assert!(store.connections().is_empty());
    }

    #[test]
    fn test_second_start_replaces_pending() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");
        let b = place(&mut controller, &mut store, "transform");
        let c = place(&mut controller, &mut store, "transform");

        controller.apply(&mut store, Gesture::output_port(&a));
        controller.apply(&mut store, Gesture::output_port(&b));
        assert_eq!(controller.pending(), Some((b.as_str(), PortKind::Output)));

        controller.apply(&mut store, Gesture::input_port(&c));
        assert_eq!(store.connections().len(), 1);
        assert!(store.connections()[0].links(&b, &c));
    }

    #[test]
    fn test_click_on_missing_port_is_ignored() {
        let (mut controller, mut store) = setup();
        let input = place(&mut controller, &mut store, "input");
        controller.apply(&mut store, Gesture::input_port(&input));
        assert!(controller.interaction().is_idle());
    }

    #[test]
    fn test_port_click_while_dragging_is_ignored() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");
        controller.apply(&mut store, Gesture::palette_drag("payment"));
        controller.apply(&mut store, Gesture::output_port(&a));
        assert!(matches!(controller.interaction(), Interaction::Dragging { .. }));
    }

    #[test]
    fn test_palette_drag_drops_pending_connection() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");
        controller.apply(&mut store, Gesture::output_port(&a));
        controller.apply(&mut store, Gesture::palette_drag("payment"));
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn test_delete_selected_node_clears_selection_and_pending() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");
        let b = place(&mut controller, &mut store, "transform");
        store.add_connection(&a, &b).unwrap();

        controller.apply(&mut store, Gesture::node_click(&a));
        controller.apply(&mut store, Gesture::output_port(&a));
        let events = controller.apply(&mut store, Gesture::delete_node(&a));

        assert_eq!(
            events,
            vec![
                EditorEvent::NodeRemoved {
                    node_id: a.clone(),
                    connections: vec!["conn-1".to_string()],
                },
                EditorEvent::SelectionChanged(None),
            ]
        );
        assert_eq!(controller.selected(), None);
        assert!(controller.interaction().is_idle());
        assert!(controller.apply(&mut store, Gesture::delete_node(&a)).is_empty());
    }

    #[test]
    fn test_delete_other_node_keeps_selection() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");
        let b = place(&mut controller, &mut store, "transform");
        controller.apply(&mut store, Gesture::node_click(&a));
        controller.apply(&mut store, Gesture::delete_node(&b));
        assert_eq!(controller.selected(), Some(a.as_str()));
    }

    #[test]
    fn test_delete_connection_gesture() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "transform");
        let b = place(&mut controller, &mut store, "transform");
        let conn = store.add_connection(&a, &b).unwrap();

        let events = controller.apply(
            &mut store,
            Gesture::DeleteConnection {
                connection_id: conn.id.clone(),
            },
        );
        assert_eq!(events.len(), 1);
        assert!(store.connections().is_empty());
        assert_eq!(store.nodes().len(), 2);
    }

    #[test]
    fn test_reorder_at_boundary_is_noop() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "input");
        let b = place(&mut controller, &mut store, "output");

        let events = controller.apply(
            &mut store,
            Gesture::Reorder {
                node_id: a.clone(),
                direction: Direction::Up,
            },
        );
        assert!(events.is_empty());
        assert_eq!(store.graph().node_ids(), vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn test_edit_config_events() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "payment");

        let applied = controller.apply(&mut store, Gesture::edit_config(&a, "currency", "NGN"));
        assert_eq!(
            applied,
            vec![EditorEvent::NodeConfigured {
                node_id: a.clone(),
                field: "currency".to_string(),
            }]
        );

        let rejected = controller.apply(
            &mut store,
            Gesture::EditConfigText {
                node_id: a.clone(),
                field: "amount".to_string(),
                raw: "a lot".to_string(),
            },
        );
        assert!(rejected.is_empty());
        assert_eq!(store.node(&a).unwrap().config.get("amount"), Some(&ConfigValue::Number(0.0)));
    }

    #[test]
    fn test_rename() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "payment");
        let events = controller.apply(
            &mut store,
            Gesture::Rename {
                node_id: a.clone(),
                title: "School fees".to_string(),
            },
        );
        assert_eq!(events, vec![EditorEvent::NodeRenamed(a.clone())]);
        assert_eq!(store.node(&a).unwrap().title, "School fees");
    }

    #[test]
    fn test_apply_template_replaces_graph_and_resets_ui_state() {
        let (mut controller, mut store) = setup();
        let a = place(&mut controller, &mut store, "payment");
        place(&mut controller, &mut store, "condition");
        controller.apply(&mut store, Gesture::node_click(&a));
        controller.apply(&mut store, Gesture::output_port(&a));

        let events = controller.apply(&mut store, Gesture::apply_template("Farmers' Alert"));
        assert_eq!(
            events,
            vec![EditorEvent::TemplateApplied("Farmers' Alert".to_string()), EditorEvent::SelectionChanged(None)]
        );
        assert!(store.node(&a).is_none());
        assert_eq!(store.nodes().len(), 3);
        assert_eq!(store.connections().len(), 2);
        assert!(controller.interaction().is_idle());
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn test_unknown_template_is_ignored() {
        let (mut controller, mut store) = setup();
        place(&mut controller, &mut store, "payment");
        assert!(controller.apply(&mut store, Gesture::apply_template("Nope")).is_empty());
        assert_eq!(store.nodes().len(), 1);
    }

    #[test]
    fn test_set_canvas_changes_drop_origin() {
        let (mut controller, mut store) = setup();
        controller.set_canvas(Rect::new(0.0, 0.0, 400.0, 400.0));
        controller.apply(&mut store, Gesture::palette_drag("transform"));
        controller.apply(&mut store, Gesture::palette_drop(30.0, 40.0));
        assert_eq!(store.nodes()[0].position, Position::new(30.0, 40.0));
    }
}
