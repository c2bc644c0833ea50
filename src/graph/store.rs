//! Graph state store: the single owner of nodes and connections.
//!
//! Every operation runs to completion against the in-memory graph and leaves
//! it satisfying the graph invariants:
//! - node and connection ids are unique and never reissued
//! - no connection is a self-loop
//! - at most one connection per ordered (source, target) pair
//! - every connection references two live nodes
//!
//! Operations on stale ids are ignored rather than reported as errors.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tracing::debug;

use crate::{
    CanvasError, Result,
    catalog::{Catalog, CatalogEntry, ConfigValue, NodeConfig, NodeType, PortKind},
    graph::{
        Direction, Graph,
        connection::{Connection, ConnectionId},
        ids::IdAllocator,
        node::{Node, NodeId, Position},
        template::Template,
    },
    model::GraphModel,
};

/// Proposals drawn from the allocator before falling back to suffixed ids.
const MAX_ID_PROPOSALS: usize = 64;

/// Outcome of a config assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigUpdate {
    Applied,
    UnknownNode,
    UnknownField,
    /// The value's kind differs from the field's kind, or raw text did not parse.
    TypeMismatch,
}

impl ConfigUpdate {
    pub fn is_applied(&self) -> bool {
        matches!(self, ConfigUpdate::Applied)
    }
}

pub struct GraphStore {
    catalog: Arc<Catalog>,
    graph: Graph,
    ids: Box<dyn IdAllocator>,
    /// every id issued or loaded during this session
    issued: HashSet<String>,
}

impl GraphStore {
    pub fn new(
        catalog: Arc<Catalog>,
        ids: Box<dyn IdAllocator>,
    ) -> Self {
        Self {
            catalog,
            graph: Graph::new(),
            ids,
            issued: HashSet::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Owned copy of the current graph.
    pub fn snapshot(&self) -> Graph {
        self.graph.clone()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.graph.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.graph.connections
    }

    pub fn node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn connection(
        &self,
        id: &str,
    ) -> Option<&Connection> {
        self.graph.connection(id)
    }

    /// Place a new node of a catalog type.
    ///
    /// # Panics
    ///
    /// Panics if `node_type` is not in the catalog; a palette or template
    /// offering an unregistered type is a wiring bug.
    pub fn add_node(
        &mut self,
        node_type: &NodeType,
        position: Position,
    ) -> Node {
        let catalog = self.catalog.clone();
        let entry = catalog.entry(node_type);
        self.place(entry, position)
    }

    /// Fallible twin of [`GraphStore::add_node`] for types coming from external input.
    pub fn try_add_node(
        &mut self,
        node_type: &NodeType,
        position: Position,
    ) -> Result<Node> {
        let catalog = self.catalog.clone();
        let entry = catalog.get(node_type).ok_or_else(|| CanvasError::Catalog(format!("unknown node type '{}'", node_type)))?;
        Ok(self.place(entry, position))
    }

    fn place(
        &mut self,
        entry: &CatalogEntry,
        position: Position,
    ) -> Node {
        let id = self.allocate_node_id();
        let node = build_node(id, entry, position, None);
        debug!(node_id = %node.id, node_type = %node.node_type, x = position.x, y = position.y, "node added");
        self.graph.nodes.push(node.clone());
        node
    }

    /// Update a node's position. Returns false if the node does not exist.
    pub fn move_node(
        &mut self,
        id: &str,
        position: Position,
    ) -> bool {
        match self.graph.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                debug!(node_id = id, x = position.x, y = position.y, "node moved");
                true
            }
            None => {
                debug!(node_id = id, "move ignored: unknown node");
                false
            }
        }
    }

    /// Remove a node and every connection touching it.
    pub fn delete_node(
        &mut self,
        id: &str,
    ) -> Option<(Node, Vec<Connection>)> {
        let Some(index) = self.graph.nodes.iter().position(|n| n.id == id) else {
            debug!(node_id = id, "delete ignored: unknown node");
            return None;
        };
        let node = self.graph.nodes.remove(index);

        let (removed, kept): (Vec<Connection>, Vec<Connection>) = self.graph.connections.drain(..).partition(|c| c.involves(id));
        self.graph.connections = kept;

        debug!(node_id = id, connections = removed.len(), "node deleted");
        Some((node, removed))
    }

    /// Swap a node with its neighbour in list order. No-op at either end.
    pub fn reorder_node(
        &mut self,
        id: &str,
        direction: Direction,
    ) -> bool {
        let Some(index) = self.graph.nodes.iter().position(|n| n.id == id) else {
            return false;
        };
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.graph.nodes.len() => index + 1,
            _ => return false,
        };
        self.graph.nodes.swap(index, target);
        debug!(node_id = id, direction = direction.as_ref(), from = index, to = target, "node reordered");
        true
    }

    /// Replace one existing config field. The value must match the field's kind
    /// and numbers must be finite.
    pub fn set_node_config(
        &mut self,
        id: &str,
        field: &str,
        value: ConfigValue,
    ) -> ConfigUpdate {
        let Some(node) = self.graph.nodes.iter_mut().find(|n| n.id == id) else {
            return ConfigUpdate::UnknownNode;
        };
        let Some(current) = node.config.get_mut(field) else {
            return ConfigUpdate::UnknownField;
        };
        if current.kind() != value.kind() || !value.is_finite() {
            debug!(node_id = id, field, expected = current.kind().as_ref(), "config update rejected: type mismatch");
            return ConfigUpdate::TypeMismatch;
        }
        *current = value;
        debug!(node_id = id, field, "node config updated");
        ConfigUpdate::Applied
    }

    /// Like [`GraphStore::set_node_config`], parsing raw UI text into the field's kind.
    pub fn set_node_config_text(
        &mut self,
        id: &str,
        field: &str,
        raw: &str,
    ) -> ConfigUpdate {
        let Some(node) = self.graph.node(id) else {
            return ConfigUpdate::UnknownNode;
        };
        let Some(current) = node.config.get(field) else {
            return ConfigUpdate::UnknownField;
        };
        match ConfigValue::coerce(current.kind(), raw) {
            Some(value) => self.set_node_config(id, field, value),
            None => ConfigUpdate::TypeMismatch,
        }
    }

    pub fn set_node_title(
        &mut self,
        id: &str,
        title: &str,
    ) -> bool {
        match self.graph.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.title = title.to_string();
                debug!(node_id = id, title, "node renamed");
                true
            }
            None => false,
        }
    }

    /// Connect `source`'s output to `target`'s input.
    ///
    /// Returns `None` without touching the graph for self-loops, duplicates,
    /// unknown endpoints and endpoints lacking the needed port.
    pub fn add_connection(
        &mut self,
        source: &str,
        target: &str,
    ) -> Option<Connection> {
        if source == target {
            debug!(node_id = source, "connection skipped: self-loop");
            return None;
        }
        let (Some(from), Some(to)) = (self.graph.node(source), self.graph.node(target)) else {
            debug!(source, target, "connection skipped: unknown endpoint");
            return None;
        };
        if !from.has_port(PortKind::Output) || !to.has_port(PortKind::Input) {
            debug!(source, target, "connection skipped: missing port");
            return None;
        }
        if self.graph.connections.iter().any(|c| c.links(source, target)) {
            debug!(source, target, "connection skipped: duplicate");
            return None;
        }

        let conn = Connection {
            id: self.allocate_connection_id(),
            source_id: source.to_string(),
            target_id: target.to_string(),
        };
        debug!(connection_id = %conn.id, source, target, "connection added");
        self.graph.connections.push(conn.clone());
        Some(conn)
    }

    pub fn delete_connection(
        &mut self,
        id: &str,
    ) -> Option<Connection> {
        let index = self.graph.connections.iter().position(|c| c.id == id)?;
        let conn = self.graph.connections.remove(index);
        debug!(connection_id = id, "connection deleted");
        Some(conn)
    }

    /// Replace the whole graph with a fresh instance of `template`.
    ///
    /// The new graph is built aside and swapped in at once; on error the
    /// current graph is left untouched.
    pub fn replace_with(
        &mut self,
        template: &Template,
    ) -> Result<()> {
        let catalog = self.catalog.clone();
        let mut keys: HashMap<&str, NodeId> = HashMap::new();
        let mut graph = Graph::new();

        let mut index: HashMap<&str, usize> = HashMap::new();
        for tnode in &template.nodes {
            let entry = catalog
                .get(&tnode.node_type)
                .ok_or_else(|| CanvasError::Catalog(format!("template '{}' uses unknown node type '{}'", template.name, tnode.node_type)))?;
            if keys.contains_key(tnode.key.as_str()) {
                return Err(CanvasError::Graph(format!("template '{}' repeats node key '{}'", template.name, tnode.key)));
            }
            let mut node = build_node(String::new(), entry, tnode.position, Some(&tnode.config));
            if let Some(title) = &tnode.title {
                node.title = title.clone();
            }
            keys.insert(tnode.key.as_str(), String::new());
            index.insert(tnode.key.as_str(), graph.nodes.len());
            graph.nodes.push(node);
        }

        for tconn in &template.connections {
            let known = |key: &str| keys.contains_key(key);
            if !known(&tconn.source) || !known(&tconn.target) {
                return Err(CanvasError::Graph(format!(
                    "template '{}' connects unknown key {} -> {}",
                    template.name, tconn.source, tconn.target
                )));
            }
            if tconn.source == tconn.target {
                return Err(CanvasError::Graph(format!("template '{}' has a self-loop on '{}'", template.name, tconn.source)));
            }
            let from = &graph.nodes[index[tconn.source.as_str()]];
            let to = &graph.nodes[index[tconn.target.as_str()]];
            if !from.has_port(PortKind::Output) || !to.has_port(PortKind::Input) {
                return Err(CanvasError::Graph(format!(
                    "template '{}' connects {} -> {} through a missing port",
                    template.name, tconn.source, tconn.target
                )));
            }
        }

        // template validated: allocate ids and wire connections
        for (tnode, node) in template.nodes.iter().zip(graph.nodes.iter_mut()) {
            node.id = self.allocate_node_id();
            keys.insert(tnode.key.as_str(), node.id.clone());
        }
        for tconn in &template.connections {
            let source = keys[tconn.source.as_str()].clone();
            let target = keys[tconn.target.as_str()].clone();
            if graph.connections.iter().any(|c| c.links(&source, &target)) {
                continue;
            }
            graph.connections.push(Connection {
                id: self.allocate_connection_id(),
                source_id: source,
                target_id: target,
            });
        }

        debug!(template = %template.name, nodes = graph.nodes.len(), connections = graph.connections.len(), "template applied");
        self.graph = graph;
        Ok(())
    }

    /// Replace the whole graph with externally supplied data, keeping its ids.
    ///
    /// Ports always come from the catalog; a model listing a different number
    /// of ports than its type has is rejected. Missing titles and config fields
    /// are filled from the catalog.
    /// Duplicate connections are dropped; anything else that would break a
    /// graph invariant is an error and leaves the current graph untouched.
    pub fn load(
        &mut self,
        model: &GraphModel,
    ) -> Result<()> {
        let catalog = self.catalog.clone();
        let mut graph = Graph::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for nm in &model.nodes {
            let node_type = NodeType::from(nm.node_type.as_str());
            let entry = catalog.get(&node_type).ok_or_else(|| CanvasError::Graph(format!("node {} has unknown type '{}'", nm.id, nm.node_type)))?;
            if nm.id.is_empty() || !seen.insert(nm.id.as_str()) {
                return Err(CanvasError::Graph(format!("duplicate or empty node id '{}'", nm.id)));
            }
            let ports = entry.ports();
            if nm.inputs.as_ref().is_some_and(|p| p.len() != ports.inputs) || nm.outputs.as_ref().is_some_and(|p| p.len() != ports.outputs) {
                return Err(CanvasError::Graph(format!(
                    "node {} declares ports that type '{}' does not have",
                    nm.id, nm.node_type
                )));
            }
            if let Some(config) = &nm.config {
                for field in config.iter() {
                    if !field.value.is_finite() {
                        return Err(CanvasError::Graph(format!("node {} field '{}' is not a finite number", nm.id, field.name)));
                    }
                    if let Some(default) = entry.defaults.get(&field.name) {
                        if default.kind() != field.value.kind() {
                            return Err(CanvasError::Graph(format!(
                                "node {} field '{}' should be {}",
                                nm.id,
                                field.name,
                                default.kind().as_ref()
                            )));
                        }
                    }
                }
            }

            let mut node = build_node(nm.id.clone(), entry, nm.position, nm.config.as_ref());
            if let Some(title) = &nm.title {
                node.title = title.clone();
            }
            graph.nodes.push(node);
        }

        let mut conn_ids: HashSet<&str> = HashSet::new();
        for cm in &model.connections {
            let (Some(from), Some(to)) = (graph.node(&cm.source_id), graph.node(&cm.target_id)) else {
                return Err(CanvasError::Graph(format!("connection {} references an unknown node", cm.id)));
            };
            if cm.source_id == cm.target_id {
                return Err(CanvasError::Graph(format!("connection {} is a self-loop", cm.id)));
            }
            if !from.has_port(PortKind::Output) || !to.has_port(PortKind::Input) {
                return Err(CanvasError::Graph(format!("connection {} attaches to a missing port", cm.id)));
            }
            if cm.id.is_empty() || seen.contains(cm.id.as_str()) || !conn_ids.insert(cm.id.as_str()) {
                return Err(CanvasError::Graph(format!("duplicate or empty connection id '{}'", cm.id)));
            }
            if graph.connections.iter().any(|c| c.links(&cm.source_id, &cm.target_id)) {
                debug!(connection_id = %cm.id, "duplicate connection dropped on load");
                continue;
            }
            graph.connections.push(Connection {
                id: cm.id.clone(),
                source_id: cm.source_id.clone(),
                target_id: cm.target_id.clone(),
            });
        }

        // dropped duplicates count as seen too
        for id in seen.iter().chain(conn_ids.iter()) {
            self.issued.insert(id.to_string());
        }
        debug!(nodes = graph.nodes.len(), connections = graph.connections.len(), "graph loaded");
        self.graph = graph;
        Ok(())
    }

    /// Remove all nodes and connections. Issued ids stay reserved.
    pub fn clear(&mut self) {
        self.graph = Graph::new();
        debug!("graph cleared");
    }

    fn allocate_node_id(&mut self) -> NodeId {
        let mut proposals = 0;
        loop {
            let candidate = self.ids.next_node_id();
            if let Some(id) = self.reserve(candidate, &mut proposals) {
                return id;
            }
        }
    }

    fn allocate_connection_id(&mut self) -> ConnectionId {
        let mut proposals = 0;
        loop {
            let candidate = self.ids.next_connection_id();
            if let Some(id) = self.reserve(candidate, &mut proposals) {
                return id;
            }
        }
    }

    /// Claim `candidate`, or a suffixed variant once the allocator keeps colliding.
    fn reserve(
        &mut self,
        candidate: String,
        proposals: &mut usize,
    ) -> Option<String> {
        *proposals += 1;
        if self.issued.insert(candidate.clone()) {
            return Some(candidate);
        }
        if *proposals < MAX_ID_PROPOSALS {
            return None;
        }
        let mut suffix = self.issued.len();
        loop {
            let id = format!("{}-{}", candidate, suffix);
            if self.issued.insert(id.clone()) {
                return Some(id);
            }
            suffix += 1;
        }
    }
}

fn build_node(
    id: NodeId,
    entry: &CatalogEntry,
    position: Position,
    overrides: Option<&NodeConfig>,
) -> Node {
    let mut config = entry.defaults.clone();
    if let Some(overrides) = overrides {
        for field in overrides.iter() {
            config.insert(&field.name, field.value.clone());
        }
    }
    let ports = entry.ports();
    Node {
        id,
        node_type: entry.node_type.clone(),
        title: entry.title.clone(),
        position,
        inputs: ports.input_names(),
        outputs: ports.output_names(),
        config,
    }
}
