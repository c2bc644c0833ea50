//! Node catalog: the registry of node types a canvas can host.
//!
//! The catalog maps a [`NodeType`] to its display title, a deterministic
//! default configuration and a [`NodeRole`] that fixes port arity. It is an
//! immutable value handed to the editor at build time, never a global.

mod builtin;
mod value;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, Result};

pub use value::{ConfigField, ConfigValue, FieldKind, NodeConfig};

/// Name of the single input port of a node.
pub const INPUT_PORT: &str = "input";
/// Name of the single output port of a node.
pub const OUTPUT_PORT: &str = "output";

/// Identifier of a node type, e.g. `payment` or `condition`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeType(String);

impl NodeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NodeType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a node type sits in a workflow; decides its ports.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeRole {
    /// Entry point: no input, one output.
    Source,
    /// Intermediate step: one input, one output.
    #[default]
    Step,
    /// Terminal: one input, no output.
    Sink,
}

impl NodeRole {
    pub fn ports(&self) -> PortArity {
        match self {
            NodeRole::Source => PortArity {
                inputs: 0,
                outputs: 1,
            },
            NodeRole::Step => PortArity {
                inputs: 1,
                outputs: 1,
            },
            NodeRole::Sink => PortArity {
                inputs: 1,
                outputs: 0,
            },
        }
    }
}

/// Side of a node a port sits on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PortKind {
    Input,
    Output,
}

impl PortKind {
    pub fn is_output(&self) -> bool {
        matches!(self, PortKind::Output)
    }

    pub fn opposite(&self) -> Self {
        match self {
            PortKind::Input => PortKind::Output,
            PortKind::Output => PortKind::Input,
        }
    }
}

/// Number of input and output ports a node type carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortArity {
    pub inputs: usize,
    pub outputs: usize,
}

impl PortArity {
    pub fn input_names(&self) -> Vec<String> {
        port_names(INPUT_PORT, self.inputs)
    }

    pub fn output_names(&self) -> Vec<String> {
        port_names(OUTPUT_PORT, self.outputs)
    }
}

fn port_names(
    base: &str,
    count: usize,
) -> Vec<String> {
    match count {
        0 => Vec::new(),
        1 => vec![base.to_string()],
        n => (1..=n).map(|i| format!("{}-{}", base, i)).collect(),
    }
}

/// Everything the catalog knows about one node type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub node_type: NodeType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub role: NodeRole,
    #[serde(default)]
    pub defaults: NodeConfig,
}

impl CatalogEntry {
    pub fn new(
        node_type: &str,
        title: &str,
        role: NodeRole,
    ) -> Self {
        Self {
            node_type: NodeType::from(node_type),
            title: title.to_string(),
            description: String::new(),
            category: String::new(),
            role,
            defaults: NodeConfig::new(),
        }
    }

    pub fn description(
        mut self,
        description: &str,
    ) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn category(
        mut self,
        category: &str,
    ) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn defaults(
        mut self,
        defaults: NodeConfig,
    ) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn ports(&self) -> PortArity {
        self.role.ports()
    }
}

/// Immutable registry of node types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference catalog: African services plus logic nodes.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Build a catalog from entries; later entries override earlier ones with the same type.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self> {
        let mut catalog = Self::new();
        for entry in entries {
            catalog = catalog.with_entry(entry)?;
        }
        Ok(catalog)
    }

    /// Add or replace an entry.
    pub fn with_entry(
        mut self,
        entry: CatalogEntry,
    ) -> Result<Self> {
        if entry.node_type.as_str().trim().is_empty() {
            return Err(CanvasError::Catalog("catalog entry has an empty node type".to_string()));
        }
        if entry.title.trim().is_empty() {
            return Err(CanvasError::Catalog(format!("catalog entry '{}' has an empty title", entry.node_type)));
        }
        match self.entries.iter_mut().find(|e| e.node_type == entry.node_type) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(self)
    }

    pub fn get(
        &self,
        node_type: &NodeType,
    ) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| &e.node_type == node_type)
    }

    /// Lookup that treats an unknown type as a wiring bug.
    ///
    /// # Panics
    ///
    /// Panics if `node_type` is not registered.
    pub fn entry(
        &self,
        node_type: &NodeType,
    ) -> &CatalogEntry {
        match self.get(node_type) {
            Some(entry) => entry,
            None => panic!("unknown node type '{}': not registered in the catalog", node_type),
        }
    }

    pub fn contains(
        &self,
        node_type: &NodeType,
    ) -> bool {
        self.get(node_type).is_some()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped by category, categories and entries in insertion order.
    pub fn palette(&self) -> Vec<(&str, Vec<&CatalogEntry>)> {
        let mut groups: Vec<(&str, Vec<&CatalogEntry>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(category, _)| *category == entry.category) {
                Some((_, members)) => members.push(entry),
                None => groups.push((entry.category.as_str(), vec![entry])),
            }
        }
        groups
    }
}
