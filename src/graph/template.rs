//! Named full-graph snapshots that replace the canvas in one step.
//!
//! Templates address their nodes through template-local keys. Real ids are
//! allocated by the store on every instantiation, so applying the same
//! template twice never reuses an id.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{NodeConfig, NodeType},
    graph::node::Position,
};

/// A node inside a template.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TemplateNode {
    /// template-local key, referenced by [`TemplateConnection`]
    pub key: String,
    pub node_type: NodeType,
    /// overrides the catalog title when set
    #[serde(default)]
    pub title: Option<String>,
    pub position: Position,
    /// fields layered over the catalog defaults
    #[serde(default)]
    pub config: NodeConfig,
}

/// A connection inside a template, by template-local keys.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TemplateConnection {
    pub source: String,
    pub target: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<TemplateNode>,
    #[serde(default)]
    pub connections: Vec<TemplateConnection>,
}

impl Template {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn description(
        mut self,
        description: &str,
    ) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn node(
        mut self,
        key: &str,
        node_type: &str,
        position: Position,
        config: NodeConfig,
    ) -> Self {
        self.nodes.push(TemplateNode {
            key: key.to_string(),
            node_type: NodeType::from(node_type),
            title: None,
            position,
            config,
        });
        self
    }

    pub fn connect(
        mut self,
        source: &str,
        target: &str,
    ) -> Self {
        self.connections.push(TemplateConnection {
            source: source.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// The reference templates shipped with the builder.
    pub fn builtin() -> Vec<Template> {
        vec![Self::farmers_alert(), Self::ecitizen_assistant()]
    }

    /// Input, SMS alert, output.
    pub fn farmers_alert() -> Self {
        Self::new("Farmers' Alert")
            .description("Send weather alerts to farmers by SMS")
            .node("input", "input", Position::new(50.0, 50.0), NodeConfig::new())
            .node(
                "sms",
                "messaging",
                Position::new(50.0, 200.0),
                NodeConfig::new().with("to", "+254XXXXXXXXX").with("message", "Your farm alert: Rain expected tomorrow!").with("senderId", "FARMALERT"),
            )
            .node("output", "output", Position::new(50.0, 350.0), NodeConfig::new())
            .connect("input", "sms")
            .connect("sms", "output")
    }

    /// Input, product verification, SMS result, output.
    pub fn ecitizen_assistant() -> Self {
        Self::new("eCitizen Assistant")
            .description("Verify a product registration and text the result")
            .node("input", "input", Position::new(50.0, 50.0), NodeConfig::new())
            .node(
                "nafdac",
                "verification",
                Position::new(50.0, 200.0),
                NodeConfig::new().with("productId", "NAFDAC-REG-001").with("checkType", "verification"),
            )
            .node(
                "sms",
                "messaging",
                Position::new(50.0, 350.0),
                NodeConfig::new().with("to", "+234XXXXXXXXX").with("message", "Your product verification result: Authentic").with("senderId", "NAFDAC"),
            )
            .node("output", "output", Position::new(50.0, 500.0), NodeConfig::new())
            .connect("input", "nafdac")
            .connect("nafdac", "sms")
            .connect("sms", "output")
    }
}
