use serde::{Deserialize, Serialize};

use crate::{
    CanvasError, Result,
    graph::{Connection, Graph, Node},
    model::{ConnectionModel, NodeModel},
};

/// Wire form of a graph, used for the initial-graph input and the save payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphModel {
    pub nodes: Vec<NodeModel>,
    #[serde(default)]
    pub connections: Vec<ConnectionModel>,
}

impl GraphModel {
    pub fn from_json(s: &str) -> Result<Self> {
        let graph = serde_json::from_str::<GraphModel>(s);
        match graph {
            Ok(v) => Ok(v),
            Err(e) => Err(CanvasError::Graph(format!("{}", e))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&Node> for NodeModel {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type.to_string(),
            title: Some(node.title.clone()),
            position: node.position,
            inputs: Some(node.inputs.clone()),
            outputs: Some(node.outputs.clone()),
            config: Some(node.config.clone()),
        }
    }
}

impl From<&Connection> for ConnectionModel {
    fn from(conn: &Connection) -> Self {
        Self {
            id: conn.id.clone(),
            source_id: conn.source_id.clone(),
            target_id: conn.target_id.clone(),
        }
    }
}

impl From<&Graph> for GraphModel {
    fn from(graph: &Graph) -> Self {
        Self {
            nodes: graph.nodes.iter().map(NodeModel::from).collect(),
            connections: graph.connections.iter().map(ConnectionModel::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_reads_reference_shape() {
        let json = r#"{
            "nodes": [
                {"id": "node-input", "type": "input", "position": {"x": 50, "y": 50}, "outputs": ["output"]},
                {"id": "node-sms", "type": "messaging", "title": "SMS", "position": {"x": 50, "y": 200},
                 "config": [{"name": "to", "value": "+254XXXXXXXXX"}]}
            ],
            "connections": [{"id": "conn-1", "sourceId": "node-input", "targetId": "node-sms"}]
        }"#;
        let model = GraphModel::from_json(json).unwrap();
        assert_eq!(model.nodes.len(), 2);
        assert_eq!(model.nodes[0].node_type, "input");
        assert_eq!(model.nodes[0].inputs, None);
        assert_eq!(model.nodes[1].title.as_deref(), Some("SMS"));
        assert_eq!(model.connections[0].source_id, "node-input");
    }

    #[test]
    fn test_from_json_without_connections() {
        let model = GraphModel::from_json(r#"{"nodes": []}"#).unwrap();
        assert!(model.connections.is_empty());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = GraphModel::from_json("{\"nodes\": 3}").unwrap_err();
        assert!(matches!(err, CanvasError::Graph(_)));
    }
}
