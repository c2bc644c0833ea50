//! Editor façade - the main entry point for Flowboard.
//!
//! The editor wires together:
//! - the graph store (nodes, connections, ids)
//! - the interaction controller (gestures, selection)
//! - the projector (render geometry)
//! - the event channel and the assistant
//! - the deploy and save triggers

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    CanvasError, Config, Result,
    assistant::{Assistant, ChatMessage, DEPLOYED, Reply},
    catalog::{Catalog, CatalogEntry, NodeType},
    controller::{Controller, Gesture, Interaction},
    events::{Channel, EditorEvent, EventFilter, EventHandle},
    graph::{Graph, GraphStore, Node, Position},
    model::GraphModel,
    projector::{Projection, Projector},
};

/// State of the deploy trigger.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeployStatus {
    #[default]
    Idle,
    Deploying,
    Deployed,
    Failed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeployReceipt {
    pub deployment_id: String,
    pub nodes: usize,
    pub connections: usize,
    /// unix millis
    pub deployed_at: i64,
}

/// Receives the graph snapshot when the user deploys.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(
        &self,
        graph: Graph,
    ) -> Result<DeployReceipt>;
}

/// Receives the graph snapshot when the user saves.
#[async_trait]
pub trait Saver: Send + Sync {
    async fn save(
        &self,
        graph: Graph,
    ) -> Result<()>;
}

/// Deployer that accepts every graph after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedDeployer {
    delay: Duration,
}

impl Default for SimulatedDeployer {
    fn default() -> Self {
        Self::new(3000)
    }
}

impl SimulatedDeployer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[async_trait]
impl Deployer for SimulatedDeployer {
    async fn deploy(
        &self,
        graph: Graph,
    ) -> Result<DeployReceipt> {
        tokio::time::sleep(self.delay).await;
        Ok(DeployReceipt {
            deployment_id: format!("deploy-{}", nanoid!(8)),
            nodes: graph.nodes.len(),
            connections: graph.connections.len(),
            deployed_at: Utc::now().timestamp_millis(),
        })
    }
}

/// The workflow editor.
///
/// # Example
///
/// ```rust,ignore
/// let mut editor = EditorBuilder::new().config(config).build()?;
/// editor.on_event(EventFilter::default(), Arc::new(|e| println!("{}", e.str())))?;
///
/// editor.apply(Gesture::apply_template("Farmers' Alert"));
/// let receipt = editor.deploy(&SimulatedDeployer::new(config.deploy.delay_ms)).await?;
/// ```
pub struct Editor {
    config: Config,
    store: GraphStore,
    controller: Controller,
    projector: Projector,
    assistant: Assistant,
    channel: Channel,
    deploy_status: DeployStatus,
}

impl Editor {
    pub(crate) fn new(
        config: Config,
        store: GraphStore,
        controller: Controller,
    ) -> Self {
        let projector = Projector::new(config.layout);
        Self {
            config,
            store,
            controller,
            projector,
            assistant: Assistant::new(),
            channel: Channel::new(),
            deploy_status: DeployStatus::Idle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        self.store.catalog()
    }

    /// Catalog entries grouped by palette category.
    pub fn palette(&self) -> Vec<(&str, Vec<&CatalogEntry>)> {
        self.store.catalog().palette()
    }

    pub fn graph(&self) -> &Graph {
        self.store.graph()
    }

    pub fn snapshot(&self) -> Graph {
        self.store.snapshot()
    }

    pub fn model(&self) -> GraphModel {
        GraphModel::from(self.store.graph())
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn interaction(&self) -> &Interaction {
        self.controller.interaction()
    }

    pub fn selected(&self) -> Option<&str> {
        self.controller.selected()
    }

    pub fn deploy_status(&self) -> DeployStatus {
        self.deploy_status
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        self.assistant.transcript()
    }

    /// Register an event handler.
    pub fn on_event(
        &self,
        filter: EventFilter,
        handle: EventHandle,
    ) -> Result<()> {
        self.channel.subscribe(filter, handle)
    }

    /// Apply a gesture and publish what changed.
    pub fn apply(
        &mut self,
        gesture: Gesture,
    ) -> Vec<EditorEvent> {
        let events = self.controller.apply(&mut self.store, gesture);
        self.publish(&events);
        events
    }

    pub fn projection(&self) -> Projection {
        self.projector.project(self.store.graph(), self.controller.selected())
    }

    /// Add a node without a drop point; it lands in the next palette row.
    pub fn spawn_node(
        &mut self,
        node_type: &NodeType,
    ) -> Result<Node> {
        let row = self.store.nodes().len() as f64;
        let position = Position::new(self.config.palette.spawn_x, row * self.config.palette.spawn_row_height);
        let node = self.store.try_add_node(node_type, position)?;
        self.publish(&[EditorEvent::NodeAdded(node.id.clone())]);
        Ok(node)
    }

    /// Send a message to the assistant, adding the node it suggests if any.
    pub fn chat(
        &mut self,
        input: &str,
    ) -> Option<Reply> {
        let reply = self.assistant.chat(input, self.store.graph())?;
        if let Some(node_type) = &reply.add_node {
            if let Err(e) = self.spawn_node(node_type) {
                warn!(node_type = %node_type, error = %e, "assistant suggestion not added");
            }
        }
        Some(reply)
    }

    /// Replace the graph with a saved one. Selection and gestures reset.
    pub fn load(
        &mut self,
        model: &GraphModel,
    ) -> Result<()> {
        self.store.load(model)?;
        self.controller.reset();
        self.publish(&[EditorEvent::GraphLoaded]);
        Ok(())
    }

    /// Mark a deploy as pending and hand out the snapshot to deploy.
    pub fn begin_deploy(&mut self) -> Result<Graph> {
        if self.deploy_status == DeployStatus::Deploying {
            return Err(CanvasError::Deploy("a deploy is already in progress".to_string()));
        }
        self.set_deploy_status(DeployStatus::Deploying);
        Ok(self.store.snapshot())
    }

    /// Settle the pending deploy with the deployer's outcome.
    pub fn finish_deploy(
        &mut self,
        result: Result<DeployReceipt>,
    ) -> Result<DeployReceipt> {
        if self.deploy_status != DeployStatus::Deploying {
            return Err(CanvasError::Deploy("no deploy in progress".to_string()));
        }
        match result {
            Ok(receipt) => {
                info!(deployment_id = %receipt.deployment_id, nodes = receipt.nodes, "workflow deployed");
                self.set_deploy_status(DeployStatus::Deployed);
                self.assistant.say(DEPLOYED);
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "deploy failed");
                self.set_deploy_status(DeployStatus::Failed);
                Err(e)
            }
        }
    }

    pub async fn deploy(
        &mut self,
        deployer: &dyn Deployer,
    ) -> Result<DeployReceipt> {
        let graph = self.begin_deploy()?;
        let result = deployer.deploy(graph).await;
        self.finish_deploy(result)
    }

    pub async fn save(
        &mut self,
        saver: &dyn Saver,
    ) -> Result<()> {
        saver.save(self.store.snapshot()).await.map_err(|e| match e {
            CanvasError::Save(_) => e,
            other => CanvasError::Save(other.to_string()),
        })?;
        debug!("workflow saved");
        self.publish(&[EditorEvent::Saved]);
        Ok(())
    }

    fn set_deploy_status(
        &mut self,
        status: DeployStatus,
    ) {
        debug!(from = self.deploy_status.as_ref(), to = status.as_ref(), "deploy status");
        self.deploy_status = status;
        self.publish(&[EditorEvent::DeployChanged(status)]);
    }

    fn publish(
        &self,
        events: &[EditorEvent],
    ) {
        for event in events {
            self.channel.emit(event);
        }
    }
}
