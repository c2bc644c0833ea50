//! # Flowboard
//!
//! Flowboard is the editing core of a visual workflow builder: a small
//! node-link canvas where typed service nodes are dropped from a palette,
//! wired output-to-input, configured field by field and finally handed to an
//! external deployer.
//!
//! ## Parts
//!
//! - **Catalog**: node type registry (title, default config, port arity)
//! - **Graph store**: owns nodes and connections and enforces their invariants
//! - **Controller**: gesture state machine (palette drag, selection, connecting)
//! - **Projector**: stateless node/edge geometry for rendering and hit-testing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowboard::{EditorBuilder, Gesture, SimulatedDeployer};
//!
//! let mut editor = EditorBuilder::new().build()?;
//! editor.apply(Gesture::palette_drag("messaging"));
//! editor.apply(Gesture::palette_drop(120.0, 80.0));
//!
//! let projection = editor.projection();
//! let receipt = editor.deploy(&SimulatedDeployer::default()).await?;
//! ```

mod assistant;
mod builder;
mod catalog;
mod config;
mod controller;
mod editor;
mod error;
mod events;
mod graph;
mod model;
mod projector;

pub use assistant::{Assistant, ChatMessage, ChatRole, Reply};
pub use builder::EditorBuilder;
pub use catalog::{Catalog, CatalogEntry, ConfigField, ConfigValue, FieldKind, NodeConfig, NodeRole, NodeType, PortArity, PortKind};
pub use config::{CanvasConfig, Config, DeployConfig, IdStrategy, LayoutConfig, PaletteConfig};
pub use controller::{Controller, Gesture, Interaction};
pub use editor::{DeployReceipt, DeployStatus, Deployer, Editor, Saver, SimulatedDeployer};
pub use error::CanvasError;
pub use events::{EditorEvent, EventFilter, EventHandle};
pub use graph::{
    Connection, ConnectionId, ConfigUpdate, Direction, Graph, GraphStore, IdAllocator, Node, NodeId, Position, RandomIds, Rect, SequentialIds, Template,
    TemplateConnection, TemplateNode,
};
pub use model::{ConnectionModel, GraphModel, NodeModel};
pub use projector::{DeleteHandle, EdgePath, NodeBox, Projection, Projector};

/// Result type alias for Flowboard operations.
pub type Result<T> = std::result::Result<T, CanvasError>;
