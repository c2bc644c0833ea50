mod connection;
mod graph;
mod node;

pub use connection::ConnectionModel;
pub use graph::GraphModel;
pub use node::NodeModel;
