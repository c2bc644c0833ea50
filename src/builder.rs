use std::sync::Arc;

use tracing::debug;

use crate::{
    Config, Editor, IdStrategy, Result,
    catalog::Catalog,
    controller::Controller,
    graph::{GraphStore, IdAllocator, RandomIds, SequentialIds, Template},
    model::{GraphModel, NodeModel},
};

/// Builds an [`Editor`].
///
/// Without overrides the editor gets the default [`Config`], the builtin
/// catalog with any configured entries layered on top, the builtin templates
/// and an empty graph.
#[derive(Default)]
pub struct EditorBuilder {
    config: Config,
    catalog: Option<Catalog>,
    ids: Option<Box<dyn IdAllocator>>,
    templates: Option<Vec<Template>>,
    initial: Option<GraphModel>,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.config = config;
        self
    }

    /// Use this catalog as is, ignoring the configured entries.
    pub fn catalog(
        mut self,
        catalog: Catalog,
    ) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Override the id allocator chosen by `id_strategy`.
    pub fn id_allocator(
        mut self,
        ids: Box<dyn IdAllocator>,
    ) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn templates(
        mut self,
        templates: Vec<Template>,
    ) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Start from a saved graph.
    pub fn initial_graph(
        mut self,
        model: GraphModel,
    ) -> Self {
        self.initial = Some(model);
        self
    }

    /// Start from a set of nodes with no connections.
    pub fn initial_nodes(
        self,
        nodes: Vec<NodeModel>,
    ) -> Self {
        self.initial_graph(GraphModel {
            nodes,
            connections: Vec::new(),
        })
    }

    pub fn build(self) -> Result<Editor> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => self.config.build_catalog()?,
        };
        let ids: Box<dyn IdAllocator> = match self.ids {
            Some(ids) => ids,
            None => match self.config.id_strategy {
                IdStrategy::Sequential => Box::new(SequentialIds::new()),
                IdStrategy::Random => Box::new(RandomIds),
            },
        };

        let mut store = GraphStore::new(Arc::new(catalog), ids);
        if let Some(model) = &self.initial {
            store.load(model)?;
        }

        let templates = self.templates.unwrap_or_else(Template::builtin);
        let controller = Controller::new(self.config.canvas.bounds(), templates);
        debug!(nodes = store.nodes().len(), catalog = store.catalog().len(), "editor built");

        Ok(Editor::new(self.config, store, controller))
    }
}
