use std::sync::{Arc, RwLock};

use globset::{Glob, GlobMatcher};

use crate::{Result, events::EditorEvent};

pub type EventHandle = Arc<dyn Fn(&EditorEvent) + Send + Sync>;

/// Which events a subscriber receives.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// use the glob pattern to match the node id
    /// eg. node-1*
    pub node: String,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            node: "*".to_string(),
        }
    }
}

impl EventFilter {
    pub fn with_node(node: &str) -> Self {
        Self {
            node: node.to_string(),
        }
    }

    fn is_wildcard(&self) -> bool {
        self.node == "*"
    }
}

struct Subscriber {
    filter: EventFilter,
    matcher: GlobMatcher,
    handle: EventHandle,
}

impl Subscriber {
    /// Graph-wide events (no node ids) only reach wildcard subscribers.
    fn accepts(
        &self,
        event: &EditorEvent,
    ) -> bool {
        if self.filter.is_wildcard() {
            return true;
        }
        event.node_ids().iter().any(|id| self.matcher.is_match(id))
    }
}

#[derive(Clone, Default)]
pub(crate) struct Channel {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl Channel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(
        &self,
        filter: EventFilter,
        handle: EventHandle,
    ) -> Result<()> {
        let matcher = Glob::new(&filter.node)?.compile_matcher();
        let mut subscribers = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subscribers.push(Subscriber {
            filter,
            matcher,
            handle,
        });
        Ok(())
    }

    pub(crate) fn emit(
        &self,
        event: &EditorEvent,
    ) {
        let subscribers = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        for subscriber in subscribers.iter().filter(|s| s.accepts(event)) {
            (subscriber.handle)(event);
        }
    }

    #[allow(unused)]
    pub(crate) fn len(&self) -> usize {
        self.subscribers.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
