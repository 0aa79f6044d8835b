//! Sink registry and per-level subscription lists

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    sink::Sink,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Every known sink keyed by id, plus one ordered subscription list per level.
///
/// Subscription lists keep insertion order and never hold the same id twice.
/// A sink has to be registered before any level can reference it.
#[derive(Default)]
pub struct ProviderRegistry {
    sinks: HashMap<String, Arc<dyn Sink>>,
    subscriptions: [Vec<Arc<dyn Sink>>; LogLevel::COUNT],
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink. Returns `false` when the id was already known, in
    /// which case the existing sink is kept untouched.
    pub fn register(&mut self, sink: Arc<dyn Sink>) -> bool {
        let id = sink.id().to_string();
        if self.sinks.contains_key(&id) {
            return false;
        }
        self.sinks.insert(id, sink);
        true
    }

    /// Add a registered sink to the subscription list of every given level.
    ///
    /// Nothing is modified when `id` is unknown.
    pub fn subscribe(&mut self, id: &str, levels: &[LogLevel]) -> Result<()> {
        let sink = self
            .sinks
            .get(id)
            .cloned()
            .ok_or_else(|| LoggerError::unknown_sink(id))?;

        for level in levels {
            let list = &mut self.subscriptions[level.index()];
            if !list.iter().any(|s| s.id() == id) {
                list.push(Arc::clone(&sink));
            }
        }
        Ok(())
    }

    /// Sinks subscribed to `level`, in subscription order
    pub fn subscribers(&self, level: LogLevel) -> &[Arc<dyn Sink>] {
        &self.subscriptions[level.index()]
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Sink>> {
        self.sinks.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sinks.contains_key(id)
    }

    /// Number of registered sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sinks(&self) -> impl Iterator<Item = &Arc<dyn Sink>> {
        self.sinks.values()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.sinks.keys().map(String::as_str).collect();
        ids.sort_unstable();

        let mut dbg = f.debug_struct("ProviderRegistry");
        dbg.field("sinks", &ids);
        for level in LogLevel::ALL {
            let subscribed: Vec<&str> = self.subscribers(level).iter().map(|s| s.id()).collect();
            dbg.field(level.to_str(), &subscribed);
        }
        dbg.finish()
    }
}
