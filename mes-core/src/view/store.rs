//! View definition storage.
//!
//! Views are keyed by `(plugin identifier, view name)`. Saving a view under an
//! existing key replaces it.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::definition::ViewDefinition;

pub trait ViewStore: Send + Sync {
    fn save(&self, view: Arc<ViewDefinition>);

    fn get(&self, plugin_identifier: &str, name: &str) -> Option<Arc<ViewDefinition>>;

    fn delete(&self, plugin_identifier: &str, name: &str) -> Option<Arc<ViewDefinition>>;

    /// All stored views, ordered by plugin then name.
    fn list(&self) -> Vec<Arc<ViewDefinition>>;
}

type StoreKey = (String, String);

#[derive(Default)]
pub struct MemoryViewStore {
    views: Mutex<BTreeMap<StoreKey, Arc<ViewDefinition>>>,
}

impl MemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.views.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ViewStore for MemoryViewStore {
    fn save(&self, view: Arc<ViewDefinition>) {
        let key = (view.plugin_identifier().to_string(), view.name().to_string());
        debug!("Storing view {}.{}", key.0, key.1);
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, view);
    }

    fn get(&self, plugin_identifier: &str, name: &str) -> Option<Arc<ViewDefinition>> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(plugin_identifier.to_string(), name.to_string()))
            .cloned()
    }

    fn delete(&self, plugin_identifier: &str, name: &str) -> Option<Arc<ViewDefinition>> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(plugin_identifier.to_string(), name.to_string()))
    }

    fn list(&self) -> Vec<Arc<ViewDefinition>> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}
