//! Lifecycle hooks
//!
//! Plugins register handlers under a `(bean, method)` key; view files refer to
//! them with `<hook bean=".." method=".."/>`. Resolution happens at parse
//! time, so a view never holds a reference to a handler that does not exist.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;
use tracing::debug;

use super::component::Component;
use super::definition::ViewDefinition;
use super::xml::XmlElement;
use crate::error::ViewError;

/// What a hook is invoked for.
pub struct HookContext<'a> {
    pub view: &'a ViewDefinition,
    pub component: Option<&'a Component>,
}

pub type HookHandler = Arc<dyn Fn(&HookContext<'_>) -> Result<()> + Send + Sync>;

/// A resolved `(bean, method)` pair.
#[derive(Clone)]
pub struct HookDefinition {
    bean: String,
    method_name: String,
    handler: HookHandler,
}

impl HookDefinition {
    pub fn bean(&self) -> &str {
        &self.bean
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn call(&self, view: &ViewDefinition, component: Option<&Component>) -> Result<()> {
        (self.handler)(&HookContext { view, component })
    }
}

impl fmt::Debug for HookDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDefinition")
            .field("bean", &self.bean)
            .field("method_name", &self.method_name)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct HookRegistry {
    handlers: RwLock<HashMap<(String, String), HookHandler>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, bean: impl Into<String>, method: impl Into<String>, handler: F)
    where
        F: Fn(&HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((bean.into(), method.into()), Arc::new(handler));
    }

    pub fn contains(&self, bean: &str, method: &str) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&(bean.to_string(), method.to_string()))
    }

    /// Resolve a declared hook; `path` names the declaring view or component.
    pub fn resolve(&self, bean: &str, method: &str, path: &str) -> Result<HookDefinition, ViewError> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let handler = handlers
            .get(&(bean.to_string(), method.to_string()))
            .ok_or_else(|| ViewError::UnresolvedHook {
                path: path.to_string(),
                bean: bean.to_string(),
                method: method.to_string(),
            })?;

        debug!("Resolved hook {}.{} for '{}'", bean, method, path);
        Ok(HookDefinition {
            bean: bean.to_string(),
            method_name: method.to_string(),
            handler: Arc::clone(handler),
        })
    }

    /// Resolve the single optional `<hook>` child of `element`.
    pub(crate) fn resolve_child(
        &self,
        element: &XmlElement,
        path: &str,
    ) -> Result<Option<HookDefinition>, ViewError> {
        let mut declared = element.children_named("hook");
        let Some(hook) = declared.next() else {
            return Ok(None);
        };
        if let Some(extra) = declared.next() {
            return Err(ViewError::malformed(
                extra.position,
                format!("'{}' declares more than one hook", path),
            ));
        }

        let bean = hook.required_attribute("bean", path)?;
        let method = hook.required_attribute("method", path)?;
        self.resolve(bean, method, path).map(Some)
    }
}
