//! Parsed, immutable view definitions.

use super::component::{Component, ComponentId};
use super::hooks::HookDefinition;
use crate::error::ViewError;

/// One screen: name, owning plugin and its component tree.
///
/// Components are stored in document order, so `components()` walks the tree
/// depth-first with the root first.
#[derive(Debug, Clone)]
pub struct ViewDefinition {
    name: String,
    plugin_identifier: String,
    components: Vec<Component>,
    hook: Option<HookDefinition>,
}

impl ViewDefinition {
    /// `components` must be non-empty with the root at index 0.
    pub(crate) fn new(
        name: String,
        plugin_identifier: String,
        components: Vec<Component>,
        hook: Option<HookDefinition>,
    ) -> Self {
        debug_assert!(!components.is_empty());
        Self {
            name,
            plugin_identifier,
            components,
            hook,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plugin_identifier(&self) -> &str {
        &self.plugin_identifier
    }

    pub fn root(&self) -> &Component {
        &self.components[ComponentId::ROOT.0]
    }

    pub fn hook(&self) -> Option<&HookDefinition> {
        self.hook.as_ref()
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn children<'a>(&'a self, component: &'a Component) -> impl Iterator<Item = &'a Component> {
        component
            .children
            .iter()
            .filter_map(move |id| self.components.get(id.0))
    }

    pub fn parent(&self, component: &Component) -> Option<&Component> {
        component.parent.and_then(|id| self.components.get(id.0))
    }

    pub fn source_component(&self, component: &Component) -> Option<&Component> {
        component
            .source_component
            .and_then(|id| self.components.get(id.0))
    }

    /// Find a component by its full dotted path, starting at the root.
    /// Matching is exact and case-sensitive; prefixes do not resolve.
    pub fn lookup_component(&self, path: &str) -> Result<&Component, ViewError> {
        let not_found = || ViewError::ComponentNotFound {
            path: path.to_string(),
        };

        let mut segments = path.split('.');
        let mut current = self.root();
        if segments.next() != Some(current.name.as_str()) {
            return Err(not_found());
        }
        for segment in segments {
            current = self
                .children(current)
                .find(|child| child.name == segment)
                .ok_or_else(not_found)?;
        }
        Ok(current)
    }

    /// Invoke the view-level hook, if one is declared.
    pub fn invoke_hook(&self) -> anyhow::Result<()> {
        match &self.hook {
            Some(hook) => hook.call(self, None),
            None => Ok(()),
        }
    }
}
