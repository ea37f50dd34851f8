//! View definition parser
//!
//! Orchestrates one parse: structural read, tree construction against the
//! schema provider, hook resolution, the cross-reference pass, and finally a
//! single write to the view store. Nothing is stored unless every stage
//! succeeds.

use std::io::{BufReader, Read};
use std::sync::Arc;

use tracing::info;

use super::builder::ComponentTreeBuilder;
use super::definition::ViewDefinition;
use super::hooks::HookRegistry;
use super::resolver;
use super::store::ViewStore;
use super::xml::{read_document, XmlElement};
use crate::error::ViewError;
use crate::model::{EntityRef, SchemaProvider};

pub struct ViewDefinitionParser {
    schemas: Arc<dyn SchemaProvider>,
    hooks: Arc<HookRegistry>,
    store: Arc<dyn ViewStore>,
}

impl ViewDefinitionParser {
    pub fn new(
        schemas: Arc<dyn SchemaProvider>,
        hooks: Arc<HookRegistry>,
        store: Arc<dyn ViewStore>,
    ) -> Self {
        Self {
            schemas,
            hooks,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn ViewStore> {
        &self.store
    }

    /// Parse one view document and store the result, replacing any view
    /// already stored under the same plugin and name.
    pub fn parse<R: Read>(&self, source: R) -> Result<Arc<ViewDefinition>, ViewError> {
        let document = read_document(BufReader::new(source))?;
        let view = Arc::new(self.build_view(&document)?);

        self.store.save(Arc::clone(&view));
        info!(
            "Parsed view {}.{} ({} components)",
            view.plugin_identifier(),
            view.name(),
            view.len()
        );
        Ok(view)
    }

    pub fn parse_str(&self, xml: &str) -> Result<Arc<ViewDefinition>, ViewError> {
        self.parse(xml.as_bytes())
    }

    fn build_view(&self, document: &XmlElement) -> Result<ViewDefinition, ViewError> {
        if document.name != "view" {
            return Err(ViewError::malformed(
                document.position,
                format!("expected <view> root element, found <{}>", document.name),
            ));
        }

        let name = document.required_attribute("name", "view")?;
        let plugin_identifier = document.required_attribute("plugin", name)?;
        let key = format!("{}.{}", plugin_identifier, name);

        if let Some(unexpected) = document
            .children
            .iter()
            .find(|child| !matches!(child.name.as_str(), "component" | "hook"))
        {
            return Err(ViewError::malformed(
                unexpected.position,
                format!("unexpected element <{}> in view '{}'", unexpected.name, key),
            ));
        }

        let mut roots = document.children_named("component");
        let root = roots.next().ok_or_else(|| {
            ViewError::malformed(document.position, format!("view '{}' has no root component", key))
        })?;
        if let Some(extra) = roots.next() {
            return Err(ViewError::malformed(
                extra.position,
                format!("view '{}' declares more than one root component", key),
            ));
        }

        let root_scope = match document.optional_attribute("model", &key)? {
            Some(model) => {
                let entity = EntityRef::parse(model, plugin_identifier);
                let schema = self.schemas.resolve(&entity).ok_or_else(|| {
                    ViewError::UnresolvedSchemaReference {
                        path: key.clone(),
                        entity: entity.to_string(),
                    }
                })?;
                Some(schema)
            }
            // The root component may name its own model instead.
            None if root.attribute("model").is_some() => None,
            None => {
                return Err(ViewError::MissingAttribute {
                    element: "view".to_string(),
                    attribute: "model".to_string(),
                    path: key,
                })
            }
        };

        let hook = self.hooks.resolve_child(document, &key)?;

        let mut builder = ComponentTreeBuilder::new(
            self.schemas.as_ref(),
            self.hooks.as_ref(),
            plugin_identifier,
            name,
        );
        builder.build(root, None, root_scope)?;
        resolver::resolve(&mut builder)?;
        let components = builder.finish()?;

        Ok(ViewDefinition::new(
            name.to_string(),
            plugin_identifier.to_string(),
            components,
            hook,
        ))
    }
}
