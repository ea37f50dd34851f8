//! Component tree builder
//!
//! Builds the component arena from `<component>` elements. Each component is
//! bound to a schema scope as soon as that scope is known:
//!
//! - a `model` attribute names an entity through the schema provider;
//! - a `field` attribute walks relation chains from the scope it starts in;
//! - without either, the parent's scope is inherited.
//!
//! A component that declares a `source` takes its scope from the source
//! component, which may not have been built yet. Such components (and the
//! descendants that inherit from them) stay unbound until the
//! cross-reference pass binds them.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use super::component::{
    split_list, AggregationMode, Column, Component, ComponentId, ComponentKind, Grid, OptionValue,
    LIST_OPTIONS,
};
use super::hooks::{HookDefinition, HookRegistry};
use super::xml::XmlElement;
use crate::error::ViewError;
use crate::model::{DataDefinition, EntityRef, FieldDefinition, SchemaProvider};

#[derive(Debug, Clone, Default)]
struct ColumnDeclaration {
    name: String,
    aggregation_mode: AggregationMode,
    expression: Option<String>,
    width: Option<u32>,
    fields: Vec<String>,
}

/// Grid field names as written in the view file, resolved once the grid's
/// scope is known.
#[derive(Debug, Clone, Default)]
struct GridDeclaration {
    columns: Vec<ColumnDeclaration>,
    fields: Vec<String>,
    orderable: Vec<String>,
    searchable: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct ComponentDraft {
    pub(crate) name: String,
    pub(crate) path: String,
    kind: ComponentKind,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
    model: Option<String>,
    field: Option<String>,
    /// Declared source component path.
    pub(crate) source: Option<String>,
    pub(crate) data_definition: Option<Arc<DataDefinition>>,
    field_path: Option<String>,
    source_field_path: Option<String>,
    pub(crate) source_component: Option<ComponentId>,
    pub(crate) listeners: BTreeSet<String>,
    options: BTreeMap<String, OptionValue>,
    default_enabled: bool,
    default_visible: bool,
    grid_declaration: Option<GridDeclaration>,
    grid: Option<Grid>,
    hook: Option<HookDefinition>,
}

pub(crate) struct ComponentTreeBuilder<'a> {
    schemas: &'a dyn SchemaProvider,
    hooks: &'a HookRegistry,
    plugin_identifier: &'a str,
    view_name: &'a str,
    pub(crate) nodes: Vec<ComponentDraft>,
    index: HashMap<String, ComponentId>,
}

impl<'a> ComponentTreeBuilder<'a> {
    pub(crate) fn new(
        schemas: &'a dyn SchemaProvider,
        hooks: &'a HookRegistry,
        plugin_identifier: &'a str,
        view_name: &'a str,
    ) -> Self {
        Self {
            schemas,
            hooks,
            plugin_identifier,
            view_name,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Path → component index of everything built so far.
    pub(crate) fn find(&self, path: &str) -> Option<ComponentId> {
        self.index.get(path).copied()
    }

    /// Build `element` and its subtree below `parent`. `inherited` is the
    /// parent's scope, `None` while the parent is waiting for its source.
    pub(crate) fn build(
        &mut self,
        element: &XmlElement,
        parent: Option<ComponentId>,
        inherited: Option<Arc<DataDefinition>>,
    ) -> Result<ComponentId, ViewError> {
        let parent_path = parent.map(|id| self.nodes[id.0].path.clone());
        let context = parent_path.as_deref().unwrap_or(self.view_name);

        let name = element.required_attribute("name", context)?;
        if name.contains('.') {
            return Err(ViewError::invalid_attribute(
                context,
                "name",
                name,
                "component names must not contain '.'",
            ));
        }
        let path = match &parent_path {
            Some(parent_path) => format!("{}.{}", parent_path, name),
            None => name.to_string(),
        };

        let type_name = element.required_attribute("type", &path)?;
        let kind = ComponentKind::from_tag(type_name).ok_or_else(|| {
            ViewError::UnknownComponentType {
                path: path.clone(),
                type_name: type_name.to_string(),
            }
        })?;

        if self.index.contains_key(&path) {
            return Err(ViewError::DuplicateComponentPath { path });
        }

        let listeners: BTreeSet<String> = match element.optional_attribute("listeners", &path)? {
            Some(raw) => {
                let listeners: BTreeSet<String> = split_list(raw).into_iter().collect();
                if listeners.is_empty() {
                    return Err(ViewError::invalid_attribute(
                        &path,
                        "listeners",
                        raw,
                        "expected at least one component path",
                    ));
                }
                listeners
            }
            None => BTreeSet::new(),
        };

        let (options, grid_declaration) = parse_options(element, kind, &path)?;
        let hook = self.hooks.resolve_child(element, &path)?;

        let child_elements: Vec<&XmlElement> = element.children_named("component").collect();
        if !kind.is_container() && !child_elements.is_empty() {
            return Err(ViewError::UnexpectedChildComponent {
                path,
                type_name: kind.tag().to_string(),
            });
        }
        if let Some(unexpected) = element
            .children
            .iter()
            .find(|child| !matches!(child.name.as_str(), "component" | "option" | "hook"))
        {
            return Err(ViewError::malformed(
                unexpected.position,
                format!("unexpected element <{}> in component '{}'", unexpected.name, path),
            ));
        }

        let draft = ComponentDraft {
            name: name.to_string(),
            path: path.clone(),
            kind,
            parent,
            children: Vec::new(),
            model: element.optional_attribute("model", &path)?.map(str::to_string),
            field: element.optional_attribute("field", &path)?.map(str::to_string),
            source: element.optional_attribute("source", &path)?.map(str::to_string),
            data_definition: None,
            field_path: None,
            source_field_path: None,
            source_component: None,
            listeners,
            options,
            default_enabled: element.boolean_attribute("defaultEnabled", &path, true)?,
            default_visible: element.boolean_attribute("defaultVisible", &path, true)?,
            grid_declaration,
            grid: None,
            hook,
        };
        let bindable = draft.source.is_none() && (inherited.is_some() || draft.model.is_some());

        let id = ComponentId(self.nodes.len());
        self.nodes.push(draft);
        self.index.insert(path.clone(), id);
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }

        if bindable {
            self.bind(id, inherited)?;
        }
        debug!(
            "Built {} '{}' ({})",
            kind.tag(),
            path,
            if bindable { "bound" } else { "awaiting source" }
        );

        let scope = self.nodes[id.0].data_definition.clone();
        for child in child_elements {
            self.build(child, Some(id), scope.clone())?;
        }
        Ok(id)
    }

    /// Bind `id` with `scope` as the starting schema, then every descendant
    /// that inherits from it. Descendants with their own `source` are bound
    /// separately.
    pub(crate) fn bind_subtree(
        &mut self,
        id: ComponentId,
        scope: Arc<DataDefinition>,
    ) -> Result<(), ViewError> {
        self.bind(id, Some(scope))?;
        let child_scope = self.nodes[id.0].data_definition.clone();
        let children = self.nodes[id.0].children.clone();
        for child in children {
            if self.nodes[child.0].source.is_some() {
                continue;
            }
            match &child_scope {
                Some(scope) => self.bind_subtree(child, Arc::clone(scope))?,
                None => {
                    return Err(ViewError::UnboundComponent {
                        path: self.nodes[child.0].path.clone(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Resolve the schema scope, field binding and grid fields of one
    /// component. `base` is the inherited scope, or the source component's
    /// scope for source-bound components.
    fn bind(&mut self, id: ComponentId, base: Option<Arc<DataDefinition>>) -> Result<(), ViewError> {
        let draft = &self.nodes[id.0];
        let path = draft.path.clone();
        let field = draft.field.clone();
        let has_source = draft.source.is_some();

        let mut scope = match (&draft.model, base) {
            (Some(model), _) => self.resolve_model(model, &path)?,
            (None, Some(base)) => base,
            (None, None) => return Err(ViewError::UnboundComponent { path }),
        };

        let (field_path, source_field_path) = match field {
            Some(field) => {
                scope = self.walk_field_path(&scope, &field, &path)?;
                if has_source {
                    (None, Some(field))
                } else {
                    (Some(field), None)
                }
            }
            None => (None, None),
        };

        let grid = match &self.nodes[id.0].grid_declaration {
            Some(declaration) => Some(resolve_grid(declaration, &scope, &path)?),
            None => None,
        };

        let draft = &mut self.nodes[id.0];
        draft.data_definition = Some(scope);
        draft.field_path = field_path;
        draft.source_field_path = source_field_path;
        draft.grid = grid;
        Ok(())
    }

    fn resolve_model(&self, reference: &str, path: &str) -> Result<Arc<DataDefinition>, ViewError> {
        let entity = EntityRef::parse(reference, self.plugin_identifier);
        self.schemas
            .resolve(&entity)
            .ok_or_else(|| ViewError::UnresolvedSchemaReference {
                path: path.to_string(),
                entity: entity.to_string(),
            })
    }

    /// Follow a dotted field path from `schema`. Relation segments move into
    /// the target schema; a scalar may only be the last segment. Returns the
    /// schema the path ends in.
    fn walk_field_path(
        &self,
        schema: &Arc<DataDefinition>,
        field_path: &str,
        path: &str,
    ) -> Result<Arc<DataDefinition>, ViewError> {
        let segments: Vec<&str> = field_path.split('.').collect();
        let mut current = Arc::clone(schema);

        for (position, segment) in segments.iter().enumerate() {
            let unresolved = |entity: &DataDefinition| ViewError::UnresolvedFieldReference {
                path: path.to_string(),
                field: field_path.to_string(),
                entity: entity.entity_ref().to_string(),
            };

            let target = current
                .field(segment)
                .ok_or_else(|| unresolved(&*current))?
                .field_type()
                .relation_target()
                .cloned();

            match target {
                Some(target) => {
                    current = self.schemas.resolve(&target).ok_or_else(|| {
                        ViewError::UnresolvedSchemaReference {
                            path: path.to_string(),
                            entity: target.to_string(),
                        }
                    })?;
                }
                None if position + 1 < segments.len() => return Err(unresolved(&*current)),
                None => {}
            }
        }
        Ok(current)
    }

    /// Convert the drafts into finished components. Every draft must be bound.
    pub(crate) fn finish(self) -> Result<Vec<Component>, ViewError> {
        let view_name = self.view_name.to_string();
        self.nodes
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                let data_definition = draft.data_definition.ok_or_else(|| {
                    ViewError::UnboundComponent {
                        path: draft.path.clone(),
                    }
                })?;
                Ok(Component {
                    id: ComponentId(index),
                    name: draft.name,
                    path: draft.path,
                    kind: draft.kind,
                    view_name: view_name.clone(),
                    data_definition,
                    field_path: draft.field_path,
                    source_field_path: draft.source_field_path,
                    source_component: draft.source_component,
                    listeners: draft.listeners,
                    options: draft.options,
                    default_enabled: draft.default_enabled,
                    default_visible: draft.default_visible,
                    parent: draft.parent,
                    children: draft.children,
                    grid: draft.grid,
                    hook: draft.hook,
                })
            })
            .collect()
    }
}

fn parse_options(
    element: &XmlElement,
    kind: ComponentKind,
    path: &str,
) -> Result<(BTreeMap<String, OptionValue>, Option<GridDeclaration>), ViewError> {
    let mut options: BTreeMap<String, OptionValue> = kind
        .default_options()
        .iter()
        .map(|(name, value)| (name.to_string(), OptionValue::Boolean(*value)))
        .collect();
    let mut grid = (kind == ComponentKind::Grid).then(GridDeclaration::default);

    for option in element.children_named("option") {
        let option_type = option.required_attribute("type", path)?;

        if option_type == "column" {
            match grid.as_mut() {
                Some(grid) => grid.columns.push(parse_column(option, path)?),
                None => {
                    return Err(ViewError::invalid_attribute(
                        path,
                        "type",
                        option_type,
                        "column options are only valid on grids",
                    ))
                }
            }
            continue;
        }

        let raw = option.required_attribute("value", path)?;
        let value = if LIST_OPTIONS.contains(&option_type) {
            OptionValue::list(raw)
        } else {
            OptionValue::coerce(raw)
        };

        if let (Some(grid), OptionValue::List(items)) = (grid.as_mut(), &value) {
            match option_type {
                "fields" => grid.fields = items.clone(),
                "orderable" => grid.orderable = items.clone(),
                "searchable" => grid.searchable = items.clone(),
                _ => {}
            }
        }
        options.insert(option_type.to_string(), value);
    }

    if let Some(grid) = grid.as_mut() {
        if grid.columns.is_empty() {
            // A bare `columns` list declares one single-field column per name.
            if let Some(OptionValue::List(names)) = options.get("columns") {
                grid.columns = names
                    .iter()
                    .map(|name| ColumnDeclaration {
                        name: name.clone(),
                        fields: vec![name.clone()],
                        ..ColumnDeclaration::default()
                    })
                    .collect();
            }
        } else {
            let names = grid.columns.iter().map(|c| c.name.clone()).collect();
            options.insert("columns".to_string(), OptionValue::List(names));
        }
    }

    Ok((options, grid))
}

fn parse_column(option: &XmlElement, path: &str) -> Result<ColumnDeclaration, ViewError> {
    let name = option.required_attribute("name", path)?.to_string();

    let aggregation_mode = match option.optional_attribute("aggregationMode", path)? {
        Some(raw) => AggregationMode::parse(raw).ok_or_else(|| {
            ViewError::invalid_attribute(path, "aggregationMode", raw, "expected NONE or SUM")
        })?,
        None => AggregationMode::None,
    };

    let width = match option.optional_attribute("width", path)? {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
            ViewError::invalid_attribute(path, "width", raw, "expected a non-negative integer")
        })?),
        None => None,
    };

    let fields = match option.optional_attribute("fields", path)? {
        Some(raw) => split_list(raw),
        None => vec![name.clone()],
    };

    Ok(ColumnDeclaration {
        name,
        aggregation_mode,
        expression: option
            .optional_attribute("expression", path)?
            .map(str::to_string),
        width,
        fields,
    })
}

fn resolve_grid(
    declaration: &GridDeclaration,
    scope: &DataDefinition,
    path: &str,
) -> Result<Grid, ViewError> {
    let resolve = |names: &[String]| -> Result<BTreeSet<FieldDefinition>, ViewError> {
        names
            .iter()
            .map(|name| {
                scope
                    .field(name)
                    .cloned()
                    .ok_or_else(|| ViewError::UnresolvedFieldReference {
                        path: path.to_string(),
                        field: name.clone(),
                        entity: scope.entity_ref().to_string(),
                    })
            })
            .collect()
    };

    resolve(&declaration.fields)?;
    let columns = declaration
        .columns
        .iter()
        .map(|column| {
            Ok(Column {
                name: column.name.clone(),
                aggregation_mode: column.aggregation_mode,
                expression: column.expression.clone(),
                width: column.width,
                fields: resolve(&column.fields)?,
            })
        })
        .collect::<Result<Vec<_>, ViewError>>()?;

    Ok(Grid {
        columns,
        orderable_fields: resolve(&declaration.orderable)?,
        searchable_fields: resolve(&declaration.searchable)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldType, MemorySchemaProvider, ScalarType};
    use crate::view::xml::read_document;

    fn schemas() -> MemorySchemaProvider {
        let provider = MemorySchemaProvider::new();
        provider.register(
            DataDefinition::new("sample", "beanA")
                .with_field(FieldDefinition::new("name", FieldType::Scalar(ScalarType::String)))
                .with_field(FieldDefinition::new(
                    "beansB",
                    FieldType::HasMany {
                        target: EntityRef::new("sample", "beanB"),
                        join_field: "beanA".to_string(),
                    },
                )),
        );
        provider.register(
            DataDefinition::new("sample", "beanB")
                .with_field(FieldDefinition::new("name", FieldType::Scalar(ScalarType::String)))
                .with_field(FieldDefinition::new(
                    "beanA",
                    FieldType::BelongsTo {
                        target: EntityRef::new("sample", "beanA"),
                    },
                )),
        );
        provider
    }

    fn build(xml: &str) -> Result<Vec<ComponentDraft>, ViewError> {
        let provider = schemas();
        let hooks = HookRegistry::new();
        let element = read_document(xml.as_bytes())?;
        let root_scope = provider.get("sample", "beanB");
        let mut builder = ComponentTreeBuilder::new(&provider, &hooks, "sample", "testView");
        builder.build(&element, None, root_scope)?;
        Ok(builder.nodes)
    }

    fn scope_name(draft: &ComponentDraft) -> Option<&str> {
        draft.data_definition.as_deref().map(DataDefinition::name)
    }

    #[test]
    fn test_paths_and_children_follow_document_order() {
        let nodes = build(
            r#"<component type="window" name="w">
                 <component type="form" name="f">
                   <component type="textInput" name="a" field="name"/>
                   <component type="checkBox" name="b" field="name"/>
                 </component>
                 <component type="linkButton" name="c"/>
               </component>"#,
        )
        .expect("build");

        let paths: Vec<_> = nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["w", "w.f", "w.f.a", "w.f.b", "w.c"]);
        assert_eq!(nodes[0].children, vec![ComponentId(1), ComponentId(4)]);
        assert_eq!(nodes[1].children, vec![ComponentId(2), ComponentId(3)]);
        assert_eq!(nodes[2].parent, Some(ComponentId(1)));
    }

    #[test]
    fn test_relation_field_moves_scope() {
        let nodes = build(
            r#"<component type="form" name="f">
                 <component type="entityComboBox" name="select" field="beanA"/>
                 <component type="textInput" name="qualified" field="beanA.name"/>
                 <component type="form" name="nested" field="beanA">
                   <component type="textInput" name="name" field="name"/>
                 </component>
               </component>"#,
        )
        .expect("build");

        assert_eq!(scope_name(&nodes[0]), Some("beanB"));
        assert_eq!(scope_name(&nodes[1]), Some("beanA"));
        assert_eq!(nodes[1].field_path.as_deref(), Some("beanA"));
        assert_eq!(scope_name(&nodes[2]), Some("beanA"));
        assert_eq!(nodes[2].field_path.as_deref(), Some("beanA.name"));
        assert_eq!(scope_name(&nodes[4]), Some("beanA"));
        assert_eq!(nodes[4].field_path.as_deref(), Some("name"));
    }

    #[test]
    fn test_model_attribute_overrides_inherited_scope() {
        let nodes = build(
            r#"<component type="window" name="w">
                 <component type="form" name="f" model="sample.beanA"/>
               </component>"#,
        )
        .expect("build");
        assert_eq!(scope_name(&nodes[1]), Some("beanA"));
    }

    #[test]
    fn test_unknown_model_is_unresolved_schema() {
        let err = build(r#"<component type="form" name="f" model="ghost"/>"#).unwrap_err();
        assert_eq!(
            err,
            ViewError::UnresolvedSchemaReference {
                path: "f".to_string(),
                entity: "sample.ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_field_is_unresolved() {
        let err = build(r#"<component type="textInput" name="x" field="number"/>"#).unwrap_err();
        assert_eq!(
            err,
            ViewError::UnresolvedFieldReference {
                path: "x".to_string(),
                field: "number".to_string(),
                entity: "sample.beanB".to_string(),
            }
        );
    }

    #[test]
    fn test_scalar_cannot_be_traversed() {
        let err = build(r#"<component type="textInput" name="x" field="name.length"/>"#)
            .unwrap_err();
        assert!(matches!(err, ViewError::UnresolvedFieldReference { .. }), "{err:?}");
    }

    #[test]
    fn test_unknown_type_fails() {
        let err = build(r#"<component type="tree" name="x"/>"#).unwrap_err();
        assert_eq!(
            err,
            ViewError::UnknownComponentType {
                path: "x".to_string(),
                type_name: "tree".to_string(),
            }
        );
    }

    #[test]
    fn test_field_component_with_children_fails() {
        let err = build(
            r#"<component type="textInput" name="x" field="name">
                 <component type="checkBox" name="y"/>
               </component>"#,
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::UnexpectedChildComponent { .. }), "{err:?}");
    }

    #[test]
    fn test_duplicate_sibling_names_fail() {
        let err = build(
            r#"<component type="form" name="f">
                 <component type="textInput" name="x" field="name"/>
                 <component type="textInput" name="x" field="name"/>
               </component>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ViewError::DuplicateComponentPath {
                path: "f.x".to_string()
            }
        );
    }

    #[test]
    fn test_dotted_name_is_rejected() {
        let err = build(r#"<component type="form" name="a.b"/>"#).unwrap_err();
        assert!(matches!(err, ViewError::InvalidAttribute { .. }), "{err:?}");
    }

    #[test]
    fn test_defaults_and_declared_flags() {
        let nodes = build(
            r#"<component type="form" name="f">
                 <option type="header" value="false"/>
                 <component type="checkBox" name="c" field="name"
                            defaultEnabled="false" defaultVisible="false"
                            listeners="f.a, f.b"/>
               </component>"#,
        )
        .expect("build");

        assert_eq!(nodes[0].options.get("header"), Some(&OptionValue::Boolean(false)));
        assert!(nodes[0].default_enabled && nodes[0].default_visible);
        assert!(!nodes[1].default_enabled && !nodes[1].default_visible);
        let listeners: Vec<_> = nodes[1].listeners.iter().map(String::as_str).collect();
        assert_eq!(listeners, vec!["f.a", "f.b"]);
    }

    #[test]
    fn test_blank_listeners_are_rejected() {
        for listeners in ["  ", " , "] {
            let xml = format!(
                r#"<component type="checkBox" name="c" field="name" listeners="{listeners}"/>"#
            );
            let err = build(&xml).unwrap_err();
            assert!(
                matches!(
                    &err,
                    ViewError::InvalidAttribute { path, attribute, .. }
                        if path == "c" && attribute == "listeners"
                ),
                "listeners={listeners:?}: {err:?}"
            );
        }
    }

    #[test]
    fn test_grid_columns_are_resolved() {
        let nodes = build(
            r#"<component type="grid" name="g">
                 <option type="column" name="multicolumn" fields="name, beanA, name"
                         expression="2 + 2" width="20" aggregationMode="SUM"/>
                 <option type="orderable" value="name"/>
                 <option type="searchable" value="name,beanA"/>
                 <option type="height" value="450"/>
               </component>"#,
        )
        .expect("build");

        let grid = nodes[0].grid.as_ref().expect("grid");
        let column = &grid.columns[0];
        assert_eq!(column.name, "multicolumn");
        assert_eq!(column.aggregation_mode, AggregationMode::Sum);
        assert_eq!(column.expression.as_deref(), Some("2 + 2"));
        assert_eq!(column.width, Some(20));
        assert_eq!(column.fields.len(), 2);
        assert_eq!(grid.orderable_fields.len(), 1);
        assert_eq!(grid.searchable_fields.len(), 2);
        assert_eq!(
            nodes[0].options.get("columns"),
            Some(&OptionValue::List(vec!["multicolumn".to_string()]))
        );
        assert_eq!(nodes[0].options.get("height"), Some(&OptionValue::Integer(450)));
        assert_eq!(nodes[0].options.get("paginable"), Some(&OptionValue::Boolean(false)));
    }

    #[test]
    fn test_grid_column_list_declares_simple_columns() {
        let nodes = build(
            r#"<component type="grid" name="g">
                 <option type="columns" value="name"/>
               </component>"#,
        )
        .expect("build");

        let grid = nodes[0].grid.as_ref().expect("grid");
        assert_eq!(grid.columns.len(), 1);
        assert_eq!(grid.columns[0].aggregation_mode, AggregationMode::None);
        assert_eq!(grid.columns[0].width, None);
        assert_eq!(grid.columns[0].fields.len(), 1);
    }

    #[test]
    fn test_grid_column_with_unknown_field_fails() {
        let err = build(
            r#"<component type="grid" name="g">
                 <option type="column" name="c" fields="name,price"/>
               </component>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ViewError::UnresolvedFieldReference {
                path: "g".to_string(),
                field: "price".to_string(),
                entity: "sample.beanB".to_string(),
            }
        );
    }

    #[test]
    fn test_column_option_outside_grid_fails() {
        let err = build(
            r#"<component type="form" name="f">
                 <option type="column" name="c"/>
               </component>"#,
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::InvalidAttribute { .. }), "{err:?}");
    }

    #[test]
    fn test_source_bound_component_waits_for_resolution() {
        let nodes = build(
            r#"<component type="form" name="f">
                 <component type="grid" name="g" source="f.select" field="beansB"/>
                 <component type="entityComboBox" name="select" field="beanA"/>
               </component>"#,
        )
        .expect("build");

        assert!(nodes[1].data_definition.is_none());
        assert_eq!(nodes[1].source.as_deref(), Some("f.select"));
        assert_eq!(scope_name(&nodes[2]), Some("beanA"));
    }
}
