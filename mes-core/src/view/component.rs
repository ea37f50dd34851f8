//! Component tree nodes
//!
//! Components live in an arena owned by their `ViewDefinition`; parent → child
//! ownership is the arena order plus `children` ids, and a source link is a
//! plain `ComponentId` into the same arena.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::model::{DataDefinition, FieldDefinition};

use super::hooks::HookDefinition;

/// Index of a component inside its view's arena. The root is always `ROOT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    pub const ROOT: ComponentId = ComponentId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Window,
    Form,
    TextInput,
    CheckBox,
    EntityComboBox,
    LinkButton,
    Grid,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 7] = [
        ComponentKind::Window,
        ComponentKind::Form,
        ComponentKind::TextInput,
        ComponentKind::CheckBox,
        ComponentKind::EntityComboBox,
        ComponentKind::LinkButton,
        ComponentKind::Grid,
    ];

    /// The `type` attribute value used in view files.
    pub fn tag(self) -> &'static str {
        match self {
            ComponentKind::Window => "window",
            ComponentKind::Form => "form",
            ComponentKind::TextInput => "textInput",
            ComponentKind::CheckBox => "checkBox",
            ComponentKind::EntityComboBox => "entityComboBox",
            ComponentKind::LinkButton => "linkButton",
            ComponentKind::Grid => "grid",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn is_container(self) -> bool {
        matches!(self, ComponentKind::Window | ComponentKind::Form)
    }

    pub(crate) fn default_options(self) -> &'static [(&'static str, bool)] {
        match self {
            ComponentKind::Window => &[("backButton", true), ("header", true)],
            ComponentKind::Form => &[("header", true)],
            ComponentKind::Grid => &[
                ("header", true),
                ("sortable", false),
                ("filter", false),
                ("multiselect", false),
                ("paginable", false),
            ],
            ComponentKind::TextInput
            | ComponentKind::CheckBox
            | ComponentKind::EntityComboBox
            | ComponentKind::LinkButton => &[],
        }
    }
}

/// Options whose value is a comma or whitespace separated list.
pub(crate) const LIST_OPTIONS: &[&str] = &["columns", "fields", "orderable", "searchable"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    List(Vec<String>),
}

impl OptionValue {
    /// Scalar coercion: `true`/`false`, then integers, then plain strings.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim() {
            "true" => OptionValue::Boolean(true),
            "false" => OptionValue::Boolean(false),
            trimmed => trimmed
                .parse::<i64>()
                .map(OptionValue::Integer)
                .unwrap_or_else(|_| OptionValue::String(raw.to_string())),
        }
    }

    pub fn list(raw: &str) -> Self {
        OptionValue::List(split_list(raw))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(values) => Some(values),
            _ => None,
        }
    }
}

pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AggregationMode {
    #[default]
    None,
    Sum,
}

impl AggregationMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NONE" => Some(AggregationMode::None),
            "SUM" => Some(AggregationMode::Sum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) aggregation_mode: AggregationMode,
    pub(crate) expression: Option<String>,
    pub(crate) width: Option<u32>,
    pub(crate) fields: BTreeSet<FieldDefinition>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aggregation_mode(&self) -> AggregationMode {
        self.aggregation_mode
    }

    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn fields(&self) -> &BTreeSet<FieldDefinition> {
        &self.fields
    }
}

/// Grid columns and the schema fields a grid may sort and search on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub(crate) columns: Vec<Column>,
    pub(crate) orderable_fields: BTreeSet<FieldDefinition>,
    pub(crate) searchable_fields: BTreeSet<FieldDefinition>,
}

impl Grid {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn orderable_fields(&self) -> &BTreeSet<FieldDefinition> {
        &self.orderable_fields
    }

    pub fn searchable_fields(&self) -> &BTreeSet<FieldDefinition> {
        &self.searchable_fields
    }
}

/// One node of a parsed view.
#[derive(Debug, Clone)]
pub struct Component {
    pub(crate) id: ComponentId,
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) kind: ComponentKind,
    pub(crate) view_name: String,
    pub(crate) data_definition: Arc<DataDefinition>,
    pub(crate) field_path: Option<String>,
    pub(crate) source_field_path: Option<String>,
    pub(crate) source_component: Option<ComponentId>,
    pub(crate) listeners: BTreeSet<String>,
    pub(crate) options: BTreeMap<String, OptionValue>,
    pub(crate) default_enabled: bool,
    pub(crate) default_visible: bool,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
    pub(crate) grid: Option<Grid>,
    pub(crate) hook: Option<HookDefinition>,
}

impl Component {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// The component type tag, e.g. `"grid"`.
    pub fn type_name(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn data_definition(&self) -> &Arc<DataDefinition> {
        &self.data_definition
    }

    pub fn field_path(&self) -> Option<&str> {
        self.field_path.as_deref()
    }

    pub fn source_field_path(&self) -> Option<&str> {
        self.source_field_path.as_deref()
    }

    /// Id of the source component; resolve it through the owning view.
    pub fn source_component_id(&self) -> Option<ComponentId> {
        self.source_component
    }

    pub fn listeners(&self) -> &BTreeSet<String> {
        &self.listeners
    }

    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn is_default_enabled(&self) -> bool {
        self.default_enabled
    }

    pub fn is_default_visible(&self) -> bool {
        self.default_visible
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn parent_id(&self) -> Option<ComponentId> {
        self.parent
    }

    pub fn child_ids(&self) -> &[ComponentId] {
        &self.children
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn hook(&self) -> Option<&HookDefinition> {
        self.hook.as_ref()
    }
}
