//! Entity schema descriptors
//!
//! A `DataDefinition` describes one persisted entity type: its fields and the
//! type of each field. Relation fields only *name* their target entity; the
//! target is looked up through a `SchemaProvider`, so mutually related
//! entities (A has many B, B belongs to A) never own each other.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Identifies a data definition: plugin identifier plus entity name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityRef {
    pub plugin_identifier: String,
    pub entity_name: String,
}

impl EntityRef {
    pub fn new(plugin_identifier: impl Into<String>, entity_name: impl Into<String>) -> Self {
        Self {
            plugin_identifier: plugin_identifier.into(),
            entity_name: entity_name.into(),
        }
    }

    /// Parse `plugin.entity`, or a bare entity name that lives in `default_plugin`.
    pub fn parse(reference: &str, default_plugin: &str) -> Self {
        match reference.split_once('.') {
            Some((plugin, entity)) => Self::new(plugin, entity),
            None => Self::new(default_plugin, reference),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.plugin_identifier, self.entity_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarType {
    String,
    Text,
    Integer,
    Decimal,
    Boolean,
}

/// Type of a single field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    Scalar(ScalarType),
    BelongsTo { target: EntityRef },
    HasMany { target: EntityRef, join_field: String },
}

impl FieldType {
    /// Target entity of a relation field, `None` for scalars.
    pub fn relation_target(&self) -> Option<&EntityRef> {
        match self {
            FieldType::Scalar(_) => None,
            FieldType::BelongsTo { target } | FieldType::HasMany { target, .. } => Some(target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldDefinition {
    name: String,
    field_type: FieldType,
    required: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Schema of one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDefinition {
    entity: EntityRef,
    fields: BTreeMap<String, FieldDefinition>,
}

impl DataDefinition {
    pub fn new(plugin_identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity: EntityRef::new(plugin_identifier, name),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn plugin_identifier(&self) -> &str {
        &self.entity.plugin_identifier
    }

    pub fn name(&self) -> &str {
        &self.entity.entity_name
    }

    pub fn entity_ref(&self) -> &EntityRef {
        &self.entity
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }
}

/// Source of entity schemas, keyed by plugin identifier and entity name.
pub trait SchemaProvider: Send + Sync {
    fn get(&self, plugin_identifier: &str, entity_name: &str) -> Option<Arc<DataDefinition>>;

    fn resolve(&self, entity: &EntityRef) -> Option<Arc<DataDefinition>> {
        self.get(&entity.plugin_identifier, &entity.entity_name)
    }
}

/// In-memory schema provider, populated programmatically or from YAML files.
#[derive(Default)]
pub struct MemorySchemaProvider {
    inner: RwLock<HashMap<EntityRef, Arc<DataDefinition>>>,
}

impl MemorySchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one with the same key.
    pub fn register(&self, definition: DataDefinition) -> Arc<DataDefinition> {
        let definition = Arc::new(definition);
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(definition.entity_ref().clone(), Arc::clone(&definition));
        definition
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register every entity declared in one YAML schema document.
    /// Returns the number of entities registered.
    pub fn load_yaml(&self, source: &str) -> Result<usize> {
        let file: SchemaFile =
            serde_yaml::from_str(source).context("Failed to parse schema document")?;

        let count = file.entities.len();
        for (entity_name, entity) in file.entities {
            let mut definition = DataDefinition::new(&file.plugin, entity_name);
            for (field_name, spec) in entity.fields {
                definition = definition.with_field(spec.into_definition(field_name, &file.plugin));
            }
            self.register(definition);
        }
        Ok(count)
    }

    pub fn load_file(&self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let count = self
            .load_yaml(&content)
            .with_context(|| format!("Failed to load schema {}", path.display()))?;
        info!("Loaded {} entity schemas from {}", count, path.display());
        Ok(count)
    }
}

impl SchemaProvider for MemorySchemaProvider {
    fn get(&self, plugin_identifier: &str, entity_name: &str) -> Option<Arc<DataDefinition>> {
        let key = EntityRef::new(plugin_identifier, entity_name);
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }
}

// ── YAML schema format ──

#[derive(Debug, Deserialize)]
struct SchemaFile {
    plugin: String,
    #[serde(default)]
    entities: BTreeMap<String, EntitySpec>,
}

#[derive(Debug, Deserialize)]
struct EntitySpec {
    #[serde(default)]
    fields: BTreeMap<String, FieldSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum FieldSpec {
    String {
        #[serde(default)]
        required: bool,
    },
    Text {
        #[serde(default)]
        required: bool,
    },
    Integer {
        #[serde(default)]
        required: bool,
    },
    Decimal {
        #[serde(default)]
        required: bool,
    },
    Boolean {
        #[serde(default)]
        required: bool,
    },
    BelongsTo {
        entity: String,
        #[serde(default)]
        plugin: Option<String>,
        #[serde(default)]
        required: bool,
    },
    HasMany {
        entity: String,
        #[serde(default)]
        plugin: Option<String>,
        #[serde(rename = "joinField")]
        join_field: String,
    },
}

impl FieldSpec {
    fn into_definition(self, name: String, plugin: &str) -> FieldDefinition {
        let target = |entity: String, target_plugin: Option<String>| {
            EntityRef::new(target_plugin.unwrap_or_else(|| plugin.to_string()), entity)
        };

        let (field_type, required) = match self {
            FieldSpec::String { required } => (FieldType::Scalar(ScalarType::String), required),
            FieldSpec::Text { required } => (FieldType::Scalar(ScalarType::Text), required),
            FieldSpec::Integer { required } => (FieldType::Scalar(ScalarType::Integer), required),
            FieldSpec::Decimal { required } => (FieldType::Scalar(ScalarType::Decimal), required),
            FieldSpec::Boolean { required } => (FieldType::Scalar(ScalarType::Boolean), required),
            FieldSpec::BelongsTo {
                entity,
                plugin: target_plugin,
                required,
            } => (
                FieldType::BelongsTo {
                    target: target(entity, target_plugin),
                },
                required,
            ),
            FieldSpec::HasMany {
                entity,
                plugin: target_plugin,
                join_field,
            } => (
                FieldType::HasMany {
                    target: target(entity, target_plugin),
                    join_field,
                },
                false,
            ),
        };

        let field = FieldDefinition::new(name, field_type);
        if required {
            field.required()
        } else {
            field
        }
    }
}
