//! Entity persistence seam
//!
//! `DataAccess` is the boundary to the persistence engine. `MemoryDataAccess`
//! is the in-memory implementation used by tests and tooling: it validates an
//! entity against its schema and keeps accepted rows in a locked map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, Result};
use tracing::debug;

use super::entity::Entity;
use super::schema::{DataDefinition, EntityRef, SchemaProvider};

pub const ERROR_MISSING: &str = "qcadoo.validate.field.error.missing";
pub const ERROR_INVALID_TYPE: &str = "qcadoo.validate.field.error.invalidType";
pub const ERROR_UNKNOWN_FIELD: &str = "qcadoo.validate.global.error.unknownField";

/// Persistence operations consumed by the state-change machinery.
pub trait DataAccess: Send + Sync {
    /// Validate and persist. A rejected entity comes back carrying its
    /// validation errors and without a newly assigned id.
    fn save(&self, entity: Entity) -> Result<Entity>;

    fn get(&self, data_definition: &EntityRef, id: i64) -> Result<Option<Entity>>;
}

#[derive(Default)]
struct Tables {
    rows: HashMap<(EntityRef, i64), Entity>,
    next_id: i64,
    save_attempts: HashMap<EntityRef, usize>,
}

pub struct MemoryDataAccess {
    schemas: Arc<dyn SchemaProvider>,
    inner: Mutex<Tables>,
}

impl MemoryDataAccess {
    pub fn new(schemas: Arc<dyn SchemaProvider>) -> Self {
        Self {
            schemas,
            inner: Mutex::new(Tables::default()),
        }
    }

    /// Number of `save` calls made for the given data definition,
    /// accepted or not.
    pub fn save_attempts(&self, data_definition: &EntityRef) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .save_attempts
            .get(data_definition)
            .copied()
            .unwrap_or(0)
    }

    pub fn row_count(&self, data_definition: &EntityRef) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .keys()
            .filter(|(dd, _)| dd == data_definition)
            .count()
    }
}

impl DataAccess for MemoryDataAccess {
    fn save(&self, mut entity: Entity) -> Result<Entity> {
        let schema = self
            .schemas
            .resolve(entity.data_definition())
            .ok_or_else(|| anyhow!("Unknown data definition {}", entity.data_definition()))?;

        let mut tables = self.inner.lock().map_err(|e| anyhow!("Lock: {}", e))?;
        *tables
            .save_attempts
            .entry(entity.data_definition().clone())
            .or_default() += 1;

        // An entity that already carries errors is never written.
        if entity.is_valid() {
            validate(&schema, &mut entity);
        }
        if !entity.is_valid() {
            debug!(
                "Rejected {} {:?}: {} field errors, {} global errors",
                entity.data_definition(),
                entity.id(),
                entity.errors().len(),
                entity.global_errors().len()
            );
            return Ok(entity);
        }

        let id = match entity.id() {
            Some(id) => id,
            None => {
                tables.next_id += 1;
                tables.next_id
            }
        };
        entity.set_id(id);
        tables
            .rows
            .insert((entity.data_definition().clone(), id), entity.clone());
        Ok(entity)
    }

    fn get(&self, data_definition: &EntityRef, id: i64) -> Result<Option<Entity>> {
        let tables = self.inner.lock().map_err(|e| anyhow!("Lock: {}", e))?;
        Ok(tables.rows.get(&(data_definition.clone(), id)).cloned())
    }
}

fn validate(schema: &DataDefinition, entity: &mut Entity) {
    let mut field_errors = Vec::new();
    for field in schema.fields() {
        match entity.field(field.name()) {
            None if field.is_required() => field_errors.push((field.name(), ERROR_MISSING)),
            Some(value) if value.is_null() && field.is_required() => {
                field_errors.push((field.name(), ERROR_MISSING))
            }
            Some(value) if !value.fits(field.field_type()) => {
                field_errors.push((field.name(), ERROR_INVALID_TYPE))
            }
            _ => {}
        }
    }

    let unknown: Vec<String> = entity
        .fields()
        .filter(|(name, _)| schema.field(name).is_none())
        .map(|(name, _)| name.to_string())
        .collect();

    for (field, message) in field_errors {
        entity.add_error(field, message, Vec::<String>::new());
    }
    for name in unknown {
        entity.add_global_error(ERROR_UNKNOWN_FIELD, [name]);
    }
}
