//! Entity model: schemas, entity values and the persistence seam.

pub mod data_access;
pub mod entity;
pub mod schema;

pub use data_access::{DataAccess, MemoryDataAccess};
pub use entity::{Entity, ErrorMessage, FieldValue};
pub use schema::{
    DataDefinition, EntityRef, FieldDefinition, FieldType, MemorySchemaProvider, ScalarType,
    SchemaProvider,
};
