//! Describers tell the state-change machinery where a plugin keeps its state
//! change records and which fields hold what.

use std::fmt::Debug;

use mes_core::model::{EntityRef, SchemaProvider};

use crate::error::StateChangeError;

/// A plugin's state enumeration, stored as a string code.
pub trait StateEnum: Copy + Eq + Debug {
    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self>;
}

pub trait StateChangeEntityDescriber: Send + Sync {
    type State: StateEnum;

    /// Data definition of the state change records.
    fn data_definition(&self) -> &EntityRef;

    /// Data definition of the entity whose state changes.
    fn owner_data_definition(&self) -> &EntityRef;

    fn owner_field_name(&self) -> &str;

    fn status_field_name(&self) -> &str {
        "status"
    }

    fn phase_field_name(&self) -> &str {
        "phase"
    }

    fn messages_field_name(&self) -> &str {
        "messages"
    }

    fn source_state_field_name(&self) -> &str {
        "sourceState"
    }

    fn target_state_field_name(&self) -> &str {
        "targetState"
    }

    fn parse_state(&self, value: &str) -> Option<Self::State> {
        Self::State::parse(value)
    }

    /// Verify the state change schema declares every described field.
    fn check_fields(&self, schemas: &dyn SchemaProvider) -> Result<(), StateChangeError> {
        let entity = self.data_definition();
        let missing = |field: &str| StateChangeError::MissingDescribedField {
            entity: entity.to_string(),
            field: field.to_string(),
        };

        let schema = schemas
            .resolve(entity)
            .ok_or_else(|| StateChangeError::UnknownDataDefinition {
                entity: entity.to_string(),
            })?;
        for field in [
            self.owner_field_name(),
            self.status_field_name(),
            self.phase_field_name(),
            self.messages_field_name(),
            self.source_state_field_name(),
            self.target_state_field_name(),
        ] {
            if schema.field(field).is_none() {
                return Err(missing(field));
            }
        }
        Ok(())
    }
}
