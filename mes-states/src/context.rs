//! State change context
//!
//! Wraps one persisted state change record for the length of a transition.
//! Every write goes through [`DataAccess`]; a rejected write never replaces
//! the live record. Instead the live record is marked as failed and the
//! validation errors are handed to the message service.

use std::sync::Arc;

use mes_core::model::{DataAccess, Entity, FieldValue};
use tracing::{debug, warn};

use crate::describer::StateChangeEntityDescriber;
use crate::error::StateChangeError;
use crate::messages::{MessageContext, MessageService, StateMessageType};
use crate::status::StateChangeStatus;

pub struct StateChangeContext<D: StateChangeEntityDescriber> {
    describer: D,
    data_access: Arc<dyn DataAccess>,
    message_service: Arc<dyn MessageService>,
    /// The live record once `has_live_entity` is set.
    entity: Entity,
    has_live_entity: bool,
    owner_is_valid: bool,
}

impl<D: StateChangeEntityDescriber> StateChangeContext<D> {
    /// Persist `state_change` and wrap it.
    ///
    /// A rejected entity that was persisted before is reloaded and marked as
    /// failed. A rejected entity with no persisted version is refused with
    /// [`StateChangeError::NoValidPriorState`].
    pub fn new(
        state_change: Entity,
        describer: D,
        data_access: Arc<dyn DataAccess>,
        message_service: Arc<dyn MessageService>,
    ) -> Result<Self, StateChangeError> {
        let mut context = Self {
            describer,
            data_access,
            message_service,
            entity: state_change.clone(),
            has_live_entity: false,
            owner_is_valid: true,
        };
        context.set_state_change_entity(state_change)?;
        Ok(context)
    }

    pub fn save(&mut self) -> Result<(), StateChangeError> {
        let entity = self.entity.clone();
        self.set_state_change_entity(entity)
    }

    fn set_state_change_entity(&mut self, state_change: Entity) -> Result<(), StateChangeError> {
        let rejected = if state_change.is_valid() {
            let saved = self.data_access.save(state_change)?;
            if saved.is_valid() {
                debug!(
                    "Saved state change {} {:?}",
                    self.describer.data_definition(),
                    saved.id()
                );
                self.entity = saved;
                self.has_live_entity = true;
                return Ok(());
            }
            saved
        } else {
            state_change
        };
        self.mark_as_failure(rejected)
    }

    fn mark_as_failure(&mut self, rejected: Entity) -> Result<(), StateChangeError> {
        if !self.has_live_entity {
            let prior = match rejected.id() {
                Some(id) => self.data_access.get(self.describer.data_definition(), id)?,
                None => None,
            };
            let Some(prior) = prior else {
                return Err(StateChangeError::NoValidPriorState { id: rejected.id() });
            };
            self.entity = prior;
            self.has_live_entity = true;
        }

        warn!(
            "State change {} {:?} failed validation, marking as {}",
            self.describer.data_definition(),
            self.entity.id(),
            StateChangeStatus::Failure
        );
        self.assign_errors_from(&rejected);
        self.set_status(StateChangeStatus::Failure);

        let persisted = self.data_access.save(self.entity.clone())?;
        if persisted.is_valid() {
            self.entity = persisted;
        } else {
            warn!(
                "Could not persist failure status of state change {:?}",
                self.entity.id()
            );
        }
        Ok(())
    }

    /// Validate, persist and link the owner. Once an owner fails validation
    /// every later call does nothing.
    pub fn set_owner(&mut self, owner: Entity) -> Result<(), StateChangeError> {
        if !self.owner_is_valid {
            debug!("Ignoring owner for state change {:?}: owner already rejected", self.entity.id());
            return Ok(());
        }

        let mut is_valid = self.check_valid(&owner);
        if is_valid {
            let saved = self.data_access.save(owner)?;
            is_valid = self.check_valid(&saved);
            if is_valid {
                let field = self.describer.owner_field_name().to_string();
                self.entity.set_field(field, saved);
            }
        }
        self.owner_is_valid = is_valid;
        self.save()
    }

    /// Whether `entity` is valid. An invalid entity's errors become messages
    /// and the state change is marked as failed.
    fn check_valid(&mut self, entity: &Entity) -> bool {
        if entity.is_valid() {
            return true;
        }
        self.assign_errors_from(entity);
        self.set_status(StateChangeStatus::Failure);
        false
    }

    fn assign_errors_from(&self, entity: &Entity) {
        for error in entity.global_errors() {
            let vars: Vec<&str> = error.vars().iter().map(String::as_str).collect();
            self.add_validation_error(error.message(), &vars);
        }
        for (field, error) in entity.errors() {
            let vars: Vec<&str> = error.vars().iter().map(String::as_str).collect();
            self.add_field_validation_error(field, error.message(), &vars);
        }
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.entity.set_field(field, value);
    }

    pub fn state_enum_value(&self, field: &str) -> Result<D::State, StateChangeError> {
        let value = self.entity.string_field(field).unwrap_or_default();
        self.describer
            .parse_state(value)
            .ok_or_else(|| StateChangeError::UnknownState {
                field: field.to_string(),
                value: value.to_string(),
            })
    }

    /// Current phase; 0 when unset or not an integer.
    pub fn phase(&self) -> i64 {
        self.entity
            .integer_field(self.describer.phase_field_name())
            .unwrap_or(0)
    }

    pub fn set_phase(&mut self, phase: i64) {
        let field = self.describer.phase_field_name().to_string();
        self.set_field(field, phase);
    }

    pub fn status(&self) -> Result<StateChangeStatus, StateChangeError> {
        self.entity
            .string_field(self.describer.status_field_name())
            .unwrap_or_default()
            .parse()
    }

    pub fn set_status(&mut self, status: StateChangeStatus) {
        let field = self.describer.status_field_name().to_string();
        self.set_field(field, status.as_str());
    }

    pub fn owner(&self) -> Option<&Entity> {
        self.entity
            .belongs_to_field(self.describer.owner_field_name())
    }

    /// Message records attached to the state change entity.
    pub fn all_messages(&self) -> &[Entity] {
        self.entity
            .has_many_field(self.describer.messages_field_name())
    }

    pub fn message_context(&self) -> MessageContext {
        MessageContext {
            data_definition: self.describer.data_definition().clone(),
            state_change_id: self.entity.id(),
        }
    }

    pub fn add_message(&self, translation_key: &str, message_type: StateMessageType, args: &[&str]) {
        self.message_service
            .add_message(&self.message_context(), message_type, None, translation_key, args);
    }

    pub fn add_field_message(
        &self,
        translation_key: &str,
        message_type: StateMessageType,
        field: &str,
        args: &[&str],
    ) {
        self.message_service.add_message(
            &self.message_context(),
            message_type,
            Some(field),
            translation_key,
            args,
        );
    }

    pub fn add_validation_error(&self, translation_key: &str, args: &[&str]) {
        self.message_service
            .add_validation_error(&self.message_context(), None, translation_key, args);
    }

    pub fn add_field_validation_error(&self, field: &str, translation_key: &str, args: &[&str]) {
        self.message_service.add_validation_error(
            &self.message_context(),
            Some(field),
            translation_key,
            args,
        );
    }

    pub fn message_service(&self) -> &Arc<dyn MessageService> {
        &self.message_service
    }

    pub fn describer(&self) -> &D {
        &self.describer
    }

    pub fn state_change_entity(&self) -> &Entity {
        &self.entity
    }
}
