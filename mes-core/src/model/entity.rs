//! Entity values
//!
//! An `Entity` is a detached value: field values plus the validation errors
//! reported by the last persistence attempt. Persisting never mutates the
//! caller's copy; `DataAccess::save` hands back a new value.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::schema::{EntityRef, FieldType, ScalarType};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    BelongsTo(Box<Entity>),
    HasMany(Vec<Entity>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Whether this value may be stored in a field of the given type.
    /// `Null` fits every type; required-ness is checked separately.
    pub fn fits(&self, field_type: &FieldType) -> bool {
        match (self, field_type) {
            (FieldValue::Null, _) => true,
            (FieldValue::String(_), FieldType::Scalar(ScalarType::String | ScalarType::Text)) => {
                true
            }
            (FieldValue::Integer(_), FieldType::Scalar(ScalarType::Integer)) => true,
            (FieldValue::Decimal(_), FieldType::Scalar(ScalarType::Decimal)) => true,
            (FieldValue::Boolean(_), FieldType::Scalar(ScalarType::Boolean)) => true,
            (FieldValue::BelongsTo(entity), FieldType::BelongsTo { target }) => {
                entity.data_definition() == target
            }
            (FieldValue::HasMany(entities), FieldType::HasMany { target, .. }) => {
                entities.iter().all(|e| e.data_definition() == target)
            }
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Entity> for FieldValue {
    fn from(value: Entity) -> Self {
        FieldValue::BelongsTo(Box::new(value))
    }
}

/// A validation message: translation key plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    message: String,
    vars: Vec<String>,
}

impl ErrorMessage {
    pub fn new<I, S>(message: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message: message.into(),
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn vars(&self) -> &[String] {
        &self.vars
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: Option<i64>,
    data_definition: EntityRef,
    fields: BTreeMap<String, FieldValue>,
    global_errors: Vec<ErrorMessage>,
    errors: BTreeMap<String, ErrorMessage>,
}

impl Entity {
    pub fn new(data_definition: EntityRef) -> Self {
        Self {
            id: None,
            data_definition,
            fields: BTreeMap::new(),
            global_errors: Vec::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn data_definition(&self) -> &EntityRef {
        &self.data_definition
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn string_field(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn integer_field(&self, name: &str) -> Option<i64> {
        match self.fields.get(name) {
            Some(FieldValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn boolean_field(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(FieldValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn belongs_to_field(&self, name: &str) -> Option<&Entity> {
        match self.fields.get(name) {
            Some(FieldValue::BelongsTo(entity)) => Some(entity),
            _ => None,
        }
    }

    pub fn has_many_field(&self, name: &str) -> &[Entity] {
        match self.fields.get(name) {
            Some(FieldValue::HasMany(entities)) => entities,
            _ => &[],
        }
    }

    pub fn add_global_error<I, S>(&mut self, message: impl Into<String>, vars: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_errors.push(ErrorMessage::new(message, vars));
    }

    pub fn add_error<I, S>(&mut self, field: impl Into<String>, message: impl Into<String>, vars: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors.insert(field.into(), ErrorMessage::new(message, vars));
    }

    pub fn global_errors(&self) -> &[ErrorMessage] {
        &self.global_errors
    }

    pub fn errors(&self) -> &BTreeMap<String, ErrorMessage> {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.global_errors.is_empty() && self.errors.is_empty()
    }
}
