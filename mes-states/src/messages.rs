//! State change messages
//!
//! Messages are stored as translation keys plus arguments and formatted by
//! whoever displays them.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use mes_core::model::EntityRef;
use tracing::debug;

use crate::error::StateChangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateMessageType {
    Failure,
    Success,
    Info,
    ValidationError,
}

impl StateMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failure => "01failure",
            Self::Success => "02success",
            Self::Info => "03info",
            Self::ValidationError => "04validationError",
        }
    }
}

impl FromStr for StateMessageType {
    type Err = StateChangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "01failure" => Ok(Self::Failure),
            "02success" => Ok(Self::Success),
            "03info" => Ok(Self::Info),
            "04validationError" => Ok(Self::ValidationError),
            _ => Err(StateChangeError::UnknownMessageType(s.to_string())),
        }
    }
}

impl fmt::Display for StateMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the state change a message belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageContext {
    pub data_definition: EntityRef,
    /// Absent while the state change was never persisted.
    pub state_change_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMessage {
    pub context: MessageContext,
    pub message_type: StateMessageType,
    pub field: Option<String>,
    pub translation_key: String,
    pub translation_args: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub trait MessageService: Send + Sync {
    fn add_message(
        &self,
        context: &MessageContext,
        message_type: StateMessageType,
        field: Option<&str>,
        translation_key: &str,
        translation_args: &[&str],
    );

    fn add_validation_error(
        &self,
        context: &MessageContext,
        field: Option<&str>,
        translation_key: &str,
        translation_args: &[&str],
    ) {
        self.add_message(
            context,
            StateMessageType::ValidationError,
            field,
            translation_key,
            translation_args,
        );
    }

    /// Messages recorded for `context`, oldest first.
    fn messages(&self, context: &MessageContext) -> Vec<StateMessage>;
}

#[derive(Default)]
pub struct MemoryMessageService {
    messages: Mutex<Vec<StateMessage>>,
}

impl MemoryMessageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<StateMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MessageService for MemoryMessageService {
    fn add_message(
        &self,
        context: &MessageContext,
        message_type: StateMessageType,
        field: Option<&str>,
        translation_key: &str,
        translation_args: &[&str],
    ) {
        debug!(
            "{} message for {} {:?}: {}",
            message_type, context.data_definition, context.state_change_id, translation_key
        );
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StateMessage {
                context: context.clone(),
                message_type,
                field: field.map(str::to_string),
                translation_key: translation_key.to_string(),
                translation_args: translation_args.iter().map(|arg| arg.to_string()).collect(),
                created_at: Utc::now(),
            });
    }

    fn messages(&self, context: &MessageContext) -> Vec<StateMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|message| &message.context == context)
            .cloned()
            .collect()
    }
}
