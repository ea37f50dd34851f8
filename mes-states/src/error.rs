use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateChangeError {
    /// A state change entity was rejected and there is no persisted version
    /// to mark as failed. Callers must only build contexts from entities
    /// that are valid or were saved before.
    #[error("State change entity {id:?} has validation errors and no valid persisted version")]
    NoValidPriorState { id: Option<i64> },

    #[error("Unknown state change status '{0}'")]
    UnknownStatus(String),

    #[error("Unknown state message type '{0}'")]
    UnknownMessageType(String),

    #[error("Unknown state '{value}' in field '{field}'")]
    UnknownState { field: String, value: String },

    #[error("Data definition '{entity}' is not registered")]
    UnknownDataDefinition { entity: String },

    #[error("Entity '{entity}' has no field '{field}' required by its describer")]
    MissingDescribedField { entity: String, field: String },

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}
