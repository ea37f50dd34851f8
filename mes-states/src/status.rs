//! State change status
//!
//! Stored on the state change entity as a string code whose numeric prefix
//! keeps the codes sortable.

use std::fmt;
use std::str::FromStr;

use crate::error::StateChangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChangeStatus {
    InProgress,
    Paused,
    Successful,
    Failure,
    Canceled,
}

impl StateChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "01inProgress",
            Self::Paused => "02paused",
            Self::Successful => "03successful",
            Self::Failure => "04failure",
            Self::Canceled => "05canceled",
        }
    }

    /// Whether no further transition work happens for this state change.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Successful | Self::Failure | Self::Canceled)
    }
}

impl FromStr for StateChangeStatus {
    type Err = StateChangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "01inProgress" => Ok(Self::InProgress),
            "02paused" => Ok(Self::Paused),
            "03successful" => Ok(Self::Successful),
            "04failure" => Ok(Self::Failure),
            "05canceled" => Ok(Self::Canceled),
            _ => Err(StateChangeError::UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for StateChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
