//! MES states
//!
//! Shared machinery for plugins whose entities move through a state machine
//! (orders, technologies, inventory corrections). A transition is recorded as
//! a state change entity; [`StateChangeContext`] drives that entity through
//! validation, owner assignment and failure marking.

pub mod context;
pub mod describer;
pub mod error;
pub mod messages;
pub mod status;

pub use context::StateChangeContext;
pub use describer::{StateChangeEntityDescriber, StateEnum};
pub use error::StateChangeError;
pub use messages::{
    MemoryMessageService, MessageContext, MessageService, StateMessage, StateMessageType,
};
pub use status::StateChangeStatus;
