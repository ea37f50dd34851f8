//! MES core
//!
//! View definitions for the MES plugin platform: an XML screen description is
//! parsed into an immutable component tree bound to entity schemas, with
//! cross-component data dependencies and lifecycle hooks resolved at parse
//! time. Also home to the entity model shared with the state-change crate.

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod view;

pub use config::MesConfig;
pub use error::ViewError;
pub use loader::{LoadReport, ViewLoader};
