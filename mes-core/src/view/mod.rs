//! View definitions: parsing XML screen descriptions into component trees.

mod builder;
pub mod component;
pub mod definition;
pub mod hooks;
pub mod parser;
mod resolver;
pub mod store;
mod xml;

pub use component::{
    AggregationMode, Column, Component, ComponentId, ComponentKind, Grid, OptionValue,
};
pub use definition::ViewDefinition;
pub use hooks::{HookContext, HookDefinition, HookHandler, HookRegistry};
pub use parser::ViewDefinitionParser;
pub use store::{MemoryViewStore, ViewStore};
