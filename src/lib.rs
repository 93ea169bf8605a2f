//! Hierarchical item index
//!
//! A [`TreeStore`] holds flat records, each with an id and an optional parent
//! id, and answers lookups by id, by parent, and along ancestor and
//! descendant chains.

pub mod domain;
pub use domain::{
    BuildError, Category, Config, ConfigError, DuplicatePolicy, ItemId, Row, TreeItem, TreeStore,
};
