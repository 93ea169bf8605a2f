//! Domain models for the hierarchical item index.
//!
//! This module contains the record and identifier types, the [`TreeStore`]
//! index itself, grid-row derivation, and configuration.

mod config;
pub use config::{Config, ConfigError, DuplicatePolicy};

mod id;
pub use id::ItemId;

mod item;
pub use item::TreeItem;

/// Grid rows derived from a [`TreeStore`].
pub mod rows;
pub use rows::{Category, Row};

/// The [`TreeStore`] index.
pub mod tree;
pub use tree::{BuildError, TreeStore};
