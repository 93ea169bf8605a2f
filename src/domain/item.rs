use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ItemId;

/// A single record in a [`TreeStore`](crate::TreeStore).
///
/// Apart from `id` and `parent`, the store treats every field as opaque
/// payload and hands it back exactly as it was supplied. Fields beyond
/// `label` are kept in [`TreeItem::extra`] and flattened on (de)serialization,
/// so `{"id": 1, "parent": null, "label": "a", "colour": "red"}` round-trips
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeItem {
    /// Unique identifier of the record.
    pub id: ItemId,

    /// Identifier of the parent record, or `None` for a root.
    #[serde(default)]
    pub parent: Option<ItemId>,

    /// Display label.
    #[serde(default)]
    pub label: String,

    /// Any further caller-defined fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TreeItem {
    /// Creates a record with no extra payload.
    #[must_use]
    pub fn new(
        id: impl Into<ItemId>,
        parent: Option<ItemId>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent,
            label: label.into(),
            extra: Map::new(),
        }
    }

    /// Creates a root record.
    #[must_use]
    pub fn root(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        Self::new(id, None, label)
    }

    /// Creates a record under `parent`.
    #[must_use]
    pub fn child(
        id: impl Into<ItemId>,
        parent: impl Into<ItemId>,
        label: impl Into<String>,
    ) -> Self {
        Self::new(id, Some(parent.into()), label)
    }

    /// Attaches an extra payload field, replacing any previous value under
    /// the same key.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether this record has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
