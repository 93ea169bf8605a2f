//! Flattened rows for tree-grid display.
//!
//! A grid that renders tree data wants each record decorated with where it
//! sits in the hierarchy. A [`Row`] carries the record, whether it is a
//! group or a leaf, and the ids from the root down to it.

use serde::Serialize;

use crate::domain::{ItemId, TreeItem, TreeStore};

/// Whether a row has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// The record has at least one child.
    Group,
    /// The record has no children.
    Element,
}

/// A record decorated for grid display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row<'a> {
    /// The underlying record.
    #[serde(flatten)]
    pub item: &'a TreeItem,
    /// Group or leaf.
    pub category: Category,
    /// Ids from the topmost stored ancestor down to this record.
    pub path: Vec<&'a ItemId>,
}

impl TreeStore {
    /// Returns one row per record, in insertion order.
    #[must_use]
    pub fn rows(&self) -> Vec<Row<'_>> {
        self.iter().map(|item| self.row_for(item)).collect()
    }

    /// Returns the row for a single record.
    #[must_use]
    pub fn row(&self, id: &ItemId) -> Option<Row<'_>> {
        self.get_item(id).map(|item| self.row_for(item))
    }

    fn row_for<'a>(&'a self, item: &'a TreeItem) -> Row<'a> {
        let category = if self.has_children(&item.id) {
            Category::Group
        } else {
            Category::Element
        };

        Row {
            item,
            category,
            path: self.path(&item.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TreeStore {
        TreeStore::new([
            TreeItem::root(1, "Item 1"),
            TreeItem::child("1234ew", 1, "Item 2"),
            TreeItem::child(3, 1, "Item 3"),
            TreeItem::child(4, "1234ew", "Item 4"),
        ])
    }

    #[test]
    fn categorises_groups_and_elements() {
        let store = store();
        let categories: Vec<Category> = store.rows().iter().map(|row| row.category).collect();

        assert_eq!(categories, vec![
            Category::Group,
            Category::Group,
            Category::Element,
            Category::Element
        ]);
    }

    #[test]
    fn row_path_matches_store_path() {
        let store = store();
        let row = store.row(&ItemId::from(4)).unwrap();

        assert_eq!(row.path, vec![
            &ItemId::from(1),
            &ItemId::from("1234ew"),
            &ItemId::from(4)
        ]);
        assert!(store.row(&ItemId::from(99)).is_none());
    }

    #[test]
    fn serializes_flat() {
        let store = TreeStore::new([
            TreeItem::root(1, "a").with_field("colour", "red"),
            TreeItem::child(2, 1, "b"),
        ]);

        let json = serde_json::to_value(store.rows()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"id": 1, "parent": null, "label": "a", "colour": "red", "category": "group", "path": [1]},
                {"id": 2, "parent": 1, "label": "b", "category": "element", "path": [1, 2]},
            ])
        );
    }
}
