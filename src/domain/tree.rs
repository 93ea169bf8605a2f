//! In-memory hierarchical index of [`TreeItem`]s.
//!
//! The [`TreeStore`] knows nothing about files or rendering. It owns a flat
//! set of records and keeps a derived children index in step with it, so
//! that lookups by id and by parent are both cheap.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use petgraph::{
    algo::{is_cyclic_directed, tarjan_scc},
    graphmap::DiGraphMap,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::domain::{DuplicatePolicy, ItemId, TreeItem};

/// An index over a forest of [`TreeItem`]s.
///
/// Storage is split in two:
/// - Records: `IndexMap<ItemId, TreeItem>`, the sole owner of every record,
///   kept in insertion order.
/// - Children: `HashMap<ItemId, Vec<ItemId>>`, keyed by parent id, listing
///   child ids in the order they were registered.
///
/// Every mutation updates both maps together. A child list is never left
/// empty; removing the last child of a key removes the key.
///
/// Parent ids are not checked against the store. A record whose parent is
/// missing is an *orphan*: it is still listed under its parent key and shows
/// up in [`TreeStore::orphans`].
///
/// # Cycles
///
/// The store assumes an acyclic forest. [`TreeStore::get_all_children`] and
/// [`TreeStore::get_all_parents`] do not terminate if the parent links form a
/// cycle. Use [`TreeStore::has_cycles`] to check untrusted input first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TreeStore {
    /// Records keyed by id, in insertion order.
    items: IndexMap<ItemId, TreeItem>,

    /// Child ids keyed by parent id.
    children: HashMap<ItemId, Vec<ItemId>>,
}

/// Errors that can occur when building a [`TreeStore`] strictly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The input contained the same id more than once.
    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),
}

impl TreeStore {
    /// Creates an empty store with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: IndexMap::with_capacity(capacity),
            children: HashMap::with_capacity(capacity),
        }
    }

    /// Builds a store from records, in order.
    ///
    /// If an id occurs more than once, the later record replaces the earlier
    /// one. The replacement keeps the earlier record's position in
    /// [`TreeStore::get_all`], and the earlier record is detached from its
    /// parent's child list before the new one is registered.
    #[must_use]
    #[instrument(skip_all)]
    pub fn new(items: impl IntoIterator<Item = TreeItem>) -> Self {
        let items = items.into_iter();
        let mut store = Self::with_capacity(items.size_hint().0);

        for item in items {
            store.upsert(item);
        }

        debug!(len = store.len(), "built tree store");
        store
    }

    /// Builds a store from records, in order, rejecting repeated ids.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateId`] for the first id that occurs more
    /// than once.
    #[instrument(skip_all)]
    pub fn try_new(items: impl IntoIterator<Item = TreeItem>) -> Result<Self, BuildError> {
        let items = items.into_iter();
        let mut store = Self::with_capacity(items.size_hint().0);

        for item in items {
            if store.contains(&item.id) {
                return Err(BuildError::DuplicateId(item.id));
            }
            store.insert_new(item);
        }

        debug!(len = store.len(), "built tree store");
        Ok(store)
    }

    /// Builds a store, handling repeated ids according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateId`] if `policy` is
    /// [`DuplicatePolicy::Reject`] and an id occurs more than once.
    pub fn build(
        items: impl IntoIterator<Item = TreeItem>,
        policy: DuplicatePolicy,
    ) -> Result<Self, BuildError> {
        match policy {
            DuplicatePolicy::Replace => Ok(Self::new(items)),
            DuplicatePolicy::Reject => Self::try_new(items),
        }
    }

    /// The number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a record with this id exists.
    ///
    /// Unlike [`TreeStore::get_children`], this distinguishes an unknown id
    /// from a known id without children.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Returns every record, in insertion order.
    ///
    /// The returned references borrow the store, so it cannot be mutated
    /// while they are alive.
    #[must_use]
    pub fn get_all(&self) -> Vec<&TreeItem> {
        self.items.values().collect()
    }

    /// Returns an iterator over every record, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeItem> + '_ {
        self.items.values()
    }

    /// Consumes the store, returning the records in insertion order.
    #[must_use]
    pub fn into_items(self) -> Vec<TreeItem> {
        self.items.into_values().collect()
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get_item(&self, id: &ItemId) -> Option<&TreeItem> {
        self.items.get(id)
    }

    /// Returns the direct children of `id`, in registration order.
    ///
    /// Empty both when `id` has no children and when `id` is unknown.
    #[must_use]
    pub fn get_children(&self, id: &ItemId) -> Vec<&TreeItem> {
        self.children(id).collect()
    }

    /// Returns an iterator over the direct children of `id`.
    pub fn children(&self, id: &ItemId) -> impl Iterator<Item = &TreeItem> + '_ {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.items.get(child))
    }

    /// Whether any record lists `id` as its parent.
    #[must_use]
    pub fn has_children(&self, id: &ItemId) -> bool {
        self.children.contains_key(id)
    }

    /// Returns every descendant of `id`.
    ///
    /// The walk uses an explicit stack seeded with the direct children: each
    /// popped record is emitted and its own children pushed. The order is
    /// therefore deterministic but neither breadth-first nor pre-order.
    #[must_use]
    pub fn get_all_children(&self, id: &ItemId) -> Vec<&TreeItem> {
        let mut result = Vec::new();
        let mut stack = self.get_children(id);

        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(self.children(&node.id));
        }

        result
    }

    /// Returns the ancestors of `id`, nearest first, ending at the root.
    ///
    /// Empty when `id` is unknown, is a root, or its parent is not stored.
    /// The chain stops at the first ancestor whose parent is not stored.
    #[must_use]
    pub fn get_all_parents(&self, id: &ItemId) -> Vec<&TreeItem> {
        let mut result = Vec::new();
        let mut current = self.get_item(id).and_then(|item| self.parent_of(item));

        while let Some(item) = current {
            result.push(item);
            current = self.parent_of(item);
        }

        result
    }

    /// Returns the ids from the topmost stored ancestor down to `id`
    /// inclusive.
    ///
    /// Empty when `id` is unknown.
    #[must_use]
    pub fn path(&self, id: &ItemId) -> Vec<&ItemId> {
        let Some(item) = self.get_item(id) else {
            return Vec::new();
        };

        let mut path: Vec<&ItemId> = self
            .get_all_parents(id)
            .into_iter()
            .map(|ancestor| &ancestor.id)
            .collect();
        path.reverse();
        path.push(&item.id);
        path
    }

    /// Returns an iterator over the records with no parent.
    pub fn roots(&self) -> impl Iterator<Item = &TreeItem> + '_ {
        self.items.values().filter(|item| item.is_root())
    }

    /// Returns an iterator over the records whose parent is not stored.
    pub fn orphans(&self) -> impl Iterator<Item = &TreeItem> + '_ {
        self.items.values().filter(|item| {
            item.parent
                .as_ref()
                .is_some_and(|parent| !self.items.contains_key(parent))
        })
    }

    /// Inserts a new record.
    ///
    /// Returns `false`, leaving the store untouched, if a record with the
    /// same id already exists.
    #[instrument(level = "debug", skip_all, fields(id = %item.id))]
    pub fn add_item(&mut self, item: TreeItem) -> bool {
        if self.contains(&item.id) {
            debug!("id already present");
            return false;
        }

        self.insert_new(item);
        true
    }

    /// Removes a record together with all of its descendants.
    ///
    /// Returns `false`, leaving the store untouched, if `id` is unknown.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        self.remove_subtree(id).is_some()
    }

    /// Removes a record together with all of its descendants and returns
    /// them, the record itself first and then the descendants in
    /// [`TreeStore::get_all_children`] order.
    ///
    /// Descendants are dropped, not re-parented. Returns `None` if `id` is
    /// unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, id: &ItemId) -> Option<Vec<TreeItem>> {
        let parent = self.items.get(id)?.parent.clone();

        if let Some(parent) = &parent {
            self.detach(parent, id);
        }

        let doomed: Vec<ItemId> = std::iter::once(id.clone())
            .chain(
                self.get_all_children(id)
                    .into_iter()
                    .map(|descendant| descendant.id.clone()),
            )
            .collect();

        for key in &doomed {
            self.children.remove(key);
        }

        let doomed_set: HashSet<&ItemId> = doomed.iter().collect();
        let items = std::mem::take(&mut self.items);
        self.items
            .reserve(items.len().saturating_sub(doomed_set.len()));

        let mut removed = HashMap::with_capacity(doomed_set.len());
        for (key, item) in items {
            if doomed_set.contains(&key) {
                removed.insert(key, item);
            } else {
                self.items.insert(key, item);
            }
        }

        debug!(removed = removed.len(), "removed subtree");

        Some(
            doomed
                .iter()
                .filter_map(|key| removed.remove(key))
                .collect(),
        )
    }

    /// Whether the parent links of stored records contain a cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.link_graph())
    }

    /// Returns every cycle formed by parent links, as sorted sets of ids.
    ///
    /// A record that is its own parent forms a single-element cycle.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<ItemId>> {
        let graph = self.link_graph();
        let mut cycles = Vec::new();

        for component in tarjan_scc(&graph) {
            if component.len() > 1 {
                let mut ids: Vec<ItemId> = component.into_iter().cloned().collect();
                ids.sort();
                cycles.push(ids);
                continue;
            }

            let Some(&node) = component.first() else {
                continue;
            };

            if graph.contains_edge(node, node) {
                cycles.push(vec![node.clone()]);
            }
        }

        cycles.sort();
        cycles
    }
}

impl TreeStore {
    fn parent_of(&self, item: &TreeItem) -> Option<&TreeItem> {
        item.parent.as_ref().and_then(|parent| self.items.get(parent))
    }

    fn insert_new(&mut self, item: TreeItem) {
        self.register_child(&item);
        self.items.insert(item.id.clone(), item);
    }

    fn upsert(&mut self, item: TreeItem) {
        let Some(index) = self.items.get_index_of(&item.id) else {
            self.insert_new(item);
            return;
        };

        warn!(id = %item.id, "duplicate id, replacing earlier record");

        if let Some(previous_parent) = self.items[index].parent.clone() {
            self.detach(&previous_parent, &item.id);
        }
        self.register_child(&item);
        self.items[index] = item;
    }

    fn register_child(&mut self, item: &TreeItem) {
        if let Some(parent) = &item.parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(item.id.clone());
        }
    }

    /// Removes `id` from the child list of `parent`, dropping the list if it
    /// becomes empty.
    fn detach(&mut self, parent: &ItemId, id: &ItemId) {
        let Some(siblings) = self.children.get_mut(parent) else {
            return;
        };

        siblings.retain(|child| child != id);

        if siblings.is_empty() {
            debug!(%parent, "last child detached, dropping child list");
            self.children.remove(parent);
        }
    }

    /// Parent links as a graph. Nodes are ids, edges point from child to
    /// parent. Links to parents that are not stored are left out.
    fn link_graph(&self) -> DiGraphMap<&ItemId, ()> {
        let mut graph = DiGraphMap::with_capacity(self.items.len(), self.items.len());

        for (id, item) in &self.items {
            graph.add_node(id);

            let parent = item
                .parent
                .as_ref()
                .and_then(|parent| self.items.get_key_value(parent));
            if let Some((parent, _)) = parent {
                graph.add_edge(id, parent, ());
            }
        }

        graph
    }
}

impl FromIterator<TreeItem> for TreeStore {
    fn from_iter<T: IntoIterator<Item = TreeItem>>(iter: T) -> Self {
        Self::new(iter)
    }
}
