//! In-memory catalog cache.
//!
//! Every write path funnels through [`Collection::apply`], so the optimistic
//! patching after a create/update/delete is one reducer instead of ad hoc
//! vector splicing at each call site.

use serde::Serialize;
use uuid::Uuid;

/// Anything stored in a [`Collection`] is addressed by its id
pub trait Identified {
    fn id(&self) -> Uuid;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEvent<T> {
    /// Append a freshly created item
    Created(T),
    /// Replace the item with the same id
    Updated(T),
    /// Remove the item with this id
    Deleted(Uuid),
    /// Swap the whole content after a read-refresh
    Replaced(Vec<T>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Collection<T> {
    items: Vec<T>,
    version: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            version: 0,
        }
    }
}

impl<T: Identified> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, version: 0 }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Bumped on every effective change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Applies one event. Returns whether the collection changed; an update
    /// or delete for an unknown id is a no-op.
    pub fn apply(&mut self, event: CollectionEvent<T>) -> bool {
        let changed = match event {
            CollectionEvent::Created(item) => {
                self.items.push(item);
                true
            }
            CollectionEvent::Updated(item) => {
                let id = item.id();
                match self.items.iter_mut().find(|existing| existing.id() == id) {
                    Some(slot) => {
                        *slot = item;
                        true
                    }
                    None => false,
                }
            }
            CollectionEvent::Deleted(id) => {
                let before = self.items.len();
                self.items.retain(|item| item.id() != id);
                self.items.len() != before
            }
            CollectionEvent::Replaced(items) => {
                self.items = items;
                true
            }
        };

        if changed {
            self.version += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: Uuid,
        label: &'static str,
    }

    impl Identified for Row {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    #[test]
    fn test_created_appends_and_bumps_version() {
        let mut collection = Collection::default();
        let row = Row {
            id: Uuid::new_v4(),
            label: "P1",
        };

        assert!(collection.apply(CollectionEvent::Created(row.clone())));
        assert_eq!(collection.items(), &[row]);
        assert_eq!(collection.version(), 1);
    }

    #[test]
    fn test_updated_replaces_in_place() {
        let first = Row {
            id: Uuid::new_v4(),
            label: "P1",
        };
        let second = Row {
            id: Uuid::new_v4(),
            label: "P2",
        };
        let mut collection = Collection::new(vec![first.clone(), second.clone()]);

        let renamed = Row {
            label: "P1-renamed",
            ..first
        };
        assert!(collection.apply(CollectionEvent::Updated(renamed.clone())));
        assert_eq!(collection.items(), &[renamed, second]);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut collection: Collection<Row> = Collection::default();
        assert!(!collection.apply(CollectionEvent::Deleted(Uuid::new_v4())));
        assert!(!collection.apply(CollectionEvent::Updated(Row {
            id: Uuid::new_v4(),
            label: "ghost",
        })));
        assert_eq!(collection.version(), 0);
    }

    #[test]
    fn test_deleted_removes_by_id() {
        let row = Row {
            id: Uuid::new_v4(),
            label: "P1",
        };
        let mut collection = Collection::new(vec![row.clone()]);
        assert!(collection.apply(CollectionEvent::Deleted(row.id)));
        assert!(collection.is_empty());
    }
}
