//! Priority-ordered, copy-on-write handler registry.
//!
//! Writers build a new list and swap it in under the lock; readers clone the
//! current `Arc` and scan without holding it. A scan therefore sees either
//! the list before or after a concurrent registration, never a partial one.

use std::sync::{Arc, PoisonError, RwLock};

use crate::rendering::domain::Priority;

/// A registered item with its priority.
#[derive(Debug, Clone)]
pub struct Prioritized<T> {
    /// The registered item.
    pub item: T,
    /// Its priority.
    pub priority: Priority,
}

/// Items ordered by priority descending, then by insertion order.
#[derive(Debug)]
pub struct PriorityRegistry<T> {
    entries: RwLock<Arc<Vec<Prioritized<T>>>>,
}

impl<T> Default for PriorityRegistry<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::new())),
        }
    }
}

impl<T: Clone> PriorityRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` after every entry of equal or higher priority.
    pub fn register(&self, item: T, priority: Priority) {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut entries = Vec::clone(&guard);
        let position = entries.partition_point(|entry| entry.priority >= priority);
        entries.insert(position, Prioritized { item, priority });
        *guard = Arc::new(entries);
    }

    /// Removes the first entry matching `predicate`.
    ///
    /// Returns `false` when nothing matched.
    #[must_use]
    pub fn remove_first(&self, predicate: impl Fn(&T) -> bool) -> bool {
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let Some(position) = guard.iter().position(|entry| predicate(&entry.item)) else {
            return false;
        };
        let mut entries = Vec::clone(&guard);
        entries.remove(position);
        *guard = Arc::new(entries);
        true
    }

    /// Returns the current ordered list.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<Prioritized<T>>> {
        Arc::clone(&self.entries.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the number of registered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}
