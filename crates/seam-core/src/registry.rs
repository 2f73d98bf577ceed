//! Index-addressed object registry
//!
//! Objects handed across the boundary are never raw pointers into the
//! other side's memory; each side keeps its live objects in an arena keyed
//! by an opaque `i64` index and hands out only the index. [`Registry`] is
//! the native side of that arena: insert on create, dispatch under a read
//! lock, remove on release. Release is the only deallocation trigger;
//! there is no timeout-based collection of unreleased entries.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::error::{Error, Result};

/// A table of live objects addressed by opaque index.
///
/// Mutations (insert on create, remove on release) are serialized through
/// the inner locks so concurrent native threads can create and release
/// handles safely. An index is never handed out twice while its entry is
/// live; the counter wraps at `i64::MAX`.
pub struct Registry<T> {
    entries: RwLock<HashMap<i64, T>>,
    next_index: Mutex<i64>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Registry {
            entries: RwLock::new(HashMap::new()),
            next_index: Mutex::new(0),
        }
    }

    /// Register an object and return the index that now addresses it
    pub fn insert(&self, value: T) -> i64 {
        let index = {
            let mut next = self.next_index.lock().unwrap();
            // Wrap rather than overflow; an index this old has long been
            // released.
            if *next == i64::MAX {
                *next = 0;
            } else {
                *next += 1;
            }
            *next
        };

        self.entries.write().unwrap().insert(index, value);
        index
    }

    /// Dispatch against the live object under `index`.
    ///
    /// The closure runs under the read lock, matching the synchronous
    /// call/return discipline of the boundary: the invocation completes
    /// before the call site proceeds.
    pub fn with<R>(&self, index: i64, f: impl FnOnce(&T) -> R) -> Result<R> {
        let entries = self.entries.read().unwrap();
        match entries.get(&index) {
            Some(value) => Ok(f(value)),
            None => Err(Error::UnknownHandle { index }),
        }
    }

    /// Remove the entry under `index`, releasing the object.
    ///
    /// Returns the object so the caller decides how it is dropped. Removing
    /// an index twice yields `None` the second time, which keeps a stray
    /// double-release from touching another entry.
    pub fn remove(&self, index: i64) -> Option<T> {
        let removed = self.entries.write().unwrap().remove(&index);
        if removed.is_none() {
            log::debug!("release of index {index} found no live entry");
        }
        removed
    }

    pub fn contains(&self, index: i64) -> bool {
        self.entries.read().unwrap().contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
