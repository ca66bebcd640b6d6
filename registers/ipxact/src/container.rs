// Licensed under the Apache-2.0 license

//! Name-keyed collection that keeps its elements in a per-kind order.
//!
//! Every entity in the register model owns its children through a
//! [`Container`]. Lookups go through the name key; traversal follows the
//! element order, which is re-established with the container's comparator
//! after every insertion. Sorting is stable, so elements that compare equal
//! keep their first-seen insertion order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Comparator used to order the elements of a [`Container`].
pub type Order<T> = fn(&T, &T) -> Ordering;

/// Comparator that keeps insertion order.
pub fn insertion_order<T>(_: &T, _: &T) -> Ordering {
    Ordering::Equal
}

#[derive(Clone)]
pub struct Container<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
    order: Order<T>,
}

impl<T> Container<T> {
    pub fn new(order: Order<T>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            order,
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Mutable access by name.
    ///
    /// Changing the value that the comparator looks at leaves the container
    /// unsorted until [`Container::sort`] is called.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Insert `value` under `name`, replacing any element already stored
    /// under that key, then re-sort.
    pub fn set(&mut self, name: &str, value: T) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self.sort();
    }

    /// Return the element stored under `name`, inserting `make()` first if
    /// there is none. The flag is true when the element already existed.
    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> T) -> (&mut T, bool) {
        let existed = self.contains(name);
        if !existed {
            self.set(name, make());
        }
        let i = self.index[name];
        (&mut self.entries[i].1, existed)
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let i = self.index.remove(name)?;
        let (_, value) = self.entries.remove(i);
        self.reindex();
        Some(value)
    }

    /// Move the element stored under `from` to the key `to`.
    ///
    /// Returns false when there is no element under `from` or when `to` is
    /// already used by a different element.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.contains(from);
        }
        if self.contains(to) {
            return false;
        }
        match self.index.remove(from) {
            Some(i) => {
                self.entries[i].0 = to.to_string();
                self.index.insert(to.to_string(), i);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Elements in container order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Keys in container order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first().map(|(_, value)| value)
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.last().map(|(_, value)| value)
    }

    /// Stable sort with the container's comparator.
    pub fn sort(&mut self) {
        let order = self.order;
        self.entries.sort_by(|a, b| order(&a.1, &b.1));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
    }
}

impl<T: fmt::Debug> fmt::Debug for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, value)| (name, value)))
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a Container<T> {
    type Item = &'a T;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (String, T)>, fn(&'a (String, T)) -> &'a T>;

    fn into_iter(self) -> Self::IntoIter {
        fn value<T>((_, value): &(String, T)) -> &T {
            value
        }
        self.entries.iter().map(value as fn(&'a (String, T)) -> &'a T)
    }
}
