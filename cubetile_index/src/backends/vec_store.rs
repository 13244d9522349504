// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory vector storage.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::backend::PointStore;
use crate::index::PointEntry;

/// Entries in a single `Vec`.
#[derive(Clone, Debug)]
pub struct VecStore<T> {
    entries: Vec<PointEntry<T>>,
}

impl<T> Default for VecStore<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> VecStore<T> {
    /// An empty store with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }
}

impl<T> PointStore<T> for VecStore<T> {
    fn push(&mut self, entry: PointEntry<T>) {
        self.entries.push(entry);
    }

    fn get(&self, index: usize) -> Option<&PointEntry<T>> {
        self.entries.get(index)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&PointEntry<T>, &PointEntry<T>) -> Ordering,
    {
        // Stable, so entries in the same cell keep insertion order.
        self.entries.sort_by(compare);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
