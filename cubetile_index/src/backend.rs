// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Storage trait for point index implementations.

use core::cmp::Ordering;

use crate::index::PointEntry;

/// Entry storage used by [`PointIndexGeneric`][crate::PointIndexGeneric].
///
/// The index only appends, sorts and reads by position, so anything that can
/// do those (an in-memory vector, a paged file, a memory map) can back it.
pub trait PointStore<T> {
    /// Append an entry.
    fn push(&mut self, entry: PointEntry<T>);

    /// Entry at `index`, or `None` past the end.
    fn get(&self, index: usize) -> Option<&PointEntry<T>>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort all entries with `compare`.
    fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&PointEntry<T>, &PointEntry<T>) -> Ordering;

    /// Remove all entries.
    fn clear(&mut self);
}
