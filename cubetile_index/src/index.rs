// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `PointIndex` API and generic implementation over a pluggable store.

use alloc::vec::Vec;
use core::marker::PhantomData;

use cubetile_cell::coords::{from_st, lon_lat_to_xyz};
use cubetile_cell::{Cap, CellId, ChordAngle, Face, Point3D};
use tracing::trace;

use crate::backend::PointStore;

/// An indexed point with its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PointEntry<T> {
    /// Leaf cell containing `point`; the sort key.
    pub cell: CellId,
    /// Position on the unit sphere.
    pub point: Point3D,
    /// Payload.
    pub data: T,
}

impl<T> PointEntry<T> {
    /// Entry for a unit-length `point`.
    pub fn new(point: Point3D, data: T) -> Self {
        Self {
            cell: CellId::from_point(point),
            point,
            data,
        }
    }
}

/// A point index parameterized by its storage.
///
/// Entries are kept in cell order, so every cell's points form one contiguous
/// run. Inserting marks the index unsorted; the next query sorts it once.
#[derive(Debug)]
pub struct PointIndexGeneric<T, S: PointStore<T>> {
    store: S,
    sorted: bool,
    _data: PhantomData<T>,
}

impl<T, S> Default for PointIndexGeneric<T, S>
where
    S: PointStore<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> PointIndexGeneric<T, S>
where
    S: PointStore<T> + Default,
{
    /// Create an empty index using the store's default constructor.
    pub fn new() -> Self {
        Self::with_store(S::default())
    }
}

impl<T, S: PointStore<T>> PointIndexGeneric<T, S> {
    /// Create an index over an explicit store instance, which may already
    /// hold entries.
    pub fn with_store(store: S) -> Self {
        let sorted = store.is_empty();
        Self {
            store,
            sorted,
            _data: PhantomData,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Index `data` at a unit-length `point`.
    pub fn insert(&mut self, point: Point3D, data: T) {
        self.store.push(PointEntry::new(point, data));
        self.sorted = false;
    }

    /// Index `data` at the centre of `cell`.
    pub fn insert_cell(&mut self, cell: CellId, data: T) {
        self.store.push(PointEntry {
            cell,
            point: cell.to_point(),
            data,
        });
        self.sorted = false;
    }

    /// Index `data` at a longitude and latitude in degrees.
    pub fn insert_lon_lat(&mut self, lon: f64, lat: f64, data: T) {
        self.insert(lon_lat_to_xyz(lon, lat), data);
    }

    /// Index `data` at face ST coordinates.
    pub fn insert_face_st(&mut self, face: Face, s: f64, t: f64, data: T) {
        self.insert(from_st(face, s, t), data);
    }

    /// Add entries built elsewhere, such as another index's.
    pub fn insert_points(&mut self, entries: impl IntoIterator<Item = PointEntry<T>>) {
        for entry in entries {
            self.store.push(entry);
            self.sorted = false;
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.store.clear();
        self.sorted = true;
    }

    /// Put entries in cell order if an insert has disturbed it.
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        trace!(entries = self.store.len(), "sorting point index");
        self.store.sort_by(|a, b| a.cell.cmp(&b.cell));
        self.sorted = true;
    }

    /// All entries in cell order.
    pub fn iter(&mut self) -> impl Iterator<Item = &PointEntry<T>> {
        self.sort();
        let store = &self.store;
        (0..store.len()).filter_map(move |i| store.get(i))
    }

    /// Position of the first entry whose cell is not below `id`.
    pub fn lower_bound(&mut self, id: CellId) -> usize {
        self.sort();
        self.lower_bound_sorted(id)
    }

    /// Entries with `low <= cell <= high`, in cell order.
    pub fn search_range(&mut self, low: CellId, high: CellId) -> Vec<&PointEntry<T>> {
        self.sort();
        let mut out = Vec::new();
        self.scan_range(low, high, |entry| out.push(entry));
        out
    }

    /// Entries strictly closer than `radius` to the unit-length `target`.
    ///
    /// Candidates come from the cells covering the search cap and are then
    /// filtered by exact distance. A negative radius finds nothing.
    pub fn search_radius(&mut self, target: Point3D, radius: ChordAngle) -> Vec<&PointEntry<T>> {
        self.sort();
        let mut out = Vec::new();
        if radius.is_negative() {
            return out;
        }
        let cap = Cap::new(target, radius);
        for cell in cap.covering() {
            let (min, max) = cell.range();
            self.scan_range(min, max, |entry| {
                if ChordAngle::from_points(target, entry.point) < radius {
                    out.push(entry);
                }
            });
        }
        out
    }

    fn lower_bound_sorted(&self, id: CellId) -> usize {
        let (mut lo, mut hi) = (0, self.store.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.store.get(mid) {
                Some(entry) if entry.cell < id => lo = mid + 1,
                _ => hi = mid,
            }
        }
        lo
    }

    fn scan_range<'a, F>(&'a self, low: CellId, high: CellId, mut f: F)
    where
        F: FnMut(&'a PointEntry<T>),
    {
        let mut i = self.lower_bound_sorted(low);
        while let Some(entry) = self.store.get(i) {
            if entry.cell > high {
                break;
            }
            f(entry);
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::backends::VecStore;

    type Index = PointIndexGeneric<u32, VecStore<u32>>;

    fn data<'a>(entries: impl IntoIterator<Item = &'a PointEntry<u32>>) -> Vec<u32> {
        entries.into_iter().map(|e| e.data).collect()
    }

    #[test]
    fn radius_search_finds_nearby_points() {
        let mut index = Index::new();
        index.insert_lon_lat(0.0, 0.0, 1);
        index.insert_lon_lat(1.0, 1.0, 2);
        index.insert_lon_lat(90.0, 45.0, 3);
        let target = lon_lat_to_xyz(0.0, 0.0);
        let mut found = data(index.search_radius(target, ChordAngle::from_degrees(2.0)));
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
        assert!(index.search_radius(target, ChordAngle::NEGATIVE).is_empty());
    }

    #[test]
    fn radius_is_exclusive() {
        let mut index = Index::new();
        let target = lon_lat_to_xyz(10.0, 10.0);
        let other = lon_lat_to_xyz(11.0, 10.0);
        index.insert(other, 7);
        let exact = ChordAngle::from_points(target, other);
        assert!(index.search_radius(target, exact).is_empty());
        let wider = ChordAngle::from_length2(exact.length2() * 1.01);
        assert_eq!(data(index.search_radius(target, wider)), vec![7]);
    }

    #[test]
    fn entries_come_back_in_cell_order() {
        let mut index = Index::new();
        for (k, (lon, lat)) in [(120.0, -30.0), (0.0, 0.0), (-60.0, 80.0), (5.0, 5.0)]
            .into_iter()
            .enumerate()
        {
            index.insert_lon_lat(lon, lat, u32::try_from(k).unwrap());
        }
        let cells: Vec<CellId> = index.iter().map(|e| e.cell).collect();
        assert_eq!(cells.len(), 4);
        assert!(cells.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn range_search_includes_both_ends() {
        let mut index = Index::new();
        let cells: Vec<CellId> = (0..5_u32)
            .map(|k| CellId::from_face_ij_level(Face::PosY, k, 0, 30))
            .collect();
        for (k, cell) in cells.iter().enumerate() {
            index.insert_cell(*cell, u32::try_from(k).unwrap());
        }
        let mut sorted = cells.clone();
        sorted.sort();
        let found = index.search_range(sorted[1], sorted[3]);
        let found_cells: Vec<CellId> = found.iter().map(|e| e.cell).collect();
        assert_eq!(found_cells, sorted[1..=3].to_vec());
        assert!(index.search_range(sorted[3], sorted[1]).is_empty());
    }

    #[test]
    fn lower_bound_positions() {
        let mut index = Index::new();
        let a = CellId::from_lon_lat(0.0, 0.0);
        let b = CellId::from_lon_lat(100.0, 0.0);
        index.insert_cell(b, 1);
        index.insert_cell(a, 0);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        assert_eq!(index.lower_bound(lo), 0);
        assert_eq!(index.lower_bound(hi), 1);
        assert_eq!(index.lower_bound(hi.next()), 2);
        assert_eq!(index.lower_bound(CellId::from_face(Face::PosX).range_min()), 0);
    }

    #[test]
    fn face_st_and_copied_entries() {
        let mut index = Index::with_store(VecStore::with_capacity(4));
        index.insert_face_st(Face::NegZ, 0.5, 0.5, 9);
        let mut copy = Index::new();
        copy.insert_points(index.iter().cloned());
        assert_eq!(copy.len(), 1);
        let south = lon_lat_to_xyz(0.0, -90.0);
        assert_eq!(data(copy.search_radius(south, ChordAngle::from_degrees(0.1))), vec![9]);
        copy.clear();
        assert!(copy.is_empty());
    }
}
