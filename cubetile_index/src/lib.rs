// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubetile Index: points on the sphere, kept in cell order.
//!
//! A [`PointIndex`] stores points together with the leaf [`CellId`] that
//! contains them. Because cell ids follow a Hilbert curve, sorting by id puts
//! all points of any cell, at any level, in one contiguous run. Queries then
//! reduce to binary searches:
//!
//! - [`search_range`](PointIndexGeneric::search_range): every point whose
//!   cell lies in an inclusive id range.
//! - [`search_radius`](PointIndexGeneric::search_radius): every point
//!   strictly within an angle of a target, found by covering the search cap
//!   with cells and scanning each cell's id range.
//!
//! The index sorts itself lazily: inserts mark it dirty and the next query
//! sorts once. Storage is pluggable through [`PointStore`]; [`VecStore`] is
//! the in-memory default.
//!
//! [`CellId`]: cubetile_cell::CellId
//!
//! ## Features
//!
//! - `std` *(default)*: use the standard library.
//! - `libm`: use `libm` float functions, for `no_std`.
//!
//! # Example
//!
//! ```rust
//! use cubetile_cell::{ChordAngle, coords::lon_lat_to_xyz};
//! use cubetile_index::PointIndex;
//!
//! let mut index: PointIndex<&str> = PointIndex::new();
//! index.insert_lon_lat(0.0, 0.0, "null island");
//! index.insert_lon_lat(1.0, 1.0, "nearby");
//! index.insert_lon_lat(90.0, 45.0, "far away");
//!
//! let target = lon_lat_to_xyz(0.0, 0.0);
//! let mut found: Vec<_> = index
//!     .search_radius(target, ChordAngle::from_degrees(2.0))
//!     .into_iter()
//!     .map(|entry| entry.data)
//!     .collect();
//! found.sort();
//! assert_eq!(found, ["nearby", "null island"]);
//! ```

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod index;

pub use backend::PointStore;
pub use backends::VecStore;
pub use index::{PointEntry, PointIndexGeneric};

/// A point index backed by a [`VecStore`].
pub type PointIndex<T> = PointIndexGeneric<T, VecStore<T>>;
