// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubetile Cell: a hierarchical decomposition of the sphere into cells.
//!
//! The sphere is projected onto the six faces of a cube. Each face is split
//! recursively into quadrants, down to 30 levels, and every cell is named by
//! its position along a Hilbert curve that visits the face. The resulting
//! [`CellId`]s are plain `u64`s whose numeric order follows the curve, so
//! spatially close cells usually have close ids and a cell's descendants form
//! one contiguous id range.
//!
//! - [`CellId`]: encode and decode `(face, i, j, level)`, walk parents and
//!   children, test containment, and find cell bounds, corners and neighbours.
//! - [`coords`]: conversions between lon/lat, unit-sphere points, face UV/ST,
//!   the leaf grid, and normalized web-Mercator.
//! - [`metrics`]: closed-form cell size bounds used to pick a level for a
//!   physical size.
//! - [`Cap`] and [`ChordAngle`]: spherical discs and their cell coverings.
//!
//! ## Features
//!
//! - `std` *(default)*: use the standard library's float functions.
//! - `libm`: use `libm` float functions through `kurbo` instead, for `no_std`.
//! - `serde`: derive `Serialize`/`Deserialize` for the public value types.
//!
//! # Example
//!
//! ```rust
//! use cubetile_cell::{CellId, Face};
//!
//! let leaf = CellId::from_lon_lat(0.0, 0.0);
//! assert_eq!(leaf.face(), Face::PosX);
//! assert_eq!(leaf.level(), 30);
//!
//! // Every ancestor contains the leaf, and the face cell is the root.
//! let tile = leaf.parent_at(10);
//! assert!(tile.contains(leaf));
//! assert_eq!(leaf.parent_at(0), CellId::from_face(Face::PosX));
//!
//! // Grid coordinates round-trip at any level.
//! let id = CellId::from_face_ij_level(Face::PosZ, 3, 5, 4);
//! assert_eq!(id.to_face_ij(), (Face::PosZ, 3, 5, 4));
//! ```
//!
//! Coverings bound a radius search to a handful of id ranges:
//!
//! ```rust
//! use cubetile_cell::{Cap, CellId, ChordAngle, coords::lon_lat_to_xyz};
//!
//! let cap = Cap::new(lon_lat_to_xyz(0.0, 0.0), ChordAngle::from_degrees(2.0));
//! let covering = cap.covering();
//! let inside = CellId::from_lon_lat(1.0, 1.0);
//! assert!(covering.iter().any(|cell| cell.contains(inside)));
//! ```

#![no_std]

extern crate alloc;

mod cap;
mod chord_angle;
pub mod coords;
mod face;
mod id;
pub mod metrics;
mod point;

pub use cap::Cap;
pub use chord_angle::ChordAngle;
pub use face::{Face, FaceSet, InvalidFace};
pub use id::{CellId, FACE_BITS, MAX_LEVEL, NUM_FACES, POS_BITS};
pub use metrics::Metric;
pub use point::Point3D;
