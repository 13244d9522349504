// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubetile Tile: a quadtree of vector tiles, split lazily.
//!
//! A [`TileStore`] takes GeoJSON or vector features, converts them onto
//! web-Mercator or the six faces of the cube, and files them under the root
//! tile of their face. Building the store splits every root down to a
//! shallow depth; [`TileStore::get_tile`] then splits only the tiles on the
//! path to the one requested.
//!
//! Each [`Tile`] holds its features in named [`Layer`]s. Once a tile has been
//! split or handed out it is transformed: its geometry is simplified for its
//! zoom and moved into tile-local coordinates.
//!
//! Logging goes through `tracing`: construction and lazy splits are reported
//! at `debug`, individual splits at `trace`. No subscriber is installed.
//!
//! ## Features
//!
//! - `std` *(default)*: use the standard library.
//! - `libm`: use `libm` float functions, for `no_std`.
//!
//! # Example
//!
//! ```rust
//! use cubetile_cell::{CellId, Face};
//! use cubetile_tile::{TileStore, TileStoreOptions};
//!
//! let json = r#"{
//!     "type": "Feature",
//!     "properties": { "name": "null island" },
//!     "geometry": { "type": "Point", "coordinates": [0, 0] }
//! }"#;
//! let mut store = TileStore::from_json(json, TileStoreOptions::default().with_maxzoom(0)).unwrap();
//!
//! let tile = store.get_tile(CellId::from_face(Face::PosX)).unwrap();
//! assert_eq!(tile.feature_count(), 1);
//! assert!(tile.layer("default").is_some());
//! ```

#![no_std]

extern crate alloc;

mod error;
mod options;
mod store;
mod tile;

pub use error::{Result, TileStoreError};
pub use options::{MAX_ZOOM, TileStoreOptions};
pub use store::TileStore;
pub use tile::{DEFAULT_LAYER, Layer, Tile};
