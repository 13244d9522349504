// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubetile Geometry: vector features on the unit square, ready for tiling.
//!
//! Input arrives as GeoJSON or as vector features (see [`JsonCollection`]).
//! [`convert`] projects it onto web-Mercator or onto the faces of the cube,
//! where every coordinate lies in `0..1`, and prepares it for tiling:
//!
//! - [`VectorGeometry::clip`] clips a geometry to a slab along one [`Axis`],
//!   keeping lines and polygons slightly past the slab edges so neighbouring
//!   tiles overlap.
//! - [`build_sq_dists`] gives every vertex a Douglas-Peucker weight once, and
//!   [`simplify`] later keeps only the vertices that matter at a given zoom.
//! - [`st_in_face_frame`] carries face coordinates across cube edges so a
//!   geometry can be clipped to any face it touches.
//!
//! ## Features
//!
//! - `std` *(default)*: use the standard library's float functions.
//! - `libm`: use `libm` float functions through `kurbo` instead, for `no_std`.
//!
//! # Example
//!
//! ```rust
//! use cubetile_geometry::{ConvertOptions, JsonCollection, Projection, VectorGeometry, convert};
//!
//! let data: JsonCollection = serde_json::from_str(
//!     r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}}"#,
//! )
//! .unwrap();
//! let options = ConvertOptions { projection: Projection::WebMercator, ..Default::default() };
//! let features = convert(data, &options).unwrap();
//! let VectorGeometry::Point(point) = &features[0].geometry else { unreachable!() };
//! assert_eq!((point.coordinates.x, point.coordinates.y), (0.5, 0.5));
//! ```

#![no_std]

extern crate alloc;

mod bbox;
mod clip;
mod convert;
mod error;
mod faces;
mod feature;
mod geometry;
mod point;
mod simplify;

pub use bbox::BBox;
pub use clip::{Axis, ClippedLine, clip_features, clip_line};
pub use convert::{
    ConvertOptions, Projection, convert, lon_lat_to_s2, lon_lat_to_wm, s2_to_wm,
};
pub use error::{ConvertError, Result};
pub use faces::st_in_face_frame;
pub use feature::{
    Feature, FeatureCollection, FeatureEntry, FeatureId, Geometry, JsonCollection, Position,
    Properties, S2FeatureCollection, VectorFeature,
};
pub use geometry::{
    Line, LineStringShape, MultiLineStringShape, MultiPointShape, MultiPolygonShape,
    PointShape, PolygonShape, Shape, VectorGeometry,
};
pub use point::{MValue, VectorPoint};
pub use simplify::{TILE_EXTENT, build_sq_dists, simplify};
