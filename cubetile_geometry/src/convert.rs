// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning input collections into vector features on the unit square.
//!
//! Web-Mercator output puts everything on face 0 with `x`/`y` in `0..1`.
//! S2 output puts every feature on the cube face it lies on, with `x`/`y` the
//! face's ST coordinates. A line or polygon that touches several faces is
//! repeated on each of them, stitched into that face's frame and clipped to
//! it with a buffer.

use alloc::vec::Vec;

use cubetile_cell::coords::{
    from_st, lon_lat_to_mercator, lon_lat_to_xyz, to_st, xyz_to_face, xyz_to_lon_lat,
};
use cubetile_cell::{Face, FaceSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::Result;
use crate::faces::st_in_face_frame;
use crate::feature::{FeatureEntry, JsonCollection, VectorFeature};
use crate::geometry::{Line, Shape, VectorGeometry};
use crate::simplify::{TILE_EXTENT, build_sq_dists};

/// The plane features are tiled in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// Web-Mercator on a single face.
    #[serde(rename = "WM")]
    WebMercator,
    /// The six faces of the cube.
    #[serde(rename = "S2")]
    S2,
}

/// How [`convert`] prepares features.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConvertOptions {
    /// Output plane.
    pub projection: Projection,
    /// Simplification tolerance in tile extent units; `0` skips weighting.
    pub tolerance: f64,
    /// Deepest zoom that will be tiled.
    pub maxzoom: u8,
    /// Halo kept around each face when splitting across faces, in tile extent units.
    pub buffer: f64,
    /// Store bounds on every output geometry.
    pub build_bbox: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            projection: Projection::S2,
            tolerance: 3.0,
            maxzoom: 20,
            buffer: 64.0,
            build_bbox: false,
        }
    }
}

/// Convert `data` into features in `options.projection`, with simplification
/// weights and bounds as requested.
pub fn convert(data: JsonCollection, options: &ConvertOptions) -> Result<Vec<VectorFeature>> {
    let mut out = Vec::new();
    match data {
        JsonCollection::Feature(feature) => from_lon_lat(feature.to_vector()?, options, &mut out),
        JsonCollection::FeatureCollection(collection) => {
            for entry in collection.features {
                let feature = match entry {
                    FeatureEntry::Feature(feature) => feature.to_vector()?,
                    FeatureEntry::VectorFeature(feature) => feature,
                };
                from_lon_lat(feature, options, &mut out);
            }
        }
        JsonCollection::VectorFeature(feature) => from_lon_lat(feature, options, &mut out),
        JsonCollection::S2Feature(feature) => from_s2(feature, options, &mut out),
        JsonCollection::S2FeatureCollection(collection) => {
            for feature in collection.features {
                from_s2(feature, options, &mut out);
            }
        }
    }
    for feature in &mut out {
        if options.tolerance > 0.0 {
            build_sq_dists(&mut feature.geometry, options.tolerance, options.maxzoom);
        }
        if options.build_bbox {
            feature.geometry.build_bbox();
        }
    }
    Ok(out)
}

fn from_lon_lat(feature: VectorFeature, options: &ConvertOptions, out: &mut Vec<VectorFeature>) {
    match options.projection {
        Projection::WebMercator => out.push(lon_lat_to_wm(feature)),
        Projection::S2 => out.extend(lon_lat_to_s2(&feature, options.buffer / TILE_EXTENT)),
    }
}

fn from_s2(feature: VectorFeature, options: &ConvertOptions, out: &mut Vec<VectorFeature>) {
    match options.projection {
        Projection::WebMercator => out.push(s2_to_wm(feature)),
        Projection::S2 => out.push(feature),
    }
}

/// Project a lon/lat feature to web-Mercator on face 0.
pub fn lon_lat_to_wm(mut feature: VectorFeature) -> VectorFeature {
    feature.geometry.for_each_point_mut(|p| {
        (p.x, p.y) = lon_lat_to_mercator(p.x, p.y);
    });
    feature.geometry.set_bbox(None);
    feature.face = Face::PosX;
    feature
}

/// Re-project a face ST feature to web-Mercator on face 0.
pub fn s2_to_wm(mut feature: VectorFeature) -> VectorFeature {
    let face = feature.face;
    feature.geometry.for_each_point_mut(|p| {
        let (lon, lat) = xyz_to_lon_lat(from_st(face, p.x, p.y));
        (p.x, p.y) = lon_lat_to_mercator(lon, lat);
    });
    feature.geometry.set_bbox(None);
    feature.face = Face::PosX;
    feature
}

/// Project a lon/lat feature onto the cube, one output per face it touches.
///
/// Points and multi points are grouped by the face each point falls on.
/// Lines and polygons are stitched into the frame of every face one of their
/// vertices falls on, then clipped to that face widened by `buffer` (a
/// fraction of the face side).
pub fn lon_lat_to_s2(feature: &VectorFeature, buffer: f64) -> SmallVec<[VectorFeature; 1]> {
    let mut out = SmallVec::new();
    match &feature.geometry {
        VectorGeometry::Point(shape) => {
            let p = &shape.coordinates;
            let (face, s, t) = to_st(lon_lat_to_xyz(p.x, p.y));
            let shape = Shape {
                coordinates: p.moved(s, t),
                bbox: None,
                ..shape.clone()
            };
            out.push(feature.with_geometry(VectorGeometry::Point(shape)).with_face(face));
        }
        VectorGeometry::MultiPoint(shape) => {
            let mut per_face: [Line; 6] = Default::default();
            for p in &shape.coordinates {
                let (face, s, t) = to_st(lon_lat_to_xyz(p.x, p.y));
                per_face[usize::from(face.index())].push(p.moved(s, t));
            }
            for (face, points) in Face::ALL.into_iter().zip(per_face) {
                if points.is_empty() {
                    continue;
                }
                let shape = Shape::new(points).with_3d(shape.is_3d);
                let geometry = VectorGeometry::MultiPoint(shape);
                out.push(feature.with_geometry(geometry).with_face(face));
            }
        }
        geometry => {
            let mut faces = FaceSet::empty();
            geometry.for_each_point(|p| {
                faces.insert_face(xyz_to_face(lon_lat_to_xyz(p.x, p.y)));
            });
            for face in faces.faces() {
                let mut stitched = geometry.clone();
                stitched.set_bbox(None);
                stitched.for_each_point_mut(|p| {
                    let (source, s, t) = to_st(lon_lat_to_xyz(p.x, p.y));
                    (p.x, p.y) = st_in_face_frame(source, face, s, t);
                });
                if let Some(clipped) = stitched.clip_rect(0.0, 1.0, 0.0, 1.0, buffer) {
                    out.push(feature.with_geometry(clipped).with_face(face));
                }
            }
        }
    }
    out
}
