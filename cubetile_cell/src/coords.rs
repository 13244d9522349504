// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate conversions between lon/lat, unit-sphere XYZ, face UV/ST, the
//! integer cell grid, and normalized web-Mercator.
//!
//! ST coordinates live in `[0, 1]` on each face and are aligned with the cell
//! grid. UV coordinates live in `[-1, 1]` and are the actual gnomonic
//! projection onto the cube. The two are related by the quadratic transform,
//! which keeps cell areas much closer to uniform than a linear mapping.

use core::f64::consts::{E, PI};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::face::Face;
use crate::id::MAX_LEVEL;
use crate::point::Point3D;

/// Number of leaf cells along one edge of a face.
pub const LIMIT_IJ: u32 = 1 << MAX_LEVEL;

/// Maximum value of an `si`/`ti` coordinate (leaf-cell centres and edges).
pub const MAX_SI_TI: u64 = 1 << (MAX_LEVEL + 1);

/// Quadratic ST to UV transform.
#[inline]
pub fn quadratic_st_to_uv(s: f64) -> f64 {
    if s >= 0.5 {
        (4.0 * s * s - 1.0) / 3.0
    } else {
        (1.0 - 4.0 * (1.0 - s) * (1.0 - s)) / 3.0
    }
}

/// Inverse of [`quadratic_st_to_uv`].
#[inline]
pub fn quadratic_uv_to_st(u: f64) -> f64 {
    if u >= 0.0 {
        0.5 * (1.0 + 3.0 * u).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
    }
}

/// Quantize an ST coordinate to the leaf-cell grid, clamping to `[0, 2^30 - 1]`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "The value is clamped into the 30-bit grid before the cast floors it."
)]
#[inline]
pub fn st_to_ij(s: f64) -> u32 {
    let limit = f64::from(LIMIT_IJ);
    (limit * s).clamp(0.0, limit - 1.0) as u32
}

/// ST coordinate of the lower edge of leaf column/row `i`.
#[inline]
pub fn ij_to_st(i: u32) -> f64 {
    f64::from(i) / f64::from(LIMIT_IJ)
}

/// ST coordinate of an `si`/`ti` value (twice the leaf resolution).
#[inline]
pub fn si_ti_to_st(si: u64) -> f64 {
    si as f64 / MAX_SI_TI as f64
}

/// Map face-local UV to an unnormalized point.
#[inline]
pub fn face_uv_to_xyz(face: Face, u: f64, v: f64) -> Point3D {
    face.uv_to_xyz(u, v)
}

/// Project `p` onto `face`, or `None` if `p` is in the opposite hemisphere.
#[inline]
pub fn face_xyz_to_uv(face: Face, p: Point3D) -> Option<(f64, f64)> {
    face.xyz_to_uv(p)
}

/// Face that `p` projects onto.
#[inline]
pub fn xyz_to_face(p: Point3D) -> Face {
    Face::from_xyz(p)
}

/// Face and UV coordinates of `p`.
pub fn xyz_to_face_uv(p: Point3D) -> (Face, f64, f64) {
    let face = Face::from_xyz(p);
    let (u, v) = face.valid_xyz_to_uv(p);
    (face, u, v)
}

/// Face and ST coordinates of `p`.
pub fn to_st(p: Point3D) -> (Face, f64, f64) {
    let (face, u, v) = xyz_to_face_uv(p);
    (face, quadratic_uv_to_st(u), quadratic_uv_to_st(v))
}

/// Unit-length point for face ST coordinates.
pub fn from_st(face: Face, s: f64, t: f64) -> Point3D {
    face.uv_to_xyz(quadratic_st_to_uv(s), quadratic_st_to_uv(t))
        .normalize()
}

/// Unit-sphere point for a longitude/latitude in degrees.
pub fn lon_lat_to_xyz(lon: f64, lat: f64) -> Point3D {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    let cos_lat = lat.cos();
    Point3D::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
}

/// Longitude/latitude in degrees of `p`. `p` need not be unit length.
pub fn xyz_to_lon_lat(p: Point3D) -> (f64, f64) {
    let lat = p.z.atan2((p.x * p.x + p.y * p.y).sqrt());
    let lon = p.y.atan2(p.x);
    (lon.to_degrees(), lat.to_degrees())
}

/// Spherical Mercator projection into the unit square.
///
/// `x` grows eastwards and `y` grows southwards, both in `[0, 1]`. Latitudes
/// past the Mercator limit are clamped onto the top or bottom edge.
pub fn lon_lat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let sin = lat.to_radians().sin();
    let x = lon / 360.0 + 0.5;
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    (x, y.clamp(0.0, 1.0))
}

/// Inverse of [`lon_lat_to_mercator`].
pub fn mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let a = PI * (1.0 - 2.0 * y);
    let exp = E.powf(a);
    let sinh = 0.5 * (exp - 1.0 / exp);
    ((x - 0.5) * 360.0, sinh.atan2(1.0).to_degrees())
}
