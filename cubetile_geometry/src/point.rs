// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertices and their per-vertex measure values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form per-vertex values carried through clipping.
pub type MValue = Map<alloc::string::String, Value>;

/// A vertex of a vector geometry.
///
/// `x`/`y` are lon/lat on input, unit-square coordinates (web-Mercator or
/// face ST) after conversion, and tile-local coordinates once a tile has been
/// transformed. `t` is the simplification weight assigned by
/// [`build_sq_dists`](crate::build_sq_dists).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Elevation, when the geometry is 3D.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Measure values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<MValue>,
    /// Simplification weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
}

impl VectorPoint {
    /// A 2D point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
            t: None,
        }
    }

    /// A 3D point.
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
            t: None,
        }
    }

    /// Attach measure values.
    #[must_use]
    pub fn with_m(mut self, m: MValue) -> Self {
        self.m = Some(m);
        self
    }

    /// Same vertex at new planar coordinates.
    pub(crate) fn moved(&self, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..self.clone()
        }
    }
}
