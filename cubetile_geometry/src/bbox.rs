// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes with an optional elevation range.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::clip::Axis;
use crate::error::ConvertError;
use crate::point::VectorPoint;

/// A bounding box over `x`/`y`, plus `z` when the geometry is 3D.
///
/// Serialized as `[left, bottom, right, top]`, or
/// `[left, bottom, zmin, right, top, zmax]` in 3D.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f64>", try_from = "Vec<f64>")]
pub struct BBox {
    /// Smallest `x`.
    pub left: f64,
    /// Smallest `y`.
    pub bottom: f64,
    /// Largest `x`.
    pub right: f64,
    /// Largest `y`.
    pub top: f64,
    /// Elevation range as `(min, max)`.
    pub z: Option<(f64, f64)>,
}

impl BBox {
    /// A 2D box.
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
            z: None,
        }
    }

    /// Add an elevation range.
    #[must_use]
    pub const fn with_z(mut self, min: f64, max: f64) -> Self {
        self.z = Some((min, max));
        self
    }

    /// Degenerate box around a single vertex.
    pub fn from_point(p: &VectorPoint) -> Self {
        Self {
            left: p.x,
            bottom: p.y,
            right: p.x,
            top: p.y,
            z: p.z.map(|z| (z, z)),
        }
    }

    /// Box around all `points`, or `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a VectorPoint>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bbox = Self::from_point(points.next()?);
        for p in points {
            bbox.extend_point(p);
        }
        Some(bbox)
    }

    /// Grow the box to include `p`.
    pub fn extend_point(&mut self, p: &VectorPoint) {
        self.left = self.left.min(p.x);
        self.bottom = self.bottom.min(p.y);
        self.right = self.right.max(p.x);
        self.top = self.top.max(p.y);
        if let Some(pz) = p.z {
            self.z = Some(match self.z {
                Some((lo, hi)) => (lo.min(pz), hi.max(pz)),
                None => (pz, pz),
            });
        }
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let z = match (self.z, other.z) {
            (Some((a0, a1)), Some((b0, b1))) => Some((a0.min(b0), a1.max(b1))),
            (z, None) | (None, z) => z,
        };
        Self {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
            z,
        }
    }

    /// Intersect the box with the slab `k1..=k2` along `axis`.
    #[must_use]
    pub fn clip(&self, axis: Axis, k1: f64, k2: f64) -> Self {
        let mut out = *self;
        match axis {
            Axis::X => {
                out.left = self.left.max(k1);
                out.right = self.right.min(k2);
            }
            Axis::Y => {
                out.bottom = self.bottom.max(k1);
                out.top = self.top.min(k2);
            }
        }
        out
    }

    /// Whether `p` lies inside the box, edges included. Elevation is ignored.
    pub fn contains_point(&self, p: &VectorPoint) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }

    /// Whether an elevation range is present.
    pub fn is_3d(&self) -> bool {
        self.z.is_some()
    }

    /// Apply `x * scale - dx`, `y * scale - dy` to the planar bounds.
    #[must_use]
    pub fn remap(&self, scale: f64, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left * scale - dx,
            bottom: self.bottom * scale - dy,
            right: self.right * scale - dx,
            top: self.top * scale - dy,
            z: self.z,
        }
    }
}

impl From<BBox> for Rect {
    fn from(bbox: BBox) -> Self {
        Self::new(bbox.left, bbox.bottom, bbox.right, bbox.top)
    }
}

impl From<Rect> for BBox {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }
}

impl From<BBox> for Vec<f64> {
    fn from(bbox: BBox) -> Self {
        match bbox.z {
            Some((zmin, zmax)) => vec![bbox.left, bbox.bottom, zmin, bbox.right, bbox.top, zmax],
            None => vec![bbox.left, bbox.bottom, bbox.right, bbox.top],
        }
    }
}

impl TryFrom<Vec<f64>> for BBox {
    type Error = ConvertError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values[..] {
            [left, bottom, right, top] => Ok(Self::new(left, bottom, right, top)),
            [left, bottom, zmin, right, top, zmax] => {
                Ok(Self::new(left, bottom, right, top).with_z(zmin, zmax))
            }
            _ => Err(ConvertError::InvalidBBox { len: values.len() }),
        }
    }
}
