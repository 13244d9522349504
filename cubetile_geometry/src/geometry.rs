// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector geometries: the six shapes every input is converted into.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::bbox::BBox;
use crate::point::VectorPoint;

/// A run of vertices: a line, or a closed ring.
pub type Line = Vec<VectorPoint>;

/// Body shared by every geometry kind.
///
/// `O` is the shape of the arc-length offsets produced by clipping: one value
/// per line, nested the same way as the lines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape<C, O = ()> {
    /// The vertices.
    pub coordinates: C,
    /// Distance along the original line(s) where each clipped piece starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<O>,
    /// Whether vertices carry `z`.
    #[serde(rename = "is3D", default)]
    pub is_3d: bool,
    /// Bounds of `coordinates`, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}

impl<C, O> Shape<C, O> {
    /// A 2D shape with no offsets or bounds.
    pub fn new(coordinates: C) -> Self {
        Self {
            coordinates,
            offset: None,
            is_3d: false,
            bbox: None,
        }
    }

    /// Mark the shape as 3D.
    #[must_use]
    pub fn with_3d(mut self, is_3d: bool) -> Self {
        self.is_3d = is_3d;
        self
    }

    /// Attach offsets.
    #[must_use]
    pub fn with_offset(mut self, offset: O) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// A single point.
pub type PointShape = Shape<VectorPoint>;
/// Unconnected points.
pub type MultiPointShape = Shape<Line>;
/// One line with a start offset.
pub type LineStringShape = Shape<Line, f64>;
/// Several lines, each with a start offset.
pub type MultiLineStringShape = Shape<Vec<Line>, Vec<f64>>;
/// Outer ring followed by holes, each ring with a start offset.
pub type PolygonShape = Shape<Vec<Line>, Vec<f64>>;
/// Several polygons.
pub type MultiPolygonShape = Shape<Vec<Vec<Line>>, Vec<Vec<f64>>>;

/// A geometry in vector form, tagged by `type`.
///
/// The `3D`-suffixed tags (`"Point3D"`, ...) are accepted on input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VectorGeometry {
    /// See [`PointShape`].
    #[serde(alias = "Point3D")]
    Point(PointShape),
    /// See [`MultiPointShape`].
    #[serde(alias = "MultiPoint3D")]
    MultiPoint(MultiPointShape),
    /// See [`LineStringShape`].
    #[serde(alias = "LineString3D")]
    LineString(LineStringShape),
    /// See [`MultiLineStringShape`].
    #[serde(alias = "MultiLineString3D")]
    MultiLineString(MultiLineStringShape),
    /// See [`PolygonShape`].
    #[serde(alias = "Polygon3D")]
    Polygon(PolygonShape),
    /// See [`MultiPolygonShape`].
    #[serde(alias = "MultiPolygon3D")]
    MultiPolygon(MultiPolygonShape),
}

macro_rules! each_shape {
    ($geometry:expr, $shape:ident => $body:expr) => {
        match $geometry {
            VectorGeometry::Point($shape) => $body,
            VectorGeometry::MultiPoint($shape) => $body,
            VectorGeometry::LineString($shape) => $body,
            VectorGeometry::MultiLineString($shape) => $body,
            VectorGeometry::Polygon($shape) => $body,
            VectorGeometry::MultiPolygon($shape) => $body,
        }
    };
}

impl VectorGeometry {
    /// The `type` tag, with a `3D` suffix for 3D geometries.
    pub fn type_name(&self) -> &'static str {
        let (flat, deep) = match self {
            Self::Point(_) => ("Point", "Point3D"),
            Self::MultiPoint(_) => ("MultiPoint", "MultiPoint3D"),
            Self::LineString(_) => ("LineString", "LineString3D"),
            Self::MultiLineString(_) => ("MultiLineString", "MultiLineString3D"),
            Self::Polygon(_) => ("Polygon", "Polygon3D"),
            Self::MultiPolygon(_) => ("MultiPolygon", "MultiPolygon3D"),
        };
        if self.is_3d() { deep } else { flat }
    }

    /// Whether vertices carry `z`.
    pub fn is_3d(&self) -> bool {
        each_shape!(self, s => s.is_3d)
    }

    /// Stored bounds, if any.
    pub fn bbox(&self) -> Option<&BBox> {
        each_shape!(self, s => s.bbox.as_ref())
    }

    /// Replace the stored bounds.
    pub fn set_bbox(&mut self, bbox: Option<BBox>) {
        each_shape!(self, s => s.bbox = bbox);
    }

    /// Compute and store bounds from the current vertices.
    pub fn build_bbox(&mut self) {
        let mut bbox: Option<BBox> = None;
        self.for_each_point(|p| {
            if let Some(b) = bbox.as_mut() {
                b.extend_point(p);
            } else {
                bbox = Some(BBox::from_point(p));
            }
        });
        self.set_bbox(bbox);
    }

    /// Whether there is nothing left to draw. A point is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::MultiPoint(s) => s.coordinates.is_empty(),
            Self::LineString(s) => s.coordinates.is_empty(),
            Self::MultiLineString(s) | Self::Polygon(s) => s.coordinates.is_empty(),
            Self::MultiPolygon(s) => s.coordinates.is_empty(),
        }
    }

    /// Visit every vertex in order.
    pub fn for_each_point(&self, mut f: impl FnMut(&VectorPoint)) {
        match self {
            Self::Point(s) => f(&s.coordinates),
            Self::MultiPoint(s) => s.coordinates.iter().for_each(f),
            Self::LineString(s) => s.coordinates.iter().for_each(f),
            Self::MultiLineString(s) | Self::Polygon(s) => {
                s.coordinates.iter().flatten().for_each(f);
            }
            Self::MultiPolygon(s) => s.coordinates.iter().flatten().flatten().for_each(f),
        }
    }

    /// Visit every vertex mutably. Stored bounds are left untouched.
    pub fn for_each_point_mut(&mut self, mut f: impl FnMut(&mut VectorPoint)) {
        match self {
            Self::Point(s) => f(&mut s.coordinates),
            Self::MultiPoint(s) => s.coordinates.iter_mut().for_each(f),
            Self::LineString(s) => s.coordinates.iter_mut().for_each(f),
            Self::MultiLineString(s) | Self::Polygon(s) => {
                s.coordinates.iter_mut().flatten().for_each(f);
            }
            Self::MultiPolygon(s) => s.coordinates.iter_mut().flatten().flatten().for_each(f),
        }
    }

    /// Move from unit-square coordinates into the frame of tile `(zoom, i, j)`,
    /// where the tile spans `0..1` on both axes.
    pub fn transform(&mut self, zoom: u8, i: u32, j: u32) {
        let scale = f64::from(1_u32 << zoom);
        let (dx, dy) = (f64::from(i), f64::from(j));
        self.for_each_point_mut(|p| {
            p.x = p.x * scale - dx;
            p.y = p.y * scale - dy;
        });
        each_shape!(self, s => {
            if let Some(bbox) = &mut s.bbox {
                *bbox = bbox.remap(scale, dx, dy);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn square() -> Line {
        vec![
            VectorPoint::new(0.0, 0.0),
            VectorPoint::new(1.0, 0.0),
            VectorPoint::new(1.0, 1.0),
            VectorPoint::new(0.0, 1.0),
            VectorPoint::new(0.0, 0.0),
        ]
    }

    #[test]
    fn type_names_follow_dimension() {
        let flat = VectorGeometry::Polygon(Shape::new(vec![square()]));
        assert_eq!(flat.type_name(), "Polygon");
        let point = Shape::new(VectorPoint::new_3d(0.0, 0.0, 1.0)).with_3d(true);
        let deep = VectorGeometry::Point(point);
        assert_eq!(deep.type_name(), "Point3D");
    }

    #[test]
    fn deserializes_tagged_shapes() {
        let json = r#"{"type":"LineString3D","is3D":true,"coordinates":[{"x":0,"y":0,"z":1},{"x":1,"y":1,"z":2}]}"#;
        let geometry: VectorGeometry = serde_json::from_str(json).unwrap();
        let VectorGeometry::LineString(line) = &geometry else {
            panic!("expected a line string, got {geometry:?}");
        };
        assert!(line.is_3d);
        assert_eq!(line.coordinates[1], VectorPoint::new_3d(1.0, 1.0, 2.0));
        let unknown = r#"{"type":"Circle","coordinates":[]}"#;
        assert!(serde_json::from_str::<VectorGeometry>(unknown).is_err());
    }

    #[test]
    fn builds_bounds() {
        let mut geometry = VectorGeometry::MultiPolygon(Shape::new(vec![vec![square()]]));
        assert!(geometry.bbox().is_none());
        geometry.build_bbox();
        assert_eq!(geometry.bbox(), Some(&BBox::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn transform_scales_into_tile() {
        let mut geometry = VectorGeometry::LineString(Shape::new(vec![
            VectorPoint::new(0.5, 0.5),
            VectorPoint::new(0.75, 0.625),
        ]));
        geometry.build_bbox();
        geometry.transform(2, 2, 2);
        let mut seen = Vec::new();
        geometry.for_each_point(|p| seen.push((p.x, p.y)));
        assert_eq!(seen, vec![(0.0, 0.0), (1.0, 0.5)]);
        assert_eq!(geometry.bbox(), Some(&BBox::new(0.0, 0.0, 1.0, 0.5)));
    }

    #[test]
    fn emptiness() {
        assert!(!VectorGeometry::Point(Shape::new(VectorPoint::new(0.0, 0.0))).is_empty());
        assert!(VectorGeometry::MultiLineString(Shape::new(Vec::new())).is_empty());
        assert!(!VectorGeometry::Polygon(Shape::new(vec![square()])).is_empty());
    }
}
