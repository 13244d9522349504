// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipping against a slab along one axis.
//!
//! Clipping to a rectangle is two passes: one along [`Axis::X`], then one
//! along [`Axis::Y`]. Lines and polygons are clipped to a slab widened by a
//! buffer on both sides so neighbouring tiles overlap; points are not.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::feature::VectorFeature;
use crate::geometry::{Line, Shape, VectorGeometry};
use crate::point::VectorPoint;

/// A coordinate axis of the plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// Coordinate of `p` along this axis.
    #[inline]
    pub fn of(self, p: &VectorPoint) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }
}

/// One piece of a clipped line or ring.
#[derive(Clone, Debug, PartialEq)]
pub struct ClippedLine {
    /// The vertices kept, with new vertices where the line crossed the slab edges.
    pub points: Line,
    /// Distance along the input line at which `points[0]` lies, counting from
    /// the input's own offset.
    pub offset: f64,
}

/// Where the line meets `axis == k`, between `a` and `b`.
///
/// `m` comes from `a`, or from `b` when `m_from_b`, falling back to the other
/// endpoint.
/// The new vertex gets weight `1` so simplification always keeps it.
fn intersect(
    a: &VectorPoint,
    b: &VectorPoint,
    axis: Axis,
    k: f64,
    m_from_b: bool,
) -> (VectorPoint, f64) {
    let t = (k - axis.of(a)) / (axis.of(b) - axis.of(a));
    let (x, y) = match axis {
        Axis::X => (k, a.y + (b.y - a.y) * t),
        Axis::Y => (a.x + (b.x - a.x) * t, k),
    };
    let z = match (a.z, b.z) {
        (Some(az), Some(bz)) => Some(az + (bz - az) * t),
        (z, None) | (None, z) => z,
    };
    let (first, second) = if m_from_b { (b, a) } else { (a, b) };
    let m = first.m.as_ref().or(second.m.as_ref()).cloned();
    let point = VectorPoint {
        x,
        y,
        z,
        m,
        t: Some(1.0),
    };
    (point, t)
}

/// Clip one line (or ring, when `is_polygon`) to `k1 <= axis <= k2`.
///
/// A line is cut at every exit, so it may come back in several pieces. A ring
/// is never cut: whatever survives is collected into a single ring and closed
/// again if clipping opened it. `offset` is the arc length already travelled
/// before `points[0]`.
pub fn clip_line(
    points: &[VectorPoint],
    axis: Axis,
    k1: f64,
    k2: f64,
    is_polygon: bool,
    offset: f64,
) -> Vec<ClippedLine> {
    let mut out = Vec::new();
    let Some(last) = points.last() else {
        return out;
    };
    let mut slice = Line::new();
    let mut start = offset;
    let mut len = offset;

    for pair in points.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (ak, bk) = (axis.of(a), axis.of(b));
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let seg_len = (dx * dx + dy * dy).sqrt();
        let mut exited = false;

        if ak < k1 {
            if bk > k1 {
                let (p, t) = intersect(a, b, axis, k1, false);
                if slice.is_empty() {
                    start = len + seg_len * t;
                }
                slice.push(p);
            }
        } else if ak > k2 {
            if bk < k2 {
                let (p, t) = intersect(a, b, axis, k2, false);
                if slice.is_empty() {
                    start = len + seg_len * t;
                }
                slice.push(p);
            }
        } else {
            if slice.is_empty() {
                start = len;
            }
            slice.push(a.clone());
        }
        if bk < k1 && ak >= k1 {
            slice.push(intersect(a, b, axis, k1, true).0);
            exited = true;
        }
        if bk > k2 && ak <= k2 {
            slice.push(intersect(a, b, axis, k2, true).0);
            exited = true;
        }
        if exited && !is_polygon {
            out.push(ClippedLine {
                points: core::mem::take(&mut slice),
                offset: start,
            });
        }
        len += seg_len;
    }

    let lk = axis.of(last);
    if lk >= k1 && lk <= k2 {
        if slice.is_empty() {
            start = len;
        }
        slice.push(last.clone());
    }
    if is_polygon
        && let (Some(first), Some(end)) = (slice.first(), slice.last())
        && (first.x != end.x || first.y != end.y)
    {
        let closing = first.clone();
        slice.push(closing);
    }
    if !slice.is_empty() {
        out.push(ClippedLine {
            points: slice,
            offset: start,
        });
    }
    out
}

/// Clip the rings of one polygon. `None` when the outer ring does not survive.
fn clip_rings(
    rings: &[Line],
    offsets: Option<&Vec<f64>>,
    axis: Axis,
    k1: f64,
    k2: f64,
) -> Option<(Vec<Line>, Vec<f64>)> {
    let mut kept = Vec::with_capacity(rings.len());
    let mut kept_offsets = Vec::with_capacity(rings.len());
    for (r, ring) in rings.iter().enumerate() {
        let offset = offsets.and_then(|o| o.get(r).copied()).unwrap_or(0.0);
        let clipped = clip_line(ring, axis, k1, k2, true, offset).pop();
        match clipped {
            Some(piece) if piece.points.len() >= 4 => {
                kept.push(piece.points);
                kept_offsets.push(piece.offset);
            }
            _ if r == 0 => return None,
            _ => {}
        }
    }
    Some((kept, kept_offsets))
}

fn reshaped<C, O, D, P>(shape: &Shape<C, O>, coordinates: D, offset: Option<P>) -> Shape<D, P> {
    Shape {
        coordinates,
        offset,
        is_3d: shape.is_3d,
        bbox: shape.bbox,
    }
}

impl VectorGeometry {
    /// Clip to `k1 <= axis <= k2`, widening the slab by `buffer` on both sides
    /// for lines and polygons.
    ///
    /// Returns `None` when nothing is left. A line string that is cut into
    /// several pieces comes back as a multi line string. Polygon rings with
    /// fewer than four vertices are dropped, and a polygon whose outer ring
    /// is dropped is dropped whole. Stored bounds are recomputed.
    pub fn clip(&self, axis: Axis, k1: f64, k2: f64, buffer: f64) -> Option<Self> {
        let (b1, b2) = (k1 - buffer, k2 + buffer);
        let inside = |p: &VectorPoint| {
            let k = axis.of(p);
            k >= k1 && k <= k2
        };
        let mut clipped = match self {
            Self::Point(s) => {
                if !inside(&s.coordinates) {
                    return None;
                }
                Self::Point(s.clone())
            }
            Self::MultiPoint(s) => {
                let points: Line = s.coordinates.iter().filter(|p| inside(p)).cloned().collect();
                if points.is_empty() {
                    return None;
                }
                Self::MultiPoint(reshaped(s, points, None))
            }
            Self::LineString(s) => {
                let offset = s.offset.unwrap_or(0.0);
                let mut pieces = clip_line(&s.coordinates, axis, b1, b2, false, offset);
                match pieces.len() {
                    0 => return None,
                    1 => {
                        let piece = pieces.remove(0);
                        Self::LineString(reshaped(s, piece.points, Some(piece.offset)))
                    }
                    _ => {
                        let offsets = pieces.iter().map(|p| p.offset).collect();
                        let lines = pieces.into_iter().map(|p| p.points).collect();
                        Self::MultiLineString(reshaped(s, lines, Some(offsets)))
                    }
                }
            }
            Self::MultiLineString(s) => {
                let mut lines = Vec::new();
                let mut offsets = Vec::new();
                for (l, line) in s.coordinates.iter().enumerate() {
                    let offset = s.offset.as_ref().and_then(|o| o.get(l).copied()).unwrap_or(0.0);
                    for piece in clip_line(line, axis, b1, b2, false, offset) {
                        lines.push(piece.points);
                        offsets.push(piece.offset);
                    }
                }
                if lines.is_empty() {
                    return None;
                }
                Self::MultiLineString(reshaped(s, lines, Some(offsets)))
            }
            Self::Polygon(s) => {
                let (rings, offsets) =
                    clip_rings(&s.coordinates, s.offset.as_ref(), axis, b1, b2)?;
                Self::Polygon(reshaped(s, rings, Some(offsets)))
            }
            Self::MultiPolygon(s) => {
                let mut polygons = Vec::new();
                let mut offsets = Vec::new();
                for (p, polygon) in s.coordinates.iter().enumerate() {
                    let ring_offsets = s.offset.as_ref().and_then(|o| o.get(p));
                    if let Some((rings, ro)) = clip_rings(polygon, ring_offsets, axis, b1, b2) {
                        polygons.push(rings);
                        offsets.push(ro);
                    }
                }
                if polygons.is_empty() {
                    return None;
                }
                Self::MultiPolygon(reshaped(s, polygons, Some(offsets)))
            }
        };
        if clipped.bbox().is_some() {
            clipped.build_bbox();
        }
        Some(clipped)
    }

    /// Clip to the rectangle `x1..=x2` by `y1..=y2`, X first.
    pub fn clip_rect(&self, x1: f64, x2: f64, y1: f64, y2: f64, buffer: f64) -> Option<Self> {
        self.clip(Axis::X, x1, x2, buffer)?.clip(Axis::Y, y1, y2, buffer)
    }
}

/// Clip every feature's geometry, keeping the features with something left.
pub fn clip_features(
    features: &[VectorFeature],
    axis: Axis,
    k1: f64,
    k2: f64,
    buffer: f64,
) -> Vec<VectorFeature> {
    features
        .iter()
        .filter_map(|feature| {
            let geometry = feature.geometry.clip(axis, k1, k2, buffer)?;
            Some(feature.with_geometry(geometry))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use serde_json::json;

    use super::*;
    use crate::bbox::BBox;
    use crate::point::MValue;

    fn line(coords: &[(f64, f64)]) -> Line {
        coords.iter().map(|&(x, y)| VectorPoint::new(x, y)).collect()
    }

    fn xy(points: &[VectorPoint]) -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn line_is_cut_at_every_exit() {
        // Zig-zags in and out of 1..=2 twice.
        let input = line(&[(0.0, 0.0), (1.5, 0.0), (3.0, 0.0), (1.5, 1.0), (0.0, 1.0)]);
        let pieces = clip_line(&input, Axis::X, 1.0, 2.0, false, 0.0);
        assert_eq!(pieces.len(), 2);
        assert_eq!(xy(&pieces[0].points), vec![(1.0, 0.0), (1.5, 0.0), (2.0, 0.0)]);
        assert!((pieces[0].offset - 1.0).abs() < 1e-12, "offset {}", pieces[0].offset);
        assert_eq!(pieces[1].points.len(), 3);
        assert_eq!((pieces[1].points[0].x, pieces[1].points[2].x), (2.0, 1.0));
        // Entered after 3 along the bottom plus the part of the diagonal outside.
        let diagonal = (1.5_f64 * 1.5 + 1.0).sqrt();
        let expected = 3.0 + diagonal / 1.5;
        assert!((pieces[1].offset - expected).abs() < 1e-12, "offset {}", pieces[1].offset);
    }

    #[test]
    fn crossing_segment_enters_and_exits() {
        let input = line(&[(-1.0, 0.0), (3.0, 2.0)]);
        let pieces = clip_line(&input, Axis::X, 0.0, 2.0, false, 10.0);
        assert_eq!(pieces.len(), 1);
        assert_eq!(xy(&pieces[0].points), vec![(0.0, 0.5), (2.0, 1.5)]);
        assert!(pieces[0].points.iter().all(|p| p.t == Some(1.0)));
        let expected = 10.0 + 20.0_f64.sqrt() / 4.0;
        assert!((pieces[0].offset - expected).abs() < 1e-12, "offset {}", pieces[0].offset);
    }

    #[test]
    fn interpolates_z_and_carries_m() {
        let mut enter_m = MValue::new();
        enter_m.insert("name".into(), json!("a"));
        let mut exit_m = MValue::new();
        exit_m.insert("name".into(), json!("b"));
        let input = vec![
            VectorPoint::new_3d(0.0, 0.0, 0.0).with_m(enter_m.clone()),
            VectorPoint::new_3d(4.0, 0.0, 8.0).with_m(exit_m.clone()),
        ];
        let pieces = clip_line(&input, Axis::X, 1.0, 3.0, false, 0.0);
        let points = &pieces[0].points;
        assert_eq!(points[0].z, Some(2.0));
        assert_eq!(points[0].m.as_ref(), Some(&enter_m));
        assert_eq!(points[1].z, Some(6.0));
        assert_eq!(points[1].m.as_ref(), Some(&exit_m));
    }

    #[test]
    fn line_inside_the_slab_is_unchanged() {
        let vertex = |x: f64, y: f64, z: f64, speed: u32| {
            let mut m = MValue::new();
            m.insert("speed".into(), json!(speed));
            VectorPoint {
                z: Some(z),
                m: Some(m),
                t: Some(f64::from(speed) / 10.0),
                ..VectorPoint::new(x, y)
            }
        };
        let open = vec![
            vertex(0.1, 0.2, 5.0, 1),
            vertex(0.4, 0.9, 6.0, 2),
            vertex(0.8, 0.3, 7.0, 3),
        ];
        let mut ring = open.clone();
        ring.push(open[0].clone());

        for axis in [Axis::X, Axis::Y] {
            for (input, is_polygon) in [(&open, false), (&ring, true)] {
                let pieces = clip_line(input, axis, 0.0, 1.0, is_polygon, 2.5);
                assert_eq!(pieces.len(), 1, "{axis:?} polygon={is_polygon}");
                assert_eq!(&pieces[0].points, input);
                assert_eq!(pieces[0].offset, 2.5);
            }
        }
    }

    #[test]
    fn ring_is_kept_whole_and_closed() {
        let ring = line(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let pieces = clip_line(&ring, Axis::X, 1.0, 2.0, true, 0.0);
        assert_eq!(pieces.len(), 1);
        let points = &pieces[0].points;
        assert_eq!(xy(points), vec![(1.0, 0.0), (2.0, 0.0), (2.0, 4.0), (1.0, 4.0), (1.0, 0.0)]);
    }

    #[test]
    fn points_ignore_the_buffer() {
        let point = VectorGeometry::Point(Shape::new(VectorPoint::new(1.05, 0.5)));
        assert!(point.clip(Axis::X, 0.0, 1.0, 0.1).is_none());
        let segment = VectorGeometry::LineString(Shape::new(line(&[(1.05, 0.0), (1.05, 1.0)])));
        assert!(segment.clip(Axis::X, 0.0, 1.0, 0.1).is_some());
        let multi = VectorGeometry::MultiPoint(Shape::new(line(&[(0.5, 0.0), (1.5, 0.0)])));
        let Some(VectorGeometry::MultiPoint(kept)) = multi.clip(Axis::X, 0.0, 1.0, 0.1) else {
            panic!("multipoint should survive");
        };
        assert_eq!(xy(&kept.coordinates), vec![(0.5, 0.0)]);
    }

    #[test]
    fn split_line_string_becomes_multi() {
        let input = line(&[(0.0, 0.0), (1.5, 0.0), (3.0, 0.0), (1.5, 1.0), (0.0, 1.0)]);
        let geometry = VectorGeometry::LineString(Shape::new(input));
        let Some(VectorGeometry::MultiLineString(multi)) = geometry.clip(Axis::X, 1.0, 2.0, 0.0)
        else {
            panic!("expected a multi line string");
        };
        assert_eq!(multi.coordinates.len(), 2);
        assert_eq!(multi.offset.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn polygon_loses_small_holes_and_dies_with_its_outer_ring() {
        let outer = line(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let hole = line(&[(3.0, 1.0), (3.5, 1.0), (3.5, 2.0), (3.0, 1.0)]);
        let polygon = VectorGeometry::Polygon(Shape::new(vec![outer, hole]));
        let Some(VectorGeometry::Polygon(kept)) = polygon.clip(Axis::X, 0.0, 2.0, 0.0) else {
            panic!("outer ring overlaps the slab");
        };
        assert_eq!(kept.coordinates.len(), 1);
        assert!(polygon.clip(Axis::X, 5.0, 6.0, 0.0).is_none());
    }

    #[test]
    fn bounds_follow_the_clip() {
        let diagonal = line(&[(0.0, 0.0), (4.0, 4.0)]);
        let mut geometry = VectorGeometry::LineString(Shape::new(diagonal));
        geometry.build_bbox();
        let clipped = geometry.clip_rect(1.0, 2.0, 0.0, 4.0, 0.0).unwrap();
        assert_eq!(clipped.bbox(), Some(&BBox::new(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn features_without_geometry_left_are_dropped() {
        let at = |x: f64| VectorGeometry::Point(Shape::new(VectorPoint::new(x, 0.5)));
        let inside = VectorFeature::new(at(0.5));
        let outside = VectorFeature::new(at(2.0));
        let kept = clip_features(&[inside.clone(), outside], Axis::X, 0.0, 1.0, 0.0);
        assert_eq!(kept, vec![inside]);
    }
}
