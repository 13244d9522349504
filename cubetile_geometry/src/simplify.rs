// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Douglas-Peucker weights and zoom-dependent simplification.
//!
//! Weights are computed once, right after conversion, and stored on each
//! vertex as `t`. Simplifying for a zoom then only compares `t` against that
//! zoom's tolerance.

use alloc::vec::Vec;

use crate::geometry::{Line, VectorGeometry};
use crate::point::VectorPoint;

/// Tile side in extent units; tolerances are expressed in these.
pub const TILE_EXTENT: f64 = 4096.0;

fn zoom_scale(zoom: u8) -> f64 {
    f64::from(1_u32 << zoom) * TILE_EXTENT
}

/// Assign Douglas-Peucker weights to every line and ring of `geometry`.
///
/// The ends of each line get `t = 1`. An interior vertex picked as a split
/// point gets its squared distance to the chord it splits, provided that
/// exceeds `(tolerance / (2^maxzoom * 4096))^2`; all others keep no weight.
pub fn build_sq_dists(geometry: &mut VectorGeometry, tolerance: f64, maxzoom: u8) {
    let sq_tolerance = {
        let tol = tolerance / zoom_scale(maxzoom);
        tol * tol
    };
    match geometry {
        VectorGeometry::Point(_) | VectorGeometry::MultiPoint(_) => {}
        VectorGeometry::LineString(s) => weigh_line(&mut s.coordinates, sq_tolerance),
        VectorGeometry::MultiLineString(s) | VectorGeometry::Polygon(s) => {
            for line in &mut s.coordinates {
                weigh_line(line, sq_tolerance);
            }
        }
        VectorGeometry::MultiPolygon(s) => {
            for line in s.coordinates.iter_mut().flatten() {
                weigh_line(line, sq_tolerance);
            }
        }
    }
}

fn weigh_line(line: &mut [VectorPoint], sq_tolerance: f64) {
    let Some(last) = line.len().checked_sub(1) else {
        return;
    };
    line[0].t = Some(1.0);
    weigh_span(line, 0, last, sq_tolerance);
    line[last].t = Some(1.0);
}

fn weigh_span(line: &mut [VectorPoint], first: usize, last: usize, sq_tolerance: f64) {
    let mid = (last - first) >> 1;
    let mut max_sq_dist = sq_tolerance;
    let mut min_pos_to_mid = last - first;
    let mut index = None;
    let (a, b) = (&line[first], &line[last]);

    for (i, p) in line.iter().enumerate().take(last).skip(first + 1) {
        let d = sq_seg_dist(p, a, b);
        if d > max_sq_dist {
            index = Some(i);
            max_sq_dist = d;
        } else if d == max_sq_dist {
            // Prefer a split near the middle on ties so degenerate input
            // does not recurse linearly.
            let pos_to_mid = (i - first).abs_diff(mid);
            if pos_to_mid < min_pos_to_mid {
                index = Some(i);
                min_pos_to_mid = pos_to_mid;
            }
        }
    }

    if max_sq_dist > sq_tolerance
        && let Some(index) = index
    {
        if index - first > 1 {
            weigh_span(line, first, index, sq_tolerance);
        }
        line[index].t = Some(max_sq_dist);
        if last - index > 1 {
            weigh_span(line, index, last, sq_tolerance);
        }
    }
}

/// Squared distance from `p` to the segment `a`-`b`.
fn sq_seg_dist(p: &VectorPoint, a: &VectorPoint, b: &VectorPoint) -> f64 {
    let (mut x, mut y) = (a.x, a.y);
    let (dx, dy) = (b.x - x, b.y - y);
    if dx != 0.0 || dy != 0.0 {
        let m = ((p.x - x) * dx + (p.y - y) * dy) / (dx * dx + dy * dy);
        if m > 1.0 {
            (x, y) = (b.x, b.y);
        } else if m > 0.0 {
            x += dx * m;
            y += dy * m;
        }
    }
    let (dx, dy) = (p.x - x, p.y - y);
    dx * dx + dy * dy
}

fn keep_weighted(line: &[VectorPoint], sq_tolerance: f64) -> Line {
    line.iter()
        .filter(|p| sq_tolerance == 0.0 || p.t.unwrap_or(0.0) > sq_tolerance)
        .cloned()
        .collect()
}

/// Rings of one polygon. Losing the outer ring loses the whole polygon.
fn simplify_rings(
    rings: &[Line],
    offsets: Option<&Vec<f64>>,
    sq_tolerance: f64,
) -> (Vec<Line>, Option<Vec<f64>>) {
    let outer_survives = rings
        .first()
        .is_some_and(|outer| keep_weighted(outer, sq_tolerance).len() >= 4);
    if !outer_survives {
        return (Vec::new(), offsets.map(|_| Vec::new()));
    }
    simplify_lines(rings, offsets, sq_tolerance, 4)
}

fn simplify_lines(
    lines: &[Line],
    offsets: Option<&Vec<f64>>,
    sq_tolerance: f64,
    min_len: usize,
) -> (Vec<Line>, Option<Vec<f64>>) {
    let mut kept = Vec::with_capacity(lines.len());
    let mut kept_offsets = offsets.map(|_| Vec::with_capacity(lines.len()));
    for (k, line) in lines.iter().enumerate() {
        let line = keep_weighted(line, sq_tolerance);
        if line.len() < min_len {
            continue;
        }
        kept.push(line);
        if let (Some(kept_offsets), Some(offsets)) = (&mut kept_offsets, offsets) {
            kept_offsets.push(offsets.get(k).copied().unwrap_or(0.0));
        }
    }
    (kept, kept_offsets)
}

/// Drop vertices too unimportant for tile zoom `zoom`.
///
/// A vertex survives when its weight exceeds
/// `(tolerance / (2^zoom * 4096))^2`; at or past `maxzoom` nothing is dropped.
/// Lines left with fewer than two vertices and rings left with fewer than four
/// are removed. The geometry may end up [empty](VectorGeometry::is_empty).
pub fn simplify(geometry: &mut VectorGeometry, tolerance: f64, zoom: u8, maxzoom: u8) {
    let sq_tolerance = if zoom >= maxzoom {
        0.0
    } else {
        let tol = tolerance / zoom_scale(zoom);
        tol * tol
    };
    match geometry {
        VectorGeometry::Point(_) | VectorGeometry::MultiPoint(_) => {}
        VectorGeometry::LineString(s) => {
            let line = keep_weighted(&s.coordinates, sq_tolerance);
            s.coordinates = if line.len() < 2 { Vec::new() } else { line };
        }
        VectorGeometry::MultiLineString(s) => {
            let (lines, offsets) =
                simplify_lines(&s.coordinates, s.offset.as_ref(), sq_tolerance, 2);
            s.coordinates = lines;
            s.offset = offsets;
        }
        VectorGeometry::Polygon(s) => {
            let (rings, offsets) = simplify_rings(&s.coordinates, s.offset.as_ref(), sq_tolerance);
            s.coordinates = rings;
            s.offset = offsets;
        }
        VectorGeometry::MultiPolygon(s) => {
            let mut polygons = Vec::with_capacity(s.coordinates.len());
            let mut offsets = s.offset.as_ref().map(|_| Vec::new());
            for (k, polygon) in s.coordinates.iter().enumerate() {
                let ring_offsets = s.offset.as_ref().and_then(|o| o.get(k));
                let (rings, ring_offsets) = simplify_rings(polygon, ring_offsets, sq_tolerance);
                if rings.is_empty() {
                    continue;
                }
                polygons.push(rings);
                if let Some(offsets) = &mut offsets {
                    offsets.push(ring_offsets.unwrap_or_default());
                }
            }
            s.coordinates = polygons;
            s.offset = offsets;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::geometry::Shape;

    const MAXZOOM: u8 = 16;

    fn line(coords: &[(f64, f64)]) -> Line {
        coords.iter().map(|&(x, y)| VectorPoint::new(x, y)).collect()
    }

    fn weights(points: &[VectorPoint]) -> Vec<Option<f64>> {
        points.iter().map(|p| p.t).collect()
    }

    #[test]
    fn weights_square_path() {
        let mut geometry = VectorGeometry::LineString(Shape::new(line(&[
            (0.25, 0.25),
            (0.75, 0.25),
            (0.75, 0.75),
            (0.25, 0.75),
        ])));
        build_sq_dists(&mut geometry, 3.0, MAXZOOM);
        let VectorGeometry::LineString(s) = &geometry else {
            unreachable!();
        };
        assert_eq!(weights(&s.coordinates), vec![Some(1.0), Some(0.125), Some(0.25), Some(1.0)]);

        // Every weight is far above the zoom 0 tolerance, so nothing goes.
        simplify(&mut geometry, 3.0, 0, MAXZOOM);
        let VectorGeometry::LineString(s) = &geometry else {
            unreachable!();
        };
        assert_eq!(s.coordinates.len(), 4);
    }

    #[test]
    fn ring_weights() {
        let mut geometry = VectorGeometry::Polygon(Shape::new(vec![line(&[
            (0.5, 0.5),
            (0.5, 0.25),
            (0.75, 0.25),
            (0.75, 0.5),
            (0.5, 0.5),
        ])]));
        build_sq_dists(&mut geometry, 3.0, MAXZOOM);
        let VectorGeometry::Polygon(s) = &geometry else {
            unreachable!();
        };
        assert_eq!(
            weights(&s.coordinates[0]),
            vec![Some(1.0), Some(0.03125), Some(0.125), Some(0.03125), Some(1.0)]
        );
    }

    #[test]
    fn collinear_vertices_are_dropped_below_maxzoom() {
        let mut geometry = VectorGeometry::LineString(Shape::new(line(&[
            (0.0, 0.0),
            (0.25, 0.0),
            (0.5, 0.0),
            (1.0, 0.0),
        ])));
        build_sq_dists(&mut geometry, 3.0, MAXZOOM);
        let mut coarse = geometry.clone();
        simplify(&mut coarse, 3.0, 2, MAXZOOM);
        let VectorGeometry::LineString(s) = &coarse else {
            unreachable!();
        };
        assert_eq!(s.coordinates.len(), 2);

        simplify(&mut geometry, 3.0, MAXZOOM, MAXZOOM);
        let VectorGeometry::LineString(s) = &geometry else {
            unreachable!();
        };
        assert_eq!(s.coordinates.len(), 4);
    }

    #[test]
    fn tiny_rings_disappear() {
        let ring = line(&[(0.0, 0.0), (1e-9, 0.0), (1e-9, 1e-9), (0.0, 1e-9), (0.0, 0.0)]);
        let mut geometry = VectorGeometry::MultiPolygon(Shape::new(vec![vec![ring]]));
        build_sq_dists(&mut geometry, 3.0, MAXZOOM);
        simplify(&mut geometry, 3.0, 0, MAXZOOM);
        assert!(geometry.is_empty());
    }

    #[test]
    fn polygon_goes_with_its_outer_ring() {
        let weighted = |coords: &[(f64, f64)], interior: f64| -> Line {
            let last = coords.len() - 1;
            coords
                .iter()
                .enumerate()
                .map(|(k, &(x, y))| VectorPoint {
                    t: Some(if k == 0 || k == last { 1.0 } else { interior }),
                    ..VectorPoint::new(x, y)
                })
                .collect()
        };
        let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)];
        let hole = [(0.25, 0.25), (0.25, 0.75), (0.75, 0.75), (0.75, 0.25), (0.25, 0.25)];
        let polygon = Shape::new(vec![weighted(&square, 1e-20), weighted(&hole, 1.0)])
            .with_offset(vec![0.0, 0.5]);

        let mut geometry = VectorGeometry::Polygon(polygon.clone());
        simplify(&mut geometry, 3.0, 0, MAXZOOM);
        let VectorGeometry::Polygon(s) = &geometry else {
            unreachable!();
        };
        assert!(s.coordinates.is_empty(), "hole must not become the outer ring");
        assert_eq!(s.offset, Some(Vec::new()));
        assert!(geometry.is_empty());

        let kept = vec![weighted(&hole, 1.0)];
        let mut geometry =
            VectorGeometry::MultiPolygon(Shape::new(vec![polygon.coordinates, kept.clone()]));
        simplify(&mut geometry, 3.0, 0, MAXZOOM);
        let VectorGeometry::MultiPolygon(s) = &geometry else {
            unreachable!();
        };
        assert_eq!(s.coordinates, vec![kept]);
    }
}
