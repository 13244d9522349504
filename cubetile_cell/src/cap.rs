// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spherical caps and their cell coverings.

use alloc::vec::Vec;

use crate::chord_angle::ChordAngle;
use crate::face::Face;
use crate::id::CellId;
use crate::metrics::MAX_EDGE;
use crate::point::Point3D;

/// A disc on the unit sphere: every point within `radius` of `center`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cap {
    center: Point3D,
    radius: ChordAngle,
}

impl Cap {
    /// Cap around `center` (unit length) with the given radius.
    pub fn new(center: Point3D, radius: ChordAngle) -> Self {
        Self { center, radius }
    }

    /// Cap containing only `center`.
    pub fn from_point(center: Point3D) -> Self {
        Self::new(center, ChordAngle::ZERO)
    }

    /// The cap containing nothing.
    pub const fn empty() -> Self {
        Self {
            center: Point3D::new(1.0, 0.0, 0.0),
            radius: ChordAngle::NEGATIVE,
        }
    }

    /// The cap containing the whole sphere.
    pub const fn full() -> Self {
        Self {
            center: Point3D::new(1.0, 0.0, 0.0),
            radius: ChordAngle::STRAIGHT,
        }
    }

    /// Centre of the cap.
    pub fn center(&self) -> Point3D {
        self.center
    }

    /// Radius of the cap.
    pub fn radius(&self) -> ChordAngle {
        self.radius
    }

    /// Whether the cap contains no points.
    pub fn is_empty(&self) -> bool {
        self.radius.is_negative()
    }

    /// Whether the cap contains every point.
    pub fn is_full(&self) -> bool {
        self.radius.length2() >= ChordAngle::MAX_LENGTH2
    }

    /// Whether `p` (unit length) lies in the cap, boundary included.
    pub fn contains_point(&self, p: Point3D) -> bool {
        ChordAngle::from_points(self.center, p) <= self.radius
    }

    /// Whether the cap meets `cell` anywhere other than at its corners.
    ///
    /// `vertices` must be the cell's corners, none of which is inside the cap.
    pub fn intersects_cell(&self, cell: CellId, vertices: &[Point3D; 4]) -> bool {
        // A hemisphere or larger that holds no corner cannot reach inside the
        // cell: both the cell and the cap's complement are convex.
        if self.radius >= ChordAngle::RIGHT || self.is_empty() {
            return false;
        }
        if cell.contains_point(self.center) {
            return true;
        }
        // Otherwise the cap must cross the interior of an edge.
        let sin2 = self.radius.sin2();
        for (k, edge) in cell.edges_raw().into_iter().enumerate() {
            let dot = self.center.dot(edge);
            if dot > 0.0 {
                // The centre is on the inner side of this edge; if the cap
                // crossed it, it would cross the opposite edge too.
                continue;
            }
            if dot * dot > sin2 * edge.norm2() {
                return false;
            }
            // The edge's great circle passes through the cap; check that the
            // closest approach falls between the edge's endpoints.
            let dir = edge.cross(self.center);
            if dir.dot(vertices[k]) < 0.0 && dir.dot(vertices[(k + 1) & 3]) > 0.0 {
                return true;
            }
        }
        false
    }

    /// Cells whose union covers the cap.
    ///
    /// Starting from the six faces, a cell whose four corners are all inside
    /// is kept whole. A cell with some corners inside, or with none inside
    /// but an edge or its interior crossing the cap, is subdivided until the
    /// level picked by [`MAX_EDGE`] for the radius, where it is kept as is.
    /// Every other cell is dropped, so no point of the cap is left uncovered.
    pub fn covering(&self) -> Vec<CellId> {
        let mut cells = Vec::new();
        if self.is_empty() {
            return cells;
        }
        let max_level = MAX_EDGE.closest_level(self.radius.to_radians());
        let mut stack: Vec<CellId> = Face::ALL.into_iter().map(CellId::from_face).collect();
        while let Some(cell) = stack.pop() {
            let vertices = cell.vertices();
            let inside = vertices.iter().filter(|v| self.contains_point(**v)).count();
            if inside == 4 {
                cells.push(cell);
                continue;
            }
            if inside == 0 && !self.intersects_cell(cell, &vertices) {
                continue;
            }
            if cell.level() >= max_level {
                cells.push(cell);
            } else {
                stack.extend(cell.children(0));
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::lon_lat_to_xyz;

    #[test]
    fn empty_and_full() {
        assert!(Cap::empty().is_empty());
        assert!(Cap::empty().covering().is_empty());
        assert!(Cap::full().is_full());
        let mut faces = Cap::full().covering();
        faces.sort();
        let expected: Vec<_> = Face::ALL.into_iter().map(CellId::from_face).collect();
        assert_eq!(faces, expected);
    }

    #[test]
    fn contains_point_respects_radius() {
        let cap = Cap::new(lon_lat_to_xyz(0.0, 0.0), ChordAngle::from_degrees(2.0));
        assert!(cap.contains_point(lon_lat_to_xyz(1.0, 1.0)));
        assert!(!cap.contains_point(lon_lat_to_xyz(3.0, 0.0)));
        let p = lon_lat_to_xyz(5.0, 5.0);
        assert!(Cap::from_point(p).contains_point(p));
    }

    #[test]
    fn small_cap_inside_a_big_cell_is_found() {
        // No corner of face 0 is anywhere near this cap.
        let center = lon_lat_to_xyz(0.0, 0.0);
        let cap = Cap::new(center, ChordAngle::from_degrees(0.5));
        let face = CellId::from_face(Face::PosX);
        assert!(cap.intersects_cell(face, &face.vertices()));
        let opposite = CellId::from_face(Face::NegX);
        assert!(!cap.intersects_cell(opposite, &opposite.vertices()));
    }

    #[test]
    fn covering_contains_every_point_of_the_cap() {
        let targets = [(0.0, 0.0), (45.0, 35.26), (-135.0, -80.0), (179.9, 0.1)];
        for (lon, lat) in targets {
            let cap = Cap::new(lon_lat_to_xyz(lon, lat), ChordAngle::from_degrees(3.0));
            let covering = cap.covering();
            assert!(!covering.is_empty());
            for k in 0..36_u32 {
                let bearing = f64::from(k) * 10.0;
                for step in [0.0, 1.0, 2.0, 2.9] {
                    let (sin, cos) = bearing.to_radians().sin_cos();
                    let (dlon, dlat) = (step * cos, step * sin);
                    let p = lon_lat_to_xyz(lon + dlon, (lat + dlat).clamp(-90.0, 90.0));
                    if !cap.contains_point(p) {
                        continue;
                    }
                    let leaf = CellId::from_point(p);
                    assert!(
                        covering.iter().any(|cell| cell.contains(leaf)),
                        "point near ({lon}, {lat}) escaped the covering"
                    );
                }
            }
        }
    }

    #[test]
    fn covering_cells_are_disjoint() {
        let cap = Cap::new(lon_lat_to_xyz(10.0, 20.0), ChordAngle::from_degrees(5.0));
        let covering = cap.covering();
        for (a, cell) in covering.iter().enumerate() {
            for other in &covering[a + 1..] {
                assert!(!cell.intersects(*other), "{cell:?} overlaps {other:?}");
            }
        }
    }
}
