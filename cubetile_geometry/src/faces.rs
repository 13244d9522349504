// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Carrying face ST coordinates across cube edges.
//!
//! A geometry that spans several faces is clipped once per face, and for that
//! every vertex has to be expressed in the frame of the face being clipped.
//! Neighbouring faces share an edge, and crossing it is a quarter turn (or
//! none) followed by a shift of one face width, so a vertex on a neighbour
//! lands just outside `0..1` in the right place. The face opposite the target
//! has no shared edge; its vertices are pushed two widths away, which keeps
//! them well outside any buffered clip.

use cubetile_cell::Face;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Turn {
    None,
    /// `(s, t) -> (-t, s)`
    Ccw,
    /// `(s, t) -> (t, -s)`
    Cw,
}

#[derive(Copy, Clone, Debug)]
struct Rule {
    turn: Turn,
    ds: f64,
    dt: f64,
}

const fn rule(turn: Turn, ds: f64, dt: f64) -> Rule {
    Rule { turn, ds, dt }
}

const SAME: Rule = rule(Turn::None, 0.0, 0.0);
const OPPOSITE: Rule = rule(Turn::Cw, 2.0, 1.0);

/// `RULES[target][source]`.
const RULES: [[Rule; 6]; 6] = [
    [
        SAME,
        rule(Turn::None, 1.0, 0.0),
        rule(Turn::Ccw, 1.0, 1.0),
        OPPOSITE,
        rule(Turn::Cw, -1.0, 1.0),
        rule(Turn::None, 0.0, -1.0),
    ],
    [
        rule(Turn::None, -1.0, 0.0),
        SAME,
        rule(Turn::None, 0.0, 1.0),
        rule(Turn::Cw, 1.0, 1.0),
        OPPOSITE,
        rule(Turn::Ccw, 1.0, -1.0),
    ],
    [
        rule(Turn::Cw, -1.0, 1.0),
        rule(Turn::None, 0.0, -1.0),
        SAME,
        rule(Turn::None, 1.0, 0.0),
        rule(Turn::Ccw, 1.0, 1.0),
        OPPOSITE,
    ],
    [
        OPPOSITE,
        rule(Turn::Ccw, 1.0, -1.0),
        rule(Turn::None, -1.0, 0.0),
        SAME,
        rule(Turn::None, 0.0, 1.0),
        rule(Turn::Cw, 1.0, 1.0),
    ],
    [
        rule(Turn::Ccw, 1.0, 1.0),
        OPPOSITE,
        rule(Turn::Cw, -1.0, 1.0),
        rule(Turn::None, 0.0, -1.0),
        SAME,
        rule(Turn::None, 1.0, 0.0),
    ],
    [
        rule(Turn::None, 0.0, 1.0),
        rule(Turn::Cw, 1.0, 1.0),
        OPPOSITE,
        rule(Turn::Ccw, 1.0, -1.0),
        rule(Turn::None, -1.0, 0.0),
        SAME,
    ],
];

/// Express `(s, t)` on `source` in the ST frame of `target`.
pub fn st_in_face_frame(source: Face, target: Face, s: f64, t: f64) -> (f64, f64) {
    let Rule { turn, ds, dt } = RULES[usize::from(target.index())][usize::from(source.index())];
    let (s, t) = match turn {
        Turn::None => (s, t),
        Turn::Ccw => (-t, s),
        Turn::Cw => (t, -s),
    };
    (s + ds, t + dt)
}

#[cfg(test)]
mod tests {
    use cubetile_cell::coords::{from_st, quadratic_uv_to_st};

    use super::*;

    fn is_opposite(a: Face, b: Face) -> bool {
        a.index() % 3 == b.index() % 3 && a != b
    }

    #[test]
    fn same_face_is_identity() {
        for face in Face::ALL {
            assert_eq!(st_in_face_frame(face, face, 0.25, 0.75), (0.25, 0.75));
        }
    }

    #[test]
    fn shared_edges_line_up() {
        // Walk the boundary of every face; wherever the boundary also lies on
        // the boundary of a neighbour, the stitched coordinates must agree with
        // that neighbour's own.
        for source in Face::ALL {
            for k in 0..=16_u32 {
                let a = f64::from(k) / 16.0;
                for (s, t) in [(0.0, a), (1.0, a), (a, 0.0), (a, 1.0)] {
                    let p = from_st(source, s, t);
                    for target in Face::ALL {
                        if target == source || is_opposite(source, target) {
                            continue;
                        }
                        let Some((u, v)) = target.xyz_to_uv(p) else {
                            continue;
                        };
                        if u.abs() > 1.0 + 1e-12 || v.abs() > 1.0 + 1e-12 {
                            continue;
                        }
                        let (es, et) = (quadratic_uv_to_st(u), quadratic_uv_to_st(v));
                        let (gs, gt) = st_in_face_frame(source, target, s, t);
                        assert!(
                            (gs - es).abs() < 1e-9 && (gt - et).abs() < 1e-9,
                            "{source:?} -> {target:?} at ({s}, {t}): got ({gs}, {gt}), want ({es}, {et})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn opposite_faces_land_far_away() {
        for target in Face::ALL {
            let source = Face::ALL[usize::from((target.index() + 3) % 6)];
            let (s, t) = st_in_face_frame(source, target, 0.5, 0.5);
            assert!(s > 1.25 || t > 1.25 || s < -0.25 || t < -0.25, "({s}, {t})");
        }
    }
}
