// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hilbert-curve cell identifiers.
//!
//! A [`CellId`] packs a face, a position along that face's Hilbert curve and
//! the cell's level into one `u64`:
//!
//! ```text
//! fff pp pp .. pp 1 00 .. 00
//! |   |           |
//! |   |           sentinel bit at 2 * (30 - level)
//! |   two bits per level, most significant level first
//! face
//! ```
//!
//! Sorting ids sorts cells along the curve, and every descendant of a cell has
//! an id inside that cell's [`range`](CellId::range).

use kurbo::Rect;

use crate::coords::{
    LIMIT_IJ, from_st, ij_to_st, lon_lat_to_xyz, quadratic_st_to_uv, quadratic_uv_to_st,
    si_ti_to_st, st_to_ij, xyz_to_face_uv, xyz_to_lon_lat,
};
use crate::face::Face;
use crate::point::Point3D;

/// Deepest subdivision level; leaf cells live here.
pub const MAX_LEVEL: u8 = 30;

/// Number of cube faces.
pub const NUM_FACES: u8 = 6;

/// Number of bits holding the face.
pub const FACE_BITS: u32 = 3;

/// Number of bits below the face: two per level plus the sentinel.
pub const POS_BITS: u32 = 2 * MAX_LEVEL as u32 + 1;

const LOOKUP_BITS: u32 = 4;
const SWAP_MASK: usize = 0b01;
const INVERT_MASK: usize = 0b10;

/// Distance between the first face-0 id and one past the last face-5 id.
const WRAP_OFFSET: u64 = 6 << POS_BITS;

/// Orientation change applied after visiting each sub-position.
const POS_TO_ORIENTATION: [usize; 4] = [SWAP_MASK, 0, 0, INVERT_MASK | SWAP_MASK];

/// Quadrant `(i << 1) | j` visited at each sub-position, per orientation.
const POS_TO_IJ: [[usize; 4]; 4] = [[0, 1, 3, 2], [0, 2, 3, 1], [3, 2, 0, 1], [3, 1, 0, 2]];

/// Lookup tables for one 16x16 block of the curve.
///
/// `pos` maps `(i << 4 | j) << 2 | orientation` to `position << 2 | orientation`
/// and `ij` is its inverse. Encoding and decoding walk eight such blocks.
struct Lookup {
    pos: [u16; 1024],
    ij: [u16; 1024],
}

static LOOKUP: Lookup = Lookup::build();

impl Lookup {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Table entries are at most 10 bits wide."
    )]
    const fn build() -> Self {
        let mut pos = [0_u16; 1024];
        let mut ij = [0_u16; 1024];
        let mut origin = 0;
        while origin < 4 {
            let mut position = 0;
            while position < 256 {
                let mut orientation = origin;
                let (mut i, mut j) = (0, 0);
                let mut level = 0;
                while level < LOOKUP_BITS as usize {
                    let sub = (position >> (2 * (3 - level))) & 3;
                    let quadrant = POS_TO_IJ[orientation][sub];
                    i = (i << 1) | (quadrant >> 1);
                    j = (j << 1) | (quadrant & 1);
                    orientation ^= POS_TO_ORIENTATION[sub];
                    level += 1;
                }
                let cell = (i << LOOKUP_BITS) | j;
                pos[(cell << 2) | origin] = ((position << 2) | orientation) as u16;
                ij[(position << 2) | origin] = ((cell << 2) | orientation) as u16;
                position += 1;
            }
            origin += 1;
        }
        Self { pos, ij }
    }
}

/// A cell of the cube-sphere hierarchy, identified by its Hilbert position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct CellId(pub u64);

impl CellId {
    /// Wrap a raw id without validation.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw 64-bit id.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The level-0 cell covering a whole face.
    #[inline]
    pub const fn from_face(face: Face) -> Self {
        Self(((face.index() as u64) << POS_BITS) + Self::lsb_for_level(0))
    }

    /// The leaf cell at grid coordinates `(i, j)` of `face`.
    ///
    /// `i` and `j` must be below `2^30`.
    pub fn from_face_ij(face: Face, i: u32, j: u32) -> Self {
        let mut n = u64::from(face.index()) << (POS_BITS - 1);
        let mut bits = usize::from(face.index()) & SWAP_MASK;
        let mask = (1 << LOOKUP_BITS) - 1;
        for k in (0..8_u32).rev() {
            bits += (((i >> (k * LOOKUP_BITS)) & mask) as usize) << (LOOKUP_BITS + 2);
            bits += (((j >> (k * LOOKUP_BITS)) & mask) as usize) << 2;
            bits = usize::from(LOOKUP.pos[bits]);
            n |= ((bits >> 2) as u64) << (k * 2 * LOOKUP_BITS);
            bits &= SWAP_MASK | INVERT_MASK;
        }
        Self(n * 2 + 1)
    }

    /// The cell at `level` whose grid coordinates at that level are `(i, j)`.
    ///
    /// `i` and `j` must be below `2^level`.
    pub fn from_face_ij_level(face: Face, i: u32, j: u32, level: u8) -> Self {
        assert!(level <= MAX_LEVEL, "level {level} is deeper than {MAX_LEVEL}");
        let shift = MAX_LEVEL - level;
        Self::from_face_ij(face, i << shift, j << shift).parent_at(level)
    }

    /// The leaf cell containing `p`.
    pub fn from_point(p: Point3D) -> Self {
        let (face, u, v) = xyz_to_face_uv(p);
        Self::from_face_ij(
            face,
            st_to_ij(quadratic_uv_to_st(u)),
            st_to_ij(quadratic_uv_to_st(v)),
        )
    }

    /// The leaf cell containing a longitude/latitude in degrees.
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self::from_point(lon_lat_to_xyz(lon, lat))
    }

    /// The leaf cell at face ST coordinates.
    pub fn from_face_st(face: Face, s: f64, t: f64) -> Self {
        Self::from_face_ij(face, st_to_ij(s), st_to_ij(t))
    }

    /// The leaf cell at face UV coordinates.
    pub fn from_face_uv(face: Face, u: f64, v: f64) -> Self {
        Self::from_face_st(face, quadratic_uv_to_st(u), quadratic_uv_to_st(v))
    }

    /// The leaf cell at grid coordinates that may fall just outside `face`.
    ///
    /// Coordinates past an edge are folded onto the adjacent face, which is
    /// how neighbours are found across face boundaries.
    pub fn from_face_ij_wrap(face: Face, i: i64, j: i64) -> Self {
        let max = i64::from(LIMIT_IJ);
        let scale = 1.0 / f64::from(LIMIT_IJ);
        let limit = 1.0 + f64::EPSILON;
        let to_uv =
            |k: i64| (scale * (2 * (k.clamp(-1, max) - max / 2) + 1) as f64).clamp(-limit, limit);
        let (face, u, v) = xyz_to_face_uv(face.uv_to_xyz(to_uv(i), to_uv(j)));
        Self::from_face_ij(face, st_to_ij(0.5 * (u + 1.0)), st_to_ij(0.5 * (v + 1.0)))
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Coordinates are inside the face grid whenever `same_face` holds."
    )]
    fn from_face_ij_same(face: Face, i: i64, j: i64, same_face: bool) -> Self {
        if same_face {
            Self::from_face_ij(face, i as u32, j as u32)
        } else {
            Self::from_face_ij_wrap(face, i, j)
        }
    }

    /// Face index stored in the top bits. Invalid ids may report 6 or 7.
    #[allow(clippy::cast_possible_truncation, reason = "Only 3 bits remain.")]
    #[inline]
    pub const fn face_index(self) -> u8 {
        (self.0 >> POS_BITS) as u8
    }

    /// Face of the cell.
    ///
    /// # Panics
    ///
    /// Panics if the id does not encode a face, which only happens for ids
    /// that were not produced by this module.
    #[inline]
    pub const fn face(self) -> Face {
        match Face::from_index(self.face_index()) {
            Some(face) => face,
            None => panic!("cell id does not encode a face"),
        }
    }

    /// The lowest set bit, which marks the level.
    #[inline]
    pub const fn lsb(self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    /// The lowest set bit of every cell at `level`.
    #[inline]
    pub const fn lsb_for_level(level: u8) -> u64 {
        1 << (2 * (MAX_LEVEL - level))
    }

    /// Position along the face's Hilbert curve, including the sentinel bit.
    #[inline]
    pub const fn pos(self) -> u64 {
        self.0 & (u64::MAX >> FACE_BITS)
    }

    /// Subdivision level, from 0 (face) to 30 (leaf).
    #[allow(clippy::cast_possible_truncation, reason = "At most 32.")]
    #[inline]
    pub const fn level(self) -> u8 {
        debug_assert!(self.0 != 0, "the zero id has no level");
        MAX_LEVEL - (self.0.trailing_zeros() >> 1) as u8
    }

    /// Whether this id encodes a face and a sentinel on an even bit.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.face_index() < NUM_FACES && (self.lsb() & 0x1555_5555_5555_5555) != 0
    }

    /// Whether this is a level-0 face cell.
    #[inline]
    pub const fn is_face(self) -> bool {
        self.0 & (Self::lsb_for_level(0) - 1) == 0
    }

    /// Whether this is a level-30 leaf cell.
    #[inline]
    pub const fn is_leaf(self) -> bool {
        self.0 & 1 != 0
    }

    /// Side length of a cell at `level`, in leaf cells.
    #[inline]
    pub const fn size_ij(level: u8) -> u32 {
        1 << (MAX_LEVEL - level)
    }

    /// The immediate parent. Must not be called on a face cell.
    #[inline]
    pub const fn parent(self) -> Self {
        let new_lsb = self.lsb() << 2;
        Self((self.0 & new_lsb.wrapping_neg()) | new_lsb)
    }

    /// The ancestor at `level`, which must not be deeper than this cell.
    #[inline]
    pub const fn parent_at(self, level: u8) -> Self {
        let new_lsb = Self::lsb_for_level(level);
        Self((self.0 & new_lsb.wrapping_neg()) | new_lsb)
    }

    /// Child at Hilbert position `position` (0..4). Must not be called on a leaf.
    #[inline]
    pub const fn child(self, position: u8) -> Self {
        assert!(position < 4, "child position out of range");
        let new_lsb = self.lsb() >> 2;
        Self(
            self.0
                .wrapping_add((2 * position as u64).wrapping_sub(3).wrapping_mul(new_lsb)),
        )
    }

    /// The four children, ordered for the given curve orientation.
    ///
    /// Orientation 0 yields Hilbert order; any other orientation walks the
    /// last three children in reverse.
    pub fn children(self, orientation: u8) -> [Self; 4] {
        let mut children = [self.child(0), self.child(3), self.child(2), self.child(1)];
        if orientation == 0 {
            children.swap(1, 3);
        }
        children
    }

    /// Which child of its parent at `level - 1` this cell descends from, 0..4.
    #[allow(clippy::cast_possible_truncation, reason = "Masked to 2 bits.")]
    #[inline]
    pub const fn child_position(self, level: u8) -> u8 {
        ((self.0 >> (2 * (MAX_LEVEL - level) + 1)) & 3) as u8
    }

    /// First descendant at `level`.
    #[inline]
    pub const fn child_begin_at(self, level: u8) -> Self {
        Self(self.0 - self.lsb() + Self::lsb_for_level(level))
    }

    /// One past the last descendant at `level`, in curve order.
    #[inline]
    pub const fn child_end_at(self, level: u8) -> Self {
        Self(self.0 + self.lsb() + Self::lsb_for_level(level))
    }

    /// The four children of grid cell `(i, j)` at `level`, in quadrant order:
    /// bottom-left, bottom-right, top-left, top-right.
    pub fn children_ij(face: Face, level: u8, i: u32, j: u32) -> [Self; 4] {
        let (i, j, level) = (i << 1, j << 1, level + 1);
        [
            Self::from_face_ij_level(face, i, j, level),
            Self::from_face_ij_level(face, i + 1, j, level),
            Self::from_face_ij_level(face, i, j + 1, level),
            Self::from_face_ij_level(face, i + 1, j + 1, level),
        ]
    }

    /// Smallest leaf id inside this cell.
    #[inline]
    pub const fn range_min(self) -> Self {
        Self(self.0 - (self.lsb() - 1))
    }

    /// Largest leaf id inside this cell.
    #[inline]
    pub const fn range_max(self) -> Self {
        Self(self.0 + (self.lsb() - 1))
    }

    /// Inclusive `[min, max]` leaf ids covered by this cell.
    #[inline]
    pub const fn range(self) -> (Self, Self) {
        (self.range_min(), self.range_max())
    }

    /// Whether `other` is this cell or one of its descendants.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.range_min().0 <= other.0 && other.0 <= self.range_max().0
    }

    /// Whether the two cells overlap (one contains the other).
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        other.range_min().0 <= self.range_max().0 && other.range_max().0 >= self.range_min().0
    }

    /// Next cell at the same level, in curve order. May step past face 5.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(self.lsb() << 1))
    }

    /// Previous cell at the same level, in curve order. May step before face 0.
    #[inline]
    pub const fn prev(self) -> Self {
        Self(self.0.wrapping_sub(self.lsb() << 1))
    }

    /// Like [`next`](Self::next), but the last cell wraps to the first.
    pub const fn next_wrap(self) -> Self {
        let next = self.next();
        if next.0 < WRAP_OFFSET {
            next
        } else {
            Self(next.0.wrapping_sub(WRAP_OFFSET))
        }
    }

    /// Like [`prev`](Self::prev), but the first cell wraps to the last.
    pub const fn prev_wrap(self) -> Self {
        let prev = self.prev();
        if prev.0 < WRAP_OFFSET {
            prev
        } else {
            Self(prev.0.wrapping_add(WRAP_OFFSET))
        }
    }

    /// Face, leaf-grid `(i, j)` and Hilbert orientation of this cell.
    ///
    /// For non-leaf cells `(i, j)` is a leaf near the cell centre.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Table entries are at most 10 bits wide."
    )]
    pub fn to_face_ij_orientation(self) -> (Face, u32, u32, u8) {
        let face = self.face();
        let mut bits = usize::from(face.index()) & SWAP_MASK;
        let (mut i, mut j) = (0_u32, 0_u32);
        for k in (0..8_u32).rev() {
            let nbits = if k == 7 {
                u32::from(MAX_LEVEL) - 7 * LOOKUP_BITS
            } else {
                LOOKUP_BITS
            };
            bits += (((self.0 >> (k * 2 * LOOKUP_BITS + 1)) & ((1 << (2 * nbits)) - 1)) as usize)
                << 2;
            bits = usize::from(LOOKUP.ij[bits]);
            i += ((bits >> (LOOKUP_BITS + 2)) as u32) << (k * LOOKUP_BITS);
            j += (((bits >> 2) & 15) as u32) << (k * LOOKUP_BITS);
            bits &= SWAP_MASK | INVERT_MASK;
        }
        // Cells at odd levels start their sub-curve transposed.
        if self.lsb() & 0x1111_1111_1111_1110 != 0 {
            bits ^= SWAP_MASK;
        }
        (face, i, j, bits as u8)
    }

    /// Face, grid coordinates at the cell's own level, and the level.
    pub fn to_face_ij(self) -> (Face, u32, u32, u8) {
        let (face, i, j, _) = self.to_face_ij_orientation();
        let level = self.level();
        let shift = MAX_LEVEL - level;
        (face, i >> shift, j >> shift, level)
    }

    fn center_si_ti(self) -> (Face, u64, u64) {
        let (face, i, j, _) = self.to_face_ij_orientation();
        let delta = if self.is_leaf() {
            1
        } else if ((u64::from(i) ^ (self.0 >> 2)) & 1) != 0 {
            2
        } else {
            0
        };
        (face, 2 * u64::from(i) + delta, 2 * u64::from(j) + delta)
    }

    /// Face and ST coordinates of the cell centre.
    pub fn center_st(self) -> (Face, f64, f64) {
        let (face, si, ti) = self.center_si_ti();
        (face, si_ti_to_st(si), si_ti_to_st(ti))
    }

    /// Unit-sphere point at the cell centre.
    pub fn to_point(self) -> Point3D {
        let (face, s, t) = self.center_st();
        from_st(face, s, t)
    }

    /// Longitude/latitude in degrees of the cell centre.
    pub fn to_lon_lat(self) -> (f64, f64) {
        xyz_to_lon_lat(self.to_point())
    }

    /// Bounds of the cell in its face's ST space.
    pub fn bounds_st(self) -> Rect {
        let level = self.level();
        let size = Self::size_ij(level);
        let (_, i, j, _) = self.to_face_ij_orientation();
        let s = ij_to_st(i & !(size - 1));
        let t = ij_to_st(j & !(size - 1));
        let d = ij_to_st(size);
        Rect::new(s, t, s + d, t + d)
    }

    /// Bounds of the cell in its face's UV space.
    pub fn bounds_uv(self) -> Rect {
        let st = self.bounds_st();
        Rect::new(
            quadratic_st_to_uv(st.x0),
            quadratic_st_to_uv(st.y0),
            quadratic_st_to_uv(st.x1),
            quadratic_st_to_uv(st.y1),
        )
    }

    /// Unit-length corners in counter-clockwise order, starting bottom-left.
    pub fn vertices(self) -> [Point3D; 4] {
        let face = self.face();
        let uv = self.bounds_uv();
        [
            face.uv_to_xyz(uv.x0, uv.y0).normalize(),
            face.uv_to_xyz(uv.x1, uv.y0).normalize(),
            face.uv_to_xyz(uv.x1, uv.y1).normalize(),
            face.uv_to_xyz(uv.x0, uv.y1).normalize(),
        ]
    }

    /// Inward-facing normals of the great circles through each edge.
    ///
    /// Edge `k` runs from vertex `k` to vertex `k + 1`. Not unit length.
    pub fn edges_raw(self) -> [Point3D; 4] {
        let face = self.face();
        let uv = self.bounds_uv();
        [
            face.v_norm(uv.y0),
            face.u_norm(uv.x1),
            -face.v_norm(uv.y1),
            -face.u_norm(uv.x0),
        ]
    }

    /// Whether the point lies inside the cell (boundaries included).
    pub fn contains_point(self, p: Point3D) -> bool {
        let Some((u, v)) = self.face().xyz_to_uv(p) else {
            return false;
        };
        let uv = self.bounds_uv();
        let e = 2.0 * f64::EPSILON;
        uv.x0 - e <= u && u <= uv.x1 + e && uv.y0 - e <= v && v <= uv.y1 + e
    }

    /// The four neighbours sharing an edge: bottom, right, top, left.
    ///
    /// Neighbours across a face boundary are returned at the same level on
    /// the adjacent face.
    pub fn edge_neighbors(self) -> [Self; 4] {
        let level = self.level();
        let size = i64::from(Self::size_ij(level));
        let max = i64::from(LIMIT_IJ);
        let (face, i, j, _) = self.to_face_ij_orientation();
        let (i, j) = (i64::from(i), i64::from(j));
        [
            Self::from_face_ij_same(face, i, j - size, j - size >= 0).parent_at(level),
            Self::from_face_ij_same(face, i + size, j, i + size < max).parent_at(level),
            Self::from_face_ij_same(face, i, j + size, j + size < max).parent_at(level),
            Self::from_face_ij_same(face, i - size, j, i - size >= 0).parent_at(level),
        ]
    }
}
