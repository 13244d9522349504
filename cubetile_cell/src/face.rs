// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The six cube faces and their UV frames.

use core::fmt;

use crate::point::Point3D;

/// One of the six faces of the cube that is projected onto the sphere.
///
/// Faces are numbered as in the cell id encoding: the three positive axes
/// first, then the three negative ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
#[repr(u8)]
pub enum Face {
    /// Face 0, centred on +X.
    #[default]
    PosX = 0,
    /// Face 1, centred on +Y.
    PosY = 1,
    /// Face 2, centred on +Z (north pole).
    PosZ = 2,
    /// Face 3, centred on -X.
    NegX = 3,
    /// Face 4, centred on -Y.
    NegY = 4,
    /// Face 5, centred on -Z (south pole).
    NegZ = 5,
}

impl Face {
    /// All faces in id order.
    pub const ALL: [Self; 6] = [
        Self::PosX,
        Self::PosY,
        Self::PosZ,
        Self::NegX,
        Self::NegY,
        Self::NegZ,
    ];

    /// Face with the given index, if it is below 6.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::PosX),
            1 => Some(Self::PosY),
            2 => Some(Self::PosZ),
            3 => Some(Self::NegX),
            4 => Some(Self::NegY),
            5 => Some(Self::NegZ),
            _ => None,
        }
    }

    /// Numeric index of the face, in `0..6`.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Face whose centre is closest to `p` (the largest component, by magnitude).
    pub fn from_xyz(p: Point3D) -> Self {
        let axis = p.largest_abs_component();
        let index = if p.component(axis) < 0.0 { axis + 3 } else { axis };
        Self::ALL[index]
    }

    /// Map face-local `(u, v)` in `[-1, 1]` to an unnormalized point on the cube.
    pub fn uv_to_xyz(self, u: f64, v: f64) -> Point3D {
        match self {
            Self::PosX => Point3D::new(1.0, u, v),
            Self::PosY => Point3D::new(-u, 1.0, v),
            Self::PosZ => Point3D::new(-u, -v, 1.0),
            Self::NegX => Point3D::new(-1.0, -v, -u),
            Self::NegY => Point3D::new(v, -1.0, -u),
            Self::NegZ => Point3D::new(v, u, -1.0),
        }
    }

    /// Project `p` onto this face's UV plane.
    ///
    /// Returns `None` when `p` lies in the opposite hemisphere, where the
    /// projection is undefined.
    pub fn xyz_to_uv(self, p: Point3D) -> Option<(f64, f64)> {
        if self.normal().dot(p) <= 0.0 {
            return None;
        }
        Some(self.valid_xyz_to_uv(p))
    }

    /// Project `p` onto this face's UV plane without a hemisphere check.
    pub(crate) fn valid_xyz_to_uv(self, p: Point3D) -> (f64, f64) {
        match self {
            Self::PosX => (p.y / p.x, p.z / p.x),
            Self::PosY => (-p.x / p.y, p.z / p.y),
            Self::PosZ => (-p.x / p.z, -p.y / p.z),
            Self::NegX => (p.z / p.x, p.y / p.x),
            Self::NegY => (p.z / p.y, -p.x / p.y),
            Self::NegZ => (-p.y / p.z, -p.x / p.z),
        }
    }

    /// Outward unit normal of the face, which is also its centre on the sphere.
    pub fn normal(self) -> Point3D {
        match self {
            Self::PosX => Point3D::new(1.0, 0.0, 0.0),
            Self::PosY => Point3D::new(0.0, 1.0, 0.0),
            Self::PosZ => Point3D::new(0.0, 0.0, 1.0),
            Self::NegX => Point3D::new(-1.0, 0.0, 0.0),
            Self::NegY => Point3D::new(0.0, -1.0, 0.0),
            Self::NegZ => Point3D::new(0.0, 0.0, -1.0),
        }
    }

    /// Normal of the plane through the origin and the line `u = const`.
    ///
    /// It is the right-handed normal of the edge running towards `+v`, so it
    /// points towards decreasing `u`. Not unit length.
    pub fn u_norm(self, u: f64) -> Point3D {
        match self {
            Self::PosX => Point3D::new(u, -1.0, 0.0),
            Self::PosY => Point3D::new(1.0, u, 0.0),
            Self::PosZ => Point3D::new(1.0, 0.0, u),
            Self::NegX => Point3D::new(-u, 0.0, 1.0),
            Self::NegY => Point3D::new(0.0, -u, 1.0),
            Self::NegZ => Point3D::new(0.0, -1.0, -u),
        }
    }

    /// Normal of the plane through the origin and the line `v = const`.
    ///
    /// It points towards increasing `v` and is not unit length.
    pub fn v_norm(self, v: f64) -> Point3D {
        match self {
            Self::PosX => Point3D::new(-v, 0.0, 1.0),
            Self::PosY => Point3D::new(0.0, -v, 1.0),
            Self::PosZ => Point3D::new(0.0, -1.0, -v),
            Self::NegX => Point3D::new(v, -1.0, 0.0),
            Self::NegY => Point3D::new(1.0, v, 0.0),
            Self::NegZ => Point3D::new(1.0, 0.0, v),
        }
    }
}

/// Error returned when converting an out-of-range integer into a [`Face`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidFace(pub u8);

impl fmt::Display for InvalidFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "face index {} is not in 0..6", self.0)
    }
}

impl core::error::Error for InvalidFace {}

impl TryFrom<u8> for Face {
    type Error = InvalidFace;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or(InvalidFace(value))
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> Self {
        face.index()
    }
}

bitflags::bitflags! {
    /// A set of cube faces, e.g. the faces a dataset touches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FaceSet: u8 {
        /// Face 0.
        const POS_X = 1 << 0;
        /// Face 1.
        const POS_Y = 1 << 1;
        /// Face 2.
        const POS_Z = 1 << 2;
        /// Face 3.
        const NEG_X = 1 << 3;
        /// Face 4.
        const NEG_Y = 1 << 4;
        /// Face 5.
        const NEG_Z = 1 << 5;
    }
}

impl FaceSet {
    /// The single-face set for `face`.
    #[inline]
    pub const fn of(face: Face) -> Self {
        Self::from_bits_retain(1 << face.index())
    }

    /// Whether `face` is a member.
    #[inline]
    pub fn contains_face(self, face: Face) -> bool {
        self.contains(Self::of(face))
    }

    /// Add `face` to the set.
    #[inline]
    pub fn insert_face(&mut self, face: Face) {
        self.insert(Self::of(face));
    }

    /// Member faces in id order.
    pub fn faces(self) -> impl Iterator<Item = Face> {
        Face::ALL
            .into_iter()
            .filter(move |face| self.contains_face(*face))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn uv_round_trip_on_every_face() {
        for face in Face::ALL {
            let p = face.uv_to_xyz(0.25, -0.5);
            assert_eq!(Face::from_xyz(p), face);
            let (u, v) = face.xyz_to_uv(p).unwrap();
            assert!((u - 0.25).abs() < 1e-15, "u drifted on {face:?}");
            assert!((v + 0.5).abs() < 1e-15, "v drifted on {face:?}");
            assert_eq!(face.xyz_to_uv(-p), None);
        }
    }

    #[test]
    fn norm_orientation() {
        for face in Face::ALL {
            let n = face.u_norm(0.0);
            assert!(n.dot(face.uv_to_xyz(0.5, 0.0)) < 0.0, "u_norm flipped on {face:?}");
            let n = face.v_norm(0.0);
            assert!(n.dot(face.uv_to_xyz(0.0, 0.5)) > 0.0, "v_norm flipped on {face:?}");
        }
    }

    #[test]
    fn face_set_membership() {
        let mut set = FaceSet::empty();
        set.insert_face(Face::NegZ);
        set.insert_face(Face::PosX);
        assert!(set.contains_face(Face::PosX));
        assert!(!set.contains_face(Face::PosY));
        let faces: Vec<_> = set.faces().collect();
        assert_eq!(faces, [Face::PosX, Face::NegZ]);
        assert_eq!(Face::try_from(6), Err(InvalidFace(6)));
    }
}
