// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angles stored as squared chord lengths.

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::point::Point3D;

/// An angle between two unit vectors, stored as the squared length of the
/// chord joining them.
///
/// The chord is monotonic in the angle, so comparisons need no trigonometry.
/// Valid values lie in `[0, 4]`; negative values encode the empty angle used
/// by empty caps.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ChordAngle(f64);

impl ChordAngle {
    /// Largest squared chord: two antipodal points.
    pub const MAX_LENGTH2: f64 = 4.0;

    /// The empty angle, smaller than every valid one.
    pub const NEGATIVE: Self = Self(-1.0);
    /// Zero angle.
    pub const ZERO: Self = Self(0.0);
    /// Ninety degrees.
    pub const RIGHT: Self = Self(2.0);
    /// One hundred and eighty degrees.
    pub const STRAIGHT: Self = Self(Self::MAX_LENGTH2);

    /// From a squared chord length. Values above 4 are clamped.
    pub fn from_length2(length2: f64) -> Self {
        Self(length2.min(Self::MAX_LENGTH2))
    }

    /// Angle between two unit-length points.
    pub fn from_points(a: Point3D, b: Point3D) -> Self {
        Self::from_length2(a.distance2(b))
    }

    /// From an angle in radians. Negative angles give [`NEGATIVE`](Self::NEGATIVE).
    pub fn from_radians(radians: f64) -> Self {
        if radians < 0.0 {
            return Self::NEGATIVE;
        }
        let length = 2.0 * (0.5 * radians.min(PI)).sin();
        Self(length * length)
    }

    /// From an angle in degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// The squared chord length.
    #[inline]
    pub const fn length2(self) -> f64 {
        self.0
    }

    /// Whether this is the empty angle.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }

    /// The angle in radians, or `-1` for the empty angle.
    pub fn to_radians(self) -> f64 {
        if self.is_negative() {
            return -1.0;
        }
        let half_chord = 0.5 * self.0.sqrt();
        // asin(x) == atan2(x, sqrt(1 - x^2))
        2.0 * half_chord.atan2((1.0 - half_chord * half_chord).max(0.0).sqrt())
    }

    /// The angle in degrees.
    pub fn to_degrees(self) -> f64 {
        self.to_radians().to_degrees()
    }

    /// `sin²` of the angle, computed without trigonometry.
    pub fn sin2(self) -> f64 {
        self.0 * (1.0 - 0.25 * self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::lon_lat_to_xyz;

    #[test]
    fn radians_round_trip() {
        for degrees in [0.0, 1.0, 2.0, 45.0, 90.0, 135.0, 180.0] {
            let back = ChordAngle::from_degrees(degrees).to_degrees();
            assert!((back - degrees).abs() < 1e-9, "{degrees} came back as {back}");
        }
        assert!((ChordAngle::from_degrees(90.0).length2() - 2.0).abs() < 1e-15, "right angle");
        assert_eq!(ChordAngle::from_degrees(180.0).length2(), 4.0);
        assert!(ChordAngle::from_radians(-0.5).is_negative());
    }

    #[test]
    fn ordering_follows_angle() {
        let origin = lon_lat_to_xyz(0.0, 0.0);
        let near = ChordAngle::from_points(origin, lon_lat_to_xyz(1.0, 1.0));
        let far = ChordAngle::from_points(origin, lon_lat_to_xyz(90.0, 45.0));
        let two_degrees = ChordAngle::from_degrees(2.0);
        assert!(near < two_degrees);
        assert!(far > two_degrees);
        assert!(ChordAngle::NEGATIVE < ChordAngle::ZERO);
    }

    #[test]
    fn sin2_matches_trig() {
        let angle = ChordAngle::from_degrees(30.0);
        assert!((angle.sin2() - 0.25).abs() < 1e-15, "sin^2(30deg) = 1/4");
        assert_eq!(ChordAngle::RIGHT.sin2(), 1.0);
    }
}
