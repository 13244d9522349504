// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three-dimensional vectors on (or near) the unit sphere.

use core::ops::{Add, Mul, Neg, Sub};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A vector in 3D space.
///
/// Most values handled by this crate are unit-length points on the sphere, but
/// the type itself makes no such promise: edge normals and raw face mappings
/// are left unnormalized.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3D {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Point3D {
    /// Create a vector from its components.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn norm2(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    #[inline]
    pub fn norm(self) -> f64 {
        self.norm2().sqrt()
    }

    /// Scale to unit length. The zero vector is returned unchanged.
    pub fn normalize(self) -> Self {
        let n = self.norm();
        if n > 0.0 { self * (1.0 / n) } else { self }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance2(self, other: Self) -> f64 {
        (self - other).norm2()
    }

    /// Index (0 = x, 1 = y, 2 = z) of the component with the largest magnitude.
    pub fn largest_abs_component(self) -> usize {
        let (x, y, z) = (self.x.abs(), self.y.abs(), self.z.abs());
        if x > y {
            if x > z { 0 } else { 2 }
        } else if y > z {
            1
        } else {
            2
        }
    }

    /// Component by index (0 = x, 1 = y, anything else = z).
    #[inline]
    pub fn component(self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

impl Add for Point3D {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Point3D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_is_orthogonal() {
        let a = Point3D::new(1.0, 2.0, 3.0);
        let b = Point3D::new(-2.0, 0.5, 4.0);
        let c = a.cross(b);
        assert!(c.dot(a).abs() < 1e-12, "cross product not orthogonal to a");
        assert!(c.dot(b).abs() < 1e-12, "cross product not orthogonal to b");
    }

    #[test]
    fn normalize_and_largest_component() {
        let p = Point3D::new(0.0, -3.0, 4.0).normalize();
        assert!((p.norm() - 1.0).abs() < 1e-15, "not unit length");
        assert_eq!(p.largest_abs_component(), 2);
        assert_eq!(Point3D::new(-5.0, 1.0, 1.0).largest_abs_component(), 0);
        assert_eq!(Point3D::default().normalize(), Point3D::default());
    }
}
