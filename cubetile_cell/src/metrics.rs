// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-form bounds on cell sizes.
//!
//! A [`Metric`] relates a cell level to a length (dimension 1) or an area
//! (dimension 2) on the unit sphere. The constants below hold for the
//! quadratic projection used throughout this crate.

use core::f64::consts::{PI, SQRT_2};

use crate::id::MAX_LEVEL;

/// A per-level size bound: `deriv * 2^(-dim * level)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Metric {
    dim: u8,
    deriv: f64,
}

impl Metric {
    /// A metric of dimension `dim` (1 for lengths, 2 for areas).
    pub const fn new(dim: u8, deriv: f64) -> Self {
        assert!(dim == 1 || dim == 2, "metric dimension must be 1 or 2");
        Self { dim, deriv }
    }

    /// Dimension of the metric.
    pub const fn dim(self) -> u8 {
        self.dim
    }

    /// Value at level 0, which every deeper level scales down from.
    pub const fn deriv(self) -> f64 {
        self.deriv
    }

    /// Value of the metric for cells at `level`.
    pub fn value(self, level: u8) -> f64 {
        self.deriv / (1_u64 << (u32::from(self.dim) * u32::from(level))) as f64
    }

    /// Smallest level whose value is at most `value`.
    pub fn level_for_max_value(self, value: f64) -> u8 {
        if value <= 0.0 {
            return MAX_LEVEL;
        }
        let level = ilogb(value / self.deriv);
        clamp_level(-(level >> (self.dim - 1)))
    }

    /// Largest level whose value is at least `value`.
    pub fn level_for_min_value(self, value: f64) -> u8 {
        if value <= 0.0 {
            return MAX_LEVEL;
        }
        let level = ilogb(self.deriv / value);
        clamp_level(level >> (self.dim - 1))
    }

    /// Level whose value is closest to `value`.
    pub fn closest_level(self, value: f64) -> u8 {
        let scale = if self.dim == 1 { SQRT_2 } else { 2.0 };
        self.level_for_max_value(scale * value)
    }
}

/// Unbiased binary exponent of a positive finite `x`, i.e. `floor(log2(x))`.
#[allow(clippy::cast_possible_truncation, reason = "Masked to 11 bits.")]
fn ilogb(x: f64) -> i32 {
    ((x.to_bits() >> 52) & 0x7ff) as i32 - 1023
}

#[allow(clippy::cast_possible_truncation, reason = "Clamped to 0..=30.")]
fn clamp_level(level: i32) -> u8 {
    level.clamp(0, i32::from(MAX_LEVEL)) as u8
}

const MAX_ANGLE_SPAN_DERIV: f64 = 1.704_897_179_199_218_452;

/// Minimum angular span (distance between opposite edges).
pub const MIN_ANGLE_SPAN: Metric = Metric::new(1, 4.0 / 3.0);
/// Maximum angular span.
pub const MAX_ANGLE_SPAN: Metric = Metric::new(1, MAX_ANGLE_SPAN_DERIV);
/// Average angular span.
pub const AVG_ANGLE_SPAN: Metric = Metric::new(1, PI / 2.0);

/// Minimum width (distance between opposite edges, measured along the narrower axis).
pub const MIN_WIDTH: Metric = Metric::new(1, 2.0 * SQRT_2 / 3.0);
/// Maximum width.
pub const MAX_WIDTH: Metric = Metric::new(1, MAX_ANGLE_SPAN_DERIV);
/// Average width.
pub const AVG_WIDTH: Metric = Metric::new(1, 1.434_523_672_886_099_389);

/// Minimum edge length.
pub const MIN_EDGE: Metric = Metric::new(1, 2.0 * SQRT_2 / 3.0);
/// Maximum edge length.
pub const MAX_EDGE: Metric = Metric::new(1, MAX_ANGLE_SPAN_DERIV);
/// Average edge length.
pub const AVG_EDGE: Metric = Metric::new(1, 1.459_213_746_386_106_062);

/// Minimum diagonal length.
pub const MIN_DIAG: Metric = Metric::new(1, 8.0 * SQRT_2 / 9.0);
/// Maximum diagonal length.
pub const MAX_DIAG: Metric = Metric::new(1, 2.438_654_594_434_021_032);
/// Average diagonal length.
pub const AVG_DIAG: Metric = Metric::new(1, 2.060_422_738_998_471_683);

/// Minimum area.
pub const MIN_AREA: Metric = Metric::new(2, 8.0 * SQRT_2 / 9.0);
/// Maximum area.
pub const MAX_AREA: Metric = Metric::new(2, 2.635_799_256_963_161_491);
/// Average area: the sphere's `4π` split across six faces.
pub const AVG_AREA: Metric = Metric::new(2, 4.0 * PI / 6.0);
