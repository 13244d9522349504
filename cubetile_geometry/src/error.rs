// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while turning input features into vector features.

use thiserror::Error;

/// Conversion errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// A GeoJSON position needs at least `x` and `y`.
    #[error("position has {len} ordinates, expected at least 2")]
    InvalidPosition {
        /// Number of ordinates found.
        len: usize,
    },

    /// A bounding box is a flat array of 4 or 6 numbers.
    #[error("bounding box has {len} numbers, expected 4 or 6")]
    InvalidBBox {
        /// Number of values found.
        len: usize,
    },
}

/// Result type for conversions.
pub type Result<T> = core::result::Result<T, ConvertError>;
