// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while building a tile store.

use alloc::string::String;

use cubetile_geometry::ConvertError;
use thiserror::Error;

/// Tile store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TileStoreError {
    /// `maxzoom` must lie in `0..=20`.
    #[error("maxzoom {0} is out of range, expected 0..=20")]
    MaxZoomOutOfRange(u8),

    /// `minzoom` must not exceed `maxzoom`.
    #[error("minzoom {minzoom} is above maxzoom {maxzoom}")]
    MinZoomAboveMaxZoom {
        /// Requested minimum zoom.
        minzoom: u8,
        /// Requested maximum zoom.
        maxzoom: u8,
    },

    /// The input could not be converted.
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),

    /// The input is not valid JSON for any accepted collection or geometry type.
    #[error("invalid input JSON: {0}")]
    InvalidJson(String),
}

/// Result type for tile store operations.
pub type Result<T> = core::result::Result<T, TileStoreError>;
