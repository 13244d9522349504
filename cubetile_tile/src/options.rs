// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile store configuration.

use cubetile_geometry::Projection;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TileStoreError};

/// Deepest zoom a tile store can be built to.
pub const MAX_ZOOM: u8 = 20;

/// How a [`TileStore`](crate::TileStore) converts, splits and simplifies its input.
///
/// Deserializes from camel-cased keys (`indexMaxzoom`, `buildBBox`); any key
/// left out takes its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileStoreOptions {
    /// Smallest zoom [`get_tile`](crate::TileStore::get_tile) answers for.
    pub minzoom: u8,
    /// Deepest zoom; tiles at this zoom are never split.
    pub maxzoom: u8,
    /// Depth of the split done while building the store.
    pub index_maxzoom: u8,
    /// Simplification tolerance in tile extent units; `0` disables simplification.
    pub tolerance: f64,
    /// Halo kept around every tile, in tile extent units.
    pub buffer: f64,
    /// Output plane. Left unset, GeoJSON input is tiled in web-Mercator and
    /// everything else on the cube.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// Store bounds on every converted geometry.
    #[serde(rename = "buildBBox", alias = "buildBbox")]
    pub build_bbox: bool,
}

impl Default for TileStoreOptions {
    fn default() -> Self {
        Self {
            minzoom: 0,
            maxzoom: MAX_ZOOM,
            index_maxzoom: 4,
            tolerance: 3.0,
            buffer: 64.0,
            projection: None,
            build_bbox: false,
        }
    }
}

impl TileStoreOptions {
    /// Set [`minzoom`](Self::minzoom).
    #[must_use]
    pub fn with_minzoom(mut self, minzoom: u8) -> Self {
        self.minzoom = minzoom;
        self
    }

    /// Set [`maxzoom`](Self::maxzoom).
    #[must_use]
    pub fn with_maxzoom(mut self, maxzoom: u8) -> Self {
        self.maxzoom = maxzoom;
        self
    }

    /// Set [`index_maxzoom`](Self::index_maxzoom).
    #[must_use]
    pub fn with_index_maxzoom(mut self, index_maxzoom: u8) -> Self {
        self.index_maxzoom = index_maxzoom;
        self
    }

    /// Set [`tolerance`](Self::tolerance).
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set [`buffer`](Self::buffer).
    #[must_use]
    pub fn with_buffer(mut self, buffer: f64) -> Self {
        self.buffer = buffer;
        self
    }

    /// Set [`projection`](Self::projection).
    #[must_use]
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set [`build_bbox`](Self::build_bbox).
    #[must_use]
    pub fn with_build_bbox(mut self, build_bbox: bool) -> Self {
        self.build_bbox = build_bbox;
        self
    }

    /// Check the zoom range.
    pub fn validate(&self) -> Result<()> {
        if self.maxzoom > MAX_ZOOM {
            return Err(TileStoreError::MaxZoomOutOfRange(self.maxzoom));
        }
        if self.minzoom > self.maxzoom {
            return Err(TileStoreError::MinZoomAboveMaxZoom {
                minzoom: self.minzoom,
                maxzoom: self.maxzoom,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = TileStoreOptions::default();
        assert_eq!((options.minzoom, options.maxzoom, options.index_maxzoom), (0, 20, 4));
        assert_eq!((options.tolerance, options.buffer), (3.0, 64.0));
        assert_eq!(options.projection, None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let options: TileStoreOptions =
            serde_json::from_str(r#"{"maxzoom":8,"indexMaxzoom":2,"projection":"WM"}"#).unwrap();
        assert_eq!(options.maxzoom, 8);
        assert_eq!(options.index_maxzoom, 2);
        assert_eq!(options.projection, Some(Projection::WebMercator));
        assert_eq!(options.tolerance, 3.0);
    }

    #[test]
    fn zoom_range_is_checked() {
        let too_deep = TileStoreOptions::default().with_maxzoom(21);
        assert_eq!(too_deep.validate(), Err(TileStoreError::MaxZoomOutOfRange(21)));
        let inverted = TileStoreOptions::default().with_minzoom(5).with_maxzoom(3);
        assert_eq!(
            inverted.validate(),
            Err(TileStoreError::MinZoomAboveMaxZoom { minzoom: 5, maxzoom: 3 })
        );
    }
}
