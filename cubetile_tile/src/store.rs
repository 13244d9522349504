// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tile pyramid.

use alloc::string::ToString;
use alloc::vec;

use cubetile_cell::{CellId, FaceSet};
use cubetile_geometry::{ConvertOptions, JsonCollection, Projection, VectorFeature, convert};
use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::error::{Result, TileStoreError};
use crate::options::{MAX_ZOOM, TileStoreOptions};
use crate::tile::Tile;

/// Vector tiles over web-Mercator or the faces of the cube, split on demand.
///
/// Building the store converts the input, puts every feature in the root
/// tile of its face, and splits the roots down to
/// [`index_maxzoom`](TileStoreOptions::index_maxzoom).
/// [`get_tile`](Self::get_tile) splits further along the path to the tile
/// asked for. A tile is transformed into its own coordinate space once it has
/// been split, or when it is handed out.
#[derive(Clone, Debug)]
pub struct TileStore {
    tiles: HashMap<CellId, Tile>,
    faces: FaceSet,
    options: TileStoreOptions,
    projection: Projection,
}

impl TileStore {
    /// Build a store from `data`.
    pub fn new(data: JsonCollection, options: TileStoreOptions) -> Result<Self> {
        options.validate()?;
        let projection = options.projection.unwrap_or(if data.is_geojson() {
            Projection::WebMercator
        } else {
            Projection::S2
        });
        let features = convert(
            data,
            &ConvertOptions {
                projection,
                tolerance: options.tolerance,
                maxzoom: options.maxzoom,
                buffer: options.buffer,
                build_bbox: options.build_bbox,
            },
        )?;
        let feature_count = features.len();

        let mut store = Self {
            tiles: HashMap::new(),
            faces: FaceSet::empty(),
            options,
            projection,
        };
        for feature in features {
            store.add_feature(feature);
        }
        for face in store.faces.faces() {
            store.split_tile(CellId::from_face(face), None, store.options.maxzoom);
        }
        debug!(
            features = feature_count,
            faces = store.faces.bits().count_ones(),
            tiles = store.tiles.len(),
            ?projection,
            "built tile store"
        );
        Ok(store)
    }

    /// Build a store from a JSON document.
    pub fn from_json(json: &str, options: TileStoreOptions) -> Result<Self> {
        let data: JsonCollection =
            serde_json::from_str(json).map_err(|e| TileStoreError::InvalidJson(e.to_string()))?;
        Self::new(data, options)
    }

    fn add_feature(&mut self, feature: VectorFeature) {
        let face = feature.face;
        self.faces.insert_face(face);
        let id = CellId::from_face(face);
        self.tiles
            .entry(id)
            .or_insert_with(|| Tile::new(id))
            .add_feature(feature, None);
    }

    /// Split tiles depth first, starting at `start`.
    ///
    /// Without an `end`, every non-empty tile above
    /// [`index_maxzoom`](TileStoreOptions::index_maxzoom) is split. With one,
    /// only tiles containing `end` are split, down to `end_zoom`. Tiles at
    /// [`maxzoom`](TileStoreOptions::maxzoom) are never split. Each split
    /// tile is transformed afterwards.
    pub fn split_tile(&mut self, start: CellId, end: Option<CellId>, end_zoom: u8) {
        let TileStoreOptions {
            maxzoom,
            index_maxzoom,
            tolerance,
            buffer,
            ..
        } = self.options;
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(tile) = self.tiles.get_mut(&id) else {
                continue;
            };
            if tile.is_empty() || tile.transformed {
                continue;
            }
            let zoom = tile.zoom;
            let stop = zoom >= maxzoom
                || match end {
                    None => zoom >= index_maxzoom,
                    Some(end) => zoom > end_zoom || !id.contains(end),
                };
            if stop {
                continue;
            }

            let children = tile.split(buffer);
            tile.transform(tolerance, maxzoom);
            trace!(tile = id.raw(), zoom, "split tile");
            for child in children {
                if child.is_empty() {
                    continue;
                }
                stack.push(child.id);
                self.tiles.insert(child.id, child);
            }
        }
    }

    /// The tile for `id`, splitting as needed to produce it.
    ///
    /// `None` when `id` is deeper than 20, on a face with no data, outside
    /// `minzoom..=maxzoom`, or when no feature reaches that tile.
    pub fn get_tile(&mut self, id: CellId) -> Option<&Tile> {
        let zoom = id.level();
        if zoom > MAX_ZOOM
            || !self.faces.contains_face(id.face())
            || zoom < self.options.minzoom
            || zoom > self.options.maxzoom
        {
            return None;
        }

        let mut ancestor = id;
        while !self.tiles.contains_key(&ancestor) && !ancestor.is_face() {
            ancestor = ancestor.parent();
        }
        debug!(tile = id.raw(), zoom, from = ancestor.level(), "extending tile index");
        self.split_tile(ancestor, Some(id), zoom);

        let TileStoreOptions {
            tolerance, maxzoom, ..
        } = self.options;
        let tile = self.tiles.get_mut(&id)?;
        tile.transform(tolerance, maxzoom);
        Some(tile)
    }

    /// Faces that hold data.
    pub fn faces(&self) -> FaceSet {
        self.faces
    }

    /// The options the store was built with.
    pub fn options(&self) -> &TileStoreOptions {
        &self.options
    }

    /// The plane the store tiles in.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Number of tiles materialized so far.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the tile for `id` has been materialized.
    pub fn contains_tile(&self, id: CellId) -> bool {
        self.tiles.contains_key(&id)
    }
}
