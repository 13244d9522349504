// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiles and their layers.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use cubetile_cell::{CellId, Face};
use cubetile_geometry::{Axis, TILE_EXTENT, VectorFeature, clip_features, simplify};

/// Layer used when neither the feature nor the caller names one.
pub const DEFAULT_LAYER: &str = "default";

/// A named group of features within a tile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// The features, in insertion order.
    pub features: Vec<VectorFeature>,
}

impl Layer {
    /// An empty layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
        }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the layer has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// One cell of the tile pyramid and the features clipped to it.
///
/// Coordinates stay in the unit square of the face until the tile is
/// [transformed](Self::transform), after which they are relative to the tile:
/// `0..1` across it, plus the buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Cell the tile covers.
    pub id: CellId,
    /// Face of the cell.
    pub face: Face,
    /// Level of the cell.
    pub zoom: u8,
    /// Column at this zoom.
    pub i: u32,
    /// Row at this zoom.
    pub j: u32,
    /// Layers by name.
    pub layers: BTreeMap<String, Layer>,
    /// Whether the features have been simplified and moved into tile space.
    pub transformed: bool,
}

impl Tile {
    /// An empty, untransformed tile.
    pub fn new(id: CellId) -> Self {
        let (face, i, j, zoom) = id.to_face_ij();
        Self {
            id,
            face,
            zoom,
            i,
            j,
            layers: BTreeMap::new(),
            transformed: false,
        }
    }

    /// Add a feature to the layer named by its `metadata.layer`, else by
    /// `layer`, else to [`DEFAULT_LAYER`].
    pub fn add_feature(&mut self, feature: VectorFeature, layer: Option<&str>) {
        let name = feature.layer_name().or(layer).unwrap_or(DEFAULT_LAYER);
        if let Some(existing) = self.layers.get_mut(name) {
            existing.features.push(feature);
            return;
        }
        let mut created = Layer::new(name);
        created.features.push(feature);
        self.layers.insert(created.name.clone(), created);
    }

    /// Whether no layer holds a feature.
    pub fn is_empty(&self) -> bool {
        self.layers.values().all(Layer::is_empty)
    }

    /// Number of features across all layers.
    pub fn feature_count(&self) -> usize {
        self.layers.values().map(Layer::len).sum()
    }

    /// Layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Simplify for this zoom and move every feature into tile space.
    ///
    /// Features simplified away entirely are dropped. Calling this again does
    /// nothing.
    pub fn transform(&mut self, tolerance: f64, maxzoom: u8) {
        if self.transformed {
            return;
        }
        let (zoom, i, j) = (self.zoom, self.i, self.j);
        for layer in self.layers.values_mut() {
            for feature in &mut layer.features {
                if tolerance > 0.0 {
                    simplify(&mut feature.geometry, tolerance, zoom, maxzoom);
                }
                feature.geometry.transform(zoom, i, j);
            }
            layer.features.retain(|feature| !feature.geometry.is_empty());
        }
        self.transformed = true;
    }

    /// Clip this tile's features into its four children, in the order
    /// bottom-left, bottom-right, top-left, top-right.
    ///
    /// `buffer` is in tile extent units and applies at the children's zoom.
    /// Children that receive nothing are returned empty.
    pub fn split(&self, buffer: f64) -> [Self; 4] {
        let mut children = CellId::children_ij(self.face, self.zoom, self.i, self.j).map(Self::new);
        let scale = f64::from(1_u32 << self.zoom);
        let (i, j) = (f64::from(self.i), f64::from(self.j));
        let k = 0.5 * buffer / TILE_EXTENT / scale;
        let (left, mid_x, right) = (i / scale, (i + 0.5) / scale, (i + 1.0) / scale);
        let (bottom, mid_y, top) = (j / scale, (j + 0.5) / scale, (j + 1.0) / scale);

        for (name, layer) in &self.layers {
            let halves = [
                clip_features(&layer.features, Axis::X, left, mid_x, k),
                clip_features(&layer.features, Axis::X, mid_x, right, k),
            ];
            for (column, half) in halves.iter().enumerate() {
                if half.is_empty() {
                    continue;
                }
                let quarters = [
                    clip_features(half, Axis::Y, bottom, mid_y, k),
                    clip_features(half, Axis::Y, mid_y, top, k),
                ];
                for (row, quarter) in quarters.into_iter().enumerate() {
                    if quarter.is_empty() {
                        continue;
                    }
                    let child = &mut children[row * 2 + column];
                    let layer = Layer {
                        name: name.clone(),
                        features: quarter,
                    };
                    child.layers.insert(name.clone(), layer);
                }
            }
        }
        children
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use cubetile_geometry::{Shape, VectorGeometry, VectorPoint};
    use serde_json::json;

    use super::*;

    fn point(x: f64, y: f64) -> VectorFeature {
        VectorFeature::new(VectorGeometry::Point(Shape::new(VectorPoint::new(x, y))))
    }

    fn first_point(tile: &Tile, layer: &str) -> (f64, f64) {
        match &tile.layer(layer).unwrap().features[0].geometry {
            VectorGeometry::Point(shape) => (shape.coordinates.x, shape.coordinates.y),
            other => panic!("expected a point, got {other:?}"),
        }
    }

    #[test]
    fn layers_are_picked_from_metadata_then_caller() {
        let mut tile = Tile::new(CellId::from_face(Face::PosX));
        assert!(tile.is_empty());
        tile.add_feature(point(0.1, 0.1), None);
        tile.add_feature(point(0.2, 0.2), Some("roads"));
        tile.add_feature(point(0.3, 0.3).with_metadata(json!({ "layer": "water" })), Some("roads"));
        assert_eq!(tile.layer(DEFAULT_LAYER).map(Layer::len), Some(1));
        assert_eq!(tile.layer("roads").map(Layer::len), Some(1));
        assert_eq!(tile.layer("water").map(Layer::len), Some(1));
        assert_eq!(tile.feature_count(), 3);
    }

    #[test]
    fn transform_is_idempotent() {
        let id = CellId::from_face_ij_level(Face::PosX, 1, 0, 1);
        let mut tile = Tile::new(id);
        assert_eq!((tile.zoom, tile.i, tile.j), (1, 1, 0));
        tile.add_feature(point(0.75, 0.25), None);
        tile.transform(3.0, 20);
        assert_eq!(first_point(&tile, DEFAULT_LAYER), (0.5, 0.5));
        tile.transform(3.0, 20);
        assert_eq!(first_point(&tile, DEFAULT_LAYER), (0.5, 0.5));
    }

    #[test]
    fn split_sends_features_to_their_quadrant() {
        let mut tile = Tile::new(CellId::from_face(Face::PosZ));
        tile.add_feature(point(0.25, 0.25), None);
        tile.add_feature(point(0.75, 0.75), None);
        let children = tile.split(64.0);
        let counts: Vec<usize> = children.iter().map(Tile::feature_count).collect();
        assert_eq!(counts, vec![1, 0, 0, 1]);
        assert_eq!((children[3].zoom, children[3].i, children[3].j), (1, 1, 1));
        assert!(children.iter().all(|child| child.id.parent() == tile.id));
        assert!(!tile.transformed);
    }

    #[test]
    fn split_keeps_lines_in_the_buffer() {
        let mut tile = Tile::new(CellId::from_face(Face::PosX));
        let line = vec![VectorPoint::new(0.1, 0.1), VectorPoint::new(0.9, 0.1)];
        tile.add_feature(VectorFeature::new(VectorGeometry::LineString(Shape::new(line))), None);
        let children = tile.split(64.0);
        // Crosses the vertical midline, so both bottom children get a piece
        // reaching past the midline by the buffer.
        let geometry = &children[0].layers[DEFAULT_LAYER].features[0].geometry;
        let VectorGeometry::LineString(left) = geometry else {
            panic!("expected a line string");
        };
        let end = left.coordinates.last().unwrap().x;
        assert!((end - (0.5 + 32.0 / 4096.0)).abs() < 1e-12, "ends at {end}");
        assert_eq!(children[1].feature_count(), 1);
        assert!(children[2].is_empty() && children[3].is_empty());
    }
}
