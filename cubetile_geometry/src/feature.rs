// Copyright 2025 the Cubetile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Features and the input collections they arrive in.
//!
//! Two families are accepted. GeoJSON [`Feature`]s carry plain position
//! arrays in lon/lat. [`VectorFeature`]s carry [`VectorGeometry`] and a cube
//! face; their coordinates are lon/lat when they arrive as `"VectorFeature"`
//! and face ST when they arrive as `"S2Feature"`.

use alloc::string::String;
use alloc::vec::Vec;

use cubetile_cell::Face;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bbox::BBox;
use crate::error::{ConvertError, Result};
use crate::geometry::{Line, Shape, VectorGeometry};
use crate::point::{MValue, VectorPoint};

/// Feature attributes.
pub type Properties = Map<String, Value>;

/// A feature id: GeoJSON allows either a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Unsigned integer id.
    Number(u64),
    /// String id.
    String(String),
}

impl From<u64> for FeatureId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self::String(id)
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self::String(id.into())
    }
}

/// A feature in vector form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorFeature {
    /// Optional id, numeric or string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    /// Cube face the coordinates are relative to. Ignored for lon/lat input.
    #[serde(default)]
    pub face: Face,
    /// Attributes.
    #[serde(default)]
    pub properties: Properties,
    /// Shape of the feature.
    pub geometry: VectorGeometry,
    /// Free-form data; `metadata.layer` picks the tile layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl VectorFeature {
    /// A feature on face 0 with no id, attributes or metadata.
    pub fn new(geometry: VectorGeometry) -> Self {
        Self {
            id: None,
            face: Face::PosX,
            properties: Properties::new(),
            geometry,
            metadata: None,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the face.
    #[must_use]
    pub fn with_face(mut self, face: Face) -> Self {
        self.face = face;
        self
    }

    /// Set the attributes.
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Set the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Copy of this feature with another geometry.
    pub fn with_geometry(&self, geometry: VectorGeometry) -> Self {
        Self {
            id: self.id.clone(),
            face: self.face,
            properties: self.properties.clone(),
            geometry,
            metadata: self.metadata.clone(),
        }
    }

    /// The `metadata.layer` string, if set.
    pub fn layer_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("layer")?.as_str()
    }
}

/// A GeoJSON position: `[x, y]` or `[x, y, z]`.
pub type Position = Vec<f64>;

/// A GeoJSON geometry, with optional per-vertex measure values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    #[serde(alias = "Point3D")]
    Point {
        /// The position.
        coordinates: Position,
        /// Measure values for the position.
        #[serde(rename = "mValues", default, skip_serializing_if = "Option::is_none")]
        m_values: Option<MValue>,
        /// Bounds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    /// Unconnected positions.
    #[serde(alias = "MultiPoint3D")]
    MultiPoint {
        /// The positions.
        coordinates: Vec<Position>,
        /// Measure values, one per position.
        #[serde(rename = "mValues", default, skip_serializing_if = "Option::is_none")]
        m_values: Option<Vec<MValue>>,
        /// Bounds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    /// A line.
    #[serde(alias = "LineString3D")]
    LineString {
        /// The positions.
        coordinates: Vec<Position>,
        /// Measure values, one per position.
        #[serde(rename = "mValues", default, skip_serializing_if = "Option::is_none")]
        m_values: Option<Vec<MValue>>,
        /// Bounds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    /// Several lines.
    #[serde(alias = "MultiLineString3D")]
    MultiLineString {
        /// The lines.
        coordinates: Vec<Vec<Position>>,
        /// Measure values, nested like `coordinates`.
        #[serde(rename = "mValues", default, skip_serializing_if = "Option::is_none")]
        m_values: Option<Vec<Vec<MValue>>>,
        /// Bounds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    /// Outer ring then holes.
    #[serde(alias = "Polygon3D")]
    Polygon {
        /// The rings.
        coordinates: Vec<Vec<Position>>,
        /// Measure values, nested like `coordinates`.
        #[serde(rename = "mValues", default, skip_serializing_if = "Option::is_none")]
        m_values: Option<Vec<Vec<MValue>>>,
        /// Bounds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    /// Several polygons.
    #[serde(alias = "MultiPolygon3D")]
    MultiPolygon {
        /// The polygons.
        coordinates: Vec<Vec<Vec<Position>>>,
        /// Measure values, nested like `coordinates`.
        #[serde(rename = "mValues", default, skip_serializing_if = "Option::is_none")]
        m_values: Option<Vec<Vec<Vec<MValue>>>>,
        /// Bounds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
}

fn to_point(position: &[f64], m: Option<&MValue>) -> Result<VectorPoint> {
    let point = match *position {
        [x, y] => VectorPoint::new(x, y),
        [x, y, z, ..] => VectorPoint::new_3d(x, y, z),
        _ => return Err(ConvertError::InvalidPosition { len: position.len() }),
    };
    Ok(match m {
        Some(m) => point.with_m(m.clone()),
        None => point,
    })
}

fn to_line(positions: &[Position], m: Option<&Vec<MValue>>) -> Result<Line> {
    positions
        .iter()
        .enumerate()
        .map(|(k, position)| to_point(position, m.and_then(|m| m.get(k))))
        .collect()
}

fn to_lines(lines: &[Vec<Position>], m: Option<&Vec<Vec<MValue>>>) -> Result<Vec<Line>> {
    lines
        .iter()
        .enumerate()
        .map(|(k, line)| to_line(line, m.and_then(|m| m.get(k))))
        .collect()
}

impl Geometry {
    /// The same geometry as vector points, still in lon/lat.
    ///
    /// Fails when a position has fewer than two ordinates.
    pub fn to_vector(&self) -> Result<VectorGeometry> {
        let mut geometry = match self {
            Self::Point {
                coordinates,
                m_values,
                bbox,
            } => {
                let point = to_point(coordinates, m_values.as_ref())?;
                VectorGeometry::Point(Shape { bbox: *bbox, ..Shape::new(point) })
            }
            Self::MultiPoint {
                coordinates,
                m_values,
                bbox,
            } => {
                let line = to_line(coordinates, m_values.as_ref())?;
                VectorGeometry::MultiPoint(Shape { bbox: *bbox, ..Shape::new(line) })
            }
            Self::LineString {
                coordinates,
                m_values,
                bbox,
            } => {
                let line = to_line(coordinates, m_values.as_ref())?;
                VectorGeometry::LineString(Shape { bbox: *bbox, ..Shape::new(line) })
            }
            Self::MultiLineString {
                coordinates,
                m_values,
                bbox,
            } => {
                let lines = to_lines(coordinates, m_values.as_ref())?;
                VectorGeometry::MultiLineString(Shape { bbox: *bbox, ..Shape::new(lines) })
            }
            Self::Polygon {
                coordinates,
                m_values,
                bbox,
            } => {
                let rings = to_lines(coordinates, m_values.as_ref())?;
                VectorGeometry::Polygon(Shape { bbox: *bbox, ..Shape::new(rings) })
            }
            Self::MultiPolygon {
                coordinates,
                m_values,
                bbox,
            } => {
                let polygons = coordinates
                    .iter()
                    .enumerate()
                    .map(|(k, rings)| {
                        to_lines(rings, m_values.as_ref().and_then(|m| m.get(k)))
                    })
                    .collect::<Result<Vec<_>>>()?;
                VectorGeometry::MultiPolygon(Shape { bbox: *bbox, ..Shape::new(polygons) })
            }
        };
        let mut is_3d = false;
        geometry.for_each_point(|p| is_3d |= p.z.is_some());
        set_3d(&mut geometry, is_3d);
        Ok(geometry)
    }
}

fn set_3d(geometry: &mut VectorGeometry, is_3d: bool) {
    match geometry {
        VectorGeometry::Point(s) => s.is_3d = is_3d,
        VectorGeometry::MultiPoint(s) => s.is_3d = is_3d,
        VectorGeometry::LineString(s) => s.is_3d = is_3d,
        VectorGeometry::MultiLineString(s) | VectorGeometry::Polygon(s) => s.is_3d = is_3d,
        VectorGeometry::MultiPolygon(s) => s.is_3d = is_3d,
    }
}

/// A GeoJSON feature in lon/lat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Optional id, numeric or string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    /// Attributes.
    #[serde(default)]
    pub properties: Properties,
    /// Shape of the feature.
    pub geometry: Geometry,
    /// Free-form data; `metadata.layer` picks the tile layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Feature {
    /// A feature with no id, attributes or metadata.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            properties: Properties::new(),
            geometry,
            metadata: None,
        }
    }

    /// The same feature in vector form on face 0, still in lon/lat.
    pub fn to_vector(&self) -> Result<VectorFeature> {
        Ok(VectorFeature {
            id: self.id.clone(),
            face: Face::PosX,
            properties: self.properties.clone(),
            geometry: self.geometry.to_vector()?,
            metadata: self.metadata.clone(),
        })
    }
}

/// A member of a [`FeatureCollection`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureEntry {
    /// A GeoJSON feature.
    Feature(Feature),
    /// A vector feature in lon/lat.
    VectorFeature(VectorFeature),
}

/// Features in lon/lat.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// The features.
    pub features: Vec<FeatureEntry>,
    /// Bounds of the whole collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}

/// Vector features in face ST coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct S2FeatureCollection {
    /// The features.
    pub features: Vec<VectorFeature>,
    /// Cube faces the collection touches.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<Face>,
}

/// Any input accepted for tiling, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonCollection {
    /// One GeoJSON feature.
    Feature(Feature),
    /// GeoJSON and vector features in lon/lat.
    FeatureCollection(FeatureCollection),
    /// One vector feature in lon/lat.
    VectorFeature(VectorFeature),
    /// One vector feature in face ST.
    S2Feature(VectorFeature),
    /// Vector features in face ST.
    S2FeatureCollection(S2FeatureCollection),
}

impl JsonCollection {
    /// Whether the input is GeoJSON flavoured, which tiles in web-Mercator
    /// unless told otherwise.
    pub fn is_geojson(&self) -> bool {
        matches!(self, Self::Feature(_) | Self::FeatureCollection(_))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use serde_json::json;

    use super::*;

    #[test]
    fn geojson_feature_to_vector() {
        let json = json!({
            "type": "Feature",
            "properties": { "name": "river" },
            "geometry": {
                "type": "LineString",
                "coordinates": [[0, 0], [1, 1, 5]],
                "mValues": [{ "speed": 1 }, { "speed": 2 }]
            }
        });
        let JsonCollection::Feature(feature) = serde_json::from_value(json).unwrap() else {
            panic!("expected a feature");
        };
        let vector = feature.to_vector().unwrap();
        assert_eq!(vector.face, Face::PosX);
        assert_eq!(vector.properties["name"], json!("river"));
        let VectorGeometry::LineString(line) = &vector.geometry else {
            panic!("expected a line string");
        };
        assert!(line.is_3d);
        assert_eq!(line.coordinates[1].z, Some(5.0));
        assert_eq!(line.coordinates[1].m.as_ref().unwrap()["speed"], json!(2));
    }

    #[test]
    fn ids_may_be_numbers_or_strings() {
        let numbered = json!({
            "type": "Feature",
            "id": 7,
            "geometry": { "type": "Point", "coordinates": [0, 0] }
        });
        let JsonCollection::Feature(feature) = serde_json::from_value(numbered).unwrap() else {
            panic!("expected a feature");
        };
        assert_eq!(feature.id, Some(FeatureId::Number(7)));

        let named = json!({
            "type": "VectorFeature",
            "id": "well-12",
            "geometry": { "type": "Point", "coordinates": { "x": 1, "y": 2 } }
        });
        let JsonCollection::VectorFeature(feature) = serde_json::from_value(named).unwrap() else {
            panic!("expected a vector feature");
        };
        assert_eq!(feature.id, Some(FeatureId::from("well-12")));
        let origin = VectorGeometry::Point(Shape::new(VectorPoint::new(0.0, 0.0)));
        let moved = feature.with_geometry(origin);
        assert_eq!(moved.id, Some(FeatureId::String("well-12".into())));
        assert_eq!(serde_json::to_value(&moved).unwrap()["id"], json!("well-12"));
        let renumbered = VectorFeature::new(moved.geometry).with_id(3_u64);
        assert_eq!(renumbered.id, Some(FeatureId::Number(3)));
    }

    #[test]
    fn short_positions_are_rejected() {
        let geometry = Geometry::MultiPoint {
            coordinates: vec![vec![0.0, 0.0], vec![1.0]],
            m_values: None,
            bbox: None,
        };
        assert_eq!(geometry.to_vector(), Err(ConvertError::InvalidPosition { len: 1 }));
    }

    #[test]
    fn collections_are_tagged() {
        let json = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": { "type": "Point3D", "coordinates": [0, 0, 1] }
                },
                {
                    "type": "VectorFeature",
                    "geometry": { "type": "Point", "coordinates": { "x": 1, "y": 2 } }
                }
            ]
        });
        let data: JsonCollection = serde_json::from_value(json).unwrap();
        assert!(data.is_geojson());
        let JsonCollection::FeatureCollection(collection) = data else {
            panic!("expected a feature collection");
        };
        assert!(matches!(collection.features[0], FeatureEntry::Feature(_)));
        assert!(matches!(collection.features[1], FeatureEntry::VectorFeature(_)));

        let s2 = json!({
            "type": "S2Feature",
            "face": 3,
            "geometry": { "type": "Point", "coordinates": { "x": 0.5, "y": 0.5 } },
            "metadata": { "layer": "water" }
        });
        let JsonCollection::S2Feature(feature) = serde_json::from_value(s2).unwrap() else {
            panic!("expected an S2 feature");
        };
        assert_eq!(feature.face, Face::NegX);
        assert_eq!(feature.layer_name(), Some("water"));
    }

    #[test]
    fn bad_faces_and_types_fail_to_parse() {
        let bad_face = json!({
            "type": "S2Feature",
            "face": 6,
            "geometry": { "type": "Point", "coordinates": { "x": 0.5, "y": 0.5 } }
        });
        assert!(serde_json::from_value::<JsonCollection>(bad_face).is_err());
        let bad_type = json!({
            "type": "Feature",
            "geometry": { "type": "GeometryCollection", "coordinates": [] }
        });
        assert!(serde_json::from_value::<JsonCollection>(bad_type).is_err());
    }
}
