//! Country boundary features read from a GeoJSON feature collection.
//!
//! Only what the map needs survives parsing: the feature's display name and
//! its polygon rings in `[lon, lat]` order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::data::error::{LoadError, Result};

/// One ring of `[lon, lat]` positions.
pub type Ring = Vec<[f64; 2]>;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// `properties.name`, falling back to `properties.NAME`.
    pub name: Option<String>,
    /// Outer and inner rings of every polygon, flattened.
    pub rings: Vec<Ring>,
}

impl Feature {
    /// Even-odd hit test over all rings, so holes are excluded.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.rings
            .iter()
            .filter(|ring| ring_contains(ring, lon, lat))
            .count()
            % 2
            == 1
    }
}

fn ring_contains(ring: &[[f64; 2]], x: f64, y: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawCollection = serde_json::from_reader(reader)?;
        if raw.kind != "FeatureCollection" {
            return Err(LoadError::Geometry(format!(
                "expected a FeatureCollection, found '{}'",
                raw.kind
            )));
        }
        let features = raw.features.into_iter().map(Feature::from).collect();
        Ok(Self { features })
    }

    pub fn parse_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// First feature whose rings contain the point.
    pub fn feature_at(&self, lon: f64, lat: f64) -> Option<&Feature> {
        self.features.iter().find(|f| f.contains(lon, lat))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Read a boundary file from disk.
pub fn load_geo_file(path: &Path) -> Result<FeatureCollection> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    FeatureCollection::from_reader(BufReader::new(file))
}

// ---------------------------------------------------------------------------
// Raw GeoJSON shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, JsonValue>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

/// Positions may carry an altitude; only the first two values are used.
type Position = Vec<f64>;

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Other,
}

fn to_ring(positions: Vec<Position>) -> Ring {
    positions
        .into_iter()
        .filter(|p| p.len() >= 2)
        .map(|p| [p[0], p[1]])
        .collect()
}

impl From<RawFeature> for Feature {
    fn from(raw: RawFeature) -> Self {
        let name = raw.properties.as_ref().and_then(|props| {
            ["name", "NAME"]
                .iter()
                .find_map(|key| props.get(*key).and_then(JsonValue::as_str))
                .map(str::to_string)
        });
        let rings = match raw.geometry {
            Some(RawGeometry::Polygon { coordinates }) => {
                coordinates.into_iter().map(to_ring).collect()
            }
            Some(RawGeometry::MultiPolygon { coordinates }) => coordinates
                .into_iter()
                .flatten()
                .map(to_ring)
                .collect(),
            Some(RawGeometry::Other) | None => Vec::new(),
        };
        Feature { name, rings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Korea, South" },
                "geometry": { "type": "Polygon", "coordinates": [[[126.0, 34.0], [129.0, 34.0], [129.0, 38.0, 12.5], [126.0, 34.0]]] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Chile" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-70.0, -20.0], [-69.0, -20.0], [-69.0, -21.0], [-70.0, -20.0]]],
                        [[[-73.0, -53.0], [-72.0, -53.0], [-72.0, -54.0], [-73.0, -53.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let fc = FeatureCollection::parse_str(SAMPLE).unwrap();
        assert_eq!(fc.len(), 3);

        assert_eq!(fc.features[0].name.as_deref(), Some("Korea, South"));
        assert_eq!(fc.features[0].rings.len(), 1);
        assert_eq!(fc.features[0].rings[0][2], [129.0, 38.0]);

        assert_eq!(fc.features[1].name.as_deref(), Some("Chile"));
        assert_eq!(fc.features[1].rings.len(), 2);

        assert_eq!(fc.features[2].name, None);
        assert!(fc.features[2].rings.is_empty());
    }

    #[test]
    fn test_hit_testing() {
        let fc = FeatureCollection::parse_str(SAMPLE).unwrap();
        let hit = fc.feature_at(127.0, 35.0).unwrap();
        assert_eq!(hit.name.as_deref(), Some("Korea, South"));
        let hit = fc.feature_at(-72.5, -53.2).unwrap();
        assert_eq!(hit.name.as_deref(), Some("Chile"));
        assert!(fc.feature_at(0.0, 0.0).is_none());
    }

    #[test]
    fn test_hole_is_outside() {
        let square = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]];
        let hole = vec![[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]];
        let f = Feature {
            name: None,
            rings: vec![square, hole],
        };
        assert!(f.contains(2.0, 2.0));
        assert!(!f.contains(5.0, 5.0));
        assert!(!f.contains(11.0, 5.0));
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = FeatureCollection::parse_str(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Geometry(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            FeatureCollection::parse_str("{"),
            Err(LoadError::Json(_))
        ));
    }
}
