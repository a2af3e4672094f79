//! Parsed polygon features as produced by the Geometry Store.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into() }
    }

    /// Build from a bare EPSG code, naming the ones this pipeline knows about
    pub fn from_epsg(epsg: u32) -> Self {
        match epsg {
            4326 => Self::wgs84(),
            2950 => Self::mtm_zone_8(),
            3857 => Self::new(3857, "Web Mercator"),
            other => Self::new(other, format!("EPSG:{}", other)),
        }
    }

    /// WGS 84 (EPSG:4326), the geographic lat/lon reference every dataset is
    /// reprojected to
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// NAD83(CSRS) / MTM zone 8 (EPSG:2950), the projection of the city's open data
    pub fn mtm_zone_8() -> Self {
        Self::new(2950, "NAD83(CSRS) / MTM zone 8")
    }

    pub fn code(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

/// One polygon feature: its stable id, the source property bag and the parsed shape.
///
/// Non-polygonal or null geometries never reach this type as anything other than an
/// empty `MultiPolygon`.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub properties: Map<String, Value>,
    pub geometry: MultiPolygon<f64>,
}

impl Feature {
    pub fn new(id: impl Into<String>, properties: Map<String, Value>, geometry: MultiPolygon<f64>) -> Self {
        Self { id: id.into(), properties, geometry }
    }

    /// Property rendered as a trimmed string. Numbers are rendered without a trailing `.0`.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(i.to_string()),
                None => n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.abs() < 1e15 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                }),
            },
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Property as a number; numeric strings are accepted
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse().ok(),
            _ => None,
        }
    }

    /// `true` when the geometry holds no polygon
    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }
}

/// An ordered collection of polygon features in one CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub name: String,
    pub crs: Crs,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: impl Into<String>, crs: Crs, features: Vec<Feature>) -> Self {
        Self { name: name.into(), crs, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}
