//! GeoJSON format reader implementation

use ::geojson::{feature::Id, GeoJson};
use async_trait::async_trait;
use geo::{Geometry, MultiPolygon};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::formats::{dataset_name, FormatDataset, FormatReader};
use crate::models::Feature;

const FORMAT: &str = "GeoJSON";

/// GeoJSON format reader
pub struct GeoJsonReader;

#[async_trait]
impl FormatReader for GeoJsonReader {
    async fn read(&self, path: &Path) -> LoadResult<FormatDataset> {
        if !path.exists() {
            return Err(LoadError::NotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let geojson: GeoJson = content.parse().map_err(|e| parse_error(path, e))?;

        let mut warnings = Vec::new();
        let (features, declared_crs) = match geojson {
            GeoJson::FeatureCollection(fc) => {
                let crs = fc
                    .foreign_members
                    .as_ref()
                    .and_then(|fm| fm.get("crs"))
                    .and_then(extract_epsg_from_crs);

                let features = fc
                    .features
                    .into_iter()
                    .enumerate()
                    .map(|(idx, feature)| convert_feature(path, feature, idx, &mut warnings))
                    .collect::<LoadResult<Vec<_>>>()?;

                (features, crs)
            }
            GeoJson::Feature(feature) => (vec![convert_feature(path, feature, 0, &mut warnings)?], None),
            GeoJson::Geometry(geometry) => {
                let geometry = to_multipolygon(path, "0", Some(geometry), &mut warnings)?;
                (vec![Feature::new("0", Map::new(), geometry)], None)
            }
        };

        Ok(FormatDataset {
            name: dataset_name(path),
            format_name: FORMAT.to_string(),
            declared_crs,
            features,
            warnings,
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "geojson"]
    }

    fn format_name(&self) -> &str {
        FORMAT
    }
}

fn parse_error(path: &Path, reason: impl std::fmt::Display) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        format: FORMAT.to_string(),
        reason: reason.to_string(),
    }
}

fn convert_feature(
    path: &Path,
    feature: ::geojson::Feature,
    idx: usize,
    warnings: &mut Vec<String>,
) -> LoadResult<Feature> {
    let id = feature
        .id
        .as_ref()
        .map(|id| match id {
            Id::String(s) => s.clone(),
            Id::Number(n) => n.to_string(),
        })
        .unwrap_or_else(|| idx.to_string());

    let geometry = to_multipolygon(path, &id, feature.geometry, warnings)?;
    let properties = feature.properties.unwrap_or_default();

    Ok(Feature::new(id, properties, geometry))
}

/// Polygon and MultiPolygon become a MultiPolygon; a null geometry becomes an empty one
fn to_multipolygon(
    path: &Path,
    id: &str,
    geometry: Option<::geojson::Geometry>,
    warnings: &mut Vec<String>,
) -> LoadResult<MultiPolygon<f64>> {
    let Some(geometry) = geometry else {
        warnings.push(format!("Feature {} has no geometry", id));
        return Ok(MultiPolygon(vec![]));
    };

    let found = value_type_name(&geometry.value);
    match Geometry::<f64>::try_from(geometry.value) {
        Ok(Geometry::Polygon(polygon)) => Ok(MultiPolygon(vec![polygon])),
        Ok(Geometry::MultiPolygon(multi)) => Ok(multi),
        Ok(_) => Err(LoadError::GeometryType {
            path: path.to_path_buf(),
            feature: id.to_string(),
            found: found.to_string(),
        }),
        Err(e) => Err(parse_error(path, format!("feature {}: {}", id, e))),
    }
}

fn value_type_name(value: &::geojson::Value) -> &'static str {
    use ::geojson::Value as V;
    match value {
        V::Point(_) => "Point",
        V::MultiPoint(_) => "MultiPoint",
        V::LineString(_) => "LineString",
        V::MultiLineString(_) => "MultiLineString",
        V::Polygon(_) => "Polygon",
        V::MultiPolygon(_) => "MultiPolygon",
        V::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Extract EPSG code from a legacy `crs` member
///
/// Accepts `EPSG:2950` and `urn:ogc:def:crs:EPSG::2950`. The OGC CRS84 urn maps to 4326.
pub fn extract_epsg_from_crs(crs: &Value) -> Option<u32> {
    let name = crs.get("properties")?.get("name")?.as_str()?;
    if name.ends_with("CRS84") {
        return Some(4326);
    }
    name.rsplit(':').next()?.trim().parse().ok()
}
