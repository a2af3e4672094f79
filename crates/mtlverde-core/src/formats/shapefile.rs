//! Shapefile format reader implementation
//!
//! Shapefiles consist of multiple component files (.shp, .shx, .dbf, .prj). The first
//! three must be present; the .prj is optional and only consulted for the EPSG code.

use ::shapefile::dbase::{self, FieldValue as DbaseFieldValue, Record};
use ::shapefile::{PolygonRing, Reader as ShapefileReader, Shape};
use async_trait::async_trait;
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};
use crate::formats::validation::missing_components;
use crate::formats::{dataset_name, FormatDataset, FormatReader};
use crate::models::Feature;

const FORMAT: &str = "Shapefile";
const REQUIRED_COMPONENTS: &[&str] = &["shp", "shx", "dbf"];

/// Shapefile format reader
pub struct ShapefileFormatReader;

#[async_trait]
impl FormatReader for ShapefileFormatReader {
    async fn read(&self, path: &Path) -> LoadResult<FormatDataset> {
        if !path.exists() {
            return Err(LoadError::NotFound { path: path.to_path_buf() });
        }

        let base = shapefile_base(path);
        let missing = missing_components(&base, REQUIRED_COMPONENTS);
        if !missing.is_empty() {
            return Err(LoadError::MissingComponent {
                path: path.to_path_buf(),
                components: missing,
            });
        }

        let declared_crs = self.extract_crs(&base)?;
        let field_order = field_order(&base)?;

        let mut reader = ShapefileReader::from_path(path).map_err(|e| parse_error(path, e))?;

        let mut features = Vec::new();
        let mut warnings = Vec::new();
        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result.map_err(|e| parse_error(path, e))?;
            let id = features.len().to_string();

            let geometry = match shape_to_multipolygon(&shape) {
                Some(geometry) => geometry,
                None if matches!(shape, Shape::NullShape) => {
                    warnings.push(format!("Feature {} has no geometry", id));
                    MultiPolygon(vec![])
                }
                None => {
                    return Err(LoadError::GeometryType {
                        path: path.to_path_buf(),
                        feature: id,
                        found: format!("{:?}", shape.shapetype()),
                    })
                }
            };

            features.push(Feature::new(id, record_properties(record, &field_order), geometry));
        }

        Ok(FormatDataset {
            name: dataset_name(path),
            format_name: FORMAT.to_string(),
            declared_crs,
            features,
            warnings,
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["shp"]
    }

    fn format_name(&self) -> &str {
        FORMAT
    }
}

impl ShapefileFormatReader {
    /// EPSG code from the .prj file, if there is one and it names an authority
    fn extract_crs(&self, base: &Path) -> LoadResult<Option<u32>> {
        let prj_path = base.with_extension("prj");
        if !prj_path.exists() {
            return Ok(None);
        }

        let prj_content = fs::read_to_string(&prj_path).map_err(|source| LoadError::Io {
            path: prj_path.clone(),
            source,
        })?;

        Ok(parse_epsg_from_wkt(&prj_content))
    }
}

fn shapefile_base(path: &Path) -> PathBuf {
    path.with_extension("")
}

fn parse_error(path: &Path, reason: impl std::fmt::Display) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        format: FORMAT.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse the EPSG code from a WKT string.
///
/// Projected WKT nests the datum's AUTHORITY before the projection's, so the last
/// `AUTHORITY["EPSG","n"]` is the one that identifies the whole CRS.
pub fn parse_epsg_from_wkt(wkt: &str) -> Option<u32> {
    const MARKER: &str = "AUTHORITY[\"EPSG\",\"";

    if let Some(start) = wkt.rfind(MARKER) {
        let code_start = start + MARKER.len();
        if let Some(end) = wkt[code_start..].find('"') {
            if let Ok(code) = wkt[code_start..code_start + end].parse::<u32>() {
                return Some(code);
            }
        }
    }

    if let Some(start) = wkt.find("EPSG:") {
        let code_str: String = wkt[start + 5..].chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(code) = code_str.parse::<u32>() {
            return Some(code);
        }
    }

    None
}

/// Polygon shapes become a MultiPolygon; `None` for every other shape type
fn shape_to_multipolygon(shape: &Shape) -> Option<MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(polygon) => Some(rings_to_multipolygon(polygon.rings(), |p| (p.x, p.y))),
        Shape::PolygonM(polygon) => Some(rings_to_multipolygon(polygon.rings(), |p| (p.x, p.y))),
        Shape::PolygonZ(polygon) => Some(rings_to_multipolygon(polygon.rings(), |p| (p.x, p.y))),
        _ => None,
    }
}

/// Each outer ring starts a polygon; inner rings are holes of the preceding outer ring.
fn rings_to_multipolygon<P>(rings: &[PolygonRing<P>], xy: impl Fn(&P) -> (f64, f64)) -> MultiPolygon<f64> {
    let to_line = |points: &[P]| -> LineString<f64> {
        points
            .iter()
            .map(|p| {
                let (x, y) = xy(p);
                Coord { x, y }
            })
            .collect()
    };

    let mut polygons: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => polygons.push((to_line(points), Vec::new())),
            PolygonRing::Inner(points) => match polygons.last_mut() {
                Some((_, holes)) => holes.push(to_line(points)),
                // A hole before any shell: keep it as its own polygon
                None => polygons.push((to_line(points), Vec::new())),
            },
        }
    }

    MultiPolygon(
        polygons
            .into_iter()
            .map(|(exterior, interiors)| Polygon::new(exterior, interiors))
            .collect(),
    )
}

/// Field names in .dbf header order
fn field_order(base: &Path) -> LoadResult<Vec<String>> {
    let dbf_path = base.with_extension("dbf");
    let table = dbase::Reader::from_path(&dbf_path).map_err(|e| parse_error(&dbf_path, e))?;
    Ok(table.fields().iter().map(|field| field.name().to_string()).collect())
}

/// dBase record as a property bag, fields in header order
fn record_properties(mut record: Record, field_order: &[String]) -> Map<String, Value> {
    let mut properties = Map::new();
    for name in field_order {
        if let Some(value) = record.remove(name) {
            properties.insert(name.clone(), convert_dbase_value(&value));
        }
    }

    // Anything the header did not list goes last, by name
    let mut rest: Vec<(String, DbaseFieldValue)> = record.into_iter().collect();
    rest.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in rest {
        properties.insert(name, convert_dbase_value(&value));
    }

    properties
}

fn number(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// Convert dBase field value to JSON value
fn convert_dbase_value(value: &DbaseFieldValue) -> Value {
    match value {
        DbaseFieldValue::Character(Some(s)) => Value::String(s.trim().to_string()),
        DbaseFieldValue::Numeric(Some(n)) => number(*n),
        DbaseFieldValue::Logical(Some(b)) => Value::Bool(*b),
        DbaseFieldValue::Float(Some(f)) => number(*f as f64),
        DbaseFieldValue::Date(Some(date)) => {
            Value::String(format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()))
        }
        DbaseFieldValue::Integer(i) => Value::Number((*i).into()),
        DbaseFieldValue::Currency(c) => number(*c),
        DbaseFieldValue::Double(d) => number(*d),
        DbaseFieldValue::DateTime(dt) => Value::String(format!(
            "{:04}-{:02}-{:02}",
            dt.date().year(),
            dt.date().month(),
            dt.date().day()
        )),
        DbaseFieldValue::Memo(s) => Value::String(s.clone()),
        DbaseFieldValue::Character(None)
        | DbaseFieldValue::Numeric(None)
        | DbaseFieldValue::Logical(None)
        | DbaseFieldValue::Float(None)
        | DbaseFieldValue::Date(None) => Value::Null,
    }
}
