//! Polygon dataset readers
//!
//! Each format implements the `FormatReader` trait, and the `FormatRegistry` picks the
//! reader for a path by its extension. Readers return features in the source CRS; the
//! Geometry Store is responsible for reprojection.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::Feature;

pub mod geojson;
pub mod shapefile;
pub mod validation;

pub use self::geojson::GeoJsonReader;
pub use self::shapefile::ShapefileFormatReader;

/// Format reader trait that all format implementations must implement
#[async_trait]
pub trait FormatReader: Send + Sync {
    /// Read a polygon dataset from the given path
    async fn read(&self, path: &Path) -> LoadResult<FormatDataset>;

    /// Get supported file extensions (e.g., ["shp", "geojson"])
    fn supported_extensions(&self) -> &[&str];

    /// Get human-readable format name (e.g., "Shapefile", "GeoJSON")
    fn format_name(&self) -> &str;
}

/// Dataset as read from disk, before reprojection
#[derive(Debug, Clone)]
pub struct FormatDataset {
    /// Dataset name (file stem)
    pub name: String,

    /// Format name, for diagnostics
    pub format_name: String,

    /// EPSG code declared by the file itself, if any
    pub declared_crs: Option<u32>,

    /// Features in source order, geometries in the source CRS
    pub features: Vec<Feature>,

    /// Non-fatal problems met while reading (null geometries)
    pub warnings: Vec<String>,
}

/// Central registry for format readers
pub struct FormatRegistry {
    readers: Vec<Box<dyn FormatReader>>,
}

impl FormatRegistry {
    /// Create a new empty format registry
    pub fn new() -> Self {
        Self { readers: Vec::new() }
    }

    /// Registry holding the GeoJSON and Shapefile readers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GeoJsonReader));
        registry.register(Box::new(ShapefileFormatReader));
        registry
    }

    /// Register a format reader
    pub fn register(&mut self, reader: Box<dyn FormatReader>) {
        self.readers.push(reader);
    }

    /// Detect format and return appropriate reader
    pub fn detect_format(&self, path: &Path) -> LoadResult<&dyn FormatReader> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| LoadError::UnsupportedFormat {
                extension: "none".to_string(),
                supported: self.supported_formats(),
            })?;

        self.readers
            .iter()
            .find(|r| r.supported_extensions().contains(&extension.as_str()))
            .map(|r| r.as_ref())
            .ok_or_else(|| LoadError::UnsupportedFormat {
                extension,
                supported: self.supported_formats(),
            })
    }

    /// Get list of all supported format extensions
    pub fn supported_formats(&self) -> Vec<String> {
        self.readers
            .iter()
            .flat_map(|r| r.supported_extensions())
            .map(|s| s.to_string())
            .collect()
    }

    /// Get all registered readers
    pub fn readers(&self) -> &[Box<dyn FormatReader>] {
        &self.readers
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Dataset name from a file path
pub(crate) fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string()
}
