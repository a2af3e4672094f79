//! Geometry Store
//!
//! Reads a polygon dataset with the reader registered for its extension, settles the
//! source CRS and reprojects every feature to the geographic target reference.

use mtlverde_core::config::TARGET_CRS;
use mtlverde_core::formats::FormatRegistry;
use mtlverde_core::models::{Crs, Feature, FeatureCollection};
use mtlverde_core::{LoadError, LoadResult};
use std::path::Path;

use crate::transform::Reprojector;

/// Loads polygon datasets into reprojected [`FeatureCollection`]s
pub struct GeometryStore {
    registry: FormatRegistry,
    target: Crs,
}

impl GeometryStore {
    /// Store with the default readers, reprojecting to EPSG:4326
    pub fn new() -> Self {
        Self::with_registry(FormatRegistry::with_defaults())
    }

    pub fn with_registry(registry: FormatRegistry) -> Self {
        Self { registry, target: Crs::from_epsg(TARGET_CRS) }
    }

    pub fn target(&self) -> &Crs {
        &self.target
    }

    /// Read `path` and reproject it.
    ///
    /// The source CRS is the one the file declares, else `expected_crs`, else EPSG:4326.
    /// Features keep their source order and property order.
    pub async fn load(&self, path: &Path, expected_crs: Option<u32>) -> LoadResult<FeatureCollection> {
        if !path.exists() {
            return Err(LoadError::NotFound { path: path.to_path_buf() });
        }

        let reader = self.registry.detect_format(path)?;
        let dataset = reader.read(path).await?;

        for warning in &dataset.warnings {
            tracing::warn!("{}: {}", path.display(), warning);
        }

        let source = source_crs(dataset.declared_crs, expected_crs);
        if dataset.declared_crs.is_none() {
            tracing::debug!("{} declares no CRS, assuming {}", path.display(), source.code());
        }

        let reprojector = Reprojector::new(&source, &self.target)?;
        let features = dataset
            .features
            .into_iter()
            .map(|feature| {
                let geometry = reprojector.reproject(&feature.geometry)?;
                Ok(Feature { geometry, ..feature })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        tracing::info!(
            "Loaded {} features from {} ({}, {} -> {})",
            features.len(),
            path.display(),
            dataset.format_name,
            source.code(),
            self.target.code()
        );

        Ok(FeatureCollection::new(dataset.name, self.target.clone(), features))
    }
}

impl Default for GeometryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// CRS a dataset is read in: declared, then expected, then WGS 84
pub fn source_crs(declared: Option<u32>, expected: Option<u32>) -> Crs {
    declared
        .or(expected)
        .map(Crs::from_epsg)
        .unwrap_or_else(Crs::wgs84)
}
