//! Error types for mtlverde
//!
//! Three categories with three propagation policies:
//! - [`LoadError`] aborts startup; no partially loaded dataset is ever returned.
//! - [`LookupError`] comes from an on-demand query with an unknown id and is absorbed
//!   into an empty result by the query layer.
//! - [`GeometryError`] is raised while measuring a degenerate shape; callers log it and
//!   treat the area as zero.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Source file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} file {path}: {reason}")]
    Parse {
        path: PathBuf,
        format: String,
        reason: String,
    },

    #[error("Unsupported format: .{extension} (supported: {})", supported.join(", "))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },

    #[error("Missing component files for {path}: {}", components.join(", "))]
    MissingComponent {
        path: PathBuf,
        components: Vec<String>,
    },

    #[error("Feature {feature} in {path} is a {found}, expected Polygon or MultiPolygon")]
    GeometryType {
        path: PathBuf,
        feature: String,
        found: String,
    },

    #[error("Duplicate identifier {id} in {path}")]
    DuplicateId { path: PathBuf, id: String },

    #[error("Failed to reproject from {from} to {to}: {reason}")]
    Projection {
        from: String,
        to: String,
        reason: String,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Loading {path} did not complete: {reason}")]
    Interrupted { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Unknown territory: {id}")]
    UnknownTerritory { id: String },

    #[error("Unknown station: {id}")]
    UnknownStation { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Non-finite coordinate at {location}")]
    NonFinite { location: String },

    #[error("Degenerate geometry at {location}: {reason}")]
    Degenerate { location: String, reason: String },

    #[error("Parcel {id} has zero area")]
    ZeroArea { id: String },
}

#[derive(Debug, Error)]
pub enum VerdeError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, VerdeError>;

/// Result of a startup load step.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
