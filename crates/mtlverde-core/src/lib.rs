//! mtlverde Core - Domain models, configuration, name normalization and source readers
//!
//! This crate holds everything the aggregation pipeline needs before any geometry is
//! intersected: the error taxonomy, layered configuration, the canonical name key used
//! to join heterogeneous sources, and readers for the polygon and tabular inputs.

pub mod config;
pub mod error;
pub mod fields;
pub mod formats;
pub mod models;
pub mod names;
pub mod tabular;

pub use error::{GeometryError, LoadError, LoadResult, LookupError, Result, VerdeError};
pub use names::{normalize, AliasTable, NormalizedName};
