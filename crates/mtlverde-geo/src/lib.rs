//! mtlverde Geo - Geometry loading, reprojection and spatial aggregation
//!
//! This crate turns polygon files into reprojected feature collections and attributes
//! green-space area to territories by intersection ratio.

pub mod aggregate;
pub mod export;
pub mod index;
pub mod spatial;
pub mod store;
pub mod transform;
pub mod validation;

pub use aggregate::{aggregate, Attribution, GreenSpaceStats};
pub use store::GeometryStore;
