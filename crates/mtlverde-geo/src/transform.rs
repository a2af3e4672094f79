//! CRS transformation

use geo::{Coord, MapCoords, MultiPolygon};
use mtlverde_core::models::Crs;
use mtlverde_core::{LoadError, LoadResult};
use proj::Proj;

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.epsg == crs2.epsg
}

/// A prepared EPSG to EPSG transformation. Same-CRS transformations are a no-op.
pub struct Reprojector {
    from: Crs,
    to: Crs,
    proj: Option<Proj>,
}

impl Reprojector {
    pub fn new(from: &Crs, to: &Crs) -> LoadResult<Self> {
        let proj = if crs_match(from, to) {
            None
        } else {
            let proj = Proj::new_known_crs(&from.code(), &to.code(), None)
                .map_err(|e| projection_error(from, to, e))?;
            Some(proj)
        };

        Ok(Self { from: from.clone(), to: to.clone(), proj })
    }

    pub fn is_identity(&self) -> bool {
        self.proj.is_none()
    }

    pub fn target(&self) -> &Crs {
        &self.to
    }

    /// Reproject every coordinate of a geometry
    pub fn reproject(&self, geometry: &MultiPolygon<f64>) -> LoadResult<MultiPolygon<f64>> {
        let Some(proj) = &self.proj else {
            return Ok(geometry.clone());
        };

        geometry
            .try_map_coords(|coord| proj.convert((coord.x, coord.y)).map(|(x, y)| Coord { x, y }))
            .map_err(|e| projection_error(&self.from, &self.to, e))
    }
}

fn projection_error(from: &Crs, to: &Crs, reason: impl std::fmt::Display) -> LoadError {
    LoadError::Projection {
        from: from.code(),
        to: to.code(),
        reason: reason.to_string(),
    }
}
