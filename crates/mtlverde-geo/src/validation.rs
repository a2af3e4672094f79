use geo::{LineString, MultiPolygon, Polygon};
use mtlverde_core::GeometryError;

/// Validation result with details
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub location: String,
    pub kind: ValidationErrorKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    NonFinite,
    Degenerate,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// `true` when some coordinate is NaN or infinite
    pub fn has_non_finite(&self) -> bool {
        self.errors.iter().any(|e| e.kind == ValidationErrorKind::NonFinite)
    }

    fn add_error(&mut self, location: String, kind: ValidationErrorKind, reason: String) {
        self.errors.push(ValidationError { location, kind, reason });
    }

    /// First error as a [`GeometryError`], prefixed with the feature label
    pub fn into_error(self, label: &str) -> Option<GeometryError> {
        let error = self.errors.into_iter().next()?;
        let location = format!("{} {}", label, error.location);
        Some(match error.kind {
            ValidationErrorKind::NonFinite => GeometryError::NonFinite { location },
            ValidationErrorKind::Degenerate => GeometryError::Degenerate { location, reason: error.reason },
        })
    }
}

fn validate_ring(ring: &LineString<f64>, location: String, result: &mut ValidationResult) {
    if let Some(i) = ring.0.iter().position(|c| !c.x.is_finite() || !c.y.is_finite()) {
        result.add_error(
            format!("{}[{}]", location, i),
            ValidationErrorKind::NonFinite,
            "Coordinates must be finite".to_string(),
        );
        return;
    }

    if ring.0.len() < 4 {
        result.add_error(
            location,
            ValidationErrorKind::Degenerate,
            format!("Ring must have at least 4 points, found {}", ring.0.len()),
        );
        return;
    }

    if let (Some(first), Some(last)) = (ring.0.first(), ring.0.last()) {
        if first != last {
            result.add_error(
                location,
                ValidationErrorKind::Degenerate,
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }
}

pub fn validate_polygon(polygon: &Polygon<f64>) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_ring(polygon.exterior(), "exterior".to_string(), &mut result);
    for (i, interior) in polygon.interiors().iter().enumerate() {
        validate_ring(interior, format!("interior[{}]", i), &mut result);
    }

    result
}

/// Validate every ring of a multipolygon. An empty multipolygon is valid.
pub fn validate_multipolygon(multipolygon: &MultiPolygon<f64>) -> ValidationResult {
    let mut result = ValidationResult::default();

    for (i, polygon) in multipolygon.0.iter().enumerate() {
        for error in validate_polygon(polygon).errors {
            result.add_error(format!("polygon[{}].{}", i, error.location), error.kind, error.reason);
        }
    }

    result
}
