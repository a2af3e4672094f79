//! Spatial predicates and measurements on polygonal geometries

use geo::{Area, BooleanOps, BoundingRect, Centroid, Intersects, MultiPolygon, Point, Rect};

/// True geometric intersection test (shared boundary counts). Empty geometries intersect
/// nothing.
pub fn intersects(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
    if a.0.is_empty() || b.0.is_empty() {
        return false;
    }

    // Cheap reject on bounding boxes before the exact test
    match (a.bounding_rect(), b.bounding_rect()) {
        (Some(ra), Some(rb)) if bounding_boxes_intersect(&ra, &rb) => a.intersects(b),
        _ => false,
    }
}

/// Check if two bounding boxes intersect
pub fn bounding_boxes_intersect(bbox1: &Rect<f64>, bbox2: &Rect<f64>) -> bool {
    let x_overlap = bbox1.min().x <= bbox2.max().x && bbox1.max().x >= bbox2.min().x;
    let y_overlap = bbox1.min().y <= bbox2.max().y && bbox1.max().y >= bbox2.min().y;

    x_overlap && y_overlap
}

/// Planar area, in squared units of the geometry's CRS
pub fn area(geometry: &MultiPolygon<f64>) -> f64 {
    geometry.unsigned_area()
}

/// Area of `a ∩ b`
pub fn intersection_area(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> f64 {
    if a.0.is_empty() || b.0.is_empty() {
        return 0.0;
    }
    a.intersection(b).unsigned_area()
}

/// Geometric centroid; `None` for an empty geometry
pub fn centroid(geometry: &MultiPolygon<f64>) -> Option<Point<f64>> {
    geometry.centroid()
}
