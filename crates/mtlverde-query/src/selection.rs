//! Territory selection: the green-space layer re-filtered to one territory
//!
//! Recomputed on every hover or click; nothing here is cached.

use geo::Point;
use mtlverde_core::models::{GreenSpaceParcel, Territory, TerritoryId};
use mtlverde_geo::aggregate::ParcelLayer;
use mtlverde_geo::export::to_feature_collection;
use mtlverde_geo::spatial;

/// Parcels intersecting a territory, with the point to recenter the map on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GreenSpaceFilter<'a> {
    pub parcels: Vec<&'a GreenSpaceParcel>,
    /// `None` when there is no territory (or it has no geometry)
    pub centroid: Option<Point<f64>>,
}

impl<'a> GreenSpaceFilter<'a> {
    /// The "no data" result
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// Filtered parcels as a GeoJSON layer
    pub fn to_feature_collection(&self) -> geojson::FeatureCollection {
        to_feature_collection(self.parcels.iter().copied())
    }
}

/// Intersecting parcels (source order) and the territory centroid
pub fn filter_green_space<'a>(layer: &'a ParcelLayer, territory: &Territory) -> GreenSpaceFilter<'a> {
    GreenSpaceFilter {
        parcels: layer.intersecting(&territory.geometry),
        centroid: spatial::centroid(&territory.geometry),
    }
}

/// Hover panel of a territory: its published figures plus the filtered layer
#[derive(Debug, Clone, PartialEq)]
pub struct TerritorySelection<'a> {
    pub territory_id: TerritoryId,
    pub name: String,
    pub superficie_km2: f64,
    pub parcel_count: usize,
    pub centroid: Option<Point<f64>>,
    pub parcels: Vec<&'a GreenSpaceParcel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};
    use mtlverde_core::models::ParcelId;
    use mtlverde_core::NormalizedName;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]])
    }

    fn parcel(id: &str, geometry: MultiPolygon<f64>) -> GreenSpaceParcel {
        GreenSpaceParcel {
            id: ParcelId(id.to_string()),
            name: format!("Parc {}", id),
            type_label: "Parc | Inconnu".to_string(),
            superficie: 1.0,
            geometry,
        }
    }

    #[test]
    fn test_filter_keeps_intersecting_in_order() {
        let layer = ParcelLayer::new(vec![
            parcel("a", rect(8.0, 8.0, 12.0, 12.0)),
            parcel("b", rect(30.0, 30.0, 31.0, 31.0)),
            parcel("c", rect(1.0, 1.0, 2.0, 2.0)),
        ]);
        let territory = Territory {
            id: TerritoryId::from("1"),
            name: "Outremont".to_string(),
            normalized_name: NormalizedName::new("Outremont"),
            geometry: rect(0.0, 0.0, 10.0, 10.0),
        };

        let filter = filter_green_space(&layer, &territory);

        let ids: Vec<_> = filter.parcels.iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        let centroid = filter.centroid.unwrap();
        assert!((centroid.x() - 5.0).abs() < 1e-9 && (centroid.y() - 5.0).abs() < 1e-9);
        assert_eq!(filter.to_feature_collection().features.len(), 2);
    }

    #[test]
    fn test_empty_filter() {
        let filter = GreenSpaceFilter::empty();
        assert!(filter.is_empty());
        assert!(filter.centroid.is_none());
        assert!(filter.to_feature_collection().features.is_empty());
    }
}
