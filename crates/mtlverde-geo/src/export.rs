//! GeoJSON rendering of parcel subsets for a map layer

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use mtlverde_core::fields::parcel as fields;
use mtlverde_core::models::GreenSpaceParcel;
use serde_json::{json, Map};

/// Property holding the concatenated type label in exported features
pub const TYPE_PROPERTY: &str = "TYPE";

/// One parcel as a GeoJSON feature with `OBJECTID`, `Nom`, `TYPE` and `SUPERFICIE` (km²)
pub fn parcel_feature(parcel: &GreenSpaceParcel) -> Feature {
    let mut properties = Map::new();
    properties.insert(fields::ID.to_string(), json!(parcel.id.0));
    properties.insert(fields::NAME.to_string(), json!(parcel.name));
    properties.insert(TYPE_PROPERTY.to_string(), json!(parcel.type_label));
    properties.insert(fields::SUPERFICIE.to_string(), json!(parcel.area_km2()));

    // An empty MultiPolygon has no meaningful GeoJSON rendering
    let geometry = if parcel.geometry.0.is_empty() {
        None
    } else {
        Some(Geometry::new(GeoJsonValue::from(&parcel.geometry)))
    };

    Feature {
        bbox: None,
        geometry,
        id: Some(Id::String(parcel.id.0.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// A parcel subset as a FeatureCollection, in the given order
pub fn to_feature_collection<'a>(parcels: impl IntoIterator<Item = &'a GreenSpaceParcel>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: parcels.into_iter().map(parcel_feature).collect(),
        foreign_members: None,
    }
}
