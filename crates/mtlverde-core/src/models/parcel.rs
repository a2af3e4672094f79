use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::feature::{Feature, FeatureCollection};
use super::round3;
use crate::fields::parcel as fields;

/// Stable identifier of a green-space parcel (`OBJECTID`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelId(pub String);

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A park, garden or other green area
#[derive(Debug, Clone, PartialEq)]
pub struct GreenSpaceParcel {
    pub id: ParcelId,
    pub name: String,
    /// `"{TYPO1} | {TYPO2}"`
    pub type_label: String,
    /// Nominal area in the source unit (`SUPERFICIE`), never negative
    pub superficie: f64,
    pub geometry: MultiPolygon<f64>,
}

impl GreenSpaceParcel {
    pub fn from_feature(feature: &Feature, index: usize) -> Self {
        let id = feature
            .get_str(fields::ID)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| (index + 1).to_string());
        let name = feature
            .get_str(fields::NAME)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fields::UNKNOWN_NAME.to_string());
        let superficie = feature
            .get_f64(fields::SUPERFICIE)
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(0.0);

        Self {
            id: ParcelId(id),
            name,
            type_label: type_label(
                feature.get_str(fields::PRIMARY_TYPE).as_deref(),
                feature.get_str(fields::SECONDARY_TYPE).as_deref(),
            ),
            superficie,
            geometry: feature.geometry.clone(),
        }
    }

    /// Nominal area in km²
    pub fn area_km2(&self) -> f64 {
        round3(self.superficie / 100.0)
    }
}

fn type_label(primary: Option<&str>, secondary: Option<&str>) -> String {
    match primary.filter(|s| !s.is_empty()) {
        None => fields::UNKNOWN_TYPE.to_string(),
        Some(primary) => {
            let secondary = secondary.filter(|s| !s.is_empty()).unwrap_or(fields::UNKNOWN_SECONDARY);
            format!("{} | {}", primary, secondary)
        }
    }
}

/// Extract every parcel of a green-space collection, in source order
pub fn parcels_from_collection(collection: &FeatureCollection) -> Vec<GreenSpaceParcel> {
    collection
        .iter()
        .enumerate()
        .map(|(index, feature)| GreenSpaceParcel::from_feature(feature, index))
        .collect()
}
