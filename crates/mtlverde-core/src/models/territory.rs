use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use super::feature::{Feature, FeatureCollection};
use crate::error::{LoadError, LoadResult};
use crate::fields::territory as fields;
use crate::names::NormalizedName;

/// Stable identifier of a territory (`CODEID` in the boundary file)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryId(pub String);

impl TerritoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TerritoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An administrative boundary (borough or reconstituted city)
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    pub id: TerritoryId,
    pub name: String,
    pub normalized_name: NormalizedName,
    pub geometry: MultiPolygon<f64>,
}

impl Territory {
    /// Build from a boundary feature. `index` is the zero-based position in the source and
    /// supplies the id when `CODEID` is missing.
    pub fn from_feature(feature: &Feature, index: usize) -> Self {
        let id = feature
            .get_str(fields::ID)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| (index + 1).to_string());
        let name = feature
            .get_str(fields::NAME)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fields::UNKNOWN_NAME.to_string());

        Self {
            id: TerritoryId(id),
            normalized_name: NormalizedName::new(&name),
            name,
            geometry: feature.geometry.clone(),
        }
    }
}

/// Extract every territory of a boundary collection, in source order.
///
/// Fails with [`LoadError::DuplicateId`] if two features share an id.
pub fn territories_from_collection(
    path: &Path,
    collection: &FeatureCollection,
) -> LoadResult<Vec<Territory>> {
    let mut seen = HashSet::new();
    let mut territories = Vec::with_capacity(collection.len());

    for (index, feature) in collection.iter().enumerate() {
        let territory = Territory::from_feature(feature, index);
        if !seen.insert(territory.id.clone()) {
            return Err(LoadError::DuplicateId {
                path: path.to_path_buf(),
                id: territory.id.0,
            });
        }
        territories.push(territory);
    }

    Ok(territories)
}
