use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::feature::{Feature, FeatureCollection};
use super::territory::TerritoryId;
use crate::error::{LoadError, LoadResult};
use crate::fields::{territory, vegetation as fields};

/// Land-cover breakdown of one territory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationCover {
    pub territory_id: TerritoryId,
    pub name: String,
    pub vegetal_km2: f64,
    pub mineral_km2: f64,
    pub water_km2: f64,
    pub unclassified_km2: f64,
    /// Vegetated share of the vegetal + mineral surface, in percent
    pub vegetal_rate: f64,
}

impl VegetationCover {
    pub fn from_feature(feature: &Feature, index: usize) -> Self {
        let area = |key: &str| feature.get_f64(key).filter(|v| v.is_finite()).unwrap_or(0.0);
        let vegetal_km2 = area(fields::VEGETAL_KM2);
        let mineral_km2 = area(fields::MINERAL_KM2);

        let vegetal_rate = feature
            .get_f64(fields::VEGETAL_RATE)
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| {
                let mut denominator = vegetal_km2 + mineral_km2;
                if denominator == 0.0 {
                    denominator = 1.0;
                }
                vegetal_km2 / denominator * 100.0
            });

        Self {
            territory_id: TerritoryId(
                feature
                    .get_str(territory::ID)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| (index + 1).to_string()),
            ),
            name: feature
                .get_str(territory::NAME)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| territory::UNKNOWN_NAME.to_string()),
            vegetal_km2,
            mineral_km2,
            water_km2: area(fields::WATER_KM2),
            unclassified_km2: area(fields::UNCLASSIFIED_KM2),
            vegetal_rate,
        }
    }

    /// `[vegetal, mineral, other]` where other is water plus unclassified
    pub fn breakdown(&self) -> [f64; 3] {
        [self.vegetal_km2, self.mineral_km2, self.water_km2 + self.unclassified_km2]
    }
}

/// Land-cover rows of a vegetation dataset; a repeated `CODEID` is a load error
pub fn vegetation_from_collection(
    path: &Path,
    collection: &FeatureCollection,
) -> LoadResult<Vec<VegetationCover>> {
    let mut seen = HashSet::new();
    let mut covers = Vec::with_capacity(collection.len());

    for (index, feature) in collection.iter().enumerate() {
        let cover = VegetationCover::from_feature(feature, index);
        if !seen.insert(cover.territory_id.clone()) {
            return Err(LoadError::DuplicateId {
                path: path.to_path_buf(),
                id: cover.territory_id.0,
            });
        }
        covers.push(cover);
    }

    Ok(covers)
}
