//! Spatial Aggregator
//!
//! For every territory, finds the green-space parcels intersecting it and attributes to
//! it the share of each parcel's nominal superficie that lies inside:
//!
//! ```text
//! ratio      = area(P ∩ T) / area(P)        (0 when area(P) == 0)
//! superficie = Σ P.superficie × ratio / 100  (km², 3 decimals)
//! count      = #{P : P intersects T}
//! ```
//!
//! Territories are not required to be disjoint. Where they overlap, a parcel in the
//! overlap is attributed to each of them in full.

use geo::MultiPolygon;
use mtlverde_core::models::{round3, GreenSpaceParcel, ParcelId, Territory, TerritoryId};
use mtlverde_core::GeometryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::index::SpatialIndex;
use crate::spatial;
use crate::validation::validate_multipolygon;

/// Source areal unit per km²
pub const SUPERFICIE_PER_KM2: f64 = 100.0;

/// Green-space totals of one territory
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GreenSpaceStats {
    pub superficie_km2: f64,
    pub parcel_count: usize,
}

/// Share of one parcel attributed to one territory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub territory_id: TerritoryId,
    pub parcel_id: ParcelId,
    /// Fraction of the parcel's area inside the territory
    pub ratio: f64,
    /// `superficie × ratio`, in the source unit
    pub attributed_area: f64,
}

/// What can be measured on a geometry
#[derive(Debug, Clone, Copy, PartialEq)]
enum Measure {
    /// Valid, with its planar area
    Area(f64),
    /// Ring structure is broken or the area is zero: predicates still apply, area is zero
    Degenerate,
    /// Non-finite coordinates: excluded from every predicate
    Unusable,
}

impl Measure {
    fn of(label: &str, geometry: &MultiPolygon<f64>) -> Self {
        if geometry.0.is_empty() {
            return Measure::Degenerate;
        }

        let validation = validate_multipolygon(geometry);
        if validation.has_non_finite() {
            report(validation.into_error(label));
            return Measure::Unusable;
        }
        if !validation.is_valid() {
            report(validation.into_error(label));
            return Measure::Degenerate;
        }

        Measure::Area(spatial::area(geometry))
    }
}

fn report(error: Option<GeometryError>) {
    if let Some(error) = error {
        tracing::warn!("{}; its area is treated as zero", error);
    }
}

/// Green-space parcels with their R-tree and per-parcel measurements, built once at load.
pub struct ParcelLayer {
    parcels: Vec<GreenSpaceParcel>,
    measures: Vec<Measure>,
    index: SpatialIndex,
}

impl ParcelLayer {
    pub fn new(parcels: Vec<GreenSpaceParcel>) -> Self {
        let measures: Vec<Measure> = parcels
            .iter()
            .map(|parcel| {
                let measure = Measure::of(&format!("parcel {}", parcel.id), &parcel.geometry);
                if measure == Measure::Area(0.0) {
                    report(Some(GeometryError::ZeroArea { id: parcel.id.0.clone() }));
                    return Measure::Degenerate;
                }
                measure
            })
            .collect();

        let index = SpatialIndex::from_geometries(parcels.iter().map(|p| &p.geometry));
        tracing::debug!("Indexed {} of {} parcels", index.len(), parcels.len());

        Self { parcels, measures, index }
    }

    pub fn parcels(&self) -> &[GreenSpaceParcel] {
        &self.parcels
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    /// Positions of the parcels intersecting `geometry`, in source order
    fn intersecting_positions(&self, geometry: &MultiPolygon<f64>) -> Vec<usize> {
        self.index
            .candidates(geometry)
            .into_iter()
            .filter(|&i| self.measures[i] != Measure::Unusable)
            .filter(|&i| spatial::intersects(&self.parcels[i].geometry, geometry))
            .collect()
    }

    /// Parcels whose geometry intersects `geometry`, in source order
    pub fn intersecting(&self, geometry: &MultiPolygon<f64>) -> Vec<&GreenSpaceParcel> {
        self.intersecting_positions(geometry)
            .into_iter()
            .map(|i| &self.parcels[i])
            .collect()
    }

    /// Every (territory, parcel) edge with a true intersection, territories in the given
    /// order and parcels in source order.
    pub fn attribute(&self, territories: &[Territory]) -> Vec<Attribution> {
        let mut attributions = Vec::new();

        for territory in territories {
            let territory_measure = Measure::of(&format!("territory {}", territory.id), &territory.geometry);
            if territory_measure == Measure::Unusable {
                continue;
            }

            for i in self.intersecting_positions(&territory.geometry) {
                let parcel = &self.parcels[i];
                let ratio = match (territory_measure, self.measures[i]) {
                    (Measure::Area(_), Measure::Area(parcel_area)) => {
                        spatial::intersection_area(&parcel.geometry, &territory.geometry) / parcel_area
                    }
                    _ => 0.0,
                };

                attributions.push(Attribution {
                    territory_id: territory.id.clone(),
                    parcel_id: parcel.id.clone(),
                    ratio,
                    attributed_area: parcel.superficie * ratio,
                });
            }
        }

        attributions
    }

    /// Per-territory green-space totals
    pub fn aggregate(&self, territories: &[Territory]) -> BTreeMap<TerritoryId, GreenSpaceStats> {
        let attributions = self.attribute(territories);
        let stats = accumulate(territories, &attributions);

        tracing::info!(
            "Attributed {} parcels to {} territories ({} intersections)",
            self.parcels.len(),
            territories.len(),
            attributions.len()
        );
        stats
    }
}

/// Sum attributions per territory. Every territory gets an entry, zero when nothing
/// intersects it.
pub fn accumulate(
    territories: &[Territory],
    attributions: &[Attribution],
) -> BTreeMap<TerritoryId, GreenSpaceStats> {
    let mut sums: BTreeMap<TerritoryId, (f64, usize)> =
        territories.iter().map(|t| (t.id.clone(), (0.0, 0))).collect();

    for attribution in attributions {
        let entry = sums.entry(attribution.territory_id.clone()).or_insert((0.0, 0));
        entry.0 += attribution.attributed_area;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(id, (superficie, parcel_count))| {
            let stats = GreenSpaceStats {
                superficie_km2: round3(superficie / SUPERFICIE_PER_KM2),
                parcel_count,
            };
            (id, stats)
        })
        .collect()
}

/// Aggregate a parcel set over territories in one call
pub fn aggregate(
    territories: &[Territory],
    parcels: &[GreenSpaceParcel],
) -> BTreeMap<TerritoryId, GreenSpaceStats> {
    ParcelLayer::new(parcels.to_vec()).aggregate(territories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, polygon, LineString, Polygon};
    use mtlverde_core::NormalizedName;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]])
    }

    fn territory(id: &str, geometry: MultiPolygon<f64>) -> Territory {
        Territory {
            id: TerritoryId::from(id),
            name: id.to_string(),
            normalized_name: NormalizedName::new(id),
            geometry,
        }
    }

    fn parcel(id: &str, superficie: f64, geometry: MultiPolygon<f64>) -> GreenSpaceParcel {
        GreenSpaceParcel {
            id: ParcelId(id.to_string()),
            name: id.to_string(),
            type_label: "Parc | Inconnu".to_string(),
            superficie,
            geometry,
        }
    }

    #[test]
    fn test_plateau_scenario() {
        let plateau = territory("Plateau", rect(0.0, 0.0, 10.0, 10.0));
        let parcels = vec![
            // fully inside, ratio 1.0
            parcel("1", 1.0, rect(1.0, 1.0, 2.0, 2.0)),
            // half inside, ratio 0.5
            parcel("2", 2.0, rect(9.0, 1.0, 11.0, 2.0)),
            // a fifth inside, ratio 0.2
            parcel("3", 3.0, rect(9.8, 3.0, 10.8, 4.0)),
            // outside
            parcel("4", 5.0, rect(20.0, 20.0, 21.0, 21.0)),
        ];

        let layer = ParcelLayer::new(parcels);
        let attributions = layer.attribute(std::slice::from_ref(&plateau));
        let ratios: Vec<f64> = attributions.iter().map(|a| a.ratio).collect();
        assert_eq!(ratios.len(), 3);
        for (got, want) in ratios.iter().zip([1.0, 0.5, 0.2]) {
            assert!((got - want).abs() < 1e-9, "ratio {} != {}", got, want);
        }

        let stats = layer.aggregate(&[plateau]);
        let plateau_stats = stats[&TerritoryId::from("Plateau")];
        assert_eq!(plateau_stats.parcel_count, 3);
        assert_eq!(plateau_stats.superficie_km2, round3((1.0 * 1.0 + 2.0 * 0.5 + 3.0 * 0.2) / 100.0));
        assert_eq!(plateau_stats.superficie_km2, 0.026);
    }

    #[test]
    fn test_parcel_split_across_territories() {
        let west = territory("W", rect(0.0, 0.0, 5.0, 10.0));
        let east = territory("E", rect(5.0, 0.0, 10.0, 10.0));
        let parcels = vec![parcel("p", 100.0, rect(4.0, 4.0, 6.0, 5.0))];

        let stats = aggregate(&[west, east], &parcels);

        assert_eq!(stats[&TerritoryId::from("W")].superficie_km2, 0.5);
        assert_eq!(stats[&TerritoryId::from("E")].superficie_km2, 0.5);
        assert_eq!(stats[&TerritoryId::from("W")].parcel_count, 1);
        assert_eq!(stats[&TerritoryId::from("E")].parcel_count, 1);
    }

    #[test]
    fn test_territory_without_parcels_is_zero() {
        let stats = aggregate(
            &[territory("empty", rect(0.0, 0.0, 1.0, 1.0))],
            &[parcel("far", 10.0, rect(5.0, 5.0, 6.0, 6.0))],
        );
        assert_eq!(stats[&TerritoryId::from("empty")], GreenSpaceStats::default());
    }

    #[test]
    fn test_degenerate_parcel_counts_with_zero_area() {
        // A flat sliver: intersects the territory, has no area
        let sliver = MultiPolygon(vec![Polygon::new(
            LineString::new(vec![
                coord! { x: 1.0, y: 1.0 },
                coord! { x: 3.0, y: 1.0 },
                coord! { x: 2.0, y: 1.0 },
                coord! { x: 1.0, y: 1.0 },
            ]),
            vec![],
        )]);
        let parcels = vec![parcel("sliver", 50.0, sliver), parcel("ok", 100.0, rect(1.0, 1.0, 2.0, 2.0))];

        let stats = aggregate(&[territory("t", rect(0.0, 0.0, 10.0, 10.0))], &parcels);
        let t = stats[&TerritoryId::from("t")];

        assert_eq!(t.parcel_count, 2);
        assert_eq!(t.superficie_km2, 1.0);
    }

    #[test]
    fn test_null_and_non_finite_parcels_are_excluded() {
        let broken = MultiPolygon(vec![polygon![
            (x: 1.0, y: 1.0), (x: f64::INFINITY, y: 1.0), (x: 2.0, y: 2.0)
        ]]);
        let parcels = vec![
            parcel("null", 10.0, MultiPolygon(vec![])),
            parcel("inf", 10.0, broken),
            parcel("ok", 10.0, rect(1.0, 1.0, 2.0, 2.0)),
        ];

        let layer = ParcelLayer::new(parcels);
        let hits: Vec<&str> = layer
            .intersecting(&rect(0.0, 0.0, 10.0, 10.0))
            .iter()
            .map(|p| p.id.0.as_str())
            .collect();
        assert_eq!(hits, vec!["ok"]);
    }

    #[test]
    fn test_accumulate_is_order_independent() {
        let territories = vec![territory("a", rect(0.0, 0.0, 1.0, 1.0))];
        let edge = |parcel: &str, area: f64| Attribution {
            territory_id: TerritoryId::from("a"),
            parcel_id: ParcelId(parcel.to_string()),
            ratio: 1.0,
            attributed_area: area,
        };
        let forward = vec![edge("1", 12.5), edge("2", 0.25), edge("3", 7.0)];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(accumulate(&territories, &forward), accumulate(&territories, &backward));
        assert_eq!(accumulate(&territories, &forward)[&TerritoryId::from("a")].superficie_km2, 0.198);
    }
}
