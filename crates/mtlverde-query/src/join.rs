//! Tabular Joiner
//!
//! Attaches name-keyed counts to territories. Keys are alias-resolved normalized names;
//! every base row survives the join and missing counts are zero.

use mtlverde_core::models::{Territory, TerritoryId, TreeCounts};
use mtlverde_core::{AliasTable, NormalizedName};
use mtlverde_geo::GreenSpaceStats;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of a left join, for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinReport {
    /// Base rows that found a count
    pub matched: usize,
    /// Count keys no base row asked for, sorted
    pub unmatched: Vec<NormalizedName>,
}

impl JoinReport {
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Left join `base` onto `counts` by key.
///
/// Output follows `base` order, one entry per base row; a row without a count gets
/// `C::default()`.
pub fn left_join<'a, B, C>(
    base: &'a [B],
    key: impl Fn(&B) -> NormalizedName,
    counts: &BTreeMap<NormalizedName, C>,
) -> (Vec<(&'a B, C)>, JoinReport)
where
    C: Clone + Default,
{
    let mut report = JoinReport::default();
    let mut used = BTreeSet::new();

    let rows = base
        .iter()
        .map(|row| {
            let row_key = key(row);
            let count = match counts.get(&row_key) {
                Some(count) => {
                    report.matched += 1;
                    count.clone()
                }
                None => C::default(),
            };
            used.insert(row_key);
            (row, count)
        })
        .collect();

    report.unmatched = counts.keys().filter(|k| !used.contains(*k)).cloned().collect();
    (rows, report)
}

/// One row of the territory statistics table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerritoryStatsRow {
    pub territory_id: TerritoryId,
    pub name: String,
    pub normalized_name: NormalizedName,
    pub superficie_km2: f64,
    pub parcel_count: usize,
    pub trees: TreeCounts,
    pub gardens: u64,
    /// Enough parcels for the territory to be shown with its statistics
    pub has_sufficient_data: bool,
}

/// Reports of the name-keyed joins behind [`territory_stats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsJoinReport {
    pub trees: JoinReport,
    pub gardens: JoinReport,
}

/// Build the territory statistics table in territory source order
pub fn territory_stats(
    territories: &[Territory],
    green_space: &BTreeMap<TerritoryId, GreenSpaceStats>,
    trees: &BTreeMap<NormalizedName, TreeCounts>,
    gardens: &BTreeMap<NormalizedName, u64>,
    aliases: &AliasTable,
    min_parcels: usize,
) -> (Vec<TerritoryStatsRow>, StatsJoinReport) {
    let key = |t: &Territory| aliases.resolve(t.normalized_name.clone());
    let (tree_rows, tree_report) = left_join(territories, key, trees);
    let (garden_rows, garden_report) = left_join(territories, key, gardens);

    let rows: Vec<TerritoryStatsRow> = tree_rows
        .into_iter()
        .zip(garden_rows)
        .map(|((territory, trees), (_, gardens))| {
            let stats = green_space.get(&territory.id).copied().unwrap_or_default();
            TerritoryStatsRow {
                territory_id: territory.id.clone(),
                name: territory.name.clone(),
                normalized_name: territory.normalized_name.clone(),
                superficie_km2: stats.superficie_km2,
                parcel_count: stats.parcel_count,
                trees,
                gardens,
                has_sufficient_data: stats.parcel_count >= min_parcels,
            }
        })
        .collect();

    for (source, report) in [("tree", &tree_report), ("garden", &garden_report)] {
        if !report.is_complete() {
            tracing::warn!(
                "{} {} keys matched no territory: {}",
                report.unmatched.len(),
                source,
                report
                    .unmatched
                    .iter()
                    .map(NormalizedName::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    (rows, StatsJoinReport { trees: tree_report, gardens: garden_report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::MultiPolygon;

    fn territory(id: &str, name: &str) -> Territory {
        Territory {
            id: TerritoryId::from(id),
            name: name.to_string(),
            normalized_name: NormalizedName::new(name),
            geometry: MultiPolygon(vec![]),
        }
    }

    #[test]
    fn test_left_join_is_total_on_base() {
        let base = vec!["Verdun", "Anjou", "Verdun"];
        let counts: BTreeMap<NormalizedName, u64> = [(NormalizedName::new("verdun"), 4)].into_iter().collect();

        let (rows, report) = left_join(&base, |b| NormalizedName::new(b), &counts);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|(_, c)| *c).collect::<Vec<_>>(), vec![4, 0, 4]);
        assert_eq!(report.matched, 2);
        assert!(report.is_complete());
    }

    #[test]
    fn test_unmatched_keys_reported_sorted() {
        let base = vec!["Verdun"];
        let counts: BTreeMap<NormalizedName, u64> = ["Outremont", "Verdun", "Anjou"]
            .into_iter()
            .map(|n| (NormalizedName::new(n), 1))
            .collect();

        let (_, report) = left_join(&base, |b| NormalizedName::new(b), &counts);

        assert_eq!(report.unmatched, vec![NormalizedName::new("anjou"), NormalizedName::new("outremont")]);
    }

    #[test]
    fn test_territory_stats_defaults_and_threshold() {
        let territories = vec![territory("1", "Le Plateau-Mont-Royal"), territory("2", "Anjou")];
        let green_space: BTreeMap<_, _> = [(
            TerritoryId::from("1"),
            GreenSpaceStats { superficie_km2: 0.9, parcel_count: 12 },
        )]
        .into_iter()
        .collect();
        let trees: BTreeMap<_, _> =
            [(NormalizedName::new("LE PLATEAU MONT ROYAL"), TreeCounts { total: 30, remarkable: 2 })]
                .into_iter()
                .collect();
        let gardens: BTreeMap<_, _> = [(NormalizedName::new("anjou"), 3u64)].into_iter().collect();

        let (rows, report) = territory_stats(&territories, &green_space, &trees, &gardens, &AliasTable::new(), 10);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].trees.total, 30);
        assert_eq!(rows[0].gardens, 0);
        assert!(rows[0].has_sufficient_data);
        assert_eq!(rows[1].superficie_km2, 0.0);
        assert_eq!(rows[1].parcel_count, 0);
        assert_eq!(rows[1].trees, TreeCounts::default());
        assert_eq!(rows[1].gardens, 3);
        assert!(!rows[1].has_sufficient_data);
        assert!(report.trees.is_complete() && report.gardens.is_complete());
    }

    #[test]
    fn test_alias_applies_to_territory_key() {
        let territories = vec![territory("9", "Hochelaga-Maisonneuve")];
        let gardens: BTreeMap<_, _> = [(NormalizedName::new("Maisonneuve"), 5u64)].into_iter().collect();

        let (rows, _) = territory_stats(
            &territories,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &gardens,
            &AliasTable::with_defaults(),
            10,
        );

        assert_eq!(rows[0].gardens, 5);
        assert_eq!(rows[0].name, "Hochelaga-Maisonneuve");
    }
}
