//! The Atlas: everything loaded at startup, aggregated once, then read-only
//!
//! Loading reads the independent sources concurrently, then runs the Spatial Aggregator
//! and the joins. An `Atlas` only exists once all of that has finished, so queries never
//! see a partial aggregation.

use mtlverde_core::config::LayeredConfig;
use mtlverde_core::models::{
    parcels_from_collection, territories_from_collection, vegetation_from_collection, AirReading,
    DailyReading, DailyReduction, FeatureCollection, Garden, GreenSpaceParcel, StationId, Territory,
    TerritoryId, VegetationCover,
};
use mtlverde_core::tabular::{self, TreeRecord};
use mtlverde_core::{AliasTable, LoadError, LoadResult, LookupError, Result};
use mtlverde_geo::aggregate::ParcelLayer;
use mtlverde_geo::GeometryStore;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::air::{AirQualityIndex, StationSummary};
use crate::join::{territory_stats, StatsJoinReport, TerritoryStatsRow};
use crate::selection::{filter_green_space, GreenSpaceFilter, TerritorySelection};

/// Raw inputs of an [`Atlas`], already parsed
#[derive(Debug, Clone)]
pub struct AtlasSources {
    pub territories: Vec<Territory>,
    pub parcels: Vec<GreenSpaceParcel>,
    pub vegetation: Vec<VegetationCover>,
    pub trees: Vec<TreeRecord>,
    pub gardens: Vec<Garden>,
    pub air_readings: Vec<AirReading>,
    pub station_names: BTreeMap<StationId, String>,
}

/// Settings that shape the aggregation
#[derive(Debug, Clone)]
pub struct AtlasOptions {
    pub aliases: AliasTable,
    pub daily_reduction: DailyReduction,
    pub min_parcels: usize,
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            aliases: AliasTable::with_defaults(),
            daily_reduction: DailyReduction::Max,
            min_parcels: 10,
        }
    }
}

impl AtlasOptions {
    pub fn from_config(config: &LayeredConfig) -> Self {
        let mut aliases = AliasTable::with_defaults();
        aliases.extend(&config.aliases);
        Self {
            aliases,
            daily_reduction: config.daily_reduction.value,
            min_parcels: config.min_parcels.value,
        }
    }
}

pub struct Atlas {
    territories: Vec<Territory>,
    territory_index: BTreeMap<TerritoryId, usize>,
    parcels: ParcelLayer,
    stats: Vec<TerritoryStatsRow>,
    join_report: StatsJoinReport,
    vegetation: BTreeMap<TerritoryId, VegetationCover>,
    gardens: Vec<Garden>,
    air: AirQualityIndex,
}

impl Atlas {
    /// Load every dataset named by the configuration and aggregate.
    ///
    /// The seven sources are read in parallel on the blocking pool. Any missing or
    /// unreadable source fails the whole load.
    pub async fn load(config: &LayeredConfig) -> Result<Self> {
        let files = &config.files.value;
        let source_crs = Some(config.source_crs.value);
        let year = config.year.value;
        let store = Arc::new(GeometryStore::new());

        let territory_path = config.data_path(&files.territories);
        let parcel_path = config.data_path(&files.parcels);
        let vegetation_path = config.data_path(&files.vegetation);
        let tree_path = config.data_path(&files.trees);
        let garden_path = config.data_path(&files.gardens);
        let air_path = config.data_path(&files.air_readings);
        let station_path = config.data_path(&files.stations);

        tracing::info!("Loading datasets from {}", config.data_dir.value.display());

        let (boundaries, green_space, vegetation, trees, gardens, air_readings, station_names) = tokio::try_join!(
            load_geometry(store.clone(), territory_path.clone(), source_crs),
            load_geometry(store.clone(), parcel_path, source_crs),
            load_geometry(store, vegetation_path.clone(), source_crs),
            blocking(tree_path, tabular::read_trees),
            blocking(garden_path, tabular::read_gardens),
            blocking(air_path, move |path| tabular::read_air_readings(path, year)),
            blocking(station_path, tabular::read_station_names),
        )?;

        let sources = AtlasSources {
            territories: territories_from_collection(&territory_path, &boundaries)?,
            parcels: parcels_from_collection(&green_space),
            vegetation: vegetation_from_collection(&vegetation_path, &vegetation)?,
            trees,
            gardens,
            air_readings,
            station_names,
        };

        Ok(Self::build(sources, AtlasOptions::from_config(config)))
    }

    /// Aggregate already-parsed sources
    pub fn build(sources: AtlasSources, options: AtlasOptions) -> Self {
        let AtlasSources {
            territories,
            parcels,
            vegetation,
            trees,
            gardens,
            air_readings,
            station_names,
        } = sources;

        let parcels = ParcelLayer::new(parcels);
        let green_space = parcels.aggregate(&territories);

        let tree_counts = tabular::tree_counts(&trees, &options.aliases);
        let garden_counts = tabular::garden_counts(&gardens, &options.aliases);
        let (stats, join_report) = territory_stats(
            &territories,
            &green_space,
            &tree_counts,
            &garden_counts,
            &options.aliases,
            options.min_parcels,
        );

        let air = AirQualityIndex::build(&air_readings, &station_names, &options.aliases, options.daily_reduction);

        let territory_index = territories
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        let mut vegetation_by_id = BTreeMap::new();
        for cover in vegetation {
            match vegetation_by_id.entry(cover.territory_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(cover);
                }
                Entry::Occupied(_) => {
                    tracing::warn!("Duplicate vegetation row for territory {}, keeping the first", cover.territory_id);
                }
            }
        }

        tracing::info!(
            "Atlas ready: {} territories, {} parcels, {} gardens, {} stations",
            territories.len(),
            parcels.len(),
            gardens.len(),
            air.len()
        );

        Self {
            territories,
            territory_index,
            parcels,
            stats,
            join_report,
            vegetation: vegetation_by_id,
            gardens,
            air,
        }
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn territory(&self, id: &TerritoryId) -> Option<&Territory> {
        self.territory_index.get(id).map(|&i| &self.territories[i])
    }

    pub fn parcels(&self) -> &[GreenSpaceParcel] {
        self.parcels.parcels()
    }

    pub fn gardens(&self) -> &[Garden] {
        &self.gardens
    }

    /// Territory statistics table, in boundary-file order
    pub fn territory_stats(&self) -> &[TerritoryStatsRow] {
        &self.stats
    }

    pub fn join_report(&self) -> &StatsJoinReport {
        &self.join_report
    }

    fn stats_row(&self, id: &TerritoryId) -> Option<&TerritoryStatsRow> {
        self.territory_index.get(id).map(|&i| &self.stats[i])
    }

    pub fn try_filter_green_space(&self, id: &TerritoryId) -> std::result::Result<GreenSpaceFilter<'_>, LookupError> {
        let territory = self
            .territory(id)
            .ok_or_else(|| LookupError::UnknownTerritory { id: id.to_string() })?;
        Ok(filter_green_space(&self.parcels, territory))
    }

    /// Parcels intersecting the territory and its centroid; empty for an unknown id
    pub fn filter_green_space(&self, id: &TerritoryId) -> GreenSpaceFilter<'_> {
        match self.try_filter_green_space(id) {
            Ok(filter) => {
                tracing::debug!("Territory {}: {} intersecting parcels", id, filter.parcels.len());
                filter
            }
            Err(e) => {
                tracing::debug!("{}", e);
                GreenSpaceFilter::empty()
            }
        }
    }

    /// Hover panel for a territory; `None` for an unknown id
    pub fn select_territory(&self, id: &TerritoryId) -> Option<TerritorySelection<'_>> {
        let row = self.stats_row(id)?;
        let filter = self.filter_green_space(id);
        Some(TerritorySelection {
            territory_id: row.territory_id.clone(),
            name: row.name.clone(),
            superficie_km2: row.superficie_km2,
            parcel_count: row.parcel_count,
            centroid: filter.centroid,
            parcels: filter.parcels,
        })
    }

    /// Land-cover breakdown of a territory
    pub fn vegetation(&self, id: &TerritoryId) -> Option<&VegetationCover> {
        let cover = self.vegetation.get(id);
        if cover.is_none() {
            tracing::debug!("{}", LookupError::UnknownTerritory { id: id.to_string() });
        }
        cover
    }

    /// Every land-cover breakdown, ordered by territory id
    pub fn vegetation_covers(&self) -> Vec<&VegetationCover> {
        self.vegetation.values().collect()
    }

    /// All stations, ordered by id
    pub fn stations(&self) -> Vec<&StationSummary> {
        self.air.stations()
    }

    pub fn station(&self, id: StationId) -> Option<&StationSummary> {
        self.air.try_summary(id).ok()
    }

    /// Daily series of a station, dates ascending; empty for an unknown id
    pub fn station_series(&self, id: StationId) -> &[DailyReading] {
        match self.air.try_series(id) {
            Ok(series) => series,
            Err(e) => {
                tracing::debug!("{}", e);
                &[]
            }
        }
    }
}

/// Run one file load on the blocking pool
async fn blocking<T, F>(path: PathBuf, load: F) -> LoadResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Path) -> LoadResult<T> + Send + 'static,
{
    let task_path = path.clone();
    tokio::task::spawn_blocking(move || load(&task_path))
        .await
        .map_err(|e| LoadError::Interrupted { path, reason: e.to_string() })?
}

/// Geometry Store load on the blocking pool
async fn load_geometry(
    store: Arc<GeometryStore>,
    path: PathBuf,
    expected_crs: Option<u32>,
) -> LoadResult<FeatureCollection> {
    let handle = tokio::runtime::Handle::current();
    blocking(path, move |path| handle.block_on(store.load(path, expected_crs))).await
}
