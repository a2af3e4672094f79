//! Air-quality station series
//!
//! Raw readings collapse to one value per station per day. Category counts are derived
//! once when the index is built; series lookups are pure filters over it.

use chrono::NaiveDate;
use mtlverde_core::models::{AirReading, CategoryCounts, DailyReading, DailyReduction, Station, StationId};
use mtlverde_core::{AliasTable, LookupError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reduce readings to one [`DailyReading`] per station and day, dates ascending.
///
/// With [`DailyReduction::Max`] the day keeps its worst reading and that reading's
/// pollutant; on ties the first row read wins. With [`DailyReduction::Mean`] the value is
/// the mean of the day and the pollutant is still that of the worst reading.
pub fn daily_series(
    readings: &[AirReading],
    reduction: DailyReduction,
) -> BTreeMap<StationId, Vec<DailyReading>> {
    // (worst value, its pollutant, sum, count)
    let mut days: BTreeMap<(StationId, NaiveDate), (f64, &str, f64, usize)> = BTreeMap::new();

    for reading in readings {
        days.entry((reading.station_id, reading.date))
            .and_modify(|day| {
                if reading.value > day.0 {
                    day.0 = reading.value;
                    day.1 = reading.pollutant.as_str();
                }
                day.2 += reading.value;
                day.3 += 1;
            })
            .or_insert((reading.value, reading.pollutant.as_str(), reading.value, 1));
    }

    let mut series: BTreeMap<StationId, Vec<DailyReading>> = BTreeMap::new();
    for ((station_id, date), (worst, pollutant, sum, count)) in days {
        let value = match reduction {
            DailyReduction::Max => worst,
            DailyReduction::Mean => sum / count as f64,
        };
        series
            .entry(station_id)
            .or_default()
            .push(DailyReading::new(date, value, pollutant));
    }

    series
}

/// A station with its day counts, as listed on the station map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub station: Station,
    pub counts: CategoryCounts,
}

impl StationSummary {
    pub fn pollutants(&self) -> &[String] {
        &self.station.pollutants
    }
}

#[derive(Debug, Clone)]
struct StationEntry {
    summary: StationSummary,
    series: Vec<DailyReading>,
}

/// Every station of the configured year, keyed by id
#[derive(Debug, Clone, Default)]
pub struct AirQualityIndex {
    stations: BTreeMap<StationId, StationEntry>,
}

impl AirQualityIndex {
    /// Build from the year's readings and the station list.
    ///
    /// Station metadata comes from the first reading of each station; names come from the
    /// station list through the alias table.
    pub fn build(
        readings: &[AirReading],
        names: &BTreeMap<StationId, String>,
        aliases: &AliasTable,
        reduction: DailyReduction,
    ) -> Self {
        let mut metadata: BTreeMap<StationId, Station> = BTreeMap::new();
        for reading in readings {
            let station = metadata.entry(reading.station_id).or_insert_with(|| Station {
                id: reading.station_id,
                name: names
                    .get(&reading.station_id)
                    .map(|name| aliases.display_name(name))
                    .unwrap_or_else(|| format!("Station {}", reading.station_id)),
                address: reading.address.clone(),
                latitude: reading.latitude,
                longitude: reading.longitude,
                pollutants: Vec::new(),
            });
            if !reading.pollutant.is_empty() && !station.pollutants.contains(&reading.pollutant) {
                station.pollutants.push(reading.pollutant.clone());
            }
        }

        let mut series = daily_series(readings, reduction);
        let stations: BTreeMap<StationId, StationEntry> = metadata
            .into_iter()
            .map(|(id, station)| {
                let series = series.remove(&id).unwrap_or_default();
                let counts = CategoryCounts::from_readings(&series);
                (id, StationEntry { summary: StationSummary { station, counts }, series })
            })
            .collect();

        tracing::info!(
            "Indexed {} stations over {} readings ({} daily reduction)",
            stations.len(),
            readings.len(),
            reduction
        );

        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// All stations, ordered by id
    pub fn stations(&self) -> Vec<&StationSummary> {
        self.stations.values().map(|entry| &entry.summary).collect()
    }

    pub fn try_summary(&self, id: StationId) -> Result<&StationSummary, LookupError> {
        self.stations
            .get(&id)
            .map(|entry| &entry.summary)
            .ok_or_else(|| LookupError::UnknownStation { id: id.to_string() })
    }

    /// Daily series of a station, dates ascending
    pub fn try_series(&self, id: StationId) -> Result<&[DailyReading], LookupError> {
        self.stations
            .get(&id)
            .map(|entry| entry.series.as_slice())
            .ok_or_else(|| LookupError::UnknownStation { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtlverde_core::models::QualityCategory;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn reading(station_id: StationId, d: u32, pollutant: &str, value: f64) -> AirReading {
        AirReading {
            station_id,
            pollutant: pollutant.to_string(),
            value,
            date: day(d),
            address: None,
            latitude: Some(45.5),
            longitude: Some(-73.6),
        }
    }

    #[test]
    fn test_daily_max_keeps_worst_pollutant() {
        let readings = vec![
            reading(3, 2, "O3", 18.0),
            reading(3, 1, "PM", 31.0),
            reading(3, 1, "O3", 12.0),
            reading(3, 1, "NO2", 31.0),
            reading(7, 1, "SO2", 2.0),
        ];

        let series = daily_series(&readings, DailyReduction::Max);

        let station = &series[&3];
        assert_eq!(station.len(), 2);
        assert_eq!(station[0].date, day(1));
        assert_eq!(station[0].value, 31.0);
        // Tie: the first row read wins
        assert_eq!(station[0].pollutant, "PM");
        assert_eq!(station[0].category, QualityCategory::Acceptable);
        assert_eq!(station[1].date, day(2));
        assert_eq!(series[&7].len(), 1);
    }

    #[test]
    fn test_daily_mean_keeps_worst_pollutant() {
        let readings = vec![reading(3, 1, "O3", 10.0), reading(3, 1, "PM", 60.0)];

        let series = daily_series(&readings, DailyReduction::Mean);

        assert_eq!(series[&3][0].value, 35.0);
        assert_eq!(series[&3][0].pollutant, "PM");
        assert_eq!(series[&3][0].category, QualityCategory::Acceptable);
    }

    #[test]
    fn test_index_metadata_and_lookup() {
        let readings = vec![
            reading(80, 1, "PM", 10.0),
            reading(80, 1, "NO2", 4.0),
            reading(80, 2, "PM", 60.0),
            reading(99, 1, "O3", 20.0),
        ];
        let names: BTreeMap<_, _> = [(80, "Hochelaga-Maisonneuve".to_string())].into_iter().collect();

        let index = AirQualityIndex::build(&readings, &names, &AliasTable::with_defaults(), DailyReduction::Max);

        assert_eq!(index.len(), 2);
        let summary = index.try_summary(80).unwrap();
        assert_eq!(summary.station.name, "Maisonneuve");
        assert_eq!(summary.pollutants(), &["PM".to_string(), "NO2".to_string()]);
        assert_eq!(summary.counts, CategoryCounts { good: 1, acceptable: 0, bad: 1 });
        assert_eq!(index.try_summary(99).unwrap().station.name, "Station 99");

        assert_eq!(index.try_series(80).unwrap().len(), 2);
        assert_eq!(index.try_series(1), Err(LookupError::UnknownStation { id: "1".to_string() }));

        let ids: Vec<_> = index.stations().iter().map(|s| s.station.id).collect();
        assert_eq!(ids, vec![80, 99]);
    }
}
