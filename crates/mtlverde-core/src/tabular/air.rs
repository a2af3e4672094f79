use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::path::Path;

use super::{field, number_field, CsvTable};
use crate::error::LoadResult;
use crate::fields::air as fields;
use crate::models::{AirReading, StationId};

/// Parse `YYYY-MM-DD`, ignoring any trailing time part
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Station identifiers are integers, sometimes written as `3.0`
pub fn parse_station_id(raw: &str) -> Option<StationId> {
    let raw = raw.trim();
    raw.parse::<StationId>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(StationId::MAX))
            .map(|v| v as StationId)
    })
}

/// Read the air-quality index file, keeping only readings dated in `year`.
///
/// Rows with an unparsable station id, date or value are dropped.
pub fn read_air_readings(path: &Path, year: i32) -> LoadResult<Vec<AirReading>> {
    let mut table = CsvTable::open(path)?;
    let station = table.column(fields::STATION_ID)?;
    let pollutant = table.column(fields::POLLUTANT)?;
    let value = table.column(fields::VALUE)?;
    let date = table.column(fields::DATE)?;
    let address = table.optional_column(fields::ADDRESS);
    let latitude = table.optional_column(fields::LATITUDE);
    let longitude = table.optional_column(fields::LONGITUDE);

    let mut readings = Vec::new();
    let mut unusable = 0usize;
    let mut other_years = 0usize;

    table.for_each_row(|record| {
        let parsed = (
            field(record, station).and_then(parse_station_id),
            field(record, date).and_then(parse_date),
            number_field(record, value),
        );
        let (Some(station_id), Some(date), Some(value)) = parsed else {
            unusable += 1;
            return;
        };
        if date.year() != year {
            other_years += 1;
            return;
        }

        readings.push(AirReading {
            station_id,
            pollutant: field(record, pollutant).unwrap_or_default().to_string(),
            value,
            date,
            address: address.and_then(|i| field(record, i)).map(str::to_string),
            latitude: latitude.and_then(|i| number_field(record, i)),
            longitude: longitude.and_then(|i| number_field(record, i)),
        });
    });

    if unusable > 0 {
        tracing::warn!(
            "Dropped {} air-quality rows with a missing station, date or value in {}",
            unusable,
            table.path().display()
        );
    }
    tracing::info!(
        "Read {} air-quality readings for {} ({} from other years ignored)",
        readings.len(),
        year,
        other_years
    );

    Ok(readings)
}

/// Read the station list: station number to display name
pub fn read_station_names(path: &Path) -> LoadResult<BTreeMap<StationId, String>> {
    let mut table = CsvTable::open(path)?;
    let number = table.column(fields::STATION_NUMBER)?;
    let name = table.column(fields::STATION_NAME)?;

    let mut names = BTreeMap::new();
    table.for_each_row(|record| {
        if let (Some(id), Some(station_name)) =
            (field(record, number).and_then(parse_station_id), field(record, name))
        {
            names.entry(id).or_insert_with(|| station_name.to_string());
        }
    });

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("2024-03-09T14:00:00"), expected);
        assert_eq!(parse_date("2024-03-09 14:00"), expected);
        assert_eq!(parse_date("09/03/2024"), None);
        assert_eq!(parse_date("2024"), None);
    }

    #[test]
    fn test_parse_station_id() {
        assert_eq!(parse_station_id("3"), Some(3));
        assert_eq!(parse_station_id(" 99.0 "), Some(99));
        assert_eq!(parse_station_id("3.5"), None);
        assert_eq!(parse_station_id("x"), None);
    }

    #[test]
    fn test_read_air_readings_filters_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsqa.csv");
        fs::write(
            &path,
            "stationId,polluant,valeur,date,heure,adresse,latitude,longitude\n\
             3,PM,31,2024-01-01,1,1125 rue Ontario Est,45.52,-73.55\n\
             3,O3,12,2024-01-01,1,1125 rue Ontario Est,45.52,-73.55\n\
             3,PM,40,2023-12-31,1,1125 rue Ontario Est,45.52,-73.55\n\
             3,PM,,2024-01-02,1,,,\n\
             17,NO2,8,2024-01-02,1,,,\n",
        )
        .unwrap();

        let readings = read_air_readings(&path, 2024).unwrap();

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].station_id, 3);
        assert_eq!(readings[0].pollutant, "PM");
        assert_eq!(readings[0].address.as_deref(), Some("1125 rue Ontario Est"));
        assert_eq!(readings[2].latitude, None);
        assert!(readings.iter().all(|r| r.date.year() == 2024));
    }

    #[test]
    fn test_read_station_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stations.csv");
        fs::write(
            &path,
            "numero_station,SNPA,statut,nom,adresse\n\
             3,NAPS,ouvert,St-Jean-Baptiste,1050 A boul. St-Jean-Baptiste\n\
             17,NAPS,ouvert,Caserne 17,4240 rue Charleroi\n",
        )
        .unwrap();

        let names = read_station_names(&path).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[&17], "Caserne 17");
    }
}
