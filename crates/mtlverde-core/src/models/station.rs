//! Air-quality monitoring stations and their daily index series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric station identifier (`stationId` / `numero_station`)
pub type StationId = u32;

/// Full names of the pollutant codes reported by the network
pub const POLLUTANT_NAMES: &[(&str, &str)] = &[
    ("NO2", "dioxyde d’azote"),
    ("O3", "Ozone"),
    ("PM", "Particules fines"),
    ("SO2", "Dioxyde de soufre"),
];

/// Full name of a pollutant code, or the code itself when unknown
pub fn pollutant_name(code: &str) -> &str {
    POLLUTANT_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Classification of a daily air-quality index value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityCategory {
    Good,
    Acceptable,
    Bad,
}

impl QualityCategory {
    pub const GOOD_MAX: f64 = 25.0;
    pub const ACCEPTABLE_MAX: f64 = 50.0;

    /// `Good` up to 25 inclusive, `Acceptable` up to 50 inclusive, `Bad` above
    pub fn classify(value: f64) -> Self {
        if value <= Self::GOOD_MAX {
            QualityCategory::Good
        } else if value <= Self::ACCEPTABLE_MAX {
            QualityCategory::Acceptable
        } else {
            QualityCategory::Bad
        }
    }

    /// Label shown on the station panel
    pub fn label(&self) -> &'static str {
        match self {
            QualityCategory::Good => "Bon",
            QualityCategory::Acceptable => "Acceptable",
            QualityCategory::Bad => "Mauvais",
        }
    }
}

impl fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of days per quality category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub good: usize,
    pub acceptable: usize,
    pub bad: usize,
}

impl CategoryCounts {
    pub fn from_readings<'a>(readings: impl IntoIterator<Item = &'a DailyReading>) -> Self {
        let mut counts = Self::default();
        for reading in readings {
            counts.record(reading.category);
        }
        counts
    }

    pub fn record(&mut self, category: QualityCategory) {
        match category {
            QualityCategory::Good => self.good += 1,
            QualityCategory::Acceptable => self.acceptable += 1,
            QualityCategory::Bad => self.bad += 1,
        }
    }

    pub fn get(&self, category: QualityCategory) -> usize {
        match category {
            QualityCategory::Good => self.good,
            QualityCategory::Acceptable => self.acceptable,
            QualityCategory::Bad => self.bad,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.acceptable + self.bad
    }
}

/// How the readings of one station on one day collapse into a single value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyReduction {
    /// Worst pollutant of the day
    #[default]
    Max,
    /// Mean over the day's readings
    Mean,
}

impl fmt::Display for DailyReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DailyReduction::Max => f.write_str("max"),
            DailyReduction::Mean => f.write_str("mean"),
        }
    }
}

/// One raw row of the air-quality index file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirReading {
    pub station_id: StationId,
    pub pollutant: String,
    pub value: f64,
    pub date: NaiveDate,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One point of a station's daily series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReading {
    pub date: NaiveDate,
    pub value: f64,
    pub pollutant: String,
    pub category: QualityCategory,
}

impl DailyReading {
    pub fn new(date: NaiveDate, value: f64, pollutant: impl Into<String>) -> Self {
        Self {
            date,
            value,
            pollutant: pollutant.into(),
            category: QualityCategory::classify(value),
        }
    }
}

/// A monitoring station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Distinct pollutant codes, in the order first reported
    pub pollutants: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(QualityCategory::classify(0.0), QualityCategory::Good);
        assert_eq!(QualityCategory::classify(25.0), QualityCategory::Good);
        assert_eq!(QualityCategory::classify(25.01), QualityCategory::Acceptable);
        assert_eq!(QualityCategory::classify(50.0), QualityCategory::Acceptable);
        assert_eq!(QualityCategory::classify(50.01), QualityCategory::Bad);
        assert_eq!(QualityCategory::classify(400.0), QualityCategory::Bad);
    }

    #[test]
    fn test_category_counts() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let readings = vec![
            DailyReading::new(day(1), 10.0, "O3"),
            DailyReading::new(day(2), 30.0, "PM"),
            DailyReading::new(day(3), 60.0, "PM"),
            DailyReading::new(day(4), 12.0, "NO2"),
        ];
        let counts = CategoryCounts::from_readings(&readings);
        assert_eq!(counts, CategoryCounts { good: 2, acceptable: 1, bad: 1 });
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get(QualityCategory::Bad), 1);
    }

    #[test]
    fn test_pollutant_name() {
        assert_eq!(pollutant_name("PM"), "Particules fines");
        assert_eq!(pollutant_name("o3"), "Ozone");
        assert_eq!(pollutant_name("CO"), "CO");
    }

    #[test]
    fn test_labels() {
        assert_eq!(QualityCategory::Good.to_string(), "Bon");
        assert_eq!(QualityCategory::Bad.label(), "Mauvais");
        assert_eq!(DailyReduction::default().to_string(), "max");
    }
}
