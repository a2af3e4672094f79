use mtlverde_core::config::ConfigSource;
use mtlverde_core::models::{DailyReading, VegetationCover};
use mtlverde_query::{StationSummary, TerritorySelection, TerritoryStatsRow};
use serde::Serialize;
use tabled::Tabled;

/// Row of the `territories` table
#[derive(Debug, Tabled)]
pub struct TerritoryTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Territoire")]
    pub name: String,
    #[tabled(rename = "Espaces verts (km²)")]
    pub superficie_km2: String,
    #[tabled(rename = "Parcelles")]
    pub parcel_count: usize,
    #[tabled(rename = "Arbres")]
    pub trees: u64,
    #[tabled(rename = "Remarquables")]
    pub remarkable: u64,
    #[tabled(rename = "Jardins")]
    pub gardens: u64,
}

impl From<&TerritoryStatsRow> for TerritoryTableRow {
    fn from(row: &TerritoryStatsRow) -> Self {
        Self {
            id: row.territory_id.to_string(),
            name: row.name.clone(),
            superficie_km2: if row.has_sufficient_data {
                format!("{:.3}", row.superficie_km2)
            } else {
                format!("({:.3})", row.superficie_km2)
            },
            parcel_count: row.parcel_count,
            trees: row.trees.total,
            remarkable: row.trees.remarkable,
            gardens: row.gardens,
        }
    }
}

/// A filtered parcel, as printed
#[derive(Debug, Serialize, Tabled)]
pub struct ParcelRow {
    #[tabled(rename = "OBJECTID")]
    pub id: String,
    #[tabled(rename = "Nom")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub type_label: String,
    #[tabled(rename = "Superficie (km²)")]
    pub area_km2: f64,
}

/// Output of the `territory` command
#[derive(Debug, Serialize)]
pub struct TerritoryOutput {
    pub territory_id: String,
    pub name: String,
    pub superficie_km2: f64,
    pub parcel_count: usize,
    /// `[longitude, latitude]`
    pub centroid: Option<[f64; 2]>,
    pub parcels: Vec<ParcelRow>,
}

impl From<&TerritorySelection<'_>> for TerritoryOutput {
    fn from(selection: &TerritorySelection<'_>) -> Self {
        Self {
            territory_id: selection.territory_id.to_string(),
            name: selection.name.clone(),
            superficie_km2: selection.superficie_km2,
            parcel_count: selection.parcel_count,
            centroid: selection.centroid.map(|c| [c.x(), c.y()]),
            parcels: selection
                .parcels
                .iter()
                .map(|p| ParcelRow {
                    id: p.id.to_string(),
                    name: p.name.clone(),
                    type_label: p.type_label.clone(),
                    area_km2: p.area_km2(),
                })
                .collect(),
        }
    }
}

/// Row of the `vegetation` table
#[derive(Debug, Tabled)]
pub struct VegetationRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Territoire")]
    pub name: String,
    #[tabled(rename = "Végétal (km²)")]
    pub vegetal: String,
    #[tabled(rename = "Minéral (km²)")]
    pub mineral: String,
    #[tabled(rename = "Autre (km²)")]
    pub other: String,
    #[tabled(rename = "Taux végétal")]
    pub rate: String,
}

impl From<&VegetationCover> for VegetationRow {
    fn from(cover: &VegetationCover) -> Self {
        let [vegetal, mineral, other] = cover.breakdown();
        Self {
            id: cover.territory_id.to_string(),
            name: cover.name.clone(),
            vegetal: format!("{:.2}", vegetal),
            mineral: format!("{:.2}", mineral),
            other: format!("{:.2}", other),
            rate: format!("{:.1} %", cover.vegetal_rate),
        }
    }
}

/// Row of the `stations` table
#[derive(Debug, Tabled)]
pub struct StationRow {
    #[tabled(rename = "Station")]
    pub id: u32,
    #[tabled(rename = "Nom")]
    pub name: String,
    #[tabled(rename = "Polluants")]
    pub pollutants: String,
    #[tabled(rename = "Bon")]
    pub good: usize,
    #[tabled(rename = "Acceptable")]
    pub acceptable: usize,
    #[tabled(rename = "Mauvais")]
    pub bad: usize,
}

impl From<&StationSummary> for StationRow {
    fn from(summary: &StationSummary) -> Self {
        Self {
            id: summary.station.id,
            name: summary.station.name.clone(),
            pollutants: summary.pollutants().join(", "),
            good: summary.counts.good,
            acceptable: summary.counts.acceptable,
            bad: summary.counts.bad,
        }
    }
}

/// Row of the `station` series table
#[derive(Debug, Tabled)]
pub struct SeriesRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Indice")]
    pub value: String,
    #[tabled(rename = "Polluant")]
    pub pollutant: String,
    #[tabled(rename = "Qualité")]
    pub category: String,
}

impl From<&DailyReading> for SeriesRow {
    fn from(reading: &DailyReading) -> Self {
        Self {
            date: reading.date.format("%Y-%m-%d").to_string(),
            value: format!("{:.0}", reading.value),
            pollutant: mtlverde_core::models::pollutant_name(&reading.pollutant).to_string(),
            category: reading.category.to_string(),
        }
    }
}

/// Output of the `station` command
#[derive(Debug, Serialize)]
pub struct StationOutput<'a> {
    pub station: &'a StationSummary,
    pub series: &'a [DailyReading],
}

/// Row of the `config` table
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl ConfigRow {
    pub fn new(key: String, value: String, source: ConfigSource) -> Self {
        Self { key, value, source: format!("{:?}", source) }
    }
}
