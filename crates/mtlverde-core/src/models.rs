pub mod feature;
pub mod parcel;
pub mod records;
pub mod station;
pub mod territory;
pub mod vegetation;

pub use feature::{Crs, Feature, FeatureCollection};
pub use parcel::{parcels_from_collection, GreenSpaceParcel, ParcelId};
pub use records::{Garden, TreeCounts};
pub use station::{
    pollutant_name, AirReading, CategoryCounts, DailyReading, DailyReduction, QualityCategory,
    Station, StationId, POLLUTANT_NAMES,
};
pub use territory::{territories_from_collection, Territory, TerritoryId};
pub use vegetation::{vegetation_from_collection, VegetationCover};

/// Round to three decimals, the precision of every published km² figure
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
