//! Property and column names of the Montréal open-data sources.

/// Territory boundary file (`montreal.json`)
pub mod territory {
    pub const ID: &str = "CODEID";
    pub const NAME: &str = "NOM";
    pub const UNKNOWN_NAME: &str = "Nom inconnu";
}

/// Green-space parcel file (`espace_vert.geojson`)
pub mod parcel {
    pub const ID: &str = "OBJECTID";
    pub const NAME: &str = "Nom";
    pub const SUPERFICIE: &str = "SUPERFICIE";
    pub const PRIMARY_TYPE: &str = "TYPO1";
    pub const SECONDARY_TYPE: &str = "TYPO2";
    pub const UNKNOWN_NAME: &str = "Nom inconnu";
    pub const UNKNOWN_TYPE: &str = "Type inconnu";
    pub const UNKNOWN_SECONDARY: &str = "Inconnu";
}

/// Vegetation cover file (`taux_veg.geojson`)
pub mod vegetation {
    pub const VEGETAL_KM2: &str = "Veg_km2";
    pub const MINERAL_KM2: &str = "Min_km2";
    pub const WATER_KM2: &str = "Eau_km2";
    pub const UNCLASSIFIED_KM2: &str = "NonCl_km2";
    pub const VEGETAL_RATE: &str = "Veg_Taux";
}

/// Public tree inventory (`arbres-publics.csv`)
pub mod trees {
    pub const BOROUGH: &str = "ARROND_NOM";
    pub const REMARKABLE: &str = "Arbre_remarquable";
    pub const REMARKABLE_FLAG: &str = "O";
}

/// Community garden registry (`jardins-communautaires.csv`)
pub mod gardens {
    pub const NAME: &str = "nom";
    pub const BOROUGH: &str = "arrondissement";
    pub const ADDRESS: &str = "adresse";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
}

/// Air-quality index readings and the station list
pub mod air {
    pub const STATION_ID: &str = "stationId";
    pub const POLLUTANT: &str = "polluant";
    pub const VALUE: &str = "valeur";
    pub const DATE: &str = "date";
    pub const ADDRESS: &str = "adresse";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const STATION_NUMBER: &str = "numero_station";
    pub const STATION_NAME: &str = "nom";
}
