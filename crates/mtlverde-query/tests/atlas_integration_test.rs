//! End-to-end tests: data directory → Atlas → queries
//!
//! Covers the startup load of every source, the name-keyed joins across sources that
//! spell boroughs differently, and the neutral result of unknown selections.

use mtlverde_core::config::{CliConfigOverrides, LayeredConfig};
use mtlverde_core::models::{CategoryCounts, QualityCategory, TerritoryId};
use mtlverde_core::{LoadError, VerdeError};
use mtlverde_query::Atlas;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BOUNDARIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "CODEID": 10, "NOM": "Côte-des-Neiges–Notre-Dame-de-Grâce" },
          "geometry": { "type": "Polygon", "coordinates": [[[-73.66,45.46],[-73.60,45.46],[-73.60,45.51],[-73.66,45.51],[-73.66,45.46]]] } },
        { "type": "Feature", "properties": { "CODEID": 20, "NOM": "Hochelaga-Maisonneuve" },
          "geometry": { "type": "Polygon", "coordinates": [[[-73.56,45.53],[-73.52,45.53],[-73.52,45.57],[-73.56,45.57],[-73.56,45.53]]] } }
    ]
}"#;

const PARCELS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "OBJECTID": 1, "Nom": "Parc Kent", "TYPO1": "Parc", "TYPO2": "Parc de quartier", "SUPERFICIE": 50.0 },
          "geometry": { "type": "Polygon", "coordinates": [[[-73.64,45.48],[-73.63,45.48],[-73.63,45.49],[-73.64,45.49],[-73.64,45.48]]] } },
        { "type": "Feature", "properties": { "OBJECTID": 2, "Nom": "Parc Maisonneuve", "TYPO1": "Parc", "SUPERFICIE": 150.0 },
          "geometry": { "type": "Polygon", "coordinates": [[[-73.55,45.55],[-73.54,45.55],[-73.54,45.56],[-73.55,45.56],[-73.55,45.55]]] } }
    ]
}"#;

const VEGETATION: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "CODEID": 10, "NOM": "Côte-des-Neiges–Notre-Dame-de-Grâce", "Veg_km2": 8.0, "Min_km2": 12.0, "Eau_km2": 0.5, "NonCl_km2": 0.5 },
          "geometry": null }
    ]
}"#;

const TREES: &str = "EMP_NO,ARROND_NOM,Arbre_remarquable\n\
1,COTE DES NEIGES - NOTRE DAME DE GRACE,O\n\
2,Côte-des-Neiges-Notre-Dame-de-Grâce,N\n\
3,Mercier-Hochelaga-Maisonneuve,N\n";

const GARDENS: &str = "nom,arrondissement,adresse,latitude,longitude\n\
Jardin Notre-Dame-de-Grâce,Côte-des-Neiges–Notre-Dame-de-Grâce,,45.47,-73.62\n\
Jardin Pierre-Tétreault,Hochelaga Maisonneuve,,45.55,-73.54\n";

const READINGS: &str = "stationId,polluant,valeur,date,heure\n\
6,PM,10,2024-05-01,1\n\
6,O3,8,2024-05-01,2\n\
6,PM,30,2024-05-02,1\n\
6,NO2,60,2024-05-03,1\n\
6,PM,99,2023-05-03,1\n";

const STATIONS: &str = "numero_station,nom\n6,St-Dominique\n";

fn write_data_dir(dir: &Path) {
    fs::write(dir.join("montreal.json"), BOUNDARIES).unwrap();
    fs::write(dir.join("espace_vert.geojson"), PARCELS).unwrap();
    fs::write(dir.join("taux_veg.geojson"), VEGETATION).unwrap();
    fs::write(dir.join("arbres-publics.csv"), TREES).unwrap();
    fs::write(dir.join("jardins-communautaires.csv"), GARDENS).unwrap();
    fs::write(dir.join("rsqa-indice-qualite-air-station-2022-2024.csv"), READINGS).unwrap();
    fs::write(dir.join("liste-des-stations-rsqa.csv"), STATIONS).unwrap();
}

fn config_for(dir: &Path) -> LayeredConfig {
    let mut config = LayeredConfig::with_defaults();
    config.update_from_cli(CliConfigOverrides {
        data_dir: Some(dir.to_path_buf()),
        source_crs: Some(4326),
        ..Default::default()
    });
    config.min_parcels.value = 1;
    config
}

#[tokio::test]
async fn test_load_and_join_all_sources() {
    let temp_dir = TempDir::new().unwrap();
    write_data_dir(temp_dir.path());

    let atlas = Atlas::load(&config_for(temp_dir.path())).await.unwrap();

    let rows = atlas.territory_stats();
    assert_eq!(rows.len(), 2);

    let cdn = &rows[0];
    assert_eq!(cdn.territory_id, TerritoryId::from("10"));
    assert_eq!(cdn.superficie_km2, 0.5);
    assert_eq!(cdn.parcel_count, 1);
    assert_eq!(cdn.trees.total, 2);
    assert_eq!(cdn.trees.remarkable, 1);
    assert_eq!(cdn.gardens, 1);
    assert!(cdn.has_sufficient_data);

    // Boundary, garden registry and alias table all land on the same key
    let hm = &rows[1];
    assert_eq!(hm.superficie_km2, 1.5);
    assert_eq!(hm.gardens, 1);
    assert_eq!(hm.trees.total, 0);

    let unmatched: Vec<_> = atlas.join_report().trees.unmatched.iter().map(|k| k.as_str()).collect();
    assert_eq!(unmatched, vec!["mercierhochelagamaisonneuve"]);

    let cover = atlas.vegetation(&TerritoryId::from("10")).unwrap();
    assert_eq!(cover.breakdown(), [8.0, 12.0, 1.0]);
    assert_eq!(cover.vegetal_rate, 40.0);
}

#[tokio::test]
async fn test_territory_and_station_queries() {
    let temp_dir = TempDir::new().unwrap();
    write_data_dir(temp_dir.path());

    let atlas = Atlas::load(&config_for(temp_dir.path())).await.unwrap();

    let filter = atlas.filter_green_space(&TerritoryId::from("20"));
    assert_eq!(filter.parcels.len(), 1);
    assert_eq!(filter.parcels[0].name, "Parc Maisonneuve");
    let centroid = filter.centroid.unwrap();
    assert!((centroid.x() - -73.54).abs() < 1e-6);
    assert!((centroid.y() - 45.55).abs() < 1e-6);

    let unknown = atlas.filter_green_space(&TerritoryId::from("999"));
    assert!(unknown.parcels.is_empty());

    let series = atlas.station_series(6);
    assert_eq!(series.len(), 3);
    assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(series[0].pollutant, "PM");
    assert_eq!(series[2].category, QualityCategory::Bad);

    let station = atlas.station(6).unwrap();
    assert_eq!(station.station.name, "St-Dominique");
    assert_eq!(station.counts, CategoryCounts { good: 1, acceptable: 1, bad: 1 });
    assert_eq!(station.pollutants(), &["PM".to_string(), "O3".to_string(), "NO2".to_string()]);

    assert!(atlas.station_series(42).is_empty());
}

#[tokio::test]
async fn test_missing_source_fails_the_load() {
    let temp_dir = TempDir::new().unwrap();
    write_data_dir(temp_dir.path());
    fs::remove_file(temp_dir.path().join("arbres-publics.csv")).unwrap();

    let result = Atlas::load(&config_for(temp_dir.path())).await;

    assert!(matches!(result, Err(VerdeError::Load(LoadError::NotFound { .. }))));
}
