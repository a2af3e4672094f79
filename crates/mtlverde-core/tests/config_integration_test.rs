//! Integration tests for layered configuration
//!
//! Precedence: CLI arguments > Environment variables > Config file > Defaults

use mtlverde_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use mtlverde_core::models::DailyReduction;
use mtlverde_core::AliasTable;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "MTLVERDE_DATA_DIR",
    "MTLVERDE_SOURCE_CRS",
    "MTLVERDE_YEAR",
    "MTLVERDE_DAILY_REDUCTION",
    "MTLVERDE_MIN_PARCELS",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file("year = 2023\n# everything else stays default\n");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.year.value, 2023);
    assert_eq!(config.year.source, ConfigSource::File);
    assert_eq!(config.source_crs.value, 2950);
    assert_eq!(config.source_crs.source, ConfigSource::Default);
    assert_eq!(config.files.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("MTLVERDE_SOURCE_CRS", "32188");
    env::set_var("MTLVERDE_DAILY_REDUCTION", "mean");
    env::set_var("MTLVERDE_MIN_PARCELS", "3");

    let file = config_file("source_crs = 3857\ndaily_reduction = \"max\"\ndata_dir = \"/srv/data\"\n");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.source_crs.value, 32188);
    assert_eq!(config.source_crs.source, ConfigSource::Environment);
    assert_eq!(config.daily_reduction.value, DailyReduction::Mean);
    assert_eq!(config.min_parcels.value, 3);
    // File value survives where no env var is set
    assert_eq!(config.data_dir.value, PathBuf::from("/srv/data"));
    assert_eq!(config.data_dir.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("MTLVERDE_SOURCE_CRS", "mtm8");
    env::set_var("MTLVERDE_YEAR", "last");
    env::set_var("MTLVERDE_DAILY_REDUCTION", "median");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.source_crs.value, 2950);
    assert_eq!(config.source_crs.source, ConfigSource::Default);
    assert_eq!(config.year.value, 2024);
    assert_eq!(config.daily_reduction.value, DailyReduction::Max);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    env::set_var("MTLVERDE_DATA_DIR", "/env/data");
    env::set_var("MTLVERDE_YEAR", "2022");

    let file = config_file("data_dir = \"/file/data\"\nyear = 2023\n");

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    config.update_from_cli(CliConfigOverrides {
        data_dir: Some(PathBuf::from("/cli/data")),
        year: Some(2024),
        ..Default::default()
    });

    assert_eq!(config.data_dir.value, PathBuf::from("/cli/data"));
    assert_eq!(config.data_dir.source, ConfigSource::Cli);
    assert_eq!(config.year.value, 2024);
    assert_eq!(config.year.source, ConfigSource::Cli);

    let map = config.to_inspection_map();
    assert_eq!(map["data_dir"], ("/cli/data".to_string(), ConfigSource::Cli));

    clear_env();
}

#[test]
fn test_configured_aliases_extend_builtin_table() {
    let file = config_file(
        r#"
[[aliases]]
from = "Saint-Dominique"
to = "St-Dominique"
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
    let mut aliases = AliasTable::with_defaults();
    aliases.extend(&config.aliases);

    assert_eq!(aliases.len(), 2);
    assert_eq!(aliases.display_name("SAINT DOMINIQUE"), "St-Dominique");
    assert_eq!(aliases.display_name("Hochelaga-Maisonneuve"), "Maisonneuve");
    assert!(config.to_inspection_map().contains_key("aliases"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/mtlverde.toml");
    assert!(result.is_err());
}
