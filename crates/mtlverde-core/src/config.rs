use crate::error::{Result, VerdeError};
use crate::models::DailyReduction;
use crate::names::AliasEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Geographic reference every dataset is reprojected to
pub const TARGET_CRS: u32 = 4326;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// File names of the datasets inside `data_dir`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub territories: String,
    pub parcels: String,
    pub vegetation: String,
    pub trees: String,
    pub gardens: String,
    pub air_readings: String,
    pub stations: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            territories: "montreal.json".to_string(),
            parcels: "espace_vert.geojson".to_string(),
            vegetation: "taux_veg.geojson".to_string(),
            trees: "arbres-publics.csv".to_string(),
            gardens: "jardins-communautaires.csv".to_string(),
            air_readings: "rsqa-indice-qualite-air-station-2022-2024.csv".to_string(),
            stations: "liste-des-stations-rsqa.csv".to_string(),
        }
    }
}

/// Layered configuration for mtlverde
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub data_dir: ConfigValue<PathBuf>,
    pub source_crs: ConfigValue<u32>,
    pub year: ConfigValue<i32>,
    pub daily_reduction: ConfigValue<DailyReduction>,
    pub min_parcels: ConfigValue<usize>,
    pub files: ConfigValue<DataFiles>,
    /// Extra aliases appended to the built-in table
    pub aliases: Vec<AliasEntry>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            data_dir: ConfigValue::new(PathBuf::from("data"), ConfigSource::Default),
            source_crs: ConfigValue::new(2950, ConfigSource::Default),
            year: ConfigValue::new(2024, ConfigSource::Default),
            daily_reduction: ConfigValue::new(DailyReduction::Max, ConfigSource::Default),
            min_parcels: ConfigValue::new(10, ConfigSource::Default),
            files: ConfigValue::new(DataFiles::default(), ConfigSource::Default),
            aliases: Vec::new(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| VerdeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| VerdeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(data_dir) = file_config.data_dir {
            self.data_dir.update(data_dir, ConfigSource::File);
        }

        if let Some(source_crs) = file_config.source_crs {
            self.source_crs.update(source_crs, ConfigSource::File);
        }

        if let Some(year) = file_config.year {
            self.year.update(year, ConfigSource::File);
        }

        if let Some(reduction) = file_config.daily_reduction {
            self.daily_reduction.update(parse_daily_reduction(&reduction)?, ConfigSource::File);
        }

        if let Some(min_parcels) = file_config.min_parcels {
            self.min_parcels.update(min_parcels, ConfigSource::File);
        }

        if let Some(files) = file_config.files {
            self.files.update(files, ConfigSource::File);
        }

        self.aliases.extend(file_config.aliases);

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // MTLVERDE_DATA_DIR
        if let Ok(dir) = env::var("MTLVERDE_DATA_DIR") {
            self.data_dir.update(PathBuf::from(dir), ConfigSource::Environment);
        }

        // MTLVERDE_SOURCE_CRS
        if let Ok(crs_str) = env::var("MTLVERDE_SOURCE_CRS") {
            match crs_str.parse::<u32>() {
                Ok(crs) => self.source_crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid MTLVERDE_SOURCE_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        // MTLVERDE_YEAR
        if let Ok(year_str) = env::var("MTLVERDE_YEAR") {
            match year_str.parse::<i32>() {
                Ok(year) => self.year.update(year, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid MTLVERDE_YEAR value '{}': expected a calendar year",
                    year_str
                ),
            }
        }

        // MTLVERDE_DAILY_REDUCTION
        if let Ok(reduction_str) = env::var("MTLVERDE_DAILY_REDUCTION") {
            match parse_daily_reduction(&reduction_str) {
                Ok(reduction) => self.daily_reduction.update(reduction, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid MTLVERDE_DAILY_REDUCTION value '{}': expected max or mean",
                    reduction_str
                ),
            }
        }

        // MTLVERDE_MIN_PARCELS
        if let Ok(min_str) = env::var("MTLVERDE_MIN_PARCELS") {
            match min_str.parse::<usize>() {
                Ok(min) => self.min_parcels.update(min, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid MTLVERDE_MIN_PARCELS value '{}': expected a non-negative integer",
                    min_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir.update(data_dir, ConfigSource::Cli);
        }

        if let Some(source_crs) = overrides.source_crs {
            self.source_crs.update(source_crs, ConfigSource::Cli);
        }

        if let Some(year) = overrides.year {
            self.year.update(year, ConfigSource::Cli);
        }

        if let Some(reduction) = overrides.daily_reduction {
            self.daily_reduction.update(reduction, ConfigSource::Cli);
        }
    }

    /// Full path of a dataset file
    pub fn data_path(&self, file: &str) -> PathBuf {
        self.data_dir.value.join(file)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "data_dir".to_string(),
            (self.data_dir.value.display().to_string(), self.data_dir.source),
        );

        map.insert(
            "source_crs".to_string(),
            (format!("EPSG:{}", self.source_crs.value), self.source_crs.source),
        );

        map.insert(
            "target_crs".to_string(),
            (format!("EPSG:{}", TARGET_CRS), ConfigSource::Default),
        );

        map.insert("year".to_string(), (self.year.value.to_string(), self.year.source));

        map.insert(
            "daily_reduction".to_string(),
            (self.daily_reduction.value.to_string(), self.daily_reduction.source),
        );

        map.insert(
            "min_parcels".to_string(),
            (self.min_parcels.value.to_string(), self.min_parcels.source),
        );

        let files = &self.files.value;
        for (key, name) in [
            ("files.territories", &files.territories),
            ("files.parcels", &files.parcels),
            ("files.vegetation", &files.vegetation),
            ("files.trees", &files.trees),
            ("files.gardens", &files.gardens),
            ("files.air_readings", &files.air_readings),
            ("files.stations", &files.stations),
        ] {
            map.insert(key.to_string(), (name.clone(), self.files.source));
        }

        if !self.aliases.is_empty() {
            let aliases = self
                .aliases
                .iter()
                .map(|a| format!("{} -> {}", a.from, a.to))
                .collect::<Vec<_>>()
                .join("; ");
            map.insert("aliases".to_string(), (aliases, ConfigSource::File));
        }

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    source_crs: Option<u32>,
    year: Option<i32>,
    daily_reduction: Option<String>,
    min_parcels: Option<usize>,
    files: Option<DataFiles>,
    #[serde(default)]
    aliases: Vec<AliasEntry>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub source_crs: Option<u32>,
    pub year: Option<i32>,
    pub daily_reduction: Option<DailyReduction>,
}

/// Parse daily reduction from string
pub fn parse_daily_reduction(s: &str) -> Result<DailyReduction> {
    match s.trim().to_lowercase().as_str() {
        "max" | "maximum" => Ok(DailyReduction::Max),
        "mean" | "avg" | "average" => Ok(DailyReduction::Mean),
        _ => Err(VerdeError::ConfigInvalid {
            key: "daily_reduction".to_string(),
            reason: format!("Invalid daily reduction: {}. Use max or mean", s),
        }),
    }
}
