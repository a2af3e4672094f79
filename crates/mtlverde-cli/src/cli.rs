use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mtlverde - Montréal urban-greenery statistics
#[derive(Parser, Debug)]
#[command(name = "mtlverde")]
#[command(about = "Green space, trees, gardens and air quality per Montréal territory", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./mtlverde.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the source datasets
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Year of air-quality readings to keep
    #[arg(long, global = true)]
    pub year: Option<i32>,

    /// EPSG code assumed for datasets that declare no CRS
    #[arg(long, global = true, value_name = "EPSG")]
    pub source_crs: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Territory statistics table
    Territories,

    /// Green-space parcels of one territory
    Territory(TerritoryArgs),

    /// Land-cover breakdown, for every territory or one
    Vegetation(VegetationArgs),

    /// Air-quality stations and their day counts
    Stations,

    /// Daily air-quality series of one station
    Station(StationArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct TerritoryArgs {
    /// Territory identifier (CODEID)
    pub id: String,

    /// Print the filtered parcels as a GeoJSON FeatureCollection
    #[arg(long)]
    pub geojson: bool,
}

#[derive(Parser, Debug)]
pub struct VegetationArgs {
    /// Territory identifier (CODEID); all territories when omitted
    pub id: Option<String>,
}

#[derive(Parser, Debug)]
pub struct StationArgs {
    /// Station number
    pub id: u32,
}
