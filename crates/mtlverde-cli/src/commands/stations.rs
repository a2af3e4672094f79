//! Station commands: the station list and one station's daily series

use crate::cli::StationArgs;
use crate::output::OutputWriter;
use crate::output_types::{SeriesRow, StationOutput, StationRow};
use anyhow::Result;
use mtlverde_query::Atlas;

pub fn list(atlas: &Atlas, output: &OutputWriter) -> Result<()> {
    let stations = atlas.stations();

    if output.is_json() {
        return output.result(stations);
    }

    output.section("Stations");
    output.table(stations.into_iter().map(StationRow::from).collect());
    Ok(())
}

pub fn show(atlas: &Atlas, args: StationArgs, output: &OutputWriter) -> Result<()> {
    let Some(station) = atlas.station(args.id) else {
        return output.no_data(format!("No data for station {}", args.id));
    };
    let series = atlas.station_series(args.id);

    if output.is_json() {
        return output.result(StationOutput { station, series });
    }

    output.section(format!("{} ({})", station.station.name, station.station.id));
    if let Some(address) = &station.station.address {
        output.kv("Adresse", address);
    }
    output.kv("Bon", station.counts.good);
    output.kv("Acceptable", station.counts.acceptable);
    output.kv("Mauvais", station.counts.bad);
    output.table(series.iter().map(SeriesRow::from).collect());
    Ok(())
}
