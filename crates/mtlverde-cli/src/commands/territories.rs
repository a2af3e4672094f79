//! Territory commands: the statistics table and one territory's green space

use crate::cli::TerritoryArgs;
use crate::output::OutputWriter;
use crate::output_types::{TerritoryOutput, TerritoryTableRow};
use anyhow::Result;
use mtlverde_core::models::TerritoryId;
use mtlverde_geo::export::to_feature_collection;
use mtlverde_query::Atlas;

pub fn list(atlas: &Atlas, output: &OutputWriter) -> Result<()> {
    let rows = atlas.territory_stats();

    if output.is_json() {
        return output.result(rows);
    }

    output.section("Territoires");
    output.table(rows.iter().map(TerritoryTableRow::from).collect());

    let sparse = rows.iter().filter(|r| !r.has_sufficient_data).count();
    if sparse > 0 {
        output.info(format!(
            "{} territories have too few parcels; their area is shown in parentheses",
            sparse
        ))?;
    }
    Ok(())
}

pub fn show(atlas: &Atlas, args: TerritoryArgs, output: &OutputWriter) -> Result<()> {
    let id = TerritoryId::new(args.id.trim());

    let Some(selection) = atlas.select_territory(&id) else {
        return output.no_data(format!("No data for territory {}", id));
    };

    if args.geojson {
        return output.data(&to_feature_collection(selection.parcels.iter().copied()));
    }

    let territory = TerritoryOutput::from(&selection);
    if output.is_json() {
        return output.result(territory);
    }

    output.section(&territory.name);
    output.kv("ID", &territory.territory_id);
    output.kv("Espaces verts", format!("{:.3} km²", territory.superficie_km2));
    output.kv("Parcelles", territory.parcel_count);
    if let Some([lon, lat]) = territory.centroid {
        output.kv("Centre", format!("{:.5}, {:.5}", lat, lon));
    }
    output.table(territory.parcels);
    Ok(())
}
