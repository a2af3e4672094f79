//! Vegetation command implementation

use crate::cli::VegetationArgs;
use crate::output::OutputWriter;
use crate::output_types::VegetationRow;
use anyhow::Result;
use mtlverde_core::models::TerritoryId;
use mtlverde_query::Atlas;

pub fn execute(atlas: &Atlas, args: VegetationArgs, output: &OutputWriter) -> Result<()> {
    let covers = match args.id {
        Some(id) => {
            let id = TerritoryId::new(id.trim());
            match atlas.vegetation(&id) {
                Some(cover) => vec![cover],
                None => return output.no_data(format!("No vegetation data for territory {}", id)),
            }
        }
        None => atlas.vegetation_covers(),
    };

    if output.is_json() {
        return output.result(covers);
    }

    output.section("Couverture végétale");
    output.table(covers.into_iter().map(VegetationRow::from).collect());
    Ok(())
}
