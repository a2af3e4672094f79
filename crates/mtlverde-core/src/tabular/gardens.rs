use std::collections::BTreeMap;
use std::path::Path;

use super::{field, number_field, CsvTable};
use crate::error::LoadResult;
use crate::fields::gardens as fields;
use crate::models::Garden;
use crate::names::{AliasTable, NormalizedName};

/// Read the community garden registry
pub fn read_gardens(path: &Path) -> LoadResult<Vec<Garden>> {
    let mut table = CsvTable::open(path)?;
    let name = table.column(fields::NAME)?;
    let borough = table.column(fields::BOROUGH)?;
    let address = table.optional_column(fields::ADDRESS);
    let latitude = table.optional_column(fields::LATITUDE);
    let longitude = table.optional_column(fields::LONGITUDE);

    let mut gardens = Vec::new();
    table.for_each_row(|record| {
        let Some(borough) = field(record, borough) else {
            return;
        };
        gardens.push(Garden {
            name: field(record, name).unwrap_or_default().to_string(),
            borough: borough.to_string(),
            address: address.and_then(|i| field(record, i)).map(str::to_string),
            latitude: latitude.and_then(|i| number_field(record, i)),
            longitude: longitude.and_then(|i| number_field(record, i)),
        });
    });

    tracing::info!("Read {} community gardens from {}", gardens.len(), path.display());
    Ok(gardens)
}

/// Number of gardens per alias-resolved borough key
pub fn garden_counts(gardens: &[Garden], aliases: &AliasTable) -> BTreeMap<NormalizedName, u64> {
    let mut counts = BTreeMap::new();
    for garden in gardens {
        *counts.entry(aliases.key(&garden.borough)).or_insert(0) += 1;
    }
    counts
}
