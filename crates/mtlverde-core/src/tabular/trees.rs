use std::collections::BTreeMap;
use std::path::Path;

use super::{field, CsvTable};
use crate::error::LoadResult;
use crate::fields::trees as fields;
use crate::models::TreeCounts;
use crate::names::{AliasTable, NormalizedName};

/// One row of the public tree inventory, reduced to what is counted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRecord {
    pub borough: String,
    pub remarkable: bool,
}

/// Read the tree inventory. Rows without a borough are dropped.
pub fn read_trees(path: &Path) -> LoadResult<Vec<TreeRecord>> {
    let mut table = CsvTable::open(path)?;
    let borough = table.column(fields::BOROUGH)?;
    let remarkable = table.optional_column(fields::REMARKABLE);

    let mut trees = Vec::new();
    let mut unnamed = 0usize;
    table.for_each_row(|record| match field(record, borough) {
        Some(name) => trees.push(TreeRecord {
            borough: name.to_string(),
            remarkable: remarkable
                .and_then(|i| field(record, i))
                .is_some_and(|flag| flag == fields::REMARKABLE_FLAG),
        }),
        None => unnamed += 1,
    });

    if unnamed > 0 {
        tracing::warn!("{} trees without a borough in {}", unnamed, table.path().display());
    }
    tracing::info!("Read {} trees from {}", trees.len(), path.display());

    Ok(trees)
}

/// Per-borough totals, keyed by the alias-resolved normalized name
pub fn tree_counts(trees: &[TreeRecord], aliases: &AliasTable) -> BTreeMap<NormalizedName, TreeCounts> {
    let mut counts: BTreeMap<NormalizedName, TreeCounts> = BTreeMap::new();
    for tree in trees {
        counts.entry(aliases.key(&tree.borough)).or_default().record(tree.remarkable);
    }
    counts
}
