mod axis;
mod error;
mod load;
mod model;

pub use axis::FiscalYearAxis;
pub use load::load_table;
pub use model::{BudgetNode, Growth, NodeSet, build_node_set};

#[cfg(test)]
pub(crate) use model::fixtures;

use std::path::Path;

use anyhow::{Context, Result};

/// Reads `path` and builds the node set, deriving the fiscal-year axis from its columns.
pub fn load_node_set(path: &Path) -> Result<NodeSet> {
    let table = load_table(path)?;
    let axis = FiscalYearAxis::from_columns(table.columns.iter().map(String::as_str))
        .with_context(|| format!("no fiscal years in {}", path.display()))?;
    build_node_set(&table.rows, axis)
        .with_context(|| format!("failed to build budget nodes from {}", path.display()))
}
