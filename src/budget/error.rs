use thiserror::Error;

/// Failures raised while turning raw rows into budget nodes.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// A row is missing a required field, or a per-year cell is not numeric.
    #[error("malformed record at row {row} (id {id:?}), column {column:?}: {reason}")]
    MalformedRecord {
        row: usize,
        id: String,
        column: String,
        reason: String,
    },
    /// Two rows share the same `id`.
    #[error("duplicate budget line id {id:?}")]
    DuplicateId { id: String },
    /// No `fyNN` columns were found in the input.
    #[error("no fiscal-year columns (e.g. fy08budget) found in the input")]
    NoFiscalYears,
    #[error("failed to read CSV input")]
    Csv(#[from] csv::Error),
    #[error("failed to read JSON input")]
    Json(#[from] serde_json::Error),
}

impl BudgetError {
    pub(super) fn malformed(
        row: usize,
        id: &str,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            row,
            id: id.to_owned(),
            column: column.into(),
            reason: reason.into(),
        }
    }
}
