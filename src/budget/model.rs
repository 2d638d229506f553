use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use super::axis::FiscalYearAxis;
use super::error::BudgetError;
use super::load::RawRow;

pub const BUDGET_FIELD: &str = "budget";
pub const SALARIES_FIELD: &str = "salaries";
pub const OTHER_FIELD: &str = "other";

/// Year-over-year change in expenditures.
///
/// The first fiscal year has no prior year, and a zero prior-year total makes
/// the ratio meaningless; both are `Undefined` rather than a numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum Growth {
    Undefined,
    Percent(f64),
}

impl Growth {
    fn between(previous: f64, current: f64) -> Self {
        if previous == 0.0 {
            return Self::Undefined;
        }

        let percent = 100.0 * (current / previous - 1.0);
        if percent.is_finite() {
            Self::Percent(percent)
        } else {
            Self::Undefined
        }
    }

    pub fn percent(self) -> Option<f64> {
        match self {
            Self::Undefined => None,
            Self::Percent(value) => Some(value),
        }
    }
}

/// One budget line and its per-year series. Immutable once built.
#[derive(Clone, Debug, Serialize)]
pub struct BudgetNode {
    pub id: String,
    pub category: String,
    pub name: String,
    pub description: String,
    pub budget: Vec<f64>,
    pub salaries: Vec<f64>,
    pub other: Vec<f64>,
    pub expenditures: Vec<f64>,
    pub budget_pct: Vec<Option<f64>>,
    pub pct_growth: Vec<Growth>,
}

impl BudgetNode {
    pub fn latest_expenditures(&self) -> f64 {
        self.expenditures.last().copied().unwrap_or(0.0)
    }
}

/// Nodes in draw order (largest latest-year expenditures first) plus per-year totals.
#[derive(Clone, Debug)]
pub struct NodeSet {
    pub axis: FiscalYearAxis,
    pub nodes: Vec<BudgetNode>,
    pub total_budget: Vec<f64>,
}

impl NodeSet {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Categories in first-seen draw order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter(|node| seen.insert(node.category.as_str()))
            .map(|node| node.category.clone())
            .collect()
    }

    pub fn max_latest_expenditures(&self) -> f64 {
        self.nodes
            .iter()
            .map(BudgetNode::latest_expenditures)
            .fold(0.0, f64::max)
    }
}

struct RowSeries {
    budget: Vec<f64>,
    salaries: Vec<f64>,
    other: Vec<f64>,
}

fn required_text(
    row: &RawRow,
    index: usize,
    id: &str,
    column: &str,
) -> Result<String, BudgetError> {
    match row.get(column).map(|value| value.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_owned()),
        Some(_) => Err(BudgetError::malformed(index, id, column, "value is empty")),
        None => Err(BudgetError::malformed(index, id, column, "column is missing")),
    }
}

fn numeric_cell(row: &RawRow, index: usize, id: &str, column: &str) -> Result<f64, BudgetError> {
    let text = required_text(row, index, id, column)?;
    let value = text.parse::<f64>().map_err(|_| {
        BudgetError::malformed(index, id, column, format!("{text:?} is not a number"))
    })?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(BudgetError::malformed(
            index,
            id,
            column,
            format!("{text:?} is not a finite number"),
        ))
    }
}

fn extract_series(
    row: &RawRow,
    index: usize,
    id: &str,
    axis: &FiscalYearAxis,
) -> Result<RowSeries, BudgetError> {
    let extract = |field: &str| {
        (0..axis.len())
            .map(|year| numeric_cell(row, index, id, &axis.column(year, field)))
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(RowSeries {
        budget: extract(BUDGET_FIELD)?,
        salaries: extract(SALARIES_FIELD)?,
        other: extract(OTHER_FIELD)?,
    })
}

pub fn build_node_set(rows: &[RawRow], axis: FiscalYearAxis) -> Result<NodeSet, BudgetError> {
    let mut seen_ids = HashSet::with_capacity(rows.len());
    let mut series = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let id = required_text(row, index, "", "id")?;
        if !seen_ids.insert(id.clone()) {
            return Err(BudgetError::DuplicateId { id });
        }

        let category = required_text(row, index, &id, "category")?;
        let name = row
            .get("name")
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .unwrap_or(id.as_str())
            .to_owned();
        let description = row
            .get("description")
            .map(|value| value.trim().to_owned())
            .unwrap_or_default();

        let values = extract_series(row, index, &id, &axis)?;
        series.push((id, category, name, description, values));
    }

    let total_budget = (0..axis.len())
        .map(|year| series.iter().map(|(.., values)| values.budget[year]).sum::<f64>())
        .collect::<Vec<_>>();

    let mut nodes = series
        .into_iter()
        .map(|(id, category, name, description, values)| {
            let expenditures = values
                .salaries
                .iter()
                .zip(&values.other)
                .map(|(salaries, other)| salaries + other)
                .collect::<Vec<_>>();

            let budget_pct = values
                .budget
                .iter()
                .zip(&total_budget)
                .map(|(budget, total)| (*total != 0.0).then(|| 100.0 * budget / total))
                .collect::<Vec<_>>();

            let pct_growth = std::iter::once(Growth::Undefined)
                .chain(
                    expenditures
                        .windows(2)
                        .map(|pair| Growth::between(pair[0], pair[1])),
                )
                .collect::<Vec<_>>();

            BudgetNode {
                id,
                category,
                name,
                description,
                budget: values.budget,
                salaries: values.salaries,
                other: values.other,
                expenditures,
                budget_pct,
                pct_growth,
            }
        })
        .collect::<Vec<_>>();

    // Largest bubbles first: they are placed and resolved before the small ones
    // layered above them.
    nodes.sort_by(|a, b| b.latest_expenditures().total_cmp(&a.latest_expenditures()));

    debug!(
        years = axis.len(),
        first_year = axis.tag(0),
        "derived per-year series"
    );
    info!(nodes = nodes.len(), years = axis.len(), "built budget node set");

    Ok(NodeSet {
        axis,
        nodes,
        total_budget,
    })
}
