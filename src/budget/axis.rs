use serde::Serialize;

use super::error::BudgetError;

/// Ordered fiscal-year tags (`fy08`, `fy09`, ...) derived once from the input columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FiscalYearAxis {
    tags: Vec<String>,
}

impl FiscalYearAxis {
    pub fn new(mut tags: Vec<String>) -> Result<Self, BudgetError> {
        tags.sort();
        tags.dedup();
        if tags.is_empty() {
            return Err(BudgetError::NoFiscalYears);
        }
        Ok(Self { tags })
    }

    pub fn from_columns<'a>(
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, BudgetError> {
        let tags = columns
            .into_iter()
            .filter_map(fiscal_year_tag)
            .map(str::to_owned)
            .collect::<Vec<_>>();
        Self::new(tags)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn tag(&self, index: usize) -> &str {
        &self.tags[index]
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Index of a tag such as `fy17`, ignoring ASCII case.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|known| known.eq_ignore_ascii_case(tag))
    }

    pub fn calendar_year(&self, index: usize) -> i32 {
        calendar_year(&self.tags[index])
    }

    pub fn column(&self, index: usize, field: &str) -> String {
        format!("{}{field}", self.tags[index])
    }
}

/// First `fy` + two digits found in a column name.
fn fiscal_year_tag(column: &str) -> Option<&str> {
    let bytes = column.as_bytes();
    (0..bytes.len().saturating_sub(3))
        .find(|&start| {
            &bytes[start..start + 2] == b"fy"
                && bytes[start + 2].is_ascii_digit()
                && bytes[start + 3].is_ascii_digit()
        })
        .map(|start| &column[start..start + 4])
}

fn calendar_year(tag: &str) -> i32 {
    tag.get(2..4)
        .and_then(|digits| digits.parse::<i32>().ok())
        .map(|digits| 2000 + digits)
        .unwrap_or(2000)
}
