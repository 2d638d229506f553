use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::info;

use super::error::BudgetError;

pub type RawRow = HashMap<String, String>;

/// Tabular input as read from disk: the ordered column set and one map per budget line.
#[derive(Clone, Debug, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

pub fn load_table(path: &Path) -> Result<RawTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read budget data from {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let table = if is_json {
        parse_json_rows(&raw).with_context(|| format!("invalid JSON rows in {}", path.display()))?
    } else {
        parse_csv_rows(&raw).with_context(|| format!("invalid CSV rows in {}", path.display()))?
    };

    info!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.rows.len(),
        "loaded budget table"
    );
    Ok(table)
}

pub fn parse_csv_rows(raw: &str) -> Result<RawTable, BudgetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let columns = reader
        .headers()?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = columns
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.clone(), value.to_owned()))
            .collect::<RawRow>();
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

pub fn parse_json_rows(raw: &str) -> Result<RawTable> {
    let parsed: Value = serde_json::from_str(raw).map_err(BudgetError::from)?;
    let entries = parsed
        .as_array()
        .ok_or_else(|| anyhow!("expected a JSON array of row objects"))?;

    let mut columns = Vec::new();
    let mut rows = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let object = entry
            .as_object()
            .ok_or_else(|| anyhow!("row {index} is not a JSON object"))?;

        let mut row = RawRow::with_capacity(object.len());
        for (key, value) in object {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Null => String::new(),
                other => {
                    return Err(anyhow!(
                        "row {index}, column {key:?}: unsupported value {other}"
                    ));
                }
            };
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), text);
        }
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_are_keyed_by_header() {
        let table = parse_csv_rows(
            "id,category,name,fy16salaries\n\
             a, Budgetary department ,Parks,100\n\
             b,Non-departmental,Debt,\"1,5\"\n",
        )
        .unwrap();

        assert_eq!(table.columns, ["id", "category", "name", "fy16salaries"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["category"], "Budgetary department");
        assert_eq!(table.rows[1]["fy16salaries"], "1,5");
    }

    #[test]
    fn csv_with_only_headers_is_an_empty_table() {
        let table = parse_csv_rows("id,category,fy16budget\n").unwrap();
        assert_eq!(table.columns.len(), 3);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn json_numbers_and_strings_are_accepted() {
        let table = parse_json_rows(
            r#"[{"id": "a", "fy16budget": 120.5, "fy16other": "7"},
                {"id": "b", "fy16budget": null, "extra": "x"}]"#,
        )
        .unwrap();

        assert_eq!(table.rows[0]["fy16budget"], "120.5");
        assert_eq!(table.rows[0]["fy16other"], "7");
        assert_eq!(table.rows[1]["fy16budget"], "");
        assert!(table.columns.contains(&"extra".to_owned()));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(parse_json_rows(r#"{"id": "a"}"#).is_err());
        assert!(parse_json_rows(r#"[1, 2]"#).is_err());
        assert!(parse_json_rows(r#"[{"id": [1]}]"#).is_err());
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let path = std::env::temp_dir().join("budget-bubbles-missing/rows.csv");
        let error = load_table(&path).unwrap_err();

        assert!(format!("{error:#}").contains("budget-bubbles-missing"));
        assert!(error.downcast_ref::<BudgetError>().is_none());
        assert!(error.root_cause().downcast_ref::<std::io::Error>().is_some());
    }
}
