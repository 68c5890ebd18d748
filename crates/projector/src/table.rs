use serde::Serialize;
use serde_json::{Map, Value};

/// Column name used for list elements that are not JSON objects.
pub const VALUE_COLUMN: &str = "value";

/// Ordered columns and rows of JSON cells, ready for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Empty table with a fixed header.
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Project records onto a fixed column set. Missing keys become `null`.
    pub fn select<'a>(records: impl IntoIterator<Item = &'a Value>, columns: &[&str]) -> Self {
        let mut table = Self::with_columns(columns);
        for record in records {
            let row = columns
                .iter()
                .map(|column| record.get(column).cloned().unwrap_or(Value::Null))
                .collect();
            table.rows.push(row);
        }
        table
    }

    /// Keep every column any record has, in order of first appearance.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Value>) -> Self {
        let records: Vec<&Value> = records.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            match record {
                Value::Object(fields) => {
                    for key in fields.keys() {
                        if !columns.iter().any(|c| c == key) {
                            columns.push(key.clone());
                        }
                    }
                }
                _ => {
                    if !columns.iter().any(|c| c == VALUE_COLUMN) {
                        columns.push(VALUE_COLUMN.to_string());
                    }
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| match record {
                Value::Object(fields) => row_from_object(fields, &columns),
                other => columns
                    .iter()
                    .map(|c| if c == VALUE_COLUMN { (**other).clone() } else { Value::Null })
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| &r[index])
    }
}

fn row_from_object(fields: &Map<String, Value>, columns: &[String]) -> Vec<Value> {
    columns
        .iter()
        .map(|c| fields.get(c).cloned().unwrap_or(Value::Null))
        .collect()
}

/// Display text for a cell: bare strings, empty for null, compact JSON otherwise.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_columns_in_first_appearance_order() {
        let records = json!([
            {"ui": "1", "name": "a"},
            {"ui": "2", "relationLabel": "CHD", "name": "b"}
        ]);
        let table = Table::from_records(records.as_array().unwrap());

        assert_eq!(table.columns(), ["ui", "name", "relationLabel"]);
        assert_eq!(table.get(0, "relationLabel"), Some(&Value::Null));
        assert_eq!(table.get(1, "relationLabel"), Some(&json!("CHD")));
    }

    #[test]
    fn test_scalars_land_in_value_column() {
        let records = json!([{"ui": "1"}, "loose"]);
        let table = Table::from_records(records.as_array().unwrap());

        assert_eq!(table.columns(), ["ui", "value"]);
        assert_eq!(table.get(1, "value"), Some(&json!("loose")));
        assert_eq!(table.get(1, "ui"), Some(&Value::Null));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!("Diabetes")), "Diabetes");
        assert_eq!(cell_text(&json!(false)), "false");
        assert_eq!(cell_text(&json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
    }
}
