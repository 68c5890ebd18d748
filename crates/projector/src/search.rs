use serde_json::Value;
use tracing::debug;

use crate::table::Table;

/// Columns shown for concept search hits.
pub const SEARCH_COLUMNS: [&str; 3] = ["name", "ui", "rootSource"];

fn search_records(body: &Value) -> Option<&Vec<Value>> {
    body.get("result")?.get("results")?.as_array()
}

/// Search hits at `result.results`, cut down to name, ui and rootSource.
///
/// A body without that list projects to an empty table rather than failing.
pub fn project_search_results(body: &Value) -> Table {
    match search_records(body) {
        Some(records) => Table::select(records, &SEARCH_COLUMNS),
        None => {
            debug!("Search body has no result.results list");
            Table::with_columns(&SEARCH_COLUMNS)
        }
    }
}

/// CUI of the first search hit.
pub fn first_cui(body: &Value) -> Option<String> {
    search_records(body)?
        .first()?
        .get("ui")?
        .as_str()
        .map(str::to_string)
}
