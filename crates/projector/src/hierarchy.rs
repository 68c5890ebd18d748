use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::table::Table;

/// What a relation response turns into on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "table", rename_all = "snake_case")]
pub enum HierarchyView {
    Table(Table),
    NoData,
}

impl HierarchyView {
    pub fn table(&self) -> Option<&Table> {
        match self {
            HierarchyView::Table(table) => Some(table),
            HierarchyView::NoData => None,
        }
    }
}

/// Render the relation body's `result` with whatever columns it carries.
///
/// Absent body, missing or null `result`, and empty lists or objects give
/// [`HierarchyView::NoData`]. Relation payloads differ per relation type, so no
/// column is filtered out.
pub fn project_hierarchy(body: Option<&Value>) -> HierarchyView {
    let Some(result) = body.and_then(|b| b.get("result")) else {
        return HierarchyView::NoData;
    };

    match result {
        Value::Array(records) if !records.is_empty() => {
            HierarchyView::Table(Table::from_records(records))
        }
        Value::Object(fields) if !fields.is_empty() => {
            HierarchyView::Table(Table::from_records([result]))
        }
        other => {
            debug!(result = %other, "Relation body has no usable result");
            HierarchyView::NoData
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_data_cases() {
        assert_eq!(project_hierarchy(None), HierarchyView::NoData);
        assert_eq!(project_hierarchy(Some(&json!({"result": []}))), HierarchyView::NoData);
        assert_eq!(project_hierarchy(Some(&json!({"result": null}))), HierarchyView::NoData);
        assert_eq!(project_hierarchy(Some(&json!({"result": {}}))), HierarchyView::NoData);
        assert_eq!(project_hierarchy(Some(&json!({"pageSize": 25}))), HierarchyView::NoData);
        assert_eq!(project_hierarchy(Some(&json!({"result": 0}))), HierarchyView::NoData);
    }

    #[test]
    fn test_all_columns_kept() {
        let body = json!({
            "result": [
                {"classType": "SourceAtomCluster", "ui": "44054006", "name": "Diabetes mellitus type 2"},
                {"classType": "SourceAtomCluster", "ui": "46635009", "name": "Diabetes mellitus type 1", "obsolete": false}
            ]
        });

        let view = project_hierarchy(Some(&body));
        let table = view.table().unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["classType", "ui", "name", "obsolete"]);
        assert_eq!(table.get(0, "obsolete"), Some(&Value::Null));
    }

    #[test]
    fn test_single_object_result_is_one_row() {
        let body = json!({"result": {"ui": "73211009", "relationLabel": "RO"}});

        let view = project_hierarchy(Some(&body));
        let table = view.table().unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "relationLabel"), Some(&json!("RO")));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(HierarchyView::NoData).unwrap();
        assert_eq!(json, json!({"kind": "no_data"}));
    }
}
