//! Normalization of vision-model replies into the canonical table shape
//!
//! Models do not reliably follow the requested `{columns, rows}` format.
//! [`normalize`] accepts the shapes seen in practice, tried in this order
//! (first match wins):
//!
//! 1. `{"columns": [...], "rows": [{...}]}`: accepted, missing cells are
//!    backfilled with `null`
//! 2. `[{...}, {...}]`: columns come from the first row's key order
//! 3. `{"data": [{...}, {...}]}`: same as 2 over `data`
//! 4. `{"headers": [...], "data": [[...], [...]]}`: positional rows zipped
//!    against `headers`
//!
//! Shapes 2 and 3 do not backfill missing cells.

use serde_json::{Map, Value};

use crate::{
    error::{ServiceError, ServiceResult},
    model::{Row, Table, label_text},
};

/// Converts a parsed model reply into a [`Table`]
///
/// # Errors
///
/// [`ServiceError::InvalidTableStructure`] when the value matches none of the
/// accepted shapes, or matches one with unusable contents.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use snaptable_core::extract::normalize::normalize;
///
/// let table = normalize(json!({"headers": ["a", "b"], "data": [[1, 2]]})).unwrap();
/// assert_eq!(table.columns, vec!["a", "b"]);
/// assert_eq!(table.rows[0]["b"], json!(2));
/// ```
pub fn normalize(value: Value) -> ServiceResult<Table> {
    if let Some(object) = value.as_object() {
        if object.contains_key("columns") && object.contains_key("rows") {
            return from_columns_and_rows(object);
        }
    }

    if let Some(items) = as_record_list(&value) {
        return from_records(items);
    }

    if let Some(object) = value.as_object() {
        if let Some(items) = object.get("data").and_then(as_record_list) {
            return from_records(items);
        }

        if let (Some(headers), Some(data)) = (object.get("headers"), object.get("data")) {
            if let Some(table) = from_headers_and_positional(headers, data) {
                return table;
            }
        }
    }

    Err(ServiceError::InvalidTableStructure)
}

/// Shape 1: declared columns and keyed rows, with null backfill
fn from_columns_and_rows(object: &Map<String, Value>) -> ServiceResult<Table> {
    let columns = object["columns"]
        .as_array()
        .ok_or(ServiceError::InvalidTableStructure)?
        .iter()
        .map(label_text)
        .collect::<Option<Vec<_>>>()
        .ok_or(ServiceError::InvalidTableStructure)?;

    let rows = object["rows"]
        .as_array()
        .ok_or(ServiceError::InvalidTableStructure)?
        .iter()
        .map(|row| row.as_object().cloned())
        .collect::<Option<Vec<Row>>>()
        .ok_or(ServiceError::InvalidTableStructure)?;

    let mut table = Table::new(columns, rows);
    table.backfill_missing_cells();
    Ok(table)
}

/// Returns the items of a non-empty array whose first element is an object
fn as_record_list(value: &Value) -> Option<&Vec<Value>> {
    value
        .as_array()
        .filter(|items| items.first().is_some_and(Value::is_object))
}

/// Shapes 2 and 3: keyed rows, columns from the first row
fn from_records(items: &[Value]) -> ServiceResult<Table> {
    let rows = items
        .iter()
        .map(|row| row.as_object().cloned())
        .collect::<Option<Vec<Row>>>()
        .ok_or(ServiceError::InvalidTableStructure)?;

    let columns = rows
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();

    Ok(Table::new(columns, rows))
}

/// Shape 4: header labels plus positional rows
///
/// Returns `None` when the value does not have this shape so the caller can
/// report it as invalid.
fn from_headers_and_positional(headers: &Value, data: &Value) -> Option<ServiceResult<Table>> {
    let data = data.as_array()?;
    if !data.iter().all(Value::is_array) {
        return None;
    }

    let columns = match headers.as_array() {
        Some(labels) => match labels.iter().map(label_text).collect::<Option<Vec<_>>>() {
            Some(columns) => columns,
            None => return Some(Err(ServiceError::InvalidTableStructure)),
        },
        None => return Some(Err(ServiceError::InvalidTableStructure)),
    };

    let rows = data
        .iter()
        .filter_map(Value::as_array)
        .map(|cells| {
            columns
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect::<Row>()
        })
        .collect();

    Some(Ok(Table::new(columns, rows)))
}
