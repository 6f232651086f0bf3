//! CSV rendering of extracted tables
//!
//! [`table_to_csv`] renders a [`Table`]; [`value_to_csv`] is the lenient
//! entry point for `table_data` posted back by the browser and returns an
//! empty string for anything that is not a usable table.

use csv::{Terminator, WriterBuilder};
use serde_json::Value;

use crate::model::Table;

/// Renders a table as CSV
///
/// Header from `columns`, then one record per row in column order. Missing
/// and null cells are empty fields, strings are written verbatim, other
/// values as their JSON text. Row keys not listed in `columns` are ignored.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use snaptable_core::{model::Table, util::csv_export::table_to_csv};
///
/// let table: Table = serde_json::from_value(json!({
///     "columns": ["Item", "Price"],
///     "rows": [{"Item": "Tea", "Price": 3.5}, {"Item": "Cake"}]
/// }))
/// .unwrap();
///
/// assert_eq!(table_to_csv(&table), "Item,Price\r\nTea,3.5\r\nCake,\r\n");
/// ```
pub fn table_to_csv(table: &Table) -> String {
    match render(table) {
        Ok(csv) => csv,
        Err(e) => {
            tracing::warn!("Failed to render table as CSV: {}", e);
            String::new()
        }
    }
}

/// Renders a loosely-shaped `{columns, rows}` value as CSV
///
/// Returns an empty string when `value` is not a usable table.
pub fn value_to_csv(value: &Value) -> String {
    match Table::from_value(value) {
        Some(table) => table_to_csv(&table),
        None => String::new(),
    }
}

fn render(table: &Table) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(table.columns.iter().map(|column| cell_text(row.get(column))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
