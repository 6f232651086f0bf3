//! Data models shared by the receiver and the sender
//!
//! - [`Table`]: canonical `{columns, rows}` shape every extraction converges to
//! - [`ImageIntent`] and [`StoredImage`]: images written by the image store
//! - [`SenderStatus`]: body of the sender's `/status` endpoint

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One table row: column label to cell value, in insertion order
pub type Row = Map<String, Value>;

/// Canonical table shape
///
/// Serializes as `{"columns": [...], "rows": [{...}, ...]}`, which is the
/// `table_data` object the browser receives and posts back for CSV export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Ordered column labels
    pub columns: Vec<String>,
    /// Ordered rows keyed by column label
    pub rows:    Vec<Row>,
}

impl Table {
    /// Creates a table from columns and rows without touching the rows
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Inserts `null` for every declared column missing from a row
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use snaptable_core::model::Table;
    ///
    /// let mut table: Table =
    ///     serde_json::from_value(json!({"columns": ["a", "b"], "rows": [{"a": 1}]})).unwrap();
    /// table.backfill_missing_cells();
    /// assert_eq!(table.rows[0]["b"], serde_json::Value::Null);
    /// ```
    pub fn backfill_missing_cells(&mut self) {
        for row in &mut self.rows {
            for column in &self.columns {
                if !row.contains_key(column) {
                    row.insert(column.clone(), Value::Null);
                }
            }
        }
    }

    /// Returns true when every row has an entry for every column
    pub fn is_uniform(&self) -> bool {
        self.rows
            .iter()
            .all(|row| self.columns.iter().all(|column| row.contains_key(column)))
    }

    /// Leniently reads a `{columns, rows}` JSON value posted back by a client
    ///
    /// Returns `None` unless `columns` is an array and `rows` is an array of
    /// objects. Non-string column labels are rendered as text.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let columns = object
            .get("columns")?
            .as_array()?
            .iter()
            .map(label_text)
            .collect::<Option<Vec<_>>>()?;
        let rows = object
            .get("rows")?
            .as_array()?
            .iter()
            .map(|row| row.as_object().cloned())
            .collect::<Option<Vec<_>>>()?;
        Some(Self { columns, rows })
    }
}

/// Renders a JSON column label as text
///
/// Strings are taken verbatim, numbers and booleans use their JSON text.
/// Null, arrays and objects are not usable as labels.
pub(crate) fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Why an image is being stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageIntent {
    /// User-cropped region kept in the cropped-image archive
    CroppedArchive,
    /// Working copy for extraction, deleted by the request that made it
    TempWorking,
}

impl ImageIntent {
    /// Filename prefix for images stored with this intent
    pub fn prefix(&self) -> &'static str {
        match self {
            ImageIntent::CroppedArchive => "cropped",
            ImageIntent::TempWorking => "temp_image",
        }
    }
}

impl std::fmt::Display for ImageIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageIntent::CroppedArchive => write!(f, "cropped-archive"),
            ImageIntent::TempWorking => write!(f, "temp-working"),
        }
    }
}

/// An image file written by the image store
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Path to the written file
    pub path:   PathBuf,
    /// Intent the image was stored with
    pub intent: ImageIntent,
    /// Number of bytes written
    pub size:   u64,
}

impl StoredImage {
    /// Path as a display string, as returned to the browser
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Body of the sender's `/status` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderStatus {
    /// Always "running" while the sender answers
    pub status:               String,
    /// Outbound IP address of the sender machine
    pub ip_address:           String,
    /// Port the sender listens on
    pub port:                 u16,
    /// Files currently in the sender's screenshot archive
    pub screenshots_captured: usize,
}

impl SenderStatus {
    /// Creates a "running" status
    pub fn running(ip_address: String, port: u16, screenshots_captured: usize) -> Self {
        Self {
            status: "running".to_string(),
            ip_address,
            port,
            screenshots_captured,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_table_serialization_shape() {
        let table: Table = serde_json::from_value(json!({
            "columns": ["Name", "Qty"],
            "rows": [{"Name": "bolt", "Qty": 4}]
        }))
        .unwrap();

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["columns"], json!(["Name", "Qty"]));
        assert_eq!(value["rows"][0]["Qty"], json!(4));
    }

    #[test]
    fn test_backfill_appends_nulls_after_existing_keys() {
        let mut table: Table = serde_json::from_value(json!({
            "columns": ["a", "b", "c"],
            "rows": [{"c": 3, "a": 1}]
        }))
        .unwrap();

        assert!(!table.is_uniform());
        table.backfill_missing_cells();
        assert!(table.is_uniform());

        let keys: Vec<&String> = table.rows[0].keys().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        assert_eq!(table.rows[0]["b"], Value::Null);
    }

    #[test]
    fn test_from_value_accepts_numeric_labels() {
        let table = Table::from_value(&json!({"columns": [2024, "Total"], "rows": []})).unwrap();
        assert_eq!(table.columns, vec!["2024", "Total"]);
    }

    #[test]
    fn test_from_value_rejects_malformed() {
        assert!(Table::from_value(&json!({})).is_none());
        assert!(Table::from_value(&json!({"columns": ["a"]})).is_none());
        assert!(Table::from_value(&json!({"columns": "a", "rows": []})).is_none());
        assert!(Table::from_value(&json!({"columns": ["a"], "rows": [[1]]})).is_none());
        assert!(Table::from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_image_intent_prefixes() {
        assert_eq!(ImageIntent::CroppedArchive.prefix(), "cropped");
        assert_eq!(ImageIntent::TempWorking.prefix(), "temp_image");
    }

    #[test]
    fn test_sender_status_round_trip_fields() {
        let status = SenderStatus::running("192.168.1.20".to_string(), 5000, 3);
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "running",
                "ip_address": "192.168.1.20",
                "port": 5000,
                "screenshots_captured": 3
            })
        );
    }
}
