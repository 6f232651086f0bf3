//! Timestamp helpers for filenames

use chrono::{DateTime, Local};

/// Second-resolution local timestamp, e.g. `20240131_142502`
pub fn format_timestamp() -> String {
    format_at(Local::now())
}

/// Formats a specific instant the same way as [`format_timestamp`]
pub fn format_at(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Timestamped filename with a short random suffix
///
/// Two calls in the same second still produce different names.
///
/// # Examples
///
/// ```
/// use snaptable_core::util::timestamp::unique_filename;
///
/// let name = unique_filename("cropped", "png");
/// assert!(name.starts_with("cropped_"));
/// assert!(name.ends_with(".png"));
/// ```
pub fn unique_filename(prefix: &str, ext: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}.{}", prefix, format_timestamp(), &suffix[..8], ext)
}
