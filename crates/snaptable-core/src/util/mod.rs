// Utility modules

pub mod csv_export;
pub mod image_store;
pub mod timestamp;
