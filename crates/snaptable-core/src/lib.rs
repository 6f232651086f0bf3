//! snaptable-core: screenshot-to-table services
//!
//! This library holds everything the receiver web application orchestrates:
//! the screenshot client that talks to the sender, the image store for
//! browser payloads, the vision-model table extraction service and the CSV
//! formatter. It has no HTTP server of its own.

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod screenshot;
pub mod util;

pub use error::{ErrorCategory, ServiceError, ServiceResult};
pub use model::{ImageIntent, SenderStatus, StoredImage, Table};
