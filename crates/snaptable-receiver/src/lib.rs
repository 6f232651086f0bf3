//! snaptable-receiver: browser-facing web application
//!
//! Wires the `snaptable-core` services into an axum router:
//!
//! - `GET /request-screenshot`: fetch a PNG from the sender
//! - `POST /save-cropped`: archive a cropped region
//! - `POST /extract-table`: run table extraction on a cropped region
//! - `POST /download-csv`: format a table as CSV
//! - `GET /` and `GET /static/*`: the browser front end

pub mod error;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, create_router, serve};
