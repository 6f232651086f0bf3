//! snaptable-sender: screenshot provider
//!
//! Runs on the machine whose display should be captured. Serves:
//!
//! - `GET /capture`: PNG of the primary display, archived locally
//! - `GET /status`: liveness and archive size
//! - `GET /`: a human-readable status page

pub mod capture;
pub mod encode;
pub mod error;
pub mod net;
pub mod server;

pub use error::{CaptureError, CaptureResult};
