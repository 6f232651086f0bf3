//! Test utilities for snaptable integration tests
//!
//! Shared helpers for the workspace's `tests/` directories. Everything here
//! runs in-process: the mock servers bind `127.0.0.1:0` and are torn down
//! when dropped.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! snaptable-test-utils = { path = "../snaptable-test-utils" }
//! ```
//!
//! # Modules
//!
//! - [`fixtures`]: generated PNG images and their base64 forms
//! - [`mock_sender`]: an in-process sender serving `/capture` and `/status`
//! - [`mock_openai`]: an in-process chat completions endpoint
//! - [`stub_vision`]: a [`VisionModel`](snaptable_core::extract::VisionModel)
//!   with canned replies
//! - [`timing`]: duration measurement and assertions
//!
//! # Example
//!
//! ```ignore
//! use snaptable_test_utils::{fixtures::sample_png, mock_sender::MockSender};
//!
//! #[tokio::test]
//! async fn test_capture() {
//!     let sender = MockSender::serving_png(sample_png(4, 4)).await;
//!     let client = ScreenshotClient::new(sender.base_url(), dir, timeout)?;
//!     let bytes = client.capture().await?;
//!     assert_eq!(sender.captures(), 1);
//! }
//! ```
//!
//! Note: these helpers are only usable from integration tests. Unit tests
//! inside `snaptable-core` see a different copy of the core types.

pub mod fixtures;
pub mod mock_openai;
pub mod mock_sender;
pub mod stub_vision;
pub mod timing;
