//! Image storage for browser payloads
//!
//! The browser posts cropped regions as base64 strings, usually with a
//! `data:image/png;base64,` prefix. [`ImageStore`] decodes them and writes
//! them either into the cropped-image archive (kept) or into the temp
//! working directory (deleted by the request after extraction).
//!
//! # Examples
//!
//! ```
//! use snaptable_core::{model::ImageIntent, util::image_store::ImageStore};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let root = tempfile::tempdir().unwrap();
//! let store = ImageStore::new(root.path().join("cropped"), root.path().join("temp"));
//!
//! let stored = store
//!     .store("data:image/png;base64,aGVsbG8=", ImageIntent::TempWorking)
//!     .await
//!     .unwrap();
//! assert_eq!(std::fs::read(&stored.path).unwrap(), b"hello");
//!
//! assert!(store.delete(&stored.path).await);
//! assert!(!store.delete(&stored.path).await);
//! # }
//! ```

use std::{
    io,
    path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use tokio::fs;

use crate::{
    error::{ServiceError, ServiceResult},
    model::{ImageIntent, StoredImage},
    util::timestamp::unique_filename,
};

/// Writes decoded browser images into the archive or working directory
#[derive(Debug, Clone)]
pub struct ImageStore {
    /// Directory for [`ImageIntent::CroppedArchive`] images
    cropped_dir: PathBuf,
    /// Directory for [`ImageIntent::TempWorking`] images
    temp_dir:    PathBuf,
}

impl ImageStore {
    /// Creates a store over the given directories
    ///
    /// Directories are created lazily on first write.
    pub fn new(cropped_dir: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            cropped_dir: cropped_dir.into(),
            temp_dir:    temp_dir.into(),
        }
    }

    /// Directory images with the given intent are written to
    pub fn dir_for(&self, intent: ImageIntent) -> &Path {
        match intent {
            ImageIntent::CroppedArchive => &self.cropped_dir,
            ImageIntent::TempWorking => &self.temp_dir,
        }
    }

    /// Decodes a base64 payload, stripping an optional data-URI header
    ///
    /// Everything up to and including the first `,` is treated as the
    /// header. ASCII whitespace anywhere in the data, such as the line
    /// breaks of wrapped base64, is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use snaptable_core::util::image_store::ImageStore;
    ///
    /// let bare = ImageStore::decode_payload("aGVsbG8=").unwrap();
    /// let prefixed = ImageStore::decode_payload("data:image/png;base64,aGVsbG8=").unwrap();
    /// assert_eq!(bare, prefixed);
    /// ```
    pub fn decode_payload(payload: &str) -> ServiceResult<Vec<u8>> {
        let encoded = match payload.split_once(',') {
            Some((_, data)) => data,
            None => payload,
        };

        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        STANDARD
            .decode(compact)
            .map_err(|e| ServiceError::InvalidBase64 {
                reason: e.to_string(),
            })
    }

    /// Decodes `payload` and writes it as a new PNG file
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidBase64`] - payload does not decode
    /// - [`ServiceError::Io`] - directory creation or write failed
    pub async fn store(&self, payload: &str, intent: ImageIntent) -> ServiceResult<StoredImage> {
        let bytes = Self::decode_payload(payload)?;
        self.write(&bytes, intent).await
    }

    /// Writes raw image bytes as a new PNG file
    pub async fn write(&self, bytes: &[u8], intent: ImageIntent) -> ServiceResult<StoredImage> {
        let dir = self.dir_for(intent);
        fs::create_dir_all(dir).await?;

        let path = dir.join(unique_filename(intent.prefix(), "png"));
        fs::write(&path, bytes).await?;

        tracing::info!("Stored {} image at {}", intent, path.display());

        Ok(StoredImage {
            path,
            intent,
            size: bytes.len() as u64,
        })
    }

    /// Removes a file if present
    ///
    /// Returns `true` when a file was removed. A missing file is not an
    /// error, just nothing to remove; a failed removal is logged.
    pub async fn delete(&self, path: &Path) -> bool {
        match fs::remove_file(path).await {
            Ok(()) => {
                tracing::info!("Temporary file {} removed", path.display());
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Nothing to remove at {}", path.display());
                false
            }
            Err(e) => {
                tracing::warn!("Failed to remove temporary file {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Reads the pixel dimensions of a stored image
    ///
    /// Only the image header is read. Returns `None` for unreadable or
    /// non-image files.
    pub fn dimensions(path: &Path) -> Option<(u32, u32)> {
        match image::image_dimensions(path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                tracing::warn!("Error getting image dimensions for {}: {}", path.display(), e);
                None
            }
        }
    }
}
