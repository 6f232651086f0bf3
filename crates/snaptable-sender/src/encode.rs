//! PNG encoding of captured frames
//!
//! ```
//! use snaptable_sender::{capture::mock::test_pattern, encode::encode_png};
//!
//! let png = encode_png(&test_pattern(100, 100)).unwrap();
//! assert_eq!(&png[..4], b"\x89PNG");
//! ```

use std::io::Cursor;

use image::{
    ExtendedColorType, ImageEncoder, RgbaImage,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::error::{CaptureError, CaptureResult};

/// Encodes a frame as PNG with default compression
pub fn encode_png(frame: &RgbaImage) -> CaptureResult<Vec<u8>> {
    encode_png_with_compression(frame, CompressionType::Default)
}

/// Encodes a frame as PNG with the given compression level
///
/// Adaptive filtering picks a filter per scanline. PNG is always lossless.
pub fn encode_png_with_compression(
    frame: &RgbaImage,
    compression: CompressionType,
) -> CaptureResult<Vec<u8>> {
    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(Cursor::new(&mut output), compression, FilterType::Adaptive);

    let (width, height) = frame.dimensions();
    encoder
        .write_image(frame.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| CaptureError::EncodingFailed {
            format: "png".to_string(),
            reason: e.to_string(),
        })?;

    Ok(output)
}
