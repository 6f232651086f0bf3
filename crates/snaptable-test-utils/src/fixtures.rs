//! Generated image fixtures

use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

/// Encodes a `width` x `height` gradient as PNG bytes
///
/// # Panics
///
/// Panics if either dimension is zero.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    assert!(width > 0 && height > 0, "fixture dimensions must be non-zero");

    let buffer = RgbaImage::from_fn(width, height, |x, y| {
        let r = ((x * 255) / width.max(1)) as u8;
        let g = ((y * 255) / height.max(1)) as u8;
        Rgba([r, g, 128, 255])
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encoding an in-memory PNG cannot fail");
    bytes
}

/// Bare base64 of `bytes`
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// `data:image/png;base64,...` URI of `bytes`, as a browser canvas produces
pub fn png_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", to_base64(bytes))
}

/// Writes a sample PNG to `dir/name` and returns its path
pub fn write_sample_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sample_png(width, height)).expect("failed to write fixture");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_png_dimensions() {
        let png = sample_png(7, 3);
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));
    }

    #[test]
    fn test_png_data_uri_prefix() {
        let uri = png_data_uri(b"abc");
        assert_eq!(uri, "data:image/png;base64,YWJj");
    }
}
