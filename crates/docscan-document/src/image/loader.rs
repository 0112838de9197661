// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image loading — decode files or in-memory bytes and normalise them to the
// single channel layout the scan pipeline expects (8-bit RGB).

use docscan_core::error::ScanError;
use image::{DynamicImage, ImageError, RgbImage};
use tracing::{debug, info, instrument};

/// Load an image from a file path and normalise it to RGB8.
///
/// A missing or unreadable file is reported as [`ScanError::Io`]; anything
/// that exists but cannot be decoded is [`ScanError::Decode`].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open(path: impl AsRef<std::path::Path>) -> Result<RgbImage, ScanError> {
    let img = image::open(path.as_ref()).map_err(|err| match err {
        ImageError::IoError(io) => ScanError::Io(io),
        other => ScanError::Decode(format!(
            "failed to decode {}: {}",
            path.as_ref().display(),
            other
        )),
    })?;
    info!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Image loaded"
    );
    normalize(img)
}

/// Decode raw encoded bytes (JPEG, PNG, etc.) and normalise them to RGB8.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn from_bytes(data: &[u8]) -> Result<RgbImage, ScanError> {
    let img = image::load_from_memory(data)
        .map_err(|err| ScanError::Decode(format!("failed to decode image: {}", err)))?;
    debug!(
        width = img.width(),
        height = img.height(),
        "Image decoded from bytes"
    );
    normalize(img)
}

/// Convert any decoded image to 8-bit RGB, dropping alpha.
///
/// Zero-sized images are rejected here so that no pipeline stage ever sees
/// an empty grid.
pub fn normalize(img: DynamicImage) -> Result<RgbImage, ScanError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ScanError::Decode(format!(
            "image has no pixels ({}x{})",
            img.width(),
            img.height()
        )));
    }
    Ok(match img {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn from_bytes_normalizes_grayscale_to_rgb() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 6, Luma([77u8])));
        let rgb = from_bytes(&encode_png(&gray)).unwrap();
        assert_eq!(rgb.dimensions(), (8, 6));
        assert_eq!(rgb.get_pixel(3, 3).0, [77, 77, 77]);
    }

    #[test]
    fn from_bytes_drops_alpha() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 128])));
        let rgb = from_bytes(&encode_png(&rgba)).unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn garbage_bytes_are_a_decode_failure() {
        let err = from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ScanError::Decode(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = open("/nonexistent/docscan/photo.png").unwrap_err();
        assert!(matches!(err, ScanError::Io(_)), "got {err:?}");
    }

    #[test]
    fn open_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 7, Luma([200u8])))
            .save(&path)
            .unwrap();
        let rgb = open(&path).unwrap();
        assert_eq!(rgb.dimensions(), (5, 7));
    }

    #[test]
    fn empty_image_rejected() {
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(matches!(normalize(empty), Err(ScanError::Decode(_))));
    }
}
