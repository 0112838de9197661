// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan enhancement — grayscale, upsampling and Gaussian adaptive
// thresholding of the rectified page so that glyphs are crisp for OCR.

use docscan_core::config::EnhanceConfig;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::separable_filter_equal;
use tracing::{debug, info, instrument};

use super::preprocess::gaussian_kernel;

/// Turns a rectified page into a black-and-white image for text recognition.
#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    config: EnhanceConfig,
}

impl Enhancer {
    pub fn new(config: EnhanceConfig) -> Self {
        Self { config }
    }

    /// Grayscale (if needed), upsample by `upscale` with linear
    /// interpolation, then binarize against a Gaussian-weighted local mean.
    ///
    /// The output is single-channel, contains only 0 and 255, and is
    /// `upscale` times the input in each dimension.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn enhance(&self, image: &DynamicImage) -> GrayImage {
        let gray = match image {
            DynamicImage::ImageLuma8(gray) => gray.clone(),
            other => other.to_luma8(),
        };
        let upscaled = upscale(&gray, self.config.upscale);
        let binary = adaptive_threshold_gaussian(&upscaled, self.config.block_size, self.config.offset);

        info!(
            out_w = binary.width(),
            out_h = binary.height(),
            "Page enhanced for OCR"
        );
        binary
    }
}

/// Enlarge by an integer factor using linear interpolation.
pub fn upscale(gray: &GrayImage, factor: u32) -> GrayImage {
    if factor <= 1 {
        return gray.clone();
    }
    let (w, h) = gray.dimensions();
    image::imageops::resize(
        gray,
        w.saturating_mul(factor),
        h.saturating_mul(factor),
        FilterType::Triangle,
    )
}

/// Adaptive binarization against a Gaussian-weighted local mean.
///
/// For each pixel the threshold is the `block_size`×`block_size` Gaussian
/// mean of its neighbourhood minus `offset`. Pixels strictly above the
/// threshold become white (255), the rest black (0).
pub fn adaptive_threshold_gaussian(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let kernel = gaussian_kernel(block_size);
    let local_mean: GrayImage = separable_filter_equal(gray, &kernel);

    let (width, height) = gray.dimensions();
    let mut output = GrayImage::new(width, height);
    let mut white = 0usize;

    for (x, y, pixel) in gray.enumerate_pixels() {
        let threshold = local_mean.get_pixel(x, y).0[0] as i32 - offset;
        let value = if pixel.0[0] as i32 > threshold {
            white += 1;
            255u8
        } else {
            0u8
        };
        output.put_pixel(x, y, Luma([value]));
    }

    debug!(block_size, offset, white, total = (width * height) as usize, "Adaptive threshold applied");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// White page with a few thin dark strokes, like printed text.
    fn text_like_page() -> GrayImage {
        let mut img = GrayImage::from_pixel(80, 60, Luma([235u8]));
        for x in 10..70 {
            img.put_pixel(x, 15, Luma([30u8]));
            img.put_pixel(x, 35, Luma([40u8]));
        }
        for y in 10..50 {
            img.put_pixel(25, y, Luma([25u8]));
            img.put_pixel(55, y, Luma([35u8]));
        }
        img
    }

    #[test]
    fn output_is_binary_and_doubled() {
        let rgb = RgbImage::from_fn(40, 30, |x, y| Rgb([(x * 6) as u8, (y * 8) as u8, 90]));
        let out = Enhancer::default().enhance(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(out.dimensions(), (80, 60));
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn strokes_turn_black_and_paper_white() {
        let page = text_like_page();
        let out = adaptive_threshold_gaussian(&page, 11, 2);
        assert_eq!(out.get_pixel(40, 15).0[0], 0);
        assert_eq!(out.get_pixel(25, 25).0[0], 0);
        assert_eq!(out.get_pixel(40, 25).0[0], 255);
        assert_eq!(out.get_pixel(5, 5).0[0], 255);
    }

    #[test]
    fn uneven_lighting_is_compensated() {
        // Left half dim, right half bright, one stroke in each.
        let mut img = GrayImage::from_fn(100, 40, |x, _| Luma([if x < 50 { 90 } else { 230 }]));
        for y in 5..35 {
            img.put_pixel(20, y, Luma([40u8]));
            img.put_pixel(80, y, Luma([170u8]));
        }
        let out = adaptive_threshold_gaussian(&img, 11, 2);
        assert_eq!(out.get_pixel(20, 20).0[0], 0);
        assert_eq!(out.get_pixel(80, 20).0[0], 0);
        assert_eq!(out.get_pixel(10, 20).0[0], 255);
        assert_eq!(out.get_pixel(90, 20).0[0], 255);
    }

    #[test]
    fn thresholding_is_idempotent_on_its_output() {
        let once = adaptive_threshold_gaussian(&text_like_page(), 11, 2);
        let twice = adaptive_threshold_gaussian(&once, 11, 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn upscale_factor_one_is_identity() {
        let page = text_like_page();
        assert_eq!(upscale(&page, 1), page);
        assert_eq!(upscale(&page, 3).dimensions(), (240, 180));
    }

    #[test]
    fn grayscale_input_is_accepted() {
        let out = Enhancer::default().enhance(&DynamicImage::ImageLuma8(text_like_page()));
        assert_eq!(out.dimensions(), (160, 120));
    }
}
