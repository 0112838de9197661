// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing — grayscale, fixed-size Gaussian smoothing and Canny edges.

use docscan_core::config::PreprocessConfig;
use image::{GrayImage, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use tracing::{debug, instrument};

/// Turns a colour photo into a binary edge map.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Grayscale, smooth with a `blur_kernel`-sized Gaussian, then run Canny.
    ///
    /// The result has the input's dimensions and contains only 0 and 255.
    /// A featureless image yields an all-zero map.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn edge_map(&self, image: &RgbImage) -> GrayImage {
        let gray = to_grayscale(image);
        let blurred = gaussian_smooth(&gray, self.config.blur_kernel);
        let edges = canny(&blurred, self.config.canny_low, self.config.canny_high);

        let edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count();
        debug!(
            edge_pixels,
            low = self.config.canny_low,
            high = self.config.canny_high,
            "Edge map computed"
        );
        edges
    }
}

/// Convert to single-channel luma.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    image::DynamicImage::ImageRgb8(image.clone()).to_luma8()
}

/// Smooth with a `ksize`×`ksize` Gaussian whose sigma is derived from the
/// kernel size. Borders are clamped to the nearest edge pixel.
pub fn gaussian_smooth(gray: &GrayImage, ksize: u32) -> GrayImage {
    let kernel = gaussian_kernel(ksize);
    separable_filter_equal(gray, &kernel)
}

/// Sigma used for a kernel of `ksize` taps when none is given explicitly.
pub fn sigma_for_kernel(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalised 1-D Gaussian weights of length `ksize` (odd).
pub fn gaussian_kernel(ksize: u32) -> Vec<f32> {
    let ksize = ksize.max(1) | 1;
    let sigma = sigma_for_kernel(ksize).max(f32::EPSILON);
    let half = (ksize / 2) as i32;

    let weights: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}
