// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document scanner — runs preprocessing, contour ranking, quadrilateral
// detection, rectification, enhancement and (optionally) text recognition
// in sequence.

use docscan_core::config::ScanConfig;
use docscan_core::error::Result;
use docscan_core::types::Quad;
use image::{DynamicImage, GrayImage, RgbImage};
use serde::Serialize;
use tracing::{info, instrument};

use super::contours::ContourRanker;
use super::detect::QuadDetector;
use super::enhance::Enhancer;
use super::preprocess::Preprocessor;
use super::recognize::TextRecognizer;
use super::rectify::Rectifier;
use crate::image::loader;

/// Everything one successful scan produces.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Binary edge map of the input photo.
    pub edges: GrayImage,
    /// Detected document corners in input coordinates.
    pub quad: Quad,
    /// Perspective-corrected page.
    pub rectified: RgbImage,
    /// Binary, upsampled page handed to the recognizer.
    pub enhanced: GrayImage,
    /// Recognised text; `None` when no recognizer is attached.
    pub text: Option<String>,
}

impl ScanOutput {
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            corners: self.quad.ordered().as_array(),
            rectified_size: self.rectified.dimensions(),
            enhanced_size: self.enhanced.dimensions(),
            text: self.text.clone(),
        }
    }
}

/// Serializable digest of a [`ScanOutput`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    /// Top-left, top-right, bottom-right, bottom-left.
    pub corners: [(f32, f32); 4],
    pub rectified_size: (u32, u32),
    pub enhanced_size: (u32, u32),
    pub text: Option<String>,
}

/// The full photo-to-text pipeline.
///
/// Holds only immutable settings and the injected recognizer, so a single
/// scanner can serve independent runs from several threads.
pub struct DocumentScanner {
    preprocessor: Preprocessor,
    ranker: ContourRanker,
    detector: QuadDetector,
    rectifier: Rectifier,
    enhancer: Enhancer,
    recognizer: Option<Box<dyn TextRecognizer>>,
}

impl DocumentScanner {
    /// Build a scanner from validated settings, without a recognizer.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::new(config.preprocess),
            ranker: ContourRanker,
            detector: QuadDetector::new(config.detect),
            rectifier: Rectifier,
            enhancer: Enhancer::new(config.enhance),
            recognizer: None,
        })
    }

    /// Attach the text recognizer invoked on every enhanced page.
    pub fn with_recognizer(mut self, recognizer: impl TextRecognizer + 'static) -> Self {
        self.recognizer = Some(Box::new(recognizer));
        self
    }

    /// Edge map of `image`, the first pipeline stage on its own.
    pub fn edge_map(&self, image: &RgbImage) -> GrayImage {
        self.preprocessor.edge_map(image)
    }

    /// Run the whole pipeline on a decoded RGB image.
    ///
    /// # Errors
    ///
    /// [`DocumentNotFound`](docscan_core::error::ScanError::DocumentNotFound)
    /// if no outline was detected,
    /// [`DegenerateGeometry`](docscan_core::error::ScanError::DegenerateGeometry)
    /// or [`Ocr`](docscan_core::error::ScanError::Ocr) from later stages.
    pub fn scan(&self, image: &RgbImage) -> Result<ScanOutput> {
        let edges = self.edge_map(image);
        self.scan_with_edges(image, edges)
    }

    /// Continue the pipeline from an edge map already computed with
    /// [`edge_map`](Self::edge_map), e.g. after the caller has displayed it.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn scan_with_edges(&self, image: &RgbImage, edges: GrayImage) -> Result<ScanOutput> {
        let contours = self.ranker.rank(&edges);
        let image_area = image.width() as f64 * image.height() as f64;
        let quad = self.detector.detect(&contours, image_area)?;
        drop(contours);

        let rectified = self.rectifier.rectify(image, &quad)?;
        let enhanced = self
            .enhancer
            .enhance(&DynamicImage::ImageRgb8(rectified.clone()));

        let text = match &self.recognizer {
            Some(recognizer) => Some(recognizer.recognize_text(&enhanced)?),
            None => None,
        };

        info!(
            rectified_w = rectified.width(),
            rectified_h = rectified.height(),
            text_chars = text.as_ref().map(String::len),
            "Scan complete"
        );

        Ok(ScanOutput {
            edges,
            quad,
            rectified,
            enhanced,
            text,
        })
    }

    /// Decode encoded bytes and scan them. Undecodable input is reported as
    /// [`Decode`](docscan_core::error::ScanError::Decode) before any pipeline
    /// stage runs.
    pub fn scan_bytes(&self, data: &[u8]) -> Result<ScanOutput> {
        let image = loader::from_bytes(data)?;
        self.scan(&image)
    }

    /// Open a file and scan it.
    pub fn scan_file(&self, path: impl AsRef<std::path::Path>) -> Result<ScanOutput> {
        let image = loader::open(path)?;
        self.scan(&image)
    }
}

impl std::fmt::Debug for DocumentScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentScanner")
            .field("preprocessor", &self.preprocessor)
            .field("detector", &self.detector)
            .field("enhancer", &self.enhancer)
            .field("has_recognizer", &self.recognizer.is_some())
            .finish()
    }
}
