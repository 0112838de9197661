// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-document — Photo-to-text document scanning.
//
// Provides image decoding (normalised to RGB8) and the scanning pipeline:
// Canny edge map, external contour ranking, greedy four-corner detection,
// perspective rectification, Gaussian adaptive thresholding, and a pluggable
// text recognizer with an optional `ocrs` backend.

pub mod image;
pub mod scan;

// Re-export the primary structs so callers can use `docscan_document::DocumentScanner` etc.
pub use scan::{
    ContourRanker, DocumentScanner, Enhancer, Preprocessor, QuadDetector, Rectifier, ScanOutput,
    ScanSummary, TextRecognizer,
};

#[cfg(feature = "ocr")]
pub use scan::OcrEngine;
