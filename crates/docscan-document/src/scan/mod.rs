// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — edge detection, contour ranking, quadrilateral
// detection, perspective rectification, enhancement, and optical character
// recognition (OCR).

pub mod contours;
pub mod detect;
pub mod enhance;
pub mod pipeline;
pub mod preprocess;
pub mod recognize;
pub mod rectify;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use contours::{ContourRanker, RankedContour};
pub use detect::QuadDetector;
pub use enhance::Enhancer;
pub use pipeline::{DocumentScanner, ScanOutput, ScanSummary};
pub use preprocess::Preprocessor;
pub use recognize::TextRecognizer;
pub use rectify::Rectifier;

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
