// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-recognition capability.
//
// The scan pipeline only needs "binary image in, text out". Engines are
// injected behind this trait so the geometry pipeline can be tested without
// model files.

use docscan_core::error::Result;
use image::GrayImage;

/// Something that can read the text off an enhanced page.
pub trait TextRecognizer: Send + Sync {
    /// Return all text found in `image`. An empty string means no text.
    fn recognize_text(&self, image: &GrayImage) -> Result<String>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize_text(&self, image: &GrayImage) -> Result<String> {
        (**self).recognize_text(image)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for std::sync::Arc<T> {
    fn recognize_text(&self, image: &GrayImage) -> Result<String> {
        (**self).recognize_text(image)
    }
}
