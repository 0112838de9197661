// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic photos and recognizer stubs shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use docscan_core::error::Result;
use docscan_document::TextRecognizer;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

pub const DESK: Rgb<u8> = Rgb([30, 28, 35]);
pub const PAPER: Rgb<u8> = Rgb([240, 238, 232]);
pub const INK: Rgb<u8> = Rgb([20, 20, 25]);

/// Dark canvas with a filled paper rectangle covering `x0..x1` × `y0..y1`.
pub fn filled_rectangle(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, DESK);
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, PAPER);
        }
    }
    img
}

/// A 300×200 page with rows of "printed" strokes, centred on a 600×500 desk
/// and rotated by `degrees` about the image centre.
pub fn rotated_text_page(degrees: f32) -> RgbImage {
    let mut img = filled_rectangle(600, 500, 150, 150, 450, 350);

    // Six lines of text-like glyph blocks.
    for line in 0..6u32 {
        let baseline = 175 + line * 28;
        let mut x = 175u32;
        while x < 420 {
            let glyph_w = 6 + (x % 5);
            for gy in baseline..baseline + 12 {
                for gx in x..x + glyph_w {
                    if gx % 3 != 0 {
                        img.put_pixel(gx, gy, INK);
                    }
                }
            }
            x += glyph_w + 4 + (x % 7);
        }
    }

    rotate_about_center(&img, degrees.to_radians(), Interpolation::Bilinear, DESK)
}

/// Recognizer stub that returns a fixed string and keeps every image it saw.
pub struct RecordingRecognizer {
    pub reply: String,
    pub seen: Mutex<Vec<GrayImage>>,
}

impl RecordingRecognizer {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl TextRecognizer for RecordingRecognizer {
    fn recognize_text(&self, image: &GrayImage) -> Result<String> {
        self.seen.lock().unwrap().push(image.clone());
        Ok(self.reply.clone())
    }
}
