// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — warp the detected quadrilateral onto an
// axis-aligned rectangle.

use docscan_core::error::ScanError;
use docscan_core::types::{OrderedQuad, Quad};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument, warn};

/// Maximum distance (pixels) a source corner may land from its destination
/// corner before the solved projection is considered unusable.
const CORNER_TOLERANCE: f32 = 1.0;

/// Quadrilaterals enclosing less than this many square pixels are not solved.
const MIN_SOURCE_AREA: f32 = 1.0;

/// Produces a fronto-parallel view of the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rectifier;

impl Rectifier {
    /// Warp `quad` out of `image` into a `W`×`H` rectangle, where `W` is the
    /// longer of the top/bottom edges and `H` the longer of the left/right
    /// edges (both at least 1).
    ///
    /// Corners are put in canonical order first, so the input order does not
    /// matter. Pixels mapping outside the source are black. When the corners
    /// are too degenerate for a projective solve (coincident or collinear
    /// points, a one-pixel-wide target) the corners' bounding box is resampled
    /// to the target size instead.
    ///
    /// # Errors
    ///
    /// [`ScanError::DegenerateGeometry`] when a corner is not a finite number
    /// or the source image is empty.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn rectify(&self, image: &RgbImage, quad: &Quad) -> Result<RgbImage, ScanError> {
        if !quad.is_finite() {
            return Err(ScanError::DegenerateGeometry(format!(
                "corner coordinates must be finite, got {:?}",
                quad.points
            )));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(ScanError::DegenerateGeometry("source image is empty".into()));
        }

        let ordered = quad.ordered();
        let (out_w, out_h) = ordered.target_size();
        debug!(
            top_left = ?ordered.top_left,
            top_right = ?ordered.top_right,
            bottom_right = ?ordered.bottom_right,
            bottom_left = ?ordered.bottom_left,
            out_w,
            out_h,
            "Corners ordered"
        );

        let output = match solve_projection(&ordered, out_w, out_h) {
            Some(projection) => {
                let mut output = RgbImage::new(out_w, out_h);
                warp_into(
                    image,
                    &projection,
                    Interpolation::Bilinear,
                    Rgb([0u8, 0, 0]),
                    &mut output,
                );
                output
            }
            None => {
                warn!(
                    area = ordered.area(),
                    "Projective transform is singular; resampling bounding box instead"
                );
                resample_bounds(image, quad, out_w, out_h)
            }
        };

        info!(out_w, out_h, "Perspective rectification applied");
        Ok(output)
    }
}

/// Destination corners for a `width`×`height` output, in canonical order.
pub fn destination_corners(width: u32, height: u32) -> [(f32, f32); 4] {
    let (right, bottom) = ((width - 1) as f32, (height - 1) as f32);
    [(0.0, 0.0), (right, 0.0), (right, bottom), (0.0, bottom)]
}

/// Solve the source→destination projection and reject it unless every
/// source corner actually lands on its destination corner.
fn solve_projection(ordered: &OrderedQuad, out_w: u32, out_h: u32) -> Option<Projection> {
    if out_w < 2 || out_h < 2 || ordered.area() < MIN_SOURCE_AREA {
        return None;
    }
    let src = ordered.as_array();
    let dst = destination_corners(out_w, out_h);

    let projection = Projection::from_control_points(src, dst)?;
    let faithful = src.iter().zip(dst.iter()).all(|(&s, &d)| {
        let (x, y) = projection * s;
        x.is_finite()
            && y.is_finite()
            && (x - d.0).abs() <= CORNER_TOLERANCE
            && (y - d.1).abs() <= CORNER_TOLERANCE
    });
    faithful.then_some(projection)
}

/// Fallback for degenerate corners: crop the corners' bounding box (clamped
/// to the image, at least one pixel) and scale it to the target size.
fn resample_bounds(image: &RgbImage, quad: &Quad, out_w: u32, out_h: u32) -> RgbImage {
    let (min_x, min_y, max_x, max_y) = quad.bounds();
    let max_px = (image.width() - 1) as f32;
    let max_py = (image.height() - 1) as f32;

    let x0 = min_x.floor().clamp(0.0, max_px) as u32;
    let y0 = min_y.floor().clamp(0.0, max_py) as u32;
    let x1 = max_x.ceil().clamp(0.0, max_px) as u32;
    let y1 = max_y.ceil().clamp(0.0, max_py) as u32;

    let (x0, x1) = (x0.min(x1), x0.max(x1));
    let (y0, y1) = (y0.min(y1), y0.max(y1));

    let crop = image::imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image();
    image::imageops::resize(&crop, out_w, out_h, image::imageops::FilterType::Triangle)
}
