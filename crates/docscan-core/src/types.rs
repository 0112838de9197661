// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core geometry types for the scanning pipeline.

use serde::{Deserialize, Serialize};

/// A point in image coordinates (x to the right, y downwards).
pub type PointF = (f32, f32);

/// Four document corners in source-image coordinates, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub points: [PointF; 4],
}

impl Quad {
    pub fn new(points: [PointF; 4]) -> Self {
        Self { points }
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|(x, y)| x.is_finite() && y.is_finite())
    }

    /// Canonical corner order, independent of the order the points were given in.
    ///
    /// The two leftmost points (by x, then y) form the left edge: the upper
    /// one is top-left, the other bottom-left. Of the remaining two, the one
    /// farther from top-left is bottom-right. Every input point fills exactly
    /// one role, so ties (a page rotated by 45°) never collapse two corners.
    pub fn ordered(&self) -> OrderedQuad {
        let mut sorted = self.points;
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let (top_left, bottom_left) = if sorted[1].1 < sorted[0].1 {
            (sorted[1], sorted[0])
        } else {
            (sorted[0], sorted[1])
        };
        let (top_right, bottom_right) =
            if distance(top_left, sorted[3]) >= distance(top_left, sorted[2]) {
                (sorted[2], sorted[3])
            } else {
                (sorted[3], sorted[2])
            };

        OrderedQuad {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        self.points.iter().fold(
            (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }
}

/// Corners in top-left, top-right, bottom-right, bottom-left order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderedQuad {
    pub top_left: PointF,
    pub top_right: PointF,
    pub bottom_right: PointF,
    pub bottom_left: PointF,
}

impl OrderedQuad {
    pub fn as_array(&self) -> [PointF; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Output size of the rectified page as `(width, height)`.
    ///
    /// Width is the longer of the top and bottom edges, height the longer of
    /// the left and right edges, both truncated and never below 1.
    pub fn target_size(&self) -> (u32, u32) {
        let width_bottom = distance(self.bottom_right, self.bottom_left);
        let width_top = distance(self.top_right, self.top_left);
        let height_right = distance(self.top_right, self.bottom_right);
        let height_left = distance(self.top_left, self.bottom_left);

        (
            clamp_dimension(width_bottom.max(width_top)),
            clamp_dimension(height_right.max(height_left)),
        )
    }

    /// Enclosed area via the shoelace formula.
    pub fn area(&self) -> f32 {
        shoelace_area(&self.as_array())
    }
}

fn distance(a: PointF, b: PointF) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn clamp_dimension(length: f32) -> u32 {
    if length.is_finite() && length >= 1.0 {
        length as u32
    } else {
        1
    }
}

/// Compute the area of a polygon given by its vertices using the shoelace
/// formula. The vertices should be in order (CW or CCW).
pub fn shoelace_area(corners: &[PointF]) -> f32 {
    let n = corners.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0f32;
    for i in 0..n {
        let j = (i + 1) % n;
        area += corners[i].0 * corners[j].1;
        area -= corners[j].0 * corners[i].1;
    }
    area.abs() / 2.0
}
