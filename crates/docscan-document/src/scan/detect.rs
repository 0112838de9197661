// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral detection — approximate each ranked contour to a polygon and
// accept the first one with exactly four vertices.

use docscan_core::config::DetectConfig;
use docscan_core::error::ScanError;
use docscan_core::types::Quad;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use tracing::{debug, info, instrument, warn};

use super::contours::RankedContour;

/// Picks the document outline out of a ranked contour list.
///
/// Candidates are visited largest first and the first one approximating to
/// four vertices is taken, even if a smaller contour would fit better.
#[derive(Debug, Clone, Default)]
pub struct QuadDetector {
    config: DetectConfig,
}

impl QuadDetector {
    pub fn new(config: DetectConfig) -> Self {
        Self { config }
    }

    /// Return the first four-vertex approximation in ranked order.
    ///
    /// `image_area` is only consulted when `min_area_fraction` is set.
    ///
    /// # Errors
    ///
    /// [`ScanError::DocumentNotFound`] when no contour qualifies.
    #[instrument(skip_all, fields(candidates = contours.len()))]
    pub fn detect(&self, contours: &[RankedContour], image_area: f64) -> Result<Quad, ScanError> {
        let min_area = self.config.min_area_fraction * image_area;

        for (rank, contour) in contours.iter().enumerate() {
            let Some(polygon) = approximate_closed(&contour.points, self.config.epsilon_ratio) else {
                continue;
            };
            if polygon.len() != 4 {
                continue;
            }

            if self.config.require_convex && !is_convex(&polygon) {
                debug!(rank, "Skipping non-convex quadrilateral");
                continue;
            }
            if contour.area < min_area {
                debug!(rank, area = contour.area, min_area, "Skipping undersized quadrilateral");
                continue;
            }

            let quad = Quad::new([
                to_f32(polygon[0]),
                to_f32(polygon[1]),
                to_f32(polygon[2]),
                to_f32(polygon[3]),
            ]);
            info!(rank, area = contour.area, corners = ?quad.points, "Document outline found");
            return Ok(quad);
        }

        warn!(candidates = contours.len(), "No four-sided contour found");
        Err(ScanError::DocumentNotFound {
            candidates: contours.len(),
        })
    }
}

fn to_f32(p: Point<i32>) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Approximate a closed contour with tolerance `epsilon_ratio * perimeter`.
///
/// Returns `None` for contours too small to approximate (fewer than two
/// points or zero perimeter).
pub fn approximate_closed(points: &[Point<i32>], epsilon_ratio: f64) -> Option<Vec<Point<i32>>> {
    if points.len() < 2 {
        return None;
    }
    let perimeter = arc_length(points, true);
    if perimeter.is_nan() || perimeter <= 0.0 {
        return None;
    }
    Some(simplify_closed(points, epsilon_ratio * perimeter))
}

/// Douglas–Peucker simplification of a closed curve.
///
/// The loop is cut at two far-apart points (found by two farthest-point
/// sweeps) and each half is simplified as an open chain, so the result does
/// not depend on where tracing started. A final pass drops vertices lying
/// within `epsilon` of the segment joining their neighbours. Non-positive
/// `epsilon` keeps every turning point.
pub fn simplify_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }
    // approximate_polygon_dp panics on epsilon <= 0; NaN is raised to the floor too.
    let epsilon = epsilon.max(f64::MIN_POSITIVE);

    let first = farthest_from(points, 0);
    let second = farthest_from(points, first);
    if first == second {
        return vec![points[first]];
    }

    // Rotate so the loop starts at `first`; `second` lands at `split`.
    let rotated: Vec<Point<i32>> = (0..n).map(|i| points[(first + i) % n]).collect();
    let split = (second + n - first) % n;

    let mut upper = approximate_polygon_dp(&rotated[..=split], epsilon, false);
    let mut closing: Vec<Point<i32>> = rotated[split..].to_vec();
    closing.push(rotated[0]);
    let lower = approximate_polygon_dp(&closing, epsilon, false);

    // Join the halves, dropping the duplicated split point and the closing
    // copy of the start point.
    upper.extend_from_slice(&lower[1..lower.len() - 1]);
    drop_flat_vertices(upper, epsilon)
}

/// Index of the point farthest (Euclidean) from `points[from]`.
fn farthest_from(points: &[Point<i32>], from: usize) -> usize {
    let origin = points[from];
    let mut best = from;
    let mut best_dist = -1i64;
    for (i, p) in points.iter().enumerate() {
        let (dx, dy) = ((p.x - origin.x) as i64, (p.y - origin.y) as i64);
        let dist = dx * dx + dy * dy;
        if dist > best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Remove vertices that sit within `epsilon` of the chord between their
/// neighbours, repeating until stable. Never goes below three vertices.
fn drop_flat_vertices(mut polygon: Vec<Point<i32>>, epsilon: f64) -> Vec<Point<i32>> {
    let mut changed = true;
    while changed && polygon.len() > 3 {
        changed = false;
        let n = polygon.len();
        for i in 0..n {
            let prev = polygon[(i + n - 1) % n];
            let next = polygon[(i + 1) % n];
            if segment_distance(polygon[i], prev, next) <= epsilon {
                polygon.remove(i);
                changed = true;
                break;
            }
        }
    }
    polygon
}

/// Perpendicular distance from `p` to the line through `a` and `b`, or the
/// distance to `a` when the two coincide.
fn segment_distance(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (dx, dy) = (bx - ax, by - ay);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    ((px - ax) * dy - (py - ay) * dx).abs() / length
}

/// Whether all turns of the closed polygon have the same orientation.
pub fn is_convex(polygon: &[Point<i32>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0i64;
    for i in 0..n {
        let (a, b, c) = (polygon[i], polygon[(i + 1) % n], polygon[(i + 2) % n]);
        let cross = (b.x - a.x) as i64 * (c.y - b.y) as i64 - (b.y - a.y) as i64 * (c.x - b.x) as i64;
        if cross != 0 {
            if sign == 0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
    }
    sign != 0
}
