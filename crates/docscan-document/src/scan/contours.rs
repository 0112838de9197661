// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour ranking — external boundaries of an edge map, collinear runs
// compressed, sorted by enclosed area (largest first).

use image::GrayImage;
use imageproc::contours::find_contours;
use imageproc::geometry::contour_area;
use imageproc::point::Point;
use tracing::{debug, instrument};

/// A closed external boundary with its enclosed area.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedContour {
    /// Boundary points in tracing order, only direction changes kept.
    pub points: Vec<Point<i32>>,
    /// Shoelace area of `points`.
    pub area: f64,
}

impl RankedContour {
    pub fn from_points(points: Vec<Point<i32>>) -> Self {
        let area = contour_area(&points);
        Self { points, area }
    }

    /// Inclusive bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounding_box(&self) -> Option<(i32, i32, i32, i32)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        ))
    }
}

/// Extracts and orders candidate document outlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourRanker;

impl ContourRanker {
    /// Outermost contours of `edges`, largest enclosed area first.
    ///
    /// Contours nested inside another contour are ignored. Equal areas keep
    /// their tracing order.
    #[instrument(skip_all, fields(width = edges.width(), height = edges.height()))]
    pub fn rank(&self, edges: &GrayImage) -> Vec<RankedContour> {
        let traced = find_contours::<i32>(edges);
        let total = traced.len();

        let mut ranked: Vec<RankedContour> = traced
            .into_iter()
            .filter(|c| c.parent.is_none())
            .map(|c| RankedContour::from_points(compress_collinear(&c.points)))
            .collect();

        ranked.sort_by(|a, b| b.area.total_cmp(&a.area));

        debug!(
            traced = total,
            external = ranked.len(),
            largest_area = ranked.first().map(|c| c.area),
            "Contours ranked"
        );
        ranked
    }
}

/// Drop every point that continues the previous step in the same direction,
/// treating the sequence as a closed loop. Consecutive duplicates are merged.
pub fn compress_collinear(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut deduped: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &p in points {
        if deduped.last() != Some(&p) {
            deduped.push(p);
        }
    }
    while deduped.len() > 1 && deduped.first() == deduped.last() {
        deduped.pop();
    }

    let n = deduped.len();
    if n < 3 {
        return deduped;
    }

    let kept: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = deduped[(i + n - 1) % n];
            let cur = deduped[i];
            let next = deduped[(i + 1) % n];
            !same_direction(prev, cur, next)
        })
        .map(|i| deduped[i])
        .collect();

    // A loop with no turns at all cannot occur for a traced boundary, but keep
    // a defined answer.
    if kept.is_empty() {
        vec![deduped[0]]
    } else {
        kept
    }
}

fn same_direction(prev: Point<i32>, cur: Point<i32>, next: Point<i32>) -> bool {
    let (ax, ay) = ((cur.x - prev.x) as i64, (cur.y - prev.y) as i64);
    let (bx, by) = ((next.x - cur.x) as i64, (next.y - cur.y) as i64);
    ax * by - ay * bx == 0 && ax * bx + ay * by > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    fn pt(x: i32, y: i32) -> Point<i32> {
        Point::new(x, y)
    }

    #[test]
    fn compress_square_outline_to_corners() {
        let mut outline = Vec::new();
        for x in 0..4 {
            outline.push(pt(x, 0));
        }
        for y in 0..4 {
            outline.push(pt(4, y));
        }
        for x in (1..=4).rev() {
            outline.push(pt(x, 4));
        }
        for y in (1..=4).rev() {
            outline.push(pt(0, y));
        }

        let compressed = compress_collinear(&outline);
        assert_eq!(compressed, vec![pt(0, 0), pt(4, 0), pt(4, 4), pt(0, 4)]);
        assert_eq!(RankedContour::from_points(compressed).area, 16.0);
    }

    #[test]
    fn compress_keeps_reversals() {
        // A one-pixel-wide horizontal line traced there and back.
        let line = vec![pt(0, 0), pt(1, 0), pt(2, 0), pt(1, 0)];
        let compressed = compress_collinear(&line);
        assert_eq!(compressed, vec![pt(0, 0), pt(2, 0)]);
    }

    #[test]
    fn compress_handles_tiny_inputs() {
        assert!(compress_collinear(&[]).is_empty());
        assert_eq!(compress_collinear(&[pt(3, 3)]), vec![pt(3, 3)]);
        assert_eq!(compress_collinear(&[pt(3, 3), pt(3, 3)]), vec![pt(3, 3)]);
    }

    #[test]
    fn ranks_by_area_and_skips_nested() {
        let mut edges = GrayImage::new(200, 200);
        // Large outline with a nested one inside.
        draw_hollow_rect_mut(&mut edges, Rect::at(10, 10).of_size(120, 100), Luma([255u8]));
        draw_hollow_rect_mut(&mut edges, Rect::at(40, 40).of_size(30, 30), Luma([255u8]));
        // Separate, smaller outline.
        draw_hollow_rect_mut(&mut edges, Rect::at(150, 150).of_size(40, 30), Luma([255u8]));

        let ranked = ContourRanker.rank(&edges);
        assert_eq!(ranked.len(), 2, "nested outline must be excluded");
        assert!(ranked[0].area > ranked[1].area);
        assert_eq!(ranked[0].bounding_box(), Some((10, 10, 129, 109)));
        assert_eq!(ranked[1].bounding_box(), Some((150, 150, 189, 179)));
        // Areas are measured on the compressed corner polygon.
        assert_eq!(ranked[0].points.len(), 4);
        assert_eq!(ranked[0].area, 119.0 * 99.0);
        assert_eq!(ranked[1].area, 39.0 * 29.0);
    }

    #[test]
    fn empty_edge_map_has_no_contours() {
        let edges = GrayImage::new(50, 40);
        assert!(ContourRanker.rank(&edges).is_empty());
    }
}
