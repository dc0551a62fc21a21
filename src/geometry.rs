// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use geo::{Coord, Intersects, Line, LineString, Rect};

/// A position in the planar coordinate system shared by the network, the grid and
/// the position samples. No unit or datum conversion happens inside this crate.
pub type Point = Coord<f64>;

/// Geometry of a [StreetSegment](crate::StreetSegment).
pub type Polyline = LineString<f64>;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Projects `p` onto the line segment `a`-`b` using a clamped scalar projection.
///
/// A zero-length segment projects everything onto `a`.
pub fn project_onto_segment(a: Point, b: Point, p: Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_squared = dx * dx + dy * dy;
    if length_squared == 0.0 {
        return a;
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_squared).clamp(0.0, 1.0);
    Coord {
        x: a.x + t * dx,
        y: a.y + t * dy,
    }
}

/// Finds the point of a polyline closest to `p`, together with its distance to `p`.
///
/// Every sub-edge is checked; on ties the earliest sub-edge wins.
/// Returns `None` for polylines with fewer than two points.
pub fn nearest_on_polyline(line: &Polyline, p: Point) -> Option<(f64, Point)> {
    line.lines()
        .map(|sub_edge| {
            let projected = project_onto_segment(sub_edge.start, sub_edge.end, p);
            (distance(projected, p), projected)
        })
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
}

/// Linear interpolation between two points; `fraction == 0` gives `a`.
pub fn interpolate(a: Point, b: Point, fraction: f64) -> Point {
    Coord {
        x: a.x + (b.x - a.x) * fraction,
        y: a.y + (b.y - a.y) * fraction,
    }
}

/// Checks whether `p` lies inside `rect`, borders included.
pub fn rect_contains(rect: &Rect<f64>, p: Point) -> bool {
    let (min, max) = (rect.min(), rect.max());
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// Checks whether two rectangles overlap, touching borders included.
pub fn rects_overlap(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    !(a.max().x < b.min().x || a.min().x > b.max().x || a.max().y < b.min().y || a.min().y > b.max().y)
}

/// Returns the four boundary edges of a rectangle: bottom, top, left, right.
pub fn rect_boundary(rect: &Rect<f64>) -> [Line<f64>; 4] {
    let (min, max) = (rect.min(), rect.max());
    let bottom_right = Coord { x: max.x, y: min.y };
    let top_left = Coord { x: min.x, y: max.y };
    [
        Line::new(min, bottom_right),
        Line::new(top_left, max),
        Line::new(min, top_left),
        Line::new(bottom_right, max),
    ]
}

/// Tests whether any sub-edge of `line` crosses or touches the boundary of `rect`.
pub fn polyline_crosses_boundary(line: &Polyline, rect: &Rect<f64>) -> bool {
    let boundary = rect_boundary(rect);
    line.lines()
        .any(|sub_edge| boundary.iter().any(|edge| edge.intersects(&sub_edge)))
}
