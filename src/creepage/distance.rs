//! Distance and intersection algorithms for creepage analysis
//!
//! Contains point/segment projections, segment and circle intersections,
//! and angle-span arithmetic used by the path generator and the
//! obstruction validator.

use super::types::{Point, EPSILON};

/// Point-to-segment minimum distance, returning the closest point on the segment
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> (f64, Point) {
    let ab = b.sub(a);
    let ap = p.sub(a);
    let ab_len2 = ab.dot(ab);

    if ab_len2 < EPSILON {
        // Degenerate segment
        return (p.distance(a), a);
    }

    let t = (ap.dot(ab) / ab_len2).clamp(0.0, 1.0);
    let closest = a.add(ab.scale(t));
    (p.distance(closest), closest)
}

/// Unclamped projection parameter of `p` onto the infinite line through `a`-`b`.
/// Returns None for a degenerate segment.
pub fn projection_parameter(p: Point, a: Point, b: Point) -> Option<f64> {
    let ab = b.sub(a);
    let len2 = ab.dot(ab);
    if len2 < EPSILON {
        return None;
    }
    Some(p.sub(a).dot(ab) / len2)
}

/// Proper intersection of two segments, if any.
/// Parallel and collinear overlaps yield None.
pub fn segment_segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let r = a2.sub(a1);
    let s = b2.sub(b1);
    let denom = r.cross(s);
    if denom.abs() < EPSILON {
        return None;
    }
    let qp = b1.sub(a1);
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a1.add(r.scale(t)))
    } else {
        None
    }
}

/// Intersections of a segment with a circle (0, 1, or 2 points)
pub fn segment_circle_intersections(a: Point, b: Point, center: Point, radius: f64) -> Vec<Point> {
    if radius < EPSILON {
        return vec![];
    }
    let d = b.sub(a);
    let f = a.sub(center);
    let qa = d.dot(d);
    if qa < EPSILON {
        return vec![];
    }
    let qb = 2.0 * f.dot(d);
    let qc = f.dot(f) - radius * radius;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return vec![];
    }
    let sq = disc.sqrt();
    let mut out = Vec::new();
    for t in [(-qb - sq) / (2.0 * qa), (-qb + sq) / (2.0 * qa)] {
        if (0.0..=1.0).contains(&t) {
            out.push(a.add(d.scale(t)));
        }
    }
    if disc < EPSILON && out.len() == 2 {
        // Tangential touch, report a single point
        out.truncate(1);
    }
    out
}

/// Intersections of a segment with a circular arc
pub fn segment_arc_intersections(
    a: Point,
    b: Point,
    center: Point,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
) -> Vec<Point> {
    segment_circle_intersections(a, b, center, radius)
        .into_iter()
        .filter(|p| angle_in_span(p.sub(center).bearing_deg(), start_angle, end_angle))
        .collect()
}

/// Normalize an angle in degrees to [0, 360)
pub fn normalize_angle(deg: f64) -> f64 {
    let a = deg % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Normalize an arc's angle pair so that start is in [0, 360) and end >= start.
/// Equal angles describe a degenerate (zero-sweep) arc; a full-turn pair
/// keeps its 360 degree sweep.
pub fn normalized_arc_angles(start: f64, end: f64) -> (f64, f64) {
    let s = normalize_angle(start);
    let mut sweep = normalize_angle(end - start);
    if sweep == 0.0 && (end - start).abs() > EPSILON {
        sweep = 360.0;
    }
    (s, s + sweep)
}

/// Whether `angle` lies within the span [start, end] (degrees, end >= start),
/// handling the mod-360 wraparound of spans crossing zero.
pub fn angle_in_span(angle: f64, start: f64, end: f64) -> bool {
    let a = normalize_angle(angle);
    if a >= start - EPSILON && a <= end + EPSILON {
        return true;
    }
    a + 360.0 <= end + EPSILON && a + 360.0 >= start - EPSILON
}

/// Point on a circle at the given angle (degrees)
pub fn circle_point(center: Point, radius: f64, angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(
        center.x + radius * rad.cos(),
        center.y + radius * rad.sin(),
    )
}
