//! Pairwise path generation between creepage shapes
//!
//! Closed-form geometric solutions for every shape-kind combination:
//! tangent lines between circles and arcs, nearest-point projections onto
//! segments, and the angular-span tests that decide whether an arc behaves
//! like a circle or must connect through one of its endpoints.
//!
//! All routines are reflexive: the mirrored call yields the same weight set
//! with the endpoints swapped. Degenerate inputs (zero radius, coincident
//! centers, zero-length segments) produce an empty result, never NaN.

use serde::Serialize;

use super::distance::{angle_in_span, circle_point, normalize_angle, projection_parameter};
use super::shapes::{CreepShape, ShapeGeom};
use super::types::{Point, EPSILON};

/// A candidate connecting path between two shapes
#[derive(Debug, Clone, Serialize)]
pub struct PathConnection {
    /// Attachment point on the first shape
    pub a1: Point,
    /// Attachment point on the second shape
    pub a2: Point,
    /// Path length, always >= 0
    pub weight: f64,
    /// Whether this connection should be rendered
    pub show: bool,
    /// Circle/arc surface hops must be drawn as straight lines
    pub force_straight: bool,
}

impl PathConnection {
    pub fn new(a1: Point, a2: Point, weight: f64) -> Self {
        Self {
            a1,
            a2,
            weight: weight.max(0.0),
            show: true,
            force_straight: false,
        }
    }

    /// Zero-weight structural connection, not rendered
    pub fn hidden(a1: Point, a2: Point) -> Self {
        Self {
            a1,
            a2,
            weight: 0.0,
            show: false,
            force_straight: false,
        }
    }

    pub fn flipped(mut self) -> Self {
        std::mem::swap(&mut self.a1, &mut self.a2);
        self
    }
}

fn flip_all(paths: Vec<PathConnection>) -> Vec<PathConnection> {
    paths.into_iter().map(PathConnection::flipped).collect()
}

/// Generate the candidate connecting paths between two shapes whose length
/// does not exceed `max_weight`. Returns zero, one, or two paths with `a1`
/// attached to `a` and `a2` attached to `b`.
pub fn paths_between(a: &CreepShape, b: &CreepShape, max_weight: f64) -> Vec<PathConnection> {
    use ShapeGeom::*;
    match (&a.geom, &b.geom) {
        (Point, Point) => point_point(a.pos, b.pos, max_weight),
        (Point, Circle { radius }) => point_circle(a.pos, b.pos, *radius, max_weight),
        (Circle { radius }, Point) => flip_all(point_circle(b.pos, a.pos, *radius, max_weight)),
        (
            Point,
            Arc {
                radius,
                start_angle,
                end_angle,
            },
        ) => point_arc(a.pos, b.pos, *radius, *start_angle, *end_angle, max_weight),
        (
            Arc {
                radius,
                start_angle,
                end_angle,
            },
            Point,
        ) => flip_all(point_arc(
            b.pos,
            a.pos,
            *radius,
            *start_angle,
            *end_angle,
            max_weight,
        )),
        (Circle { radius: r1 }, Circle { radius: r2 }) => {
            circle_circle(a.pos, *r1, b.pos, *r2, max_weight)
        }
        (
            Circle { radius },
            Arc {
                radius: ar,
                start_angle,
                end_angle,
            },
        ) => circle_arc(
            a.pos,
            *radius,
            b.pos,
            *ar,
            *start_angle,
            *end_angle,
            max_weight,
        ),
        (
            Arc {
                radius: ar,
                start_angle,
                end_angle,
            },
            Circle { radius },
        ) => flip_all(circle_arc(
            b.pos,
            *radius,
            a.pos,
            *ar,
            *start_angle,
            *end_angle,
            max_weight,
        )),
        (
            Arc {
                radius: r1,
                start_angle: sa1,
                end_angle: ea1,
            },
            Arc {
                radius: r2,
                start_angle: sa2,
                end_angle: ea2,
            },
        ) => arc_arc(
            a.pos, *r1, *sa1, *ea1, b.pos, *r2, *sa2, *ea2, max_weight,
        ),
        (Segment { start, end, width }, Point) => {
            segment_to_point(*start, *end, *width, b.pos, max_weight)
        }
        (Point, Segment { start, end, width }) => {
            flip_all(segment_to_point(*start, *end, *width, a.pos, max_weight))
        }
        (Segment { start, end, width }, Circle { radius }) => {
            segment_to_circle(*start, *end, *width, b.pos, *radius, max_weight)
        }
        (Circle { radius }, Segment { start, end, width }) => flip_all(segment_to_circle(
            *start, *end, *width, a.pos, *radius, max_weight,
        )),
        (
            Segment { start, end, width },
            Arc {
                radius,
                start_angle,
                end_angle,
            },
        ) => segment_to_arc(
            *start,
            *end,
            *width,
            b.pos,
            *radius,
            *start_angle,
            *end_angle,
            max_weight,
        ),
        (
            Arc {
                radius,
                start_angle,
                end_angle,
            },
            Segment { start, end, width },
        ) => flip_all(segment_to_arc(
            *start,
            *end,
            *width,
            a.pos,
            *radius,
            *start_angle,
            *end_angle,
            max_weight,
        )),
        (
            Segment {
                start: s1,
                end: e1,
                width: w1,
            },
            Segment {
                start: s2,
                end: e2,
                width: w2,
            },
        ) => segment_segment(*s1, *e1, *w1, *s2, *e2, *w2, max_weight),
    }
}

fn point_point(p1: Point, p2: Point, max_weight: f64) -> Vec<PathConnection> {
    let d = p1.distance(p2);
    if d > max_weight {
        return vec![];
    }
    vec![PathConnection::new(p1, p2, d)]
}

/// Point to circle: attach at the boundary point nearest the external point
fn point_circle(p: Point, center: Point, radius: f64, max_weight: f64) -> Vec<PathConnection> {
    if radius < EPSILON {
        return vec![];
    }
    let v = p.sub(center);
    let d = v.norm();
    let Some(unit) = v.normalized() else {
        // Point coincides with the center, direction undefined
        return vec![];
    };
    let weight = (d - radius).max(0.0);
    if weight > max_weight {
        return vec![];
    }
    let attach = center.add(unit.scale(radius));
    vec![PathConnection::new(p, attach, weight)]
}

/// Point to arc: radial attachment when the point's bearing falls inside the
/// arc span, otherwise connect to the nearer arc endpoint.
fn point_arc(
    p: Point,
    center: Point,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    max_weight: f64,
) -> Vec<PathConnection> {
    if radius < EPSILON {
        return vec![];
    }
    let v = p.sub(center);
    if v.norm() < EPSILON {
        return vec![];
    }
    if angle_in_span(v.bearing_deg(), start_angle, end_angle) {
        return point_circle(p, center, radius, max_weight);
    }
    let e1 = circle_point(center, radius, start_angle);
    let e2 = circle_point(center, radius, end_angle);
    let target = if p.distance(e1) <= p.distance(e2) { e1 } else { e2 };
    point_point(p, target, max_weight)
}

/// Circle to circle: one candidate per tangent family. The straight
/// (external) family comes from the radius-difference triangle, the crossed
/// (internal) family from the radius-sum triangle. A circle fully contained
/// in the other admits neither family and yields an empty result.
fn circle_circle(c1: Point, r1: f64, c2: Point, r2: f64, max_weight: f64) -> Vec<PathConnection> {
    if r1 < EPSILON || r2 < EPSILON {
        return vec![];
    }
    let d = c1.distance(c2);
    if d < EPSILON {
        return vec![];
    }
    let base = c2.sub(c1).bearing_deg();
    let mut out = Vec::new();

    // Straight (external) tangent
    let h2 = d * d - (r1 - r2) * (r1 - r2);
    if h2 >= 0.0 {
        let weight = h2.sqrt();
        if weight <= max_weight {
            let beta = ((r1 - r2) / d).clamp(-1.0, 1.0).acos().to_degrees();
            let t1 = circle_point(c1, r1, base + beta);
            let t2 = circle_point(c2, r2, base + beta);
            out.push(PathConnection::new(t1, t2, weight));
        }
    }

    // Crossed (internal) tangent
    let h2 = d * d - (r1 + r2) * (r1 + r2);
    if h2 >= 0.0 {
        let weight = h2.sqrt();
        if weight <= max_weight {
            let gamma = ((r1 + r2) / d).clamp(-1.0, 1.0).acos().to_degrees();
            let t1 = circle_point(c1, r1, base + gamma);
            let t2 = circle_point(c2, r2, base + gamma + 180.0);
            out.push(PathConnection::new(t1, t2, weight));
        }
    }

    out
}

/// Whether a tangent line from `p` touches the arc inside its covered span.
/// Decides if the arc behaves like a circle toward `p` or must instead
/// connect through an endpoint.
pub fn tangent_within_span(
    p: Point,
    center: Point,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
) -> bool {
    let d = p.distance(center);
    if d <= radius + EPSILON || radius < EPSILON {
        return false;
    }
    let bearing = p.sub(center).bearing_deg();
    let off = (radius / d).clamp(-1.0, 1.0).acos().to_degrees();
    angle_in_span(normalize_angle(bearing + off), start_angle, end_angle)
        || angle_in_span(normalize_angle(bearing - off), start_angle, end_angle)
}

/// Circle to arc: solve the circle/circle problem, keep tangents whose touch
/// angle lies inside the arc span, and retry missed candidates against the
/// arc endpoints, keeping the lowest-weight replacement.
fn circle_arc(
    c: Point,
    r: f64,
    arc_center: Point,
    arc_radius: f64,
    start_angle: f64,
    end_angle: f64,
    max_weight: f64,
) -> Vec<PathConnection> {
    let mut out = Vec::new();
    let mut missed = false;
    for cand in circle_circle(c, r, arc_center, arc_radius, max_weight) {
        let touch = cand.a2.sub(arc_center).bearing_deg();
        if angle_in_span(touch, start_angle, end_angle) {
            out.push(cand);
        } else {
            missed = true;
        }
    }
    if missed && out.len() < 2 {
        if let Some(best) = best_endpoint_to_circle(
            arc_center,
            arc_radius,
            start_angle,
            end_angle,
            c,
            r,
            max_weight,
        ) {
            out.push(best);
        }
    }
    out
}

/// Lowest-weight connection from either arc endpoint to a circle.
/// Result orientation: a1 on the circle, a2 on the arc endpoint.
fn best_endpoint_to_circle(
    arc_center: Point,
    arc_radius: f64,
    start_angle: f64,
    end_angle: f64,
    c: Point,
    r: f64,
    max_weight: f64,
) -> Option<PathConnection> {
    let mut best: Option<PathConnection> = None;
    for angle in [start_angle, end_angle] {
        let ep = circle_point(arc_center, arc_radius, angle);
        for cand in point_circle(ep, c, r, max_weight) {
            let cand = cand.flipped();
            if best.as_ref().map_or(true, |b| cand.weight < b.weight) {
                best = Some(cand);
            }
        }
    }
    best
}

/// Arc to arc: circle/circle tangents filtered by both spans, with endpoint
/// fallbacks on a miss. `tangent_within_span` decides whether the arcs can
/// behave like circles toward each other at all; when they cannot (including
/// the concentric case the circle solution rejects), the connection must run
/// through an endpoint.
#[allow(clippy::too_many_arguments)]
fn arc_arc(
    c1: Point,
    r1: f64,
    sa1: f64,
    ea1: f64,
    c2: Point,
    r2: f64,
    sa2: f64,
    ea2: f64,
    max_weight: f64,
) -> Vec<PathConnection> {
    let mut out = Vec::new();
    let mut missed = false;
    for cand in circle_circle(c1, r1, c2, r2, max_weight) {
        let t1 = cand.a1.sub(c1).bearing_deg();
        let t2 = cand.a2.sub(c2).bearing_deg();
        if angle_in_span(t1, sa1, ea1) && angle_in_span(t2, sa2, ea2) {
            out.push(cand);
        } else {
            missed = true;
        }
    }
    let circle_like = tangent_within_span(c2, c1, r1, sa1, ea1)
        && tangent_within_span(c1, c2, r2, sa2, ea2);
    if (missed || !circle_like) && out.len() < 2 {
        let mut best: Option<PathConnection> = None;
        // Endpoints of the first arc against the second arc
        for angle in [sa1, ea1] {
            let ep = circle_point(c1, r1, angle);
            for cand in point_arc(ep, c2, r2, sa2, ea2, max_weight) {
                if best.as_ref().map_or(true, |b| cand.weight < b.weight) {
                    best = Some(cand);
                }
            }
        }
        // Endpoints of the second arc against the first arc
        for angle in [sa2, ea2] {
            let ep = circle_point(c2, r2, angle);
            for cand in point_arc(ep, c1, r1, sa1, ea1, max_weight) {
                let cand = cand.flipped();
                if best.as_ref().map_or(true, |b| cand.weight < b.weight) {
                    best = Some(cand);
                }
            }
        }
        if let Some(b) = best {
            out.push(b);
        }
    }
    out
}

/// Attachment anchor on a segment toward a reference point: the clamped
/// projection foot offset by half the track width on the reference's side,
/// or an endpoint when the projection falls outside the extent.
fn segment_anchor(start: Point, end: Point, width: f64, toward: Point) -> (Point, bool) {
    let Some(t) = projection_parameter(toward, start, end) else {
        return (start, true);
    };
    if t <= 0.0 {
        return (start, true);
    }
    if t >= 1.0 {
        return (end, true);
    }
    let ab = end.sub(start);
    let foot = start.add(ab.scale(t));
    if width < EPSILON {
        return (foot, false);
    }
    // Track side from the 2D cross product
    let side = if ab.cross(toward.sub(start)) >= 0.0 { 1.0 } else { -1.0 };
    let Some(perp) = ab.perp().normalized() else {
        return (foot, false);
    };
    (foot.add(perp.scale(side * width / 2.0)), false)
}

fn segment_to_point(
    start: Point,
    end: Point,
    width: f64,
    p: Point,
    max_weight: f64,
) -> Vec<PathConnection> {
    let (anchor, at_end) = segment_anchor(start, end, width, p);
    if at_end && width >= EPSILON {
        // Endpoint widened to a half-width circle
        return flip_all(point_circle(p, anchor, width / 2.0, max_weight));
    }
    point_point(anchor, p, max_weight)
}

fn segment_to_circle(
    start: Point,
    end: Point,
    width: f64,
    center: Point,
    radius: f64,
    max_weight: f64,
) -> Vec<PathConnection> {
    let (anchor, at_end) = segment_anchor(start, end, width, center);
    if at_end && width >= EPSILON {
        return circle_circle(anchor, width / 2.0, center, radius, max_weight);
    }
    point_circle(anchor, center, radius, max_weight)
}

#[allow(clippy::too_many_arguments)]
fn segment_to_arc(
    start: Point,
    end: Point,
    width: f64,
    arc_center: Point,
    arc_radius: f64,
    start_angle: f64,
    end_angle: f64,
    max_weight: f64,
) -> Vec<PathConnection> {
    let (anchor, at_end) = segment_anchor(start, end, width, arc_center);
    if at_end && width >= EPSILON {
        return circle_arc(
            anchor,
            width / 2.0,
            arc_center,
            arc_radius,
            start_angle,
            end_angle,
            max_weight,
        );
    }
    point_arc(anchor, arc_center, arc_radius, start_angle, end_angle, max_weight)
}

/// Segment to segment: evaluate the four endpoint-onto-segment projections,
/// keep the minimum-distance pairing, and widen both attachments by their
/// own half-widths.
#[allow(clippy::too_many_arguments)]
fn segment_segment(
    s1: Point,
    e1: Point,
    w1: f64,
    s2: Point,
    e2: Point,
    w2: f64,
    max_weight: f64,
) -> Vec<PathConnection> {
    use super::distance::point_segment_distance;

    // (point on first segment, point on second segment)
    let mut best: Option<(f64, Point, Point)> = None;
    let mut consider = |d: f64, pa: Point, pb: Point| {
        if best.as_ref().map_or(true, |(bd, _, _)| d < *bd) {
            best = Some((d, pa, pb));
        }
    };

    let (d, foot) = point_segment_distance(s1, s2, e2);
    consider(d, s1, foot);
    let (d, foot) = point_segment_distance(e1, s2, e2);
    consider(d, e1, foot);
    let (d, foot) = point_segment_distance(s2, s1, e1);
    consider(d, foot, s2);
    let (d, foot) = point_segment_distance(e2, s1, e1);
    consider(d, foot, e2);

    let Some((d, pa, pb)) = best else {
        return vec![];
    };
    let weight = (d - w1 / 2.0 - w2 / 2.0).max(0.0);
    if weight > max_weight {
        return vec![];
    }
    let (a1, a2) = match pb.sub(pa).normalized() {
        Some(dir) => (pa.add(dir.scale(w1 / 2.0)), pb.sub(dir.scale(w2 / 2.0))),
        None => (pa, pb),
    };
    vec![PathConnection::new(a1, a2, weight)]
}
