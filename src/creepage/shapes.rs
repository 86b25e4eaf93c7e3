//! Conductor and board-edge shape primitives
//!
//! Board geometry is decomposed into these tagged shapes before path
//! generation. Conductive shapes carry a width and widen attachment points
//! by half of it; board-edge shapes always have zero width.

use super::types::{Point, EPSILON};

/// Shape kind, ordered for duplicate-merge sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Point,
    Circle,
    Arc,
    Segment,
}

/// Kind-specific shape payload
#[derive(Debug, Clone)]
pub enum ShapeGeom {
    Point,
    Circle {
        radius: f64,
    },
    /// Angles in degrees, normalized so end >= start
    Arc {
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Segment {
        start: Point,
        end: Point,
        width: f64,
    },
}

/// A primitive shape owned by the creepage graph
#[derive(Debug, Clone)]
pub struct CreepShape {
    /// Anchor position: the point itself, a circle/arc center, or segment start
    pub pos: Point,
    pub geom: ShapeGeom,
    /// Conductive ("Cu") vs board-edge ("Be")
    pub conductive: bool,
    /// Originating board item, None for synthetic shapes
    pub parent: Option<u64>,
}

impl CreepShape {
    pub fn point(pos: Point, conductive: bool, parent: Option<u64>) -> Self {
        Self {
            pos,
            geom: ShapeGeom::Point,
            conductive,
            parent,
        }
    }

    pub fn circle(center: Point, radius: f64, conductive: bool, parent: Option<u64>) -> Self {
        Self {
            pos: center,
            geom: ShapeGeom::Circle { radius },
            conductive,
            parent,
        }
    }

    pub fn arc(
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        conductive: bool,
        parent: Option<u64>,
    ) -> Self {
        Self {
            pos: center,
            geom: ShapeGeom::Arc {
                radius,
                start_angle,
                end_angle,
            },
            conductive,
            parent,
        }
    }

    pub fn segment(start: Point, end: Point, width: f64, conductive: bool, parent: Option<u64>) -> Self {
        Self {
            pos: start,
            geom: ShapeGeom::Segment { start, end, width },
            conductive,
            parent,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self.geom {
            ShapeGeom::Point => ShapeKind::Point,
            ShapeGeom::Circle { .. } => ShapeKind::Circle,
            ShapeGeom::Arc { .. } => ShapeKind::Arc,
            ShapeGeom::Segment { .. } => ShapeKind::Segment,
        }
    }

    /// Radius for circles and arcs, zero otherwise
    pub fn radius(&self) -> f64 {
        match self.geom {
            ShapeGeom::Circle { radius } | ShapeGeom::Arc { radius, .. } => radius,
            _ => 0.0,
        }
    }

    /// Shape equivalence used by duplicate removal: same kind and position,
    /// plus same radius for circles. Arc angle ranges are not compared.
    pub fn equivalent(&self, other: &CreepShape) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        if self.pos.distance(other.pos) > EPSILON {
            return false;
        }
        match self.kind() {
            ShapeKind::Circle => (self.radius() - other.radius()).abs() <= EPSILON,
            _ => true,
        }
    }

    /// Axis-aligned bounding box [min_x, min_y, max_x, max_y]
    pub fn bounds(&self) -> [f64; 4] {
        match &self.geom {
            ShapeGeom::Point => [self.pos.x, self.pos.y, self.pos.x, self.pos.y],
            // Conservative: the full circle box also covers any arc of it
            ShapeGeom::Circle { radius } | ShapeGeom::Arc { radius, .. } => [
                self.pos.x - radius,
                self.pos.y - radius,
                self.pos.x + radius,
                self.pos.y + radius,
            ],
            ShapeGeom::Segment { start, end, width } => {
                let hw = width / 2.0;
                [
                    start.x.min(end.x) - hw,
                    start.y.min(end.y) - hw,
                    start.x.max(end.x) + hw,
                    start.y.max(end.y) + hw,
                ]
            }
        }
    }

}
