//! Read-only board model consumed by the creepage engine
//!
//! The real board data model lives outside this crate; this module defines
//! the narrow view the engine needs: items with a net, a layer, and an
//! effective geometric shape, plus layer-function classification.

use crate::creepage::distance::normalized_arc_angles;
use crate::creepage::types::Point;

pub type NetCode = i32;

/// Layer functions that carry copper and participate in creepage analysis
pub const COPPER_LAYER_FUNCTIONS: &[&str] = &["SIGNAL", "PLANE", "MIXED", "CONDUCTOR"];

/// Layer functions describing the physical board outline
pub const EDGE_LAYER_FUNCTIONS: &[&str] = &["BOARD_OUTLINE", "EDGE", "PROFILE"];

pub fn is_copper_layer(layer_function: &str) -> bool {
    COPPER_LAYER_FUNCTIONS
        .iter()
        .any(|&f| f.eq_ignore_ascii_case(layer_function))
}

pub fn is_edge_layer(layer_function: &str) -> bool {
    EDGE_LAYER_FUNCTIONS
        .iter()
        .any(|&f| f.eq_ignore_ascii_case(layer_function))
}

#[derive(Debug, Clone)]
pub struct BoardLayer {
    pub layer_id: String,
    pub layer_function: String,
}

/// Effective geometric shape of a board item
#[derive(Debug, Clone)]
pub enum ItemShape {
    Segment {
        start: Point,
        end: Point,
        width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    /// Closed outline, implicitly joined last-to-first
    Polygon {
        outline: Vec<Point>,
    },
    /// Open chain of connected segments
    LineChain {
        points: Vec<Point>,
        width: f64,
    },
    RoundRect {
        center: Point,
        width: f64,
        height: f64,
        corner_radius: f64,
    },
    Compound {
        parts: Vec<ItemShape>,
    },
}

/// Boundary edge of an item, used for path obstruction testing
#[derive(Debug, Clone)]
pub enum OutlineEdge {
    Seg(Point, Point),
    Circle {
        center: Point,
        radius: f64,
    },
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

impl ItemShape {
    /// Axis-aligned bounding box [min_x, min_y, max_x, max_y]
    pub fn bounds(&self) -> [f64; 4] {
        match self {
            ItemShape::Segment { start, end, width } => {
                let hw = width / 2.0;
                [
                    start.x.min(end.x) - hw,
                    start.y.min(end.y) - hw,
                    start.x.max(end.x) + hw,
                    start.y.max(end.y) + hw,
                ]
            }
            ItemShape::Circle { center, radius } => {
                [center.x - radius, center.y - radius, center.x + radius, center.y + radius]
            }
            // Conservative: full circle box covers any arc
            ItemShape::Arc { center, radius, .. } => {
                [center.x - radius, center.y - radius, center.x + radius, center.y + radius]
            }
            ItemShape::Polygon { outline } => points_bounds(outline),
            ItemShape::LineChain { points, width } => {
                let hw = width / 2.0;
                let b = points_bounds(points);
                [b[0] - hw, b[1] - hw, b[2] + hw, b[3] + hw]
            }
            ItemShape::RoundRect {
                center,
                width,
                height,
                ..
            } => [
                center.x - width / 2.0,
                center.y - height / 2.0,
                center.x + width / 2.0,
                center.y + height / 2.0,
            ],
            ItemShape::Compound { parts } => {
                let mut b = [f64::MAX, f64::MAX, f64::MIN, f64::MIN];
                for p in parts {
                    let pb = p.bounds();
                    b[0] = b[0].min(pb[0]);
                    b[1] = b[1].min(pb[1]);
                    b[2] = b[2].max(pb[2]);
                    b[3] = b[3].max(pb[3]);
                }
                b
            }
        }
    }

    /// Boundary edges of this shape for obstruction testing. A stroked
    /// segment contributes its two long sides and flat end caps so a
    /// crossing path picks up an entry and an exit point.
    pub fn outline_edges(&self) -> Vec<OutlineEdge> {
        match self {
            ItemShape::Segment { start, end, width } => stroked_segment_edges(*start, *end, *width),
            ItemShape::Circle { center, radius } => vec![OutlineEdge::Circle {
                center: *center,
                radius: *radius,
            }],
            ItemShape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                let (sa, ea) = normalized_arc_angles(*start_angle, *end_angle);
                vec![OutlineEdge::Arc {
                    center: *center,
                    radius: *radius,
                    start_angle: sa,
                    end_angle: ea,
                }]
            }
            ItemShape::Polygon { outline } => {
                let mut edges = Vec::with_capacity(outline.len());
                for i in 0..outline.len() {
                    let a = outline[i];
                    let b = outline[(i + 1) % outline.len()];
                    edges.push(OutlineEdge::Seg(a, b));
                }
                edges
            }
            ItemShape::LineChain { points, width } => points
                .windows(2)
                .flat_map(|w| stroked_segment_edges(w[0], w[1], *width))
                .collect(),
            ItemShape::RoundRect { .. } => self
                .round_rect_parts()
                .iter()
                .flat_map(|p| p.outline_edges())
                .collect(),
            ItemShape::Compound { parts } => {
                parts.iter().flat_map(|p| p.outline_edges()).collect()
            }
        }
    }

    /// Decompose a rounded rectangle into its four edge segments and four
    /// corner arcs. The inner fill geometry is deliberately not produced.
    pub fn round_rect_parts(&self) -> Vec<ItemShape> {
        let ItemShape::RoundRect {
            center,
            width,
            height,
            corner_radius,
        } = self
        else {
            return vec![];
        };
        let hw = width / 2.0;
        let hh = height / 2.0;
        let r = corner_radius.clamp(0.0, hw.min(hh));
        let (cx, cy) = (center.x, center.y);

        let mut parts = vec![
            // Top and bottom edges, shortened by the corner radius
            ItemShape::Segment {
                start: Point::new(cx - hw + r, cy + hh),
                end: Point::new(cx + hw - r, cy + hh),
                width: 0.0,
            },
            ItemShape::Segment {
                start: Point::new(cx - hw + r, cy - hh),
                end: Point::new(cx + hw - r, cy - hh),
                width: 0.0,
            },
            // Left and right edges
            ItemShape::Segment {
                start: Point::new(cx - hw, cy - hh + r),
                end: Point::new(cx - hw, cy + hh - r),
                width: 0.0,
            },
            ItemShape::Segment {
                start: Point::new(cx + hw, cy - hh + r),
                end: Point::new(cx + hw, cy + hh - r),
                width: 0.0,
            },
        ];
        if r > 0.0 {
            let corners = [
                (cx + hw - r, cy + hh - r, 0.0),
                (cx - hw + r, cy + hh - r, 90.0),
                (cx - hw + r, cy - hh + r, 180.0),
                (cx + hw - r, cy - hh + r, 270.0),
            ];
            for (x, y, start_angle) in corners {
                parts.push(ItemShape::Arc {
                    center: Point::new(x, y),
                    radius: r,
                    start_angle,
                    end_angle: start_angle + 90.0,
                });
            }
        }
        parts
    }
}

fn stroked_segment_edges(start: Point, end: Point, width: f64) -> Vec<OutlineEdge> {
    if width <= 0.0 {
        return vec![OutlineEdge::Seg(start, end)];
    }
    let Some(dir) = end.sub(start).normalized() else {
        return vec![];
    };
    let off = dir.perp().scale(width / 2.0);
    let (a1, a2) = (start.add(off), end.add(off));
    let (b1, b2) = (start.sub(off), end.sub(off));
    vec![
        OutlineEdge::Seg(a1, a2),
        OutlineEdge::Seg(b1, b2),
        // Flat end caps close the stroked outline
        OutlineEdge::Seg(a1, b1),
        OutlineEdge::Seg(a2, b2),
    ]
}

fn points_bounds(points: &[Point]) -> [f64; 4] {
    let mut b = [f64::MAX, f64::MAX, f64::MIN, f64::MIN];
    for p in points {
        b[0] = b[0].min(p.x);
        b[1] = b[1].min(p.y);
        b[2] = b[2].max(p.x);
        b[3] = b[3].max(p.y);
    }
    b
}

#[derive(Debug, Clone)]
pub struct BoardItem {
    pub id: u64,
    pub net: NetCode,
    pub layer_id: String,
    pub shape: ItemShape,
}

impl BoardItem {
    pub fn bounds(&self) -> [f64; 4] {
        self.shape.bounds()
    }
}

/// The board view handed to the engine: layers and items, read-only
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub layers: Vec<BoardLayer>,
    pub items: Vec<BoardItem>,
    next_id: u64,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, layer_id: &str, layer_function: &str) {
        self.layers.push(BoardLayer {
            layer_id: layer_id.to_string(),
            layer_function: layer_function.to_string(),
        });
    }

    pub fn add_item(&mut self, net: NetCode, layer_id: &str, shape: ItemShape) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(BoardItem {
            id,
            net,
            layer_id: layer_id.to_string(),
            shape,
        });
        id
    }

    pub fn item(&self, id: u64) -> Option<&BoardItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn layer_function(&self, layer_id: &str) -> Option<&str> {
        self.layers
            .iter()
            .find(|l| l.layer_id == layer_id)
            .map(|l| l.layer_function.as_str())
    }

    pub fn is_edge_layer_id(&self, layer_id: &str) -> bool {
        self.layer_function(layer_id).is_some_and(is_edge_layer)
    }

    pub fn items_on<'a>(&'a self, layer_id: &'a str) -> impl Iterator<Item = &'a BoardItem> + 'a {
        self.items.iter().filter(move |i| i.layer_id == layer_id)
    }

    pub fn edge_items(&self) -> impl Iterator<Item = &BoardItem> {
        self.items
            .iter()
            .filter(|i| self.is_edge_layer_id(&i.layer_id))
    }
}
