use crate::foundation::core::{Point, Rect, Vec2};

/// Straight-alpha RGBA8 color.
pub type ColorRgba8 = [u8; 4];

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A visual node owned by the authoring context.
///
/// Every variant carries the same three capabilities the sequencer relies
/// on: a position, a bounding box, and animate-to (animations target a
/// node through its [`crate::VisualId`], see [`crate::Animation`]).
///
/// Geometry here is a coarse authoring-space model used for arrangement
/// and transition bookkeeping; text shaping and actual rasterization
/// happen in the external rendering engine.
pub enum Visual {
    /// Text node.
    Text(TextNode),
    /// Primitive shape node.
    Shape(ShapeNode),
    /// Group of child nodes positioned relative to the group origin.
    Group(GroupNode),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Text content with styling, anchored at its center.
pub struct TextNode {
    /// UTF-8 text content; may contain newlines.
    pub text: String,
    /// Text styling.
    pub style: TextStyle,
    /// Center position in scene units.
    pub position: Point,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Text styling subset understood by the rendering engine.
pub struct TextStyle {
    /// Line height in scene units.
    pub size: f64,
    /// Text color.
    pub color_rgba8: ColorRgba8,
    /// Bold weight.
    pub bold: bool,
    /// Multiplier applied to `size` between lines.
    pub line_spacing: f64,
    /// Optional font family name; engine default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 0.5,
            color_rgba8: [255, 255, 255, 255],
            bold: false,
            line_spacing: 1.0,
            font: None,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Primitive shape with styling, anchored at its center.
pub struct ShapeNode {
    /// Shape geometry.
    pub kind: ShapeKind,
    /// Shape styling.
    pub style: ShapeStyle,
    /// Center position in scene units.
    pub position: Point,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Shape geometry variants.
pub enum ShapeKind {
    /// Axis-aligned rounded rectangle.
    RoundedRect {
        /// Width in scene units.
        width: f64,
        /// Height in scene units.
        height: f64,
        /// Corner radius in scene units.
        corner_radius: f64,
    },
    /// Filled circle.
    Dot {
        /// Radius in scene units.
        radius: f64,
    },
    /// Arrow from the node position along a delta vector.
    Arrow {
        /// Offset from position to the arrow tip.
        delta: Vec2,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Stroke and fill styling for shapes.
pub struct ShapeStyle {
    /// Stroke color.
    pub color_rgba8: ColorRgba8,
    /// Fill opacity in `[0, 1]`; 0 means stroke-only.
    pub fill_opacity: f64,
    /// Stroke width in scene units.
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color_rgba8: [255, 255, 255, 255],
            fill_opacity: 0.0,
            stroke_width: 0.04,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Children positioned relative to the group origin.
pub struct GroupNode {
    /// Child nodes; their positions are group-local.
    pub children: Vec<Visual>,
    /// Group origin in scene units.
    pub position: Point,
}

impl Visual {
    /// Node anchor position in scene units.
    pub fn position(&self) -> Point {
        match self {
            Self::Text(n) => n.position,
            Self::Shape(n) => n.position,
            Self::Group(n) => n.position,
        }
    }

    /// Move the node anchor (for groups, the whole subtree moves).
    pub fn set_position(&mut self, position: Point) {
        match self {
            Self::Text(n) => n.position = position,
            Self::Shape(n) => n.position = position,
            Self::Group(n) => n.position = position,
        }
    }

    /// Shift the node by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        let p = self.position();
        self.set_position(p + delta);
    }

    /// Set only the horizontal anchor coordinate.
    pub fn set_x(&mut self, x: f64) {
        let p = self.position();
        self.set_position(Point::new(x, p.y));
    }

    /// Authoring-space bounding box.
    ///
    /// Text metrics are a coarse per-glyph estimate; real shaping happens
    /// in the rendering engine. Groups return the union of child boxes
    /// offset by the group origin.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Text(n) => {
                let lines: Vec<&str> = n.text.split('\n').collect();
                let max_chars = lines
                    .iter()
                    .map(|l| l.chars().count())
                    .max()
                    .unwrap_or(0);
                let width = (max_chars as f64) * n.style.size * 0.55;
                let height = (lines.len() as f64) * n.style.size * n.style.line_spacing;
                centered_rect(n.position, width, height)
            }
            Self::Shape(n) => match n.kind {
                ShapeKind::RoundedRect { width, height, .. } => {
                    centered_rect(n.position, width, height)
                }
                ShapeKind::Dot { radius } => centered_rect(n.position, radius * 2.0, radius * 2.0),
                ShapeKind::Arrow { delta } => {
                    let tip = n.position + delta;
                    Rect::new(
                        n.position.x.min(tip.x),
                        n.position.y.min(tip.y),
                        n.position.x.max(tip.x),
                        n.position.y.max(tip.y),
                    )
                }
            },
            Self::Group(n) => {
                let offset = n.position.to_vec2();
                let mut boxes = n.children.iter().map(|c| {
                    let b = c.bounding_box();
                    Rect::new(b.x0 + offset.x, b.y0 + offset.y, b.x1 + offset.x, b.y1 + offset.y)
                });
                match boxes.next() {
                    None => Rect::new(n.position.x, n.position.y, n.position.x, n.position.y),
                    Some(first) => boxes.fold(first, |acc, b| acc.union(b)),
                }
            }
        }
    }
}

fn centered_rect(center: Point, width: f64, height: f64) -> Rect {
    Rect::new(
        center.x - width / 2.0,
        center.y - height / 2.0,
        center.x + width / 2.0,
        center.y + height / 2.0,
    )
}
