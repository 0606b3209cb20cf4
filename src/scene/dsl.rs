//! Builder and arrangement helpers for composing scene content.
//!
//! The scene coordinate system is origin-centered with the y axis pointing
//! up, so `to_edge(.., Edge::Up, ..)` moves content toward the top of the
//! stage.

use crate::{
    foundation::core::{Point, Stage, Vec2},
    foundation::error::{DeckError, DeckResult},
    scene::visual::{
        ColorRgba8, GroupNode, ShapeKind, ShapeNode, ShapeStyle, TextNode, TextStyle, Visual,
    },
};

/// Builder for [`Visual::Text`] nodes.
pub struct TextBuilder {
    text: String,
    style: TextStyle,
    position: Point,
}

impl TextBuilder {
    /// Start a text node with default styling at the origin.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            position: Point::ORIGIN,
        }
    }

    /// Line height in scene units.
    pub fn size(mut self, size: f64) -> Self {
        self.style.size = size;
        self
    }

    /// Text color.
    pub fn color(mut self, color: ColorRgba8) -> Self {
        self.style.color_rgba8 = color;
        self
    }

    /// Bold weight.
    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    /// Line spacing multiplier.
    pub fn line_spacing(mut self, spacing: f64) -> Self {
        self.style.line_spacing = spacing;
        self
    }

    /// Font family name.
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.style.font = Some(font.into());
        self
    }

    /// Center position.
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Validate and build the node.
    pub fn build(self) -> DeckResult<Visual> {
        if self.text.trim().is_empty() {
            return Err(DeckError::validation("text must be non-empty"));
        }
        if !self.style.size.is_finite() || self.style.size <= 0.0 {
            return Err(DeckError::validation("text size must be finite and > 0"));
        }
        if !self.style.line_spacing.is_finite() || self.style.line_spacing <= 0.0 {
            return Err(DeckError::validation(
                "text line_spacing must be finite and > 0",
            ));
        }
        Ok(Visual::Text(TextNode {
            text: self.text,
            style: self.style,
            position: self.position,
        }))
    }
}

/// Builder for [`Visual::Shape`] nodes.
pub struct ShapeBuilder {
    kind: ShapeKind,
    style: ShapeStyle,
    position: Point,
}

impl ShapeBuilder {
    /// Rounded rectangle of the given size.
    pub fn rounded_rect(width: f64, height: f64) -> Self {
        Self {
            kind: ShapeKind::RoundedRect {
                width,
                height,
                corner_radius: 0.1,
            },
            style: ShapeStyle::default(),
            position: Point::ORIGIN,
        }
    }

    /// Filled circle of the given radius.
    pub fn dot(radius: f64) -> Self {
        Self {
            kind: ShapeKind::Dot { radius },
            style: ShapeStyle {
                fill_opacity: 1.0,
                ..ShapeStyle::default()
            },
            position: Point::ORIGIN,
        }
    }

    /// Arrow from the node position along `delta`.
    pub fn arrow(delta: Vec2) -> Self {
        Self {
            kind: ShapeKind::Arrow { delta },
            style: ShapeStyle::default(),
            position: Point::ORIGIN,
        }
    }

    /// Corner radius (rounded rectangles only; ignored otherwise).
    pub fn corner_radius(mut self, radius: f64) -> Self {
        if let ShapeKind::RoundedRect { corner_radius, .. } = &mut self.kind {
            *corner_radius = radius;
        }
        self
    }

    /// Stroke color.
    pub fn color(mut self, color: ColorRgba8) -> Self {
        self.style.color_rgba8 = color;
        self
    }

    /// Fill opacity in `[0, 1]`.
    pub fn fill_opacity(mut self, opacity: f64) -> Self {
        self.style.fill_opacity = opacity;
        self
    }

    /// Stroke width in scene units.
    pub fn stroke_width(mut self, width: f64) -> Self {
        self.style.stroke_width = width;
        self
    }

    /// Center position.
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Validate and build the node.
    pub fn build(self) -> DeckResult<Visual> {
        match self.kind {
            ShapeKind::RoundedRect {
                width,
                height,
                corner_radius,
            } => {
                if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
                    return Err(DeckError::validation(
                        "rect width/height must be finite and > 0",
                    ));
                }
                if !corner_radius.is_finite() || corner_radius < 0.0 {
                    return Err(DeckError::validation(
                        "rect corner_radius must be finite and >= 0",
                    ));
                }
            }
            ShapeKind::Dot { radius } => {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(DeckError::validation("dot radius must be finite and > 0"));
                }
            }
            ShapeKind::Arrow { delta } => {
                if !delta.x.is_finite() || !delta.y.is_finite() || delta.hypot() == 0.0 {
                    return Err(DeckError::validation(
                        "arrow delta must be finite and non-zero",
                    ));
                }
            }
        }
        if !self.style.fill_opacity.is_finite()
            || !(0.0..=1.0).contains(&self.style.fill_opacity)
        {
            return Err(DeckError::validation("fill_opacity must be in [0, 1]"));
        }
        Ok(Visual::Shape(ShapeNode {
            kind: self.kind,
            style: self.style,
            position: self.position,
        }))
    }
}

/// Group visuals under a shared origin; child positions become group-local.
pub fn group(children: Vec<Visual>) -> Visual {
    Visual::Group(GroupNode {
        children,
        position: Point::ORIGIN,
    })
}

/// Rounded rectangle around another node's bounding box, grown by `buff`.
pub fn surrounding_rect(target: &Visual, buff: f64, color: ColorRgba8) -> DeckResult<Visual> {
    let b = target.bounding_box();
    ShapeBuilder::rounded_rect(b.width() + 2.0 * buff, b.height() + 2.0 * buff)
        .color(color)
        .at(b.center())
        .build()
}

/// Cross-axis alignment for arrangement helpers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AlignEdge {
    /// Align leading edges (top for rows, left for columns).
    Start,
    /// Center on the cross axis.
    #[default]
    Center,
    /// Align trailing edges (bottom for rows, right for columns).
    End,
}

/// Stage edges for [`to_edge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Top edge.
    Up,
    /// Bottom edge.
    Down,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
}

/// Stage corners for [`to_corner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    /// Top-left corner.
    UpLeft,
    /// Top-right corner.
    UpRight,
    /// Bottom-left corner.
    DownLeft,
    /// Bottom-right corner.
    DownRight,
}

/// Lay out items left to right with `gap` between boxes, centered on the
/// origin along the main axis.
pub fn arrange_row(items: &mut [Visual], gap: f64, align: AlignEdge) {
    if items.is_empty() {
        return;
    }
    let boxes: Vec<_> = items.iter().map(|v| v.bounding_box()).collect();
    let total: f64 =
        boxes.iter().map(|b| b.width()).sum::<f64>() + gap * (items.len() - 1) as f64;
    let max_h = boxes.iter().map(|b| b.height()).fold(0.0, f64::max);

    let mut cursor = -total / 2.0;
    for (item, b) in items.iter_mut().zip(&boxes) {
        let dx = cursor - b.x0;
        let dy = match align {
            AlignEdge::Start => max_h / 2.0 - b.y1,
            AlignEdge::Center => -b.center().y,
            AlignEdge::End => -max_h / 2.0 - b.y0,
        };
        item.translate(Vec2::new(dx, dy));
        cursor += b.width() + gap;
    }
}

/// Lay out items top to bottom with `gap` between boxes, centered on the
/// origin along the main axis.
pub fn arrange_column(items: &mut [Visual], gap: f64, align: AlignEdge) {
    if items.is_empty() {
        return;
    }
    let boxes: Vec<_> = items.iter().map(|v| v.bounding_box()).collect();
    let total: f64 =
        boxes.iter().map(|b| b.height()).sum::<f64>() + gap * (items.len() - 1) as f64;
    let max_w = boxes.iter().map(|b| b.width()).fold(0.0, f64::max);

    let mut cursor = total / 2.0;
    for (item, b) in items.iter_mut().zip(&boxes) {
        let dy = cursor - b.y1;
        let dx = match align {
            AlignEdge::Start => -max_w / 2.0 - b.x0,
            AlignEdge::Center => -b.center().x,
            AlignEdge::End => max_w / 2.0 - b.x1,
        };
        item.translate(Vec2::new(dx, dy));
        cursor -= b.height() + gap;
    }
}

/// Push a node against a stage edge, `buff` units in.
pub fn to_edge(item: &mut Visual, stage: Stage, edge: Edge, buff: f64) {
    let b = item.bounding_box();
    let s = stage.bounds();
    let delta = match edge {
        Edge::Up => Vec2::new(0.0, s.y1 - buff - b.y1),
        Edge::Down => Vec2::new(0.0, s.y0 + buff - b.y0),
        Edge::Left => Vec2::new(s.x0 + buff - b.x0, 0.0),
        Edge::Right => Vec2::new(s.x1 - buff - b.x1, 0.0),
    };
    item.translate(delta);
}

/// Push a node into a stage corner, `buff` units in on both axes.
pub fn to_corner(item: &mut Visual, stage: Stage, corner: Corner, buff: f64) {
    let (h, v) = match corner {
        Corner::UpLeft => (Edge::Left, Edge::Up),
        Corner::UpRight => (Edge::Right, Edge::Up),
        Corner::DownLeft => (Edge::Left, Edge::Down),
        Corner::DownRight => (Edge::Right, Edge::Down),
    };
    to_edge(item, stage, h, buff);
    to_edge(item, stage, v, buff);
}
