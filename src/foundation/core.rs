use crate::foundation::error::{DeckError, DeckResult};

pub use kurbo::{Point, Rect, Vec2};

/// Stable handle for a visual object owned by the authoring context.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct VisualId(pub u64);

/// A duration in seconds, finite and non-negative.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Seconds(pub f64);

impl Seconds {
    /// Zero-length duration.
    pub const ZERO: Seconds = Seconds(0.0);

    /// Build a validated duration.
    pub fn new(secs: f64) -> DeckResult<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(DeckError::validation("Seconds must be finite and >= 0"));
        }
        Ok(Self(secs))
    }

    /// Largest of two durations.
    pub fn max(self, other: Seconds) -> Seconds {
        if other.0 > self.0 { other } else { self }
    }
}

/// Authoring-space stage dimensions, in scene units.
///
/// Edge and corner alignment helpers position visuals relative to this box,
/// which is centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stage {
    /// Stage width in scene units.
    pub width: f64,
    /// Stage height in scene units.
    pub height: f64,
}

impl Stage {
    /// 16:9 stage used by the built-in templates.
    pub const WIDESCREEN: Stage = Stage {
        width: 16.0,
        height: 9.0,
    };

    /// Build a validated stage.
    pub fn new(width: f64, height: f64) -> DeckResult<Self> {
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(DeckError::validation(
                "Stage width/height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Bounding rectangle of the stage, centered on the origin.
    pub fn bounds(self) -> Rect {
        Rect::new(
            -self.width / 2.0,
            -self.height / 2.0,
            self.width / 2.0,
            self.height / 2.0,
        )
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}
