#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Easing curve applied to animation progress.
///
/// [`Ease::Smooth`] is the default: slide content starts and settles at
/// rest, which reads well for swaps and counter morphs.
pub enum Ease {
    /// Identity.
    Linear,
    /// Smoothstep; zero velocity at both ends.
    #[default]
    Smooth,
    /// Quadratic ease-in, for content leaving the stage.
    InQuad,
    /// Quadratic ease-out, for content entering the stage.
    OutQuad,
    /// Cubic ease-in; a sharper exit.
    InCubic,
    /// Cubic ease-out; a softer landing.
    OutCubic,
}

impl Ease {
    /// Map raw progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smooth => t * t * (3.0 - 2.0 * t),
            Self::InQuad => t * t,
            Self::OutQuad => t * (2.0 - t),
            Self::InCubic => t * t * t,
            Self::OutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
        }
    }
}
