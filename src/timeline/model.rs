use crate::{
    animation::action::AnimationGroup,
    foundation::core::Seconds,
    foundation::error::{DeckError, DeckResult},
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One step in the authored timeline.
///
/// Actions execute strictly in authoring order. Slide boundaries are
/// markers inserted into this one sequence, never separate timelines.
pub enum TimelineAction {
    /// Play a group of simultaneous animations.
    Play(AnimationGroup),
    /// Hold the current frame.
    Wait(Seconds),
    /// Slide boundary marker; index into the deck's boundary table.
    Boundary(usize),
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Ordered sequence of timeline actions produced by one authoring pass.
pub struct Timeline {
    /// Actions in authoring order.
    pub actions: Vec<TimelineAction>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Modifiers attached to a slide boundary at `advance` time.
///
/// A boundary's options apply to the segment it opens: `advance` is
/// called first, then the segment's content is composed.
pub struct BoundaryOptions {
    /// Replay the segment until an external advance signal arrives
    /// (interactive playback only).
    #[serde(rename = "loop")]
    pub loop_: bool,
    /// Advance automatically once the segment's animations finish
    /// (non-interactive export only).
    pub auto_next: bool,
    /// Scales segment animation durations; finite and > 0.
    pub playback_rate: f64,
    /// Presenter notes; never rendered into the visual output.
    pub notes: String,
}

impl Default for BoundaryOptions {
    fn default() -> Self {
        Self {
            loop_: false,
            auto_next: false,
            playback_rate: 1.0,
            notes: String::new(),
        }
    }
}

impl BoundaryOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the opened segment as looping.
    pub fn looped(mut self) -> Self {
        self.loop_ = true;
        self
    }

    /// Mark the opened segment as self-advancing in exports.
    pub fn auto_next(mut self) -> Self {
        self.auto_next = true;
        self
    }

    /// Set the segment playback rate.
    pub fn playback_rate(mut self, rate: f64) -> Self {
        self.playback_rate = rate;
        self
    }

    /// Attach presenter notes.
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Validate option invariants.
    ///
    /// `loop` and `auto_next` are rejected in combination: looping waits
    /// for an external signal while auto-advance supplies its own.
    pub fn validate(&self) -> DeckResult<()> {
        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            return Err(DeckError::validation(
                "playback_rate must be finite and > 0",
            ));
        }
        if self.loop_ && self.auto_next {
            return Err(DeckError::validation(
                "loop and auto_next are mutually exclusive",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A sealed cut point in the timeline.
///
/// Created once per `advance` call and never mutated afterwards.
pub struct SlideBoundary {
    /// Modifiers for the segment this boundary opens.
    pub options: BoundaryOptions,
    /// Position of the marker in [`Timeline::actions`].
    pub action_index: usize,
}
