use crate::{
    animation::ease::Ease,
    foundation::core::{Point, Seconds, Vec2, VisualId},
    foundation::error::{DeckError, DeckResult},
    scene::visual::Visual,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Animation primitive scheduled on the timeline.
///
/// The sequencer records these; the external rendering engine interprets
/// them. Kinds that introduce or retire content (`Create`, `FadeIn`,
/// `FadeOut`) also drive the deck's active-content bookkeeping.
pub enum AnimationKind {
    /// Draw the target progressively (stroke reveal).
    Create,
    /// Fade the target in; the target becomes visible content.
    FadeIn,
    /// Fade the target out; the target leaves visible content.
    FadeOut,
    /// Morph the target into a new appearance, keeping its identity.
    Morph {
        /// Appearance at the end of the morph.
        into: Box<Visual>,
    },
    /// Move the target anchor to an absolute position.
    MoveTo {
        /// Destination anchor.
        to: Point,
    },
    /// Enter displaced by `offset` and settle at the authored position.
    SlideInFrom {
        /// Initial displacement.
        offset: Vec2,
    },
    /// Exit by sliding away from the authored position by `offset`.
    SlideOutTo {
        /// Final displacement.
        offset: Vec2,
    },
    /// Enter scaled by `factor` and settle at scale 1.
    ScaleFrom {
        /// Initial scale multiplier, `>= 0`.
        factor: f64,
    },
    /// Animate from scale 1 to `factor`.
    ScaleTo {
        /// Final scale multiplier, `> 0`.
        factor: f64,
    },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One animation applied to one visual node.
pub struct Animation {
    /// Target node handle.
    pub target: VisualId,
    /// What the animation does.
    pub kind: AnimationKind,
    /// Duration; must be finite and > 0.
    pub run_time: Seconds,
    /// Easing applied to progress.
    pub ease: Ease,
}

impl Animation {
    /// Build an animation with the default ease.
    pub fn new(target: VisualId, kind: AnimationKind, run_time: Seconds) -> Self {
        Self {
            target,
            kind,
            run_time,
            ease: Ease::default(),
        }
    }

    /// Override the easing curve.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Validate payload invariants.
    pub fn validate(&self) -> DeckResult<()> {
        if !self.run_time.0.is_finite() || self.run_time.0 <= 0.0 {
            return Err(DeckError::animation("run_time must be finite and > 0"));
        }
        match &self.kind {
            AnimationKind::ScaleFrom { factor } => {
                if !factor.is_finite() || *factor < 0.0 {
                    return Err(DeckError::animation(
                        "ScaleFrom factor must be finite and >= 0",
                    ));
                }
            }
            AnimationKind::ScaleTo { factor } => {
                if !factor.is_finite() || *factor <= 0.0 {
                    return Err(DeckError::animation(
                        "ScaleTo factor must be finite and > 0",
                    ));
                }
            }
            AnimationKind::MoveTo { to } => {
                if !to.x.is_finite() || !to.y.is_finite() {
                    return Err(DeckError::animation("MoveTo destination must be finite"));
                }
            }
            AnimationKind::SlideInFrom { offset } | AnimationKind::SlideOutTo { offset } => {
                if !offset.x.is_finite() || !offset.y.is_finite() {
                    return Err(DeckError::animation("slide offset must be finite"));
                }
            }
            AnimationKind::Create | AnimationKind::FadeIn | AnimationKind::FadeOut => {}
            AnimationKind::Morph { .. } => {}
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Animations played simultaneously.
///
/// This is the composable handle returned by the deferred form of content
/// replacement: callers may merge groups and schedule the result once.
pub struct AnimationGroup {
    /// Member animations; all start together.
    pub animations: Vec<Animation>,
}

impl AnimationGroup {
    /// Empty group (a no-op when played).
    pub fn new() -> Self {
        Self::default()
    }

    /// Group with a single member.
    pub fn single(animation: Animation) -> Self {
        Self {
            animations: vec![animation],
        }
    }

    /// Add a member animation.
    pub fn push(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    /// Chainable [`AnimationGroup::push`].
    pub fn with(mut self, animation: Animation) -> Self {
        self.push(animation);
        self
    }

    /// Merge another group into this one, keeping simultaneity.
    pub fn merge(mut self, other: AnimationGroup) -> Self {
        self.animations.extend(other.animations);
        self
    }

    /// Wall-clock duration of the group: the longest member run time.
    pub fn run_time(&self) -> Seconds {
        self.animations
            .iter()
            .fold(Seconds::ZERO, |acc, a| acc.max(a.run_time))
    }

    /// True when the group has no members.
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Validate every member.
    pub fn validate(&self) -> DeckResult<()> {
        for a in &self.animations {
            a.validate()?;
        }
        Ok(())
    }
}
