use crate::{
    animation::action::{Animation, AnimationGroup, AnimationKind},
    animation::ease::Ease,
    foundation::core::{Seconds, Stage, Vec2, VisualId},
    foundation::error::{DeckError, DeckResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Content-replacement transition family.
///
/// All modes share the same canvas-preserving contract; they differ only
/// in the visual effect applied to outgoing and incoming content.
pub enum TransitionMode {
    /// Crossfade outgoing into incoming content.
    Fade,
    /// Directional wipe; `direction` is the travel of outgoing content.
    Wipe {
        /// Travel direction; need not be normalized.
        direction: Vec2,
    },
    /// Incoming content grows from zero scale while outgoing fades.
    ZoomIn,
    /// Outgoing content shrinks to `scale` while fading.
    ZoomOut {
        /// Final scale multiplier for outgoing content, `> 0`.
        scale: f64,
    },
}

impl TransitionMode {
    /// Validate mode parameters.
    pub fn validate(&self) -> DeckResult<()> {
        match self {
            Self::Fade | Self::ZoomIn => Ok(()),
            Self::Wipe { direction } => {
                if !direction.x.is_finite() || !direction.y.is_finite() || direction.hypot() == 0.0
                {
                    return Err(DeckError::validation(
                        "wipe direction must be finite and non-zero",
                    ));
                }
                Ok(())
            }
            Self::ZoomOut { scale } => {
                if !scale.is_finite() || *scale <= 0.0 {
                    return Err(DeckError::validation(
                        "zoom_out scale must be finite and > 0",
                    ));
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A fully resolved transition: mode plus timing.
pub struct Transition {
    /// Visual effect family.
    pub mode: TransitionMode,
    /// Transition duration.
    pub run_time: Seconds,
    /// Easing applied to progress.
    pub ease: Ease,
}

impl Transition {
    /// Transition with the default ease.
    pub fn new(mode: TransitionMode, run_time: Seconds) -> Self {
        Self {
            mode,
            run_time,
            ease: Ease::default(),
        }
    }

    /// Override the easing curve.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Resolve a raw spec into a transition.
    pub fn from_spec(spec: &TransitionSpec) -> DeckResult<Self> {
        let mode = parse_transition(spec)?;
        Ok(Self {
            mode,
            run_time: Seconds::new(spec.run_time_secs)?,
            ease: spec.ease,
        })
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Raw transition payload for data-driven decks.
pub struct TransitionSpec {
    /// Transition kind identifier.
    pub kind: String,
    /// Transition duration in seconds.
    pub run_time_secs: f64,
    /// Easing applied to transition progress.
    pub ease: Ease,
    /// Transition parameter object.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

/// Parse a raw spec into a typed [`TransitionMode`].
pub fn parse_transition(spec: &TransitionSpec) -> DeckResult<TransitionMode> {
    let kind = spec.kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(DeckError::validation("transition kind must be non-empty"));
    }
    if !spec.run_time_secs.is_finite() || spec.run_time_secs <= 0.0 {
        return Err(DeckError::validation(
            "transition run_time_secs must be finite and > 0",
        ));
    }

    let params = if spec.params.is_null() {
        None
    } else {
        Some(
            spec.params
                .as_object()
                .ok_or_else(|| DeckError::validation("transition params must be an object"))?,
        )
    };

    let mode = match kind.as_str() {
        "fade" | "crossfade" => TransitionMode::Fade,
        "wipe" => {
            let direction = match params.and_then(|p| p.get("dir")) {
                None => Vec2::new(1.0, 0.0),
                Some(v) => parse_direction(v)?,
            };
            TransitionMode::Wipe { direction }
        }
        "zoom_in" | "zoomin" => TransitionMode::ZoomIn,
        "zoom_out" | "zoomout" => {
            let scale = match params.and_then(|p| p.get("scale")).and_then(|v| v.as_f64()) {
                None => 0.5,
                Some(v) => v,
            };
            TransitionMode::ZoomOut { scale }
        }
        _ => {
            return Err(DeckError::validation(format!(
                "unknown transition kind '{kind}'"
            )));
        }
    };
    mode.validate()?;
    Ok(mode)
}

fn parse_direction(v: &serde_json::Value) -> DeckResult<Vec2> {
    if let Some(s) = v.as_str() {
        return match s.trim().to_ascii_lowercase().as_str() {
            "left_to_right" | "lefttoright" | "ltr" => Ok(Vec2::new(1.0, 0.0)),
            "right_to_left" | "righttoleft" | "rtl" => Ok(Vec2::new(-1.0, 0.0)),
            "top_to_bottom" | "toptobottom" | "ttb" => Ok(Vec2::new(0.0, -1.0)),
            "bottom_to_top" | "bottomtotop" | "btt" => Ok(Vec2::new(0.0, 1.0)),
            other => Err(DeckError::validation(format!("unknown wipe.dir '{other}'"))),
        };
    }
    if let Some(arr) = v.as_array()
        && arr.len() == 2
        && let (Some(x), Some(y)) = (arr[0].as_f64(), arr[1].as_f64())
    {
        return Ok(Vec2::new(x, y));
    }
    Err(DeckError::validation(
        "wipe.dir must be a direction alias or a [x, y] array",
    ))
}

/// Build the replacement animation for one content swap.
///
/// `old` is removed, `new` is introduced, all simultaneously. The caller
/// supplies canvas-free selections; this function never filters.
pub fn build_replacement(
    old: &[VisualId],
    new: &[VisualId],
    mode: &TransitionMode,
    run_time: Seconds,
    ease: Ease,
    stage: Stage,
) -> DeckResult<AnimationGroup> {
    mode.validate()?;
    let mut group = AnimationGroup::new();
    if old.is_empty() && new.is_empty() {
        return Ok(group);
    }
    if !run_time.0.is_finite() || run_time.0 <= 0.0 {
        return Err(DeckError::validation(
            "replacement run_time must be finite and > 0",
        ));
    }

    let anim = |target: VisualId, kind: AnimationKind| Animation {
        target,
        kind,
        run_time,
        ease,
    };

    match mode {
        TransitionMode::Fade => {
            for &id in old {
                group.push(anim(id, AnimationKind::FadeOut));
            }
            for &id in new {
                group.push(anim(id, AnimationKind::FadeIn));
            }
        }
        TransitionMode::Wipe { direction } => {
            // Offstage travel scaled to the stage box per axis.
            let unit = *direction / direction.hypot();
            let offset = Vec2::new(unit.x * stage.width, unit.y * stage.height);
            for &id in old {
                group.push(anim(id, AnimationKind::SlideOutTo { offset }));
                group.push(anim(id, AnimationKind::FadeOut));
            }
            for &id in new {
                group.push(anim(id, AnimationKind::SlideInFrom { offset: -offset }));
                group.push(anim(id, AnimationKind::FadeIn));
            }
        }
        TransitionMode::ZoomIn => {
            for &id in old {
                group.push(anim(id, AnimationKind::FadeOut));
            }
            for &id in new {
                group.push(anim(id, AnimationKind::ScaleFrom { factor: 0.0 }));
                group.push(anim(id, AnimationKind::FadeIn));
            }
        }
        TransitionMode::ZoomOut { scale } => {
            for &id in old {
                group.push(anim(id, AnimationKind::ScaleTo { factor: *scale }));
                group.push(anim(id, AnimationKind::FadeOut));
            }
            for &id in new {
                group.push(anim(id, AnimationKind::FadeIn));
            }
        }
    }

    group.validate()?;
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: &str, params: serde_json::Value) -> TransitionSpec {
        TransitionSpec {
            kind: kind.to_string(),
            run_time_secs: 0.6,
            ease: Ease::Linear,
            params,
        }
    }

    #[test]
    fn wipe_dir_parses_aliases_and_vectors() {
        assert_eq!(
            parse_transition(&spec("wipe", serde_json::json!({ "dir": "ttb" }))).unwrap(),
            TransitionMode::Wipe {
                direction: Vec2::new(0.0, -1.0)
            }
        );
        assert_eq!(
            parse_transition(&spec("wipe", serde_json::json!({ "dir": [0.5, 0.5] }))).unwrap(),
            TransitionMode::Wipe {
                direction: Vec2::new(0.5, 0.5)
            }
        );
        assert!(
            parse_transition(&spec("wipe", serde_json::json!({ "dir": "diagonal" }))).is_err()
        );
    }

    #[test]
    fn zoom_out_scale_defaults_and_validates() {
        assert_eq!(
            parse_transition(&spec("zoom_out", serde_json::Value::Null)).unwrap(),
            TransitionMode::ZoomOut { scale: 0.5 }
        );
        assert!(
            parse_transition(&spec("zoom_out", serde_json::json!({ "scale": 0.0 }))).is_err()
        );
    }

    #[test]
    fn from_spec_resolves_mode_and_timing() {
        let t = Transition::from_spec(&spec("fade", serde_json::Value::Null)).unwrap();
        assert_eq!(t.mode, TransitionMode::Fade);
        assert_eq!(t.run_time, Seconds::new(0.6).unwrap());
        assert_eq!(t.ease, Ease::Linear);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(parse_transition(&spec("dissolve", serde_json::Value::Null)).is_err());
    }

    #[test]
    fn replacement_covers_every_id_exactly_once_per_role() {
        let old = [VisualId(1), VisualId(2)];
        let new = [VisualId(3)];
        let g = build_replacement(
            &old,
            &new,
            &TransitionMode::Wipe {
                direction: Vec2::new(1.0, 0.0),
            },
            Seconds::new(0.5).unwrap(),
            Ease::Linear,
            Stage::WIDESCREEN,
        )
        .unwrap();

        let fade_outs: Vec<_> = g
            .animations
            .iter()
            .filter(|a| matches!(a.kind, AnimationKind::FadeOut))
            .map(|a| a.target)
            .collect();
        let fade_ins: Vec<_> = g
            .animations
            .iter()
            .filter(|a| matches!(a.kind, AnimationKind::FadeIn))
            .map(|a| a.target)
            .collect();
        assert_eq!(fade_outs, old);
        assert_eq!(fade_ins, new);
    }

    #[test]
    fn empty_swap_yields_empty_group() {
        let g = build_replacement(
            &[],
            &[],
            &TransitionMode::Fade,
            Seconds::ZERO,
            Ease::Linear,
            Stage::WIDESCREEN,
        )
        .unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn clearing_to_empty_content_is_valid() {
        let g = build_replacement(
            &[VisualId(4)],
            &[],
            &TransitionMode::Fade,
            Seconds::new(0.3).unwrap(),
            Ease::Linear,
            Stage::WIDESCREEN,
        )
        .unwrap();
        assert_eq!(g.animations.len(), 1);
    }
}
