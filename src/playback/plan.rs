use crate::{
    foundation::error::DeckResult,
    sequencer::deck::Deck,
    timeline::model::{BoundaryOptions, TimelineAction},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How a compiled plan will be consumed.
pub enum PlaybackIntent {
    /// Keyboard-advanced presentation: honors `loop` and presenter notes,
    /// ignores `auto_next`.
    Interactive,
    /// Non-interactive export (HTML/video): honors `auto_next` and
    /// `playback_rate`, ignores `loop`.
    Export,
}

#[derive(Clone, Debug, serde::Serialize)]
/// One span of timeline actions between consecutive slide boundaries.
pub struct Segment {
    /// Zero-based slide position.
    pub index: usize,
    /// First timeline action of the span (inclusive).
    pub first_action: usize,
    /// End of the span (exclusive).
    pub end_action: usize,
    /// Modifiers attached by the boundary that opened this segment;
    /// defaults for the span before the first boundary.
    pub options: BoundaryOptions,
    /// Sum of play and wait durations, unscaled.
    pub duration_secs: f64,
    /// Duration after applying the segment playback rate.
    pub scaled_duration_secs: f64,
}

impl Segment {
    /// Number of timeline actions in the span.
    pub fn action_count(&self) -> usize {
        self.end_action - self.first_action
    }

    /// Whether playback replays this segment until an external advance
    /// signal arrives. Recording only; the wait itself lives in the
    /// presentation runtime.
    pub fn loops(&self, intent: PlaybackIntent) -> bool {
        intent == PlaybackIntent::Interactive && self.options.loop_
    }

    /// Whether playback moves on by itself once the segment's animations
    /// finish.
    pub fn advances_automatically(&self, intent: PlaybackIntent) -> bool {
        intent == PlaybackIntent::Export && self.options.auto_next
    }

    /// Presenter notes, when any are attached and the intent surfaces
    /// them.
    pub fn presenter_notes(&self, intent: PlaybackIntent) -> Option<&str> {
        if intent == PlaybackIntent::Interactive && !self.options.notes.is_empty() {
            Some(&self.options.notes)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, serde::Serialize)]
/// Timeline cut into boundary-delimited segments, ready for a playback or
/// export consumer.
pub struct PlaybackPlan {
    /// Segments in presentation order.
    pub segments: Vec<Segment>,
}

impl PlaybackPlan {
    /// Cut a deck's timeline at its boundary markers.
    ///
    /// Empty leading and trailing spans are dropped: a deck that opens or
    /// closes with a bare `advance` produces no blank slide.
    #[tracing::instrument(skip(deck), fields(actions = deck.timeline.actions.len()))]
    pub fn compile(deck: &Deck) -> DeckResult<Self> {
        deck.validate()?;

        // (span start, options) for each segment, in order.
        let mut spans: Vec<(usize, usize, BoundaryOptions)> = Vec::new();
        let mut span_start = 0usize;
        let mut options = BoundaryOptions::default();
        for (i, action) in deck.timeline.actions.iter().enumerate() {
            if let TimelineAction::Boundary(idx) = action {
                spans.push((span_start, i, options));
                options = deck.boundaries[*idx].options.clone();
                span_start = i + 1;
            }
        }
        spans.push((span_start, deck.timeline.actions.len(), options));

        while spans.first().is_some_and(|(s, e, _)| s == e) {
            spans.remove(0);
        }
        while spans.last().is_some_and(|(s, e, _)| s == e) {
            spans.pop();
        }

        let segments = spans
            .into_iter()
            .enumerate()
            .map(|(index, (first_action, end_action, options))| {
                let duration_secs: f64 = deck.timeline.actions[first_action..end_action]
                    .iter()
                    .map(|a| match a {
                        TimelineAction::Play(group) => group.run_time().0,
                        TimelineAction::Wait(secs) => secs.0,
                        TimelineAction::Boundary(_) => 0.0,
                    })
                    .sum();
                let scaled_duration_secs = duration_secs / options.playback_rate;
                Segment {
                    index,
                    first_action,
                    end_action,
                    options,
                    duration_secs,
                    scaled_duration_secs,
                }
            })
            .collect();

        Ok(Self { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::action::{Animation, AnimationKind},
        foundation::core::Seconds,
        scene::dsl::TextBuilder,
        sequencer::deck::SlideDeck,
    };

    fn secs(v: f64) -> Seconds {
        Seconds::new(v).unwrap()
    }

    fn deck_with(opts: Vec<BoundaryOptions>) -> Deck {
        let mut deck = SlideDeck::new();
        for (i, o) in opts.into_iter().enumerate() {
            deck.advance(o).unwrap();
            let id = deck.insert(TextBuilder::new(format!("slide {i}")).build().unwrap());
            deck.play_one(Animation::new(id, AnimationKind::FadeIn, secs(0.5)))
                .unwrap();
            deck.wait(secs(0.5));
        }
        deck.build().unwrap()
    }

    #[test]
    fn loop_applies_to_the_opened_segment_only() {
        let deck = deck_with(vec![
            BoundaryOptions::new().looped(),
            BoundaryOptions::new(),
        ]);
        let plan = PlaybackPlan::compile(&deck).unwrap();
        assert_eq!(plan.segments.len(), 2);
        assert!(plan.segments[0].loops(PlaybackIntent::Interactive));
        assert!(!plan.segments[0].loops(PlaybackIntent::Export));
        assert!(!plan.segments[1].loops(PlaybackIntent::Interactive));
    }

    #[test]
    fn auto_next_only_matters_for_export() {
        let deck = deck_with(vec![BoundaryOptions::new().auto_next()]);
        let plan = PlaybackPlan::compile(&deck).unwrap();
        let seg = &plan.segments[0];
        assert!(seg.advances_automatically(PlaybackIntent::Export));
        assert!(!seg.advances_automatically(PlaybackIntent::Interactive));
    }

    #[test]
    fn playback_rate_scales_segment_duration() {
        let deck = deck_with(vec![BoundaryOptions::new().playback_rate(2.0)]);
        let plan = PlaybackPlan::compile(&deck).unwrap();
        let seg = &plan.segments[0];
        assert_eq!(seg.duration_secs, 1.0);
        assert_eq!(seg.scaled_duration_secs, 0.5);
    }

    #[test]
    fn trailing_bare_advance_produces_no_blank_slide() {
        let mut deck = SlideDeck::new();
        let id = deck.insert(TextBuilder::new("only").build().unwrap());
        deck.play_one(Animation::new(id, AnimationKind::FadeIn, secs(0.5)))
            .unwrap();
        deck.advance(BoundaryOptions::new()).unwrap();
        let deck = deck.build().unwrap();

        let plan = PlaybackPlan::compile(&deck).unwrap();
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].action_count(), 1);
    }

    #[test]
    fn notes_surface_in_interactive_playback_only() {
        let deck = deck_with(vec![BoundaryOptions::new().notes("say hello")]);
        let plan = PlaybackPlan::compile(&deck).unwrap();
        let seg = &plan.segments[0];
        assert_eq!(
            seg.presenter_notes(PlaybackIntent::Interactive),
            Some("say hello")
        );
        assert_eq!(seg.presenter_notes(PlaybackIntent::Export), None);
    }

    #[test]
    fn compile_rejects_marker_outside_the_boundary_table() {
        let mut deck = deck_with(vec![BoundaryOptions::new()]);
        // Actions are [Boundary(0), Play, Wait]; corrupt the trailing Wait
        // into a marker with no table entry behind it.
        deck.timeline.actions[2] = TimelineAction::Boundary(7);
        let err = PlaybackPlan::compile(&deck);
        assert!(matches!(
            err,
            Err(crate::foundation::error::DeckError::Validation(_))
        ));
    }

    #[test]
    fn segments_partition_the_non_marker_actions() {
        let deck = deck_with(vec![
            BoundaryOptions::new(),
            BoundaryOptions::new(),
            BoundaryOptions::new(),
        ]);
        let plan = PlaybackPlan::compile(&deck).unwrap();
        let covered: usize = plan.segments.iter().map(Segment::action_count).sum();
        let markers = deck.boundaries.len();
        assert_eq!(covered + markers, deck.timeline.actions.len());
    }
}
