use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::action::{Animation, AnimationGroup, AnimationKind},
    effects::transitions::{Transition, build_replacement},
    foundation::core::{Seconds, Stage, VisualId},
    foundation::error::{DeckError, DeckResult},
    scene::visual::Visual,
    sequencer::canvas::CanvasRegistry,
    timeline::model::{BoundaryOptions, SlideBoundary, Timeline, TimelineAction},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Lifecycle of the segment currently under construction.
pub enum SegmentState {
    /// The author is issuing animation calls into the open segment.
    Building,
    /// The segment was just sealed by `advance`; no content has been
    /// issued into the next one yet.
    Committed,
}

/// Single-threaded authoring context for one presentation.
///
/// A deck owns the visual arena, the linear timeline, the boundary table,
/// the canvas registry, and the active (non-canvas) content set. All five
/// are mutated by one synchronous authoring pass; nothing here is shared.
///
/// The authoring flow: create visuals, play animations, call
/// [`SlideDeck::advance`] at each slide boundary, and let
/// content-replacement transitions swap everything that is not pinned to
/// the canvas.
pub struct SlideDeck {
    stage: Stage,
    visuals: BTreeMap<VisualId, Visual>,
    next_id: u64,
    timeline: Timeline,
    boundaries: Vec<SlideBoundary>,
    canvas: CanvasRegistry,
    active: BTreeSet<VisualId>,
    state: SegmentState,
}

impl SlideDeck {
    /// New deck on the default widescreen stage.
    pub fn new() -> Self {
        Self::with_stage(Stage::default())
    }

    /// New deck on an explicit stage.
    pub fn with_stage(stage: Stage) -> Self {
        Self {
            stage,
            visuals: BTreeMap::new(),
            next_id: 0,
            timeline: Timeline::default(),
            boundaries: Vec::new(),
            canvas: CanvasRegistry::new(),
            active: BTreeSet::new(),
            state: SegmentState::Building,
        }
    }

    /// Stage this deck is authored against.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current segment lifecycle state.
    pub fn segment_state(&self) -> SegmentState {
        self.state
    }

    /// Add a visual to the arena; it becomes content only once an
    /// introducing animation (`Create`/`FadeIn`) or a replacement names it.
    pub fn insert(&mut self, visual: Visual) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.visuals.insert(id, visual);
        id
    }

    /// Current appearance of a node.
    pub fn visual(&self, id: VisualId) -> DeckResult<&Visual> {
        self.visuals
            .get(&id)
            .ok_or_else(|| DeckError::validation(format!("unknown visual id {id:?}")))
    }

    /// Canvas registry (read-only view).
    pub fn canvas(&self) -> &CanvasRegistry {
        &self.canvas
    }

    /// Active non-canvas content, in stable id order.
    pub fn active_content(&self) -> Vec<VisualId> {
        self.active.iter().copied().collect()
    }

    /// Schedule a group of simultaneous animations.
    ///
    /// Introducing kinds add non-canvas targets to the active set,
    /// `FadeOut` retires them, `Morph` and `MoveTo` update the arena so
    /// later bounding-box queries see the post-animation scene.
    pub fn play(&mut self, group: AnimationGroup) -> DeckResult<()> {
        group.validate()?;
        for anim in &group.animations {
            if !self.visuals.contains_key(&anim.target) {
                return Err(DeckError::animation(format!(
                    "animation targets unknown visual id {:?}",
                    anim.target
                )));
            }
        }
        for anim in &group.animations {
            self.apply_bookkeeping(anim);
        }
        self.timeline.actions.push(TimelineAction::Play(group));
        self.state = SegmentState::Building;
        Ok(())
    }

    /// Schedule a single animation.
    pub fn play_one(&mut self, animation: Animation) -> DeckResult<()> {
        self.play(AnimationGroup::single(animation))
    }

    /// Hold the current frame for `secs`.
    pub fn wait(&mut self, secs: Seconds) {
        self.timeline.actions.push(TimelineAction::Wait(secs));
        self.state = SegmentState::Building;
    }

    /// Insert a slide boundary at the current point in the timeline.
    ///
    /// Seals the open segment and opens the next one; `options` attach to
    /// the opened segment. No animation is played. Invalid options leave
    /// the deck untouched.
    pub fn advance(&mut self, options: BoundaryOptions) -> DeckResult<()> {
        options.validate()?;
        let index = self.boundaries.len();
        self.boundaries.push(SlideBoundary {
            options,
            action_index: self.timeline.actions.len(),
        });
        self.timeline.actions.push(TimelineAction::Boundary(index));
        self.state = SegmentState::Committed;
        Ok(())
    }

    /// Register persistent canvas entries.
    ///
    /// Fails without applying anything when a key is empty, duplicated, or
    /// already registered, or when an id is unknown. Registered objects
    /// leave the active set: they are exempt from wholesale replacement.
    pub fn add_to_canvas<K>(&mut self, entries: impl IntoIterator<Item = (K, VisualId)>) -> DeckResult<()>
    where
        K: Into<String>,
    {
        let entries: Vec<(String, VisualId)> =
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect();

        for (key, id) in &entries {
            if key.trim().is_empty() {
                return Err(DeckError::registry("canvas key must be non-empty"));
            }
            if self.canvas.lookup(key).is_ok()
                || entries.iter().filter(|(k, _)| k == key).count() > 1
            {
                return Err(DeckError::registry(format!("duplicate canvas key '{key}'")));
            }
            if !self.visuals.contains_key(id) {
                return Err(DeckError::validation(format!(
                    "canvas entry '{key}' references unknown visual id {id:?}"
                )));
            }
        }
        for (key, id) in entries {
            self.canvas.insert(key, id)?;
            self.active.remove(&id);
        }
        Ok(())
    }

    /// Deregister canvas keys.
    ///
    /// Fails without any state change when a key is absent. Deregistered
    /// objects stay visible and rejoin the active set; any accompanying
    /// fade-out is the author's responsibility.
    pub fn remove_from_canvas<S>(&mut self, keys: impl IntoIterator<Item = S>) -> DeckResult<()>
    where
        S: AsRef<str>,
    {
        let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key) {
                return Err(DeckError::registry(format!(
                    "canvas key '{key}' listed twice in one removal"
                )));
            }
            self.canvas.lookup(key)?;
        }
        for key in &keys {
            let id = self.canvas.remove(key)?;
            self.active.insert(id);
        }
        Ok(())
    }

    /// Handle registered under `key`.
    pub fn canvas_lookup(&self, key: &str) -> DeckResult<VisualId> {
        self.canvas.lookup(key)
    }

    /// Current appearance of the object registered under `key`.
    pub fn canvas_visual(&self, key: &str) -> DeckResult<&Visual> {
        let id = self.canvas.lookup(key)?;
        self.visual(id)
    }

    /// Morph a canvas object into a new appearance, keeping its key and
    /// handle (the slide-number counter pattern).
    pub fn update_canvas_entry(
        &mut self,
        key: &str,
        appearance: Visual,
        run_time: Seconds,
    ) -> DeckResult<()> {
        let id = self.canvas.lookup(key)?;
        self.play_one(Animation::new(
            id,
            AnimationKind::Morph {
                into: Box::new(appearance),
            },
            run_time,
        ))
    }

    /// Replace the whole active non-canvas set with `new` content and
    /// schedule the transition immediately.
    pub fn replace_content(&mut self, new: &[VisualId], transition: &Transition) -> DeckResult<()> {
        let old = self.active_content();
        self.replace_ids(&old, new, transition)
    }

    /// Replace an explicit subset of the active set.
    pub fn replace_subset(
        &mut self,
        old: &[VisualId],
        new: &[VisualId],
        transition: &Transition,
    ) -> DeckResult<()> {
        for id in old {
            if !self.active.contains(id) {
                return Err(DeckError::validation(format!(
                    "replacement source {id:?} is not active non-canvas content"
                )));
            }
        }
        self.replace_ids(old, new, transition)
    }

    /// Build the replacement animation and update content bookkeeping, but
    /// return the group instead of scheduling it.
    ///
    /// The content model advances immediately; the returned handle lets
    /// the author merge the swap with other simultaneous animations before
    /// playing it within the same segment.
    pub fn replace_content_animation(
        &mut self,
        new: &[VisualId],
        transition: &Transition,
    ) -> DeckResult<AnimationGroup> {
        let old = self.active_content();
        let group = self.build_swap(&old, new, transition)?;
        for id in &old {
            self.active.remove(id);
        }
        self.active.extend(new.iter().copied());
        Ok(group)
    }

    /// Seal the deck into its immutable authored artifact.
    #[tracing::instrument(skip(self), fields(actions = self.timeline.actions.len(), boundaries = self.boundaries.len()))]
    pub fn build(self) -> DeckResult<Deck> {
        let deck = Deck {
            stage: self.stage,
            visuals: self.visuals,
            timeline: self.timeline,
            boundaries: self.boundaries,
            canvas: self.canvas,
        };
        deck.validate()?;
        Ok(deck)
    }

    fn replace_ids(
        &mut self,
        old: &[VisualId],
        new: &[VisualId],
        transition: &Transition,
    ) -> DeckResult<()> {
        let group = self.build_swap(old, new, transition)?;
        // Old ids may include former canvas objects already deactivated;
        // play() bookkeeping handles both directions idempotently.
        self.play(group)
    }

    fn build_swap(
        &self,
        old: &[VisualId],
        new: &[VisualId],
        transition: &Transition,
    ) -> DeckResult<AnimationGroup> {
        let mut seen = BTreeSet::new();
        for id in new {
            if !self.visuals.contains_key(id) {
                return Err(DeckError::validation(format!(
                    "replacement content references unknown visual id {id:?}"
                )));
            }
            if self.canvas.contains_id(*id) {
                return Err(DeckError::validation(format!(
                    "replacement content {id:?} is canvas-registered; canvas objects are managed explicitly"
                )));
            }
            if !seen.insert(*id) {
                return Err(DeckError::validation(format!(
                    "replacement content lists {id:?} twice"
                )));
            }
        }
        build_replacement(
            old,
            new,
            &transition.mode,
            transition.run_time,
            transition.ease,
            self.stage,
        )
    }

    fn apply_bookkeeping(&mut self, anim: &Animation) {
        match &anim.kind {
            AnimationKind::Create | AnimationKind::FadeIn => {
                if !self.canvas.contains_id(anim.target) {
                    self.active.insert(anim.target);
                }
            }
            AnimationKind::FadeOut => {
                self.active.remove(&anim.target);
            }
            AnimationKind::Morph { into } => {
                self.visuals.insert(anim.target, (**into).clone());
            }
            AnimationKind::MoveTo { to } => {
                if let Some(v) = self.visuals.get_mut(&anim.target) {
                    v.set_position(*to);
                }
            }
            AnimationKind::SlideInFrom { .. }
            | AnimationKind::SlideOutTo { .. }
            | AnimationKind::ScaleFrom { .. }
            | AnimationKind::ScaleTo { .. } => {}
        }
    }
}

impl Default for SlideDeck {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Immutable authored presentation: the artifact consumed by playback and
/// export stages.
pub struct Deck {
    /// Stage the deck was authored against.
    pub stage: Stage,
    /// Final appearance of every node referenced by the timeline.
    pub visuals: BTreeMap<VisualId, Visual>,
    /// The one linear timeline.
    pub timeline: Timeline,
    /// Boundary table in authoring order.
    pub boundaries: Vec<SlideBoundary>,
    /// Final canvas registry state.
    pub canvas: CanvasRegistry,
}

impl Deck {
    /// Validate cross-references between timeline, boundaries, arena, and
    /// canvas.
    pub fn validate(&self) -> DeckResult<()> {
        for (i, boundary) in self.boundaries.iter().enumerate() {
            boundary.options.validate()?;
            match self.timeline.actions.get(boundary.action_index) {
                Some(TimelineAction::Boundary(idx)) if *idx == i => {}
                _ => {
                    return Err(DeckError::validation(format!(
                        "boundary {i} does not match its timeline marker"
                    )));
                }
            }
        }
        for (i, action) in self.timeline.actions.iter().enumerate() {
            match action {
                TimelineAction::Play(group) => {
                    group.validate()?;
                    for anim in &group.animations {
                        if !self.visuals.contains_key(&anim.target) {
                            return Err(DeckError::validation(format!(
                                "timeline references unknown visual id {:?}",
                                anim.target
                            )));
                        }
                    }
                }
                TimelineAction::Boundary(idx) => {
                    let matches_table = self
                        .boundaries
                        .get(*idx)
                        .is_some_and(|b| b.action_index == i);
                    if !matches_table {
                        return Err(DeckError::validation(format!(
                            "timeline marker at action {i} references unknown boundary {idx}"
                        )));
                    }
                }
                TimelineAction::Wait(_) => {}
            }
        }
        for (key, id) in self.canvas.iter() {
            if !self.visuals.contains_key(&id) {
                return Err(DeckError::validation(format!(
                    "canvas key '{key}' references unknown visual id {id:?}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        effects::transitions::TransitionMode,
        foundation::core::{Point, Vec2},
        scene::dsl::TextBuilder,
    };

    fn secs(v: f64) -> Seconds {
        Seconds::new(v).unwrap()
    }

    fn text(deck: &mut SlideDeck, s: &str) -> VisualId {
        deck.insert(TextBuilder::new(s).build().unwrap())
    }

    fn fade(run: f64) -> Transition {
        Transition::new(TransitionMode::Fade, secs(run))
    }

    #[test]
    fn advance_seals_and_play_reopens() {
        let mut deck = SlideDeck::new();
        assert_eq!(deck.segment_state(), SegmentState::Building);

        let title = text(&mut deck, "title");
        deck.play_one(Animation::new(title, AnimationKind::FadeIn, secs(0.5)))
            .unwrap();
        deck.advance(BoundaryOptions::new()).unwrap();
        assert_eq!(deck.segment_state(), SegmentState::Committed);

        deck.wait(secs(0.2));
        assert_eq!(deck.segment_state(), SegmentState::Building);
    }

    #[test]
    fn invalid_advance_inserts_no_boundary() {
        let mut deck = SlideDeck::new();
        let err = deck.advance(BoundaryOptions::new().playback_rate(-1.0));
        assert!(matches!(err, Err(DeckError::Validation(_))));
        assert!(deck.timeline.actions.is_empty());
        assert!(deck.boundaries.is_empty());
    }

    #[test]
    fn canvas_objects_survive_wholesale_replacement() {
        let mut deck = SlideDeck::new();
        let title = text(&mut deck, "title");
        let counter = text(&mut deck, "1");
        let body = text(&mut deck, "body");

        deck.add_to_canvas([("title", title), ("counter", counter)])
            .unwrap();
        deck.play_one(Animation::new(body, AnimationKind::FadeIn, secs(0.3)))
            .unwrap();
        assert_eq!(deck.active_content(), vec![body]);

        let next = text(&mut deck, "next");
        deck.replace_content(&[next], &fade(0.4)).unwrap();

        assert_eq!(deck.active_content(), vec![next]);
        assert_eq!(deck.canvas_lookup("title").unwrap(), title);
        assert_eq!(deck.canvas_lookup("counter").unwrap(), counter);
    }

    #[test]
    fn replacement_never_targets_canvas_ids() {
        let mut deck = SlideDeck::new();
        let pinned = text(&mut deck, "pinned");
        deck.add_to_canvas([("pin", pinned)]).unwrap();
        let a = text(&mut deck, "a");
        deck.play_one(Animation::new(a, AnimationKind::FadeIn, secs(0.3)))
            .unwrap();

        let b = text(&mut deck, "b");
        let group = deck.replace_content_animation(&[b], &fade(0.4)).unwrap();
        assert!(group.animations.iter().all(|an| an.target != pinned));
    }

    #[test]
    fn canvas_id_as_new_content_is_rejected() {
        let mut deck = SlideDeck::new();
        let pinned = text(&mut deck, "pinned");
        deck.add_to_canvas([("pin", pinned)]).unwrap();
        assert!(deck.replace_content(&[pinned], &fade(0.4)).is_err());
    }

    #[test]
    fn decomposed_replacement_matches_direct_replacement() {
        let build_active = |two_step: bool| {
            let mut deck = SlideDeck::new();
            let old = text(&mut deck, "old");
            deck.play_one(Animation::new(old, AnimationKind::FadeIn, secs(0.3)))
                .unwrap();
            let new = text(&mut deck, "new");
            if two_step {
                deck.replace_content(&[], &fade(0.4)).unwrap();
                deck.replace_content(&[new], &fade(0.4)).unwrap();
            } else {
                deck.replace_content(&[new], &fade(0.4)).unwrap();
            }
            deck.active_content().len()
        };
        assert_eq!(build_active(true), build_active(false));
    }

    #[test]
    fn deferred_replacement_advances_content_without_scheduling() {
        let mut deck = SlideDeck::new();
        let a = text(&mut deck, "a");
        deck.play_one(Animation::new(a, AnimationKind::FadeIn, secs(0.3)))
            .unwrap();
        let actions_before = deck.timeline.actions.len();

        let b = text(&mut deck, "b");
        let group = deck
            .replace_content_animation(
                &[b],
                &Transition::new(
                    TransitionMode::Wipe {
                        direction: Vec2::new(1.0, 0.0),
                    },
                    secs(0.5),
                ),
            )
            .unwrap();
        assert_eq!(deck.timeline.actions.len(), actions_before);
        assert_eq!(deck.active_content(), vec![b]);

        // Playing the handle later does not double-count content.
        deck.play(group).unwrap();
        assert_eq!(deck.active_content(), vec![b]);
    }

    #[test]
    fn replace_subset_swaps_only_the_named_content() {
        let mut deck = SlideDeck::new();
        let keep = text(&mut deck, "keep");
        let swap = text(&mut deck, "swap");
        deck.play(
            AnimationGroup::new()
                .with(Animation::new(keep, AnimationKind::FadeIn, secs(0.3)))
                .with(Animation::new(swap, AnimationKind::FadeIn, secs(0.3))),
        )
        .unwrap();

        let incoming = text(&mut deck, "incoming");
        deck.replace_subset(&[swap], &[incoming], &fade(0.4)).unwrap();
        assert_eq!(deck.active_content(), vec![keep, incoming]);

        // Subsets must come from the active set.
        let stranger = text(&mut deck, "stranger");
        assert!(deck.replace_subset(&[stranger], &[], &fade(0.4)).is_err());
    }

    #[test]
    fn remove_from_canvas_returns_object_to_active_set() {
        let mut deck = SlideDeck::new();
        let pinned = text(&mut deck, "pinned");
        deck.play_one(Animation::new(pinned, AnimationKind::FadeIn, secs(0.3)))
            .unwrap();
        deck.add_to_canvas([("pin", pinned)]).unwrap();
        assert!(deck.active_content().is_empty());

        deck.remove_from_canvas(["pin"]).unwrap();
        assert_eq!(deck.active_content(), vec![pinned]);
    }

    #[test]
    fn remove_from_canvas_is_atomic() {
        let mut deck = SlideDeck::new();
        let pinned = text(&mut deck, "pinned");
        deck.add_to_canvas([("pin", pinned)]).unwrap();

        let err = deck.remove_from_canvas(["pin", "missing"]);
        assert!(matches!(err, Err(DeckError::Registry(_))));
        assert_eq!(deck.canvas_lookup("pin").unwrap(), pinned);

        // A key repeated within one call must not slip past the pre-pass.
        let err = deck.remove_from_canvas(["pin", "pin"]);
        assert!(matches!(err, Err(DeckError::Registry(_))));
        assert_eq!(deck.canvas_lookup("pin").unwrap(), pinned);
    }

    #[test]
    fn morph_updates_registered_appearance_in_place() {
        let mut deck = SlideDeck::new();
        let counter = text(&mut deck, "1");
        deck.add_to_canvas([("counter", counter)]).unwrap();

        let two = TextBuilder::new("2").build().unwrap();
        deck.update_canvas_entry("counter", two, secs(0.3)).unwrap();

        assert_eq!(deck.canvas_lookup("counter").unwrap(), counter);
        match deck.canvas_visual("counter").unwrap() {
            Visual::Text(n) => assert_eq!(n.text, "2"),
            other => panic!("expected text node, got {other:?}"),
        }
    }

    #[test]
    fn move_to_updates_arena_position() {
        let mut deck = SlideDeck::new();
        let bar = text(&mut deck, "bar");
        deck.play_one(
            Animation::new(
                bar,
                AnimationKind::MoveTo {
                    to: Point::new(2.0, -1.0),
                },
                secs(0.6),
            ),
        )
        .unwrap();
        assert_eq!(deck.visual(bar).unwrap().position(), Point::new(2.0, -1.0));
    }

    #[test]
    fn build_produces_a_validating_deck() {
        let mut deck = SlideDeck::new();
        let title = text(&mut deck, "title");
        deck.advance(BoundaryOptions::new().notes("intro")).unwrap();
        deck.play_one(Animation::new(title, AnimationKind::FadeIn, secs(0.5)))
            .unwrap();
        deck.advance(BoundaryOptions::new()).unwrap();

        let deck = deck.build().unwrap();
        assert_eq!(deck.boundaries.len(), 2);
        assert!(deck.validate().is_ok());

        let json = serde_json::to_string(&deck).unwrap();
        let back: Deck = serde_json::from_str(&json).unwrap();
        assert!(back.validate().is_ok());
        assert_eq!(back.boundaries[0].options.notes, "intro");
    }

    #[test]
    fn validate_rejects_marker_without_table_entry() {
        let mut deck = SlideDeck::new();
        let title = text(&mut deck, "title");
        deck.play_one(Animation::new(title, AnimationKind::FadeIn, secs(0.5)))
            .unwrap();
        deck.advance(BoundaryOptions::new()).unwrap();
        deck.wait(secs(0.2));
        let deck = deck.build().unwrap();

        // A hand-edited artifact may carry a marker the table knows
        // nothing about; validation must reject it rather than leave the
        // panic to a downstream index.
        let json = serde_json::to_string(&deck).unwrap();
        let mut bad: Deck = serde_json::from_str(&json).unwrap();
        bad.timeline.actions[2] = TimelineAction::Boundary(7);
        assert!(matches!(bad.validate(), Err(DeckError::Validation(_))));

        // A marker pointing at a table entry whose recorded position
        // disagrees is just as corrupt.
        let mut skewed: Deck = serde_json::from_str(&json).unwrap();
        skewed.timeline.actions[2] = TimelineAction::Boundary(0);
        assert!(matches!(skewed.validate(), Err(DeckError::Validation(_))));
    }

    #[test]
    fn play_rejects_unknown_targets() {
        let mut deck = SlideDeck::new();
        let err = deck.play_one(Animation::new(
            VisualId(99),
            AnimationKind::FadeIn,
            secs(0.3),
        ));
        assert!(matches!(err, Err(DeckError::Animation(_))));
        assert!(deck.timeline.actions.is_empty());
    }
}
