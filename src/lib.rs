//! Deckwright is the authoring core of a programmatic slide-deck system.
//!
//! A deck is written as one synchronous pass over a [`SlideDeck`]: create
//! visuals, play animations, and mark slide boundaries. The pass produces
//! a pure data artifact ([`Deck`]) that downstream renderers, exporters,
//! and presentation runtimes consume.
//!
//! # Authoring model
//!
//! 1. **Compose**: build [`Visual`] nodes with the scene DSL and arrange
//!    them on the [`Stage`]
//! 2. **Animate**: schedule [`Animation`] groups onto the one linear
//!    timeline (`play` / `wait`)
//! 3. **Cut**: insert slide boundaries with `advance`, attaching `loop`,
//!    `auto_next`, `playback_rate`, and presenter-note modifiers
//! 4. **Swap**: replace non-canvas content wholesale with wipe/zoom
//!    transitions; canvas-registered objects persist across swaps
//! 5. **Compile**: cut the sealed deck into a [`PlaybackPlan`] for an
//!    interactive or export consumer
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Authoring is recording**: the core schedules animation primitives
//!   and boundary metadata; rasterization, encoding, and the interactive
//!   runtime are external capabilities.
//! - **Fatal, immediate errors**: configuration and registry misuse fail
//!   the authoring pass on the spot; there is no recoverable error class.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod effects;
mod foundation;
mod playback;
mod scene;
mod sequencer;
mod timeline;

pub use animation::action::{Animation, AnimationGroup, AnimationKind};
pub use animation::ease::Ease;
pub use effects::transitions::{
    Transition, TransitionMode, TransitionSpec, build_replacement, parse_transition,
};
pub use foundation::core::{Point, Rect, Seconds, Stage, Vec2, VisualId};
pub use foundation::error::{DeckError, DeckResult};
pub use playback::plan::{PlaybackIntent, PlaybackPlan, Segment};
pub use scene::dsl::{
    AlignEdge, Corner, Edge, ShapeBuilder, TextBuilder, arrange_column, arrange_row, group,
    surrounding_rect, to_corner, to_edge,
};
pub use scene::visual::{
    ColorRgba8, GroupNode, ShapeKind, ShapeNode, ShapeStyle, TextNode, TextStyle, Visual,
};
pub use sequencer::canvas::CanvasRegistry;
pub use sequencer::deck::{Deck, SegmentState, SlideDeck};
pub use timeline::model::{BoundaryOptions, SlideBoundary, Timeline, TimelineAction};
