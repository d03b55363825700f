//! Gesture reconciliation for the sheet.
//!
//! Three sources move the sheet: pans on the sheet surface, pans on a nested
//! scroll view that the sheet takes over while it is not fully expanded, and
//! height animations started by the sheet itself. [`step`] folds each event
//! into an [`EngineState`] and returns the [`Effects`] the caller performs.

mod decision;
mod engine;
mod types;

pub use decision::{can_dismiss, closest_detent};
pub use engine::{step, EngineState, GestureEngine, TrackingState};
pub use types::{
    DetentLayout, DismissPolicy, Effect, Effects, GestureContext, GestureEvent, LayoutEntry,
    PanPhase, PanSample, ScrollMetrics,
};
