//! Detents, height resolution and gesture reconciliation for SheetKit
//!
//! This crate holds the pieces of a bottom sheet that do not touch a surface:
//! the detent model, the per-container height cache, and the state machine that
//! turns pan samples from the sheet and from nested scroll content into one
//! height signal plus end-of-drag decisions.

pub mod detent;
pub mod detent_model;
pub mod gesture;
pub mod gesture_constants;
pub mod height_cache;

pub use detent::{Detent, DetentId, DetentResolver, PreferredHeight, ResolverContext};
pub use detent_model::DetentModel;
pub use gesture::{
    closest_detent, can_dismiss, step, DetentLayout, DismissPolicy, Effect, Effects, EngineState,
    GestureContext, GestureEngine, GestureEvent, LayoutEntry, PanPhase, PanSample, ScrollMetrics,
    TrackingState,
};
pub use gesture_constants::GestureThresholds;
pub use height_cache::{resolve_height, ContainerMetrics, HeightCache, HIDDEN_DETENT_HEIGHT};

// Geometry types appear throughout the public API.
pub use sheetkit_ui_graphics::{EdgeInsets, Point, Size};
