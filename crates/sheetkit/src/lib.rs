//! Draggable multi-detent bottom sheet
//!
//! A [`SheetController`] slides a sheet up from the bottom of a host
//! container, rests it at one of several detents, and lets the user drag it
//! between detents or away, either directly or through a nested scroll view.

mod bridge;
mod config;
mod controller;
mod error;
mod events;
mod frame;
mod host;

pub use bridge::{SheetBridge, WeakSheetBridge};
pub use config::{
    DraggerChrome, SheetChrome, SheetConfig, ANIMATION_DURATION, DIMMING_ALPHA, DRAGGER_HEIGHT,
    DRAGGER_TOP_INSET, DRAGGER_WIDTH,
};
pub use controller::{PresentationState, SheetController};
pub use error::SheetError;
pub use events::SheetEvents;
pub use frame::SheetFrame;
pub use host::{NestedScrollView, Recognizer, SheetContent, SheetHost};

pub use sheetkit_animation::AnimationStyle;
pub use sheetkit_foundation::{
    Detent, DetentId, GestureThresholds, PanPhase, PanSample, PreferredHeight, ResolverContext,
    ScrollMetrics,
};

pub mod prelude {
    pub use crate::{
        AnimationStyle, Detent, DetentId, NestedScrollView, PanPhase, PanSample,
        PresentationState, Recognizer, SheetBridge, SheetConfig, SheetContent, SheetController,
        SheetEvents, SheetFrame, SheetHost,
    };
    pub use sheetkit_ui_graphics::prelude::*;
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
