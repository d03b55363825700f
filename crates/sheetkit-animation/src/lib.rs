//! Animation system for SheetKit
//!
//! Time-based tweens with easing curves, spring physics, and the pluggable
//! strategies a sheet uses to run its present, dismiss and height changes.

pub mod animation;
pub mod strategy;

pub use animation::*;
pub use strategy::*;

pub mod prelude {
    pub use crate::animation::{Animatable, AnimationSpec, Easing, Lerp, Motion, SpringSpec};
    pub use crate::strategy::{AnimationKind, AnimationStyle, Animator, Completion, Transition};
}
