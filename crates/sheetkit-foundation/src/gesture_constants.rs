//! Velocity and distance thresholds for sheet drag decisions.
//!
//! Velocities are in logical pixels per second, positive when the finger moves
//! down (toward dismissal).

/// Downward velocity that dismisses a sheet resting at its shortest visible detent.
pub const SOFT_DISMISS_VELOCITY: f32 = 300.0;

/// Downward velocity that dismisses a sheet from any taller detent, provided the
/// drag also covered more than [`DISMISS_TRANSLATION_FRACTION`] of its height.
pub const HARD_DISMISS_VELOCITY: f32 = 1_500.0;

/// Release velocity above which the sheet moves to the adjacent detent in the
/// direction of travel.
pub const SWITCH_DETENT_VELOCITY: f32 = 300.0;

pub const DISMISS_TRANSLATION_FRACTION: f32 = 0.5;

/// Tunable copy of the constants above.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureThresholds {
    pub soft_dismiss_velocity: f32,
    pub hard_dismiss_velocity: f32,
    pub switch_detent_velocity: f32,
    pub dismiss_translation_fraction: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            soft_dismiss_velocity: SOFT_DISMISS_VELOCITY,
            hard_dismiss_velocity: HARD_DISMISS_VELOCITY,
            switch_detent_velocity: SWITCH_DETENT_VELOCITY,
            dismiss_translation_fraction: DISMISS_TRANSLATION_FRACTION,
        }
    }
}
