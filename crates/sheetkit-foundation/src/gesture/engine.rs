//! Reconciles direct pans, forwarded scroll pans and settle animations into
//! one sheet height.

use sheetkit_ui_graphics::Point;

use crate::gesture::decision::{can_dismiss, closest_detent};
use crate::gesture::types::{
    Effect, Effects, GestureContext, GestureEvent, PanPhase, PanSample, ScrollMetrics,
};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TrackingState {
    #[default]
    Idle,
    /// The user drags the sheet surface.
    DirectTracking,
    /// Scroll pans drive the sheet. `baseline` is the scroll pan's translation
    /// when forwarding began and is subtracted from later samples.
    ForwardedTracking { baseline: Point },
    /// A height-change animation is in flight.
    Settling,
}

impl TrackingState {
    pub fn is_tracking(&self) -> bool {
        matches!(
            self,
            TrackingState::DirectTracking | TrackingState::ForwardedTracking { .. }
        )
    }

    pub fn is_settling(&self) -> bool {
        matches!(self, TrackingState::Settling)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct EngineState {
    pub tracking: TrackingState,
    /// Scroll offset the sheet did not consume. While it and the live offset
    /// are both below the content top, scroll pans belong to the scroll view.
    pub unhandled_offset: Option<f32>,
    /// Last offset seen on the offset stream, for duplicate suppression.
    pub last_observed_offset: Option<f32>,
}

/// Pure transition function of the engine.
pub fn step(
    state: &EngineState,
    event: &GestureEvent,
    context: &GestureContext,
) -> (EngineState, Effects) {
    let mut next = *state;
    let mut effects = Effects::new();
    match event {
        GestureEvent::SheetPan(sample) => {
            if sample.phase.is_active() && !next.tracking.is_tracking() {
                next.tracking = TrackingState::DirectTracking;
            }
            handle_pan(&mut next, sample, sample.translation, context, &mut effects);
        }
        GestureEvent::ScrollPan { sample, scroll } => {
            handle_scroll_pan(&mut next, sample, scroll, context, &mut effects);
        }
        GestureEvent::ScrollOffsetChanged { scroll } => {
            if next.last_observed_offset != Some(scroll.offset) {
                next.last_observed_offset = Some(scroll.offset);
                if !next.tracking.is_tracking() && !scroll.is_tracking && !scroll.is_decelerating {
                    next.unhandled_offset = Some(scroll.offset);
                }
            }
        }
        GestureEvent::SettleStarted => {
            if !next.tracking.is_tracking() {
                next.tracking = TrackingState::Settling;
            }
        }
        GestureEvent::SettleFinished { scroll } => {
            if next.tracking.is_settling() {
                next.tracking = TrackingState::Idle;
            }
            if let Some(scroll) = scroll.filter(|scroll| scroll.is_below_top(scroll.offset)) {
                next.unhandled_offset = Some(scroll.offset);
            }
        }
    }
    (next, effects)
}

fn handle_scroll_pan(
    state: &mut EngineState,
    sample: &PanSample,
    scroll: &ScrollMetrics,
    context: &GestureContext,
    effects: &mut Effects,
) {
    // The scroll view keeps pans that start inside content it already scrolled.
    match state.unhandled_offset {
        Some(unhandled) if scroll.is_below_top(scroll.offset) && scroll.is_below_top(unhandled) => {
            return;
        }
        _ => state.unhandled_offset = None,
    }

    match state.tracking {
        TrackingState::ForwardedTracking { baseline } => {
            effects.push(Effect::ResetScrollOffset);
            handle_pan(state, sample, sample.translation - baseline, context, effects);
        }
        TrackingState::DirectTracking => {
            state.tracking = TrackingState::ForwardedTracking {
                baseline: Point::ZERO,
            };
            effects.push(Effect::ResetScrollOffset);
            handle_pan(state, sample, sample.translation, context, effects);
        }
        TrackingState::Idle | TrackingState::Settling if sample.phase.is_active() => {
            let forward = !context.layout.reached_max_detent()
                || (sample.velocity.y > 0.0 && scroll.is_at_top());
            if forward {
                state.tracking = TrackingState::ForwardedTracking {
                    baseline: sample.translation,
                };
                effects.push(Effect::ResetScrollOffset);
                handle_pan(state, sample, Point::ZERO, context, effects);
            }
        }
        TrackingState::Idle | TrackingState::Settling => {}
    }
}

fn handle_pan(
    state: &mut EngineState,
    sample: &PanSample,
    translation: Point,
    context: &GestureContext,
    effects: &mut Effects,
) {
    let layout = &context.layout;
    match sample.phase {
        PanPhase::Began | PanPhase::Changed => {
            let base = layout.current_height;
            let unclamped = if translation.y > 0.0 {
                base - translation.y.abs()
            } else {
                base + translation.y.abs()
            };
            let max = layout.max.height;
            let height = unclamped.clamp(0.0, max.max(0.0));

            if unclamped >= max && translation.y < 0.0 {
                effects.push(Effect::SnapToDetent(layout.max.id.clone()));
                state.tracking = TrackingState::Idle;
            }
            effects.push(Effect::UpdateHeight(height));
        }
        PanPhase::Ended | PanPhase::Cancelled | PanPhase::Failed => {
            state.tracking = TrackingState::Idle;
            let height = context.displayed_height;
            if can_dismiss(
                layout,
                &context.policy,
                sample.velocity,
                translation,
                height,
            ) {
                effects.push(Effect::SwipeDismiss);
            } else if let Some(id) = closest_detent(
                layout,
                height,
                sample.velocity,
                &context.policy.thresholds,
            ) {
                effects.push(Effect::SettleTo(id));
            }
        }
        PanPhase::Possible => {}
    }
}

/// Stateful wrapper over [`step`] that logs state transitions.
#[derive(Debug, Default)]
pub struct GestureEngine {
    state: EngineState,
}

impl GestureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn tracking(&self) -> TrackingState {
        self.state.tracking
    }

    pub fn is_tracking(&self) -> bool {
        self.state.tracking.is_tracking()
    }

    pub fn is_settling(&self) -> bool {
        self.state.tracking.is_settling()
    }

    pub fn unhandled_offset(&self) -> Option<f32> {
        self.state.unhandled_offset
    }

    pub fn handle(&mut self, event: &GestureEvent, context: &GestureContext) -> Effects {
        let (next, effects) = step(&self.state, event, context);
        if next.tracking != self.state.tracking {
            log::debug!(
                "gesture {:?} -> {:?} on {:?}",
                self.state.tracking,
                next.tracking,
                event
            );
        }
        if !effects.is_empty() {
            log::trace!("gesture effects {:?}", effects.as_slice());
        }
        self.state = next;
        effects
    }

    /// Drops every tracking flag and the unhandled offset.
    pub fn reset(&mut self) {
        self.state = EngineState::default();
    }
}

#[cfg(test)]
#[path = "../tests/engine_tests.rs"]
mod tests;
