//! Frame-driven value animation.
//!
//! An [`Animatable`] owns one value and moves it toward a target on every frame
//! of a [`FrameClock`], either along an eased tween or with spring physics.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use sheetkit_core::{FrameCallbackRegistration, FrameClock};

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

impl<A: Lerp, B: Lerp> Lerp for (A, B) {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        (
            self.0.lerp(&target.0, fraction),
            self.1.lerp(&target.1, fraction),
        )
    }
}

/// Easing curves applied to a linear fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// Critically damped, spring-like curve used for sheet height changes.
    SheetCurve,
}

impl Easing {
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::SheetCurve => cubic_bezier(0.38, 0.7, 0.125, 1.0, fraction),
        }
    }
}

/// Evaluates a CSS-style cubic bezier timing curve anchored at (0,0) and (1,1).
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let axis = |c1: f32, c2: f32, t: f32| {
        let u = 1.0 - t;
        3.0 * u * u * t * c1 + 3.0 * u * t * t * c2 + t * t * t
    };

    // x(t) is monotonic for control points in [0, 1], so bisection converges.
    let mut low = 0.0f32;
    let mut high = 1.0f32;
    let mut t = fraction;
    for _ in 0..32 {
        let x = axis(x1, x2, t);
        if (x - fraction).abs() < 1e-5 {
            break;
        }
        if x < fraction {
            low = t;
        } else {
            high = t;
        }
        t = 0.5 * (low + high);
    }

    axis(y1, y2, t)
}

/// Timing of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    pub fn with_duration(duration: Duration, easing: Easing) -> Self {
        Self::tween(duration.as_millis() as u64, easing)
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::SheetCurve)
    }
}

/// Damped harmonic oscillator parameters.
///
/// The spring moves a normalized progress from 0 to 1; thresholds are in
/// progress units (per second for velocity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    pub mass: f32,
    pub stiffness: f32,
    /// Absolute damping coefficient.
    pub damping: f32,
    pub velocity_threshold: f32,
    pub position_threshold: f32,
}

impl SpringSpec {
    pub fn new(mass: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            mass,
            stiffness,
            damping,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    /// Unit-mass spring expressed with a damping ratio (1.0 = critical).
    pub fn with_damping_ratio(damping_ratio: f32, stiffness: f32) -> Self {
        Self::new(1.0, stiffness, 2.0 * damping_ratio * stiffness.sqrt())
    }

    /// Critically damped, fast spring.
    pub fn default_spring() -> Self {
        Self::with_damping_ratio(1.0, 1500.0)
    }

    /// The slightly under-damped spring sheets present with.
    pub fn sheet() -> Self {
        Self::new(1.0, 200.0, 20.0)
    }

    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// How an [`Animatable`] travels to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Tween(AnimationSpec),
    Spring(SpringSpec),
}

impl Default for Motion {
    fn default() -> Self {
        Motion::Tween(AnimationSpec::default())
    }
}

/// Integration step for spring physics, ~240Hz.
const SPRING_TIMESTEP: f32 = 1.0 / 240.0;

type UpdateSink<T> = Box<dyn FnMut(T)>;
type EndSink = Box<dyn FnOnce(bool)>;

/// Animated value holder driven by a frame clock.
///
/// Cloning shares the same underlying animation.
pub struct Animatable<T: Lerp + Clone + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: Lerp + Clone + 'static> {
    clock: FrameClock,
    current: T,
    start: T,
    target: T,
    motion: Motion,
    progress: f32,
    velocity: f32,
    start_time_nanos: Option<u64>,
    last_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_update: Option<UpdateSink<T>>,
    on_end: Option<EndSink>,
    running: bool,
    generation: u64,
}

impl<T: Lerp + Clone + 'static> AnimatableInner<T> {
    /// Stops any run in progress, leaving the value where it is.
    fn halt(&mut self) -> Option<EndSink> {
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
        self.generation += 1;
        self.running = false;
        self.start = self.current.clone();
        self.target = self.current.clone();
        self.start_time_nanos = None;
        self.last_time_nanos = None;
        self.on_update = None;
        self.on_end.take()
    }

    /// Advances to `frame_time_nanos`, returning the new value and whether the run ended.
    fn advance(&mut self, frame_time_nanos: u64) -> (T, bool) {
        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let finished = match self.motion {
            Motion::Tween(spec) => {
                let elapsed = frame_time_nanos.saturating_sub(start_time);
                let duration = (spec.duration_millis * 1_000_000).max(1);
                let linear = (elapsed as f32 / duration as f32).clamp(0.0, 1.0);
                self.progress = spec.easing.transform(linear);
                linear >= 1.0
            }
            Motion::Spring(spec) => {
                let last = self.last_time_nanos.unwrap_or(start_time);
                let mut remaining = frame_time_nanos.saturating_sub(last) as f32 / 1_000_000_000.0;
                while remaining > 0.0 {
                    let step = remaining.min(SPRING_TIMESTEP);
                    let displacement = self.progress - 1.0;
                    let force = -spec.stiffness * displacement - spec.damping * self.velocity;
                    self.velocity += force / spec.mass * step;
                    self.progress += self.velocity * step;
                    remaining -= step;
                }
                let settled = self.velocity.abs() < spec.velocity_threshold
                    && (self.progress - 1.0).abs() < spec.position_threshold;
                // The first frame only anchors the clock.
                settled && self.last_time_nanos.is_some()
            }
        };
        self.last_time_nanos = Some(frame_time_nanos);

        let value = if finished {
            self.progress = 1.0;
            self.velocity = 0.0;
            self.target.clone()
        } else {
            self.start.lerp(&self.target, self.progress)
        };
        self.current = value.clone();
        (value, finished)
    }
}

impl<T: Lerp + Clone + 'static> Animatable<T> {
    pub fn new(initial: T, clock: FrameClock) -> Self {
        let inner = AnimatableInner {
            clock,
            current: initial.clone(),
            start: initial.clone(),
            target: initial,
            motion: Motion::default(),
            progress: 1.0,
            velocity: 0.0,
            start_time_nanos: None,
            last_time_nanos: None,
            registration: None,
            on_update: None,
            on_end: None,
            running: false,
            generation: 0,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    /// Animates from the current value to `target`.
    ///
    /// `on_update` receives every intermediate value; `on_end(true)` runs once
    /// the target is reached. A run replaced by another run or by [`stop`]
    /// never calls its `on_end`.
    ///
    /// [`stop`]: Animatable::stop
    pub fn animate_to(
        &self,
        target: T,
        motion: Motion,
        on_update: impl FnMut(T) + 'static,
        on_end: impl FnOnce(bool) + 'static,
    ) {
        {
            let mut inner = self.inner.borrow_mut();
            // The replaced run's completion is dropped, not called.
            drop(inner.halt());
            inner.target = target;
            inner.motion = motion;
            inner.progress = 0.0;
            inner.velocity = 0.0;
            inner.running = true;
            inner.on_update = Some(Box::new(on_update));
            inner.on_end = Some(Box::new(on_end));
        }
        Self::schedule_frame(&self.inner);
    }

    /// Cancels any run and sets the value without notifying anyone.
    pub fn snap_to(&self, value: T) {
        let mut inner = self.inner.borrow_mut();
        drop(inner.halt());
        inner.current = value.clone();
        inner.start = value.clone();
        inner.target = value;
    }

    /// Stops the run in progress and keeps the value it had reached.
    pub fn stop(&self) {
        let dropped = self.inner.borrow_mut().halt();
        if dropped.is_some() {
            log::trace!("animation stopped before reaching its target");
        }
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let clock = {
            let inner = this.borrow();
            if inner.registration.is_some() || !inner.running {
                return;
            }
            inner.clock.clone()
        };
        let strong = Rc::clone(this);
        let registration = clock.with_frame_nanos(move |time| Self::on_frame(&strong, time));
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_nanos: u64) {
        let (value, finished, generation, update) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            if !inner.running {
                return;
            }
            let (value, finished) = inner.advance(frame_time_nanos);
            (value, finished, inner.generation, inner.on_update.take())
        };

        if let Some(mut update) = update {
            update(value);
            let mut inner = this.borrow_mut();
            if inner.generation == generation && inner.on_update.is_none() {
                inner.on_update = Some(update);
            }
        }

        if finished {
            let end = {
                let mut inner = this.borrow_mut();
                if inner.generation != generation {
                    None
                } else {
                    inner.running = false;
                    inner.start = inner.target.clone();
                    inner.start_time_nanos = None;
                    inner.last_time_nanos = None;
                    inner.on_update = None;
                    inner.on_end.take()
                }
            };
            if let Some(end) = end {
                end(true);
            }
        } else if this.borrow().generation == generation {
            Self::schedule_frame(this);
        }
    }
}

impl<T: Lerp + Clone + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
