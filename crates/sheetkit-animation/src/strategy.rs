//! Pluggable execution of sheet transitions.
//!
//! The lifecycle describes a change as a [`Transition`] (start value, end
//! value, a sink that writes values to the surface) and hands it to an
//! [`Animator`]. The animator decides how the values get there.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use sheetkit_core::FrameClock;

use crate::animation::{Animatable, AnimationSpec, Easing, Lerp, Motion, SpringSpec};

/// Which lifecycle step a transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Present,
    Dismiss,
    HeightChange,
}

/// Called once a transition lands; the flag is `true` when it ran to the end.
pub type Completion = Box<dyn FnOnce(bool)>;

/// A change of one animatable value.
pub struct Transition<T> {
    pub from: T,
    pub to: T,
    apply: Box<dyn FnMut(T)>,
}

impl<T> Transition<T> {
    pub fn new(from: T, to: T, apply: impl FnMut(T) + 'static) -> Self {
        Self {
            from,
            to,
            apply: Box::new(apply),
        }
    }
}

pub trait Animator<T: Lerp + Clone + 'static> {
    /// Nominal duration of an animated transition.
    fn duration(&self) -> Duration;

    fn execute(
        &self,
        kind: AnimationKind,
        animated: bool,
        transition: Transition<T>,
        completion: Completion,
    );
}

/// Writes the end value now and completes on the next frame.
fn run_immediately<T>(clock: &FrameClock, transition: Transition<T>, completion: Completion) {
    let Transition { to, mut apply, .. } = transition;
    apply(to);
    if !clock.post_frame_nanos(move |_| completion(true)) {
        log::debug!("runtime is gone, dropping transition completion");
    }
}

fn run_curve<T: Lerp + Clone + 'static>(
    clock: &FrameClock,
    spec: AnimationSpec,
    transition: Transition<T>,
    completion: Completion,
) -> Animatable<T> {
    let Transition { from, to, apply } = transition;
    let animatable = Animatable::new(from, clock.clone());
    animatable.animate_to(to, Motion::Tween(spec), apply, completion);
    animatable
}

/// Never animates.
pub struct ImmediateAnimator {
    clock: FrameClock,
}

impl ImmediateAnimator {
    pub fn new(clock: FrameClock) -> Self {
        Self { clock }
    }
}

impl<T: Lerp + Clone + 'static> Animator<T> for ImmediateAnimator {
    fn duration(&self) -> Duration {
        Duration::ZERO
    }

    fn execute(
        &self,
        kind: AnimationKind,
        _animated: bool,
        transition: Transition<T>,
        completion: Completion,
    ) {
        log::trace!("immediate {kind:?}");
        run_immediately(&self.clock, transition, completion);
    }
}

/// Platform-default curve for every transition. Runs are fire-and-forget.
pub struct CurveAnimator {
    clock: FrameClock,
    duration: Duration,
    easing: Easing,
}

impl CurveAnimator {
    pub fn new(clock: FrameClock, duration: Duration) -> Self {
        Self {
            clock,
            duration,
            easing: Easing::SheetCurve,
        }
    }
}

impl<T: Lerp + Clone + 'static> Animator<T> for CurveAnimator {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn execute(
        &self,
        kind: AnimationKind,
        animated: bool,
        transition: Transition<T>,
        completion: Completion,
    ) {
        if !animated {
            run_immediately(&self.clock, transition, completion);
            return;
        }
        log::trace!("curve {kind:?} over {:?}", self.duration);
        let spec = AnimationSpec::with_duration(self.duration, self.easing);
        run_curve(&self.clock, spec, transition, completion);
    }
}

/// Spring for presentation, curve for everything else.
///
/// The present spring lives in one owned slot: starting a new present stops
/// the previous one where it is (its completion never fires), and dropping
/// the animator stops whatever is in flight.
pub struct SpringAnimator<T: Lerp + Clone + 'static> {
    clock: FrameClock,
    duration: Duration,
    spring: SpringSpec,
    presenter: Rc<RefCell<Option<Animatable<T>>>>,
}

impl<T: Lerp + Clone + 'static> SpringAnimator<T> {
    pub fn new(clock: FrameClock, duration: Duration) -> Self {
        Self {
            clock,
            duration,
            spring: SpringSpec::sheet(),
            presenter: Rc::new(RefCell::new(None)),
        }
    }

    /// Whether a present spring is currently in flight.
    pub fn is_presenting(&self) -> bool {
        self.presenter
            .borrow()
            .as_ref()
            .map(Animatable::is_running)
            .unwrap_or(false)
    }

    fn stop_presenter(&self) {
        let previous = self.presenter.borrow_mut().take();
        if let Some(previous) = previous {
            previous.stop();
        }
    }

    fn present(&self, transition: Transition<T>, completion: Completion) {
        self.stop_presenter();

        let Transition { from, to, apply } = transition;
        let animatable = Animatable::new(from, self.clock.clone());
        let slot: Weak<RefCell<Option<Animatable<T>>>> = Rc::downgrade(&self.presenter);
        *self.presenter.borrow_mut() = Some(animatable.clone());
        animatable.animate_to(to, Motion::Spring(self.spring), apply, move |finished| {
            if let Some(slot) = slot.upgrade() {
                slot.borrow_mut().take();
            }
            completion(finished);
        });
    }
}

impl<T: Lerp + Clone + 'static> Animator<T> for SpringAnimator<T> {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn execute(
        &self,
        kind: AnimationKind,
        animated: bool,
        transition: Transition<T>,
        completion: Completion,
    ) {
        match kind {
            AnimationKind::Present if animated => self.present(transition, completion),
            AnimationKind::Present => run_immediately(&self.clock, transition, completion),
            AnimationKind::Dismiss | AnimationKind::HeightChange => {
                CurveAnimator::new(self.clock.clone(), self.duration).execute(
                    kind,
                    animated,
                    transition,
                    completion,
                )
            }
        }
    }
}

impl<T: Lerp + Clone + 'static> Drop for SpringAnimator<T> {
    fn drop(&mut self) {
        self.stop_presenter();
    }
}

/// Selects the animator a sheet runs its transitions through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationStyle {
    /// Jump straight to the end values.
    Immediate,
    /// Platform-default curve for everything.
    System,
    /// Interruptible spring for presentation.
    #[default]
    Spring,
}

impl AnimationStyle {
    pub fn animator<T: Lerp + Clone + 'static>(
        self,
        clock: FrameClock,
        duration: Duration,
    ) -> Rc<dyn Animator<T>> {
        match self {
            AnimationStyle::Immediate => Rc::new(ImmediateAnimator::new(clock)),
            AnimationStyle::System => Rc::new(CurveAnimator::new(clock, duration)),
            AnimationStyle::Spring => Rc::new(SpringAnimator::new(clock, duration)),
        }
    }
}

#[cfg(test)]
#[path = "tests/strategy_tests.rs"]
mod tests;
