//! Presentation lifecycle of a bottom sheet.
//!
//! [`SheetController`] owns the detent model and the gesture engine, talks to
//! the host through [`SheetHost`], and runs present, dismiss and height
//! changes through the configured [`Animator`]. All state sits behind one
//! `RefCell`; host calls, user callbacks and animator calls happen with the
//! cell unborrowed so any of them may call back into the controller.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use sheetkit_animation::{AnimationKind, Animator, Transition};
use sheetkit_core::{FrameClock, Subscription};
use sheetkit_foundation::{
    ContainerMetrics, Detent, DetentId, DetentModel, DismissPolicy, Effect, GestureContext,
    GestureEngine, GestureEvent, PanSample,
};
use sheetkit_ui_graphics::Size;
use smallvec::SmallVec;

use crate::bridge::WeakSheetBridge;
use crate::config::{SheetConfig, ANIMATION_DURATION};
use crate::error::SheetError;
use crate::events::{EventRegistry, SheetEvents};
use crate::frame::SheetFrame;
use crate::host::{NestedScrollView, Recognizer, SheetContent, SheetHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationState {
    #[default]
    Idle,
    Presented,
    Dismissed,
}

struct SheetState {
    model: DetentModel,
    config: SheetConfig,
    events: EventRegistry,
    engine: GestureEngine,
    presentation: PresentationState,
    host: Option<Rc<dyn SheetHost>>,
    scroll: Option<Rc<dyn NestedScrollView>>,
    scroll_subscription: Option<Subscription>,
    recognizers: SmallVec<[Recognizer; 3]>,
    /// Last frame pushed to the host.
    frame: SheetFrame,
    /// Height the sheet is pinned to; the frame height animates toward it.
    committed_height: f32,
    /// Bumped whenever something takes the height away from a running settle.
    settle_generation: u64,
    /// Bumped by every present or dismiss; older presentation runs go quiet.
    presentation_generation: u64,
    /// Present or dismiss currently animating.
    presentation_transition: Option<AnimationKind>,
}

impl SheetState {
    fn gesture_context(&mut self, metrics: Option<&ContainerMetrics>) -> GestureContext {
        GestureContext {
            layout: self.model.layout(metrics),
            displayed_height: self.committed_height,
            policy: DismissPolicy::new(self.config.dismiss_by_swipe, self.config.thresholds),
        }
    }

    /// Detent by id, including a current detent that left the set.
    fn lookup(&self, id: &DetentId) -> Option<Detent> {
        self.model.detent(id).cloned().or_else(|| {
            (self.model.current_id() == id).then(|| self.model.current().clone())
        })
    }

    fn host_frame(&self) -> Option<(Rc<dyn SheetHost>, SheetFrame)> {
        self.host.clone().map(|host| (host, self.frame))
    }

    /// Presented and not on its way out, or on its way in.
    fn is_showing(&self) -> bool {
        match self.presentation_transition {
            Some(AnimationKind::Present) => true,
            Some(AnimationKind::Dismiss) => false,
            _ => self.presentation == PresentationState::Presented,
        }
    }

    fn begin_presentation(&mut self, kind: AnimationKind) -> u64 {
        self.presentation_generation += 1;
        self.presentation_transition = Some(kind);
        self.presentation_generation
    }

    /// Ends the presentation run of `generation`. `false` when a later run
    /// took over.
    fn end_presentation(&mut self, generation: u64, state: PresentationState) -> bool {
        if generation != self.presentation_generation {
            return false;
        }
        self.presentation = state;
        self.presentation_transition = None;
        true
    }
}

pub(crate) struct Shared {
    state: RefCell<SheetState>,
    animator: Rc<dyn Animator<SheetFrame>>,
}

/// Which part of the frame an animation owns.
#[derive(Clone, Copy)]
enum Channel {
    /// Translation and dimming, driven by one present or dismiss run.
    Presentation { generation: u64 },
    /// Height, driven by settles of one generation.
    Height { generation: u64 },
}

fn frame_writer(shared: Weak<Shared>, channel: Channel) -> impl FnMut(SheetFrame) + 'static {
    move |value: SheetFrame| {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let update = {
            let mut state = shared.state.borrow_mut();
            match channel {
                Channel::Presentation { generation } => {
                    if generation != state.presentation_generation {
                        return;
                    }
                    state.frame.translation = value.translation;
                    state.frame.dimming_alpha = value.dimming_alpha;
                }
                Channel::Height { generation } => {
                    if generation != state.settle_generation {
                        return;
                    }
                    state.frame.height = value.height;
                }
            }
            state.host_frame()
        };
        if let Some((host, frame)) = update {
            host.apply(frame);
        }
    }
}

fn container_size(metrics: Option<&ContainerMetrics>) -> Size {
    metrics.map(|metrics| metrics.size).unwrap_or(Size::ZERO)
}

/// Handle to one bottom sheet. Clones share the sheet.
#[derive(Clone)]
pub struct SheetController {
    shared: Rc<Shared>,
}

impl SheetController {
    /// `initial_id` picks the starting detent when it names one of `detents`.
    pub fn new(
        detents: Vec<Detent>,
        initial_id: Option<&DetentId>,
        config: SheetConfig,
        clock: FrameClock,
    ) -> Self {
        let animator = config
            .animation_style
            .animator::<SheetFrame>(clock, ANIMATION_DURATION);
        let state = SheetState {
            model: DetentModel::new(detents, initial_id),
            config,
            events: EventRegistry::default(),
            engine: GestureEngine::new(),
            presentation: PresentationState::Idle,
            host: None,
            scroll: None,
            scroll_subscription: None,
            recognizers: SmallVec::new(),
            frame: SheetFrame::default(),
            committed_height: 0.0,
            settle_generation: 0,
            presentation_generation: 0,
            presentation_transition: None,
        };
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(state),
                animator,
            }),
        }
    }

    /// Sheet for `content`, using its detents or sizing to it when it has none.
    pub fn for_content<C>(
        content: &Rc<C>,
        initial_id: Option<&DetentId>,
        config: SheetConfig,
        clock: FrameClock,
    ) -> Self
    where
        C: SheetContent + 'static,
    {
        let mut detents = content.detents();
        if detents.is_empty() {
            detents.push(Detent::self_sized(content));
        }
        Self::new(detents, initial_id, config, clock)
    }

    pub(crate) fn from_shared(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    /// Bridge that does not keep this sheet alive.
    pub fn bridge(&self) -> WeakSheetBridge {
        WeakSheetBridge::new(Rc::downgrade(&self.shared))
    }

    pub fn register_events(&self, events: SheetEvents) {
        self.shared.state.borrow_mut().events.register(events);
    }

    /// Installs the sheet into `host`, replacing any earlier installation.
    ///
    /// Observers registered before this call are dropped with the old
    /// installation.
    pub fn configure(&self, host: Rc<dyn SheetHost>, scroll: Option<Rc<dyn NestedScrollView>>) {
        self.invalidate();

        let (chrome, dismiss_by_tap) = {
            let state = self.shared.state.borrow();
            (state.config.chrome(), state.config.dismiss_by_tap)
        };
        host.install(&chrome);
        host.set_content_visible(false);
        let frame = {
            let mut state = self.shared.state.borrow_mut();
            state.host = Some(Rc::clone(&host));
            state.frame = SheetFrame::default();
            state.committed_height = 0.0;
            state.frame
        };
        host.apply(frame);

        self.setup_initial_detents();

        if dismiss_by_tap {
            self.attach(&host, Recognizer::DimmingTap);
        }
        self.attach(&host, Recognizer::SheetPan);

        if let Some(scroll) = scroll {
            let shared = Rc::downgrade(&self.shared);
            let subscription = scroll.subscribe(Box::new(move |scroll| {
                if let Some(shared) = shared.upgrade() {
                    SheetController::from_shared(shared)
                        .dispatch(GestureEvent::ScrollOffsetChanged { scroll });
                }
            }));
            {
                let mut state = self.shared.state.borrow_mut();
                state.scroll = Some(scroll);
                state.scroll_subscription = Some(subscription);
            }
            self.attach(&host, Recognizer::ScrollPan);
        }
        log::debug!("sheet configured at {}", self.current_detent_id());
    }

    /// [`configure`](Self::configure) with the content's scroll view, then
    /// hands the content a bridge back to this sheet.
    pub fn configure_content<C>(&self, host: Rc<dyn SheetHost>, content: &Rc<C>)
    where
        C: SheetContent + 'static,
    {
        self.configure(host, content.nested_scroll());
        content.attach_bridge(Rc::new(self.bridge()));
    }

    /// Slides the sheet in and fades the dimming layer up. Completes right
    /// away when already presented. A present that interrupts a dismiss
    /// reverses it from where it is.
    pub fn present(&self, completion: impl FnOnce() + 'static) {
        let prepared = {
            let mut state = self.shared.state.borrow_mut();
            if state.is_showing() {
                None
            } else {
                let resumed = state.presentation_transition.is_some();
                if !resumed {
                    state.frame.translation = state.committed_height;
                }
                let generation = state.begin_presentation(AnimationKind::Present);
                let host = state.host.clone().filter(|_| !resumed);
                Some((generation, state.frame, state.config.dimming_alpha, host))
            }
        };
        let Some((generation, from, dimming_alpha, host)) = prepared else {
            completion();
            return;
        };
        if let Some(host) = host {
            host.apply(from);
            host.set_content_visible(true);
        }

        let to = from.with_translation(0.0).with_dimming_alpha(dimming_alpha);
        let shared = Rc::downgrade(&self.shared);
        let writer = frame_writer(shared.clone(), Channel::Presentation { generation });
        self.shared.animator.execute(
            AnimationKind::Present,
            true,
            Transition::new(from, to, writer),
            Box::new(move |_| {
                let current = match shared.upgrade() {
                    Some(shared) => SheetController::from_shared(shared).finish_present(generation),
                    None => true,
                };
                if current {
                    completion();
                }
            }),
        );
    }

    fn finish_present(&self, generation: u64) -> bool {
        let current = self
            .shared
            .state
            .borrow_mut()
            .end_presentation(generation, PresentationState::Presented);
        if current {
            log::debug!("sheet presented");
        } else {
            log::trace!("present {generation} superseded");
        }
        current
    }

    /// Slides the sheet out. Observers hear `will_dismiss` even when the sheet
    /// is not showing, in which case this completes right away. A later
    /// present or dismiss takes over a running dismiss, and the superseded
    /// completion is dropped.
    pub fn dismiss(&self, completion: impl FnOnce() + 'static) {
        self.emit(SheetEvents::will_dismiss);

        let prepared = {
            let mut state = self.shared.state.borrow_mut();
            let animating = state.presentation_transition.is_some();
            if state.presentation == PresentationState::Presented || animating {
                let generation = state.begin_presentation(AnimationKind::Dismiss);
                Some((generation, state.frame, state.committed_height))
            } else {
                None
            }
        };
        let Some((generation, from, height)) = prepared else {
            completion();
            return;
        };

        let to = from.with_translation(height).with_dimming_alpha(0.0);
        let shared = Rc::downgrade(&self.shared);
        let writer = frame_writer(shared.clone(), Channel::Presentation { generation });
        self.shared.animator.execute(
            AnimationKind::Dismiss,
            true,
            Transition::new(from, to, writer),
            Box::new(move |_| {
                let current = match shared.upgrade() {
                    Some(shared) => SheetController::from_shared(shared).finish_dismiss(generation),
                    None => true,
                };
                if current {
                    completion();
                }
            }),
        );
    }

    fn finish_dismiss(&self, generation: u64) -> bool {
        let host = {
            let mut state = self.shared.state.borrow_mut();
            if !state.end_presentation(generation, PresentationState::Dismissed) {
                log::trace!("dismiss {generation} superseded");
                return false;
            }
            state.host.clone()
        };
        log::debug!("sheet dismissed");
        self.emit(SheetEvents::did_dismiss);
        if let Some(host) = host {
            host.set_content_visible(false);
        }
        true
    }

    /// Moves to the detent with `id`. Unknown ids and the current id are ignored.
    pub fn set_detent(&self, id: &DetentId, animated: bool) {
        let detent = {
            let state = self.shared.state.borrow();
            state
                .model
                .detent(id)
                .filter(|detent| detent.id() != state.model.current_id())
                .cloned()
        };
        match detent {
            Some(detent) => self.apply_detent(detent, animated),
            None => log::debug!("set_detent({id}) ignored"),
        }
    }

    /// Replaces the detent set, staying on the current detent if the new set
    /// still has its id. Misuse is logged and ignored.
    pub fn invalidate_detents(&self, detents: Vec<Detent>) {
        match self.try_invalidate_detents(detents) {
            Ok(()) => {}
            Err(error @ SheetError::NotAttached) => {
                log::debug!("detent invalidation ignored: {error}")
            }
            Err(error) => log::warn!("{error}"),
        }
    }

    pub fn try_invalidate_detents(&self, detents: Vec<Detent>) -> Result<(), SheetError> {
        if self.host().is_none() {
            return Err(SheetError::NotAttached);
        }
        if detents.is_empty() {
            return Err(SheetError::NoDetents);
        }

        let metrics = self.container_metrics();
        let (change, next) = {
            let mut state = self.shared.state.borrow_mut();
            let previous = state.model.current_id().clone();
            state.model.invalidate_height_cache();
            let sorted = state.model.sort_by_height(detents, metrics.as_ref());
            state
                .model
                .set_resorted_detents(sorted, container_size(metrics.as_ref()));
            let next = state
                .model
                .detent(&previous)
                .or_else(|| state.model.first())
                .cloned();
            // Observers hear about the net change only.
            let change = match &next {
                Some(next) => {
                    state.model.set_current(next.clone());
                    (next.id() != &previous).then(|| next.id().clone())
                }
                None => None,
            };
            (change, next)
        };
        self.emit_detent_change(change);
        if let Some(next) = next {
            self.apply_detent(next, true);
        }
        Ok(())
    }

    /// Tears the installation down: stops observing the scroll view, detaches
    /// every recognizer, removes the chrome and forgets all observers. Safe to
    /// call repeatedly.
    pub fn invalidate(&self) {
        let (subscription, host, recognizers) = {
            let mut state = self.shared.state.borrow_mut();
            state.model.invalidate_height_cache();
            state.events.clear();
            state.engine.reset();
            state.settle_generation += 1;
            state.scroll = None;
            (
                state.scroll_subscription.take(),
                state.host.take(),
                std::mem::take(&mut state.recognizers),
            )
        };
        drop(subscription);
        if let Some(host) = host {
            for recognizer in recognizers {
                host.detach_recognizer(recognizer);
            }
            host.uninstall();
            log::debug!("sheet invalidated");
        }
    }

    pub fn handle_sheet_pan(&self, sample: PanSample) {
        if self.is_attached(Recognizer::SheetPan) {
            self.dispatch(GestureEvent::SheetPan(sample));
        }
    }

    pub fn handle_scroll_pan(&self, sample: PanSample) {
        if !self.is_attached(Recognizer::ScrollPan) {
            return;
        }
        let Some(scroll) = self.scroll_view() else {
            return;
        };
        let scroll = scroll.metrics();
        self.dispatch(GestureEvent::ScrollPan { sample, scroll });
    }

    pub fn handle_dimming_tap(&self) {
        if !self.is_attached(Recognizer::DimmingTap) {
            return;
        }
        self.emit(SheetEvents::did_tap_dimming_view);
        self.dismiss(|| {});
    }

    pub fn current_detent_id(&self) -> DetentId {
        self.shared.state.borrow().model.current_id().clone()
    }

    /// Ids of the detent set, shortest first once configured.
    pub fn detent_ids(&self) -> Vec<DetentId> {
        let state = self.shared.state.borrow();
        state.model.detents().map(|detent| detent.id().clone()).collect()
    }

    pub fn presentation_state(&self) -> PresentationState {
        self.shared.state.borrow().presentation
    }

    /// A pan is moving the sheet.
    pub fn is_tracking(&self) -> bool {
        self.shared.state.borrow().engine.is_tracking()
    }

    /// A height change is animating.
    pub fn is_decelerating(&self) -> bool {
        self.shared.state.borrow().engine.is_settling()
    }

    pub fn displayed_frame(&self) -> SheetFrame {
        self.shared.state.borrow().frame
    }

    /// Height the sheet rests at or is animating toward.
    pub fn sheet_height(&self) -> f32 {
        self.shared.state.borrow().committed_height
    }

    pub fn animation_duration(&self) -> Duration {
        self.shared.animator.duration()
    }

    pub fn attached_recognizers(&self) -> Vec<Recognizer> {
        self.shared.state.borrow().recognizers.to_vec()
    }

    pub fn registered_event_count(&self) -> usize {
        self.shared.state.borrow().events.len()
    }

    pub fn config(&self) -> SheetConfig {
        self.shared.state.borrow().config.clone()
    }

    fn setup_initial_detents(&self) {
        let metrics = self.container_metrics();
        let change = {
            let mut state = self.shared.state.borrow_mut();
            let detents = state.model.to_vec();
            let sorted = state.model.sort_by_height(detents, metrics.as_ref());
            state
                .model
                .set_resorted_detents(sorted, container_size(metrics.as_ref()))
        };
        self.emit_detent_change(change);
        let current = self.shared.state.borrow().model.current().clone();
        self.apply_detent(current, false);
    }

    /// Makes `detent` current and animates the height to it if it differs
    /// from the committed height.
    fn apply_detent(&self, detent: Detent, animated: bool) {
        if self.host().is_none() {
            return;
        }
        let metrics = self.container_metrics();
        let (change, settle) = {
            let mut state = self.shared.state.borrow_mut();
            let height = state.model.height_for(&detent, metrics.as_ref());
            let change = state.model.set_current(detent);
            let settle = if height != state.committed_height {
                state.committed_height = height;
                state.settle_generation += 1;
                let context = state.gesture_context(metrics.as_ref());
                state.engine.handle(&GestureEvent::SettleStarted, &context);
                Some((state.settle_generation, state.frame, height))
            } else {
                None
            };
            (change, settle)
        };
        self.emit_detent_change(change);

        let Some((generation, from, height)) = settle else {
            return;
        };
        log::debug!("settling to {height} (animated: {animated})");
        let shared = Rc::downgrade(&self.shared);
        let writer = frame_writer(shared.clone(), Channel::Height { generation });
        self.shared.animator.execute(
            AnimationKind::HeightChange,
            animated,
            Transition::new(from, from.with_height(height), writer),
            Box::new(move |_| {
                if let Some(shared) = shared.upgrade() {
                    SheetController::from_shared(shared).finish_settle(generation);
                }
            }),
        );
    }

    fn finish_settle(&self, generation: u64) {
        if self.shared.state.borrow().settle_generation != generation {
            log::trace!("settle {generation} superseded");
            return;
        }
        let scroll = self.scroll_view().map(|scroll| scroll.metrics());
        self.dispatch(GestureEvent::SettleFinished { scroll });
    }

    fn dispatch(&self, event: GestureEvent) {
        let metrics = self.container_metrics();
        let effects = {
            let mut state = self.shared.state.borrow_mut();
            let context = state.gesture_context(metrics.as_ref());
            let effects = state.engine.handle(&event, &context);
            if effects
                .iter()
                .any(|effect| matches!(effect, Effect::UpdateHeight(_)))
            {
                // A direct height write takes over from any running settle.
                state.settle_generation += 1;
            }
            effects
        };
        for effect in effects {
            self.perform(effect);
        }
    }

    fn perform(&self, effect: Effect) {
        match effect {
            Effect::ResetScrollOffset => {
                if let Some(scroll) = self.scroll_view() {
                    let resting = scroll.metrics().resting_offset();
                    scroll.set_content_offset(resting);
                }
            }
            Effect::SnapToDetent(id) => {
                let change = {
                    let mut state = self.shared.state.borrow_mut();
                    match state.lookup(&id) {
                        Some(detent) => state.model.set_current(detent),
                        None => None,
                    }
                };
                self.emit_detent_change(change);
            }
            Effect::UpdateHeight(height) => {
                let update = {
                    let mut state = self.shared.state.borrow_mut();
                    state.committed_height = height;
                    state.frame.height = height;
                    state.host_frame()
                };
                if let Some((host, frame)) = update {
                    host.apply(frame);
                }
            }
            Effect::SwipeDismiss => {
                self.emit(SheetEvents::swipe_will_dismiss);
                self.dismiss(|| {});
            }
            Effect::SettleTo(id) => {
                let detent = self.shared.state.borrow().lookup(&id);
                if let Some(detent) = detent {
                    self.apply_detent(detent, true);
                }
            }
        }
    }

    fn attach(&self, host: &Rc<dyn SheetHost>, recognizer: Recognizer) {
        self.shared.state.borrow_mut().recognizers.push(recognizer);
        host.attach_recognizer(recognizer);
    }

    fn is_attached(&self, recognizer: Recognizer) -> bool {
        self.shared.state.borrow().recognizers.contains(&recognizer)
    }

    fn host(&self) -> Option<Rc<dyn SheetHost>> {
        self.shared.state.borrow().host.clone()
    }

    fn scroll_view(&self) -> Option<Rc<dyn NestedScrollView>> {
        self.shared.state.borrow().scroll.clone()
    }

    fn container_metrics(&self) -> Option<ContainerMetrics> {
        let host = self.host()?;
        let size = host.container_size()?;
        Some(ContainerMetrics::new(size, host.safe_area_insets()))
    }

    fn emit(&self, notify: impl Fn(&SheetEvents)) {
        let listeners = self.shared.state.borrow().events.snapshot();
        for listener in &listeners {
            notify(listener);
        }
    }

    fn emit_detent_change(&self, change: Option<DetentId>) {
        if let Some(id) = change {
            self.emit(|events| events.did_change_detent(&id));
        }
    }
}

impl std::fmt::Debug for SheetController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("SheetController")
            .field("current", state.model.current_id())
            .field("presentation", &state.presentation)
            .field("tracking", &state.engine.tracking())
            .field("frame", &state.frame)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
