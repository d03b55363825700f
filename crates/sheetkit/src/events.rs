//! Lifecycle notifications for sheet observers.

use std::rc::Rc;

use sheetkit_foundation::DetentId;
use smallvec::SmallVec;

type Callback = Box<dyn Fn()>;

/// One observer's set of callbacks. Unset callbacks are skipped.
#[derive(Default)]
pub struct SheetEvents {
    did_change_detent: Option<Box<dyn Fn(&DetentId)>>,
    did_tap_dimming_view: Option<Callback>,
    swipe_will_dismiss: Option<Callback>,
    will_dismiss: Option<Callback>,
    did_dismiss: Option<Callback>,
}

impl SheetEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current detent changed to the given id.
    pub fn on_change_detent(mut self, callback: impl Fn(&DetentId) + 'static) -> Self {
        self.did_change_detent = Some(Box::new(callback));
        self
    }

    pub fn on_tap_dimming_view(mut self, callback: impl Fn() + 'static) -> Self {
        self.did_tap_dimming_view = Some(Box::new(callback));
        self
    }

    /// A released drag is about to dismiss the sheet.
    pub fn on_swipe_will_dismiss(mut self, callback: impl Fn() + 'static) -> Self {
        self.swipe_will_dismiss = Some(Box::new(callback));
        self
    }

    /// Raised on every dismiss request, even when the sheet is not presented.
    pub fn on_will_dismiss(mut self, callback: impl Fn() + 'static) -> Self {
        self.will_dismiss = Some(Box::new(callback));
        self
    }

    pub fn on_did_dismiss(mut self, callback: impl Fn() + 'static) -> Self {
        self.did_dismiss = Some(Box::new(callback));
        self
    }

    pub(crate) fn did_change_detent(&self, id: &DetentId) {
        if let Some(callback) = &self.did_change_detent {
            callback(id);
        }
    }

    pub(crate) fn did_tap_dimming_view(&self) {
        if let Some(callback) = &self.did_tap_dimming_view {
            callback();
        }
    }

    pub(crate) fn swipe_will_dismiss(&self) {
        if let Some(callback) = &self.swipe_will_dismiss {
            callback();
        }
    }

    pub(crate) fn will_dismiss(&self) {
        if let Some(callback) = &self.will_dismiss {
            callback();
        }
    }

    pub(crate) fn did_dismiss(&self) {
        if let Some(callback) = &self.did_dismiss {
            callback();
        }
    }
}

impl std::fmt::Debug for SheetEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetEvents")
            .field("did_change_detent", &self.did_change_detent.is_some())
            .field("did_tap_dimming_view", &self.did_tap_dimming_view.is_some())
            .field("swipe_will_dismiss", &self.swipe_will_dismiss.is_some())
            .field("will_dismiss", &self.will_dismiss.is_some())
            .field("did_dismiss", &self.did_dismiss.is_some())
            .finish()
    }
}

pub(crate) type Listeners = SmallVec<[Rc<SheetEvents>; 2]>;

/// Registered observers in registration order.
#[derive(Default)]
pub(crate) struct EventRegistry {
    listeners: Listeners,
}

impl EventRegistry {
    pub(crate) fn register(&mut self, events: SheetEvents) {
        self.listeners.push(Rc::new(events));
    }

    pub(crate) fn clear(&mut self) {
        self.listeners.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Copy of the list, so callbacks can run while the registry is unborrowed.
    pub(crate) fn snapshot(&self) -> Listeners {
        self.listeners.clone()
    }
}
