use std::cell::RefCell;
use std::rc::Rc;

use sheetkit::{DetentId, SheetEvents};

#[derive(Debug, Clone, PartialEq)]
pub enum LoggedEvent {
    ChangedDetent(DetentId),
    TappedDimming,
    SwipeWillDismiss,
    WillDismiss,
    DidDismiss,
}

/// Records every sheet event in order.
#[derive(Clone, Default)]
pub struct EventLog {
    entries: Rc<RefCell<Vec<LoggedEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer that appends to this log.
    pub fn events(&self) -> SheetEvents {
        let log = |event: LoggedEvent| {
            let entries = Rc::clone(&self.entries);
            move || entries.borrow_mut().push(event.clone())
        };
        let entries = Rc::clone(&self.entries);
        SheetEvents::new()
            .on_change_detent(move |id| {
                entries
                    .borrow_mut()
                    .push(LoggedEvent::ChangedDetent(id.clone()))
            })
            .on_tap_dimming_view(log(LoggedEvent::TappedDimming))
            .on_swipe_will_dismiss(log(LoggedEvent::SwipeWillDismiss))
            .on_will_dismiss(log(LoggedEvent::WillDismiss))
            .on_did_dismiss(log(LoggedEvent::DidDismiss))
    }

    pub fn entries(&self) -> Vec<LoggedEvent> {
        self.entries.borrow().clone()
    }

    pub fn detent_changes(&self) -> Vec<DetentId> {
        self.entries
            .borrow()
            .iter()
            .filter_map(|event| match event {
                LoggedEvent::ChangedDetent(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &LoggedEvent) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|logged| *logged == event)
            .count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
