use std::rc::Weak;

use sheetkit_foundation::{Detent, DetentId};

use crate::controller::{SheetController, Shared};
use crate::events::SheetEvents;

/// The part of a sheet its content may drive.
pub trait SheetBridge {
    /// `None` once the sheet is gone.
    fn current_detent_id(&self) -> Option<DetentId>;

    fn register_events(&self, events: SheetEvents);

    fn set_detent(&self, id: &DetentId, animated: bool);

    fn invalidate_detents(&self, detents: Vec<Detent>);
}

impl SheetBridge for SheetController {
    fn current_detent_id(&self) -> Option<DetentId> {
        Some(SheetController::current_detent_id(self))
    }

    fn register_events(&self, events: SheetEvents) {
        SheetController::register_events(self, events);
    }

    fn set_detent(&self, id: &DetentId, animated: bool) {
        SheetController::set_detent(self, id, animated);
    }

    fn invalidate_detents(&self, detents: Vec<Detent>) {
        SheetController::invalidate_detents(self, detents);
    }
}

/// Bridge that does not keep the sheet alive. Handed to content so the
/// content can hold it without a reference cycle.
#[derive(Clone)]
pub struct WeakSheetBridge {
    shared: Weak<Shared>,
}

impl WeakSheetBridge {
    pub(crate) fn new(shared: Weak<Shared>) -> Self {
        Self { shared }
    }

    pub fn upgrade(&self) -> Option<SheetController> {
        self.shared.upgrade().map(SheetController::from_shared)
    }
}

impl SheetBridge for WeakSheetBridge {
    fn current_detent_id(&self) -> Option<DetentId> {
        self.upgrade().map(|sheet| sheet.current_detent_id())
    }

    fn register_events(&self, events: SheetEvents) {
        if let Some(sheet) = self.upgrade() {
            sheet.register_events(events);
        }
    }

    fn set_detent(&self, id: &DetentId, animated: bool) {
        if let Some(sheet) = self.upgrade() {
            sheet.set_detent(id, animated);
        }
    }

    fn invalidate_detents(&self, detents: Vec<Detent>) {
        match self.upgrade() {
            Some(sheet) => sheet.invalidate_detents(detents),
            None => log::debug!("sheet is gone, ignoring detent invalidation"),
        }
    }
}
