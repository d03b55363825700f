//! Interfaces the sheet expects from its surroundings.

use std::rc::Rc;

use sheetkit_core::Subscription;
use sheetkit_foundation::{Detent, PreferredHeight, ScrollMetrics};
use sheetkit_ui_graphics::{EdgeInsets, Size};

use crate::bridge::SheetBridge;
use crate::config::SheetChrome;
use crate::frame::SheetFrame;

/// Input sources the controller listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognizer {
    /// Pan on the sheet surface. Delivered through `handle_sheet_pan`.
    SheetPan,
    /// Tap on the dimmed area. Delivered through `handle_dimming_tap`.
    DimmingTap,
    /// Pan on the nested scroll view, recognized alongside the scroll view's
    /// own pan. Delivered through `handle_scroll_pan`.
    ScrollPan,
}

/// The container the sheet lives in.
///
/// The host lays the dimming layer over the whole container and pins the
/// sheet to its bottom edge at the height it is given.
pub trait SheetHost {
    /// `None` while the container is not laid out.
    fn container_size(&self) -> Option<Size>;

    fn safe_area_insets(&self) -> EdgeInsets;

    /// Adds the dimming layer, the sheet surface and the content.
    fn install(&self, chrome: &SheetChrome);

    /// Removes everything [`install`](SheetHost::install) added.
    fn uninstall(&self);

    fn apply(&self, frame: SheetFrame);

    fn set_content_visible(&self, visible: bool);

    fn attach_recognizer(&self, recognizer: Recognizer);

    fn detach_recognizer(&self, recognizer: Recognizer);
}

/// Scrollable content inside the sheet.
pub trait NestedScrollView {
    fn metrics(&self) -> ScrollMetrics;

    /// Moves the content without animation. The offset stream fires if it changed.
    fn set_content_offset(&self, offset: f32);

    /// Streams metrics whenever the content offset changes.
    fn subscribe(&self, sink: Box<dyn Fn(ScrollMetrics)>) -> Subscription;
}

/// Content that describes its own sheet.
pub trait SheetContent: PreferredHeight {
    /// Detents for the sheet. An empty list sizes the sheet to the content.
    fn detents(&self) -> Vec<Detent>;

    fn nested_scroll(&self) -> Option<Rc<dyn NestedScrollView>> {
        None
    }

    /// Gives the content a way to drive the sheet that presents it.
    fn attach_bridge(&self, _bridge: Rc<dyn SheetBridge>) {}
}
