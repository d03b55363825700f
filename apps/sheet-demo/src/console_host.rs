//! Host that prints what a real container would draw.

use std::cell::Cell;

use sheetkit::{Recognizer, SheetChrome, SheetFrame, SheetHost};
use sheetkit_ui_graphics::{EdgeInsets, Size};

pub struct ConsoleHost {
    size: Size,
    safe_area: EdgeInsets,
    frames: Cell<usize>,
}

impl ConsoleHost {
    pub fn new(size: Size, safe_area: EdgeInsets) -> Self {
        Self {
            size,
            safe_area,
            frames: Cell::new(0),
        }
    }

    pub fn frames_applied(&self) -> usize {
        self.frames.get()
    }
}

impl SheetHost for ConsoleHost {
    fn container_size(&self) -> Option<Size> {
        Some(self.size)
    }

    fn safe_area_insets(&self) -> EdgeInsets {
        self.safe_area
    }

    fn install(&self, chrome: &SheetChrome) {
        log::info!(
            "install: corner radius {:?}, dragger {}",
            chrome.corner_radius,
            if chrome.dragger.is_some() { "shown" } else { "hidden" }
        );
    }

    fn uninstall(&self) {
        log::info!("uninstall");
    }

    fn apply(&self, frame: SheetFrame) {
        self.frames.set(self.frames.get() + 1);
        log::debug!(
            "frame: height {:.1}, translation {:.1}, dimming {:.2}",
            frame.height,
            frame.translation,
            frame.dimming_alpha
        );
    }

    fn set_content_visible(&self, visible: bool) {
        log::info!("content visible: {visible}");
    }

    fn attach_recognizer(&self, recognizer: Recognizer) {
        log::info!("attach {recognizer:?}");
    }

    fn detach_recognizer(&self, recognizer: Recognizer) {
        log::info!("detach {recognizer:?}");
    }
}
