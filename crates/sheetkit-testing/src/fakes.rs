//! In-memory host and scroll view that record what the sheet asks of them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sheetkit::{NestedScrollView, Recognizer, ScrollMetrics, SheetChrome, SheetFrame, SheetHost};
use sheetkit_core::Subscription;
use sheetkit_ui_graphics::{EdgeInsets, Size};

/// Host container with a settable size and safe area.
pub struct FakeHost {
    size: Cell<Option<Size>>,
    safe_area: Cell<EdgeInsets>,
    chrome: RefCell<Option<SheetChrome>>,
    frames: RefCell<Vec<SheetFrame>>,
    content_visible: Cell<bool>,
    recognizers: RefCell<Vec<Recognizer>>,
    installs: Cell<usize>,
    uninstalls: Cell<usize>,
}

impl FakeHost {
    pub fn new(size: Size) -> Rc<Self> {
        Rc::new(Self::with_size(Some(size)))
    }

    /// A host whose container has not been laid out.
    pub fn unmeasured() -> Rc<Self> {
        Rc::new(Self::with_size(None))
    }

    fn with_size(size: Option<Size>) -> Self {
        Self {
            size: Cell::new(size),
            safe_area: Cell::new(EdgeInsets::ZERO),
            chrome: RefCell::new(None),
            frames: RefCell::new(Vec::new()),
            content_visible: Cell::new(false),
            recognizers: RefCell::new(Vec::new()),
            installs: Cell::new(0),
            uninstalls: Cell::new(0),
        }
    }

    pub fn set_container_size(&self, size: Option<Size>) {
        self.size.set(size);
    }

    pub fn set_safe_area(&self, insets: EdgeInsets) {
        self.safe_area.set(insets);
    }

    pub fn chrome(&self) -> Option<SheetChrome> {
        self.chrome.borrow().clone()
    }

    pub fn is_installed(&self) -> bool {
        self.chrome.borrow().is_some()
    }

    pub fn install_count(&self) -> usize {
        self.installs.get()
    }

    pub fn uninstall_count(&self) -> usize {
        self.uninstalls.get()
    }

    pub fn last_frame(&self) -> Option<SheetFrame> {
        self.frames.borrow().last().copied()
    }

    /// Height of the last applied frame, 0 before any frame.
    pub fn height(&self) -> f32 {
        self.last_frame().map(|frame| frame.height).unwrap_or(0.0)
    }

    pub fn frames(&self) -> Vec<SheetFrame> {
        self.frames.borrow().clone()
    }

    pub fn clear_frames(&self) {
        self.frames.borrow_mut().clear();
    }

    pub fn is_content_visible(&self) -> bool {
        self.content_visible.get()
    }

    pub fn recognizers(&self) -> Vec<Recognizer> {
        self.recognizers.borrow().clone()
    }

    pub fn has_recognizer(&self, recognizer: Recognizer) -> bool {
        self.recognizers.borrow().contains(&recognizer)
    }
}

impl SheetHost for FakeHost {
    fn container_size(&self) -> Option<Size> {
        self.size.get()
    }

    fn safe_area_insets(&self) -> EdgeInsets {
        self.safe_area.get()
    }

    fn install(&self, chrome: &SheetChrome) {
        self.installs.set(self.installs.get() + 1);
        *self.chrome.borrow_mut() = Some(chrome.clone());
    }

    fn uninstall(&self) {
        self.uninstalls.set(self.uninstalls.get() + 1);
        self.chrome.borrow_mut().take();
    }

    fn apply(&self, frame: SheetFrame) {
        self.frames.borrow_mut().push(frame);
    }

    fn set_content_visible(&self, visible: bool) {
        self.content_visible.set(visible);
    }

    fn attach_recognizer(&self, recognizer: Recognizer) {
        self.recognizers.borrow_mut().push(recognizer);
    }

    fn detach_recognizer(&self, recognizer: Recognizer) {
        self.recognizers
            .borrow_mut()
            .retain(|attached| *attached != recognizer);
    }
}

type Sink = Rc<dyn Fn(ScrollMetrics)>;

/// Scroll view whose offset stream only fires on real changes.
pub struct FakeScrollView {
    metrics: Cell<ScrollMetrics>,
    sinks: Rc<RefCell<Vec<(u64, Sink)>>>,
    next_sink: Cell<u64>,
    offset_writes: Cell<usize>,
}

impl FakeScrollView {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            metrics: Cell::new(ScrollMetrics::default()),
            sinks: Rc::new(RefCell::new(Vec::new())),
            next_sink: Cell::new(0),
            offset_writes: Cell::new(0),
        })
    }

    pub fn with_top_inset(top_inset: f32) -> Rc<Self> {
        let scroll = Self::new();
        scroll.metrics.set(ScrollMetrics {
            offset: -top_inset,
            top_inset,
            ..ScrollMetrics::default()
        });
        scroll
    }

    pub fn offset(&self) -> f32 {
        self.metrics.get().offset
    }

    /// The user's finger went down on or up from the scroll view.
    pub fn set_tracking(&self, tracking: bool) {
        let mut metrics = self.metrics.get();
        metrics.is_tracking = tracking;
        self.metrics.set(metrics);
    }

    pub fn set_decelerating(&self, decelerating: bool) {
        let mut metrics = self.metrics.get();
        metrics.is_decelerating = decelerating;
        self.metrics.set(metrics);
    }

    /// Scrolls the content as the scroll view itself would.
    pub fn scroll_to(&self, offset: f32) {
        self.move_to(offset);
    }

    /// How many times the sheet pinned the offset.
    pub fn offset_writes(&self) -> usize {
        self.offset_writes.get()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.borrow().len()
    }

    fn move_to(&self, offset: f32) {
        let mut metrics = self.metrics.get();
        if metrics.offset == offset {
            return;
        }
        metrics.offset = offset;
        self.metrics.set(metrics);
        let sinks: Vec<Sink> = self
            .sinks
            .borrow()
            .iter()
            .map(|(_, sink)| Rc::clone(sink))
            .collect();
        for sink in sinks {
            sink(metrics);
        }
    }
}

impl NestedScrollView for FakeScrollView {
    fn metrics(&self) -> ScrollMetrics {
        self.metrics.get()
    }

    fn set_content_offset(&self, offset: f32) {
        self.offset_writes.set(self.offset_writes.get() + 1);
        self.move_to(offset);
    }

    fn subscribe(&self, sink: Box<dyn Fn(ScrollMetrics)>) -> Subscription {
        let id = self.next_sink.get();
        self.next_sink.set(id + 1);
        self.sinks.borrow_mut().push((id, Rc::from(sink)));
        let sinks = Rc::downgrade(&self.sinks);
        Subscription::new(move || {
            if let Some(sinks) = sinks.upgrade() {
                sinks.borrow_mut().retain(|(sink_id, _)| *sink_id != id);
            }
        })
    }
}
