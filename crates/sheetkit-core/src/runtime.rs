use crate::frame_clock::FrameClock;
use crate::platform::{FrameScheduler, NoopScheduler};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::thread::ThreadId;

pub type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct RuntimeInner {
    scheduler: Rc<dyn FrameScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    ui_thread_id: ThreadId,
}

impl RuntimeInner {
    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        if !self.needs_frame.replace(true) {
            self.scheduler.schedule_frame();
        }
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        // A callback may cancel its own registration while the queue is being drained.
        let Ok(mut callbacks) = self.frame_callbacks.try_borrow_mut() else {
            return;
        };
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        if callbacks.is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) -> usize {
        let pending: Vec<Box<dyn FnOnce(u64) + 'static>> = {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            callbacks
                .drain(..)
                .filter_map(|mut entry| entry.callback.take())
                .collect()
        };
        self.needs_frame.set(false);
        let count = pending.len();
        for callback in pending {
            callback(frame_time_nanos);
        }
        if !self.frame_callbacks.borrow().is_empty() {
            self.needs_frame.set(true);
        }
        count
    }
}

/// Owner of the frame-callback queue. Dropping it makes every handle inert.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                scheduler,
                needs_frame: Cell::new(false),
                frame_callbacks: RefCell::new(VecDeque::new()),
                next_frame_callback_id: Cell::new(1),
                ui_thread_id: std::thread::current().id(),
            }),
        }
    }

    /// Runtime whose frames are pumped by the caller.
    pub fn headless() -> Self {
        Self::new(Rc::new(NoopScheduler))
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.handle().frame_clock()
    }
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        let inner = self.inner.upgrade()?;
        self.assert_ui_thread_with(&inner);
        Some(inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Runs every callback queued before this call. Callbacks registered while
    /// draining wait for the next frame. Returns how many callbacks ran.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) -> usize {
        match self.inner.upgrade() {
            Some(inner) => {
                log::trace!("draining frame callbacks at {frame_time_nanos}ns");
                inner.drain_frame_callbacks(frame_time_nanos)
            }
            None => 0,
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| !inner.frame_callbacks.borrow().is_empty())
            .unwrap_or(false)
    }

    pub fn needs_frame(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.needs_frame.get())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn assert_ui_thread_with(&self, inner: &RuntimeInner) {
        debug_assert_eq!(
            std::thread::current().id(),
            inner.ui_thread_id,
            "frame callback registered off the runtime's UI thread"
        );
    }
}
