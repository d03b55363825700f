//! Platform abstraction traits for the sheet runtime.
//!
//! The host owns the display loop. The runtime only asks it for a frame and
//! receives timestamps back through `RuntimeHandle::drain_frame_callbacks`.

use web_time::Instant;

/// Asks the host to run a frame soon.
pub trait FrameScheduler {
    fn schedule_frame(&self);
}

/// Scheduler for hosts that pump frames unconditionally (tests, headless demos).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl FrameScheduler for NoopScheduler {
    fn schedule_frame(&self) {}
}

/// Provides frame timestamps.
pub trait Clock {
    /// Nanoseconds since an arbitrary, fixed origin.
    fn now_nanos(&self) -> u64;
}

/// Wall clock backed by `web_time`, usable on native and wasm hosts.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}
