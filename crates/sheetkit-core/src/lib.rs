//! Core runtime for SheetKit
//!
//! Everything here runs on one UI thread. Animations and deferred completions
//! register frame callbacks with the runtime; the host drains them once per
//! frame with the frame timestamp.

mod frame_clock;
mod platform;
mod runtime;
mod subscription;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{Clock, FrameScheduler, NoopScheduler, StdClock};
pub use runtime::{FrameCallbackId, Runtime, RuntimeHandle};
pub use subscription::Subscription;

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
