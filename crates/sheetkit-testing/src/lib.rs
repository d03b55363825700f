//! Testing utilities and harness for SheetKit

mod event_log;
mod fakes;
mod rule;

pub use event_log::{EventLog, LoggedEvent};
pub use fakes::{FakeHost, FakeScrollView};
pub use rule::{SheetTestRule, FRAME_NANOS};

pub mod prelude {
    pub use crate::{EventLog, FakeHost, FakeScrollView, LoggedEvent, SheetTestRule};
    pub use sheetkit::prelude::*;
}
