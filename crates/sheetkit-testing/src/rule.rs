use std::rc::Rc;
use std::time::Duration;

use sheetkit::{
    Detent, DetentId, NestedScrollView, PanPhase, PanSample, SheetConfig, SheetController,
    SheetHost,
};
use sheetkit_core::{FrameClock, Runtime, RuntimeHandle};
use sheetkit_ui_graphics::{EdgeInsets, Size};

use crate::event_log::EventLog;
use crate::fakes::{FakeHost, FakeScrollView};

/// 60 Hz.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Frames [`SheetTestRule::pump_until_idle`] runs before giving up.
const MAX_IDLE_FRAMES: usize = 600;

/// Headless harness for exercising a sheet in tests.
///
/// Owns a runtime whose frames only advance when asked, a [`FakeHost`], an
/// optional [`FakeScrollView`] and an [`EventLog`] that is registered on every
/// sheet the rule shows.
pub struct SheetTestRule {
    runtime: Runtime,
    frame_time_nanos: u64,
    host: Rc<FakeHost>,
    scroll: Option<Rc<FakeScrollView>>,
    log: EventLog,
}

impl SheetTestRule {
    pub fn new(container: Size) -> Self {
        Self {
            runtime: Runtime::headless(),
            frame_time_nanos: 0,
            host: FakeHost::new(container),
            scroll: None,
            log: EventLog::new(),
        }
    }

    pub fn with_safe_area(self, insets: EdgeInsets) -> Self {
        self.host.set_safe_area(insets);
        self
    }

    /// Gives sheets shown by this rule a nested scroll view.
    pub fn with_scroll_view(mut self) -> Self {
        self.scroll = Some(FakeScrollView::new());
        self
    }

    pub fn clock(&self) -> FrameClock {
        self.runtime.frame_clock()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn host(&self) -> &Rc<FakeHost> {
        &self.host
    }

    pub fn scroll(&self) -> Option<&Rc<FakeScrollView>> {
        self.scroll.as_ref()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    /// Creates a sheet, configures it into the fake host and starts logging
    /// its events.
    pub fn show(
        &mut self,
        detents: Vec<Detent>,
        initial: Option<DetentId>,
        config: SheetConfig,
    ) -> SheetController {
        let sheet = SheetController::new(detents, initial.as_ref(), config, self.clock());
        self.attach(&sheet);
        sheet
    }

    /// Configures an existing sheet into the fake host.
    pub fn attach(&mut self, sheet: &SheetController) {
        let host: Rc<dyn SheetHost> = self.host.clone();
        let scroll = self
            .scroll
            .clone()
            .map(|scroll| scroll as Rc<dyn NestedScrollView>);
        sheet.configure(host, scroll);
        sheet.register_events(self.log.events());
    }

    /// Runs one frame. Returns how many frame callbacks ran.
    pub fn advance_frame(&mut self) -> usize {
        self.frame_time_nanos += FRAME_NANOS;
        self.runtime
            .handle()
            .drain_frame_callbacks(self.frame_time_nanos)
    }

    /// Runs frames covering at least `duration`.
    pub fn advance_by(&mut self, duration: Duration) {
        let frames = duration.as_nanos().div_ceil(FRAME_NANOS as u128);
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Runs frames until no animation or deferred completion is pending.
    /// Returns the number of frames run.
    pub fn pump_until_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.runtime.handle().has_frame_callbacks() {
            if frames == MAX_IDLE_FRAMES {
                log::warn!("sheet still animating after {MAX_IDLE_FRAMES} frames");
                break;
            }
            self.advance_frame();
            frames += 1;
        }
        frames
    }

    /// Drags the sheet surface through `translations` and releases it with
    /// `release_velocity`. Frames are not advanced.
    pub fn drag_sheet(&self, sheet: &SheetController, translations: &[f32], release_velocity: f32) {
        sheet.handle_sheet_pan(PanSample::vertical(PanPhase::Began, 0.0, 0.0));
        for &translation in translations {
            sheet.handle_sheet_pan(PanSample::vertical(PanPhase::Changed, translation, 0.0));
        }
        let last = translations.last().copied().unwrap_or(0.0);
        sheet.handle_sheet_pan(PanSample::vertical(
            PanPhase::Ended,
            last,
            release_velocity,
        ));
    }

    /// Drags the nested scroll view. The fake scroll view reports tracking for
    /// the duration of the drag. Does nothing without a scroll view.
    pub fn drag_scroll(
        &self,
        sheet: &SheetController,
        translations: &[f32],
        drag_velocity: f32,
        release_velocity: f32,
    ) {
        let Some(scroll) = &self.scroll else {
            return;
        };
        scroll.set_tracking(true);
        sheet.handle_scroll_pan(PanSample::vertical(PanPhase::Began, 0.0, drag_velocity));
        for &translation in translations {
            sheet.handle_scroll_pan(PanSample::vertical(
                PanPhase::Changed,
                translation,
                drag_velocity,
            ));
        }
        scroll.set_tracking(false);
        let last = translations.last().copied().unwrap_or(0.0);
        sheet.handle_scroll_pan(PanSample::vertical(
            PanPhase::Ended,
            last,
            release_velocity,
        ));
    }
}
