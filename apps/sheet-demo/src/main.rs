mod console_host;

use std::rc::Rc;
use std::time::Duration;

use sheetkit::{
    Detent, DetentId, PanPhase, PanSample, SheetConfig, SheetController, SheetEvents,
};
use sheetkit_core::{Clock, Runtime, StdClock};
use sheetkit_ui_graphics::{Color, Dp, EdgeInsets, Size};

use console_host::ConsoleHost;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Pumps frames in real time until nothing is animating.
fn run_until_idle(runtime: &Runtime, clock: &StdClock) {
    let handle = runtime.handle();
    while handle.has_frame_callbacks() {
        handle.drain_frame_callbacks(clock.now_nanos());
        std::thread::sleep(FRAME_INTERVAL);
    }
}

fn drag(sheet: &SheetController, translations: &[f32], release_velocity: f32) {
    sheet.handle_sheet_pan(PanSample::vertical(PanPhase::Began, 0.0, 0.0));
    for &translation in translations {
        sheet.handle_sheet_pan(PanSample::vertical(PanPhase::Changed, translation, 0.0));
    }
    let last = translations.last().copied().unwrap_or(0.0);
    sheet.handle_sheet_pan(PanSample::vertical(PanPhase::Ended, last, release_velocity));
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== SheetKit headless walkthrough ===");
    println!("Run with RUST_LOG=debug to see every frame.");
    println!();

    let runtime = Runtime::headless();
    let clock = StdClock::new();
    let host = Rc::new(ConsoleHost::new(
        Size::new(390.0, 844.0),
        EdgeInsets::top(47.0),
    ));

    let peek = DetentId::new("peek");
    let detents = vec![
        Detent::Large,
        Detent::Medium,
        Detent::custom_with_id(peek.clone(), |context| context.content_size.height * 0.25),
    ];
    let config = SheetConfig::default()
        .with_dimming(Color::BLACK, 0.4)
        .with_corner_radius(Dp(16.0))
        .with_dragger(Color::SYSTEM_GRAY3);
    let sheet = SheetController::new(detents, Some(&DetentId::MEDIUM), config, runtime.frame_clock());

    sheet.configure(host.clone(), None);
    sheet.register_events(
        SheetEvents::new()
            .on_change_detent(|id| log::info!("detent changed to {id}"))
            .on_swipe_will_dismiss(|| log::info!("swipe will dismiss"))
            .on_will_dismiss(|| log::info!("will dismiss"))
            .on_did_dismiss(|| log::info!("did dismiss")),
    );
    run_until_idle(&runtime, &clock);

    sheet.present(|| log::info!("presented"));
    run_until_idle(&runtime, &clock);

    log::info!("dragging up by 200");
    drag(&sheet, &[-80.0, -160.0, -200.0], 0.0);
    run_until_idle(&runtime, &clock);
    log::info!("resting at {} ({:.1})", sheet.current_detent_id(), sheet.sheet_height());

    sheet.set_detent(&peek, true);
    run_until_idle(&runtime, &clock);
    log::info!("resting at {} ({:.1})", sheet.current_detent_id(), sheet.sheet_height());

    log::info!("flicking down");
    drag(&sheet, &[30.0, 60.0], 900.0);
    run_until_idle(&runtime, &clock);

    sheet.invalidate();
    println!();
    println!("Applied {} frames.", host.frames_applied());
}
