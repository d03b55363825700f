use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use sheetkit::{
    AnimationStyle, Detent, DetentId, PresentationState, Recognizer, SheetConfig, SheetError,
};
use sheetkit_testing::{LoggedEvent, SheetTestRule};
use sheetkit_ui_graphics::{EdgeInsets, Size};

fn phone() -> SheetTestRule {
    SheetTestRule::new(Size::new(390.0, 800.0))
}

fn counter() -> (Rc<Cell<usize>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    (count, move || sink.set(sink.get() + 1))
}

#[test]
fn configure_installs_hidden_sheet_at_initial_detent() {
    let mut rule = phone();
    let sheet = rule.show(
        vec![Detent::Large, Detent::Medium],
        Some(DetentId::LARGE),
        SheetConfig::default(),
    );
    let host = rule.host();

    assert!(host.is_installed());
    assert!(!host.is_content_visible());
    assert_eq!(sheet.detent_ids(), vec![DetentId::MEDIUM, DetentId::LARGE]);
    assert_eq!(sheet.current_detent_id(), DetentId::LARGE);
    assert_eq!(host.height(), 800.0);
    assert_eq!(host.last_frame().map(|frame| frame.dimming_alpha), Some(0.0));
    assert_eq!(
        host.recognizers(),
        vec![Recognizer::DimmingTap, Recognizer::SheetPan]
    );
    assert!(sheet.is_decelerating());

    rule.pump_until_idle();
    assert!(!sheet.is_decelerating());
    assert!(rule.log().entries().is_empty());
}

#[test]
fn large_detent_respects_top_safe_area() {
    let mut rule = phone().with_safe_area(EdgeInsets::top(44.0));
    let sheet = rule.show(
        vec![Detent::Medium, Detent::Large],
        Some(DetentId::LARGE),
        SheetConfig::default(),
    );

    assert_eq!(sheet.sheet_height(), 756.0);
    assert_eq!(rule.host().height(), 756.0);
}

#[test]
fn present_slides_in_and_fades_dimming_up() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, SheetConfig::default());
    rule.pump_until_idle();
    let (presented, on_presented) = counter();

    sheet.present(on_presented);
    let host = Rc::clone(rule.host());
    assert!(host.is_content_visible());
    assert_eq!(host.last_frame().map(|frame| frame.translation), Some(400.0));
    assert_eq!(presented.get(), 0);

    rule.pump_until_idle();
    let frame = host.last_frame().expect("frames applied");
    assert_eq!(frame.translation, 0.0);
    assert_eq!(frame.dimming_alpha, 0.4);
    assert_eq!(frame.height, 400.0);
    assert_eq!(presented.get(), 1);
    assert_eq!(sheet.presentation_state(), PresentationState::Presented);
}

#[test]
fn presenting_twice_completes_immediately() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium], None, SheetConfig::default());
    sheet.present(|| {});
    rule.pump_until_idle();
    let frames_before = rule.host().frames().len();
    let (presented, on_presented) = counter();

    sheet.present(on_presented);

    assert_eq!(presented.get(), 1);
    assert!(!rule.runtime_handle().has_frame_callbacks());
    assert_eq!(rule.host().frames().len(), frames_before);
}

#[test]
fn dismiss_slides_out_and_notifies() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, SheetConfig::default());
    sheet.present(|| {});
    rule.pump_until_idle();
    rule.log().clear();
    let (dismissed, on_dismissed) = counter();

    sheet.dismiss(on_dismissed);
    assert_eq!(rule.log().entries(), vec![LoggedEvent::WillDismiss]);
    assert_eq!(dismissed.get(), 0);

    rule.pump_until_idle();
    let frame = rule.host().last_frame().expect("frames applied");
    assert_eq!(frame.translation, 400.0);
    assert_eq!(frame.dimming_alpha, 0.0);
    assert_eq!(dismissed.get(), 1);
    assert!(!rule.host().is_content_visible());
    assert_eq!(sheet.presentation_state(), PresentationState::Dismissed);
    assert_eq!(
        rule.log().entries(),
        vec![LoggedEvent::WillDismiss, LoggedEvent::DidDismiss]
    );
}

#[test]
fn dismiss_before_present_only_announces() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium], None, SheetConfig::default());
    rule.pump_until_idle();
    let (dismissed, on_dismissed) = counter();

    sheet.dismiss(on_dismissed);

    assert_eq!(dismissed.get(), 1);
    assert_eq!(rule.log().entries(), vec![LoggedEvent::WillDismiss]);
    assert_eq!(sheet.presentation_state(), PresentationState::Idle);
    assert!(!rule.runtime_handle().has_frame_callbacks());
}

fn translations(rule: &SheetTestRule) -> Vec<f32> {
    rule.host()
        .frames()
        .iter()
        .map(|frame| frame.translation)
        .collect()
}

#[test]
fn dismissing_again_takes_over_the_running_dismiss() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium], None, SheetConfig::default());
    sheet.present(|| {});
    rule.pump_until_idle();
    rule.log().clear();
    rule.host().clear_frames();
    let (first, on_first) = counter();
    let (second, on_second) = counter();

    sheet.dismiss(on_first);
    for _ in 0..6 {
        rule.advance_frame();
    }
    sheet.dismiss(on_second);
    rule.pump_until_idle();

    let steps = translations(&rule);
    assert!(steps.windows(2).all(|pair| pair[1] >= pair[0]), "{steps:?}");
    assert_eq!(steps.last(), Some(&400.0));
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
    assert_eq!(rule.log().count(&LoggedEvent::WillDismiss), 2);
    assert_eq!(rule.log().count(&LoggedEvent::DidDismiss), 1);
    assert_eq!(sheet.presentation_state(), PresentationState::Dismissed);
    assert!(!rule.host().is_content_visible());
}

#[test]
fn presenting_during_a_system_present_runs_one_animation() {
    let mut rule = phone();
    let config = SheetConfig::default().with_animation_style(AnimationStyle::System);
    let sheet = rule.show(vec![Detent::Medium], None, config);
    rule.pump_until_idle();
    rule.host().clear_frames();
    let (first, on_first) = counter();
    let (second, on_second) = counter();

    sheet.present(on_first);
    for _ in 0..6 {
        rule.advance_frame();
    }
    sheet.present(on_second);
    assert_eq!(second.get(), 1);
    rule.pump_until_idle();

    let steps = translations(&rule);
    assert!(steps.windows(2).all(|pair| pair[1] <= pair[0]), "{steps:?}");
    assert_eq!(steps.last(), Some(&0.0));
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 1);
    assert_eq!(sheet.presentation_state(), PresentationState::Presented);
}

#[test]
fn presenting_during_a_dismiss_reverses_it() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium], None, SheetConfig::default());
    sheet.present(|| {});
    rule.pump_until_idle();
    rule.log().clear();
    let (dismissed, on_dismissed) = counter();
    let (presented, on_presented) = counter();

    sheet.dismiss(on_dismissed);
    for _ in 0..6 {
        rule.advance_frame();
    }
    let midway = rule.host().last_frame().expect("frames applied").translation;
    assert!(midway > 0.0 && midway < 400.0);
    rule.host().clear_frames();

    sheet.present(on_presented);
    assert!(rule.host().frames().is_empty());
    rule.pump_until_idle();

    let frame = rule.host().last_frame().expect("frames applied");
    assert_eq!(frame.translation, 0.0);
    assert_eq!(frame.dimming_alpha, 0.4);
    assert!(rule.host().is_content_visible());
    assert_eq!(dismissed.get(), 0);
    assert_eq!(presented.get(), 1);
    assert_eq!(rule.log().count(&LoggedEvent::DidDismiss), 0);
    assert_eq!(sheet.presentation_state(), PresentationState::Presented);
}

#[test]
fn set_detent_animates_height() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, SheetConfig::default());
    rule.pump_until_idle();

    sheet.set_detent(&DetentId::LARGE, true);
    assert_eq!(rule.log().detent_changes(), vec![DetentId::LARGE]);
    assert_eq!(sheet.sheet_height(), 800.0);
    assert!(sheet.is_decelerating());

    for _ in 0..5 {
        rule.advance_frame();
    }
    let midway = rule.host().height();
    assert!(midway > 400.0 && midway < 800.0, "midway height {midway}");

    rule.pump_until_idle();
    assert_eq!(rule.host().height(), 800.0);
    assert!(!sheet.is_decelerating());
}

#[test]
fn set_detent_ignores_current_and_unknown_ids() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, SheetConfig::default());
    rule.pump_until_idle();
    rule.host().clear_frames();

    sheet.set_detent(&DetentId::MEDIUM, true);
    sheet.set_detent(&DetentId::new("nope"), true);

    assert!(rule.log().entries().is_empty());
    assert!(rule.host().frames().is_empty());
    assert!(!rule.runtime_handle().has_frame_callbacks());
}

#[test]
fn set_detent_without_animation_applies_now() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, SheetConfig::default());
    rule.pump_until_idle();

    sheet.set_detent(&DetentId::LARGE, false);

    assert_eq!(rule.host().height(), 800.0);
    assert!(sheet.is_decelerating());
    rule.advance_frame();
    assert!(!sheet.is_decelerating());
}

#[test]
fn empty_detent_set_is_rejected_and_changes_nothing() {
    let mut rule = phone();
    let resolved = Rc::new(Cell::new(0));
    let calls = Rc::clone(&resolved);
    let peek = Detent::custom_with_id("peek", move |_| {
        calls.set(calls.get() + 1);
        200.0
    });
    let sheet = rule.show(vec![Detent::Medium, peek], None, SheetConfig::default());
    rule.pump_until_idle();
    assert_eq!(resolved.get(), 1);

    assert_eq!(sheet.try_invalidate_detents(Vec::new()), Err(SheetError::NoDetents));
    sheet.invalidate_detents(Vec::new());

    assert_eq!(sheet.current_detent_id(), DetentId::new("peek"));
    assert_eq!(sheet.detent_ids(), vec![DetentId::new("peek"), DetentId::MEDIUM]);
    assert!(rule.log().entries().is_empty());

    // Cached heights survive, so moving around resolves nothing new.
    sheet.set_detent(&DetentId::MEDIUM, false);
    sheet.set_detent(&DetentId::new("peek"), false);
    assert_eq!(resolved.get(), 1);
    assert_eq!(rule.host().height(), 200.0);
}

#[test]
fn replacing_detents_keeps_current_id() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, SheetConfig::default());
    rule.pump_until_idle();

    sheet.invalidate_detents(vec![Detent::fixed("peek", 100.0), Detent::Medium]);

    assert_eq!(sheet.detent_ids(), vec![DetentId::new("peek"), DetentId::MEDIUM]);
    assert_eq!(sheet.current_detent_id(), DetentId::MEDIUM);
    assert!(rule.log().entries().is_empty());
    assert!(!sheet.is_decelerating());
}

#[test]
fn replacing_detents_falls_back_to_first() {
    let mut rule = phone();
    let sheet = rule.show(
        vec![Detent::Medium, Detent::Large],
        Some(DetentId::LARGE),
        SheetConfig::default(),
    );
    rule.pump_until_idle();

    sheet.invalidate_detents(vec![Detent::fixed("b", 500.0), Detent::fixed("a", 300.0)]);

    assert_eq!(sheet.current_detent_id(), DetentId::new("a"));
    assert_eq!(rule.log().detent_changes(), vec![DetentId::new("a")]);
    assert!(sheet.is_decelerating());
    rule.pump_until_idle();
    assert_eq!(rule.host().height(), 300.0);
}

#[test]
fn replacing_detents_reresolves_after_resize() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, SheetConfig::default());
    rule.pump_until_idle();

    rule.host().set_container_size(Some(Size::new(800.0, 390.0)));
    sheet.invalidate_detents(vec![Detent::Medium, Detent::Large]);
    rule.pump_until_idle();

    assert_eq!(rule.host().height(), 195.0);
}

#[test]
fn unmeasured_container_keeps_declared_order() {
    let mut rule = phone();
    rule.host().set_container_size(None);
    let sheet = rule.show(vec![Detent::Large, Detent::Medium], None, SheetConfig::default());

    assert_eq!(sheet.detent_ids(), vec![DetentId::LARGE, DetentId::MEDIUM]);
    assert_eq!(sheet.sheet_height(), 0.0);
}

#[test]
fn invalidate_tears_everything_down_once() {
    let mut rule = phone().with_scroll_view();
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, SheetConfig::default());
    let scroll = rule.scroll().cloned().expect("scroll view");
    assert_eq!(
        rule.host().recognizers(),
        vec![Recognizer::DimmingTap, Recognizer::SheetPan, Recognizer::ScrollPan]
    );
    assert_eq!(scroll.subscriber_count(), 1);
    assert_eq!(sheet.registered_event_count(), 1);

    sheet.invalidate();
    sheet.invalidate();

    let host = rule.host();
    assert!(host.recognizers().is_empty());
    assert!(sheet.attached_recognizers().is_empty());
    assert_eq!(scroll.subscriber_count(), 0);
    assert_eq!(sheet.registered_event_count(), 0);
    assert!(!host.is_installed());
    assert_eq!(host.uninstall_count(), 1);

    host.clear_frames();
    rule.drag_sheet(&sheet, &[-100.0], 0.0);
    sheet.handle_dimming_tap();
    assert!(host.frames().is_empty());
    assert!(rule.log().entries().is_empty());
    assert_eq!(
        sheet.try_invalidate_detents(vec![Detent::Large]),
        Err(SheetError::NotAttached)
    );
}

#[test]
fn configuring_again_replaces_the_installation() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium], None, SheetConfig::default());

    rule.attach(&sheet);

    let host = rule.host();
    assert_eq!(host.install_count(), 2);
    assert_eq!(host.uninstall_count(), 1);
    assert_eq!(
        host.recognizers(),
        vec![Recognizer::DimmingTap, Recognizer::SheetPan]
    );
    assert_eq!(sheet.registered_event_count(), 1);
}

#[test]
fn dimming_tap_dismisses() {
    let mut rule = phone();
    let sheet = rule.show(vec![Detent::Medium], None, SheetConfig::default());
    sheet.present(|| {});
    rule.pump_until_idle();

    sheet.handle_dimming_tap();
    assert_eq!(
        rule.log().entries(),
        vec![LoggedEvent::TappedDimming, LoggedEvent::WillDismiss]
    );

    rule.pump_until_idle();
    assert_eq!(rule.log().count(&LoggedEvent::DidDismiss), 1);
    assert_eq!(sheet.presentation_state(), PresentationState::Dismissed);
}

#[test]
fn dimming_tap_is_ignored_when_disabled() {
    let mut rule = phone();
    let config = SheetConfig::default().with_dismiss_by_tap(false);
    let sheet = rule.show(vec![Detent::Medium], None, config);
    sheet.present(|| {});
    rule.pump_until_idle();

    sheet.handle_dimming_tap();

    assert!(!rule.host().has_recognizer(Recognizer::DimmingTap));
    assert!(rule.log().entries().is_empty());
    let chrome = rule.host().chrome().expect("installed");
    assert!(!chrome.dimming_receives_input);
}

#[test]
fn immediate_style_skips_animation() {
    let mut rule = phone();
    let config = SheetConfig::default().with_animation_style(AnimationStyle::Immediate);
    let sheet = rule.show(vec![Detent::Medium, Detent::Large], None, config);
    assert_eq!(sheet.animation_duration(), Duration::ZERO);
    rule.pump_until_idle();

    sheet.present(|| {});
    assert_eq!(rule.host().last_frame().map(|frame| frame.translation), Some(0.0));
    sheet.set_detent(&DetentId::LARGE, true);
    assert_eq!(rule.host().height(), 800.0);

    assert_eq!(rule.pump_until_idle(), 1);
    assert_eq!(sheet.presentation_state(), PresentationState::Presented);
}

#[test]
fn animated_styles_report_the_shared_duration() {
    let mut rule = phone();
    for style in [AnimationStyle::System, AnimationStyle::Spring] {
        let config = SheetConfig::default().with_animation_style(style);
        let sheet = rule.show(vec![Detent::Medium], None, config);
        assert_eq!(sheet.animation_duration(), Duration::from_millis(300));
    }
}

#[test]
fn present_with_system_style_takes_the_configured_duration() {
    let mut rule = phone();
    let config = SheetConfig::default().with_animation_style(AnimationStyle::System);
    let sheet = rule.show(vec![Detent::Medium], None, config);
    rule.pump_until_idle();

    sheet.present(|| {});
    rule.advance_by(Duration::from_millis(150));
    assert_eq!(sheet.presentation_state(), PresentationState::Idle);

    rule.advance_by(Duration::from_millis(200));
    assert_eq!(sheet.presentation_state(), PresentationState::Presented);
}
