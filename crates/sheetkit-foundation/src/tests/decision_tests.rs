use super::*;
use crate::gesture::types::LayoutEntry;
use smallvec::SmallVec;

fn layout(entries: &[(&'static str, f32)], current: &'static str, container: f32) -> DetentLayout {
    let entries: SmallVec<[LayoutEntry; 4]> = entries
        .iter()
        .map(|&(id, height)| LayoutEntry {
            id: DetentId::from(id),
            height,
            hidden: id == "hidden",
        })
        .collect();
    let current_height = entries
        .iter()
        .find(|entry| entry.id.as_str() == current)
        .map(|entry| entry.height)
        .unwrap_or(0.0);
    let max = entries.last().cloned().expect("non-empty layout");
    DetentLayout {
        entries,
        current: DetentId::from(current),
        current_height,
        max,
        container_height: Some(container),
    }
}

fn policy() -> DismissPolicy {
    DismissPolicy::new(true, GestureThresholds::default())
}

fn closest(layout: &DetentLayout, height: f32, velocity_y: f32) -> Option<DetentId> {
    closest_detent(
        layout,
        height,
        Point::vertical(velocity_y),
        &GestureThresholds::default(),
    )
}

#[test]
fn soft_dismiss_threshold_at_shortest_detent() {
    let layout = layout(&[("hidden", 1.0), ("medium", 400.0), ("large", 760.0)], "medium", 800.0);
    let dismiss = |velocity| {
        can_dismiss(
            &layout,
            &policy(),
            Point::vertical(velocity),
            Point::vertical(20.0),
            380.0,
        )
    };
    assert!(dismiss(300.0));
    assert!(!dismiss(299.0));
}

#[test]
fn hard_dismiss_needs_distance_and_speed() {
    let layout = layout(&[("medium", 400.0), ("large", 760.0)], "large", 800.0);
    let dismiss = |translation, velocity| {
        can_dismiss(
            &layout,
            &policy(),
            Point::vertical(velocity),
            Point::vertical(translation),
            700.0,
        )
    };
    assert!(dismiss(360.0, 1_600.0));
    assert!(!dismiss(340.0, 1_600.0));
    assert!(!dismiss(360.0, 1_500.0));
    assert!(!dismiss(-400.0, 2_000.0));
}

#[test]
fn swipe_dismiss_can_be_disabled() {
    let layout = layout(&[("medium", 400.0)], "medium", 800.0);
    let policy = DismissPolicy::new(false, GestureThresholds::default());
    assert!(!can_dismiss(
        &layout,
        &policy,
        Point::vertical(5_000.0),
        Point::vertical(400.0),
        400.0
    ));
}

#[test]
fn fast_release_moves_to_neighbor() {
    let layout = layout(&[("small", 200.0), ("medium", 400.0), ("large", 760.0)], "medium", 800.0);
    // Heights inside the current detent's band leave the velocity pick alone.
    assert_eq!(closest(&layout, 450.0, -300.0), Some(DetentId::from("large")));
    assert_eq!(closest(&layout, 350.0, 300.0), Some(DetentId::from("small")));
    assert_eq!(closest(&layout, 450.0, 299.0), Some(DetentId::from("medium")));
}

#[test]
fn velocity_never_picks_hidden() {
    let layout = layout(&[("hidden", 1.0), ("medium", 400.0), ("large", 760.0)], "medium", 900.0);
    assert_eq!(closest(&layout, 350.0, 2_000.0), Some(DetentId::MEDIUM));
}

#[test]
fn velocity_at_the_edge_keeps_current() {
    let layout = layout(&[("small", 200.0), ("large", 600.0)], "large", 800.0);
    assert_eq!(closest(&layout, 650.0, -900.0), Some(DetentId::from("large")));
}

#[test]
fn position_band_overrides_when_it_names_a_third_detent() {
    let layout = layout(&[("small", 200.0), ("medium", 400.0), ("large", 760.0)], "small", 900.0);
    // Band height 300: 700 lies in the third band.
    assert_eq!(closest(&layout, 700.0, 0.0), Some(DetentId::from("large")));
    // Fast upward release picks medium, but the band still names large.
    assert_eq!(closest(&layout, 700.0, -400.0), Some(DetentId::from("large")));
    // Band of the current detent keeps the velocity pick.
    assert_eq!(closest(&layout, 250.0, -400.0), Some(DetentId::from("medium")));
}

#[test]
fn upward_drag_lands_on_tall_detent_without_velocity() {
    let layout = layout(&[("short", 200.0), ("tall", 600.0)], "short", 800.0);
    assert_eq!(closest(&layout, 600.0, 0.0), Some(DetentId::from("tall")));
    assert_eq!(closest(&layout, 350.0, -300.0), Some(DetentId::from("tall")));
}

#[test]
fn single_detent_is_always_chosen() {
    let layout = layout(&[("only", 300.0)], "only", 800.0);
    assert_eq!(closest(&layout, 10.0, 5_000.0), Some(DetentId::from("only")));
}

#[test]
fn no_container_means_no_decision() {
    let mut layout = layout(&[("small", 200.0), ("large", 600.0)], "small", 800.0);
    layout.container_height = None;
    assert_eq!(closest(&layout, 500.0, 0.0), None);
}

#[test]
fn unknown_current_is_kept() {
    let layout = layout(&[("small", 200.0), ("large", 600.0)], "gone", 800.0);
    assert_eq!(closest(&layout, 500.0, -2_000.0), Some(DetentId::from("gone")));
}
