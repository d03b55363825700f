//! End-of-drag decisions: dismiss, or which detent to settle at.

use sheetkit_ui_graphics::Point;

use crate::detent::DetentId;
use crate::gesture::types::{DetentLayout, DismissPolicy};
use crate::gesture_constants::GestureThresholds;

/// Whether a released drag dismisses the sheet.
///
/// From the shortest visible detent a soft downward flick is enough. From any
/// taller detent the drag must cover more than the dismiss fraction of
/// `height` and end in a hard flick.
pub fn can_dismiss(
    layout: &DetentLayout,
    policy: &DismissPolicy,
    velocity: Point,
    translation: Point,
    height: f32,
) -> bool {
    if !policy.swipe_to_dismiss {
        return false;
    }
    let thresholds = &policy.thresholds;
    let at_shortest = layout
        .first_visible()
        .is_some_and(|entry| entry.id == layout.current);
    if at_shortest {
        velocity.y >= thresholds.soft_dismiss_velocity
    } else {
        let travelled = translation.y.max(0.0) / height;
        travelled > thresholds.dismiss_translation_fraction
            && velocity.y > thresholds.hard_dismiss_velocity
    }
}

/// Detent a released drag settles at, given the sheet's `height` and release
/// `velocity`.
///
/// A fast release picks the neighbor in the direction of travel. The container
/// is then split into one equal band per detent; if `height` falls in the band
/// of a third detent (neither the velocity pick nor the current one), that
/// detent wins. The hidden detent is never chosen.
///
/// `None` when there is nothing to measure against.
pub fn closest_detent(
    layout: &DetentLayout,
    height: f32,
    velocity: Point,
    thresholds: &GestureThresholds,
) -> Option<DetentId> {
    let container_height = layout.container_height?;
    let entries = &layout.entries;
    match entries.len() {
        0 => return None,
        1 => return Some(entries[0].id.clone()),
        _ => {}
    }
    let Some(current_index) = layout.current_index() else {
        return Some(layout.current.clone());
    };

    let mut next = &layout.current;

    if velocity.y.abs() >= thresholds.switch_detent_velocity {
        // Downward travel shrinks the sheet.
        let neighbor = if velocity.y > 0.0 {
            current_index.checked_sub(1)
        } else {
            Some(current_index + 1)
        };
        if let Some(entry) = neighbor.and_then(|index| entries.get(index)) {
            if !entry.hidden {
                next = &entry.id;
            }
        }
    }

    let band = container_height / entries.len() as f32;
    let by_position = (0..entries.len()).find(|&index| {
        let min = index as f32 * band;
        (min..=min + band).contains(&height)
    });
    if let Some(entry) = by_position.map(|index| &entries[index]) {
        if entry.id != *next && entry.id != layout.current && !entry.hidden {
            next = &entry.id;
        }
    }

    Some(next.clone())
}

#[cfg(test)]
#[path = "../tests/decision_tests.rs"]
mod tests;
