use smallvec::SmallVec;

use sheetkit_ui_graphics::Point;

use crate::detent::DetentId;
use crate::gesture_constants::GestureThresholds;

/// Recognizer phase of a pan sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanPhase {
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl PanPhase {
    pub fn is_active(self) -> bool {
        matches!(self, PanPhase::Began | PanPhase::Changed)
    }

    pub fn is_finished(self) -> bool {
        matches!(self, PanPhase::Ended | PanPhase::Cancelled | PanPhase::Failed)
    }
}

/// One pan recognizer callback. Translation is cumulative since the gesture
/// began; positive `y` means the finger moved down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanSample {
    pub phase: PanPhase,
    pub translation: Point,
    pub velocity: Point,
}

impl PanSample {
    pub fn new(phase: PanPhase, translation: Point, velocity: Point) -> Self {
        Self {
            phase,
            translation,
            velocity,
        }
    }

    pub fn vertical(phase: PanPhase, translation_y: f32, velocity_y: f32) -> Self {
        Self::new(
            phase,
            Point::vertical(translation_y),
            Point::vertical(velocity_y),
        )
    }
}

/// Scroll state of the nested scroll view at the time of an event.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Vertical content offset. Grows as the user scrolls further into the content.
    pub offset: f32,
    pub top_inset: f32,
    /// The user's finger is on the scroll view.
    pub is_tracking: bool,
    pub is_decelerating: bool,
}

impl ScrollMetrics {
    pub fn at_offset(offset: f32) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Offset at which the content shows its top edge.
    pub fn resting_offset(&self) -> f32 {
        -self.top_inset
    }

    /// Content is scrolled at or above its top.
    pub fn is_at_top(&self) -> bool {
        self.offset <= self.resting_offset()
    }

    pub fn is_below_top(&self, offset: f32) -> bool {
        offset > self.resting_offset()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEntry {
    pub id: DetentId,
    pub height: f32,
    pub hidden: bool,
}

/// Resolved heights of the detent set, shortest first, as seen by one event.
#[derive(Clone, Debug, PartialEq)]
pub struct DetentLayout {
    pub entries: SmallVec<[LayoutEntry; 4]>,
    pub current: DetentId,
    pub current_height: f32,
    /// Last entry, or the default detent when the set is empty.
    pub max: LayoutEntry,
    /// `None` when the sheet has no container to measure against.
    pub container_height: Option<f32>,
}

impl DetentLayout {
    pub fn index_of(&self, id: &DetentId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == *id)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.index_of(&self.current)
    }

    pub fn reached_max_detent(&self) -> bool {
        self.entries
            .last()
            .is_some_and(|entry| entry.id == self.current)
    }

    /// Shortest detent a user can actually see.
    pub fn first_visible(&self) -> Option<&LayoutEntry> {
        self.entries.iter().find(|entry| !entry.hidden)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DismissPolicy {
    pub swipe_to_dismiss: bool,
    pub thresholds: GestureThresholds,
}

impl DismissPolicy {
    pub fn new(swipe_to_dismiss: bool, thresholds: GestureThresholds) -> Self {
        Self {
            swipe_to_dismiss,
            thresholds,
        }
    }
}

/// What the engine sees besides the event itself.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureContext {
    pub layout: DetentLayout,
    /// Sheet height last committed to the surface.
    pub displayed_height: f32,
    pub policy: DismissPolicy,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent {
    /// Pan on the sheet surface itself.
    SheetPan(PanSample),
    /// Pan on the nested scroll view, a candidate for forwarding.
    ScrollPan {
        sample: PanSample,
        scroll: ScrollMetrics,
    },
    ScrollOffsetChanged {
        scroll: ScrollMetrics,
    },
    /// A height-change animation began.
    SettleStarted,
    SettleFinished {
        scroll: Option<ScrollMetrics>,
    },
}

/// Work the caller performs, in order, after a step.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Pin the nested scroll view to its resting offset.
    ResetScrollOffset,
    /// Make this the current detent without animating.
    SnapToDetent(DetentId),
    /// Write this sheet height directly.
    UpdateHeight(f32),
    /// Run the swipe dismissal.
    SwipeDismiss,
    /// Animate to this detent.
    SettleTo(DetentId),
}

pub type Effects = SmallVec<[Effect; 4]>;
