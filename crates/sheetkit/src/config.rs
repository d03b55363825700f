//! Sheet configuration and the chrome derived from it.

use std::time::Duration;

use sheetkit_animation::AnimationStyle;
use sheetkit_foundation::GestureThresholds;
use sheetkit_ui_graphics::{Color, Dp};

/// Duration of present, dismiss and height-change animations.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// Dimming alpha once the sheet is presented.
pub const DIMMING_ALPHA: f32 = 0.4;

pub const DRAGGER_WIDTH: Dp = Dp(24.0);
pub const DRAGGER_HEIGHT: Dp = Dp(4.0);
/// Distance from the top edge of the sheet to the dragger.
pub const DRAGGER_TOP_INSET: Dp = Dp(8.0);

#[derive(Clone, Debug, PartialEq)]
pub struct SheetConfig {
    /// Tapping the dimmed area dismisses the sheet.
    pub dismiss_by_tap: bool,
    /// A downward flick can dismiss the sheet.
    pub dismiss_by_swipe: bool,
    pub dimming_color: Color,
    pub dimming_alpha: f32,
    /// Radius of the sheet's top corners.
    pub corner_radius: Dp,
    pub show_dragger: bool,
    pub dragger_color: Color,
    pub animation_style: AnimationStyle,
    pub thresholds: GestureThresholds,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            dismiss_by_tap: true,
            dismiss_by_swipe: true,
            dimming_color: Color::TRANSPARENT,
            dimming_alpha: DIMMING_ALPHA,
            corner_radius: Dp::ZERO,
            show_dragger: false,
            dragger_color: Color::SYSTEM_GRAY3,
            animation_style: AnimationStyle::default(),
            thresholds: GestureThresholds::default(),
        }
    }
}

impl SheetConfig {
    pub fn with_dismiss_by_tap(mut self, enabled: bool) -> Self {
        self.dismiss_by_tap = enabled;
        self
    }

    pub fn with_dismiss_by_swipe(mut self, enabled: bool) -> Self {
        self.dismiss_by_swipe = enabled;
        self
    }

    pub fn with_dimming(mut self, color: Color, alpha: f32) -> Self {
        self.dimming_color = color;
        self.dimming_alpha = alpha;
        self
    }

    pub fn with_corner_radius(mut self, radius: Dp) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_dragger(mut self, color: Color) -> Self {
        self.show_dragger = true;
        self.dragger_color = color;
        self
    }

    pub fn with_animation_style(mut self, style: AnimationStyle) -> Self {
        self.animation_style = style;
        self
    }

    pub fn with_thresholds(mut self, thresholds: GestureThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn chrome(&self) -> SheetChrome {
        SheetChrome {
            dimming_color: self.dimming_color,
            dimming_receives_input: self.dismiss_by_tap,
            corner_radius: self.corner_radius,
            dragger: self.show_dragger.then(|| DraggerChrome::new(self.dragger_color)),
        }
    }
}

/// Everything the host draws around the sheet content.
///
/// The dimming layer starts fully transparent; its alpha arrives through
/// [`SheetFrame`](crate::SheetFrame).
#[derive(Clone, Debug, PartialEq)]
pub struct SheetChrome {
    pub dimming_color: Color,
    /// Without tap-to-dismiss the dimming layer lets input through.
    pub dimming_receives_input: bool,
    /// Applies to the top corners only.
    pub corner_radius: Dp,
    pub dragger: Option<DraggerChrome>,
}

/// Grab handle centered horizontally near the top of the sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DraggerChrome {
    pub color: Color,
    pub width: Dp,
    pub height: Dp,
    pub top_inset: Dp,
    pub corner_radius: Dp,
}

impl DraggerChrome {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            width: DRAGGER_WIDTH,
            height: DRAGGER_HEIGHT,
            top_inset: DRAGGER_TOP_INSET,
            corner_radius: DRAGGER_HEIGHT.half(),
        }
    }
}
