use sheetkit_animation::Lerp;

/// Animatable surface state pushed to the host on every change.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SheetFrame {
    /// Visible height of the sheet above the container's bottom edge.
    pub height: f32,
    /// Downward slide of the sheet content, used while presenting and dismissing.
    pub translation: f32,
    pub dimming_alpha: f32,
}

impl SheetFrame {
    pub fn new(height: f32, translation: f32, dimming_alpha: f32) -> Self {
        Self {
            height,
            translation,
            dimming_alpha,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn with_translation(mut self, translation: f32) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_dimming_alpha(mut self, dimming_alpha: f32) -> Self {
        self.dimming_alpha = dimming_alpha;
        self
    }
}

impl Lerp for SheetFrame {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        Self {
            height: self.height.lerp(&target.height, fraction),
            translation: self.translation.lerp(&target.translation, fraction),
            dimming_alpha: self.dimming_alpha.lerp(&target.dimming_alpha, fraction),
        }
    }
}
