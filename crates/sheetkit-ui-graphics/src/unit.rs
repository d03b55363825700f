//! Density-independent units

/// Density-independent pixels
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Dp(pub f32);

impl Dp {
    pub const ZERO: Dp = Dp(0.0);

    pub fn to_px(&self, density: f32) -> f32 {
        self.0 * density
    }

    pub fn half(&self) -> Dp {
        Dp(self.0 / 2.0)
    }
}
