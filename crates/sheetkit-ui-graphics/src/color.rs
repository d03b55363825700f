//! RGBA colors used by the sheet chrome

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    pub const BLACK: Color = Color(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color(0.0, 0.0, 0.0, 0.0);
    /// Tertiary system gray, the usual drag handle tint.
    pub const SYSTEM_GRAY3: Color = Color::from_rgb_u8(199, 199, 204);

    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::TRANSPARENT
    }
}
