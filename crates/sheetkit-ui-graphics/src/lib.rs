//! Pure math/data for SheetKit
//!
//! Geometry primitives, colors and unit types shared by the sheet crates.
//! Nothing in here knows about detents or gestures.

mod color;
mod geometry;
mod unit;

pub use color::*;
pub use geometry::*;
pub use unit::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{EdgeInsets, Point, Size};
    pub use crate::unit::Dp;
}
