//! 2D drawing surface used by the particle backgrounds

use crate::color::Color;
use crate::math::{Size, Vec2};
use crate::surface::SurfaceSize;

/// Immediate-mode 2D canvas
///
/// Coordinates are logical pixels; implementations apply the pixel ratio
/// when [`Canvas2d::configure`] is called.
pub trait Canvas2d {
    /// Resize the backing store and reset the transform for a new size
    fn configure(&mut self, size: &SurfaceSize);

    /// Clear the whole surface to transparent
    fn clear(&mut self);

    /// Fill the whole surface with a (usually translucent) color
    fn fill_all(&mut self, color: Color);

    /// Fill an axis-aligned rectangle
    fn fill_rect(&mut self, origin: Vec2, size: Size, color: Color);

    /// Fill a circle
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Stroke a line whose color fades linearly from `start` to `end`
    fn stroke_gradient_line(&mut self, from: Vec2, to: Vec2, start: Color, end: Color, width: f32);
}
