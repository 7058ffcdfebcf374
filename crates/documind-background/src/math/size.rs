//! 2D size type for surface dimensions

use serde::{Deserialize, Serialize};

/// Width and height in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if size is zero or negative
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Scale both dimensions
    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Replace negative or non-finite dimensions with zero
    #[inline]
    pub fn sanitized(self) -> Self {
        let fix = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(fix(self.width), fix(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_empty() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(10.0, 0.0).is_empty());
        assert!(!Size::new(10.0, 5.0).is_empty());
    }

    #[test]
    fn test_size_scale() {
        let s = Size::new(100.0, 50.0);
        let scaled = s.scale(2.0);
        assert!((scaled.width - 200.0).abs() < 0.001);
        assert!((scaled.height - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_size_sanitized() {
        let s = Size::new(-4.0, f32::NAN).sanitized();
        assert_eq!(s, Size::ZERO);
        assert_eq!(Size::new(3.0, 4.0).sanitized(), Size::new(3.0, 4.0));
    }
}
