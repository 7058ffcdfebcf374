//! Drawing-surface sizing
//!
//! The surface matches its container's layout box in logical pixels; the
//! backing store is scaled by the (optionally capped) device pixel ratio.

use crate::math::Size;

/// Resolved size of a drawing surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    /// Layout size in logical pixels
    pub logical: Size,
    /// Backing store width in physical pixels
    pub physical_width: u32,
    /// Backing store height in physical pixels
    pub physical_height: u32,
    /// Ratio applied to go from logical to physical pixels
    pub pixel_ratio: f32,
}

impl SurfaceSize {
    /// Compute the backing store size for a logical size
    pub fn new(logical: Size, pixel_ratio: f32) -> Self {
        let logical = logical.sanitized();
        Self {
            logical,
            physical_width: (logical.width * pixel_ratio).round() as u32,
            physical_height: (logical.height * pixel_ratio).round() as u32,
            pixel_ratio,
        }
    }

    /// Check whether the backing store has no pixels
    pub fn is_empty(&self) -> bool {
        self.physical_width == 0 || self.physical_height == 0
    }
}

/// Tracks the size of one surface and answers whether a resize changed it
#[derive(Clone, Debug)]
pub struct SurfaceManager {
    pixel_ratio: f32,
    current: Option<SurfaceSize>,
}

impl SurfaceManager {
    /// Create a manager for a display with the given device pixel ratio
    ///
    /// Non-finite or non-positive ratios fall back to 1. When `cap` is set
    /// the ratio is limited to it.
    pub fn new(device_pixel_ratio: f32, cap: Option<f32>) -> Self {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let pixel_ratio = match cap {
            Some(cap) if cap > 0.0 => ratio.min(cap),
            _ => ratio,
        };
        Self {
            pixel_ratio,
            current: None,
        }
    }

    /// Effective pixel ratio
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Last applied size, if any
    pub fn current(&self) -> Option<SurfaceSize> {
        self.current
    }

    /// Size the surface would have for a container
    pub fn measure(&self, container: (f32, f32)) -> SurfaceSize {
        SurfaceSize::new(Size::new(container.0, container.1), self.pixel_ratio)
    }

    /// Apply a container size
    ///
    /// Returns the new size when it differs from the current one, so callers
    /// only reconfigure on a real change.
    pub fn resize(&mut self, container: (f32, f32)) -> Option<SurfaceSize> {
        let next = self.measure(container);
        if self.current == Some(next) {
            return None;
        }
        self.current = Some(next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_size_scaled() {
        let size = SurfaceSize::new(Size::new(800.0, 600.0), 2.0);
        assert_eq!(size.physical_width, 1600);
        assert_eq!(size.physical_height, 1200);
        assert!(!size.is_empty());
    }

    #[test]
    fn test_pixel_ratio_cap() {
        assert_eq!(SurfaceManager::new(3.0, Some(1.5)).pixel_ratio(), 1.5);
        assert_eq!(SurfaceManager::new(1.25, Some(1.5)).pixel_ratio(), 1.25);
        assert_eq!(SurfaceManager::new(3.0, None).pixel_ratio(), 3.0);
        assert_eq!(SurfaceManager::new(f32::NAN, None).pixel_ratio(), 1.0);
        assert_eq!(SurfaceManager::new(0.0, Some(1.5)).pixel_ratio(), 1.0);
    }

    #[test]
    fn test_resize_idempotent() {
        let mut manager = SurfaceManager::new(2.0, None);
        assert!(manager.resize((300.0, 200.0)).is_some());
        assert!(manager.resize((300.0, 200.0)).is_none());
        assert_eq!(manager.current().unwrap().physical_width, 600);

        assert!(manager.resize((301.0, 200.0)).is_some());
    }

    #[test]
    fn test_zero_container_is_empty() {
        let mut manager = SurfaceManager::new(1.0, None);
        let size = manager.resize((0.0, 0.0)).unwrap();
        assert!(size.is_empty());
    }
}
