//! Drag-to-resize state for the document sidebar

pub const DEFAULT_WIDTH: f32 = 300.0;
pub const MIN_WIDTH: f32 = 220.0;
pub const MAX_WIDTH: f32 = 480.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SidebarResize {
    width: f32,
    dragging: bool,
}

impl Default for SidebarResize {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl SidebarResize {
    pub fn new(width: f32) -> Self {
        Self {
            width: clamp_width(width),
            dragging: false,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn start(&mut self) {
        self.dragging = true;
    }

    /// Follow the pointer while dragging; returns whether the width changed
    pub fn drag_to(&mut self, client_x: f32) -> bool {
        if !self.dragging || !client_x.is_finite() {
            return false;
        }
        let width = clamp_width(client_x);
        let changed = width != self.width;
        self.width = width;
        changed
    }

    /// Finish the drag; returns false when no drag was in progress
    pub fn end(&mut self) -> bool {
        std::mem::replace(&mut self.dragging, false)
    }
}

fn clamp_width(width: f32) -> f32 {
    if width.is_nan() {
        return DEFAULT_WIDTH;
    }
    width.clamp(MIN_WIDTH, MAX_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_is_clamped() {
        let mut s = SidebarResize::default();
        assert_eq!(s.width(), 300.0);

        assert!(!s.drag_to(350.0));
        s.start();
        assert!(s.drag_to(350.0));
        assert_eq!(s.width(), 350.0);
        s.drag_to(10.0);
        assert_eq!(s.width(), MIN_WIDTH);
        s.drag_to(9000.0);
        assert_eq!(s.width(), MAX_WIDTH);

        assert!(s.end());
        assert!(!s.end());
        assert!(!s.drag_to(300.0));
        assert_eq!(s.width(), MAX_WIDTH);
    }
}
