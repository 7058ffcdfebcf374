use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::Canvas2d;
use crate::color::Color;
use crate::math::{Size, Vec2};
use crate::surface::SurfaceSize;

/// One recorded canvas call
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Configure(SurfaceSize),
    Clear,
    FillAll(Color),
    FillRect { origin: Vec2, size: Size, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, start: Color, end: Color, width: f32 },
}

/// Canvas that records every call
///
/// Clones share the same log, so a test can keep a handle after moving the
/// canvas into a component.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    commands: Rc<RefCell<Vec<DrawCommand>>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands recorded so far
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.borrow().clone()
    }

    /// Drain the log
    pub fn take_commands(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    pub fn count(&self, matches: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.borrow().iter().filter(|c| matches(c)).count()
    }

    pub fn configure_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Configure(_)))
    }

    pub fn line_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Most recent size passed to `configure`
    pub fn last_size(&self) -> Option<SurfaceSize> {
        self.commands.borrow().iter().rev().find_map(|c| match c {
            DrawCommand::Configure(size) => Some(*size),
            _ => None,
        })
    }

    fn push(&self, command: DrawCommand) {
        self.commands.borrow_mut().push(command);
    }
}

impl Canvas2d for RecordingCanvas {
    fn configure(&mut self, size: &SurfaceSize) {
        self.push(DrawCommand::Configure(*size));
    }

    fn clear(&mut self) {
        self.push(DrawCommand::Clear);
    }

    fn fill_all(&mut self, color: Color) {
        self.push(DrawCommand::FillAll(color));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Size, color: Color) {
        self.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_gradient_line(&mut self, from: Vec2, to: Vec2, start: Color, end: Color, width: f32) {
        self.push(DrawCommand::Line {
            from,
            to,
            start,
            end,
            width,
        });
    }
}
