//! Host Abstraction Layer for the DocuMind animated backgrounds
//!
//! This crate defines the traits that let the background engine run against
//! a real browser page or a deterministic test host without touching
//! platform globals directly.
//!
//! # Platform Implementations
//!
//! - **Browser**: `performance.now()` for time, `requestAnimationFrame` for frames,
//!   DOM listeners for resize/pointer events, `matchMedia` for reduced motion
//! - **Tests**: `documind-hal-mock` with a simulated clock and a manual frame pump
//!
//! # Scheduling Model
//!
//! Everything is single-threaded and frame-driven. A component owns at most
//! one scheduled frame callback at a time, and every listener it registers is
//! identified by a [`ListenerId`] so teardown can remove it deterministically.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

mod cancel;

pub use cancel::CancelToken;

/// Host capability provider
///
/// Implementations provide platform-specific functionality for:
/// - Time measurement
/// - Debug output
/// - Entropy (particle seeding)
/// - Display capabilities (pixel ratio, reduced-motion preference)
///
/// Capabilities are read once when a component is constructed; components
/// never query platform globals on their own.
pub trait Hal {
    /// Monotonic time in milliseconds
    fn now_ms(&self) -> f64;

    /// Write a debug message to the platform console
    ///
    /// On the browser: `console.log`
    /// In tests: captured in memory
    fn debug_write(&self, msg: &str);

    /// Seed for per-instance random number generators
    fn random_seed(&self) -> u64;

    /// Ratio of physical to logical pixels for the current display
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Whether the user asked the platform to minimize non-essential motion
    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

// =============================================================================
// Frame Scheduling
// =============================================================================

/// What a frame callback wants to happen next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Schedule another frame
    Continue,
    /// Do not schedule another frame
    Stop,
}

/// Per-frame callback; receives the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnMut(f64) -> FrameControl>;

/// Explicit per-instance frame scheduler
///
/// Replaces ambient `requestAnimationFrame` usage so tests can pump frames
/// from a fake clock.
pub trait FrameScheduler {
    /// Start delivering frames to `callback`
    ///
    /// Replaces any callback installed by an earlier `start`; only one frame
    /// callback is ever pending per scheduler.
    fn start(&mut self, callback: FrameCallback) -> Result<(), HalError>;

    /// Cancel the pending frame and drop the callback
    ///
    /// Idempotent. After `stop` returns no callback fires.
    fn stop(&mut self);

    /// Check whether a callback is installed and scheduled
    fn is_running(&self) -> bool;
}

// =============================================================================
// Events
// =============================================================================

/// Kind of host event a component can subscribe to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Viewport resized
    Resize,
    /// Pointer moved over the surface
    PointerMove,
    /// Pointer left the surface
    PointerLeave,
}

/// Host event delivered to a handler
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// Viewport resized; handlers re-read the container layout
    Resize,
    /// Pointer position in surface-local logical pixels
    PointerMove { x: f32, y: f32 },
    /// Pointer left the surface
    PointerLeave,
}

impl HostEvent {
    /// Get the kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::Resize => EventKind::Resize,
            HostEvent::PointerMove { .. } => EventKind::PointerMove,
            HostEvent::PointerLeave => EventKind::PointerLeave,
        }
    }
}

/// Event handler callback
pub type EventHandler = Box<dyn FnMut(&HostEvent)>;

/// Identifier for a registered listener
pub type ListenerId = u32;

/// Source of resize and pointer events
pub trait EventSource {
    /// Register a handler for one kind of event
    fn listen(&mut self, kind: EventKind, handler: EventHandler) -> Result<ListenerId, HalError>;

    /// Remove a previously registered handler
    ///
    /// Unknown IDs are ignored.
    fn unlisten(&mut self, id: ListenerId);
}

/// Current layout box of the element a surface is attached to
pub trait LayoutSource {
    /// Container width and height in logical pixels
    fn container_size(&self) -> (f32, f32);
}

// =============================================================================
// Host bundle
// =============================================================================

/// Everything a mounted component needs from its host
///
/// Owned exclusively by one component instance.
pub struct Host {
    /// Capability provider
    pub hal: Rc<dyn Hal>,
    /// Container layout
    pub layout: Rc<dyn LayoutSource>,
    /// Frame scheduler for this instance
    pub scheduler: Box<dyn FrameScheduler>,
    /// Event source for this instance
    pub events: Box<dyn EventSource>,
}

impl Host {
    /// Bundle host capabilities for a component
    pub fn new(
        hal: Rc<dyn Hal>,
        layout: Rc<dyn LayoutSource>,
        scheduler: Box<dyn FrameScheduler>,
        events: Box<dyn EventSource>,
    ) -> Self {
        Self {
            hal,
            layout,
            scheduler,
            events,
        }
    }
}

/// Monotonic listener ID allocator
#[derive(Debug, Default)]
pub struct ListenerIds {
    next: Cell<ListenerId>,
}

impl ListenerIds {
    /// Create an allocator starting at 1
    pub fn new() -> Self {
        Self { next: Cell::new(1) }
    }

    /// Allocate the next ID
    pub fn next_id(&self) -> ListenerId {
        let id = self.next.get().max(1);
        self.next.set(id.wrapping_add(1).max(1));
        id
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Host errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalError {
    /// Operation not supported on this platform
    NotSupported,
    /// Failed to attach an event listener
    ListenerFailed,
    /// Failed to schedule a frame
    SchedulerFailed,
    /// Invalid argument
    InvalidArgument,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalError::NotSupported => write!(f, "Operation not supported on this platform"),
            HalError::ListenerFailed => write!(f, "Failed to attach event listener"),
            HalError::SchedulerFailed => write!(f, "Failed to schedule animation frame"),
            HalError::InvalidArgument => write!(f, "Invalid argument"),
        }
    }
}
