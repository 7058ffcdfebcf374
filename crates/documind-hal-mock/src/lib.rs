//! Mock host implementation for testing the DocuMind backgrounds
//!
//! This provides deterministic implementations of the host traits so the
//! animation engine can be driven frame by frame without a browser:
//!
//! - [`MockHal`]: simulated clock, captured debug log, fixed random seed
//! - [`ManualScheduler`]: fake frame clock pumped by the test
//! - [`MockEvents`]: listener registry that tracks what is still attached
//! - [`MockLayout`]: settable container size
//!
//! The scheduler, event source, and layout are cheap handles over shared
//! state, so a test keeps a clone while the component owns the original.

#![no_std]
extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use documind_hal::{
    EventHandler, EventKind, EventSource, FrameCallback, FrameControl, FrameScheduler, Hal,
    HalError, Host, HostEvent, LayoutSource, ListenerId, ListenerIds,
};

/// Frame interval used by [`ManualScheduler`] (60 fps)
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

// =============================================================================
// MockHal
// =============================================================================

/// Mock HAL for unit testing
pub struct MockHal {
    /// Simulated time in milliseconds
    time_ms: Cell<f64>,
    /// Captured debug messages
    debug_log: RefCell<Vec<String>>,
    /// Random seed for deterministic testing
    random_seed: Cell<u64>,
    /// Simulated device pixel ratio
    pixel_ratio: Cell<f32>,
    /// Simulated reduced-motion preference
    reduced_motion: Cell<bool>,
}

impl MockHal {
    /// Create a new mock HAL
    pub fn new() -> Self {
        Self {
            time_ms: Cell::new(0.0),
            debug_log: RefCell::new(Vec::new()),
            random_seed: Cell::new(12345), // Deterministic seed
            pixel_ratio: Cell::new(1.0),
            reduced_motion: Cell::new(false),
        }
    }

    /// Create a mock HAL reporting the given device pixel ratio
    pub fn with_pixel_ratio(ratio: f32) -> Self {
        let hal = Self::new();
        hal.pixel_ratio.set(ratio);
        hal
    }

    /// Create a mock HAL with the reduced-motion preference active
    pub fn with_reduced_motion() -> Self {
        let hal = Self::new();
        hal.reduced_motion.set(true);
        hal
    }

    /// Advance the simulated time
    pub fn advance_time(&self, ms: f64) {
        self.time_ms.set(self.time_ms.get() + ms);
    }

    /// Set the simulated time to a specific value
    pub fn set_time(&self, ms: f64) {
        self.time_ms.set(ms);
    }

    /// Set the random seed for deterministic testing
    pub fn set_random_seed(&self, seed: u64) {
        self.random_seed.set(seed);
    }

    /// Set the simulated reduced-motion preference
    pub fn set_reduced_motion(&self, reduced: bool) {
        self.reduced_motion.set(reduced);
    }

    /// Get all captured debug messages
    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.borrow().clone()
    }

    /// Check if a specific message was logged
    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log
            .borrow()
            .iter()
            .any(|msg| msg.contains(substr))
    }

    /// Get the number of debug messages
    pub fn debug_log_count(&self) -> usize {
        self.debug_log.borrow().len()
    }
}

impl Default for MockHal {
    fn default() -> Self {
        Self::new()
    }
}

impl Hal for MockHal {
    fn now_ms(&self) -> f64 {
        self.time_ms.get()
    }

    fn debug_write(&self, msg: &str) {
        self.debug_log.borrow_mut().push(String::from(msg));
    }

    fn random_seed(&self) -> u64 {
        self.random_seed.get()
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.pixel_ratio.get()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }
}

// =============================================================================
// ManualScheduler
// =============================================================================

#[derive(Default)]
struct SchedulerState {
    callback: Option<FrameCallback>,
    running: bool,
    /// Bumped on every start/stop so a callback taken out for invocation
    /// is not reinstalled after the scheduler changed underneath it
    generation: u64,
    clock_ms: f64,
    frames_fired: usize,
    start_calls: usize,
    stop_calls: usize,
}

/// Fake frame clock
///
/// Frames only fire when the test calls [`ManualScheduler::advance`] or
/// [`ManualScheduler::run_frames`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    /// Create a stopped scheduler at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the fake clock, firing one frame per elapsed interval
    ///
    /// Returns the number of frames that fired.
    pub fn advance(&self, ms: f64) -> usize {
        let target = self.state.borrow().clock_ms + ms;
        let mut fired = 0;

        loop {
            let next = self.state.borrow().clock_ms + FRAME_INTERVAL_MS;
            if next > target + 1e-6 {
                break;
            }

            let (callback, generation) = {
                let mut state = self.state.borrow_mut();
                state.clock_ms = next;
                if !state.running {
                    continue;
                }
                (state.callback.take(), state.generation)
            };
            let Some(mut callback) = callback else {
                continue;
            };

            // No borrow is held here: the callback may call stop() re-entrantly
            let control = callback(next);
            fired += 1;

            let mut state = self.state.borrow_mut();
            state.frames_fired += 1;
            if state.generation == generation && state.running {
                match control {
                    FrameControl::Continue => state.callback = Some(callback),
                    FrameControl::Stop => state.running = false,
                }
            }
        }

        self.state.borrow_mut().clock_ms = target;
        fired
    }

    /// Fire exactly `n` frame intervals
    pub fn run_frames(&self, n: usize) -> usize {
        self.advance(FRAME_INTERVAL_MS * n as f64)
    }

    /// Current fake clock value
    pub fn clock_ms(&self) -> f64 {
        self.state.borrow().clock_ms
    }

    /// Total frames fired since creation
    pub fn frames_fired(&self) -> usize {
        self.state.borrow().frames_fired
    }

    /// Number of `start` calls
    pub fn start_calls(&self) -> usize {
        self.state.borrow().start_calls
    }

    /// Number of `stop` calls
    pub fn stop_calls(&self) -> usize {
        self.state.borrow().stop_calls
    }

    /// Check whether a callback is still held
    pub fn has_callback(&self) -> bool {
        self.state.borrow().callback.is_some()
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self, callback: FrameCallback) -> Result<(), HalError> {
        let mut state = self.state.borrow_mut();
        state.callback = Some(callback);
        state.running = true;
        state.generation += 1;
        state.start_calls += 1;
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.callback = None;
        state.running = false;
        state.generation += 1;
        state.stop_calls += 1;
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }
}

// =============================================================================
// MockEvents
// =============================================================================

struct Registration {
    id: ListenerId,
    kind: EventKind,
    handler: Option<EventHandler>,
}

#[derive(Default)]
struct EventsState {
    ids: ListenerIds,
    registrations: Vec<Registration>,
    fail_listen: bool,
}

/// Listener registry that records what is attached
#[derive(Clone, Default)]
pub struct MockEvents {
    state: Rc<RefCell<EventsState>>,
}

impl MockEvents {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `listen` call fail
    pub fn fail_listen(&self, fail: bool) {
        self.state.borrow_mut().fail_listen = fail;
    }

    /// Number of listeners currently attached
    pub fn listener_count(&self) -> usize {
        self.state.borrow().registrations.len()
    }

    /// Number of listeners attached for one kind
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.state
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Deliver an event to every handler registered for its kind
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, event: HostEvent) -> usize {
        let kind = event.kind();
        let ids: Vec<ListenerId> = self
            .state
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.id)
            .collect();

        let mut invoked = 0;
        for id in ids {
            let handler = {
                let mut state = self.state.borrow_mut();
                state
                    .registrations
                    .iter_mut()
                    .find(|r| r.id == id)
                    .and_then(|r| r.handler.take())
            };
            let Some(mut handler) = handler else {
                continue;
            };

            handler(&event);
            invoked += 1;

            let mut state = self.state.borrow_mut();
            if let Some(reg) = state.registrations.iter_mut().find(|r| r.id == id) {
                reg.handler = Some(handler);
            }
        }
        invoked
    }
}

impl EventSource for MockEvents {
    fn listen(&mut self, kind: EventKind, handler: EventHandler) -> Result<ListenerId, HalError> {
        let mut state = self.state.borrow_mut();
        if state.fail_listen {
            return Err(HalError::ListenerFailed);
        }
        let id = state.ids.next_id();
        state.registrations.push(Registration {
            id,
            kind,
            handler: Some(handler),
        });
        Ok(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.state.borrow_mut().registrations.retain(|r| r.id != id);
    }
}

// =============================================================================
// MockLayout
// =============================================================================

/// Settable container layout box
#[derive(Clone)]
pub struct MockLayout {
    size: Rc<Cell<(f32, f32)>>,
}

impl MockLayout {
    /// Create a layout with the given logical size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Rc::new(Cell::new((width, height))),
        }
    }

    /// Change the container size
    pub fn set_size(&self, width: f32, height: f32) {
        self.size.set((width, height));
    }
}

impl LayoutSource for MockLayout {
    fn container_size(&self) -> (f32, f32) {
        self.size.get()
    }
}

// =============================================================================
// MockHost
// =============================================================================

/// A full mock host with test-side handles to every piece
pub struct MockHost {
    pub hal: Rc<MockHal>,
    pub layout: MockLayout,
    pub scheduler: ManualScheduler,
    pub events: MockEvents,
}

impl MockHost {
    /// Create a mock host with a container of the given size
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_hal(MockHal::new(), width, height)
    }

    /// Create a mock host around a preconfigured HAL
    pub fn with_hal(hal: MockHal, width: f32, height: f32) -> Self {
        Self {
            hal: Rc::new(hal),
            layout: MockLayout::new(width, height),
            scheduler: ManualScheduler::new(),
            events: MockEvents::new(),
        }
    }

    /// Build a [`Host`] sharing state with this mock
    pub fn host(&self) -> Host {
        Host::new(
            self.hal.clone(),
            Rc::new(self.layout.clone()),
            Box::new(self.scheduler.clone()),
            Box::new(self.events.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_mock_hal_time() {
        let hal = MockHal::new();
        assert_eq!(hal.now_ms(), 0.0);

        hal.advance_time(16.0);
        assert_eq!(hal.now_ms(), 16.0);

        hal.set_time(1000.0);
        assert_eq!(hal.now_ms(), 1000.0);
    }

    #[test]
    fn test_mock_hal_debug_log() {
        let hal = MockHal::new();
        hal.debug_write("[bloom] hello");
        assert!(hal.has_log_containing("hello"));
        assert_eq!(hal.debug_log_count(), 1);
    }

    #[test]
    fn test_mock_hal_capabilities() {
        assert_eq!(MockHal::with_pixel_ratio(2.0).device_pixel_ratio(), 2.0);
        assert!(MockHal::with_reduced_motion().prefers_reduced_motion());
        assert!(!MockHal::new().prefers_reduced_motion());
    }

    #[test]
    fn test_scheduler_fires_only_when_running() {
        let mut scheduler = ManualScheduler::new();
        assert_eq!(scheduler.run_frames(3), 0);

        let counter = Rc::new(Cell::new(0));
        let c = counter.clone();
        scheduler
            .start(Box::new(move |_| {
                c.set(c.get() + 1);
                FrameControl::Continue
            }))
            .unwrap();

        assert_eq!(scheduler.run_frames(5), 5);
        assert_eq!(counter.get(), 5);

        scheduler.stop();
        assert_eq!(scheduler.run_frames(5), 0);
        assert_eq!(counter.get(), 5);
        assert!(!scheduler.has_callback());
    }

    #[test]
    fn test_scheduler_stop_control() {
        let mut scheduler = ManualScheduler::new();
        scheduler
            .start(Box::new(|_| FrameControl::Stop))
            .unwrap();

        assert_eq!(scheduler.advance(1000.0), 1);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_scheduler_reentrant_stop() {
        let scheduler = ManualScheduler::new();
        let mut inner = scheduler.clone();
        let mut handle = scheduler.clone();
        handle
            .start(Box::new(move |_| {
                inner.stop();
                FrameControl::Continue
            }))
            .unwrap();

        assert_eq!(scheduler.run_frames(4), 1);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_scheduler_timestamps_increase() {
        let mut scheduler = ManualScheduler::new();
        let stamps = Rc::new(RefCell::new(vec![]));
        let s = stamps.clone();
        scheduler
            .start(Box::new(move |t| {
                s.borrow_mut().push(t);
                FrameControl::Continue
            }))
            .unwrap();

        scheduler.run_frames(3);
        let stamps = stamps.borrow();
        assert_eq!(stamps.len(), 3);
        assert!(stamps[0] < stamps[1] && stamps[1] < stamps[2]);
    }

    #[test]
    fn test_events_dispatch_and_unlisten() {
        let mut events = MockEvents::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = events
            .listen(
                EventKind::PointerMove,
                Box::new(move |_| h.set(h.get() + 1)),
            )
            .unwrap();

        assert_eq!(events.dispatch(HostEvent::PointerMove { x: 1.0, y: 1.0 }), 1);
        assert_eq!(events.dispatch(HostEvent::Resize), 0);
        assert_eq!(hits.get(), 1);

        events.unlisten(id);
        assert_eq!(events.listener_count(), 0);
        assert_eq!(events.dispatch(HostEvent::PointerMove { x: 1.0, y: 1.0 }), 0);
    }

    #[test]
    fn test_events_fail_listen() {
        let mut events = MockEvents::new();
        events.fail_listen(true);
        let result = events.listen(EventKind::Resize, Box::new(|_| {}));
        assert_eq!(result, Err(HalError::ListenerFailed));
    }

    #[test]
    fn test_layout_set_size() {
        let layout = MockLayout::new(800.0, 600.0);
        layout.set_size(1024.0, 768.0);
        assert_eq!(layout.container_size(), (1024.0, 768.0));
    }
}
