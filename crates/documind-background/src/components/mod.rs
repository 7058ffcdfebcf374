//! Mountable background components
//!
//! Each component owns its host bundle exclusively. Mounting acquires the
//! surface, registers listeners and starts the frame loop; unmounting (or
//! dropping) releases all of it.

mod neural;
mod overlay;

pub use neural::{NeuralBackground, NeuralProps};
pub use overlay::{OverlayProps, ParticleOverlay};

use std::rc::Rc;

use documind_hal::{
    CancelToken, EventHandler, EventKind, EventSource, FrameCallback, FrameScheduler, Hal,
    HalError, ListenerId,
};

/// Listener and frame-loop bookkeeping shared by every component
pub(crate) struct Lifecycle {
    hal: Rc<dyn Hal>,
    scheduler: Box<dyn FrameScheduler>,
    events: Box<dyn EventSource>,
    listeners: Vec<ListenerId>,
    token: CancelToken,
}

impl Lifecycle {
    pub(crate) fn new(
        hal: Rc<dyn Hal>,
        scheduler: Box<dyn FrameScheduler>,
        events: Box<dyn EventSource>,
    ) -> Self {
        Self {
            hal,
            scheduler,
            events,
            listeners: Vec::new(),
            token: CancelToken::new(),
        }
    }

    pub(crate) fn hal(&self) -> &Rc<dyn Hal> {
        &self.hal
    }

    pub(crate) fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Register a listener that teardown will remove
    pub(crate) fn listen(&mut self, kind: EventKind, handler: EventHandler) -> Result<(), HalError> {
        if self.token.is_cancelled() {
            return Err(HalError::InvalidArgument);
        }
        let id = self.events.listen(kind, handler)?;
        self.listeners.push(id);
        Ok(())
    }

    /// Start the frame loop
    pub(crate) fn start(&mut self, callback: FrameCallback) -> Result<(), HalError> {
        if self.token.is_cancelled() {
            return Err(HalError::InvalidArgument);
        }
        self.scheduler.start(callback)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel, stop the frame loop and remove every listener
    ///
    /// Safe to call any number of times, including on a half-mounted
    /// component. Returns `true` only on the first call.
    pub(crate) fn teardown(&mut self) -> bool {
        let first = !self.token.is_cancelled();
        self.token.cancel();
        self.scheduler.stop();
        for id in self.listeners.drain(..) {
            self.events.unlisten(id);
        }
        first
    }
}
