//! `requestAnimationFrame` scheduler

use std::cell::RefCell;
use std::rc::Rc;

use documind_hal::{FrameCallback, FrameControl, FrameScheduler, HalError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

struct RafState {
    window: Window,
    frame_fn: js_sys::Function,
    handle: Option<i32>,
    callback: Option<FrameCallback>,
    running: bool,
    // Bumped by every start/stop so a frame in flight can tell it was superseded
    generation: u64,
}

impl RafState {
    fn request(&mut self) -> Result<(), HalError> {
        let handle = self
            .window
            .request_animation_frame(&self.frame_fn)
            .map_err(|_| HalError::SchedulerFailed)?;
        self.handle = Some(handle);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }
}

/// One pending animation frame per instance
pub struct RafScheduler {
    state: Rc<RefCell<RafState>>,
    _closure: Closure<dyn FnMut(f64)>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        let state = Rc::new(RefCell::new(RafState {
            window,
            frame_fn: js_sys::Function::new_no_args(""),
            handle: None,
            callback: None,
            running: false,
            generation: 0,
        }));

        let weak = Rc::downgrade(&state);
        let closure = Closure::wrap(Box::new(move |timestamp: f64| {
            if let Some(state) = weak.upgrade() {
                fire(&state, timestamp);
            }
        }) as Box<dyn FnMut(f64)>);

        state.borrow_mut().frame_fn = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();

        Self {
            state,
            _closure: closure,
        }
    }
}

fn fire(state: &Rc<RefCell<RafState>>, timestamp: f64) {
    let (mut callback, generation) = {
        let mut s = state.borrow_mut();
        s.handle = None;
        match s.callback.take() {
            Some(cb) => (cb, s.generation),
            None => return,
        }
    };

    let control = callback(timestamp);

    let mut s = state.borrow_mut();
    if s.generation != generation {
        return;
    }
    if control == FrameControl::Stop {
        s.running = false;
        return;
    }
    s.callback = Some(callback);
    if s.request().is_err() {
        s.callback = None;
        s.running = false;
    }
}

impl FrameScheduler for RafScheduler {
    fn start(&mut self, callback: FrameCallback) -> Result<(), HalError> {
        let mut s = self.state.borrow_mut();
        s.cancel();
        s.generation += 1;
        s.callback = Some(callback);
        s.running = true;
        if let Err(e) = s.request() {
            s.callback = None;
            s.running = false;
            return Err(e);
        }
        Ok(())
    }

    fn stop(&mut self) {
        let Ok(mut s) = self.state.try_borrow_mut() else {
            return;
        };
        s.cancel();
        s.generation += 1;
        s.callback = None;
        s.running = false;
    }

    fn is_running(&self) -> bool {
        self.state.try_borrow().map(|s| s.running).unwrap_or(true)
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
