//! Browser HAL
//!
//! Reads time from `performance.now()`, writes to the console, seeds from
//! `crypto.getRandomValues` and reads the display capabilities once.

use documind_hal::Hal;
use web_sys::{Performance, Window};

use crate::util::log;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

pub struct WebHal {
    window: Window,
    performance: Option<Performance>,
}

impl WebHal {
    pub fn new(window: Window) -> Self {
        let performance = window.performance();
        Self {
            window,
            performance,
        }
    }
}

impl Hal for WebHal {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }

    fn debug_write(&self, msg: &str) {
        log(msg);
    }

    fn random_seed(&self) -> u64 {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf),
            Err(_) => (js_sys::Math::random() * u64::MAX as f64) as u64,
        }
    }

    fn device_pixel_ratio(&self) -> f32 {
        let dpr = self.window.device_pixel_ratio() as f32;
        if dpr.is_finite() && dpr > 0.0 {
            dpr
        } else {
            1.0
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false)
    }
}
