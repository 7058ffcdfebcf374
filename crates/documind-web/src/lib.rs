//! Browser bindings for DocuMind
//!
//! ## Module Structure
//!
//! - `hal` - `Hal` over `performance`, `console` and `matchMedia`
//! - `scheduler` - per-instance `requestAnimationFrame` loop
//! - `events` - window resize and container pointer listeners
//! - `layout` - container measurement
//! - `canvas` - `Canvas2d` over `CanvasRenderingContext2d`
//! - `gpu` - canvas + wgpu device factory for the bloom shader
//! - `background` - `NeuralBackground`, `ParticleOverlay`, `CelestialBloom` classes
//! - `fetch` / `storage` / `chat` - backend transport, session storage and the
//!   `DocuMindChat` controller
//!
//! Every class tears itself down in `unmount()` and again on `free()`.

// =============================================================================
// Module declarations
// =============================================================================

mod background;
mod canvas;
mod chat;
mod events;
mod fetch;
mod gpu;
mod hal;
mod layout;
mod scheduler;
mod storage;
pub(crate) mod util;

// =============================================================================
// Public re-exports
// =============================================================================

pub use background::{CelestialBloomHandle, NeuralBackgroundHandle, ParticleOverlayHandle};
pub use chat::DocuMindChat;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
