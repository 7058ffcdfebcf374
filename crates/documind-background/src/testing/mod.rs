//! Recording doubles for the canvas and GPU seams
//!
//! Used by this crate's tests and by downstream crates that want to assert
//! on draw calls or GPU resource lifetimes without a browser.

mod mock_gpu;
mod recording_canvas;

pub use mock_gpu::{GpuLedger, MockGpuDevice, MockGpuFactory, OBJECTS_PER_DEVICE};
pub use recording_canvas::{DrawCommand, RecordingCanvas};
