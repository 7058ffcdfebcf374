//! Shader-driven "celestial bloom" background
//!
//! The GPU work sits behind [`GpuFactory`] / [`GpuDevice`] so the lifecycle
//! state machine in [`engine`] runs against a tracking mock in tests and
//! against wgpu in the browser.

mod engine;
mod gpu;
mod shaders;
mod uniforms;

#[cfg(feature = "wasm")]
mod init;
#[cfg(feature = "wasm")]
mod renderer;

pub use engine::{load_device, BloomOptions, BloomPhase, CelestialBloom};
pub use gpu::{GpuDevice, GpuFactory, LoadError, RenderError};
pub use shaders::SHADER_BLOOM;
pub use uniforms::BloomUniforms;

#[cfg(feature = "wasm")]
pub use renderer::WgpuBloomDevice;
