//! Animated backgrounds for the DocuMind web client
//!
//! Three independently mountable components:
//!
//! - [`NeuralBackground`]: flow-field particles with fading trails and
//!   pointer repulsion
//! - [`ParticleOverlay`]: bouncing dots linked by gradient lines when close
//! - [`CelestialBloom`]: a fractal-noise shader on the GPU, with a single
//!   static frame when the user prefers reduced motion
//!
//! Platform access goes through `documind-hal`, drawing through
//! [`Canvas2d`] and [`GpuDevice`], so every component runs against the
//! mocks in [`testing`] and `documind-hal-mock`.

pub mod bloom;
pub mod canvas;
pub mod color;
pub mod components;
pub mod config;
pub mod math;
pub mod particles;
pub mod simulation;
pub mod surface;
pub mod testing;

pub use bloom::{
    load_device, BloomOptions, BloomPhase, BloomUniforms, CelestialBloom, GpuDevice, GpuFactory,
    LoadError, RenderError,
};
pub use canvas::Canvas2d;
pub use color::Color;
pub use components::{NeuralBackground, NeuralProps, OverlayProps, ParticleOverlay};
pub use config::{BounceTuning, FlowTuning, SimulationConfig};
pub use math::{Size, Vec2};
pub use particles::{BounceParticle, FlowParticle};
pub use simulation::{scan_links, Constellation, FlowField, FlowStyle, Link, ProximityStats};
pub use surface::{SurfaceManager, SurfaceSize};

#[cfg(feature = "wasm")]
pub use bloom::WgpuBloomDevice;
