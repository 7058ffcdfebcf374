//! Particle state and per-frame update rules
//!
//! Both variants expose a pure `step` so the update can be tested without a
//! canvas or a frame scheduler. Randomness is always passed in explicitly.

mod bounce;
mod flow;

pub use bounce::BounceParticle;
pub use flow::{flow_angle, wrap, FlowParticle};
