//! Simulation configuration shared by every particle in a simulation
//!
//! The configuration is written only by the resize and pointer handlers and
//! read by the per-frame step. Paired fields (width and height) live in one
//! [`Size`] so a resize is a single assignment.

use serde::{Deserialize, Serialize};

use crate::math::{Size, Vec2};

/// Tunable constants for the flow-field variant
///
/// These are visual defaults, not a numerical contract.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTuning {
    /// Spatial frequency of the flow-angle noise
    pub noise_scale: f32,
    /// Acceleration along the flow angle per frame (before speed scaling)
    pub flow_gain: f32,
    /// Pointer interaction radius in logical pixels
    pub pointer_radius: f32,
    /// Strength of the pointer repulsion
    pub pointer_gain: f32,
    /// Multiplicative velocity damping per frame (< 1)
    pub damping: f32,
    /// Shortest particle lifetime in frames
    pub min_life: u32,
    /// Lifetimes are drawn from `min_life..min_life + life_span`
    pub life_span: u32,
    /// Fraction of particles created with a random age
    pub prewarm_fraction: f32,
}

impl Default for FlowTuning {
    fn default() -> Self {
        Self {
            noise_scale: 0.005,
            flow_gain: 0.18,
            pointer_radius: 160.0,
            pointer_gain: 0.04,
            damping: 0.95,
            min_life: 80,
            life_span: 220,
            prewarm_fraction: 0.7,
        }
    }
}

/// Tunable constants for the bouncing variant
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceTuning {
    /// Velocity components are drawn from `-max_speed..max_speed`
    pub max_speed: f32,
    /// Smallest dot radius
    pub min_radius: f32,
    /// Radii are drawn from `min_radius..min_radius + radius_span`
    pub radius_span: f32,
    /// Smallest base opacity
    pub min_opacity: f32,
    /// Opacities are drawn from `min_opacity..min_opacity + opacity_span`
    pub opacity_span: f32,
    /// Amplitude of the sinusoidal opacity pulse
    pub pulse_amplitude: f32,
    /// Slowest pulse phase increment per frame
    pub min_pulse_speed: f32,
    /// Pulse speeds are drawn from `min_pulse_speed..min_pulse_speed + pulse_speed_span`
    pub pulse_speed_span: f32,
    /// The two hues particles are tinted with
    pub hues: [f32; 2],
    /// Pairs closer than this are linked
    pub link_distance: f32,
    /// Link opacity at zero distance
    pub link_alpha: f32,
}

impl Default for BounceTuning {
    fn default() -> Self {
        Self {
            max_speed: 0.2,
            min_radius: 0.5,
            radius_span: 2.0,
            min_opacity: 0.2,
            opacity_span: 0.6,
            pulse_amplitude: 0.1,
            min_pulse_speed: 0.01,
            pulse_speed_span: 0.02,
            hues: [240.0, 190.0],
            link_distance: 120.0,
            link_alpha: 0.35,
        }
    }
}

/// Shared configuration of one flow-field simulation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Current surface bounds in logical pixels
    pub bounds: Size,
    /// Global speed multiplier
    pub speed: f32,
    /// Pointer in surface-local coordinates; `None` when the pointer is absent
    pub pointer: Option<Vec2>,
    /// Flow constants
    pub tuning: FlowTuning,
}

impl SimulationConfig {
    /// Create a configuration with no pointer
    pub fn new(bounds: Size, speed: f32) -> Self {
        Self {
            bounds,
            speed,
            pointer: None,
            tuning: FlowTuning::default(),
        }
    }

    /// Replace the tuning constants
    pub fn with_tuning(mut self, tuning: FlowTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_tuning_defaults() {
        let t = FlowTuning::default();
        assert!(t.damping < 1.0);
        assert_eq!(t.min_life, 80);
        assert_eq!(t.min_life + t.life_span, 300);
    }

    #[test]
    fn test_flow_tuning_partial_json() {
        let t: FlowTuning = serde_json::from_str(r#"{"damping":0.9}"#).unwrap();
        assert!((t.damping - 0.9).abs() < 1e-6);
        assert!((t.flow_gain - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_simulation_config_new() {
        let cfg = SimulationConfig::new(Size::new(800.0, 600.0), 0.7);
        assert!(cfg.pointer.is_none());
        assert_eq!(cfg.tuning, FlowTuning::default());
    }
}
