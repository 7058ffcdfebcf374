//! Bouncing particle for the constellation overlay

use fastrand::Rng;

use crate::color::Color;
use crate::config::BounceTuning;
use crate::math::{Size, Vec2};

/// One pulsing dot that bounces off the surface edges
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BounceParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Base opacity before the pulse is applied
    pub opacity: f32,
    /// Hue in degrees
    pub hue: f32,
    pub pulse_speed: f32,
    pub pulse_phase: f32,
    pulse_amplitude: f32,
}

impl BounceParticle {
    /// Spawn with random position, velocity, size, opacity, hue and pulse
    pub fn spawn(bounds: Size, tuning: &BounceTuning, rng: &mut Rng) -> Self {
        let mut signed = || (rng.f32() - 0.5) * 2.0 * tuning.max_speed;
        let velocity = Vec2::new(signed(), signed());
        Self {
            position: Vec2::new(rng.f32() * bounds.width, rng.f32() * bounds.height),
            velocity,
            radius: tuning.min_radius + rng.f32() * tuning.radius_span,
            opacity: tuning.min_opacity + rng.f32() * tuning.opacity_span,
            hue: if rng.bool() { tuning.hues[0] } else { tuning.hues[1] },
            pulse_speed: tuning.min_pulse_speed + rng.f32() * tuning.pulse_speed_span,
            pulse_phase: rng.f32() * std::f32::consts::TAU,
            pulse_amplitude: tuning.pulse_amplitude,
        }
    }

    /// Advance one frame: integrate, reflect off the edges, advance the pulse
    ///
    /// A component that leaves `[0, extent]` is mirrored back inside and its
    /// velocity is turned to point inward.
    pub fn step(mut self, bounds: Size) -> Self {
        self.position += self.velocity;
        self.pulse_phase += self.pulse_speed;

        let (x, vx) = reflect(self.position.x, self.velocity.x, bounds.width);
        let (y, vy) = reflect(self.position.y, self.velocity.y, bounds.height);
        self.position = Vec2::new(x, y);
        self.velocity = Vec2::new(vx, vy);
        self
    }

    /// Opacity with the sinusoidal pulse applied, never negative
    pub fn current_opacity(&self) -> f32 {
        (self.opacity + self.pulse_phase.sin() * self.pulse_amplitude).max(0.0)
    }

    /// Fill color for the current frame
    pub fn color(&self) -> Color {
        Color::hsla(self.hue, 85.0, 70.0, self.current_opacity())
    }
}

fn reflect(position: f32, velocity: f32, extent: f32) -> (f32, f32) {
    let extent = extent.max(0.0);
    if position < 0.0 {
        ((-position).min(extent), velocity.abs())
    } else if position > extent {
        ((2.0 * extent - position).max(0.0), -velocity.abs())
    } else {
        (position, velocity)
    }
}
