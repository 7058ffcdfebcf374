//! Flow-field particle: drifts along a procedural angle field, is pushed away
//! by the pointer, and respawns when its lifetime runs out.

use std::f32::consts::PI;

use fastrand::Rng;

use crate::config::{FlowTuning, SimulationConfig};
use crate::math::{Size, Vec2};

const PEAK_ALPHA: f32 = 0.65;

/// One flow-field particle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowParticle {
    /// Position in logical pixels
    pub position: Vec2,
    /// Velocity in logical pixels per frame
    pub velocity: Vec2,
    /// Frames since (re)spawn
    pub age: u32,
    /// Lifetime in frames
    pub life: u32,
}

impl FlowParticle {
    /// Spawn a fresh particle at a random position with zero velocity
    pub fn spawn(bounds: Size, tuning: &FlowTuning, rng: &mut Rng) -> Self {
        Self {
            position: Vec2::new(rng.f32() * bounds.width, rng.f32() * bounds.height),
            velocity: Vec2::ZERO,
            age: 0,
            life: tuning.min_life + rng.u32(0..tuning.life_span.max(1)),
        }
    }

    /// Spawn a particle that is already part-way through its life
    pub fn prewarmed(bounds: Size, tuning: &FlowTuning, rng: &mut Rng) -> Self {
        let mut particle = Self::spawn(bounds, tuning, rng);
        particle.age = rng.u32(0..particle.life.max(1));
        particle
    }

    /// Advance one frame
    ///
    /// Accelerates along the flow angle, applies pointer repulsion inside the
    /// interaction radius, damps, integrates, ages, respawns when the age
    /// passes the lifetime, and finally wraps the position into bounds.
    pub fn step(mut self, config: &SimulationConfig, rng: &mut Rng) -> Self {
        let tuning = &config.tuning;

        let angle = flow_angle(self.position, tuning.noise_scale);
        self.velocity += Vec2::from_angle(angle) * (tuning.flow_gain * config.speed);

        if let Some(pointer) = config.pointer {
            let offset = pointer - self.position;
            let radius = tuning.pointer_radius;
            let dist_sq = offset.length_squared();
            if dist_sq < radius * radius {
                let falloff = (radius - dist_sq.sqrt()) / radius;
                self.velocity -= offset * (falloff * tuning.pointer_gain);
            }
        }

        self.velocity *= tuning.damping;
        self.position += self.velocity;
        self.age += 1;

        if self.age > self.life {
            self = Self::spawn(config.bounds, tuning, rng);
        }

        self.position = Vec2::new(
            wrap(self.position.x, config.bounds.width),
            wrap(self.position.y, config.bounds.height),
        );
        self
    }

    /// Triangular fade-in/fade-out over the particle's life, peaking at 0.65
    pub fn alpha(&self) -> f32 {
        if self.life == 0 {
            return 0.0;
        }
        let t = self.age as f32 / self.life as f32;
        ((1.0 - (t - 0.5).abs() * 2.0) * PEAK_ALPHA).max(0.0)
    }
}

/// Flow angle at a point: `(cos(x k) + sin(y k)) * PI`
#[inline]
pub fn flow_angle(position: Vec2, noise_scale: f32) -> f32 {
    ((position.x * noise_scale).cos() + (position.y * noise_scale).sin()) * PI
}

/// Wrap a coordinate into `[0, extent)`
///
/// Returns 0 for empty or non-finite extents.
#[inline]
pub fn wrap(value: f32, extent: f32) -> f32 {
    if extent.is_nan() || extent <= 0.0 || !extent.is_finite() || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to exactly `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: f32, height: f32) -> SimulationConfig {
        SimulationConfig::new(Size::new(width, height), 1.0)
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(10.0, 100.0), 10.0);
        assert_eq!(wrap(100.0, 100.0), 0.0);
        assert!((wrap(-1.0, 100.0) - 99.0).abs() < 1e-4);
        assert!((wrap(250.0, 100.0) - 50.0).abs() < 1e-4);
        assert_eq!(wrap(5.0, 0.0), 0.0);
        assert_eq!(wrap(f32::NAN, 100.0), 0.0);

        let tiny = wrap(-1e-10, 100.0);
        assert!(tiny >= 0.0 && tiny < 100.0);
    }

    #[test]
    fn test_spawn_within_bounds() {
        let mut rng = Rng::with_seed(7);
        let tuning = FlowTuning::default();
        for _ in 0..100 {
            let p = FlowParticle::spawn(Size::new(320.0, 200.0), &tuning, &mut rng);
            assert!(p.position.x >= 0.0 && p.position.x < 320.0);
            assert!(p.position.y >= 0.0 && p.position.y < 200.0);
            assert_eq!(p.velocity, Vec2::ZERO);
            assert_eq!(p.age, 0);
            assert!(p.life >= 80 && p.life < 300);
        }
    }

    #[test]
    fn test_prewarmed_age_below_life() {
        let mut rng = Rng::with_seed(11);
        let tuning = FlowTuning::default();
        for _ in 0..100 {
            let p = FlowParticle::prewarmed(Size::new(100.0, 100.0), &tuning, &mut rng);
            assert!(p.age < p.life);
        }
    }

    #[test]
    fn test_step_respawns_after_life() {
        let mut rng = Rng::with_seed(3);
        let cfg = config(400.0, 300.0);
        let p = FlowParticle {
            position: Vec2::new(50.0, 50.0),
            velocity: Vec2::new(1.0, 1.0),
            age: 100,
            life: 100,
        };

        let next = p.step(&cfg, &mut rng);
        assert_eq!(next.age, 0);
        assert_eq!(next.velocity, Vec2::ZERO);
        assert!(next.life >= 80 && next.life < 300);
    }

    #[test]
    fn test_pointer_repels() {
        let mut rng = Rng::with_seed(1);
        let mut cfg = config(400.0, 400.0);
        cfg.tuning.flow_gain = 0.0;
        cfg.pointer = Some(Vec2::new(210.0, 200.0));

        let p = FlowParticle {
            position: Vec2::new(200.0, 200.0),
            velocity: Vec2::ZERO,
            age: 0,
            life: 200,
        };
        let next = p.step(&cfg, &mut rng);
        assert!(next.velocity.x < 0.0, "pushed away from the pointer");
        assert!(next.velocity.y.abs() < 1e-6);
    }

    #[test]
    fn test_pointer_outside_radius_ignored() {
        let mut rng = Rng::with_seed(1);
        let mut cfg = config(1000.0, 1000.0);
        cfg.tuning.flow_gain = 0.0;
        cfg.pointer = Some(Vec2::new(900.0, 900.0));

        let p = FlowParticle {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::ZERO,
            age: 0,
            life: 200,
        };
        assert_eq!(p.step(&cfg, &mut rng).velocity, Vec2::ZERO);
    }

    #[test]
    fn test_alpha_envelope() {
        let mut p = FlowParticle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            age: 0,
            life: 100,
        };
        assert!(p.alpha() < 1e-6);
        p.age = 50;
        assert!((p.alpha() - 0.65).abs() < 1e-4);
        p.age = 100;
        assert!(p.alpha() < 1e-4);
        p.age = 101;
        assert_eq!(p.alpha(), 0.0);
    }
}
