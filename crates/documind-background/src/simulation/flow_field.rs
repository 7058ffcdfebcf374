//! Flow-field simulation with fading trails

use fastrand::Rng;

use crate::canvas::Canvas2d;
use crate::color::Color;
use crate::config::SimulationConfig;
use crate::math::{Size, Vec2};
use crate::particles::FlowParticle;

/// Dark navy the trail fade is painted with
pub const TRAIL_COLOR: Color = Color::rgba(2, 11, 24, 1.0);

const PARTICLE_SIZE: f32 = 1.5;

/// Visual style of the flow field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowStyle {
    /// Particle color
    pub color: Color,
    /// Opacity of the per-frame fade; lower leaves longer trails
    pub trail_opacity: f32,
}

/// Number of particles out of `count` that start with a head start; rounds up
/// so small fields still get one
fn prewarm_count(count: usize, fraction: f32) -> usize {
    ((count as f32 * fraction.clamp(0.0, 1.0)).ceil() as usize).min(count)
}

/// A set of flow particles sharing one configuration
#[derive(Debug)]
pub struct FlowField {
    config: SimulationConfig,
    particles: Vec<FlowParticle>,
    rng: Rng,
}

impl FlowField {
    /// Create `count` particles; a share of them start with a random age
    /// so lifetimes do not expire in lockstep
    pub fn new(count: usize, config: SimulationConfig, seed: u64) -> Self {
        let mut rng = Rng::with_seed(seed);
        let prewarm = prewarm_count(count, config.tuning.prewarm_fraction);
        let particles = (0..count)
            .map(|i| {
                if i < prewarm {
                    FlowParticle::prewarmed(config.bounds, &config.tuning, &mut rng)
                } else {
                    FlowParticle::spawn(config.bounds, &config.tuning, &mut rng)
                }
            })
            .collect();

        Self {
            config,
            particles,
            rng,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn particles(&self) -> &[FlowParticle] {
        &self.particles
    }

    /// Update the bounds every particle wraps into
    pub fn resize(&mut self, bounds: Size) {
        self.config.bounds = bounds;
    }

    /// Update the pointer; `None` disables the repulsion
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.config.pointer = pointer;
    }

    /// Advance every particle one frame
    pub fn step(&mut self) {
        for particle in &mut self.particles {
            *particle = particle.step(&self.config, &mut self.rng);
        }
    }

    /// Draw every particle at its current position
    pub fn draw(&self, canvas: &mut dyn Canvas2d, style: &FlowStyle) {
        let base = style.color.alpha();
        for particle in &self.particles {
            canvas.fill_rect(
                particle.position,
                Size::new(PARTICLE_SIZE, PARTICLE_SIZE),
                style.color.with_alpha(base * particle.alpha()),
            );
        }
    }

    /// Fade the previous frame, step, and draw
    pub fn frame(&mut self, canvas: &mut dyn Canvas2d, style: &FlowStyle) {
        canvas.fill_all(TRAIL_COLOR.with_alpha(style.trail_opacity));
        self.step();
        self.draw(canvas, style);
    }
}
