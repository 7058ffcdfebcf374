//! Constellation overlay: bouncing dots linked by gradient lines

use fastrand::Rng;

use super::proximity::{scan_links, ProximityStats};
use crate::canvas::Canvas2d;
use crate::color::Color;
use crate::config::BounceTuning;
use crate::math::Size;
use crate::particles::BounceParticle;

const LINK_START: Color = Color::rgba(99, 102, 241, 1.0);
const LINK_END: Color = Color::rgba(6, 182, 212, 1.0);
const LINK_WIDTH: f32 = 0.8;

/// A set of bouncing particles and their proximity links
#[derive(Debug)]
pub struct Constellation {
    bounds: Size,
    tuning: BounceTuning,
    particles: Vec<BounceParticle>,
}

impl Constellation {
    pub fn new(count: usize, bounds: Size, tuning: BounceTuning, seed: u64) -> Self {
        let mut rng = Rng::with_seed(seed);
        let particles = (0..count)
            .map(|_| BounceParticle::spawn(bounds, &tuning, &mut rng))
            .collect();
        Self {
            bounds,
            tuning,
            particles,
        }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn particles(&self) -> &[BounceParticle] {
        &self.particles
    }

    /// Update the bounds particles reflect off
    pub fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    /// Clear, draw links between pre-step positions, then step and draw dots
    pub fn frame(&mut self, canvas: &mut dyn Canvas2d) -> ProximityStats {
        canvas.clear();

        let particles = &self.particles;
        let stats = scan_links(
            particles,
            |p| p.position,
            self.tuning.link_distance,
            self.tuning.link_alpha,
            |link| {
                canvas.stroke_gradient_line(
                    particles[link.a].position,
                    particles[link.b].position,
                    LINK_START.with_alpha(link.alpha),
                    LINK_END.with_alpha(link.alpha * 0.5),
                    LINK_WIDTH,
                );
            },
        );

        for particle in &mut self.particles {
            *particle = particle.step(self.bounds);
            canvas.fill_circle(particle.position, particle.radius, particle.color());
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_within_bounds() {
        let c = Constellation::new(55, Size::new(300.0, 200.0), BounceTuning::default(), 8);
        assert_eq!(c.particles().len(), 55);
        assert!(c
            .particles()
            .iter()
            .all(|p| p.position.x <= 300.0 && p.position.y <= 200.0));
    }

    #[test]
    fn test_resize_updates_bounds() {
        let mut c = Constellation::new(0, Size::new(300.0, 200.0), BounceTuning::default(), 8);
        c.resize(Size::new(10.0, 10.0));
        assert_eq!(c.bounds(), Size::new(10.0, 10.0));
    }
}
