//! Constellation overlay component

use std::cell::RefCell;
use std::rc::Rc;

use documind_hal::{EventKind, FrameControl, HalError, Host, LayoutSource};
use serde::{Deserialize, Serialize};

use super::Lifecycle;
use crate::canvas::Canvas2d;
use crate::config::BounceTuning;
use crate::particles::BounceParticle;
use crate::simulation::{Constellation, ProximityStats};
use crate::surface::{SurfaceManager, SurfaceSize};

/// Properties of the constellation overlay
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayProps {
    pub particle_count: usize,
    pub tuning: BounceTuning,
}

impl Default for OverlayProps {
    fn default() -> Self {
        Self {
            particle_count: 55,
            tuning: BounceTuning::default(),
        }
    }
}

struct OverlayState<C> {
    constellation: Constellation,
    canvas: C,
    surface: SurfaceManager,
    last_stats: ProximityStats,
    frames: u64,
}

impl<C: Canvas2d> OverlayState<C> {
    fn resize(&mut self, container: (f32, f32)) {
        if let Some(size) = self.surface.resize(container) {
            self.canvas.configure(&size);
            self.constellation.resize(size.logical);
        }
    }

    fn frame(&mut self) {
        self.last_stats = self.constellation.frame(&mut self.canvas);
        self.frames += 1;
    }
}

/// Mounted constellation overlay; resize is its only listener
pub struct ParticleOverlay<C: Canvas2d + 'static> {
    state: Rc<RefCell<OverlayState<C>>>,
    lifecycle: Lifecycle,
}

impl<C: Canvas2d + 'static> ParticleOverlay<C> {
    pub fn mount(host: Host, canvas: C, props: OverlayProps) -> Result<Self, HalError> {
        let Host {
            hal,
            layout,
            scheduler,
            events,
        } = host;

        let mut surface = SurfaceManager::new(hal.device_pixel_ratio(), None);
        let mut canvas = canvas;
        let initial = surface.measure(layout.container_size());
        if let Some(size) = surface.resize(layout.container_size()) {
            canvas.configure(&size);
        }

        let state = Rc::new(RefCell::new(OverlayState {
            constellation: Constellation::new(
                props.particle_count,
                initial.logical,
                props.tuning,
                hal.random_seed(),
            ),
            canvas,
            surface,
            last_stats: ProximityStats::default(),
            frames: 0,
        }));

        let mut overlay = Self {
            state,
            lifecycle: Lifecycle::new(hal, scheduler, events),
        };
        overlay.attach(layout)?;

        overlay
            .lifecycle
            .hal()
            .debug_write(&format!("[overlay] mounted: {} particles", props.particle_count));
        Ok(overlay)
    }

    fn attach(&mut self, layout: Rc<dyn LayoutSource>) -> Result<(), HalError> {
        let state = self.state.clone();
        self.lifecycle.listen(
            EventKind::Resize,
            Box::new(move |_| {
                if let Ok(mut state) = state.try_borrow_mut() {
                    state.resize(layout.container_size());
                }
            }),
        )?;

        let state = self.state.clone();
        let token = self.lifecycle.token().clone();
        self.lifecycle.start(Box::new(move |_now| {
            if token.is_cancelled() {
                return FrameControl::Stop;
            }
            if let Ok(mut state) = state.try_borrow_mut() {
                state.frame();
            }
            FrameControl::Continue
        }))
    }

    /// Stop the frame loop and remove the resize listener; idempotent
    pub fn unmount(&mut self) {
        if self.lifecycle.teardown() {
            let frames = self.state.try_borrow().map(|s| s.frames).unwrap_or_default();
            self.lifecycle
                .hal()
                .debug_write(&format!("[overlay] unmounted after {} frames", frames));
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.lifecycle.is_torn_down()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn listener_count(&self) -> usize {
        self.lifecycle.listener_count()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.state.borrow().frames
    }

    /// Counters from the most recent proximity pass
    pub fn last_stats(&self) -> ProximityStats {
        self.state.borrow().last_stats
    }

    pub fn particles(&self) -> Vec<BounceParticle> {
        self.state.borrow().constellation.particles().to_vec()
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.state.borrow().surface.current()
    }
}

impl<C: Canvas2d + 'static> Drop for ParticleOverlay<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}
