//! Flow-field background with pointer repulsion

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use documind_hal::{EventKind, FrameControl, HalError, Host, HostEvent, LayoutSource};
use serde::{Deserialize, Serialize};

use super::Lifecycle;
use crate::canvas::Canvas2d;
use crate::color::Color;
use crate::config::{FlowTuning, SimulationConfig};
use crate::math::Vec2;
use crate::particles::FlowParticle;
use crate::simulation::{FlowField, FlowStyle};
use crate::surface::{SurfaceManager, SurfaceSize};

/// Properties of the flow-field background
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NeuralProps {
    /// Particle color
    pub color: Color,
    /// Opacity of the per-frame trail fade
    pub trail_opacity: f32,
    /// Number of particles, fixed for the lifetime of the component
    pub particle_count: usize,
    /// Global speed multiplier
    pub speed: f32,
    /// Flow constants
    pub tuning: FlowTuning,
}

impl Default for NeuralProps {
    fn default() -> Self {
        Self {
            color: Color::INDIGO,
            trail_opacity: 0.10,
            particle_count: 480,
            speed: 0.7,
            tuning: FlowTuning::default(),
        }
    }
}

struct NeuralState<C> {
    field: FlowField,
    canvas: C,
    surface: SurfaceManager,
    style: FlowStyle,
}

impl<C: Canvas2d> NeuralState<C> {
    fn resize(&mut self, container: (f32, f32)) {
        if let Some(size) = self.surface.resize(container) {
            self.canvas.configure(&size);
            self.field.resize(size.logical);
        }
    }

    fn frame(&mut self) {
        self.field.frame(&mut self.canvas, &self.style);
    }
}

/// Mounted flow-field background
///
/// Dropping the component unmounts it.
pub struct NeuralBackground<C: Canvas2d + 'static> {
    state: Rc<RefCell<NeuralState<C>>>,
    lifecycle: Lifecycle,
    frames: Rc<Cell<u64>>,
}

impl<C: Canvas2d + 'static> NeuralBackground<C> {
    /// Size the surface, create the particle set, register resize and
    /// pointer listeners and start the frame loop
    ///
    /// On error everything acquired so far is released before returning.
    pub fn mount(host: Host, canvas: C, props: NeuralProps) -> Result<Self, HalError> {
        let Host {
            hal,
            layout,
            scheduler,
            events,
        } = host;

        let mut surface = SurfaceManager::new(hal.device_pixel_ratio(), None);
        let initial = surface.measure(layout.container_size());
        let config = SimulationConfig::new(initial.logical, props.speed).with_tuning(props.tuning);
        let field = FlowField::new(props.particle_count, config, hal.random_seed());

        let mut canvas = canvas;
        if let Some(size) = surface.resize(layout.container_size()) {
            canvas.configure(&size);
        }

        let state = Rc::new(RefCell::new(NeuralState {
            field,
            canvas,
            surface,
            style: FlowStyle {
                color: props.color,
                trail_opacity: props.trail_opacity,
            },
        }));

        let mut background = Self {
            state,
            lifecycle: Lifecycle::new(hal, scheduler, events),
            frames: Rc::new(Cell::new(0)),
        };
        background.attach(layout)?;

        background.lifecycle.hal().debug_write(&format!(
            "[neural] mounted: {} particles, {}x{}",
            props.particle_count, initial.logical.width, initial.logical.height
        ));
        Ok(background)
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
        self.lifecycle.listen(
            EventKind::PointerMove,
            Box::new(move |event| {
                if let HostEvent::PointerMove { x, y } = *event {
                    if let Ok(mut state) = state.try_borrow_mut() {
                        state.field.set_pointer(Some(Vec2::new(x, y)));
                    }
                }
            }),
        )?;

        let state = self.state.clone();
        self.lifecycle.listen(
            EventKind::PointerLeave,
            Box::new(move |_| {
                if let Ok(mut state) = state.try_borrow_mut() {
                    state.field.set_pointer(None);
                }
            }),
        )?;

        let state = self.state.clone();
        let frames = self.frames.clone();
        let token = self.lifecycle.token().clone();
        self.lifecycle.start(Box::new(move |_now| {
            if token.is_cancelled() {
                return FrameControl::Stop;
            }
            if let Ok(mut state) = state.try_borrow_mut() {
                state.frame();
                frames.set(frames.get() + 1);
            }
            FrameControl::Continue
        }))
    }

    /// Stop the frame loop and remove every listener; idempotent
    pub fn unmount(&mut self) {
        if self.lifecycle.teardown() {
            self.lifecycle
                .hal()
                .debug_write(&format!("[neural] unmounted after {} frames", self.frames.get()));
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

    /// Frames simulated so far
    pub fn frames_drawn(&self) -> u64 {
        self.frames.get()
    }

    /// Snapshot of the particle set
    pub fn particles(&self) -> Vec<FlowParticle> {
        self.state.borrow().field.particles().to_vec()
    }

    /// Snapshot of the shared simulation configuration
    pub fn config(&self) -> SimulationConfig {
        *self.state.borrow().field.config()
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.state.borrow().surface.current()
    }
}

impl<C: Canvas2d + 'static> Drop for NeuralBackground<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}
