//! Bloom lifecycle: asynchronous GPU setup, frame loop or single static
//! frame, and full disposal
//!
//! ```text
//! Unloaded -> Loading -> Ready -> Running | StaticFrame -> Disposed
//!                   \-> Disposed (unmounted or failed while loading)
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use documind_hal::{CancelToken, EventKind, FrameControl, Hal, Host, LayoutSource};
use serde::{Deserialize, Serialize};

use super::gpu::{GpuDevice, GpuFactory, LoadError, RenderError};
use super::uniforms::BloomUniforms;
use crate::components::Lifecycle;
use crate::math::Size;
use crate::surface::{SurfaceManager, SurfaceSize};

/// Lifecycle phase of a [`CelestialBloom`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BloomPhase {
    /// Constructed; GPU load not started
    Unloaded,
    /// Waiting for the GPU bundle
    Loading,
    /// GPU bundle installed, loop not yet decided
    Ready,
    /// One frame rendered for reduced motion; nothing scheduled
    StaticFrame,
    /// Frame loop active
    Running,
    /// Torn down; terminal
    Disposed,
}

/// Bloom presentation options
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BloomOptions {
    /// CSS opacity of the drawing surface
    pub opacity: f32,
    /// Upper bound on the device pixel ratio used for the backing store
    pub pixel_ratio_cap: f32,
    /// Shader time used for the reduced-motion frame
    pub static_time: f32,
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            pixel_ratio_cap: 1.5,
            static_time: 1.0,
        }
    }
}

struct BloomCore<D> {
    phase: BloomPhase,
    device: Option<D>,
    surface: SurfaceManager,
    start_ms: Option<f64>,
    frames: usize,
    skipped: usize,
}

impl<D: GpuDevice> BloomCore<D> {
    fn render_at(&mut self, time: f32) -> Result<(), RenderError> {
        let size = self.surface.current().unwrap_or(SurfaceSize::new(Size::ZERO, 1.0));
        let device = self.device.as_mut().ok_or(RenderError::Released)?;
        device.render(&BloomUniforms::new(size.physical_width, size.physical_height, time))?;
        self.frames += 1;
        Ok(())
    }

    fn resize(&mut self, container: (f32, f32)) -> bool {
        let Some(size) = self.surface.resize(container) else {
            return false;
        };
        if size.is_empty() {
            return false;
        }
        if let Some(device) = self.device.as_mut() {
            device.resize(&size);
        }
        true
    }

    fn release(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.release();
        }
        self.phase = BloomPhase::Disposed;
    }
}

/// Acquire a GPU bundle unless the owner unmounts first
///
/// Nothing is requested when `token` is already cancelled, and a bundle that
/// resolves after cancellation is released before returning.
pub async fn load_device<F: GpuFactory>(
    factory: &F,
    size: SurfaceSize,
    token: &CancelToken,
) -> Result<F::Device, LoadError> {
    if token.is_cancelled() {
        return Err(LoadError::Cancelled);
    }
    let mut device = factory.create_device(size, token).await?;
    if token.is_cancelled() {
        device.release();
        return Err(LoadError::Cancelled);
    }
    Ok(device)
}

/// Shader-driven background
///
/// Loading is split so the host can drive the await: [`begin_load`] hands
/// out the cancellation token and size, the host awaits [`load_device`], and
/// [`finish_load`] installs (or discards) the result.
///
/// [`begin_load`]: CelestialBloom::begin_load
/// [`finish_load`]: CelestialBloom::finish_load
pub struct CelestialBloom<D: GpuDevice + 'static> {
    core: Rc<RefCell<BloomCore<D>>>,
    lifecycle: Lifecycle,
    layout: Rc<dyn LayoutSource>,
    options: BloomOptions,
    reduced_motion: bool,
}

impl<D: GpuDevice + 'static> CelestialBloom<D> {
    /// Read host capabilities once and measure the container
    pub fn new(host: Host, options: BloomOptions) -> Self {
        let Host {
            hal,
            layout,
            scheduler,
            events,
        } = host;

        let reduced_motion = hal.prefers_reduced_motion();
        let mut surface = SurfaceManager::new(hal.device_pixel_ratio(), Some(options.pixel_ratio_cap));
        surface.resize(layout.container_size());

        Self {
            core: Rc::new(RefCell::new(BloomCore {
                phase: BloomPhase::Unloaded,
                device: None,
                surface,
                start_ms: None,
                frames: 0,
                skipped: 0,
            })),
            lifecycle: Lifecycle::new(hal, scheduler, events),
            layout,
            options,
            reduced_motion,
        }
    }

    pub fn options(&self) -> BloomOptions {
        self.options
    }

    pub fn phase(&self) -> BloomPhase {
        self.core.borrow().phase
    }

    /// Frames successfully rendered so far
    pub fn frames_rendered(&self) -> usize {
        self.core.borrow().frames
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.core.borrow().surface.current()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn listener_count(&self) -> usize {
        self.lifecycle.listener_count()
    }

    /// Enter `Loading`
    ///
    /// Returns the token the loader must honor and the surface size to
    /// create the bundle for, or `None` if loading already started or the
    /// component is disposed.
    pub fn begin_load(&mut self) -> Option<(CancelToken, SurfaceSize)> {
        if self.lifecycle.is_torn_down() {
            return None;
        }
        let mut core = self.core.borrow_mut();
        if core.phase != BloomPhase::Unloaded {
            return None;
        }
        core.phase = BloomPhase::Loading;
        let size = core
            .surface
            .current()
            .unwrap_or_else(|| core.surface.measure(self.layout.container_size()));
        drop(core);

        self.hal().debug_write("[bloom] loading GPU resources");
        Some((self.lifecycle.token().clone(), size))
    }

    /// Install the result of a load
    ///
    /// A bundle that arrives after unmount is released on the spot. A
    /// failure is logged and disposes the component.
    pub fn finish_load(&mut self, result: Result<D, LoadError>) {
        let loading = !self.lifecycle.is_torn_down() && self.phase() == BloomPhase::Loading;

        match result {
            Ok(mut device) if !loading => device.release(),
            Ok(device) => self.install(device),
            Err(LoadError::Cancelled) => {
                if loading {
                    self.unmount();
                }
            }
            Err(err) => {
                self.hal().debug_write(&format!("[bloom] GPU setup failed: {}", err));
                if loading {
                    self.unmount();
                }
            }
        }
    }

    fn install(&mut self, device: D) {
        {
            let mut core = self.core.borrow_mut();
            core.device = Some(device);
            core.phase = BloomPhase::Ready;
            // Layout may have changed while loading
            core.resize(self.layout.container_size());
        }

        if let Err(err) = self.listen_resize() {
            self.hal().debug_write(&format!("[bloom] resize listener failed: {}", err));
            self.unmount();
            return;
        }

        if self.reduced_motion {
            let mut core = self.core.borrow_mut();
            if let Err(err) = core.render_at(self.options.static_time) {
                self.lifecycle
                    .hal()
                    .debug_write(&format!("[bloom] static frame failed: {}", err));
            }
            core.phase = BloomPhase::StaticFrame;
            drop(core);
            self.hal().debug_write("[bloom] reduced motion: rendered static frame");
            return;
        }

        let callback = self.frame_callback();
        match self.lifecycle.start(callback) {
            Ok(()) => {
                self.core.borrow_mut().phase = BloomPhase::Running;
                self.hal().debug_write("[bloom] frame loop started");
            }
            Err(err) => {
                self.hal().debug_write(&format!("[bloom] frame loop failed: {}", err));
                self.unmount();
            }
        }
    }

    fn listen_resize(&mut self) -> Result<(), documind_hal::HalError> {
        let core = self.core.clone();
        let layout = self.layout.clone();
        let static_time = self.options.static_time;
        let hal = self.lifecycle.hal().clone();
        self.lifecycle.listen(
            EventKind::Resize,
            Box::new(move |_| {
                let Ok(mut core) = core.try_borrow_mut() else {
                    return;
                };
                let changed = core.resize(layout.container_size());
                // A static frame is not redrawn by the loop
                if changed && core.phase == BloomPhase::StaticFrame {
                    if let Err(err) = core.render_at(static_time) {
                        hal.debug_write(&format!("[bloom] static frame failed: {}", err));
                    }
                }
            }),
        )
    }

    fn frame_callback(&self) -> documind_hal::FrameCallback {
        let core = self.core.clone();
        let token = self.lifecycle.token().clone();
        let hal = self.lifecycle.hal().clone();
        Box::new(move |now| {
            if token.is_cancelled() {
                return FrameControl::Stop;
            }
            let Ok(mut core) = core.try_borrow_mut() else {
                return FrameControl::Continue;
            };
            let start = *core.start_ms.get_or_insert(now);
            let elapsed = ((now - start) / 1000.0) as f32;

            match core.render_at(elapsed) {
                Ok(()) => FrameControl::Continue,
                Err(RenderError::Released) => FrameControl::Stop,
                Err(err) => {
                    core.skipped += 1;
                    if core.skipped == 1 {
                        hal.debug_write(&format!("[bloom] {}", err));
                    }
                    FrameControl::Continue
                }
            }
        })
    }

    fn hal(&self) -> &Rc<dyn Hal> {
        self.lifecycle.hal()
    }

    /// Cancel any pending load, stop the loop, remove the resize listener and
    /// release the GPU bundle; idempotent
    pub fn unmount(&mut self) {
        let first = self.lifecycle.teardown();
        let frames = match self.core.try_borrow_mut() {
            Ok(mut core) => {
                core.release();
                core.frames
            }
            Err(_) => 0,
        };
        if first {
            self.hal()
                .debug_write(&format!("[bloom] disposed after {} frames", frames));
        }
    }
}

impl<D: GpuDevice + 'static> Drop for CelestialBloom<D> {
    fn drop(&mut self) {
        self.unmount();
    }
}
