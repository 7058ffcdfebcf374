use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use documind_hal::CancelToken;

use crate::bloom::{BloomUniforms, GpuDevice, GpuFactory, LoadError, RenderError};
use crate::surface::SurfaceSize;

/// Objects a bundle holds: context, program, geometry, uniform bindings
pub const OBJECTS_PER_DEVICE: usize = 4;

/// Shared record of everything the mock GPU allocated and released
#[derive(Clone, Debug, Default)]
pub struct GpuLedger {
    /// `create_device` calls
    pub create_calls: usize,
    /// Devices handed out
    pub devices_created: usize,
    /// Devices released
    pub devices_released: usize,
    /// GPU objects currently allocated
    pub live_objects: usize,
    /// Uniforms of every successful render
    pub renders: Vec<BloomUniforms>,
    /// Sizes passed to `resize`
    pub resizes: Vec<SurfaceSize>,
    /// When set, `render` fails with [`RenderError::SurfaceLost`]
    pub fail_renders: bool,
}

/// Factory for [`MockGpuDevice`]s
#[derive(Clone, Debug, Default)]
pub struct MockGpuFactory {
    ledger: Rc<RefCell<GpuLedger>>,
    failure: Rc<RefCell<Option<LoadError>>>,
}

impl MockGpuFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_device` fail with `error`
    pub fn fail_with(&self, error: LoadError) {
        *self.failure.borrow_mut() = Some(error);
    }

    /// Make every subsequent `render` on this factory's devices fail
    pub fn fail_renders(&self, fail: bool) {
        self.ledger.borrow_mut().fail_renders = fail;
    }

    /// Snapshot of the ledger
    pub fn ledger(&self) -> GpuLedger {
        self.ledger.borrow().clone()
    }

    pub fn live_objects(&self) -> usize {
        self.ledger.borrow().live_objects
    }

    pub fn render_count(&self) -> usize {
        self.ledger.borrow().renders.len()
    }

    /// Build a device synchronously, bypassing the async path
    pub fn create_now(&self) -> MockGpuDevice {
        let mut ledger = self.ledger.borrow_mut();
        ledger.create_calls += 1;
        ledger.devices_created += 1;
        ledger.live_objects += OBJECTS_PER_DEVICE;
        MockGpuDevice {
            ledger: self.ledger.clone(),
            released: false,
        }
    }
}

impl GpuFactory for MockGpuFactory {
    type Device = MockGpuDevice;

    fn create_device(
        &self,
        _size: SurfaceSize,
        token: &CancelToken,
    ) -> impl Future<Output = Result<MockGpuDevice, LoadError>> {
        let failure = self.failure.borrow().clone();
        let cancelled = token.is_cancelled();
        let factory = self.clone();
        async move {
            if let Some(error) = failure {
                factory.ledger.borrow_mut().create_calls += 1;
                return Err(error);
            }
            if cancelled {
                return Err(LoadError::Cancelled);
            }
            Ok(factory.create_now())
        }
    }
}

/// Tracking GPU device; dropping without `release` leaves its objects live
#[derive(Debug)]
pub struct MockGpuDevice {
    ledger: Rc<RefCell<GpuLedger>>,
    released: bool,
}

impl MockGpuDevice {
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl GpuDevice for MockGpuDevice {
    fn resize(&mut self, size: &SurfaceSize) {
        if !self.released {
            self.ledger.borrow_mut().resizes.push(*size);
        }
    }

    fn render(&mut self, uniforms: &BloomUniforms) -> Result<(), RenderError> {
        if self.released {
            return Err(RenderError::Released);
        }
        if self.ledger.borrow().fail_renders {
            return Err(RenderError::SurfaceLost);
        }
        self.ledger.borrow_mut().renders.push(*uniforms);
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut ledger = self.ledger.borrow_mut();
        ledger.devices_released += 1;
        ledger.live_objects -= OBJECTS_PER_DEVICE;
    }
}
