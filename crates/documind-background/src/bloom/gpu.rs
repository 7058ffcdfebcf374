use std::fmt;
use std::future::Future;

use documind_hal::CancelToken;

use super::uniforms::BloomUniforms;
use crate::surface::SurfaceSize;

/// An initialized GPU resource bundle: context, program, geometry and
/// uniform bindings
pub trait GpuDevice {
    /// Reconfigure for a new surface size
    fn resize(&mut self, size: &SurfaceSize);

    /// Draw one frame
    fn render(&mut self, uniforms: &BloomUniforms) -> Result<(), RenderError>;

    /// Release every GPU object and detach the drawing surface
    ///
    /// Idempotent; `render` after `release` returns [`RenderError::Released`].
    fn release(&mut self);
}

/// Asynchronous GPU bundle constructor
pub trait GpuFactory {
    type Device: GpuDevice + 'static;

    /// Acquire a device for a surface of `size`
    ///
    /// Implementations check `token` after each await and return
    /// [`LoadError::Cancelled`] without keeping anything they acquired.
    fn create_device(
        &self,
        size: SurfaceSize,
        token: &CancelToken,
    ) -> impl Future<Output = Result<Self::Device, LoadError>>;
}

/// GPU setup failure
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The owning component unmounted while loading
    Cancelled,
    /// The platform has no usable GPU API
    Unsupported(String),
    /// No adapter matched the surface
    AdapterUnavailable,
    /// The adapter refused to create a device
    DeviceRequest(String),
    /// The drawing surface could not be created
    Surface(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Cancelled => write!(f, "Load cancelled"),
            LoadError::Unsupported(msg) => write!(f, "GPU not supported: {}", msg),
            LoadError::AdapterUnavailable => write!(f, "Failed to find suitable GPU adapter"),
            LoadError::DeviceRequest(msg) => write!(f, "Failed to create device: {}", msg),
            LoadError::Surface(msg) => write!(f, "Failed to create surface: {}", msg),
        }
    }
}

/// Per-frame render failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// Surface lost or outdated; it was reconfigured and the frame skipped
    SurfaceLost,
    OutOfMemory,
    /// GPU timed out; frame skipped
    Timeout,
    /// Device already released
    Released,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface reconfigured, skip frame"),
            RenderError::OutOfMemory => write!(f, "Out of GPU memory"),
            RenderError::Timeout => write!(f, "GPU timeout, skip frame"),
            RenderError::Released => write!(f, "GPU resources already released"),
        }
    }
}
