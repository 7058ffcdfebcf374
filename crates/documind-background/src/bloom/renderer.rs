use documind_hal::CancelToken;

use super::gpu::{GpuDevice, LoadError, RenderError};
use super::init::*;
use super::uniforms::BloomUniforms;
use crate::surface::SurfaceSize;

struct GpuResources {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
}

/// wgpu-backed bloom renderer drawing into a canvas element
pub struct WgpuBloomDevice {
    canvas: web_sys::HtmlCanvasElement,
    gpu: Option<GpuResources>,
}

impl WgpuBloomDevice {
    /// Bind to `canvas` and build the pipeline
    ///
    /// The canvas is expected to be attached already; it is removed again
    /// on failure or cancellation.
    pub async fn new(
        canvas: web_sys::HtmlCanvasElement,
        size: SurfaceSize,
        token: &CancelToken,
    ) -> Result<Self, LoadError> {
        let result = Self::setup(canvas.clone(), size, token).await;
        if result.is_err() {
            canvas.remove();
        }
        result
    }

    async fn setup(
        canvas: web_sys::HtmlCanvasElement,
        size: SurfaceSize,
        token: &CancelToken,
    ) -> Result<Self, LoadError> {
        let width = size.physical_width.max(1);
        let height = size.physical_height.max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let (instance, surface) = create_surface(canvas.clone())?;
        let (device, queue, adapter) = create_device(&instance, &surface).await?;
        if token.is_cancelled() {
            device.destroy();
            return Err(LoadError::Cancelled);
        }

        let surface_config = configure_surface(&surface, &adapter, &device, width, height)?;
        let (uniform_buffer, bind_group_layout, bind_group) =
            create_uniform_resources(&device, width, height);
        let pipeline = create_pipeline(&device, &bind_group_layout, surface_config.format);

        Ok(Self {
            canvas,
            gpu: Some(GpuResources {
                device,
                queue,
                surface,
                surface_config,
                pipeline,
                bind_group,
                uniform_buffer,
            }),
        })
    }
}

impl GpuDevice for WgpuBloomDevice {
    fn resize(&mut self, size: &SurfaceSize) {
        if size.is_empty() {
            return;
        }
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        self.canvas.set_width(size.physical_width);
        self.canvas.set_height(size.physical_height);
        gpu.surface_config.width = size.physical_width;
        gpu.surface_config.height = size.physical_height;
        gpu.surface.configure(&gpu.device, &gpu.surface_config);
    }

    fn render(&mut self, uniforms: &BloomUniforms) -> Result<(), RenderError> {
        let gpu = self.gpu.as_mut().ok_or(RenderError::Released)?;

        gpu.queue
            .write_buffer(&gpu.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.surface_config);
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => return Err(RenderError::Timeout),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Bloom Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Bloom Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&gpu.pipeline);
            pass.set_bind_group(0, &gpu.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            let GpuResources {
                device,
                queue,
                surface,
                pipeline,
                bind_group,
                uniform_buffer,
                ..
            } = gpu;
            uniform_buffer.destroy();
            drop(bind_group);
            drop(pipeline);
            drop(surface);
            drop(queue);
            device.destroy();
        }
        self.canvas.remove();
    }
}

impl Drop for WgpuBloomDevice {
    fn drop(&mut self) {
        self.release();
    }
}
