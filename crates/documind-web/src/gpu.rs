use documind_background::{GpuFactory, LoadError, SurfaceSize, WgpuBloomDevice};
use documind_hal::CancelToken;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};

/// Creates a canvas in the container and binds a wgpu device to it
pub struct WebGpuFactory {
    container: HtmlElement,
    opacity: f32,
}

impl WebGpuFactory {
    pub fn new(container: HtmlElement, opacity: f32) -> Self {
        Self { container, opacity }
    }

    fn attach_canvas(&self) -> Result<HtmlCanvasElement, LoadError> {
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| LoadError::Surface("container is detached".to_string()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|_| LoadError::Surface("createElement failed".to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| LoadError::Surface("not a canvas".to_string()))?;

        let style = canvas.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("inset", "0");
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("height", "100%");
        let _ = style.set_property("opacity", &self.opacity.clamp(0.0, 1.0).to_string());
        let _ = style.set_property("pointer-events", "none");

        self.container
            .append_child(&canvas)
            .map_err(|_| LoadError::Surface("appendChild failed".to_string()))?;
        Ok(canvas)
    }
}

impl GpuFactory for WebGpuFactory {
    type Device = WgpuBloomDevice;

    async fn create_device(
        &self,
        size: SurfaceSize,
        token: &CancelToken,
    ) -> Result<WgpuBloomDevice, LoadError> {
        if token.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        let canvas = self.attach_canvas()?;
        WgpuBloomDevice::new(canvas, size, token).await
    }
}
