//! WASM-bindgen wrappers for the three backgrounds
//!
//! Each wrapper owns one mounted component. `unmount()` (or dropping the JS
//! object via `free()`) stops the frame loop, removes every listener and
//! detaches the drawing surface.

use std::cell::RefCell;
use std::rc::Rc;

use documind_background::{
    bloom, BloomOptions, GpuDevice, NeuralProps, OverlayProps, WgpuBloomDevice,
};
use documind_hal::Host;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};

use crate::canvas::WebCanvas;
use crate::events::DomEvents;
use crate::gpu::WebGpuFactory;
use crate::hal::WebHal;
use crate::layout::ElementLayout;
use crate::scheduler::RafScheduler;
use crate::util::{parse_props, window};

fn host_for(container: &HtmlElement) -> Result<Host, JsValue> {
    let window = window()?;
    Ok(Host::new(
        Rc::new(WebHal::new(window.clone())),
        Rc::new(ElementLayout::new(container.clone())),
        Box::new(RafScheduler::new(window.clone())),
        Box::new(DomEvents::new(window, container.clone())),
    ))
}

fn append_canvas(container: &HtmlElement) -> Result<HtmlCanvasElement, JsValue> {
    let document = container
        .owner_document()
        .ok_or_else(|| JsValue::from_str("container is detached"))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    let style = canvas.style();
    style.set_property("position", "absolute")?;
    style.set_property("inset", "0")?;
    style.set_property("pointer-events", "none")?;
    container.append_child(&canvas)?;
    Ok(canvas)
}

/// Flow-field particle background with pointer attraction
#[wasm_bindgen(js_name = NeuralBackground)]
pub struct NeuralBackgroundHandle {
    inner: Option<documind_background::NeuralBackground<WebCanvas>>,
    element: HtmlCanvasElement,
}

#[wasm_bindgen(js_class = NeuralBackground)]
impl NeuralBackgroundHandle {
    /// Mount into `container`; `props_json` may be empty for the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, props_json: &str) -> Result<NeuralBackgroundHandle, JsValue> {
        let props: NeuralProps = parse_props(props_json)?;
        let element = append_canvas(&container)?;
        let mounted = WebCanvas::new(element.clone()).and_then(|canvas| {
            documind_background::NeuralBackground::mount(host_for(&container)?, canvas, props)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        });
        match mounted {
            Ok(inner) => Ok(Self {
                inner: Some(inner),
                element,
            }),
            Err(e) => {
                element.remove();
                Err(e)
            }
        }
    }

    pub fn unmount(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.unmount();
            self.element.remove();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.inner.as_ref().is_some_and(|b| b.is_mounted())
    }

    #[wasm_bindgen(getter, js_name = framesDrawn)]
    pub fn frames_drawn(&self) -> f64 {
        self.inner.as_ref().map_or(0.0, |b| b.frames_drawn() as f64)
    }
}

impl Drop for NeuralBackgroundHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Bouncing particles joined by proximity lines
#[wasm_bindgen(js_name = ParticleOverlay)]
pub struct ParticleOverlayHandle {
    inner: Option<documind_background::ParticleOverlay<WebCanvas>>,
    element: HtmlCanvasElement,
}

#[wasm_bindgen(js_class = ParticleOverlay)]
impl ParticleOverlayHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, props_json: &str) -> Result<ParticleOverlayHandle, JsValue> {
        let props: OverlayProps = parse_props(props_json)?;
        let element = append_canvas(&container)?;
        let mounted = WebCanvas::new(element.clone()).and_then(|canvas| {
            documind_background::ParticleOverlay::mount(host_for(&container)?, canvas, props)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        });
        match mounted {
            Ok(inner) => Ok(Self {
                inner: Some(inner),
                element,
            }),
            Err(e) => {
                element.remove();
                Err(e)
            }
        }
    }

    pub fn unmount(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.unmount();
            self.element.remove();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.inner.as_ref().is_some_and(|o| o.is_mounted())
    }

    /// Lines drawn in the most recent frame
    #[wasm_bindgen(getter, js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.inner.as_ref().map_or(0, |o| o.last_stats().links as u32)
    }
}

impl Drop for ParticleOverlayHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

type SharedBloom = Rc<RefCell<Option<bloom::CelestialBloom<WgpuBloomDevice>>>>;

/// Full-screen shader background
///
/// GPU setup runs in the background after construction; the canvas appears
/// once the first frame is ready.
#[wasm_bindgen(js_name = CelestialBloom)]
pub struct CelestialBloomHandle {
    inner: SharedBloom,
}

#[wasm_bindgen(js_class = CelestialBloom)]
impl CelestialBloomHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, props_json: &str) -> Result<CelestialBloomHandle, JsValue> {
        let options: BloomOptions = parse_props(props_json)?;
        let mut component = bloom::CelestialBloom::new(host_for(&container)?, options);
        let pending = component.begin_load();
        let inner: SharedBloom = Rc::new(RefCell::new(Some(component)));

        if let Some((token, size)) = pending {
            let factory = WebGpuFactory::new(container, options.opacity);
            let shared = Rc::downgrade(&inner);
            wasm_bindgen_futures::spawn_local(async move {
                let result = bloom::load_device(&factory, size, &token).await;
                let Some(cell) = shared.upgrade() else {
                    if let Ok(mut device) = result {
                        device.release();
                    }
                    return;
                };
                let mut slot = cell.borrow_mut();
                match slot.as_mut() {
                    Some(component) => component.finish_load(result),
                    None => {
                        if let Ok(mut device) = result {
                            device.release();
                        }
                    }
                }
            });
        }

        Ok(Self { inner })
    }

    pub fn unmount(&mut self) {
        let taken = self.inner.try_borrow_mut().ok().and_then(|mut slot| slot.take());
        if let Some(mut component) = taken {
            component.unmount();
        }
    }

    /// `unloaded`, `loading`, `ready`, `running`, `static` or `disposed`
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        match self.inner.try_borrow().ok().and_then(|slot| slot.as_ref().map(|c| c.phase())) {
            Some(phase) => phase_name(phase).to_string(),
            None => "disposed".to_string(),
        }
    }
}

fn phase_name(phase: bloom::BloomPhase) -> &'static str {
    match phase {
        bloom::BloomPhase::Unloaded => "unloaded",
        bloom::BloomPhase::Loading => "loading",
        bloom::BloomPhase::Ready => "ready",
        bloom::BloomPhase::Running => "running",
        bloom::BloomPhase::StaticFrame => "static",
        bloom::BloomPhase::Disposed => "disposed",
    }
}

impl Drop for CelestialBloomHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}
