//! `CanvasRenderingContext2d` behind the `Canvas2d` trait

use std::f64::consts::TAU;

use documind_background::{Canvas2d, Color, Size, SurfaceSize, Vec2};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct WebCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    logical: Size,
}

impl WebCanvas {
    /// Wrap a canvas element, acquiring its 2D context
    pub fn new(element: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = element
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            element,
            ctx,
            logical: Size::ZERO,
        })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }
}

impl Canvas2d for WebCanvas {
    fn configure(&mut self, size: &SurfaceSize) {
        self.element.set_width(size.physical_width);
        self.element.set_height(size.physical_height);
        let style = self.element.style();
        let _ = style.set_property("width", &format!("{}px", size.logical.width));
        let _ = style.set_property("height", &format!("{}px", size.logical.height));

        let ratio = size.pixel_ratio as f64;
        let _ = self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
        self.logical = size.logical;
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.logical.width as f64, self.logical.height as f64);
    }

    fn fill_all(&mut self, color: Color) {
        self.fill_rect(Vec2::ZERO, self.logical, color);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Size, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(
            origin.x as f64,
            origin.y as f64,
            size.width as f64,
            size.height as f64,
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.set_fill_style_str(&color.css());
            self.ctx.fill();
        }
    }

    fn stroke_gradient_line(&mut self, from: Vec2, to: Vec2, start: Color, end: Color, width: f32) {
        let gradient = self
            .ctx
            .create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64);
        if gradient.add_color_stop(0.0, &start.css()).is_err()
            || gradient.add_color_stop(1.0, &end.css()).is_err()
        {
            return;
        }
        self.ctx.set_stroke_style_canvas_gradient(&gradient);
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}
