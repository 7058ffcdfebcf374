use documind_hal::LayoutSource;
use web_sys::HtmlElement;

/// Layout box of the element a surface is attached to
pub struct ElementLayout {
    element: HtmlElement,
}

impl ElementLayout {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl LayoutSource for ElementLayout {
    fn container_size(&self) -> (f32, f32) {
        let rect = self.element.get_bounding_client_rect();
        (rect.width() as f32, rect.height() as f32)
    }
}
