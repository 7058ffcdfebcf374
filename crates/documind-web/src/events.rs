//! DOM listeners behind the `EventSource` trait
//!
//! Resize is observed on the window; pointer events on the container, with
//! positions converted to container-local logical pixels.

use std::collections::HashMap;

use documind_hal::{EventHandler, EventKind, EventSource, HalError, HostEvent, ListenerId, ListenerIds};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlElement, MouseEvent, Window};

struct Registration {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

pub struct DomEvents {
    window: Window,
    container: HtmlElement,
    ids: ListenerIds,
    listeners: HashMap<ListenerId, Registration>,
}

impl DomEvents {
    pub fn new(window: Window, container: HtmlElement) -> Self {
        Self {
            window,
            container,
            ids: ListenerIds::new(),
            listeners: HashMap::new(),
        }
    }
}

impl EventSource for DomEvents {
    fn listen(&mut self, kind: EventKind, mut handler: EventHandler) -> Result<ListenerId, HalError> {
        let (target, event): (EventTarget, &'static str) = match kind {
            EventKind::Resize => (self.window.clone().into(), "resize"),
            EventKind::PointerMove => (self.container.clone().into(), "mousemove"),
            EventKind::PointerLeave => (self.container.clone().into(), "mouseleave"),
        };

        let container = self.container.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let host_event = match kind {
                EventKind::Resize => HostEvent::Resize,
                EventKind::PointerLeave => HostEvent::PointerLeave,
                EventKind::PointerMove => {
                    let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let rect = container.get_bounding_client_rect();
                    HostEvent::PointerMove {
                        x: (mouse.client_x() as f64 - rect.left()) as f32,
                        y: (mouse.client_y() as f64 - rect.top()) as f32,
                    }
                }
            };
            handler(&host_event);
        }) as Box<dyn FnMut(web_sys::Event)>);

        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|_| HalError::ListenerFailed)?;

        let id = self.ids.next_id();
        self.listeners.insert(
            id,
            Registration {
                target,
                event,
                closure,
            },
        );
        Ok(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        if let Some(reg) = self.listeners.remove(&id) {
            let _ = reg
                .target
                .remove_event_listener_with_callback(reg.event, reg.closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for DomEvents {
    fn drop(&mut self) {
        let ids: Vec<ListenerId> = self.listeners.keys().copied().collect();
        for id in ids {
            self.unlisten(id);
        }
    }
}
