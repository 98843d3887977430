use crate::dom;
use crate::frame::SharedScheduler;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn on_window<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    window: &web::Window,
    event: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    let callback = closure.as_ref().unchecked_ref();
    if let Err(e) = window.add_event_listener_with_callback(event, callback) {
        log::error!("[events] failed to add {event} listener: {e:?}");
    }
    closure.forget();
}

pub fn wire_pointermove(window: &web::Window, scheduler: SharedScheduler) {
    on_window(window, "pointermove", move |ev: web::PointerEvent| {
        if let Ok(mut s) = scheduler.try_borrow_mut() {
            s.pointer_moved(ev.client_x() as f32, ev.client_y() as f32);
        }
    });
}

pub fn wire_scroll(window: &web::Window, scheduler: SharedScheduler) {
    let w = window.clone();
    on_window(window, "scroll", move |_: web::Event| {
        if let Ok(mut s) = scheduler.try_borrow_mut() {
            s.scrolled(dom::scroll_metrics(&w));
        }
    });
}

pub fn wire_resize(
    window: &web::Window,
    canvas: web::HtmlCanvasElement,
    scheduler: SharedScheduler,
) {
    let w = window.clone();
    on_window(window, "resize", move |_: web::Event| {
        apply_resize(&w, &canvas, &scheduler);
    });
}

/// Read the current window geometry and push it through the scheduler.
pub fn apply_resize(
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    scheduler: &SharedScheduler,
) {
    let Ok(mut s) = scheduler.try_borrow_mut() else {
        log::debug!("[events] resize while scheduler busy, dropped");
        return;
    };
    let (css_w, css_h) = dom::viewport_css(window);
    let dpr = window.device_pixel_ratio() as f32;
    s.resize(css_w, css_h, dpr, dom::scroll_metrics(window));
    if let Some(viewport) = s.engine().viewport() {
        dom::sync_canvas_backing_size(canvas, &viewport);
    }
}
