use portal_core::{ScrollMetrics, Viewport};
use web_sys as web;

/// Layout viewport in CSS pixels.
pub fn viewport_css(window: &web::Window) -> (f32, f32) {
    let px = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    (px(window.inner_width()), px(window.inner_height()))
}

pub fn scroll_metrics(window: &web::Window) -> ScrollMetrics {
    let offset = window.scroll_y().unwrap_or(0.0) as f32;
    let content = window
        .document()
        .and_then(|d| d.body())
        .map(|b| b.scroll_height() as f32)
        .unwrap_or(0.0);
    let (_, viewport_h) = viewport_css(window);
    ScrollMetrics::new(offset, content, viewport_h)
}

/// Match the canvas backing store to the capped physical size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, viewport: &Viewport) {
    let (w, h) = viewport.physical_size();
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
}
