#![cfg(target_arch = "wasm32")]
use portal_core::{FrameScheduler, PortalConfig, PortalEngine, Viewport};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod events;
mod frame;

const CANVAS_ID: &str = "bg";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("portal-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{CANVAS_ID} is not a canvas: {e:?}"))?;

    let config = PortalConfig::default();
    let engine = PortalEngine::new(&config)?;

    // Size the backing store before the surface is created so the first
    // configure matches what the page shows.
    let (css_w, css_h) = dom::viewport_css(&window);
    let dpr = window.device_pixel_ratio() as f32;
    if let Some(vp) = Viewport::new(css_w, css_h, dpr, config.viewport.max_pixel_ratio) {
        dom::sync_canvas_backing_size(&canvas, &vp);
    }

    let renderer = frame::init_renderer(&canvas, &config, engine.field()).await?;
    let scheduler: frame::SharedScheduler =
        Rc::new(RefCell::new(FrameScheduler::new(engine, renderer)));

    events::apply_resize(&window, &canvas, &scheduler);
    if let Ok(mut s) = scheduler.try_borrow_mut() {
        s.scrolled(dom::scroll_metrics(&window));
    }

    events::wire_pointermove(&window, scheduler.clone());
    events::wire_scroll(&window, scheduler.clone());
    events::wire_resize(&window, canvas, scheduler.clone());

    frame::start_loop(scheduler);
    Ok(())
}
