use portal_core::{FrameScheduler, ParticleField, PortalConfig};
use portal_render::Renderer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedScheduler = Rc<RefCell<FrameScheduler<Renderer<'static>>>>;

pub async fn init_renderer(
    canvas: &web::HtmlCanvasElement,
    config: &PortalConfig,
    field: &ParticleField,
) -> anyhow::Result<Renderer<'static>> {
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    Renderer::new(
        &instance,
        surface,
        canvas.width(),
        canvas.height(),
        config,
        field,
    )
    .await
}

/// requestAnimationFrame loop. Runs until the page goes away.
pub fn start_loop(scheduler: SharedScheduler) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        match scheduler.try_borrow_mut() {
            Ok(mut s) => {
                s.frame();
            }
            Err(_) => log::warn!("[frame] scheduler busy, skipping tick"),
        }
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
