use anyhow::Context;
use portal_core::{FrameScheduler, PortalConfig, PortalEngine, ScrollMetrics};
use portal_render::Renderer;
use std::sync::Arc;
use winit::{
    event::*,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

// Desktop windows have no page to scroll; the wheel drives a virtual one.
const SCROLL_PAGES: f32 = 4.0;
const LINE_SCROLL_PX: f32 = 40.0;

/// Wheel-driven stand-in for a scrolling document `SCROLL_PAGES` viewports tall.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct VirtualScroll {
    offset: f32,
    viewport_height: f32,
}

impl VirtualScroll {
    fn content_height(&self) -> f32 {
        self.viewport_height * SCROLL_PAGES
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.offset, self.content_height(), self.viewport_height)
    }

    fn set_viewport_height(&mut self, h: f32) {
        self.viewport_height = h;
        self.scroll_by(0.0);
    }

    /// Positive `dy` scrolls down (towards the end of the document).
    fn scroll_by(&mut self, dy: f32) {
        let max = (self.content_height() - self.viewport_height).max(0.0);
        self.offset = (self.offset + dy).clamp(0.0, max);
    }

    fn wheel(&mut self, delta: MouseScrollDelta, scale_factor: f64) {
        let dy = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_SCROLL_PX,
            MouseScrollDelta::PixelDelta(p) => -(p.y / scale_factor) as f32,
        };
        self.scroll_by(dy);
    }
}

fn load_config() -> anyhow::Result<PortalConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            let config = PortalConfig::from_json_str(&text)
                .with_context(|| format!("parsing config {path}"))?;
            log::info!("[native] config loaded from {path}");
            Ok(config)
        }
        None => Ok(PortalConfig::default()),
    }
}

struct App {
    window: Arc<Window>,
    scheduler: FrameScheduler<Renderer<'static>>,
    scroll: VirtualScroll,
    scale_factor: f64,
}

impl App {
    fn apply_size(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        // The swapchain must match the window; only the scene targets take the capped ratio.
        self.scheduler
            .sink_mut()
            .pin_surface_size(size.width, size.height);
        let logical = size.to_logical::<f32>(self.scale_factor);
        self.scroll.set_viewport_height(logical.height);
        self.scheduler.resize(
            logical.width,
            logical.height,
            self.scale_factor as f32,
            self.scroll.metrics(),
        );
    }

    fn handle(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => return false,
            WindowEvent::Resized(size) => self.apply_size(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                self.apply_size(self.window.inner_size());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let p = position.to_logical::<f32>(self.scale_factor);
                self.scheduler.pointer_moved(p.x, p.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll.wheel(delta, self.scale_factor);
                self.scheduler.scrolled(self.scroll.metrics());
            }
            _ => {}
        }
        true
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = load_config()?;
    let engine = PortalEngine::new(&config)?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Portal (native)")
            .build(&event_loop)?,
    );

    let size = window.inner_size();
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone())?;
    let renderer = pollster::block_on(Renderer::new(
        &instance,
        surface,
        size.width,
        size.height,
        &config,
        engine.field(),
    ))?;

    let mut app = App {
        scale_factor: window.scale_factor(),
        window,
        scheduler: FrameScheduler::new(engine, renderer),
        scroll: VirtualScroll::default(),
    };
    app.apply_size(size);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => {
            if !app.handle(event) {
                log::info!(
                    "[native] exiting after {} frames ({} failed)",
                    app.scheduler.frames(),
                    app.scheduler.failed_frames()
                );
                elwt.exit();
            }
        }
        Event::AboutToWait => {
            app.scheduler.frame();
            app.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_is_clamped_to_document() {
        let mut s = VirtualScroll::default();
        s.set_viewport_height(600.0);
        s.wheel(MouseScrollDelta::LineDelta(0.0, 5.0), 1.0);
        assert_eq!(s.offset, 0.0);
        s.scroll_by(1e6);
        assert_eq!(s.offset, 1800.0);
        assert_eq!(s.metrics().charge(), 1.0);
    }

    #[test]
    fn line_delta_scrolls_down_on_negative_y() {
        let mut s = VirtualScroll::default();
        s.set_viewport_height(500.0);
        s.wheel(MouseScrollDelta::LineDelta(0.0, -3.0), 1.0);
        assert_eq!(s.offset, 120.0);
        assert!((s.metrics().charge() - 120.0 / 1500.0).abs() < 1e-6);
    }

    #[test]
    fn shrinking_viewport_reclamps_offset() {
        let mut s = VirtualScroll::default();
        s.set_viewport_height(1000.0);
        s.scroll_by(3000.0);
        s.set_viewport_height(100.0);
        assert_eq!(s.offset, 300.0);
    }
}
