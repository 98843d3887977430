//! wgpu renderer for the portal scene.
//!
//! Frame layout: scene pass (rings, disk, particles) into an HDR target with
//! depth, then bright pass, separable blur and composite onto the surface.
//! The same code runs on WebGPU in the browser and on native backends.

mod helpers;
mod post;
mod scene;
mod targets;
mod uniforms;

use portal_core::scene::SceneLayout;
use portal_core::{AnimationState, ParticleField, PortalConfig, RenderSink, Viewport};

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub struct Renderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pinned_surface: Option<(u32, u32)>,
    targets: targets::RenderTargets,
    scene: scene::ScenePass,
    post: post::PostResources,
}

impl<'w> Renderer<'w> {
    /// `width`/`height` are the initial backing-store size in physical pixels.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'w>,
        width: u32,
        height: u32,
        config: &PortalConfig,
        field: &ParticleField,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits so older WebGPU implementations accept the request
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {e:?}"))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no texture formats"))?;
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!("[render] surface {width}x{height} {format:?} {alpha_mode:?}");

        let targets = targets::RenderTargets::new(&device, width, height);
        let scene = scene::ScenePass::new(
            &device,
            SceneLayout::default(),
            field,
            config.particles.point_size,
            config.particles.opacity,
        );
        let post = post::PostResources::new(&device, &targets, format);

        Ok(Self {
            surface,
            device,
            queue,
            config: surface_config,
            pinned_surface: None,
            targets,
            scene,
            post,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Keep the swapchain at the window's real extent. The offscreen targets
    /// still follow the capped viewport and the composite pass rescales.
    pub fn pin_surface_size(&mut self, width: u32, height: u32) {
        self.pinned_surface = Some((width, height));
        self.configure_surface(width, height);
    }

    /// Surface at the pinned extent if any, targets at the viewport's physical size.
    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        let (sw, sh) = surface_extent(self.pinned_surface, (width, height));
        self.configure_surface(sw, sh);
        if width == 0 || height == 0 || (width, height) == self.targets.size {
            return;
        }
        self.targets.recreate(&self.device, width, height);
        self.post.rebuild_bind_groups(&self.device, &self.targets);
    }

    fn configure_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn acquire(&mut self) -> anyhow::Result<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                // Reconfigure now; this frame is dropped and the next one uses the new surface.
                self.surface.configure(&self.device, &self.config);
                Err(anyhow::anyhow!("surface {e}, reconfigured"))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl RenderSink for Renderer<'_> {
    fn resize(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.physical_size();
        self.resize_if_needed(w, h);
    }

    fn upload_particles(&mut self, positions: &[[f32; 3]]) {
        self.scene.upload_particles(&self.queue, positions);
    }

    fn render(&mut self, state: &AnimationState) -> anyhow::Result<()> {
        let frame = self.acquire()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.scene.write_uniforms(&self.queue, state);
        self.post
            .write_uniforms(&self.queue, &state.effects.bloom, self.targets.bloom_size);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        self.scene
            .encode(&mut encoder, &self.targets.hdr_view, &self.targets.depth_view);
        self.post.encode(&mut encoder, &self.targets, &view);

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn surface_extent(pinned: Option<(u32, u32)>, viewport: (u32, u32)) -> (u32, u32) {
    pinned.unwrap_or(viewport)
}

#[cfg(test)]
mod tests {
    use super::surface_extent;
    use portal_core::Viewport;

    #[test]
    fn pinned_surface_ignores_pixel_ratio_cap() {
        // 3x display: the window is 3000x1800 physical, the capped viewport 2000x1200.
        let vp = Viewport::new(1000.0, 600.0, 3.0, 2.0).unwrap();
        assert_eq!(vp.physical_size(), (2000, 1200));
        assert_eq!(surface_extent(Some((3000, 1800)), vp.physical_size()), (3000, 1800));
        assert_eq!(surface_extent(None, vp.physical_size()), (2000, 1200));
    }
}
