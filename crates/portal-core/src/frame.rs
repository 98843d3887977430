//! Per-frame update: camera, then effects, then particles, then render.

use crate::camera::Camera;
use crate::charge::ScrollMetrics;
use crate::clock::Clock;
use crate::config::PortalConfig;
use crate::effects::{EffectFrame, EffectModulator};
use crate::error::ConfigError;
use crate::input::{InputSampler, InputState};
use crate::parallax::ParallaxIntegrator;
use crate::particles::{ParticleField, ParticleFieldAnimator};
use crate::sink::RenderSink;
use crate::viewport::{Viewport, ViewportConfig};
use glam::Mat4;

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    /// Seconds since start. Kept in f64; phases are reduced before narrowing.
    pub elapsed: f64,
    pub input: InputState,
    pub camera: Camera,
    pub effects: EffectFrame,
}

impl AnimationState {
    /// Portal group: spins about Z. The disc inherits this transform.
    pub fn portal_transform(&self) -> Mat4 {
        Mat4::from_rotation_z(self.effects.rotations.portal_z)
    }

    pub fn ring_transform(&self) -> Mat4 {
        self.portal_transform() * Mat4::from_rotation_x(self.effects.rotations.ring_x)
    }

    pub fn ring2_transform(&self) -> Mat4 {
        self.portal_transform() * Mat4::from_rotation_y(self.effects.rotations.ring2_y)
    }

    /// Particle field: X then Y, outside the portal group.
    pub fn field_transform(&self) -> Mat4 {
        let r = &self.effects.rotations;
        Mat4::from_rotation_x(r.field_x) * Mat4::from_rotation_y(r.field_y)
    }
}

/// Owns all mutable animation state. Platform code feeds it events and time.
pub struct PortalEngine {
    input: InputSampler,
    parallax: ParallaxIntegrator,
    effects: EffectModulator,
    animator: ParticleFieldAnimator,
    field: ParticleField,
    camera: Camera,
    viewport_config: ViewportConfig,
    viewport: Option<Viewport>,
    last_t: Option<f64>,
}

impl PortalEngine {
    pub fn new(config: &PortalConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let vp = &config.viewport;
        let camera = Camera::new(
            config.parallax.initial_eye(),
            vp.fov_degrees,
            vp.znear,
            vp.zfar,
        );
        let field = ParticleField::generate(&config.particles);
        log::info!(
            "[engine] {} particles, stride {}, smoothing {:?}",
            field.len(),
            config.particles.stride,
            config.parallax.mode
        );
        Ok(Self {
            input: InputSampler::default(),
            parallax: ParallaxIntegrator::new(config.parallax.clone()),
            effects: EffectModulator::new(config.effects.clone()),
            animator: ParticleFieldAnimator::from_config(&config.particles),
            field,
            camera,
            viewport_config: vp.clone(),
            viewport: None,
            last_t: None,
        })
    }

    #[inline]
    pub fn input(&self) -> InputState {
        self.input.state()
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn pointer_moved(&mut self, client_x: f32, client_y: f32) {
        self.input.pointer_moved(client_x, client_y);
    }

    pub fn scrolled(&mut self, scroll: ScrollMetrics) {
        self.input.scrolled(scroll);
    }

    /// Apply a new logical size. Degenerate sizes are ignored and the
    /// previous viewport is kept.
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
        scroll: ScrollMetrics,
    ) -> Option<Viewport> {
        let viewport = Viewport::new(
            width,
            height,
            device_pixel_ratio,
            self.viewport_config.max_pixel_ratio,
        )?;
        self.camera.set_aspect_from_size(width, height);
        self.input.resized(width, height, scroll);
        self.viewport = Some(viewport);
        Some(viewport)
    }

    /// Advance to `t` seconds since start.
    pub fn tick(&mut self, t: f64) -> AnimationState {
        // A clock that steps backwards yields a zero step, never a negative one.
        let dt = match self.last_t {
            Some(prev) if t > prev => (t - prev) as f32,
            _ => 0.0,
        };
        self.last_t = Some(t);

        let input = self.input.state();
        self.parallax.step(&mut self.camera.eye, &input, dt);
        let effects = self.effects.modulate(t, input.charge);
        self.animator.animate(&mut self.field, t);

        AnimationState {
            elapsed: t,
            input,
            camera: self.camera.clone(),
            effects,
        }
    }
}

/// Drives a [`PortalEngine`] into a [`RenderSink`] once per display refresh.
pub struct FrameScheduler<S> {
    engine: PortalEngine,
    sink: S,
    clock: Clock,
    frames: u64,
    failed_frames: u64,
}

impl<S: RenderSink> FrameScheduler<S> {
    pub fn new(engine: PortalEngine, sink: S) -> Self {
        Self {
            engine,
            sink,
            clock: Clock::start(),
            frames: 0,
            failed_frames: 0,
        }
    }

    pub fn engine(&self) -> &PortalEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    /// One frame at the wall-clock time.
    pub fn frame(&mut self) -> AnimationState {
        let t = self.clock.elapsed_secs();
        self.frame_at(t)
    }

    /// One frame at `t` seconds. A render error is logged and counted; the
    /// next frame is attempted as usual.
    pub fn frame_at(&mut self, t: f64) -> AnimationState {
        let state = self.engine.tick(t);
        if let Some(positions) = self.engine.field.take_dirty() {
            self.sink.upload_particles(positions);
        }
        self.frames += 1;
        if let Err(e) = self.sink.render(&state) {
            self.failed_frames += 1;
            log::error!("[frame] render failed ({} so far): {e:?}", self.failed_frames);
        }
        state
    }

    pub fn pointer_moved(&mut self, client_x: f32, client_y: f32) {
        self.engine.pointer_moved(client_x, client_y);
    }

    pub fn scrolled(&mut self, scroll: ScrollMetrics) {
        self.engine.scrolled(scroll);
    }

    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
        scroll: ScrollMetrics,
    ) {
        match self.engine.resize(width, height, device_pixel_ratio, scroll) {
            Some(viewport) => {
                log::debug!(
                    "[frame] resize {}x{} @{} -> {:?}",
                    width,
                    height,
                    viewport.pixel_ratio,
                    viewport.physical_size()
                );
                self.sink.resize(&viewport);
            }
            None => log::warn!("[frame] ignoring degenerate resize {width}x{height}"),
        }
    }
}
