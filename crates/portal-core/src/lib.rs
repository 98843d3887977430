pub mod camera;
pub mod charge;
pub mod clock;
pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod parallax;
pub mod particles;
pub mod scene;
pub mod sink;
pub mod viewport;

pub use camera::Camera;
pub use charge::{compute_charge, ScrollMetrics};
pub use clock::Clock;
pub use config::PortalConfig;
pub use effects::{BloomParams, EffectConfig, EffectFrame, EffectModulator, Rotations};
pub use error::ConfigError;
pub use frame::{AnimationState, FrameScheduler, PortalEngine};
pub use input::{normalize_pointer, InputSampler, InputState};
pub use parallax::{ParallaxConfig, ParallaxIntegrator, SmoothingMode};
pub use particles::{ParticleConfig, ParticleField, ParticleFieldAnimator};
pub use scene::SceneLayout;
pub use sink::RenderSink;
pub use viewport::{cap_pixel_ratio, Viewport, ViewportConfig};
