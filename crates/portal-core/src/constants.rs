// Default tuning constants shared by the web and native frontends.
// Every value here is the default of a `PortalConfig` field and can be overridden.

// Particle field
pub const PARTICLE_COUNT: usize = 9000;
pub const PARTICLE_SEED: u64 = 42;
pub const PARTICLE_STRIDE: usize = 25; // animate every Kth particle per tick
pub const PARTICLE_WAVE_AMPLITUDE: f32 = 0.002;
pub const PARTICLE_WAVE_TIME_FREQ: f32 = 0.9;
pub const PARTICLE_WAVE_SPATIAL_FREQ: f32 = 0.12; // phase offset per world unit of x
pub const PARTICLE_RADIUS_MAX: f32 = 6.5;
pub const PARTICLE_RADIUS_EXPONENT: f32 = 0.7; // < 1 pushes particles outward
pub const PARTICLE_HEIGHT_SPAN: f32 = 8.0;
pub const PARTICLE_DEPTH_SPAN: f32 = 10.0;
pub const PARTICLE_COLOR_A: [f32; 3] = [0.55, 0.30, 1.00]; // magenta-ish
pub const PARTICLE_COLOR_B: [f32; 3] = [0.05, 0.85, 1.00]; // cyan-ish
pub const PARTICLE_POINT_SIZE: f32 = 0.018;
pub const PARTICLE_OPACITY: f32 = 0.9;

// Camera parallax
pub const PARALLAX_SMOOTHING: f32 = 0.03;
pub const PARALLAX_GAIN_X: f32 = 0.9;
pub const PARALLAX_GAIN_Y: f32 = 0.45;
pub const CAMERA_BASE_Z: f32 = 9.0;
pub const CAMERA_CHARGE_DOLLY: f32 = 1.2; // how far full charge pulls the camera in
pub const CAMERA_INITIAL_Y: f32 = 0.2;
pub const PARALLAX_REFERENCE_HZ: f32 = 60.0;

// Projection and viewport
pub const CAMERA_FOV_DEG: f32 = 55.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const MAX_PIXEL_RATIO: f32 = 2.0;

// Portal motion
pub const PORTAL_SPIN_BASE: f32 = 0.15;
pub const PORTAL_SPIN_CHARGE: f32 = 0.8;

// Bloom
pub const BLOOM_STRENGTH_BASE: f32 = 1.05;
pub const BLOOM_STRENGTH_CHARGE: f32 = 1.35;
pub const BLOOM_RADIUS_BASE: f32 = 0.55;
pub const BLOOM_RADIUS_CHARGE: f32 = 0.25;
pub const BLOOM_THRESHOLD: f32 = 0.12;
