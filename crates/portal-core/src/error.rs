use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("particle count must be at least 1")]
    EmptyField,
    #[error("particle stride must be at least 1")]
    ZeroStride,
    #[error("particle radius exponent {0} must be positive")]
    RadiusExponent(f32),
    #[error("smoothing factor {0} is outside (0, 1]")]
    Smoothing(f32),
    #[error("reference rate {0} Hz must be positive")]
    ReferenceRate(f32),
    #[error("pixel ratio cap {0} must be positive")]
    PixelRatioCap(f32),
    #[error("field of view {0} degrees is outside (0, 180)")]
    FieldOfView(f32),
    #[error("clip planes near={near} far={far} must satisfy 0 < near < far")]
    ClipPlanes { near: f32, far: f32 },
    #[error("`{0}` is not a finite number")]
    NotFinite(&'static str),
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}
