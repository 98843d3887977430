use crate::effects::EffectConfig;
use crate::error::ConfigError;
use crate::parallax::{ParallaxConfig, SmoothingMode};
use crate::particles::ParticleConfig;
use crate::viewport::ViewportConfig;
use serde::{Deserialize, Serialize};

/// Every tunable of the engine. Missing JSON fields keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub particles: ParticleConfig,
    pub parallax: ParallaxConfig,
    pub effects: EffectConfig,
    pub viewport: ViewportConfig,
}

impl PortalConfig {
    /// Parse and validate a (possibly partial) JSON document.
    pub fn from_json_str(src: &str) -> Result<Self, ConfigError> {
        let config: PortalConfig = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.particles;
        if p.count == 0 {
            return Err(ConfigError::EmptyField);
        }
        if p.stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        if !p.is_finite() {
            return Err(ConfigError::NotFinite("particles"));
        }
        // rng samples can be 0.0, and 0^x is infinite for x < 0
        if !(p.radius_exponent > 0.0) {
            return Err(ConfigError::RadiusExponent(p.radius_exponent));
        }

        let px = &self.parallax;
        if !(px.smoothing > 0.0 && px.smoothing <= 1.0) {
            return Err(ConfigError::Smoothing(px.smoothing));
        }
        if let SmoothingMode::PerSecond { reference_hz } = px.mode {
            if !(reference_hz > 0.0) || !reference_hz.is_finite() {
                return Err(ConfigError::ReferenceRate(reference_hz));
            }
        }
        let parallax_values = [px.gain_x, px.gain_y, px.base_z, px.charge_dolly, px.initial_y];
        if !parallax_values.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::NotFinite("parallax"));
        }

        if !self.effects.is_finite() {
            return Err(ConfigError::NotFinite("effects"));
        }

        let vp = &self.viewport;
        if !(vp.max_pixel_ratio > 0.0) || !vp.max_pixel_ratio.is_finite() {
            return Err(ConfigError::PixelRatioCap(vp.max_pixel_ratio));
        }
        if !(vp.fov_degrees > 0.0 && vp.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(vp.fov_degrees));
        }
        if !(vp.znear > 0.0 && vp.znear < vp.zfar) || !vp.zfar.is_finite() {
            return Err(ConfigError::ClipPlanes {
                near: vp.znear,
                far: vp.zfar,
            });
        }
        Ok(())
    }
}
