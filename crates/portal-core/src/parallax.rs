use crate::constants::*;
use crate::input::InputState;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the smoothing factor relates to the tick rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SmoothingMode {
    /// `alpha` is applied once per tick, so convergence speed follows the display rate.
    #[default]
    PerTick,
    /// `alpha` is defined at `reference_hz` and rescaled by the real frame delta.
    PerSecond { reference_hz: f32 },
}

impl SmoothingMode {
    /// Frame-rate independent mode calibrated so a 60 Hz display behaves like `PerTick`.
    pub fn per_second() -> Self {
        SmoothingMode::PerSecond {
            reference_hz: PARALLAX_REFERENCE_HZ,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub smoothing: f32,
    pub gain_x: f32,
    pub gain_y: f32,
    pub base_z: f32,
    pub charge_dolly: f32,
    pub initial_y: f32,
    pub mode: SmoothingMode,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            smoothing: PARALLAX_SMOOTHING,
            gain_x: PARALLAX_GAIN_X,
            gain_y: PARALLAX_GAIN_Y,
            base_z: CAMERA_BASE_Z,
            charge_dolly: CAMERA_CHARGE_DOLLY,
            initial_y: CAMERA_INITIAL_Y,
            mode: SmoothingMode::PerTick,
        }
    }
}

impl ParallaxConfig {
    pub fn initial_eye(&self) -> Vec3 {
        Vec3::new(0.0, self.initial_y, self.base_z)
    }
}

/// Exponential follow of the camera eye toward a pointer-derived target.
///
/// X and Y are low-pass filtered; Z is set directly from charge.
#[derive(Clone, Debug, Default)]
pub struct ParallaxIntegrator {
    pub config: ParallaxConfig,
}

impl ParallaxIntegrator {
    pub fn new(config: ParallaxConfig) -> Self {
        Self { config }
    }

    /// Eye position the X/Y filter converges to for the given input.
    #[inline]
    pub fn target(&self, input: &InputState) -> Vec3 {
        Vec3::new(
            input.pointer_x * self.config.gain_x,
            -input.pointer_y * self.config.gain_y,
            self.config.base_z - input.charge * self.config.charge_dolly,
        )
    }

    /// Blend factor for one tick of `dt_sec` seconds.
    pub fn alpha(&self, dt_sec: f32) -> f32 {
        let a = self.config.smoothing;
        match self.config.mode {
            SmoothingMode::PerTick => a,
            SmoothingMode::PerSecond { reference_hz } => {
                if !(dt_sec > 0.0) || !dt_sec.is_finite() {
                    return 0.0;
                }
                (1.0 - (1.0 - a).powf(dt_sec * reference_hz)).clamp(0.0, 1.0)
            }
        }
    }

    pub fn step(&self, eye: &mut Vec3, input: &InputState, dt_sec: f32) {
        let target = self.target(input);
        let alpha = self.alpha(dt_sec);
        eye.x += (target.x - eye.x) * alpha;
        eye.y += (target.y - eye.y) * alpha;
        eye.z = target.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(x: f32, y: f32, charge: f32) -> InputState {
        InputState {
            pointer_x: x,
            pointer_y: y,
            charge,
        }
    }

    #[test]
    fn single_tick_matches_reference_filter() {
        let p = ParallaxIntegrator::default();
        let mut eye = Vec3::new(0.0, 0.2, 9.0);
        p.step(&mut eye, &input(1.0, 1.0, 0.0), 1.0 / 60.0);
        assert!((eye.x - 0.9 * 0.03).abs() < 1e-7);
        assert!((eye.y - (0.2 + (-0.45 - 0.2) * 0.03)).abs() < 1e-7);
        assert_eq!(eye.z, 9.0);
    }

    #[test]
    fn depth_follows_charge_without_smoothing() {
        let p = ParallaxIntegrator::default();
        let mut eye = p.config.initial_eye();
        p.step(&mut eye, &input(0.0, 0.0, 1.0), 1.0 / 60.0);
        assert!((eye.z - 7.8).abs() < 1e-5);
        p.step(&mut eye, &input(0.0, 0.0, 0.25), 1.0 / 60.0);
        assert!((eye.z - 8.7).abs() < 1e-5);
    }

    #[test]
    fn per_tick_ignores_frame_delta() {
        let p = ParallaxIntegrator::default();
        assert_eq!(p.alpha(1.0 / 30.0), p.alpha(1.0 / 144.0));
    }

    #[test]
    fn per_second_matches_alpha_at_reference_rate() {
        let p = ParallaxIntegrator::new(ParallaxConfig {
            mode: SmoothingMode::per_second(),
            ..Default::default()
        });
        assert!((p.alpha(1.0 / 60.0) - 0.03).abs() < 1e-6);
        // two 120 Hz ticks cover the same ground as one 60 Hz tick
        let half = p.alpha(1.0 / 120.0);
        let combined = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((combined - 0.03).abs() < 1e-6);
        assert_eq!(p.alpha(0.0), 0.0);
    }
}
