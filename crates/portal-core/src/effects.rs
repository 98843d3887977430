//! Time- and charge-driven modulation of the portal's look.
//!
//! Everything here is a pure function of the elapsed time `t` (seconds) and
//! the current charge `c` in \[0, 1\]. The renderer receives the results as
//! plain scalars: rotation angles for the portal group and its two rings,
//! emissive intensities for the ring materials, bloom parameters, point-light
//! intensities and the slow swirl of the particle field.

use crate::constants::*;
use serde::{Deserialize, Serialize};

/// Reduce an angle to [0, 2π) in f64, then narrow.
#[inline]
pub fn wrap_phase(angle: f64) -> f32 {
    angle.rem_euclid(std::f64::consts::TAU) as f32
}

/// Periodic basis used by an [`Oscillator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wave {
    Sin,
    Cos,
}

impl Wave {
    #[inline]
    pub fn eval(self, phase: f32) -> f32 {
        match self {
            Wave::Sin => phase.sin(),
            Wave::Cos => phase.cos(),
        }
    }
}

/// `base + charge * charge_gain + wave(t * frequency) * amplitude`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Oscillator {
    pub base: f32,
    pub charge_gain: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub wave: Wave,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::linear(0.0, 0.0)
    }
}

impl Oscillator {
    pub const fn new(
        base: f32,
        charge_gain: f32,
        amplitude: f32,
        frequency: f32,
        wave: Wave,
    ) -> Self {
        Self {
            base,
            charge_gain,
            amplitude,
            frequency,
            wave,
        }
    }

    /// Charge-only ramp with no periodic term.
    pub const fn linear(base: f32, charge_gain: f32) -> Self {
        Self::new(base, charge_gain, 0.0, 0.0, Wave::Sin)
    }

    /// Zero-centred wobble that ignores charge.
    pub const fn wobble(amplitude: f32, frequency: f32, wave: Wave) -> Self {
        Self::new(0.0, 0.0, amplitude, frequency, wave)
    }

    #[inline]
    pub fn sample(&self, t: f64, charge: f32) -> f32 {
        let phase = wrap_phase(t * f64::from(self.frequency));
        self.base + charge * self.charge_gain + self.wave.eval(phase) * self.amplitude
    }

    /// Bounds of `sample` over all `t` for a fixed charge.
    pub fn range(&self, charge: f32) -> (f32, f32) {
        let mid = self.base + charge * self.charge_gain;
        let a = self.amplitude.abs();
        (mid - a, mid + a)
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.base.is_finite()
            && self.charge_gain.is_finite()
            && self.amplitude.is_finite()
            && self.frequency.is_finite()
    }
}

/// Angle that grows with time at a charge-dependent rate: `t * (base + c * charge_gain)`,
/// reported modulo 2π.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spin {
    pub base: f32,
    pub charge_gain: f32,
}

impl Default for Spin {
    fn default() -> Self {
        Self {
            base: PORTAL_SPIN_BASE,
            charge_gain: PORTAL_SPIN_CHARGE,
        }
    }
}

impl Spin {
    #[inline]
    pub fn angle(&self, t: f64, charge: f32) -> f32 {
        wrap_phase(t * f64::from(self.base + charge * self.charge_gain))
    }
}

/// Angle that grows at a fixed rate and is offset by charge: `t * rate + c * charge_offset`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Drift {
    pub rate: f32,
    pub charge_offset: f32,
}

impl Default for Drift {
    fn default() -> Self {
        Self {
            rate: 0.03,
            charge_offset: 0.18,
        }
    }
}

impl Drift {
    #[inline]
    pub fn angle(&self, t: f64, charge: f32) -> f32 {
        wrap_phase(t * f64::from(self.rate)) + charge * self.charge_offset
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub portal_spin: Spin,
    pub ring_tilt: Oscillator,
    pub ring2_tilt: Oscillator,
    pub ring_emissive: Oscillator,
    pub ring2_emissive: Oscillator,
    pub bloom_strength: Oscillator,
    pub bloom_radius: Oscillator,
    pub bloom_threshold: f32,
    pub magenta_light: Oscillator,
    pub cyan_light: Oscillator,
    pub field_spin: Drift,
    pub field_wobble: Oscillator,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            portal_spin: Spin::default(),
            ring_tilt: Oscillator::wobble(0.08, 0.6, Wave::Sin),
            ring2_tilt: Oscillator::wobble(0.10, 0.55, Wave::Cos),
            ring_emissive: Oscillator::new(1.7, 2.2, 0.25, 2.0, Wave::Sin),
            ring2_emissive: Oscillator::new(1.2, 1.8, 0.18, 1.7, Wave::Cos),
            bloom_strength: Oscillator::linear(BLOOM_STRENGTH_BASE, BLOOM_STRENGTH_CHARGE),
            bloom_radius: Oscillator::linear(BLOOM_RADIUS_BASE, BLOOM_RADIUS_CHARGE),
            bloom_threshold: BLOOM_THRESHOLD,
            magenta_light: Oscillator::new(1.6, 0.6, 0.25, 1.1, Wave::Sin),
            cyan_light: Oscillator::new(1.2, 0.45, 0.18, 1.0, Wave::Cos),
            field_spin: Drift::default(),
            field_wobble: Oscillator::wobble(0.03, 0.15, Wave::Sin),
        }
    }
}

impl EffectConfig {
    pub(crate) fn is_finite(&self) -> bool {
        [
            &self.ring_tilt,
            &self.ring2_tilt,
            &self.ring_emissive,
            &self.ring2_emissive,
            &self.bloom_strength,
            &self.bloom_radius,
            &self.magenta_light,
            &self.cyan_light,
            &self.field_wobble,
        ]
        .iter()
        .all(|o| o.is_finite())
            && self.portal_spin.base.is_finite()
            && self.portal_spin.charge_gain.is_finite()
            && self.field_spin.rate.is_finite()
            && self.field_spin.charge_offset.is_finite()
            && self.bloom_threshold.is_finite()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BloomParams {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

/// Rotation angles in radians, one field per animated object.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotations {
    /// Portal group spin about Z.
    pub portal_z: f32,
    /// Ring 1 tilt about X.
    pub ring_x: f32,
    /// Ring 2 tilt about Y.
    pub ring2_y: f32,
    pub field_x: f32,
    pub field_y: f32,
}

/// Per-tick output of [`EffectModulator::modulate`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectFrame {
    pub rotations: Rotations,
    pub ring_emissive: f32,
    pub ring2_emissive: f32,
    pub bloom: BloomParams,
    pub magenta_light: f32,
    pub cyan_light: f32,
}

#[derive(Clone, Debug, Default)]
pub struct EffectModulator {
    pub config: EffectConfig,
}

impl EffectModulator {
    pub fn new(config: EffectConfig) -> Self {
        Self { config }
    }

    pub fn modulate(&self, t: f64, charge: f32) -> EffectFrame {
        let c = &self.config;
        EffectFrame {
            rotations: Rotations {
                portal_z: c.portal_spin.angle(t, charge),
                ring_x: c.ring_tilt.sample(t, charge),
                ring2_y: c.ring2_tilt.sample(t, charge),
                field_x: c.field_wobble.sample(t, charge),
                field_y: c.field_spin.angle(t, charge),
            },
            ring_emissive: c.ring_emissive.sample(t, charge),
            ring2_emissive: c.ring2_emissive.sample(t, charge),
            bloom: BloomParams {
                strength: c.bloom_strength.sample(t, charge),
                radius: c.bloom_radius.sample(t, charge),
                threshold: c.bloom_threshold,
            },
            magenta_light: c.magenta_light.sample(t, charge),
            cyan_light: c.cyan_light.sample(t, charge),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn idle_values_at_time_zero() {
        let fx = EffectModulator::default().modulate(0.0, 0.0);
        assert_eq!(fx.ring_emissive, 1.7);
        assert_eq!(fx.ring2_emissive, 1.2 + 0.18);
        assert_eq!(fx.bloom.strength, 1.05);
        assert_eq!(fx.bloom.radius, 0.55);
        assert_eq!(fx.rotations.portal_z, 0.0);
        assert_eq!(fx.rotations.ring_x, 0.0);
    }

    #[test]
    fn full_charge_bloom() {
        let m = EffectModulator::default();
        for t in [0.0, 0.7, 13.0, 600.0] {
            let fx = m.modulate(t, 1.0);
            assert!((fx.bloom.strength - 2.4).abs() < EPS);
            assert!((fx.bloom.radius - 0.8).abs() < EPS);
            assert_eq!(fx.bloom.threshold, BLOOM_THRESHOLD);
        }
    }

    #[test]
    fn spin_rate_scales_with_charge() {
        let m = EffectModulator::default();
        let idle = m.modulate(10.0, 0.0).rotations.portal_z;
        let charged = m.modulate(10.0, 1.0).rotations.portal_z;
        assert!((idle - 1.5).abs() < EPS);
        // 9.5 rad, reported modulo a full turn
        assert!((charged - (9.5 - std::f32::consts::TAU)).abs() < 1e-4);
    }

    #[test]
    fn oscillator_stays_within_range() {
        let osc = EffectConfig::default().magenta_light;
        let (lo, hi) = osc.range(0.5);
        for i in 0..1000 {
            let v = osc.sample(i as f64 * 0.037, 0.5);
            assert!(v >= lo - EPS && v <= hi + EPS, "{v} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn overridden_constants_are_used() {
        let config = EffectConfig {
            bloom_strength: Oscillator::linear(2.0, 0.0),
            ..Default::default()
        };
        let fx = EffectModulator::new(config).modulate(3.0, 1.0);
        assert_eq!(fx.bloom.strength, 2.0);
    }

    #[test]
    fn default_curves_at_mid_charge() {
        let m = EffectModulator::default();
        for &(t, c) in &[(1.3_f32, 0.4_f32), (4.75, 0.9), (17.2, 0.05)] {
            let fx = m.modulate(f64::from(t), c);
            let r = fx.rotations;
            assert!((r.portal_z - t * (0.15 + c * 0.8)).abs() < 1e-4);
            assert!((r.ring_x - (t * 0.6).sin() * 0.08).abs() < EPS);
            assert!((r.ring2_y - (t * 0.55).cos() * 0.10).abs() < EPS);
            assert!((fx.ring_emissive - (1.7 + c * 2.2 + (t * 2.0).sin() * 0.25)).abs() < 1e-4);
            assert!((fx.ring2_emissive - (1.2 + c * 1.8 + (t * 1.7).cos() * 0.18)).abs() < 1e-4);
            assert!((fx.magenta_light - (1.6 + (t * 1.1).sin() * 0.25 + c * 0.6)).abs() < 1e-4);
            assert!((fx.cyan_light - (1.2 + (t * 1.0).cos() * 0.18 + c * 0.45)).abs() < 1e-4);
            assert!((r.field_x - (t * 0.15).sin() * 0.03).abs() < EPS);
            assert!((r.field_y - (t * 0.03 + c * 0.18)).abs() < EPS);
        }
    }

    #[test]
    fn phase_survives_long_uptime() {
        let osc = Oscillator::wobble(1.0, 1.0, Wave::Sin);
        let turns = 20_000.0 * std::f64::consts::TAU;
        for &x in &[0.1, 0.5, 1.2] {
            assert!((osc.sample(turns + x, 0.0) - osc.sample(x, 0.0)).abs() < 1e-5);
        }
        let spin = Spin::default();
        let angle = spin.angle(86_400.0, 1.0);
        assert!((0.0..std::f32::consts::TAU).contains(&angle));
    }
}
