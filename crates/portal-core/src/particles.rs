//! The point cloud around the portal.
//!
//! A [`ParticleField`] is generated once from a seed and never resized. Each
//! tick the [`ParticleFieldAnimator`] nudges only every `stride`-th particle
//! along Y with a travelling sine wave; across many frames and thousands of
//! points this reads as a full-field wave at a fraction of the cost. The
//! vertical drift accumulates from frame to frame.

use crate::constants::*;
use crate::effects::wrap_phase;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub seed: u64,
    pub stride: usize,
    pub wave_amplitude: f32,
    pub wave_time_freq: f32,
    pub wave_spatial_freq: f32,
    pub radius_max: f32,
    pub radius_exponent: f32,
    pub height_span: f32,
    pub depth_span: f32,
    pub color_a: [f32; 3],
    pub color_b: [f32; 3],
    pub point_size: f32,
    pub opacity: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            seed: PARTICLE_SEED,
            stride: PARTICLE_STRIDE,
            wave_amplitude: PARTICLE_WAVE_AMPLITUDE,
            wave_time_freq: PARTICLE_WAVE_TIME_FREQ,
            wave_spatial_freq: PARTICLE_WAVE_SPATIAL_FREQ,
            radius_max: PARTICLE_RADIUS_MAX,
            radius_exponent: PARTICLE_RADIUS_EXPONENT,
            height_span: PARTICLE_HEIGHT_SPAN,
            depth_span: PARTICLE_DEPTH_SPAN,
            color_a: PARTICLE_COLOR_A,
            color_b: PARTICLE_COLOR_B,
            point_size: PARTICLE_POINT_SIZE,
            opacity: PARTICLE_OPACITY,
        }
    }
}

impl ParticleConfig {
    pub(crate) fn is_finite(&self) -> bool {
        [
            self.wave_amplitude,
            self.wave_time_freq,
            self.wave_spatial_freq,
            self.radius_max,
            self.radius_exponent,
            self.height_span,
            self.depth_span,
            self.point_size,
            self.opacity,
        ]
        .iter()
        .chain(self.color_a.iter())
        .chain(self.color_b.iter())
        .all(|v| v.is_finite())
    }
}

/// Fixed-size particle buffers plus a dirty flag for GPU re-upload.
#[derive(Clone, Debug)]
pub struct ParticleField {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    dirty: bool,
}

impl ParticleField {
    /// Scatter `config.count` particles in a cylinder-ish volume around the portal.
    pub fn generate(config: &ParticleConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut positions = Vec::with_capacity(config.count);
        let mut colors = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            let r = config.radius_max * rng.gen::<f32>().powf(config.radius_exponent);
            let a = rng.gen::<f32>() * std::f32::consts::TAU;
            let y = (rng.gen::<f32>() - 0.5) * config.height_span;
            let z = (rng.gen::<f32>() - 0.5) * config.depth_span;
            positions.push([a.cos() * r, y, z]);

            let t = rng.gen::<f32>();
            colors.push([
                (1.0 - t) * config.color_a[0] + t * config.color_b[0],
                (1.0 - t) * config.color_a[1] + t * config.color_b[1],
                (1.0 - t) * config.color_a[2] + t * config.color_b[2],
            ]);
        }
        log::debug!("[particles] generated {} (seed {})", positions.len(), config.seed);
        Self {
            positions,
            colors,
            // first frame must upload the freshly generated buffer
            dirty: true,
        }
    }

    /// Wrap existing buffers. Returns `None` when their lengths differ.
    pub fn from_buffers(positions: Vec<[f32; 3]>, colors: Vec<[f32; 3]>) -> Option<Self> {
        (positions.len() == colors.len()).then_some(Self {
            positions,
            colors,
            dirty: true,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Mutable view of the positions. Always marks the buffer dirty.
    pub fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        self.dirty = true;
        &mut self.positions
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Positions to upload if anything changed since the last call; clears the flag.
    pub fn take_dirty(&mut self) -> Option<&[[f32; 3]]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(&self.positions)
    }
}

/// Strided travelling-wave displacement: `y += sin(t * w_t + x * w_x) * amplitude`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFieldAnimator {
    pub stride: usize,
    pub amplitude: f32,
    pub time_freq: f32,
    pub spatial_freq: f32,
}

impl Default for ParticleFieldAnimator {
    fn default() -> Self {
        Self::from_config(&ParticleConfig::default())
    }
}

impl ParticleFieldAnimator {
    pub fn from_config(config: &ParticleConfig) -> Self {
        Self {
            stride: config.stride,
            amplitude: config.wave_amplitude,
            time_freq: config.wave_time_freq,
            spatial_freq: config.wave_spatial_freq,
        }
    }

    pub fn animate(&self, field: &mut ParticleField, t: f64) {
        let phase = wrap_phase(t * f64::from(self.time_freq));
        for p in field.positions_mut().iter_mut().step_by(self.stride.max(1)) {
            p[1] += (phase + p[0] * self.spatial_freq).sin() * self.amplitude;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ParticleConfig {
        ParticleConfig {
            count: 500,
            ..Default::default()
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = ParticleField::generate(&small_config());
        let b = ParticleField::generate(&small_config());
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.colors(), b.colors());

        let c = ParticleField::generate(&ParticleConfig {
            seed: 7,
            ..small_config()
        });
        assert_ne!(a.positions(), c.positions());
    }

    #[test]
    fn particles_stay_inside_the_volume() {
        let cfg = small_config();
        let field = ParticleField::generate(&cfg);
        assert_eq!(field.len(), 500);
        for p in field.positions() {
            assert!(p[0].abs() <= cfg.radius_max + 1e-4);
            assert!(p[1].abs() <= cfg.height_span * 0.5 + 1e-4);
            assert!(p[2].abs() <= cfg.depth_span * 0.5 + 1e-4);
        }
    }

    #[test]
    fn colors_blend_between_palette_ends() {
        let cfg = small_config();
        let field = ParticleField::generate(&cfg);
        for c in field.colors() {
            for ch in 0..3 {
                let lo = cfg.color_a[ch].min(cfg.color_b[ch]) - 1e-5;
                let hi = cfg.color_a[ch].max(cfg.color_b[ch]) + 1e-5;
                assert!(c[ch] >= lo && c[ch] <= hi);
            }
        }
    }

    #[test]
    fn only_strided_particles_move() {
        let mut field = ParticleField::generate(&small_config());
        let before = field.positions().to_vec();
        let anim = ParticleFieldAnimator::default();
        anim.animate(&mut field, 1.3);
        for (i, (old, new)) in before.iter().zip(field.positions()).enumerate() {
            assert_eq!(old[0], new[0]);
            assert_eq!(old[2], new[2]);
            if i % anim.stride != 0 {
                assert_eq!(old[1], new[1], "particle {i} moved");
            }
        }
        // at least one strided particle actually moved
        assert!((0..before.len())
            .step_by(anim.stride)
            .any(|i| before[i][1] != field.positions()[i][1]));
    }

    #[test]
    fn drift_accumulates() {
        let mut field =
            ParticleField::from_buffers(vec![[0.0, 0.0, 0.0]], vec![[1.0; 3]]).unwrap();
        let anim = ParticleFieldAnimator::default();
        // sin(pi/2) = 1 when t * 0.9 = pi/2
        let t = std::f64::consts::FRAC_PI_2 / f64::from(anim.time_freq);
        anim.animate(&mut field, t);
        anim.animate(&mut field, t);
        assert!((field.positions()[0][1] - 2.0 * anim.amplitude).abs() < 1e-7);
    }

    #[test]
    fn dirty_flag_round_trip() {
        let mut field = ParticleField::generate(&small_config());
        assert!(field.take_dirty().is_some());
        assert!(!field.is_dirty());
        assert!(field.take_dirty().is_none());
        ParticleFieldAnimator::default().animate(&mut field, 0.5);
        assert!(field.is_dirty());
        assert_eq!(field.take_dirty().map(|p| p.len()), Some(500));
    }

    #[test]
    fn mismatched_buffers_are_rejected() {
        assert!(ParticleField::from_buffers(vec![[0.0; 3]; 2], vec![[0.0; 3]]).is_none());
    }
}
