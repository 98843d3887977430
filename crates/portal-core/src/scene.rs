//! Static description of the portal scene: lights, ring materials, fog.
//!
//! None of this changes per frame. The renderer reads it once at start-up
//! and combines it with the per-frame scalars from [`crate::AnimationState`].

/// Hex colour as written in a stylesheet, converted to linear RGB.
pub fn hex_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub position: [f32; 3],
    /// Distance at which the light contribution reaches zero.
    pub range: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RingStyle {
    pub major_radius: f32,
    pub tube_radius: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
    pub base_color: [f32; 3],
    pub emissive_color: [f32; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiskStyle {
    pub radius: f32,
    pub segments: u32,
    pub color: [f32; 3],
    pub opacity: f32,
    pub z: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayout {
    pub fog_color: [f32; 3],
    pub fog_near: f32,
    pub fog_far: f32,
    pub ambient: f32,
    pub key_light: f32,
    pub key_light_position: [f32; 3],
    pub magenta: PointLight,
    pub cyan: PointLight,
    pub ring: RingStyle,
    pub ring2: RingStyle,
    pub disk: DiskStyle,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            fog_color: hex_linear(0x03040a),
            fog_near: 6.0,
            fog_far: 18.0,
            ambient: 0.25,
            key_light: 0.9,
            key_light_position: [4.0, 6.0, 6.0],
            magenta: PointLight {
                color: hex_linear(0x7c5cff),
                position: [-3.0, 0.0, 6.0],
                range: 40.0,
            },
            cyan: PointLight {
                color: hex_linear(0x00dcff),
                position: [3.0, -1.0, 6.0],
                range: 40.0,
            },
            ring: RingStyle {
                major_radius: 2.0,
                tube_radius: 0.13,
                radial_segments: 24,
                tubular_segments: 220,
                base_color: hex_linear(0x12162a),
                emissive_color: hex_linear(0x6f4cff),
            },
            ring2: RingStyle {
                major_radius: 2.25,
                tube_radius: 0.03,
                radial_segments: 18,
                tubular_segments: 260,
                base_color: hex_linear(0xffffff),
                emissive_color: hex_linear(0x00dcff),
            },
            disk: DiskStyle {
                radius: 1.75,
                segments: 128,
                color: hex_linear(0x0b1026),
                opacity: 0.9,
                z: -0.02,
            },
        }
    }
}
