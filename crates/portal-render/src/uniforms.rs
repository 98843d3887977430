use glam::Mat4;
use portal_core::scene::SceneLayout;
use portal_core::{AnimationState, BloomParams};

/// Group 0 of the scene shader. All members are vec4-aligned.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    pub(crate) view: [[f32; 4]; 4],
    pub(crate) proj: [[f32; 4]; 4],
    pub(crate) camera_pos: [f32; 4],
    /// rgb = fog colour, w = ambient intensity
    pub(crate) fog_color: [f32; 4],
    /// near, far, key light intensity, unused
    pub(crate) fog_params: [f32; 4],
    /// xyz = direction towards the key light
    pub(crate) key_dir: [f32; 4],
    /// xyz = position, w = range
    pub(crate) magenta_pos: [f32; 4],
    /// rgb premultiplied by intensity
    pub(crate) magenta_color: [f32; 4],
    pub(crate) cyan_pos: [f32; 4],
    pub(crate) cyan_color: [f32; 4],
    /// point size, opacity
    pub(crate) particle: [f32; 4],
}

impl SceneUniforms {
    pub(crate) fn pack(
        state: &AnimationState,
        layout: &SceneLayout,
        point_size: f32,
        opacity: f32,
    ) -> Self {
        let cam = &state.camera;
        let fx = &state.effects;
        let key = glam::Vec3::from(layout.key_light_position).normalize_or_zero();
        let scaled = |c: [f32; 3], k: f32| [c[0] * k, c[1] * k, c[2] * k, 0.0];
        let at = |p: [f32; 3], range: f32| [p[0], p[1], p[2], range];
        Self {
            view: cam.view_matrix().to_cols_array_2d(),
            proj: cam.projection_matrix().to_cols_array_2d(),
            camera_pos: cam.eye.extend(1.0).to_array(),
            fog_color: [
                layout.fog_color[0],
                layout.fog_color[1],
                layout.fog_color[2],
                layout.ambient,
            ],
            fog_params: [layout.fog_near, layout.fog_far, layout.key_light, 0.0],
            key_dir: key.extend(0.0).to_array(),
            magenta_pos: at(layout.magenta.position, layout.magenta.range),
            magenta_color: scaled(layout.magenta.color, fx.magenta_light),
            cyan_pos: at(layout.cyan.position, layout.cyan.range),
            cyan_color: scaled(layout.cyan.color, fx.cyan_light),
            particle: [point_size, opacity, 0.0, 0.0],
        }
    }
}

/// Group 1: one instance per drawable (ring, ring2, disk, particle field).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshUniforms {
    pub(crate) model: [[f32; 4]; 4],
    /// rgb, a = opacity
    pub(crate) base_color: [f32; 4],
    /// rgb premultiplied by emissive intensity
    pub(crate) emissive: [f32; 4],
}

impl MeshUniforms {
    pub(crate) fn new(
        model: Mat4,
        base: [f32; 3],
        opacity: f32,
        emissive: [f32; 3],
        intensity: f32,
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            base_color: [base[0], base[1], base[2], opacity],
            emissive: [
                emissive[0] * intensity,
                emissive[1] * intensity,
                emissive[2] * intensity,
                0.0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) blur_dir: [f32; 2],
    pub(crate) bloom_strength: f32,
    pub(crate) bloom_radius: f32,
    pub(crate) threshold: f32,
    pub(crate) _pad: f32,
}

impl PostUniforms {
    pub(crate) fn new(bloom: &BloomParams, bloom_size: (u32, u32), blur_dir: [f32; 2]) -> Self {
        Self {
            resolution: [bloom_size.0 as f32, bloom_size.1 as f32],
            blur_dir,
            bloom_strength: bloom.strength,
            bloom_radius: bloom.radius,
            threshold: bloom.threshold,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::{PortalConfig, PortalEngine};

    #[test]
    fn layouts_match_wgsl_sizes() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 2 * 64 + 9 * 16);
        assert_eq!(std::mem::size_of::<MeshUniforms>(), 64 + 2 * 16);
        assert_eq!(std::mem::size_of::<PostUniforms>(), 32);
    }

    #[test]
    fn light_colours_scale_with_intensity() {
        let mut cfg = PortalConfig::default();
        cfg.particles.count = 10;
        let mut engine = PortalEngine::new(&cfg).unwrap();
        let state = engine.tick(0.0);
        let layout = SceneLayout::default();
        let u = SceneUniforms::pack(&state, &layout, 0.018, 0.9);
        let k = state.effects.magenta_light;
        assert!((u.magenta_color[2] - layout.magenta.color[2] * k).abs() < 1e-6);
        assert_eq!(u.magenta_pos[3], 40.0);
        assert_eq!(u.camera_pos[2], 9.0);
        assert_eq!(u.particle[0], 0.018);
    }

    #[test]
    fn emissive_is_premultiplied() {
        let m = MeshUniforms::new(Mat4::IDENTITY, [0.1, 0.2, 0.3], 0.9, [1.0, 0.5, 0.0], 2.0);
        assert_eq!(m.emissive, [2.0, 1.0, 0.0, 0.0]);
        assert_eq!(m.base_color[3], 0.9);
    }
}
