use crate::helpers::{self, DEPTH_FORMAT, HDR_FORMAT};
use crate::uniforms::{MeshUniforms, SceneUniforms};
use portal_core::geometry::{self, Mesh, MeshVertex};
use portal_core::scene::SceneLayout;
use portal_core::{AnimationState, ParticleField};
use wgpu::util::DeviceExt;

/// Indexed mesh with its own per-object uniforms.
struct Drawable {
    vb: wgpu::Buffer,
    ib: wgpu::Buffer,
    index_count: u32,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Drawable {
    fn new(
        device: &wgpu::Device,
        mesh_bgl: &wgpu::BindGroupLayout,
        label: &str,
        mesh: &Mesh,
    ) -> Self {
        let vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let (uniforms, bind_group) = mesh_binding(device, mesh_bgl, label);
        Self {
            vb,
            ib,
            index_count: mesh.indices.len() as u32,
            uniforms,
            bind_group,
        }
    }

    fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_bind_group(1, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vb.slice(..));
        rpass.set_index_buffer(self.ib.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn mesh_binding(
    device: &wgpu::Device,
    mesh_bgl: &wgpu::BindGroupLayout,
    label: &str,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let uniforms = helpers::uniform_buffer::<MeshUniforms>(device, label);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: mesh_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniforms.as_entire_binding(),
        }],
    });
    (uniforms, bind_group)
}

/// Everything drawn into the HDR target before bloom.
pub(crate) struct ScenePass {
    layout: SceneLayout,
    point_size: f32,
    opacity: f32,
    scene_uniforms: wgpu::Buffer,
    scene_bg: wgpu::BindGroup,
    lit_pipeline: wgpu::RenderPipeline,
    flat_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,
    ring: Drawable,
    ring2: Drawable,
    disk: Drawable,
    field_uniforms: wgpu::Buffer,
    field_bg: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    particle_pos: wgpu::Buffer,
    particle_col: wgpu::Buffer,
    particle_count: u32,
}

impl ScenePass {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: SceneLayout,
        field: &ParticleField,
        point_size: f32,
        opacity: f32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::SCENE_WGSL.into()),
        });
        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let mesh_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_bgl"),
            entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let scene_uniforms = helpers::uniform_buffer::<SceneUniforms>(device, "scene_uniforms");
        let scene_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniforms.as_entire_binding(),
            }],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&scene_bgl, &mesh_bgl],
            push_constant_ranges: &[],
        });

        let mesh_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
        }];
        let lit_pipeline = mesh_pipeline(device, &pl, &shader, "fs_mesh", &mesh_buffers);
        let flat_pipeline = mesh_pipeline(device, &pl, &shader, "fs_flat", &mesh_buffers);

        let particle_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2],
            },
            // slot 1: per-particle position
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![1 => Float32x3],
            },
            // slot 2: per-particle colour
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![2 => Float32x3],
            },
        ];
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let particle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particle_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_particle"),
                buffers: &particle_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_particle"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let r = &layout.ring;
        let ring = Drawable::new(
            device,
            &mesh_bgl,
            "ring",
            &geometry::torus(r.major_radius, r.tube_radius, r.radial_segments, r.tubular_segments),
        );
        let r2 = &layout.ring2;
        let ring2 = Drawable::new(
            device,
            &mesh_bgl,
            "ring2",
            &geometry::torus(
                r2.major_radius,
                r2.tube_radius,
                r2.radial_segments,
                r2.tubular_segments,
            ),
        );
        let d = &layout.disk;
        let disk_mesh = geometry::disk(d.radius, d.segments, d.z);
        let disk = Drawable::new(device, &mesh_bgl, "disk", &disk_mesh);
        let (field_uniforms, field_bg) = mesh_binding(device, &mesh_bgl, "particle_field");

        // Two triangles, corners at +-0.5 so the quad side equals the point size.
        let quad: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let particle_pos = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle_positions"),
            contents: bytemuck::cast_slice(field.positions()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let particle_col = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle_colors"),
            contents: bytemuck::cast_slice(field.colors()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            layout,
            point_size,
            opacity,
            scene_uniforms,
            scene_bg,
            lit_pipeline,
            flat_pipeline,
            particle_pipeline,
            ring,
            ring2,
            disk,
            field_uniforms,
            field_bg,
            quad_vb,
            particle_pos,
            particle_col,
            particle_count: field.len() as u32,
        }
    }

    /// Positions beyond the buffer built at start-up are dropped; the field never grows.
    pub(crate) fn upload_particles(&self, queue: &wgpu::Queue, positions: &[[f32; 3]]) {
        let n = positions.len().min(self.particle_count as usize);
        queue.write_buffer(&self.particle_pos, 0, bytemuck::cast_slice(&positions[..n]));
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, state: &AnimationState) {
        let l = &self.layout;
        let fx = &state.effects;
        let scene = SceneUniforms::pack(state, l, self.point_size, self.opacity);
        queue.write_buffer(&self.scene_uniforms, 0, bytemuck::bytes_of(&scene));

        let ring = MeshUniforms::new(
            state.ring_transform(),
            l.ring.base_color,
            1.0,
            l.ring.emissive_color,
            fx.ring_emissive,
        );
        let ring2 = MeshUniforms::new(
            state.ring2_transform(),
            l.ring2.base_color,
            1.0,
            l.ring2.emissive_color,
            fx.ring2_emissive,
        );
        let disk = MeshUniforms::new(
            state.portal_transform(),
            l.disk.color,
            l.disk.opacity,
            [0.0; 3],
            0.0,
        );
        let field = MeshUniforms::new(state.field_transform(), [1.0; 3], 1.0, [0.0; 3], 0.0);
        queue.write_buffer(&self.ring.uniforms, 0, bytemuck::bytes_of(&ring));
        queue.write_buffer(&self.ring2.uniforms, 0, bytemuck::bytes_of(&ring2));
        queue.write_buffer(&self.disk.uniforms, 0, bytemuck::bytes_of(&disk));
        queue.write_buffer(&self.field_uniforms, 0, bytemuck::bytes_of(&field));
    }

    pub(crate) fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        hdr_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: hdr_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_bind_group(0, &self.scene_bg, &[]);

        rpass.set_pipeline(&self.lit_pipeline);
        self.ring.draw(&mut rpass);
        self.ring2.draw(&mut rpass);

        rpass.set_pipeline(&self.flat_pipeline);
        self.disk.draw(&mut rpass);

        rpass.set_pipeline(&self.particle_pipeline);
        rpass.set_bind_group(1, &self.field_bg, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.particle_pos.slice(..));
        rpass.set_vertex_buffer(2, self.particle_col.slice(..));
        rpass.draw(0..6, 0..self.particle_count);
    }
}

fn mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    frag_entry: &str,
    buffers: &[wgpu::VertexBufferLayout],
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(frag_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_mesh"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(frag_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}
