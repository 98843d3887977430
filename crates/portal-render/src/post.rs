//! Bloom chain: bright pass -> horizontal blur -> vertical blur -> composite.
//!
//! Each pass has its own uniform buffer: queued writes all land before the
//! encoder is submitted.

use crate::helpers::{self, HDR_FORMAT};
use crate::targets::RenderTargets;
use crate::uniforms::PostUniforms;
use portal_core::BloomParams;

struct PostBindGroups {
    from_hdr: wgpu::BindGroup,
    from_bloom_a: wgpu::BindGroup,
    from_bloom_b: wgpu::BindGroup,
    composite_scene: wgpu::BindGroup,
    composite_bloom: wgpu::BindGroup,
}

pub(crate) struct PostResources {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    bright_uniforms: wgpu::Buffer,
    blur_h_uniforms: wgpu::Buffer,
    blur_v_uniforms: wgpu::Buffer,
    composite_uniforms: wgpu::Buffer,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    groups: PostBindGroups,
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        targets: &RenderTargets,
        swap_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::POST_WGSL.into()),
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                helpers::texture_entry(0),
                helpers::sampler_entry(1),
                helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &[helpers::texture_entry(0), helpers::sampler_entry(1)],
        });
        let bright_uniforms = helpers::uniform_buffer::<PostUniforms>(device, "post_bright");
        let blur_h_uniforms = helpers::uniform_buffer::<PostUniforms>(device, "post_blur_h");
        let blur_v_uniforms = helpers::uniform_buffer::<PostUniforms>(device, "post_blur_v");
        let composite_uniforms = helpers::uniform_buffer::<PostUniforms>(device, "post_composite");

        let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline =
            helpers::make_post_pipeline(device, &pl_single, &shader, "fs_bright", HDR_FORMAT, None);
        let blur_pipeline =
            helpers::make_post_pipeline(device, &pl_single, &shader, "fs_blur", HDR_FORMAT, None);
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            &pl_composite,
            &shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );

        let buffers = [
            &bright_uniforms,
            &blur_h_uniforms,
            &blur_v_uniforms,
            &composite_uniforms,
        ];
        let groups = build_groups(device, &bgl0, &bgl1, &sampler, buffers, targets);
        Self {
            groups,
            bgl0,
            bgl1,
            sampler,
            bright_uniforms,
            blur_h_uniforms,
            blur_v_uniforms,
            composite_uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
        }
    }

    /// Bind groups reference target views and must follow every resize.
    pub(crate) fn rebuild_bind_groups(&mut self, device: &wgpu::Device, targets: &RenderTargets) {
        let buffers = [
            &self.bright_uniforms,
            &self.blur_h_uniforms,
            &self.blur_v_uniforms,
            &self.composite_uniforms,
        ];
        self.groups = build_groups(device, &self.bgl0, &self.bgl1, &self.sampler, buffers, targets);
    }

    pub(crate) fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        bloom: &BloomParams,
        bloom_size: (u32, u32),
    ) {
        let write = |buf: &wgpu::Buffer, dir: [f32; 2]| {
            let u = PostUniforms::new(bloom, bloom_size, dir);
            queue.write_buffer(buf, 0, bytemuck::bytes_of(&u));
        };
        write(&self.bright_uniforms, [0.0, 0.0]);
        write(&self.blur_h_uniforms, [1.0, 0.0]);
        write(&self.blur_v_uniforms, [0.0, 1.0]);
        write(&self.composite_uniforms, [0.0, 0.0]);
    }

    /// Encode the four post passes, ending on `output`.
    pub(crate) fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        output: &wgpu::TextureView,
    ) {
        let g = &self.groups;
        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &g.from_hdr,
            None,
        );
        blit(encoder, "blur_h", &targets.bloom_b_view, &self.blur_pipeline, &g.from_bloom_a, None);
        blit(encoder, "blur_v", &targets.bloom_a_view, &self.blur_pipeline, &g.from_bloom_b, None);
        blit(
            encoder,
            "composite",
            output,
            &self.composite_pipeline,
            &g.composite_scene,
            Some(&g.composite_bloom),
        );
    }
}

/// `buffers`: bright, blur_h, blur_v, composite.
fn build_groups(
    device: &wgpu::Device,
    bgl0: &wgpu::BindGroupLayout,
    bgl1: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    buffers: [&wgpu::Buffer; 4],
    targets: &RenderTargets,
) -> PostBindGroups {
    let with_uniforms = |label: &str, view: &wgpu::TextureView, buf: &wgpu::Buffer| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: bgl0,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buf.as_entire_binding(),
                },
            ],
        })
    };
    let [bright, blur_h, blur_v, composite] = buffers;
    PostBindGroups {
        from_hdr: with_uniforms("bg_hdr", &targets.hdr_view, bright),
        from_bloom_a: with_uniforms("bg_from_bloom_a", &targets.bloom_a_view, blur_h),
        from_bloom_b: with_uniforms("bg_from_bloom_b", &targets.bloom_b_view, blur_v),
        composite_scene: with_uniforms("bg_composite", &targets.hdr_view, composite),
        composite_bloom: device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }),
    }
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
