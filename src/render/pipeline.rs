use bytemuck::{Pod, Zeroable};

use super::sprite::PetSprite;

/// The whole draw fits in one uniform block; the quad comes from `vertex_index`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Uniforms {
    screen: [f32; 2],
    sprite: PetSprite,
    _pad: [u32; 3],
}

/// Corners per sprite quad (two triangles, no index buffer).
const QUAD_CORNERS: u32 = 6;

pub struct PetPipeline {
    pipeline: wgpu::RenderPipeline,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniforms: Uniforms,
    /// Nothing is drawn until the first sprite arrives.
    visible: bool,
}

impl PetPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pet_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/pet.wgsl").into()),
        });

        let uniform_size = std::mem::size_of::<Uniforms>() as wgpu::BufferAddress;
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pet_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(uniform_size),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pet_pipeline_layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pet_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    // The shader outputs premultiplied color for DirectComposition.
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pet_uniform_buffer"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pet_bind_group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            buffer,
            bind_group,
            uniforms: Uniforms {
                screen: [1.0, 1.0],
                ..Uniforms::zeroed()
            },
            visible: false,
        }
    }

    pub fn set_screen_size(&mut self, queue: &wgpu::Queue, width: f32, height: f32) {
        self.uniforms.screen = [width, height];
        self.upload(queue);
    }

    pub fn set_sprite(&mut self, queue: &wgpu::Queue, sprite: &PetSprite) {
        if self.visible && self.uniforms.sprite == *sprite {
            return;
        }
        self.uniforms.sprite = *sprite;
        self.visible = true;
        self.upload(queue);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if !self.visible {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..QUAD_CORNERS, 0..1);
    }

    fn upload(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&self.uniforms));
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use super::*;

    // Must line up with `Uniforms` in shaders/pet.wgsl.
    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(size_of::<Uniforms>(), 48);
        assert_eq!(size_of::<Uniforms>() % 16, 0);
        assert_eq!(offset_of!(Uniforms, sprite), 8);
        assert_eq!(offset_of!(PetSprite, size), 8);
        assert_eq!(offset_of!(PetSprite, color), 16);
        assert_eq!(offset_of!(PetSprite, flags), 24);
    }

    #[test]
    fn shader_draws_a_quad_from_vertex_index() {
        let src = include_str!("shaders/pet.wgsl");
        assert!(src.contains("@builtin(vertex_index)"));
        assert!(src.contains("var<uniform> u: Uniforms"));
    }
}
