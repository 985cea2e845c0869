use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use pulsefield_scene::{Scene, StarField};
use wgpu::util::DeviceExt;

use crate::camera::OrbitCamera;
use crate::shaders;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct StarUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    time: f32,
    sprite_scale: f32,
    color_falloff: f32,
    _pad: f32,
    near_color: [f32; 4],
    far_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct HeartUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

/// Quad corner fed to the sprite vertex stage; offsets in `[-0.5, 0.5]`.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CornerVertex {
    corner: [f32; 2],
}

/// Per-star instance data, uploaded once at construction.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct StarInstance {
    position: [f32; 3],
    size: f32,
    shift: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct HeartVertex {
    position: [f32; 3],
}

/// Flatten the field's parallel arrays into interleaved instance data.
fn star_instances(field: &StarField) -> Vec<StarInstance> {
    (0..field.len())
        .map(|i| StarInstance {
            position: field.positions()[i].to_array(),
            size: field.sizes()[i],
            shift: field.shifts()[i],
        })
        .collect()
}

/// wgpu scene renderer.
///
/// Star attributes live in a static instance buffer; per-frame changes
/// flow through uniforms only. The heart's vertex buffer is re-written
/// from the CPU deformation each frame it is present.
pub struct SceneRenderer {
    star_pipeline: wgpu::RenderPipeline,
    heart_pipeline: wgpu::RenderPipeline,
    star_uniform_buffer: wgpu::Buffer,
    star_bind_group: wgpu::BindGroup,
    heart_uniform_buffer: wgpu::Buffer,
    heart_bind_group: wgpu::BindGroup,
    corner_vertex_buffer: wgpu::Buffer,
    corner_index_buffer: wgpu::Buffer,
    star_instance_buffer: wgpu::Buffer,
    star_count: u32,
    heart_vertex_buffer: Option<wgpu::Buffer>,
    heart_vertex_capacity: usize,
    heart_vertex_count: u32,
    depth_texture: wgpu::TextureView,
    background: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &Scene,
    ) -> Self {
        let star_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("star_uniform_buffer"),
            size: std::mem::size_of::<StarUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let heart_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("heart_uniform_buffer"),
            size: std::mem::size_of::<HeartUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let star_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("star_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: star_uniform_buffer.as_entire_binding(),
            }],
        });
        let heart_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("heart_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: heart_uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Star sprite pipeline: additive blend, depth read-only so the
        // sprites never occlude each other.
        let star_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::STAR_SHADER.into()),
        });

        let star_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &star_shader,
                entry_point: Some("vs_star"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<CornerVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<StarInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            1 => Float32x3,
                            2 => Float32,
                            3 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &star_shader,
                entry_point: Some("fs_star"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Heart pipeline: opaque, normal depth testing.
        let heart_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("heart_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::HEART_SHADER.into()),
        });

        let heart_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("heart_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &heart_shader,
                entry_point: Some("vs_heart"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<HeartVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &heart_shader,
                entry_point: Some("fs_heart"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Sprite quad: one shared corner quad, stars instanced over it.
        let corners = [
            CornerVertex { corner: [-0.5, -0.5] },
            CornerVertex { corner: [0.5, -0.5] },
            CornerVertex { corner: [0.5, 0.5] },
            CornerVertex { corner: [-0.5, 0.5] },
        ];
        let corner_indices: [u16; 6] = [0, 1, 2, 2, 3, 0];
        let corner_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("corner_vertex_buffer"),
            contents: bytemuck::cast_slice(&corners[..]),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let corner_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("corner_index_buffer"),
            contents: bytemuck::cast_slice(&corner_indices[..]),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instances = star_instances(scene.field());
        let star_instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star_instance_buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        tracing::info!(stars = instances.len(), "star instance buffer uploaded");

        let bg = scene.config().background;
        let background = wgpu::Color {
            r: bg.r as f64,
            g: bg.g as f64,
            b: bg.b as f64,
            a: 1.0,
        };

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            star_pipeline,
            heart_pipeline,
            star_uniform_buffer,
            star_bind_group,
            heart_uniform_buffer,
            heart_bind_group,
            corner_vertex_buffer,
            corner_index_buffer,
            star_instance_buffer,
            star_count: instances.len() as u32,
            heart_vertex_buffer: None,
            heart_vertex_capacity: 0,
            heart_vertex_count: 0,
            depth_texture,
            background,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame: star field, then the heart if it has arrived.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &Scene,
    ) {
        let cfg = scene.config();
        let field = scene.field();
        queue.write_buffer(
            &self.star_uniform_buffer,
            0,
            bytemuck::bytes_of(&StarUniforms {
                view: camera.view_matrix().to_cols_array_2d(),
                proj: camera.projection_matrix().to_cols_array_2d(),
                model: scene.field_transform().to_cols_array_2d(),
                time: field.time(),
                sprite_scale: cfg.star_sprite_size,
                color_falloff: cfg.color_falloff_distance,
                _pad: 0.0,
                near_color: [
                    cfg.star_color_near.r,
                    cfg.star_color_near.g,
                    cfg.star_color_near.b,
                    1.0,
                ],
                far_color: [
                    cfg.star_color_far.r,
                    cfg.star_color_far.g,
                    cfg.star_color_far.b,
                    1.0,
                ],
            }),
        );

        if let Some(heart) = scene.heart() {
            self.upload_heart(device, queue, heart.deformed());
            queue.write_buffer(
                &self.heart_uniform_buffer,
                0,
                bytemuck::bytes_of(&HeartUniforms {
                    view_proj: camera.view_projection().to_cols_array_2d(),
                    model: scene.heart_transform().to_cols_array_2d(),
                    color: [cfg.heart_color.r, cfg.heart_color.g, cfg.heart_color.b, 1.0],
                }),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            // Stars first, in submission order, like the reference scene.
            pass.set_pipeline(&self.star_pipeline);
            pass.set_bind_group(0, &self.star_bind_group, &[]);
            pass.set_vertex_buffer(0, self.corner_vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.star_instance_buffer.slice(..));
            pass.set_index_buffer(self.corner_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..6, 0, 0..self.star_count);

            if self.heart_vertex_count > 0 {
                if let Some(buffer) = &self.heart_vertex_buffer {
                    pass.set_pipeline(&self.heart_pipeline);
                    pass.set_bind_group(0, &self.heart_bind_group, &[]);
                    pass.set_vertex_buffer(0, buffer.slice(..));
                    pass.draw(0..self.heart_vertex_count, 0..1);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Write the deformed heart vertices, (re)allocating on first use
    /// or growth.
    fn upload_heart(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vec3]) {
        if self.heart_vertex_buffer.is_none() || vertices.len() > self.heart_vertex_capacity {
            self.heart_vertex_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("heart_vertex_buffer"),
                size: (vertices.len() * std::mem::size_of::<HeartVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.heart_vertex_capacity = vertices.len();
            tracing::debug!(vertices = vertices.len(), "heart vertex buffer allocated");
        }

        let data: Vec<HeartVertex> = vertices
            .iter()
            .map(|v| HeartVertex {
                position: v.to_array(),
            })
            .collect();
        if let Some(buffer) = &self.heart_vertex_buffer {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&data));
        }
        self.heart_vertex_count = vertices.len() as u32;
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsefield_common::SceneConfig;
    use pulsefield_scene::Scene;

    #[test]
    fn instances_interleave_the_parallel_arrays() {
        let mut cfg = SceneConfig::default();
        cfg.star_count = 8;
        let scene = Scene::new(cfg, 42);
        let field = scene.field();

        let instances = star_instances(field);
        assert_eq!(instances.len(), 8);
        for (i, inst) in instances.iter().enumerate() {
            assert_eq!(inst.position, field.positions()[i].to_array());
            assert_eq!(inst.size, field.sizes()[i]);
            assert_eq!(inst.shift, field.shifts()[i]);
        }
    }

    #[test]
    fn instance_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<StarInstance>(), 32);
        assert_eq!(std::mem::size_of::<CornerVertex>(), 8);
        assert_eq!(std::mem::size_of::<HeartVertex>(), 12);
    }
}
