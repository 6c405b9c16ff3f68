use crate::error::SetupError;
use crate::shaders::{self, FRAME_GROUP, OBJECT_GROUP, ShaderInterface};
use blocky_common::{Color, Transform};
use blocky_render::{CubeTarget, DrawError, UNIT_CUBE_VERTEX_COUNT, UNIT_CUBE_VERTICES};
use std::num::NonZeroU64;
use wgpu::util::DeviceExt;

const MATRIX_SIZE: u64 = std::mem::size_of::<[f32; 16]>() as u64;
const COLOR_SIZE: u64 = std::mem::size_of::<[f32; 4]>() as u64;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Round `size` up to a multiple of `alignment` (a power of two).
fn align_to(size: u64, alignment: u64) -> u64 {
    (size + alignment - 1) & !(alignment - 1)
}

/// Byte size of a pool of `capacity` uniform slots, checked against the
/// device's buffer size limit.
fn slot_pool_size(capacity: usize, stride: u64, max_buffer_size: u64) -> Result<u64, SetupError> {
    let slots = capacity.max(1);
    (slots as u64)
        .checked_mul(stride)
        .filter(|size| *size <= max_buffer_size)
        .ok_or(SetupError::SlotPoolTooLarge {
            slots,
            stride,
            limit: max_buffer_size,
        })
}

/// Uniform values captured for one cube draw.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlotData {
    model: [f32; 16],
    color: [f32; 4],
}

/// CPU side of a frame: the uniform uploads and draw calls issued through
/// [`CubeTarget`], captured into a fixed pool of slots until submission.
#[derive(Debug)]
pub struct FrameRecorder {
    global: [f32; 16],
    model: [f32; 16],
    color: [f32; 4],
    slots: Vec<SlotData>,
    capacity: usize,
}

impl FrameRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            global: Transform::IDENTITY.elements(),
            // The model slot starts as identity until the first upload.
            model: Transform::IDENTITY.elements(),
            color: Color::WHITE.to_array(),
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Draws recorded since the last clear.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Pack the recorded model matrices and colors into two byte buffers with
    /// one `stride`-aligned slot per draw.
    fn pack(&self, stride: u64) -> (Vec<u8>, Vec<u8>) {
        let stride = stride as usize;
        let mut models = vec![0u8; self.slots.len() * stride];
        let mut colors = vec![0u8; self.slots.len() * stride];
        for (i, slot) in self.slots.iter().enumerate() {
            let at = i * stride;
            let model = bytemuck::bytes_of(&slot.model);
            let color = bytemuck::bytes_of(&slot.color);
            models[at..at + model.len()].copy_from_slice(model);
            colors[at..at + color.len()].copy_from_slice(color);
        }
        (models, colors)
    }
}

impl CubeTarget for FrameRecorder {
    fn clear(&mut self) {
        self.slots.clear();
    }

    fn set_global_rotation(&mut self, global: &Transform) {
        self.global = global.elements();
    }

    fn set_model_matrix(&mut self, model: &Transform) {
        self.model = model.elements();
    }

    fn set_frag_color(&mut self, color: Color) {
        self.color = color.to_array();
    }

    fn draw_unit_cube(&mut self) -> Result<(), DrawError> {
        if self.slots.len() >= self.capacity {
            return Err(DrawError::SlotsExhausted {
                capacity: self.capacity,
            });
        }
        self.slots.push(SlotData {
            model: self.model,
            color: self.color,
        });
        Ok(())
    }
}

/// wgpu cube renderer.
///
/// Renders into a retained offscreen color target that survives between
/// frames and is copied to the surface image on submit.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    slot_stride: u64,
    vertex_buffer: wgpu::Buffer,
    color_target: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    interface: ShaderInterface,
    recorder: FrameRecorder,
}

impl WgpuRenderer {
    /// Build the pipeline and buffers for up to `capacity` cubes per frame.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        capacity: usize,
    ) -> Result<Self, SetupError> {
        let interface = shaders::resolve_interface(shaders::CUBE_SHADER)?;
        tracing::debug!("shader interface: {interface:?}");

        let limits = device.limits();
        let slot_stride = align_to(MATRIX_SIZE, limits.min_uniform_buffer_offset_alignment as u64);
        let pool_size = slot_pool_size(capacity, slot_stride, limits.max_buffer_size)?;

        // Frame group: global rotation
        let global_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("global_rotate_buffer"),
            contents: bytemuck::bytes_of(&Transform::IDENTITY.elements()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: interface.global_rotate_matrix.binding,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(MATRIX_SIZE),
                },
                count: None,
            }],
        });

        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: interface.global_rotate_matrix.binding,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        // Object group: per-cube model matrix and color slots
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("model_matrix_buffer"),
            size: pool_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let color_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frag_color_buffer"),
            size: pool_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: interface.model_matrix.binding,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(MATRIX_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: interface.frag_color.binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(COLOR_SIZE),
                    },
                    count: None,
                },
            ],
        });

        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: &object_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: interface.model_matrix.binding,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &model_buffer,
                        offset: 0,
                        size: NonZeroU64::new(MATRIX_SIZE),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: interface.frag_color.binding,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &color_buffer,
                        offset: 0,
                        size: NonZeroU64::new(COLOR_SIZE),
                    }),
                },
            ],
        });

        // Slice position is the group index: FRAME_GROUP, then OBJECT_GROUP.
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[&global_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::CUBE_SHADER.into()),
        });

        let attributes = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: interface.position_location,
        }];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(shaders::VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(shaders::FRAGMENT_ENTRY),
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
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("unit_cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&UNIT_CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (color_target, color_view) =
            Self::create_color_target(device, surface_format, width, height);
        let depth_view = Self::create_depth_texture(device, width, height);

        Ok(Self {
            pipeline,
            global_buffer,
            global_bind_group,
            model_buffer,
            color_buffer,
            object_bind_group,
            slot_stride,
            vertex_buffer,
            color_target,
            color_view,
            depth_view,
            surface_format,
            interface,
            recorder: FrameRecorder::new(capacity),
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (color_target, color_view) =
            Self::create_color_target(device, self.surface_format, width, height);
        self.color_target = color_target;
        self.color_view = color_view;
        self.depth_view = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn interface(&self) -> &ShaderInterface {
        &self.interface
    }

    /// The retained color buffer holding the last submitted frame.
    pub fn frame_texture(&self) -> &wgpu::Texture {
        &self.color_target
    }

    /// Draw target for the next frame.
    pub fn recorder_mut(&mut self) -> &mut FrameRecorder {
        &mut self.recorder
    }

    /// Upload the recorded uniforms, replay the recorded draws into the
    /// retained target, and copy it to `surface_texture`.
    pub fn submit(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_texture: &wgpu::Texture,
    ) {
        let recorder = &self.recorder;
        queue.write_buffer(&self.global_buffer, 0, bytemuck::bytes_of(&recorder.global));
        if !recorder.is_empty() {
            let (models, colors) = recorder.pack(self.slot_stride);
            queue.write_buffer(&self.model_buffer, 0, &models);
            queue.write_buffer(&self.color_buffer, 0, &colors);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(FRAME_GROUP, &self.global_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            for i in 0..recorder.len() {
                let offset = (i as u64 * self.slot_stride) as u32;
                // Both object bindings share the slot index.
                pass.set_bind_group(OBJECT_GROUP, &self.object_bind_group, &[offset, offset]);
                pass.draw(0..UNIT_CUBE_VERTEX_COUNT as u32, 0..1);
            }
        }

        encoder.copy_texture_to_texture(
            self.color_target.as_image_copy(),
            surface_texture.as_image_copy(),
            self.color_target.size(),
        );

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_color_target(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("retained_color_target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        (texture, view)
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
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
