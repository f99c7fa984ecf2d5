use std::marker::PhantomData;
use std::num::NonZeroU64;

use bytemuck::Pod;

use crate::geometry::{GpuMesh, Mesh};
use crate::shader::{ProgramInterface, ResourceKind, ShaderError, ShaderProgram, ENTRY_POINT};
use crate::texture::{GpuTexture, TextureImage};

use super::{RenderCtx, RenderTarget};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SlotKind {
    /// `min_size` is the shader's block span; the buffer may be larger.
    Uniform { min_size: u64 },
    Texture,
    Sampler,
}

/// One entry of the renderer's bind group (always group 0).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BindingSlot {
    pub binding: u32,
    pub kind: SlotKind,
    pub visibility: wgpu::ShaderStages,
}

impl BindingSlot {
    fn layout_entry(&self) -> wgpu::BindGroupLayoutEntry {
        let ty = match self.kind {
            SlotKind::Uniform { min_size } => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(min_size),
            },
            SlotKind::Texture => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            SlotKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        };
        wgpu::BindGroupLayoutEntry {
            binding: self.binding,
            visibility: self.visibility,
            ty,
            count: None,
        }
    }
}

/// Works out the bind group a program needs, given the size of the uniform
/// struct the caller will upload and whether a texture is available.
///
/// Supported: at most one uniform block, 2D textures and filtering samplers,
/// all in group 0.
pub fn plan_bindings(
    interface: &ProgramInterface,
    uniform_size: usize,
    has_texture: bool,
) -> Result<Vec<BindingSlot>, ShaderError> {
    let mut problems = Vec::new();
    let mut slots = Vec::with_capacity(interface.resources.len());
    let mut seen_uniform = false;
    let mut samples_texture = false;

    for res in &interface.resources {
        let name = res.name.as_deref().unwrap_or("<unnamed>");
        if res.group != 0 {
            problems.push(format!(
                "'{name}' is bound in set {}, only set 0 is supported",
                res.group
            ));
            continue;
        }

        let kind = match &res.kind {
            ResourceKind::UniformBuffer { size } => {
                if seen_uniform {
                    problems.push(format!("second uniform block '{name}' is not supported"));
                    continue;
                }
                seen_uniform = true;
                if (uniform_size as u64) < *size as u64 {
                    problems.push(format!(
                        "uniform block '{name}' spans {size} bytes but the uniform struct is {uniform_size} bytes"
                    ));
                }
                SlotKind::Uniform { min_size: *size as u64 }
            }
            ResourceKind::Texture => {
                samples_texture = true;
                SlotKind::Texture
            }
            ResourceKind::Sampler => {
                samples_texture = true;
                SlotKind::Sampler
            }
            ResourceKind::Unsupported(space) => {
                problems.push(format!("'{name}' lives in unsupported address space {space}"));
                continue;
            }
        };

        slots.push(BindingSlot {
            binding: res.binding,
            kind,
            visibility: res.visibility,
        });
    }

    if samples_texture && !has_texture {
        problems.push("program samples a texture but none was provided".to_string());
    }
    if has_texture && !samples_texture {
        log::warn!("texture provided but the program never samples it; ignoring");
    }
    if !seen_uniform && uniform_size > 0 {
        log::debug!("program declares no uniform block; per-frame uniforms are not uploaded");
    }

    if problems.is_empty() {
        Ok(slots)
    } else {
        Err(ShaderError::link(problems))
    }
}

/// True if any slot needs the uploaded texture's view or sampler.
fn needs_texture(slots: &[BindingSlot]) -> bool {
    slots
        .iter()
        .any(|s| matches!(s.kind, SlotKind::Texture | SlotKind::Sampler))
}

/// Draws one mesh with one program, re-uploading `U` every frame.
pub struct MeshRenderer<U> {
    pipeline: wgpu::RenderPipeline,
    bind_group: Option<wgpu::BindGroup>,
    uniform_buffer: Option<wgpu::Buffer>,
    mesh: GpuMesh,
    depth_tested: bool,

    /// Kept alive for the bind group.
    _texture: Option<GpuTexture>,
    _uniforms: PhantomData<U>,
}

impl<U: Pod> MeshRenderer<U> {
    /// Builds the pipeline and uploads mesh, texture and an initial zeroed
    /// uniform block.
    ///
    /// Fails if the mesh layout or the uniform struct does not fit the
    /// program.
    pub fn new(
        ctx: &RenderCtx<'_>,
        program: &ShaderProgram,
        mesh: &Mesh,
        texture: Option<&TextureImage>,
    ) -> Result<Self, ShaderError> {
        mesh.layout().check_against(program.interface())?;
        let slots = plan_bindings(program.interface(), size_of::<U>(), texture.is_some())?;

        let (vs, fs) = program.create_modules(ctx.device);

        let layout_entries: Vec<_> = slots.iter().map(BindingSlot::layout_entry).collect();
        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lumen mesh bgl"),
                entries: &layout_entries,
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lumen mesh pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(ENTRY_POINT),
                compilation_options: Default::default(),
                buffers: &[mesh.layout().buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(ENTRY_POINT),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: ctx.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform_buffer = slots.iter().find_map(|slot| match slot.kind {
            SlotKind::Uniform { min_size } => {
                let size = (size_of::<U>() as u64).max(min_size).next_multiple_of(16);
                Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("lumen mesh ubo"),
                    size,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }))
            }
            _ => None,
        });

        let gpu_texture = texture
            .filter(|_| needs_texture(&slots))
            .map(|t| t.upload(ctx.device, ctx.queue));

        let bind_group = if slots.is_empty() {
            None
        } else {
            let entries: Vec<_> = slots
                .iter()
                .filter_map(|slot| {
                    let resource = match slot.kind {
                        SlotKind::Uniform { .. } => uniform_buffer.as_ref()?.as_entire_binding(),
                        SlotKind::Texture => {
                            wgpu::BindingResource::TextureView(&gpu_texture.as_ref()?.view)
                        }
                        SlotKind::Sampler => {
                            wgpu::BindingResource::Sampler(&gpu_texture.as_ref()?.sampler)
                        }
                    };
                    Some(wgpu::BindGroupEntry {
                        binding: slot.binding,
                        resource,
                    })
                })
                .collect();

            Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("lumen mesh bind group"),
                layout: &bind_group_layout,
                entries: &entries,
            }))
        };

        log::info!(
            "mesh renderer ready: {} bindings, draw count {}, depth {}",
            slots.len(),
            mesh.draw_count(),
            if ctx.depth_format.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
            mesh: mesh.upload(ctx.device),
            depth_tested: ctx.depth_format.is_some(),
            _texture: gpu_texture,
            _uniforms: PhantomData,
        })
    }

    /// Queues the uniform block upload. Takes effect for the next submitted
    /// draw.
    pub fn update(&self, queue: &wgpu::Queue, uniforms: &U) {
        if let Some(ubo) = &self.uniform_buffer {
            queue.write_buffer(ubo, 0, bytemuck::bytes_of(uniforms));
        }
    }

    /// Records one draw into `target`, on top of whatever it already holds.
    pub fn draw(&self, target: &mut RenderTarget<'_>) {
        let depth_stencil_attachment = target
            .depth_view
            .filter(|_| self.depth_tested)
            .map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        if let Some(bind_group) = &self.bind_group {
            rpass.set_bind_group(0, bind_group, &[]);
        }
        self.mesh.draw(&mut rpass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::test_sources::{compiled, FRAG, VERT};
    use crate::shader::{link, Stage};

    const TEXTURED_FRAG: &str = r#"#version 450 core
layout(location = 0) in vec3 vColor;
layout(location = 0) out vec4 fragColor;
layout(set = 0, binding = 1) uniform texture2D tex;
layout(set = 0, binding = 2) uniform sampler samp;
void main() {
    fragColor = texture(sampler2D(tex, samp), vColor.xy) * vec4(vColor, 1.0);
}
"#;

    fn interface(frag: &str) -> ProgramInterface {
        link(compiled(Stage::Vertex, VERT), compiled(Stage::Fragment, frag))
            .unwrap()
            .interface()
            .clone()
    }

    #[test]
    fn uniform_only_program() {
        let slots = plan_bindings(&interface(FRAG), 16, false).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].binding, 0);
        assert!(matches!(slots[0].kind, SlotKind::Uniform { min_size } if min_size <= 16));
        assert_eq!(slots[0].visibility, wgpu::ShaderStages::VERTEX);
    }

    #[test]
    fn undersized_uniform_struct_rejected() {
        let err = plan_bindings(&interface(FRAG), 0, false).unwrap_err();
        assert!(err.log().unwrap().contains("uniform struct is 0 bytes"));
    }

    #[test]
    fn textured_program_needs_a_texture() {
        let iface = interface(TEXTURED_FRAG);

        let slots = plan_bindings(&iface, 16, true).unwrap();
        let kinds: Vec<_> = slots.iter().map(|s| (s.binding, s.kind)).collect();
        assert_eq!(kinds[1..], [(1, SlotKind::Texture), (2, SlotKind::Sampler)]);

        let err = plan_bindings(&iface, 16, false).unwrap_err();
        assert!(err.log().unwrap().contains("none was provided"));
    }

    #[test]
    fn sampler_alone_still_binds_the_texture() {
        let sampler_only = FRAG.replace(
            "layout(location = 0) out vec4 fragColor;",
            "layout(location = 0) out vec4 fragColor;\nlayout(set = 0, binding = 2) uniform sampler samp;",
        );
        let iface = interface(&sampler_only);

        assert!(plan_bindings(&iface, 16, false).is_err());
        let slots = plan_bindings(&iface, 16, true).unwrap();
        assert_eq!(slots.last().map(|s| s.kind), Some(SlotKind::Sampler));
        assert!(needs_texture(&slots));

        let plain = plan_bindings(&interface(FRAG), 16, true).unwrap();
        assert!(!needs_texture(&plain));
    }

    #[test]
    fn unused_texture_is_not_an_error() {
        assert!(plan_bindings(&interface(FRAG), 16, true).is_ok());
    }
}
