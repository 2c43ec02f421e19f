//! [`GraphicsDevice`] backed by wgpu.
//!
//! One render pipeline per program, with bind-group layouts built from the
//! program's reflection. Uniforms go through a per-frame [`UniformRing`];
//! texture bind groups are cached per program keyed by the bound texture
//! set, so a steady-state frame creates no GPU objects.

use std::borrow::Cow;
use std::num::NonZeroU64;

use rustc_hash::FxHashMap;

use super::device::{DrawCall, GraphicsDevice};
use super::pipeline_helpers::{
    create_screen_space_pipeline, dynamic_uniform_buffer, filtering_sampler,
    linear_sampler, texture_entry,
};
use super::reflection::{
    ShaderReflection, REPEAT_SAMPLER_BINDING, SAMPLER_BINDING, UNIFORM_BINDING,
};
use super::render_context::RenderContext;
use super::resources::{
    Arena, ProgramId, RenderTarget, RenderTargetHandle, TargetId, TextureId,
};
use super::shader_composer::{CompiledProgram, ShaderError};
use super::texture::ColorTarget;
use super::uniform_ring::UniformRing;
use super::uniforms::TextureBindings;

const INITIAL_UNIFORM_CAPACITY: u64 = 16 * 1024;

struct GpuProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    reflection: ShaderReflection,
    uniform_group: Option<(u64, wgpu::BindGroup)>,
    texture_groups: FxHashMap<TextureBindings, wgpu::BindGroup>,
}

enum TextureSource {
    /// A view owned by the caller (G-buffer depth, noise volumes).
    External(wgpu::TextureView),
    /// The color output of one of our offscreen targets.
    Target(TargetId),
}

struct OffscreenTarget {
    label: String,
    color: ColorTarget,
}

struct Frame {
    encoder: wgpu::CommandEncoder,
    screen: wgpu::TextureView,
}

/// wgpu implementation of the post-process graphics context.
pub struct WgpuDevice {
    context: RenderContext,
    clamp_sampler: wgpu::Sampler,
    repeat_sampler: wgpu::Sampler,
    uniforms: UniformRing,
    programs: Arena<ProgramId, GpuProgram>,
    textures: Arena<TextureId, TextureSource>,
    targets: Arena<TargetId, OffscreenTarget>,
    frame: Option<Frame>,
}

impl WgpuDevice {
    /// Wrap a render context.
    #[must_use]
    pub fn new(context: RenderContext) -> Self {
        let device = &context.device;
        let clamp_sampler = linear_sampler(
            device,
            "PostFx Clamp Sampler",
            wgpu::AddressMode::ClampToEdge,
        );
        let repeat_sampler = linear_sampler(
            device,
            "PostFx Repeat Sampler",
            wgpu::AddressMode::Repeat,
        );
        let uniforms = UniformRing::new(
            device,
            "PostFx Uniform Ring",
            INITIAL_UNIFORM_CAPACITY,
            device.limits().min_uniform_buffer_offset_alignment,
        );

        Self {
            context,
            clamp_sampler,
            repeat_sampler,
            uniforms,
            programs: Arena::new(),
            textures: Arena::new(),
            targets: Arena::new(),
            frame: None,
        }
    }

    /// The wrapped render context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Make a caller-owned texture view sampleable by programs.
    pub fn register_texture(&mut self, view: wgpu::TextureView) -> TextureId {
        self.textures.insert(TextureSource::External(view))
    }

    /// Swap the view behind an existing texture handle (e.g. the G-buffer
    /// depth after a resize).
    pub fn replace_texture(&mut self, id: TextureId, view: wgpu::TextureView) {
        match self.textures.get_mut(id) {
            Some(slot @ TextureSource::External(_)) => {
                *slot = TextureSource::External(view);
                self.invalidate_texture_groups();
            }
            Some(TextureSource::Target(_)) => {
                log::warn!("texture {id:?} belongs to a render target");
            }
            None => log::warn!("replace_texture: unknown texture {id:?}"),
        }
    }

    /// Forget a caller-owned texture.
    pub fn release_texture(&mut self, id: TextureId) {
        if self.textures.remove(id).is_some() {
            self.invalidate_texture_groups();
        }
    }

    /// Begin recording a frame that presents into `screen`.
    ///
    /// A frame still open from a previous call is submitted first.
    pub fn begin_frame(&mut self, screen: wgpu::TextureView) {
        if self.frame.is_some() {
            log::warn!("begin_frame called with a frame still open");
            let _ = self.finish_frame();
        }
        if self.uniforms.reset(&self.context.device) {
            for (_, program) in self.programs.iter_mut() {
                program.uniform_group = None;
            }
        }
        let encoder = self.context.create_encoder("PostFx Frame Encoder");
        self.frame = Some(Frame { encoder, screen });
    }

    /// Submit the frame's commands. Returns `false` if no frame was open.
    pub fn finish_frame(&mut self) -> bool {
        let Some(frame) = self.frame.take() else {
            return false;
        };
        self.context.submit(frame.encoder.finish());
        true
    }

    /// Color view of an offscreen target, for callers that read the result.
    #[must_use]
    pub fn target_view(&self, target: TargetId) -> Option<&wgpu::TextureView> {
        self.targets.get(target).map(|t| &t.color.view)
    }

    fn invalidate_texture_groups(&mut self) {
        for (_, program) in self.programs.iter_mut() {
            program.texture_groups.clear();
        }
    }

    fn create_layouts(
        &self,
        label: &str,
        reflection: &ShaderReflection,
    ) -> (wgpu::BindGroupLayout, wgpu::BindGroupLayout) {
        let mut uniform_entries = Vec::with_capacity(3);
        if reflection.uniform_block_size() > 0 {
            uniform_entries.push(dynamic_uniform_buffer(UNIFORM_BINDING));
        }
        for &binding in reflection.samplers() {
            uniform_entries.push(filtering_sampler(binding));
        }
        let texture_entries: Vec<_> = reflection
            .textures()
            .iter()
            .map(|(_, loc)| texture_entry(loc.unit, loc.kind))
            .collect();

        let device = &self.context.device;
        let uniform_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} Uniform Layout")),
                entries: &uniform_entries,
            });
        let texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} Texture Layout")),
                entries: &texture_entries,
            });
        (uniform_layout, texture_layout)
    }
}

impl GraphicsDevice for WgpuDevice {
    fn build_program(
        &mut self,
        program: CompiledProgram,
    ) -> Result<ProgramId, ShaderError> {
        let CompiledProgram {
            label,
            vertex,
            fragment,
            reflection,
        } = program;

        self.context
            .device
            .push_error_scope(wgpu::ErrorFilter::Validation);

        let (uniform_layout, texture_layout) =
            self.create_layouts(&label, &reflection);
        let device = &self.context.device;
        let vertex_module =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{label} Vertex")),
                source: wgpu::ShaderSource::Naga(Cow::Owned(vertex)),
            });
        let fragment_module =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{label} Fragment")),
                source: wgpu::ShaderSource::Naga(Cow::Owned(fragment)),
            });
        let pipeline = create_screen_space_pipeline(
            device,
            &label,
            &vertex_module,
            &fragment_module,
            self.context.format,
            &[&uniform_layout, &texture_layout],
        );

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                program: label,
                diagnostic: error.to_string(),
            });
        }

        log::debug!("built GPU program '{label}'");
        Ok(self.programs.insert(GpuProgram {
            label,
            pipeline,
            uniform_layout,
            texture_layout,
            reflection,
            uniform_group: None,
            texture_groups: FxHashMap::default(),
        }))
    }

    fn reflection(&self, program: ProgramId) -> Option<&ShaderReflection> {
        self.programs.get(program).map(|p| &p.reflection)
    }

    fn release_program(&mut self, program: ProgramId) {
        if let Some(released) = self.programs.remove(program) {
            log::debug!("released GPU program '{}'", released.label);
        }
    }

    fn create_render_target(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
    ) -> RenderTargetHandle {
        let color = ColorTarget::new(
            &self.context.device,
            label,
            width,
            height,
            self.context.format,
        );
        let target = self.targets.insert(OffscreenTarget {
            label: label.to_owned(),
            color,
        });
        let texture = self.textures.insert(TextureSource::Target(target));
        RenderTargetHandle { target, texture }
    }

    fn resize_render_target(
        &mut self,
        target: RenderTargetHandle,
        width: u32,
        height: u32,
    ) {
        let Some(offscreen) = self.targets.get_mut(target.target) else {
            log::warn!("resize of unknown render target {:?}", target.target);
            return;
        };
        offscreen.color = ColorTarget::new(
            &self.context.device,
            &offscreen.label,
            width,
            height,
            self.context.format,
        );
        self.invalidate_texture_groups();
    }

    fn release_render_target(&mut self, target: RenderTargetHandle) {
        let _ = self.targets.remove(target.target);
        let _ = self.textures.remove(target.texture);
        self.invalidate_texture_groups();
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        let Self {
            context,
            clamp_sampler,
            repeat_sampler,
            uniforms,
            programs,
            textures,
            targets,
            frame,
        } = self;

        let Some(frame) = frame.as_mut() else {
            log::warn!("draw outside begin_frame/finish_frame ignored");
            return;
        };
        let Some(program) = programs.get_mut(call.program) else {
            log::warn!("draw with released program {:?}", call.program);
            return;
        };

        let block_size = program.reflection.uniform_block_size();
        let offset = if block_size > 0 {
            let bytes = call.uniforms.as_bytes();
            let Some(offset) = uniforms.push(&context.queue, bytes) else {
                log::warn!(
                    "uniform ring full, skipping '{}' this frame",
                    program.label
                );
                return;
            };
            Some(offset)
        } else {
            None
        };

        let generation = uniforms.generation();
        let stale = match &program.uniform_group {
            Some((g, _)) => *g != generation,
            None => true,
        };
        if stale {
            let group = create_uniform_group(
                &context.device,
                program,
                uniforms.buffer(),
                clamp_sampler,
                repeat_sampler,
            );
            program.uniform_group = Some((generation, group));
        }

        if !program.texture_groups.contains_key(call.textures) {
            let Some(group) = create_texture_group(
                &context.device,
                program,
                call.textures,
                textures,
                targets,
            ) else {
                return;
            };
            let _ = program.texture_groups.insert(*call.textures, group);
        }

        let view = match call.target {
            RenderTarget::Screen => &frame.screen,
            RenderTarget::Offscreen(id) => match targets.get(id) {
                Some(t) => &t.color.view,
                None => {
                    log::warn!("draw into unknown render target {id:?}");
                    return;
                }
            },
        };

        let (Some((_, uniform_group)), Some(texture_group)) = (
            program.uniform_group.as_ref(),
            program.texture_groups.get(call.textures),
        ) else {
            return;
        };

        let mut pass =
            frame
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some(&program.label),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    ..Default::default()
                });

        pass.set_pipeline(&program.pipeline);
        match offset {
            Some(offset) => pass.set_bind_group(0, uniform_group, &[offset]),
            None => pass.set_bind_group(0, uniform_group, &[]),
        }
        pass.set_bind_group(1, texture_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

fn create_uniform_group(
    device: &wgpu::Device,
    program: &GpuProgram,
    buffer: &wgpu::Buffer,
    clamp_sampler: &wgpu::Sampler,
    repeat_sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let reflection = &program.reflection;
    let mut entries = Vec::with_capacity(3);
    if let Some(size) =
        NonZeroU64::new(u64::from(reflection.uniform_block_size()))
    {
        entries.push(wgpu::BindGroupEntry {
            binding: UNIFORM_BINDING,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: Some(size),
            }),
        });
    }
    for &binding in reflection.samplers() {
        let sampler = if binding == REPEAT_SAMPLER_BINDING {
            repeat_sampler
        } else {
            debug_assert_eq!(binding, SAMPLER_BINDING);
            clamp_sampler
        };
        entries.push(wgpu::BindGroupEntry {
            binding,
            resource: wgpu::BindingResource::Sampler(sampler),
        });
    }

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} Uniform Bind Group", program.label)),
        layout: &program.uniform_layout,
        entries: &entries,
    })
}

/// Bind group for the textures of one draw, or `None` (with a warning) if a
/// texture the shader reads is unbound or released.
fn create_texture_group(
    device: &wgpu::Device,
    program: &GpuProgram,
    bindings: &TextureBindings,
    textures: &Arena<TextureId, TextureSource>,
    targets: &Arena<TargetId, OffscreenTarget>,
) -> Option<wgpu::BindGroup> {
    let mut entries = Vec::with_capacity(program.reflection.textures().len());
    for (name, loc) in program.reflection.textures() {
        let view = bindings.get(loc.unit).and_then(|id| {
            match textures.get(id)? {
                TextureSource::External(view) => Some(view),
                TextureSource::Target(target) => {
                    targets.get(*target).map(|t| &t.color.view)
                }
            }
        });
        let Some(view) = view else {
            log::warn!(
                "'{}' needs texture '{name}' on unit {}, skipping draw",
                program.label,
                loc.unit
            );
            return None;
        };
        entries.push(wgpu::BindGroupEntry {
            binding: loc.unit,
            resource: wgpu::BindingResource::TextureView(view),
        });
    }

    Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} Texture Bind Group", program.label)),
        layout: &program.texture_layout,
        entries: &entries,
    }))
}
