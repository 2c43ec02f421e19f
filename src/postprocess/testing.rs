//! A graphics device that records draws instead of issuing them.

use crate::gpu::device::{DrawCall, GraphicsDevice};
use crate::gpu::reflection::ShaderReflection;
use crate::gpu::resources::{
    Arena, ProgramId, RenderTarget, RenderTargetHandle, TargetId, TextureId,
};
use crate::gpu::shader_composer::{CompiledProgram, ShaderError};
use crate::gpu::uniforms::{TextureBindings, UniformBlock};

/// One recorded draw, with the bound state copied out.
#[derive(Debug, Clone)]
pub struct RecordedDraw {
    pub program: ProgramId,
    pub label: String,
    pub uniforms: UniformBlock,
    pub textures: TextureBindings,
    pub target: RenderTarget,
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    programs: Arena<ProgramId, (String, ShaderReflection)>,
    pub draws: Vec<RecordedDraw>,
    pub programs_built: usize,
    pub released: Vec<ProgramId>,
    pub targets_created: Vec<(RenderTargetHandle, u32, u32)>,
    pub targets_resized: Vec<(RenderTargetHandle, u32, u32)>,
    pub targets_released: Vec<RenderTargetHandle>,
    /// Program labels whose link step fails.
    pub fail_link: Vec<String>,
}

impl RecordingDevice {
    pub fn failing(label: &str) -> Self {
        Self {
            fail_link: vec![label.to_owned()],
            ..Self::default()
        }
    }

    pub fn draw_labels(&self) -> Vec<&str> {
        self.draws.iter().map(|d| d.label.as_str()).collect()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn build_program(
        &mut self,
        program: CompiledProgram,
    ) -> Result<ProgramId, ShaderError> {
        if self.fail_link.contains(&program.label) {
            return Err(ShaderError::Link {
                program: program.label,
                diagnostic: "rejected by test device".to_owned(),
            });
        }
        self.programs_built += 1;
        Ok(self.programs.insert((program.label, program.reflection)))
    }

    fn reflection(&self, program: ProgramId) -> Option<&ShaderReflection> {
        self.programs.get(program).map(|(_, r)| r)
    }

    fn release_program(&mut self, program: ProgramId) {
        if self.programs.remove(program).is_some() {
            self.released.push(program);
        }
    }

    fn create_render_target(
        &mut self,
        _label: &str,
        width: u32,
        height: u32,
    ) -> RenderTargetHandle {
        let index = self.targets_created.len() as u64;
        let handle = RenderTargetHandle {
            target: TargetId(index),
            texture: TextureId(100 + index),
        };
        self.targets_created.push((handle, width, height));
        handle
    }

    fn resize_render_target(
        &mut self,
        target: RenderTargetHandle,
        width: u32,
        height: u32,
    ) {
        self.targets_resized.push((target, width, height));
    }

    fn release_render_target(&mut self, target: RenderTargetHandle) {
        self.targets_released.push(target);
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        let label = self
            .programs
            .get(call.program)
            .map_or_else(|| "<released>".to_owned(), |(l, _)| l.clone());
        self.draws.push(RecordedDraw {
            program: call.program,
            label,
            uniforms: call.uniforms.clone(),
            textures: *call.textures,
            target: call.target,
        });
    }
}
