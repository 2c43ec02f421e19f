//! The graphics context every post-process stage draws through.
//!
//! The device is single-threaded and not reentrant: one draw is fully
//! described by a [`DrawCall`] (program, uniform bytes, texture units,
//! target) and executes before the next is issued.

use super::reflection::ShaderReflection;
use super::resources::{ProgramId, RenderTarget, RenderTargetHandle};
use super::shader_composer::{CompiledProgram, ShaderError};
use super::uniforms::{TextureBindings, UniformBlock};

/// One fullscreen draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Program to draw with.
    pub program: ProgramId,
    /// Uniform bytes, laid out per the program's reflection.
    pub uniforms: &'a UniformBlock,
    /// Textures bound to the program's texture units.
    pub textures: &'a TextureBindings,
    /// Where the draw writes.
    pub target: RenderTarget,
}

/// GPU context consumed by programs and the pipeline.
pub trait GraphicsDevice {
    /// Create the GPU program for already-compiled stages.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Link`] if the device rejects the program.
    fn build_program(
        &mut self,
        program: CompiledProgram,
    ) -> Result<ProgramId, ShaderError>;

    /// Reflected bindings of a live program.
    fn reflection(&self, program: ProgramId) -> Option<&ShaderReflection>;

    /// Destroy a program. The id is retired: [`reflection`](Self::reflection)
    /// returns `None` for it from then on, even once a later program reuses
    /// its slot.
    fn release_program(&mut self, program: ProgramId);

    /// Create an offscreen color target of the given size.
    fn create_render_target(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
    ) -> RenderTargetHandle;

    /// Recreate a target's storage at a new size, keeping its handles.
    fn resize_render_target(
        &mut self,
        target: RenderTargetHandle,
        width: u32,
        height: u32,
    );

    /// Destroy an offscreen target.
    fn release_render_target(&mut self, target: RenderTargetHandle);

    /// Execute one fullscreen draw.
    fn draw(&mut self, call: &DrawCall<'_>);
}
