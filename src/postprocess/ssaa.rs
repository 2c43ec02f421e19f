//! Supersampling resolve.

use crate::frame::FrameContext;
use crate::gpu::reflection::{ShaderReflection, UniformLocation};
use crate::gpu::uniforms::UniformBlock;

/// Registered program name.
pub const PROGRAM_NAME: &str = "SSAAProgram";
/// Fragment stage source.
pub const FRAGMENT_SHADER: &str = "postprocess/ssaa.wgsl";

/// Resolved uniforms of the SSAA stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SsaaLocations {
    /// `texel_size`: one output pixel in UV units.
    pub texel_size: Option<UniformLocation>,
}

impl SsaaLocations {
    /// Look up every uniform this stage binds.
    #[must_use]
    pub fn resolve(reflection: &ShaderReflection) -> Self {
        Self {
            texel_size: reflection.uniform_location("texel_size"),
        }
    }

    /// Write this frame's values.
    pub fn bind(&self, uniforms: &mut UniformBlock, ctx: &FrameContext<'_>) {
        uniforms.set(self.texel_size, ctx.texel_size());
    }
}
