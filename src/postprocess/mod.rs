//! Post-processing effect programs and the pipeline that chains them.
//!
//! Provides supersampling resolve (SSAA), screen-space god rays, and
//! ray-marched volumetric clouds, each built through a [`ProgramFactory`]
//! and walked in order by the [`PostProcessPipeline`].

pub mod factory;
pub mod god_ray;
pub mod parameters;
pub mod pipeline;
pub mod program;
pub mod ssaa;
pub mod volumetric_cloud;

#[cfg(test)]
pub(crate) mod testing;

pub use factory::{
    GodRayProgramFactory, ProgramFactory, ProgramRegistry, SsaaProgramFactory,
    VolumetricCloudProgramFactory,
};
pub use parameters::ProgramParameters;
pub use pipeline::{FrameReport, PostProcessPipeline, Stage};
pub use program::{EffectKind, PostProcessProgram, ProgramState};
