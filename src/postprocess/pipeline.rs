//! The post-process pipeline: an ordered list of stages walked once per
//! frame.
//!
//! Stages ping-pong between two offscreen targets; the last active stage
//! writes the screen. The stage list is fixed at construction. Disabling a
//! stage takes it out of the walk but keeps its program, and a stage whose
//! program failed to build stays in the list, recorded and skipped.

use glam::UVec2;

use crate::error::PostFxError;
use crate::frame::FrameContext;
use crate::gpu::device::GraphicsDevice;
use crate::gpu::resources::{RenderTarget, RenderTargetHandle, TextureId};
use crate::settings::PipelineSettings;

use super::factory::ProgramRegistry;
use super::parameters::ProgramParameters;
use super::program::PostProcessProgram;

/// One entry in the pipeline's stage list.
#[derive(Debug)]
pub struct Stage {
    name: String,
    parameters: ProgramParameters,
    enabled: bool,
    program: Option<PostProcessProgram>,
    error: Option<PostFxError>,
}

impl Stage {
    /// Registered program name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant flags.
    #[must_use]
    pub fn parameters(&self) -> ProgramParameters {
        self.parameters
    }

    /// Whether the stage is toggled on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the stage takes part in the frame walk.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.program.is_some()
    }

    /// The stage's program, if it built.
    #[must_use]
    pub fn program(&self) -> Option<&PostProcessProgram> {
        self.program.as_ref()
    }

    /// Why the program failed to build, if it did.
    #[must_use]
    pub fn error(&self) -> Option<&PostFxError> {
        self.error.as_ref()
    }
}

/// What one [`PostProcessPipeline::render_frame`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Stages that drew.
    pub stages_run: usize,
    /// Whether the last stage wrote the screen. When `false` the caller
    /// presents the scene color itself.
    pub presented: bool,
}

/// Ordered post-process stages plus the ping-pong targets between them.
pub struct PostProcessPipeline {
    registry: ProgramRegistry,
    stages: Vec<Stage>,
    targets: Option<[RenderTargetHandle; 2]>,
    size: UVec2,
}

impl PostProcessPipeline {
    /// Empty pipeline building programs through `registry`.
    #[must_use]
    pub fn new(registry: ProgramRegistry) -> Self {
        Self {
            registry,
            stages: Vec::new(),
            targets: None,
            size: UVec2::ZERO,
        }
    }

    /// Pipeline with the stage list from `settings`, in order.
    ///
    /// Stages that fail to build are kept and reported by
    /// [`failed_stages`](Self::failed_stages).
    pub fn from_settings(
        registry: ProgramRegistry,
        settings: &PipelineSettings,
        device: &mut dyn GraphicsDevice,
    ) -> Self {
        let mut pipeline = Self::new(registry);
        for stage in &settings.stages {
            let index = pipeline.add_stage(
                &stage.program,
                ProgramParameters(stage.parameters),
                device,
            );
            pipeline.stages[index].enabled = stage.enabled;
        }
        pipeline
    }

    /// Append a stage and build its program. Returns the stage index.
    ///
    /// A build failure is logged and recorded on the stage; the stage is
    /// then skipped by every frame.
    pub fn add_stage(
        &mut self,
        name: &str,
        parameters: ProgramParameters,
        device: &mut dyn GraphicsDevice,
    ) -> usize {
        let (program, error) =
            match self.registry.create_program(name, parameters, device) {
                Ok(program) => (Some(program), None),
                Err(e) => {
                    log::error!("post-process stage '{name}' disabled: {e}");
                    (None, Some(e))
                }
            };
        self.stages.push(Stage {
            name: name.to_owned(),
            parameters,
            enabled: true,
            program,
            error,
        });
        self.stages.len() - 1
    }

    /// Allocate the ping-pong targets for a `width` x `height` output.
    /// Calling again resizes them.
    pub fn configure(
        &mut self,
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
    ) {
        let (width, height) = (width.max(1), height.max(1));
        if self.targets.is_some() {
            self.resize(device, width, height);
            return;
        }
        self.targets = Some([
            device.create_render_target("postfx ping", width, height),
            device.create_render_target("postfx pong", width, height),
        ]);
        self.size = UVec2::new(width, height);
        log::debug!("post-process targets configured at {width}x{height}");
    }

    /// Recreate the ping-pong targets at a new size. Zero sizes and
    /// unchanged sizes are ignored.
    pub fn resize(
        &mut self,
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
    ) {
        let Some(targets) = self.targets else {
            return;
        };
        let size = UVec2::new(width, height);
        if width == 0 || height == 0 || size == self.size {
            return;
        }
        for target in targets {
            device.resize_render_target(target, width, height);
        }
        self.size = size;
    }

    /// Walk the active stages once.
    ///
    /// `scene_color` is the first stage's input. Each stage but the last
    /// draws into the ping-pong target the previous stage did not write; the
    /// last draws the screen. Before [`configure`](Self::configure) this
    /// draws nothing.
    pub fn render_frame(
        &mut self,
        device: &mut dyn GraphicsDevice,
        ctx: &FrameContext<'_>,
        scene_color: TextureId,
    ) -> FrameReport {
        let Some(targets) = self.targets else {
            log::trace!("render_frame before configure, skipped");
            return FrameReport::default();
        };
        let Some(last) = self.stages.iter().rposition(Stage::is_active) else {
            return FrameReport::default();
        };

        let mut input = scene_color;
        let mut next = 0;
        let mut report = FrameReport::default();
        for (index, stage) in self.stages[..=last].iter_mut().enumerate() {
            if !stage.enabled {
                continue;
            }
            let Some(program) = stage.program.as_mut() else {
                continue;
            };
            let (target, output) = if index == last {
                (RenderTarget::Screen, None)
            } else {
                let handle = targets[next];
                (RenderTarget::Offscreen(handle.target), Some(handle.texture))
            };
            if program.on_render_object(device, ctx, input, target) {
                report.stages_run += 1;
                report.presented |= index == last;
                if let Some(output) = output {
                    input = output;
                    next ^= 1;
                }
            }
        }
        report
    }

    /// Toggle the stage at `index`. Returns `false` for an unknown index.
    pub fn set_stage_enabled(&mut self, index: usize, enabled: bool) -> bool {
        let Some(stage) = self.stages.get_mut(index) else {
            return false;
        };
        if stage.enabled != enabled {
            log::info!(
                "post-process stage '{}' {}",
                stage.name,
                if enabled { "enabled" } else { "disabled" }
            );
        }
        stage.enabled = enabled;
        true
    }

    /// Rebuild the stage at `index` with new variant flags.
    ///
    /// Returns `false` if the index is unknown or the rebuild failed. A
    /// failure is recorded on the stage, which is then skipped until a later
    /// rebuild succeeds. The previous variant is invalidated in the registry
    /// once no stage uses it.
    pub fn set_stage_parameters(
        &mut self,
        index: usize,
        parameters: ProgramParameters,
        device: &mut dyn GraphicsDevice,
    ) -> bool {
        let Some(stage) = self.stages.get_mut(index) else {
            return false;
        };
        if stage.parameters == parameters && stage.program.is_some() {
            return true;
        }
        let previous = std::mem::replace(&mut stage.parameters, parameters);
        let rebuilt =
            match self.registry.create_program(&stage.name, parameters, device) {
                Ok(program) => {
                    stage.program = Some(program);
                    stage.error = None;
                    log::info!(
                        "post-process stage '{}' parameters {:#x}",
                        stage.name,
                        parameters.bits()
                    );
                    true
                }
                Err(e) => {
                    log::error!(
                        "post-process stage '{}' disabled: {e}",
                        stage.name
                    );
                    stage.program = None;
                    stage.error = Some(e);
                    false
                }
            };

        let name = stage.name.clone();
        let still_used = self
            .stages
            .iter()
            .any(|s| s.name == name && s.parameters == previous);
        if previous != parameters
            && !still_used
            && self.registry.invalidate(&name, previous, device)
        {
            log::debug!(
                "released unused '{name}' variant {:#x}",
                previous.bits()
            );
        }
        rebuilt
    }

    /// Index of the first stage running `name`.
    #[must_use]
    pub fn stage_index(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name == name)
    }

    /// Names of the stages the next frame will walk, in order.
    #[must_use]
    pub fn stage_order(&self) -> Vec<&str> {
        self.stages
            .iter()
            .filter(|s| s.is_active())
            .map(Stage::name)
            .collect()
    }

    /// Every stage, in order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stages whose program failed to build, with the reason.
    pub fn failed_stages(
        &self,
    ) -> impl Iterator<Item = (&str, &PostFxError)> + '_ {
        self.stages
            .iter()
            .filter_map(|s| Some((s.name.as_str(), s.error.as_ref()?)))
    }

    /// Recompile every program from the shader library, then refresh each
    /// stage's copy.
    ///
    /// Stages with no cached program (a failed first build, or a variant
    /// invalidated in the registry) are built again from the current
    /// sources, and their recorded error is replaced by the outcome.
    /// Returns the number of reloads and rebuilds that failed; a failed
    /// reload keeps the previous shader.
    pub fn reload_shaders(&mut self, device: &mut dyn GraphicsDevice) -> usize {
        let mut failed = self.registry.reload_all(device).len();
        for stage in &mut self.stages {
            if let Some(program) =
                self.registry.cached(&stage.name, stage.parameters)
            {
                stage.program = Some(program.clone());
                stage.error = None;
                continue;
            }
            match self.registry.create_program(
                &stage.name,
                stage.parameters,
                device,
            ) {
                Ok(program) => {
                    log::info!("post-process stage '{}' rebuilt", stage.name);
                    stage.program = Some(program);
                    stage.error = None;
                }
                Err(e) => {
                    log::error!(
                        "post-process stage '{}' still disabled: {e}",
                        stage.name
                    );
                    stage.program = None;
                    stage.error = Some(e);
                    failed += 1;
                }
            }
        }
        failed
    }

    /// Current output size.
    #[must_use]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// The registry programs are built through.
    pub fn registry_mut(&mut self) -> &mut ProgramRegistry {
        &mut self.registry
    }

    /// Release every program and both ping-pong targets.
    pub fn shutdown(&mut self, device: &mut dyn GraphicsDevice) {
        for stage in &mut self.stages {
            stage.program = None;
        }
        self.registry.release_all(device);
        if let Some(targets) = self.targets.take() {
            for target in targets {
                device.release_render_target(target);
            }
        }
        log::debug!("post-process pipeline shut down");
    }
}
