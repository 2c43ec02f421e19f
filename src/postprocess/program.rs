//! The post-process program: one fullscreen shader stage with its resolved
//! uniforms.
//!
//! Lifecycle is `Uninitialized -> Configured -> Active`. [`initialize`]
//! compiles and links, then runs [`configure_program`] which resolves every
//! named uniform once. [`on_render_object`] binds the frame's values against
//! those locations and draws; it never looks names up again.
//!
//! Cloning a program copies its resolved locations and CPU-side uniform
//! state but shares the GPU program: the [`ProgramId`] is a plain handle,
//! and only [`release`](PostProcessProgram::release) destroys it.
//!
//! [`initialize`]: PostProcessProgram::initialize
//! [`configure_program`]: PostProcessProgram::configure_program
//! [`on_render_object`]: PostProcessProgram::on_render_object

use crate::frame::FrameContext;
use crate::gpu::device::{DrawCall, GraphicsDevice};
use crate::gpu::reflection::{ShaderReflection, TextureLocation, UniformLocation};
use crate::gpu::resources::{ProgramId, RenderTarget, TextureId};
use crate::gpu::shader_composer::{CompiledProgram, ShaderComposer, ShaderError};
use crate::gpu::shader_library::{ShaderLibrary, FULLSCREEN_VERTEX_PATH};
use crate::gpu::uniforms::{TextureBindings, UniformBlock};

use super::god_ray::{self, GodRayLocations};
use super::parameters::ProgramParameters;
use super::ssaa::{self, SsaaLocations};
use super::volumetric_cloud::{self, CloudLocations};

/// Texture unit carrying the previous stage's color output.
pub const INPUT_COLOR_UNIT: u32 = 4;

/// The effects the pipeline knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Supersampling resolve.
    Ssaa,
    /// Screen-space god rays.
    GodRay,
    /// Volumetric clouds.
    VolumetricCloud,
}

impl EffectKind {
    /// Every effect, in declaration order.
    pub const ALL: [Self; 3] = [Self::Ssaa, Self::GodRay, Self::VolumetricCloud];

    /// Registered program name.
    #[must_use]
    pub const fn program_name(self) -> &'static str {
        match self {
            Self::Ssaa => ssaa::PROGRAM_NAME,
            Self::GodRay => god_ray::PROGRAM_NAME,
            Self::VolumetricCloud => volumetric_cloud::PROGRAM_NAME,
        }
    }

    /// Relative path of the fragment stage.
    #[must_use]
    pub const fn fragment_shader(self) -> &'static str {
        match self {
            Self::Ssaa => ssaa::FRAGMENT_SHADER,
            Self::GodRay => god_ray::FRAGMENT_SHADER,
            Self::VolumetricCloud => volumetric_cloud::FRAGMENT_SHADER,
        }
    }

    /// Effect registered under `name`.
    #[must_use]
    pub fn from_program_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.program_name() == name)
    }
}

/// Configuration state of one program instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    /// Not compiled yet (or released).
    Uninitialized,
    /// Compiled, linked and uniform locations resolved.
    Configured,
    /// Has drawn at least once.
    Active,
}

/// Locations every post-process stage binds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseLocations {
    /// `input_color`: previous stage output.
    pub input_color: Option<TextureLocation>,
    /// `resolution`: render size in pixels.
    pub resolution: Option<UniformLocation>,
}

impl BaseLocations {
    fn resolve(reflection: &ShaderReflection) -> Self {
        let input_color = reflection.texture_location("input_color");
        if let Some(l) = input_color.filter(|l| l.unit != INPUT_COLOR_UNIT) {
            log::warn!(
                "input_color is on unit {}, expected {INPUT_COLOR_UNIT}",
                l.unit
            );
        }
        Self {
            input_color,
            resolution: reflection.uniform_location("resolution"),
        }
    }
}

/// Effect-specific resolved locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectLocations {
    /// SSAA uniforms.
    Ssaa(SsaaLocations),
    /// God-ray uniforms.
    GodRay(GodRayLocations),
    /// Cloud uniforms and texture units.
    VolumetricCloud(CloudLocations),
}

impl EffectLocations {
    fn unresolved(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Ssaa => Self::Ssaa(SsaaLocations::default()),
            EffectKind::GodRay => Self::GodRay(GodRayLocations::default()),
            EffectKind::VolumetricCloud => {
                Self::VolumetricCloud(CloudLocations::default())
            }
        }
    }

    fn resolve(kind: EffectKind, reflection: &ShaderReflection) -> Self {
        match kind {
            EffectKind::Ssaa => Self::Ssaa(SsaaLocations::resolve(reflection)),
            EffectKind::GodRay => {
                Self::GodRay(GodRayLocations::resolve(reflection))
            }
            EffectKind::VolumetricCloud => {
                Self::VolumetricCloud(CloudLocations::resolve(reflection))
            }
        }
    }

    fn bind(
        &self,
        uniforms: &mut UniformBlock,
        textures: &mut TextureBindings,
        ctx: &FrameContext<'_>,
    ) {
        match self {
            Self::Ssaa(l) => l.bind(uniforms, ctx),
            Self::GodRay(l) => l.bind(uniforms, ctx),
            Self::VolumetricCloud(l) => l.bind(uniforms, textures, ctx),
        }
    }
}

/// One fullscreen effect stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessProgram {
    name: String,
    kind: EffectKind,
    parameters: ProgramParameters,
    handle: Option<ProgramId>,
    state: ProgramState,
    base: BaseLocations,
    effect: EffectLocations,
    uniforms: UniformBlock,
    textures: TextureBindings,
}

impl PostProcessProgram {
    /// Uninitialized program for `kind` with the given variant flags.
    #[must_use]
    pub fn new(kind: EffectKind, parameters: ProgramParameters) -> Self {
        Self {
            name: kind.program_name().to_owned(),
            kind,
            parameters,
            handle: None,
            state: ProgramState::Uninitialized,
            base: BaseLocations::default(),
            effect: EffectLocations::unresolved(kind),
            uniforms: UniformBlock::default(),
            textures: TextureBindings::default(),
        }
    }

    /// Compile, link and configure. A no-op once initialized.
    ///
    /// # Errors
    ///
    /// Returns the [`ShaderError`] of the failing load, compile or link step;
    /// the program stays `Uninitialized`.
    pub fn initialize(
        &mut self,
        device: &mut dyn GraphicsDevice,
        composer: &mut ShaderComposer,
        library: &ShaderLibrary,
    ) -> Result<(), ShaderError> {
        if self.handle.is_some() {
            return Ok(());
        }
        let compiled = self.compile(composer, library)?;
        self.handle = Some(device.build_program(compiled)?);
        self.configure_program(device);
        log::debug!(
            "initialized '{}' (parameters {:#x})",
            self.name,
            self.parameters.bits()
        );
        Ok(())
    }

    /// Resolve every uniform and texture location from the linked program.
    ///
    /// Names the shader lacks resolve to `None`; binds against them are
    /// no-ops. Safe to call again after a reload; the result depends only on
    /// the linked shader.
    pub fn configure_program(&mut self, device: &dyn GraphicsDevice) {
        let Some(reflection) = self.handle.and_then(|h| device.reflection(h))
        else {
            log::warn!("configure_program on '{}' with no linked program", self.name);
            return;
        };

        self.base = BaseLocations::resolve(reflection);
        self.effect = EffectLocations::resolve(self.kind, reflection);
        let size = reflection.uniform_block_size();
        if self.uniforms.len() != size as usize {
            self.uniforms = UniformBlock::new(size);
        }
        self.textures.clear();
        if self.state == ProgramState::Uninitialized {
            self.state = ProgramState::Configured;
        }
    }

    /// Bind this frame's values and draw `input` into `target`.
    ///
    /// `input` is the object this stage renders: the color texture produced
    /// by the previous stage (or the scene). Texture units are rebound from
    /// `ctx` every call, so an input absent this frame is left unbound.
    /// Returns `false` without drawing if the program is not configured or
    /// its GPU program has been released.
    pub fn on_render_object(
        &mut self,
        device: &mut dyn GraphicsDevice,
        ctx: &FrameContext<'_>,
        input: TextureId,
        target: RenderTarget,
    ) -> bool {
        let Some(program) = self.handle else {
            log::trace!("'{}' rendered before configure, skipped", self.name);
            return false;
        };
        if self.state == ProgramState::Uninitialized {
            log::trace!("'{}' rendered before configure, skipped", self.name);
            return false;
        }
        if device.reflection(program).is_none() {
            log::warn!(
                "'{}' holds released program {program:?}, skipped",
                self.name
            );
            return false;
        }

        self.uniforms
            .set(self.base.resolution, ctx.resolution.as_vec2());
        self.textures.clear();
        self.textures.bind(self.base.input_color, input);
        self.effect
            .bind(&mut self.uniforms, &mut self.textures, ctx);

        device.draw(&DrawCall {
            program,
            uniforms: &self.uniforms,
            textures: &self.textures,
            target,
        });
        self.state = ProgramState::Active;
        true
    }

    /// Recompile from source and re-run [`configure_program`].
    ///
    /// The old GPU program is released only once the new one links, so a
    /// failed reload leaves this instance drawing with the old shader. Other
    /// copies of this program keep the old (now released) handle and skip
    /// their draws until re-created.
    ///
    /// # Errors
    ///
    /// Returns the [`ShaderError`] of the failing step.
    ///
    /// [`configure_program`]: Self::configure_program
    pub fn reload(
        &mut self,
        device: &mut dyn GraphicsDevice,
        composer: &mut ShaderComposer,
        library: &ShaderLibrary,
    ) -> Result<(), ShaderError> {
        let compiled = self.compile(composer, library)?;
        let new_handle = device.build_program(compiled)?;
        if let Some(old) = self.handle.replace(new_handle) {
            device.release_program(old);
        }
        self.configure_program(device);
        log::info!("reloaded '{}'", self.name);
        Ok(())
    }

    /// Destroy the GPU program. Copies sharing it skip their draws from then
    /// on.
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(handle) = self.handle.take() {
            device.release_program(handle);
        }
        self.state = ProgramState::Uninitialized;
    }

    fn compile(
        &self,
        composer: &mut ShaderComposer,
        library: &ShaderLibrary,
    ) -> Result<CompiledProgram, ShaderError> {
        let vertex = library.load(FULLSCREEN_VERTEX_PATH)?;
        let fragment = library.load(self.kind.fragment_shader())?;
        let defines: Vec<&str> = self.parameters.shader_defines().collect();
        composer.compile_program(&self.name, &vertex, &fragment, &defines)
    }

    /// Registered program name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The effect this program runs.
    #[must_use]
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Variant flags the program was compiled with.
    #[must_use]
    pub fn parameters(&self) -> ProgramParameters {
        self.parameters
    }

    /// GPU program handle, shared with copies.
    #[must_use]
    pub fn handle(&self) -> Option<ProgramId> {
        self.handle
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ProgramState {
        self.state
    }

    /// Locations shared by all effects.
    #[must_use]
    pub fn base_locations(&self) -> &BaseLocations {
        &self.base
    }

    /// Effect-specific locations.
    #[must_use]
    pub fn effect_locations(&self) -> &EffectLocations {
        &self.effect
    }

    /// This copy's uniform bytes as last bound.
    #[must_use]
    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    /// This copy's texture units as last bound.
    #[must_use]
    pub fn textures(&self) -> &TextureBindings {
        &self.textures
    }
}

#[cfg(test)]
mod tests {
    use glam::{UVec2, Vec3};

    use super::*;
    use crate::camera::Camera;
    use crate::gpu::resources::TargetId;
    use crate::postprocess::testing::RecordingDevice;
    use crate::settings::RenderSettings;

    fn initialized(
        device: &mut RecordingDevice,
        kind: EffectKind,
    ) -> PostProcessProgram {
        let mut composer = ShaderComposer::new().unwrap();
        let mut program = PostProcessProgram::new(kind, ProgramParameters::NONE);
        program
            .initialize(device, &mut composer, &ShaderLibrary::embedded())
            .unwrap();
        program
    }

    #[test]
    fn initialize_moves_to_configured() {
        let mut device = RecordingDevice::default();
        let program = initialized(&mut device, EffectKind::Ssaa);
        assert_eq!(program.state(), ProgramState::Configured);
        assert!(program.handle().is_some());
        assert!(program.base_locations().input_color.is_some());
        assert!(!program.uniforms().is_empty());
    }

    #[test]
    fn configure_twice_yields_identical_locations() {
        let mut device = RecordingDevice::default();
        let mut program = initialized(&mut device, EffectKind::VolumetricCloud);
        let first = (*program.base_locations(), *program.effect_locations());
        program.configure_program(&device);
        let second = (*program.base_locations(), *program.effect_locations());
        assert_eq!(first, second);
        assert_eq!(program.state(), ProgramState::Configured);
    }

    #[test]
    fn cloud_locations_resolve_on_fixed_units() {
        let mut device = RecordingDevice::default();
        let program = initialized(&mut device, EffectKind::VolumetricCloud);
        let EffectLocations::VolumetricCloud(l) = *program.effect_locations()
        else {
            panic!("wrong effect locations");
        };
        let unit = |t: Option<TextureLocation>| t.unwrap().unit;
        assert_eq!(unit(l.perlin_worley), volumetric_cloud::PERLIN_WORLEY_UNIT);
        assert_eq!(unit(l.worley), volumetric_cloud::WORLEY_UNIT);
        assert_eq!(unit(l.weather), volumetric_cloud::WEATHER_UNIT);
        assert_eq!(unit(l.current_pixel_depth), volumetric_cloud::DEPTH_UNIT);
        assert_eq!(unit(program.base_locations().input_color), INPUT_COLOR_UNIT);
        assert!(l.inv_view.is_some());
        assert!(l.frame.is_some());
        assert!(l.screen_resolution.is_some());
    }

    #[test]
    fn render_before_configure_is_a_no_op() {
        let mut device = RecordingDevice::default();
        let camera = Camera::default();
        let settings = RenderSettings::default();
        let ctx = FrameContext::new(&camera, &settings, UVec2::new(64, 64));

        let mut program =
            PostProcessProgram::new(EffectKind::GodRay, ProgramParameters::NONE);
        assert!(!program.on_render_object(
            &mut device,
            &ctx,
            TextureId(0),
            RenderTarget::Screen
        ));
        assert!(device.draws.is_empty());
        assert_eq!(program.state(), ProgramState::Uninitialized);
    }

    #[test]
    fn copies_share_gpu_program_but_not_uniform_state() {
        let mut device = RecordingDevice::default();
        let mut original = initialized(&mut device, EffectKind::GodRay);
        let mut copy = original.clone();

        assert_eq!(copy.handle(), original.handle());
        assert_eq!(copy.base_locations(), original.base_locations());
        assert_eq!(copy.effect_locations(), original.effect_locations());
        assert_eq!(device.programs_built, 1);

        let camera = Camera::default();
        let settings = RenderSettings::default();
        let mut hot = RenderSettings::default();
        hot.god_rays.exposure = 5.0;

        let ctx = FrameContext::new(&camera, &settings, UVec2::new(64, 64));
        let hot_ctx = FrameContext::new(&camera, &hot, UVec2::new(64, 64));

        assert!(copy.on_render_object(
            &mut device,
            &hot_ctx,
            TextureId(0),
            RenderTarget::Screen
        ));
        assert!(original.on_render_object(
            &mut device,
            &ctx,
            TextureId(0),
            RenderTarget::Offscreen(TargetId(0))
        ));

        let EffectLocations::GodRay(l) = *original.effect_locations() else {
            panic!("wrong effect locations");
        };
        let exposure = l.exposure.unwrap();
        assert_eq!(copy.uniforms().get_f32(exposure), Some(5.0));
        assert_eq!(original.uniforms().get_f32(exposure), Some(0.6));
        assert_eq!(device.draws[1].uniforms.get_f32(exposure), Some(0.6));
    }

    #[test]
    fn god_ray_binds_tunables_even_when_sun_is_behind_camera() {
        let mut device = RecordingDevice::default();
        let mut program = initialized(&mut device, EffectKind::GodRay);

        // Looking at the horizon, tilted slightly up; the sun is straight
        // overhead-down so it projects behind the camera.
        let camera = Camera {
            eye: Vec3::ZERO,
            target: Vec3::new(0.0, 0.1, -1.0),
            ..Camera::default()
        };
        let mut settings = RenderSettings::default();
        settings.lighting.light_direction = [0.0, -1.0, 0.0];
        let ctx = FrameContext::new(&camera, &settings, UVec2::new(128, 72));

        let screen = god_ray::light_screen_position(
            &camera,
            Vec3::new(0.0, -1.0, 0.0),
        );
        assert!(screen.z > 1.0, "projected z = {}", screen.z);

        assert!(program.on_render_object(
            &mut device,
            &ctx,
            TextureId(7),
            RenderTarget::Screen
        ));
        let EffectLocations::GodRay(l) = *program.effect_locations() else {
            panic!("wrong effect locations");
        };
        let block = &device.draws[0].uniforms;
        assert_eq!(block.get_i32(l.only_pass.unwrap()), Some(1));
        let tunables = &settings.god_rays;
        assert_eq!(block.get_f32(l.weight.unwrap()), Some(tunables.weight));
        assert_eq!(block.get_f32(l.decay.unwrap()), Some(tunables.decay));
        assert_eq!(block.get_f32(l.density.unwrap()), Some(tunables.density));
        assert_eq!(block.get_f32(l.exposure.unwrap()), Some(tunables.exposure));
        assert_eq!(device.draws[0].textures.get(INPUT_COLOR_UNIT), Some(TextureId(7)));
        assert_eq!(program.state(), ProgramState::Active);
    }

    #[test]
    fn god_ray_sun_in_view_is_not_guarded() {
        let mut device = RecordingDevice::default();
        let mut program = initialized(&mut device, EffectKind::GodRay);
        let camera = Camera {
            eye: Vec3::ZERO,
            target: Vec3::new(0.0, 0.2, -1.0),
            ..Camera::default()
        };
        let mut settings = RenderSettings::default();
        settings.lighting.light_direction = [0.0, 0.2, -1.0];
        let ctx = FrameContext::new(&camera, &settings, UVec2::new(128, 72));

        assert!(program.on_render_object(
            &mut device,
            &ctx,
            TextureId(0),
            RenderTarget::Screen
        ));
        let EffectLocations::GodRay(l) = *program.effect_locations() else {
            panic!("wrong effect locations");
        };
        let block = &device.draws[0].uniforms;
        assert_eq!(block.get_i32(l.only_pass.unwrap()), Some(0));
        let pos = block.get_vec2(l.light_screen_pos.unwrap()).unwrap();
        assert!((pos.x - 0.5).abs() < 1e-4 && (pos.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn cloud_binds_camera_locked_sphere_and_inputs() {
        use crate::frame::CloudNoise;

        let mut device = RecordingDevice::default();
        let mut program = initialized(&mut device, EffectKind::VolumetricCloud);
        let camera = Camera {
            eye: Vec3::new(10.0, 50.0, -30.0),
            target: Vec3::new(10.0, 50.0, -31.0),
            ..Camera::default()
        };
        let settings = RenderSettings::default();
        let noise = CloudNoise {
            perlin_worley: TextureId(1),
            worley: TextureId(2),
            weather: TextureId(3),
        };
        let mut ctx = FrameContext::new(&camera, &settings, UVec2::new(320, 200))
            .with_depth(TextureId(9))
            .with_noise(noise);
        ctx.frame = 42;

        assert!(program.on_render_object(
            &mut device,
            &ctx,
            TextureId(5),
            RenderTarget::Screen
        ));
        let EffectLocations::VolumetricCloud(l) = *program.effect_locations()
        else {
            panic!("wrong effect locations");
        };
        let draw = &device.draws[0];
        let block = &draw.uniforms;
        assert_eq!(
            block.get_vec3(l.sphere_center.unwrap()),
            Some(Vec3::new(10.0, settings.clouds.sphere_y_offset, -30.0))
        );
        assert_eq!(block.get_vec3(l.cam_pos.unwrap()), Some(camera.eye));
        assert_eq!(block.get_i32(l.frame.unwrap()), Some(42));
        let light_dir = block.get_vec3(l.light_dir.unwrap()).unwrap();
        assert!((light_dir.length() - 1.0).abs() < 1e-5);
        assert_eq!(
            block.get_vec2(l.screen_resolution.unwrap()),
            Some(glam::Vec2::new(320.0, 200.0))
        );
        assert_eq!(block.get_f32(l.fov.unwrap()), Some(camera.fovy));

        let t = &draw.textures;
        assert_eq!(t.get(volumetric_cloud::PERLIN_WORLEY_UNIT), Some(TextureId(1)));
        assert_eq!(t.get(volumetric_cloud::WORLEY_UNIT), Some(TextureId(2)));
        assert_eq!(t.get(volumetric_cloud::WEATHER_UNIT), Some(TextureId(3)));
        assert_eq!(t.get(volumetric_cloud::DEPTH_UNIT), Some(TextureId(9)));
        assert_eq!(t.get(INPUT_COLOR_UNIT), Some(TextureId(5)));
    }

    #[test]
    fn ssaa_binds_texel_size() {
        let mut device = RecordingDevice::default();
        let mut program = initialized(&mut device, EffectKind::Ssaa);
        let camera = Camera::default();
        let settings = RenderSettings::default();
        let ctx = FrameContext::new(&camera, &settings, UVec2::new(200, 100));
        assert!(program.on_render_object(
            &mut device,
            &ctx,
            TextureId(0),
            RenderTarget::Screen
        ));
        let EffectLocations::Ssaa(l) = *program.effect_locations() else {
            panic!("wrong effect locations");
        };
        assert_eq!(
            device.draws[0].uniforms.get_vec2(l.texel_size.unwrap()),
            Some(glam::Vec2::new(0.005, 0.01))
        );
    }

    #[test]
    fn release_returns_to_uninitialized() {
        let mut device = RecordingDevice::default();
        let mut program = initialized(&mut device, EffectKind::Ssaa);
        let handle = program.handle().unwrap();
        program.release(&mut device);
        assert_eq!(program.state(), ProgramState::Uninitialized);
        assert!(program.handle().is_none());
        assert_eq!(device.released, vec![handle]);
    }

    #[test]
    fn copy_of_released_program_never_draws_reused_slot() {
        let mut device = RecordingDevice::default();
        let mut original = initialized(&mut device, EffectKind::Ssaa);
        let mut copy = original.clone();
        original.release(&mut device);
        let cloud = initialized(&mut device, EffectKind::VolumetricCloud);
        assert_ne!(cloud.handle(), copy.handle());

        let camera = Camera::default();
        let settings = RenderSettings::default();
        let ctx = FrameContext::new(&camera, &settings, UVec2::new(64, 64));
        assert!(!copy.on_render_object(
            &mut device,
            &ctx,
            TextureId(0),
            RenderTarget::Screen
        ));
        assert!(device.draws.is_empty());
    }

    #[test]
    fn cloud_inputs_are_not_carried_between_frames() {
        use crate::frame::CloudNoise;

        let mut device = RecordingDevice::default();
        let mut program = initialized(&mut device, EffectKind::VolumetricCloud);
        let camera = Camera::default();
        let settings = RenderSettings::default();
        let noise = CloudNoise {
            perlin_worley: TextureId(1),
            worley: TextureId(2),
            weather: TextureId(3),
        };
        let first = FrameContext::new(&camera, &settings, UVec2::new(64, 64))
            .with_depth(TextureId(9))
            .with_noise(noise);
        assert!(program.on_render_object(
            &mut device,
            &first,
            TextureId(5),
            RenderTarget::Screen
        ));

        let second = FrameContext::new(&camera, &settings, UVec2::new(64, 64));
        assert!(program.on_render_object(
            &mut device,
            &second,
            TextureId(6),
            RenderTarget::Screen
        ));

        let t = &device.draws[1].textures;
        assert_eq!(t.get(volumetric_cloud::DEPTH_UNIT), None);
        assert_eq!(t.get(volumetric_cloud::PERLIN_WORLEY_UNIT), None);
        assert_eq!(t.get(volumetric_cloud::WORLEY_UNIT), None);
        assert_eq!(t.get(volumetric_cloud::WEATHER_UNIT), None);
        assert_eq!(t.get(INPUT_COLOR_UNIT), Some(TextureId(6)));
        assert_eq!(
            device.draws[0].textures.get(volumetric_cloud::DEPTH_UNIT),
            Some(TextureId(9))
        );
    }

    #[test]
    fn effect_kind_names_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_program_name(kind.program_name()), Some(kind));
        }
        assert_eq!(EffectKind::from_program_name("FxaaProgram"), None);
    }
}
