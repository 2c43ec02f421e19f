//! Program factories and the registry that caches what they build.
//!
//! Each effect has one factory, keyed by its program name. The registry owns
//! the shader composer and library, and caches one initialized program per
//! `(name, parameters)`. A cache hit hands out a copy: the copy shares the
//! GPU program and owns its own uniform state.

use rustc_hash::FxHashMap;

use crate::error::PostFxError;
use crate::gpu::device::GraphicsDevice;
use crate::gpu::shader_composer::{ShaderComposer, ShaderError};
use crate::gpu::shader_library::ShaderLibrary;

use super::parameters::ProgramParameters;
use super::program::{EffectKind, PostProcessProgram};

/// Builds initialized programs of one effect.
pub trait ProgramFactory {
    /// The effect this factory builds.
    fn kind(&self) -> EffectKind;

    /// Name the factory is registered under.
    fn program_name(&self) -> &'static str {
        self.kind().program_name()
    }

    /// Construct, compile, link and configure a new program.
    ///
    /// # Errors
    ///
    /// Returns the [`ShaderError`] of the failing build step.
    fn create_program(
        &self,
        parameters: ProgramParameters,
        device: &mut dyn GraphicsDevice,
        composer: &mut ShaderComposer,
        library: &ShaderLibrary,
    ) -> Result<PostProcessProgram, ShaderError> {
        let mut program = PostProcessProgram::new(self.kind(), parameters);
        program.initialize(device, composer, library)?;
        Ok(program)
    }
}

macro_rules! effect_factory {
    ($(#[$doc:meta])* $name:ident => $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl ProgramFactory for $name {
            fn kind(&self) -> EffectKind {
                $kind
            }
        }
    };
}

effect_factory!(
    /// Builds [`EffectKind::Ssaa`] programs.
    SsaaProgramFactory => EffectKind::Ssaa
);
effect_factory!(
    /// Builds [`EffectKind::GodRay`] programs.
    GodRayProgramFactory => EffectKind::GodRay
);
effect_factory!(
    /// Builds [`EffectKind::VolumetricCloud`] programs.
    VolumetricCloudProgramFactory => EffectKind::VolumetricCloud
);

type CacheKey = (&'static str, ProgramParameters);

/// Name-keyed factories plus a cache of built programs.
pub struct ProgramRegistry {
    factories: FxHashMap<&'static str, Box<dyn ProgramFactory>>,
    cache: FxHashMap<CacheKey, PostProcessProgram>,
    composer: ShaderComposer,
    library: ShaderLibrary,
}

impl ProgramRegistry {
    /// Empty registry over `library`.
    ///
    /// # Errors
    ///
    /// Returns [`PostFxError::Shader`] if the shared shader modules fail to
    /// register.
    pub fn new(library: ShaderLibrary) -> Result<Self, PostFxError> {
        Ok(Self {
            factories: FxHashMap::default(),
            cache: FxHashMap::default(),
            composer: ShaderComposer::new()?,
            library,
        })
    }

    /// Registry with the SSAA, god-ray and volumetric-cloud factories.
    ///
    /// # Errors
    ///
    /// See [`ProgramRegistry::new`].
    pub fn with_default_factories(
        library: ShaderLibrary,
    ) -> Result<Self, PostFxError> {
        let mut registry = Self::new(library)?;
        registry.register(SsaaProgramFactory);
        registry.register(GodRayProgramFactory);
        registry.register(VolumetricCloudProgramFactory);
        Ok(registry)
    }

    /// Add a factory, replacing any registered under the same name.
    pub fn register(&mut self, factory: impl ProgramFactory + 'static) {
        let name = factory.program_name();
        if self.factories.insert(name, Box::new(factory)).is_some() {
            log::debug!("replaced factory for '{name}'");
        }
    }

    /// Whether a factory is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// A program for `name` built with `parameters`.
    ///
    /// The first request builds and caches the program; later requests
    /// return a copy sharing the cached GPU program.
    ///
    /// # Errors
    ///
    /// [`PostFxError::UnknownProgram`] for an unregistered name, or
    /// [`PostFxError::Shader`] if the build fails. Failures are not cached.
    pub fn create_program(
        &mut self,
        name: &str,
        parameters: ProgramParameters,
        device: &mut dyn GraphicsDevice,
    ) -> Result<PostProcessProgram, PostFxError> {
        let Some((&key_name, factory)) = self.factories.get_key_value(name)
        else {
            return Err(PostFxError::UnknownProgram(name.to_owned()));
        };
        let key = (key_name, parameters);
        if let Some(program) = self.cache.get(&key) {
            return Ok(program.clone());
        }

        let program = factory.create_program(
            parameters,
            device,
            &mut self.composer,
            &self.library,
        )?;
        let _ = self.cache.insert(key, program.clone());
        Ok(program)
    }

    /// Drop and release the cached program for `(name, parameters)`.
    ///
    /// Copies already handed out keep the released handle and skip their
    /// draws until replaced.
    pub fn invalidate(
        &mut self,
        name: &str,
        parameters: ProgramParameters,
        device: &mut dyn GraphicsDevice,
    ) -> bool {
        let Some(&key_name) = self.factories.get_key_value(name).map(|(k, _)| k)
        else {
            return false;
        };
        match self.cache.remove(&(key_name, parameters)) {
            Some(mut program) => {
                program.release(device);
                true
            }
            None => false,
        }
    }

    /// Recompile every cached program from the library.
    ///
    /// Returns the programs that failed; those keep their previous shader.
    pub fn reload_all(
        &mut self,
        device: &mut dyn GraphicsDevice,
    ) -> Vec<(String, ShaderError)> {
        let mut failed = Vec::new();
        for program in self.cache.values_mut() {
            if let Err(e) =
                program.reload(device, &mut self.composer, &self.library)
            {
                log::error!("reload of '{}' failed: {e}", program.name());
                failed.push((program.name().to_owned(), e));
            }
        }
        failed
    }

    /// The cached program for `(name, parameters)`, if built.
    #[must_use]
    pub fn cached(
        &self,
        name: &str,
        parameters: ProgramParameters,
    ) -> Option<&PostProcessProgram> {
        let (&key_name, _) = self.factories.get_key_value(name)?;
        self.cache.get(&(key_name, parameters))
    }

    /// Number of cached programs.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Release every cached program.
    pub fn release_all(&mut self, device: &mut dyn GraphicsDevice) {
        for (_, mut program) in self.cache.drain() {
            program.release(device);
        }
    }

    /// Shader sources the registry compiles from.
    #[must_use]
    pub fn library(&self) -> &ShaderLibrary {
        &self.library
    }

    /// Point the registry at a different shader library. Cached programs
    /// pick it up on the next [`reload_all`](Self::reload_all).
    pub fn set_library(&mut self, library: ShaderLibrary) {
        self.library = library;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess::testing::RecordingDevice;
    use crate::postprocess::{god_ray, ssaa};

    fn registry() -> ProgramRegistry {
        ProgramRegistry::with_default_factories(ShaderLibrary::embedded())
            .unwrap()
    }

    #[test]
    fn default_factories_are_registered() {
        let registry = registry();
        for kind in EffectKind::ALL {
            assert!(registry.contains(kind.program_name()));
        }
    }

    #[test]
    fn cache_hit_returns_copy_sharing_gpu_program() {
        let mut device = RecordingDevice::default();
        let mut registry = registry();
        let a = registry
            .create_program(god_ray::PROGRAM_NAME, ProgramParameters::NONE, &mut device)
            .unwrap();
        let b = registry
            .create_program(god_ray::PROGRAM_NAME, ProgramParameters::NONE, &mut device)
            .unwrap();
        assert_eq!(a.handle(), b.handle());
        assert_eq!(device.programs_built, 1);
        assert_eq!(registry.cached_len(), 1);
    }

    #[test]
    fn parameters_select_distinct_programs() {
        let mut device = RecordingDevice::default();
        let mut registry = registry();
        let plain = registry
            .create_program(ssaa::PROGRAM_NAME, ProgramParameters::NONE, &mut device)
            .unwrap();
        let debug = registry
            .create_program(
                ssaa::PROGRAM_NAME,
                ProgramParameters::DEBUG_VIEW,
                &mut device,
            )
            .unwrap();
        assert_ne!(plain.handle(), debug.handle());
        assert_eq!(debug.parameters(), ProgramParameters::DEBUG_VIEW);
        assert_eq!(device.programs_built, 2);
    }

    #[test]
    fn unknown_name_is_reported() {
        let mut device = RecordingDevice::default();
        let mut registry = registry();
        let err = registry
            .create_program("FxaaProgram", ProgramParameters::NONE, &mut device)
            .unwrap_err();
        assert!(matches!(err, PostFxError::UnknownProgram(ref n) if n == "FxaaProgram"));
    }

    #[test]
    fn failed_build_is_not_cached() {
        let mut device = RecordingDevice::failing(god_ray::PROGRAM_NAME);
        let mut registry = registry();
        let err = registry
            .create_program(god_ray::PROGRAM_NAME, ProgramParameters::NONE, &mut device)
            .unwrap_err();
        assert!(matches!(err, PostFxError::Shader(ShaderError::Link { .. })));
        assert_eq!(registry.cached_len(), 0);
    }

    #[test]
    fn invalidate_releases_cached_program() {
        let mut device = RecordingDevice::default();
        let mut registry = registry();
        let program = registry
            .create_program(ssaa::PROGRAM_NAME, ProgramParameters::NONE, &mut device)
            .unwrap();
        assert!(registry.invalidate(ssaa::PROGRAM_NAME, ProgramParameters::NONE, &mut device));
        assert_eq!(device.released, vec![program.handle().unwrap()]);
        assert!(!registry.invalidate(ssaa::PROGRAM_NAME, ProgramParameters::NONE, &mut device));

        let rebuilt = registry
            .create_program(ssaa::PROGRAM_NAME, ProgramParameters::NONE, &mut device)
            .unwrap();
        assert_eq!(device.programs_built, 2);
        assert!(rebuilt.handle().is_some());
    }

    #[test]
    fn reload_replaces_handle_and_release_all_empties_cache() {
        let mut device = RecordingDevice::default();
        let mut registry = registry();
        let before = registry
            .create_program(god_ray::PROGRAM_NAME, ProgramParameters::NONE, &mut device)
            .unwrap();
        assert!(registry.reload_all(&mut device).is_empty());
        let after = registry
            .cached(god_ray::PROGRAM_NAME, ProgramParameters::NONE)
            .unwrap();
        assert_ne!(after.handle(), before.handle());
        assert_eq!(after.effect_locations(), before.effect_locations());
        assert_eq!(device.live_programs(), 1);

        registry.release_all(&mut device);
        assert_eq!(registry.cached_len(), 0);
        assert_eq!(device.live_programs(), 0);
    }
}
