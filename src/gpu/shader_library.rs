//! Shader source lookup by relative path.
//!
//! Every shader ships embedded in the binary. An override directory can be
//! set so edited files on disk take precedence, which is how shaders are
//! reloaded without a rebuild.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::shader_composer::ShaderError;

/// Passthrough vertex stage shared by every post-process program.
pub const FULLSCREEN_VERTEX_PATH: &str = "postprocess/fullscreen_vs.wgsl";

/// Composable modules, registered with the composer in dependency order.
pub(crate) const SHARED_MODULES: &[(&str, &str)] = &[(
    "modules/fullscreen.wgsl",
    include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
)];

const EMBEDDED: &[(&str, &str)] = &[
    (
        FULLSCREEN_VERTEX_PATH,
        include_str!("../../assets/shaders/postprocess/fullscreen_vs.wgsl"),
    ),
    (
        "postprocess/ssaa.wgsl",
        include_str!("../../assets/shaders/postprocess/ssaa.wgsl"),
    ),
    (
        "postprocess/ss_god_rays.wgsl",
        include_str!("../../assets/shaders/postprocess/ss_god_rays.wgsl"),
    ),
    (
        "clouds/volumetric_clouds.wgsl",
        include_str!("../../assets/shaders/clouds/volumetric_clouds.wgsl"),
    ),
];

/// Source text of one shader stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Relative path the source was resolved from.
    pub path: String,
    /// WGSL text (may contain `#import` / `#ifdef` directives).
    pub text: Cow<'static, str>,
}

/// Resolves relative shader paths to source text.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    override_dir: Option<PathBuf>,
}

impl ShaderLibrary {
    /// Library serving only the embedded sources.
    #[must_use]
    pub fn embedded() -> Self {
        Self::default()
    }

    /// Library that prefers files under `dir`, falling back to the embedded
    /// sources for paths missing there.
    #[must_use]
    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    /// The directory searched before the embedded sources, if any.
    #[must_use]
    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Load the source at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Load`] if the override file exists but cannot
    /// be read, or if no embedded source is registered under `path`.
    pub fn load(&self, path: &str) -> Result<ShaderSource, ShaderError> {
        if let Some(dir) = &self.override_dir {
            let full = dir.join(path);
            if full.is_file() {
                let text = std::fs::read_to_string(&full).map_err(|e| {
                    ShaderError::Load {
                        path: path.to_owned(),
                        message: e.to_string(),
                    }
                })?;
                log::debug!("loaded shader '{path}' from {}", full.display());
                return Ok(ShaderSource {
                    path: path.to_owned(),
                    text: Cow::Owned(text),
                });
            }
        }

        EMBEDDED
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(p, text)| ShaderSource {
                path: (*p).to_owned(),
                text: Cow::Borrowed(*text),
            })
            .ok_or_else(|| ShaderError::Load {
                path: path.to_owned(),
                message: "no shader registered under this path".to_owned(),
            })
    }

    /// Relative paths of every embedded shader.
    pub fn embedded_paths() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(p, _)| *p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_lookup() {
        let lib = ShaderLibrary::embedded();
        let src = lib.load("postprocess/ssaa.wgsl").unwrap();
        assert!(matches!(src.text, Cow::Borrowed(_)));
        assert!(src.text.contains("fs_main"));
    }

    #[test]
    fn unknown_path_is_a_load_error() {
        let err = ShaderLibrary::embedded()
            .load("postprocess/missing.wgsl")
            .unwrap_err();
        assert!(matches!(err, ShaderError::Load { .. }));
    }

    #[test]
    fn override_dir_takes_precedence() {
        let dir = std::env::temp_dir()
            .join(format!("postfx-shader-override-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("postprocess")).unwrap();
        std::fs::write(dir.join("postprocess/ssaa.wgsl"), "// edited").unwrap();

        let lib = ShaderLibrary::with_override_dir(&dir);
        let src = lib.load("postprocess/ssaa.wgsl").unwrap();
        assert_eq!(src.text, "// edited");

        // Paths absent from the override dir still resolve.
        let vs = lib.load(FULLSCREEN_VERTEX_PATH).unwrap();
        assert!(matches!(vs.text, Cow::Borrowed(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
