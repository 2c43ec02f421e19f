//! WGSL composition and link checking for post-process programs.
//!
//! Shared modules are registered once with a naga_oil [`Composer`]; each
//! program's vertex and fragment stages are then composed with the
//! variant's defines and checked for matching entry points and `@location`
//! coverage before any GPU pipeline is built.

use std::fmt;

use naga::{Binding, Handle, ShaderStage, Type, TypeInner};
use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderDefValue, ShaderLanguage, ShaderType,
};

use super::reflection::ShaderReflection;
use super::shader_library::{ShaderSource, SHARED_MODULES};

/// Entry point of the vertex stage.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point of the fragment stage.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Failure to turn shader sources into a usable program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The source file could not be found or read.
    Load {
        /// Relative shader path.
        path: String,
        /// Reason the load failed.
        message: String,
    },
    /// A stage failed to parse, compose or validate.
    Compile {
        /// Relative shader path.
        path: String,
        /// Compiler diagnostic text.
        diagnostic: String,
    },
    /// The stages compiled but do not form a valid program.
    Link {
        /// Program label.
        program: String,
        /// Linker diagnostic text.
        diagnostic: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, message } => {
                write!(f, "failed to load shader '{path}': {message}")
            }
            Self::Compile { path, diagnostic } => {
                write!(f, "failed to compile shader '{path}':\n{diagnostic}")
            }
            Self::Link {
                program,
                diagnostic,
            } => {
                write!(f, "failed to link program '{program}': {diagnostic}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// Compiled vertex + fragment IR of one program, plus the fragment stage's
/// reflected bindings.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    /// Program label used for GPU object names and diagnostics.
    pub label: String,
    /// Vertex stage IR.
    pub vertex: naga::Module,
    /// Fragment stage IR.
    pub fragment: naga::Module,
    /// Uniform/texture layout of the fragment stage.
    pub reflection: ShaderReflection,
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import postfx::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, so programs can be compiled and
/// reflected without a GPU device.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Create a composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Compile`] if a shared module fails to register.
    pub fn new() -> Result<Self, ShaderError> {
        let mut composer = Composer::default();

        for (file_path, source) in SHARED_MODULES {
            let registered = composer.add_composable_module(
                ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                },
            );
            if let Err(e) = registered.map(|_| ()) {
                return Err(ShaderError::Compile {
                    path: (*file_path).to_owned(),
                    diagnostic: e.emit_to_string(&composer),
                });
            }
        }

        Ok(Self { composer })
    }

    /// Compile both stages with the given shader defines, then link them.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Compile`] if either stage fails to compose or
    /// validate, and [`ShaderError::Link`] if the entry points or the
    /// stage interface do not match.
    pub fn compile_program(
        &mut self,
        label: &str,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
        defines: &[&str],
    ) -> Result<CompiledProgram, ShaderError> {
        let vertex_module = self.compose_naga(vertex, defines)?;
        let fragment_module = self.compose_naga(fragment, defines)?;
        link(label, &vertex_module, &fragment_module)?;
        let reflection = ShaderReflection::from_module(&fragment_module);

        Ok(CompiledProgram {
            label: label.to_owned(),
            vertex: vertex_module,
            fragment: fragment_module,
            reflection,
        })
    }

    /// Compose one stage into a `naga::Module` without creating a wgpu
    /// shader module.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Compile`] carrying the composer diagnostic.
    pub fn compose_naga(
        &mut self,
        source: &ShaderSource,
        defines: &[&str],
    ) -> Result<naga::Module, ShaderError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: &source.text,
                file_path: &source.path,
                shader_type: ShaderType::Wgsl,
                shader_defs: defines
                    .iter()
                    .map(|d| ((*d).to_owned(), ShaderDefValue::Bool(true)))
                    .collect(),
                ..Default::default()
            })
            .map_err(|e| ShaderError::Compile {
                path: source.path.clone(),
                diagnostic: e.emit_to_string(&self.composer),
            })
    }
}

fn link(
    label: &str,
    vertex: &naga::Module,
    fragment: &naga::Module,
) -> Result<(), ShaderError> {
    let link_error = |diagnostic: String| ShaderError::Link {
        program: label.to_owned(),
        diagnostic,
    };

    let vs = vertex
        .entry_points
        .iter()
        .find(|ep| ep.name == VERTEX_ENTRY && ep.stage == ShaderStage::Vertex)
        .ok_or_else(|| {
            link_error(format!("no vertex entry point `{VERTEX_ENTRY}`"))
        })?;
    let fs = fragment
        .entry_points
        .iter()
        .find(|ep| {
            ep.name == FRAGMENT_ENTRY && ep.stage == ShaderStage::Fragment
        })
        .ok_or_else(|| {
            link_error(format!("no fragment entry point `{FRAGMENT_ENTRY}`"))
        })?;

    let outputs = vs.function.result.as_ref().map_or_else(Vec::new, |r| {
        locations(vertex, r.ty, r.binding.as_ref())
    });

    for arg in &fs.function.arguments {
        for location in locations(fragment, arg.ty, arg.binding.as_ref()) {
            if !outputs.contains(&location) {
                return Err(link_error(format!(
                    "fragment input @location({location}) is not written by \
                     the vertex stage"
                )));
            }
        }
    }
    Ok(())
}

/// User-defined IO locations carried by a value of type `ty`.
fn locations(
    module: &naga::Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
) -> Vec<u32> {
    match binding {
        Some(Binding::Location { location, .. }) => vec![*location],
        Some(_) => Vec::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .filter_map(|m| match &m.binding {
                    Some(Binding::Location { location, .. }) => Some(*location),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        },
    }
}
