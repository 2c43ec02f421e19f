//! Uniform and texture lookup by name, reflected from compiled shader IR.
//!
//! Post-process fragment shaders follow one binding convention:
//!
//! - `@group(0) @binding(0)`: a single `var<uniform>` struct holding every
//!   scalar/vector/matrix input of the effect
//! - `@group(0) @binding(1)`: the clamp-to-edge filtering sampler
//! - `@group(0) @binding(2)`: the repeating filtering sampler (tiling noise)
//! - `@group(1) @binding(N)`: a texture on texture unit `N`
//!
//! A uniform "location" is the byte offset of a member inside the uniform
//! struct. Lookups return `None` for names the shader does not declare, which
//! makes every bind against that name a no-op.

use naga::{
    AddressSpace, ImageClass, ImageDimension, ScalarKind, TypeInner,
    VectorSize,
};

/// Bind group holding the uniform block and sampler.
pub const UNIFORM_GROUP: u32 = 0;
/// Binding index of the uniform block within [`UNIFORM_GROUP`].
pub const UNIFORM_BINDING: u32 = 0;
/// Binding index of the clamp-to-edge sampler within [`UNIFORM_GROUP`].
pub const SAMPLER_BINDING: u32 = 1;
/// Binding index of the repeating sampler within [`UNIFORM_GROUP`].
pub const REPEAT_SAMPLER_BINDING: u32 = 2;
/// Bind group holding texture units.
pub const TEXTURE_GROUP: u32 = 1;

/// Shader-side type of a uniform member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    /// `f32`
    F32,
    /// `i32`
    I32,
    /// `u32`
    U32,
    /// `vec2<f32>`
    Vec2,
    /// `vec3<f32>`
    Vec3,
    /// `vec4<f32>`
    Vec4,
    /// `mat4x4<f32>`
    Mat4,
}

impl UniformKind {
    /// Size in bytes of a value of this kind.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::Vec2 => 8,
            Self::Vec3 => 12,
            Self::Vec4 => 16,
            Self::Mat4 => 64,
        }
    }

    fn from_type(inner: &TypeInner) -> Option<Self> {
        match *inner {
            TypeInner::Scalar(scalar) if scalar.width == 4 => {
                match scalar.kind {
                    ScalarKind::Float => Some(Self::F32),
                    ScalarKind::Sint => Some(Self::I32),
                    ScalarKind::Uint => Some(Self::U32),
                    _ => None,
                }
            }
            TypeInner::Vector { size, scalar }
                if scalar.kind == ScalarKind::Float && scalar.width == 4 =>
            {
                match size {
                    VectorSize::Bi => Some(Self::Vec2),
                    VectorSize::Tri => Some(Self::Vec3),
                    VectorSize::Quad => Some(Self::Vec4),
                }
            }
            TypeInner::Matrix {
                columns: VectorSize::Quad,
                rows: VectorSize::Quad,
                scalar,
            } if scalar.kind == ScalarKind::Float && scalar.width == 4 => {
                Some(Self::Mat4)
            }
            _ => None,
        }
    }
}

/// Resolved position of a uniform inside a program's uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    /// Byte offset of the member within the block.
    pub offset: u32,
    /// Shader-side type of the member.
    pub kind: UniformKind,
}

/// Shader-side type of a texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// `texture_2d<f32>`
    Float2d,
    /// `texture_3d<f32>`
    Float3d,
    /// `texture_depth_2d`
    Depth2d,
}

impl TextureKind {
    fn from_type(inner: &TypeInner) -> Option<Self> {
        match *inner {
            TypeInner::Image {
                dim,
                arrayed: false,
                class,
            } => match (dim, class) {
                (
                    ImageDimension::D2,
                    ImageClass::Sampled {
                        kind: ScalarKind::Float,
                        multi: false,
                    },
                ) => Some(Self::Float2d),
                (
                    ImageDimension::D3,
                    ImageClass::Sampled {
                        kind: ScalarKind::Float,
                        multi: false,
                    },
                ) => Some(Self::Float3d),
                (ImageDimension::D2, ImageClass::Depth { multi: false }) => {
                    Some(Self::Depth2d)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

/// Resolved texture unit of a named texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureLocation {
    /// Texture unit (binding index within [`TEXTURE_GROUP`]).
    pub unit: u32,
    /// Shader-side texture type.
    pub kind: TextureKind,
}

/// Names, offsets and texture units reflected from one fragment shader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderReflection {
    uniforms: Vec<(String, UniformLocation)>,
    uniform_block_size: u32,
    textures: Vec<(String, TextureLocation)>,
    samplers: Vec<u32>,
}

impl ShaderReflection {
    /// Reflect the binding convention out of a fragment module.
    ///
    /// Globals that do not follow the convention, and uniform members of
    /// unsupported types, are ignored.
    #[must_use]
    pub fn from_module(module: &naga::Module) -> Self {
        let mut reflection = Self::default();

        for (_, var) in module.global_variables.iter() {
            let Some(binding) = var.binding.as_ref() else {
                continue;
            };
            let inner = &module.types[var.ty].inner;

            if var.space == AddressSpace::Uniform
                && binding.group == UNIFORM_GROUP
                && binding.binding == UNIFORM_BINDING
            {
                if let TypeInner::Struct { ref members, span } = *inner {
                    reflection.uniform_block_size = span;
                    for member in members {
                        let Some(name) = member.name.as_ref() else {
                            continue;
                        };
                        let member_inner = &module.types[member.ty].inner;
                        if let Some(kind) = UniformKind::from_type(member_inner)
                        {
                            reflection.uniforms.push((
                                name.clone(),
                                UniformLocation {
                                    offset: member.offset,
                                    kind,
                                },
                            ));
                        }
                    }
                }
                continue;
            }

            if binding.group == UNIFORM_GROUP
                && (binding.binding == SAMPLER_BINDING
                    || binding.binding == REPEAT_SAMPLER_BINDING)
                && matches!(*inner, TypeInner::Sampler { comparison: false })
            {
                reflection.samplers.push(binding.binding);
                continue;
            }

            if binding.group == TEXTURE_GROUP {
                let (Some(name), Some(kind)) =
                    (var.name.as_ref(), TextureKind::from_type(inner))
                else {
                    continue;
                };
                reflection.textures.push((
                    name.clone(),
                    TextureLocation {
                        unit: binding.binding,
                        kind,
                    },
                ));
            }
        }

        reflection.textures.sort_by_key(|(_, loc)| loc.unit);
        reflection.samplers.sort_unstable();
        reflection
    }

    /// Location of the named uniform, or `None` if the shader lacks it.
    #[must_use]
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loc)| *loc)
    }

    /// Texture unit of the named texture, or `None` if the shader lacks it.
    #[must_use]
    pub fn texture_location(&self, name: &str) -> Option<TextureLocation> {
        self.textures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loc)| *loc)
    }

    /// Size of the uniform block in bytes (0 if the shader has none).
    #[must_use]
    pub fn uniform_block_size(&self) -> u32 {
        self.uniform_block_size
    }

    /// All texture bindings, ordered by unit.
    #[must_use]
    pub fn textures(&self) -> &[(String, TextureLocation)] {
        &self.textures
    }

    /// Sampler bindings the shader declares, ascending.
    #[must_use]
    pub fn samplers(&self) -> &[u32] {
        &self.samplers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r"
struct Params {
    weight: f32,
    light_pos: vec2<f32>,
    color: vec3<f32>,
    flag: i32,
    proj: mat4x4<f32>,
}

@group(0) @binding(0) var<uniform> params: Params;
@group(0) @binding(1) var linear_sampler: sampler;
@group(0) @binding(2) var repeat_sampler: sampler;
@group(1) @binding(2) var weather: texture_2d<f32>;
@group(1) @binding(0) var noise: texture_3d<f32>;
@group(1) @binding(3) var depth: texture_depth_2d;

@fragment
fn fs_main(@builtin(position) pos: vec4<f32>) -> @location(0) vec4<f32> {
    let d = textureLoad(depth, vec2<i32>(pos.xy), 0);
    let n = textureSampleLevel(noise, repeat_sampler, vec3<f32>(0.5), 0.0).r;
    let w = textureSampleLevel(weather, linear_sampler, params.light_pos, 0.0).r;
    return vec4<f32>(params.color * params.weight * n * w * d, f32(params.flag)) * params.proj;
}
";

    fn reflect() -> ShaderReflection {
        let module = naga::front::wgsl::parse_str(SOURCE).unwrap();
        ShaderReflection::from_module(&module)
    }

    #[test]
    fn uniform_offsets_follow_wgsl_layout() {
        let r = reflect();
        let loc = |n| r.uniform_location(n).unwrap();
        assert_eq!(loc("weight").offset, 0);
        assert_eq!(loc("light_pos").offset, 8);
        assert_eq!(loc("color").offset, 16);
        assert_eq!(loc("flag").offset, 28);
        assert_eq!(loc("proj").offset, 32);
        assert_eq!(loc("proj").kind, UniformKind::Mat4);
        assert_eq!(r.uniform_block_size(), 96);
    }

    #[test]
    fn missing_names_resolve_to_none() {
        let r = reflect();
        assert_eq!(r.uniform_location("exposure"), None);
        assert_eq!(r.texture_location("worley"), None);
    }

    #[test]
    fn textures_sorted_by_unit() {
        let r = reflect();
        let units: Vec<_> = r
            .textures()
            .iter()
            .map(|(name, loc)| (name.as_str(), loc.unit, loc.kind))
            .collect();
        assert_eq!(
            units,
            vec![
                ("noise", 0, TextureKind::Float3d),
                ("weather", 2, TextureKind::Float2d),
                ("depth", 3, TextureKind::Depth2d),
            ]
        );
        assert_eq!(r.samplers(), &[SAMPLER_BINDING, REPEAT_SAMPLER_BINDING]);
    }
}
