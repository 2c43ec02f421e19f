//! CPU-side uniform staging and texture-unit tables.
//!
//! Each program copy owns its own [`UniformBlock`] and [`TextureBindings`];
//! only the GPU program behind them is shared. Both are sized once when the
//! program is configured and are rewritten in place every frame.

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::reflection::{TextureLocation, UniformKind, UniformLocation};
use super::resources::TextureId;

/// Number of texture units available to a single program.
pub const MAX_TEXTURE_UNITS: usize = 8;

/// A value bound to a uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `f32`
    F32(f32),
    /// `i32`
    I32(i32),
    /// `u32`
    U32(u32),
    /// `vec2<f32>`
    Vec2(Vec2),
    /// `vec3<f32>`
    Vec3(Vec3),
    /// `vec4<f32>`
    Vec4(Vec4),
    /// `mat4x4<f32>`, column-major
    Mat4(Mat4),
}

impl UniformValue {
    /// Shader-side kind this value binds to.
    #[must_use]
    pub const fn kind(&self) -> UniformKind {
        match self {
            Self::F32(_) => UniformKind::F32,
            Self::I32(_) => UniformKind::I32,
            Self::U32(_) => UniformKind::U32,
            Self::Vec2(_) => UniformKind::Vec2,
            Self::Vec3(_) => UniformKind::Vec3,
            Self::Vec4(_) => UniformKind::Vec4,
            Self::Mat4(_) => UniformKind::Mat4,
        }
    }

    fn write(&self, dst: &mut [u8]) {
        match self {
            Self::F32(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::I32(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::U32(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            Self::Vec2(v) => {
                dst.copy_from_slice(bytemuck::cast_slice(&v.to_array()));
            }
            Self::Vec3(v) => {
                dst.copy_from_slice(bytemuck::cast_slice(&v.to_array()));
            }
            Self::Vec4(v) => {
                dst.copy_from_slice(bytemuck::cast_slice(&v.to_array()));
            }
            Self::Mat4(m) => {
                dst.copy_from_slice(bytemuck::cast_slice(&m.to_cols_array()));
            }
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<u32> for UniformValue {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        Self::I32(i32::from(v))
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        Self::Vec3(Vec3::from_array(v))
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

/// Byte image of a program's uniform struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformBlock {
    bytes: Vec<u8>,
}

impl UniformBlock {
    /// Zero-filled block of `size` bytes.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            bytes: vec![0; size as usize],
        }
    }

    /// Write `value` at `location`.
    ///
    /// A `None` location, a kind mismatch, or an out-of-range offset leaves
    /// the block untouched.
    pub fn set(
        &mut self,
        location: Option<UniformLocation>,
        value: impl Into<UniformValue>,
    ) {
        let Some(location) = location else {
            return;
        };
        let value = value.into();
        if value.kind() != location.kind {
            log::trace!(
                "uniform kind mismatch at offset {}: {:?} vs {:?}",
                location.offset,
                value.kind(),
                location.kind
            );
            return;
        }
        let start = location.offset as usize;
        let end = start + location.kind.size();
        if let Some(dst) = self.bytes.get_mut(start..end) {
            value.write(dst);
        }
    }

    /// Read back a `f32` at `location`.
    #[must_use]
    pub fn get_f32(&self, location: UniformLocation) -> Option<f32> {
        self.read::<1>(location).map(|[v]| v)
    }

    /// Read back an `i32` at `location`.
    #[must_use]
    pub fn get_i32(&self, location: UniformLocation) -> Option<i32> {
        let start = location.offset as usize;
        let bytes = self.bytes.get(start..start + 4)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }

    /// Read back a `vec2<f32>` at `location`.
    #[must_use]
    pub fn get_vec2(&self, location: UniformLocation) -> Option<Vec2> {
        self.read::<2>(location).map(Vec2::from_array)
    }

    /// Read back a `vec3<f32>` at `location`.
    #[must_use]
    pub fn get_vec3(&self, location: UniformLocation) -> Option<Vec3> {
        self.read::<3>(location).map(Vec3::from_array)
    }

    /// Read back a `mat4x4<f32>` at `location`.
    #[must_use]
    pub fn get_mat4(&self, location: UniformLocation) -> Option<Mat4> {
        self.read::<16>(location).map(|m| Mat4::from_cols_array(&m))
    }

    fn read<const N: usize>(
        &self,
        location: UniformLocation,
    ) -> Option<[f32; N]> {
        let start = location.offset as usize;
        let bytes = self.bytes.get(start..start + N * 4)?;
        Some(bytemuck::pod_read_unaligned(bytes))
    }

    /// Raw bytes for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the block has no bytes (the shader declares no uniforms).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Textures bound to a program's texture units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextureBindings {
    units: [Option<TextureId>; MAX_TEXTURE_UNITS],
}

impl TextureBindings {
    /// Bind `texture` to the unit at `location`. `None` is a no-op.
    pub fn bind(
        &mut self,
        location: Option<TextureLocation>,
        texture: TextureId,
    ) {
        let Some(location) = location else {
            return;
        };
        if let Some(unit) = self.units.get_mut(location.unit as usize) {
            *unit = Some(texture);
        }
    }

    /// Texture currently bound to `unit`.
    #[must_use]
    pub fn get(&self, unit: u32) -> Option<TextureId> {
        self.units.get(unit as usize).copied().flatten()
    }

    /// Unbind every unit.
    pub fn clear(&mut self) {
        self.units = [None; MAX_TEXTURE_UNITS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::reflection::TextureKind;

    fn loc(offset: u32, kind: UniformKind) -> Option<UniformLocation> {
        Some(UniformLocation { offset, kind })
    }

    #[test]
    fn set_writes_at_offset() {
        let mut block = UniformBlock::new(96);
        block.set(loc(16, UniformKind::Vec3), Vec3::new(1.0, 2.0, 3.0));
        block.set(loc(28, UniformKind::I32), true);
        block.set(loc(32, UniformKind::Mat4), Mat4::IDENTITY);

        let l = UniformLocation {
            offset: 16,
            kind: UniformKind::Vec3,
        };
        assert_eq!(block.get_vec3(l), Some(Vec3::new(1.0, 2.0, 3.0)));
        let l = UniformLocation {
            offset: 28,
            kind: UniformKind::I32,
        };
        assert_eq!(block.get_i32(l), Some(1));
        let l = UniformLocation {
            offset: 32,
            kind: UniformKind::Mat4,
        };
        assert_eq!(block.get_mat4(l), Some(Mat4::IDENTITY));
    }

    #[test]
    fn missing_location_is_a_no_op() {
        let mut block = UniformBlock::new(16);
        block.set(None, 5.0_f32);
        assert!(block.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn kind_mismatch_and_overflow_are_ignored() {
        let mut block = UniformBlock::new(16);
        block.set(loc(0, UniformKind::Vec2), 1.0_f32);
        block.set(loc(8, UniformKind::Vec4), Vec4::ONE);
        assert!(block.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn texture_bind_to_missing_unit_is_a_no_op() {
        let mut bindings = TextureBindings::default();
        bindings.bind(None, TextureId(3));
        assert_eq!(bindings, TextureBindings::default());

        let location = TextureLocation {
            unit: 2,
            kind: TextureKind::Float2d,
        };
        bindings.bind(Some(location), TextureId(3));
        assert_eq!(bindings.get(2), Some(TextureId(3)));
        assert_eq!(bindings.get(1), None);
        bindings.clear();
        assert_eq!(bindings.get(2), None);
    }
}
