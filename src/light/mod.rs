//! Scene lights and their GPU light-buffer records.
//!
//! A [`Light`] tracks whether its GPU copy is stale. The [`LightManager`]
//! assigns each light a slot in the light buffer, uploads stale lights once
//! per frame, then clears their update flags.

mod buffer;
mod manager;
mod slots;

use glam::{Mat4, Vec3};

pub use buffer::LightBuffer;
pub use manager::LightManager;
pub use slots::{LightSlot, LightSlots};

/// Variant-specific light data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Omnidirectional light at the model-matrix origin.
    Point {
        /// Constant, linear and quadratic attenuation factors.
        attenuation: Vec3,
    },
    /// Infinitely distant light.
    Directional {
        /// Direction the light travels, in model space.
        direction: Vec3,
    },
    /// Cone light at the model-matrix origin.
    Spot {
        /// Cone axis, in model space.
        direction: Vec3,
        /// Cosine of the cone half-angle.
        cutoff: f32,
        /// Constant, linear and quadratic attenuation factors.
        attenuation: Vec3,
    },
}

impl LightKind {
    const fn tag(&self) -> u32 {
        match self {
            Self::Point { .. } => 0,
            Self::Directional { .. } => 1,
            Self::Spot { .. } => 2,
        }
    }
}

/// Light buffer record. Must match the WGSL `Light` struct layout (80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    /// World position; `w` is 0 for directional lights.
    pub position: [f32; 4],
    /// World direction; `w` holds the spot cutoff cosine.
    pub direction: [f32; 4],
    /// Light color; `w` unused.
    pub color: [f32; 4],
    /// Attenuation factors; `w` unused.
    pub attenuation: [f32; 4],
    /// Ambient coefficient.
    pub ka: f32,
    /// Diffuse coefficient.
    pub kd: f32,
    /// Specular coefficient.
    pub ks: f32,
    /// 0 = point, 1 = directional, 2 = spot.
    pub kind: u32,
}

/// A light source with dirty tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    name: String,
    enabled: bool,
    model_matrix: Mat4,
    update: bool,
    slot: Option<LightSlot>,
    kind: LightKind,
    color: Vec3,
    ka: f32,
    kd: f32,
    ks: f32,
}

impl Light {
    /// White, enabled light at the origin. Starts stale so its first flush
    /// uploads it.
    #[must_use]
    pub fn new(name: &str, kind: LightKind) -> Self {
        Self {
            name: name.to_owned(),
            enabled: true,
            model_matrix: Mat4::IDENTITY,
            update: true,
            slot: None,
            kind,
            color: Vec3::ONE,
            ka: 0.1,
            kd: 1.0,
            ks: 0.5,
        }
    }

    /// Point light with no attenuation.
    #[must_use]
    pub fn point(name: &str) -> Self {
        Self::new(
            name,
            LightKind::Point {
                attenuation: Vec3::new(1.0, 0.0, 0.0),
            },
        )
    }

    /// Directional light travelling along `direction`.
    #[must_use]
    pub fn directional(name: &str, direction: Vec3) -> Self {
        Self::new(name, LightKind::Directional { direction })
    }

    /// Spot light along `direction`, `cutoff` being the cosine of the cone
    /// half-angle. No attenuation.
    #[must_use]
    pub fn spot(name: &str, direction: Vec3, cutoff: f32) -> Self {
        Self::new(
            name,
            LightKind::Spot {
                direction,
                cutoff,
                attenuation: Vec3::new(1.0, 0.0, 0.0),
            },
        )
    }

    /// Identity of the light.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Toggle visibility. Does not mark the light stale.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the light contributes to shading.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the light color.
    pub fn set_color(&mut self, color: Vec3) {
        self.color = color;
        self.update = true;
    }

    /// Set the ambient coefficient.
    pub fn set_ka(&mut self, ka: f32) {
        self.ka = ka;
        self.update = true;
    }

    /// Set the diffuse coefficient.
    pub fn set_kd(&mut self, kd: f32) {
        self.kd = kd;
        self.update = true;
    }

    /// Set the specular coefficient.
    pub fn set_ks(&mut self, ks: f32) {
        self.ks = ks;
        self.update = true;
    }

    /// Move the light in world space.
    pub fn translate(&mut self, translation: Vec3) {
        self.model_matrix =
            Mat4::from_translation(translation) * self.model_matrix;
        self.update = true;
    }

    /// Replace the variant data.
    pub fn set_kind(&mut self, kind: LightKind) {
        self.kind = kind;
        self.update = true;
    }

    /// Variant data.
    #[must_use]
    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    /// Model-to-world transform.
    #[must_use]
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    /// Whether the GPU copy is stale.
    #[must_use]
    pub fn requires_update(&self) -> bool {
        self.update
    }

    /// Mark the GPU copy current. Call only after the upload.
    pub fn clear_update_flag(&mut self) {
        self.update = false;
    }

    /// Light buffer slot, once assigned.
    #[must_use]
    pub fn slot(&self) -> Option<LightSlot> {
        self.slot
    }

    /// Assign the buffer slot. Returns `false` (keeping the old slot) if one
    /// was already assigned.
    pub(crate) fn assign_slot(&mut self, slot: LightSlot) -> bool {
        if self.slot.is_some() {
            return false;
        }
        self.slot = Some(slot);
        true
    }

    /// Light buffer record for the current state.
    #[must_use]
    pub fn to_gpu(&self) -> GpuLight {
        let origin = self.model_matrix.transform_point3(Vec3::ZERO);
        let world_dir =
            |d: Vec3| self.model_matrix.transform_vector3(d).normalize_or_zero();

        let (position, direction, attenuation) = match self.kind {
            LightKind::Point { attenuation } => {
                (origin.extend(1.0), [0.0; 4], attenuation)
            }
            LightKind::Directional { direction } => (
                origin.extend(0.0),
                world_dir(direction).extend(0.0).to_array(),
                Vec3::new(1.0, 0.0, 0.0),
            ),
            LightKind::Spot {
                direction,
                cutoff,
                attenuation,
            } => (
                origin.extend(1.0),
                world_dir(direction).extend(cutoff).to_array(),
                attenuation,
            ),
        };

        GpuLight {
            position: position.to_array(),
            direction,
            color: self.color.extend(1.0).to_array(),
            attenuation: attenuation.extend(0.0).to_array(),
            ka: self.ka,
            kd: self.kd,
            ks: self.ks,
            kind: self.kind.tag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_light_is_80_bytes() {
        assert_eq!(size_of::<GpuLight>(), 80);
    }

    #[test]
    fn clear_then_requires_update_is_false_until_mutation() {
        let mut light = Light::point("lamp");
        assert!(light.requires_update());
        light.clear_update_flag();
        assert!(!light.requires_update());

        light.translate(Vec3::X);
        assert!(light.requires_update());
        light.clear_update_flag();

        light.set_color(Vec3::new(1.0, 0.5, 0.2));
        assert!(light.requires_update());
        light.clear_update_flag();

        let setters: [fn(&mut Light, f32); 3] =
            [Light::set_ka, Light::set_kd, Light::set_ks];
        for mutate in setters {
            mutate(&mut light, 0.3);
            assert!(light.requires_update());
            light.clear_update_flag();
        }
    }

    #[test]
    fn enabling_does_not_mark_stale() {
        let mut light = Light::point("lamp");
        light.clear_update_flag();
        light.set_enabled(false);
        assert!(!light.is_enabled());
        assert!(!light.requires_update());
    }

    #[test]
    fn slot_is_assigned_once() {
        let mut light = Light::point("lamp");
        assert!(light.assign_slot(LightSlot(2)));
        assert!(!light.assign_slot(LightSlot(5)));
        assert_eq!(light.slot(), Some(LightSlot(2)));
    }

    #[test]
    fn translated_point_light_record() {
        let mut light = Light::point("lamp");
        light.translate(Vec3::new(1.0, 2.0, 3.0));
        let gpu = light.to_gpu();
        assert_eq!(gpu.position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(gpu.kind, 0);
    }

    #[test]
    fn directional_record_is_normalized_and_positionless() {
        let light = Light::directional("sun", Vec3::new(0.0, -2.0, 0.0));
        let gpu = light.to_gpu();
        assert_eq!(gpu.position[3], 0.0);
        assert_eq!(gpu.direction, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(gpu.kind, 1);
    }

    #[test]
    fn spot_record_carries_cutoff_and_position() {
        let mut light = Light::spot("torch", Vec3::new(0.0, 0.0, -3.0), 0.9);
        light.translate(Vec3::new(4.0, 1.0, 0.0));
        let gpu = light.to_gpu();
        assert_eq!(gpu.position, [4.0, 1.0, 0.0, 1.0]);
        assert_eq!(gpu.direction, [0.0, 0.0, -1.0, 0.9]);
        assert_eq!(gpu.attenuation, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(gpu.kind, 2);
        assert!(light.requires_update());
    }
}
