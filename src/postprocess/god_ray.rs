//! Screen-space god rays.
//!
//! The sun is placed a fixed distance from the camera along the light
//! direction and projected to screen space. The blur radiates from that
//! point. When the projection lands far outside the screen, or behind the
//! camera, the stage passes the scene through unchanged.

use glam::Vec3;

use crate::camera::CameraView;
use crate::frame::FrameContext;
use crate::gpu::reflection::{ShaderReflection, UniformLocation};
use crate::gpu::uniforms::UniformBlock;

/// Registered program name.
pub const PROGRAM_NAME: &str = "SSGodRayProgram";
/// Fragment stage source.
pub const FRAGMENT_SHADER: &str = "postprocess/ss_god_rays.wgsl";

/// Distance from the camera at which the sun is projected.
pub const LIGHT_DISTANCE: f32 = 20.0;

/// Project the sun into `[0,1]` screen space (x right, y up, z depth).
///
/// Points behind the camera come out with `z > 1`.
#[must_use]
pub fn light_screen_position(
    camera: &dyn CameraView,
    light_direction: Vec3,
) -> Vec3 {
    let world = camera.position() + light_direction * LIGHT_DISTANCE;
    let clip = camera.projection_matrix()
        * camera.view_matrix()
        * world.extend(1.0);
    let ndc = clip / clip.w;
    ndc.truncate() * 0.5 + 0.5
}

/// Whether the projected sun is too far off-screen for the blur to be
/// meaningful.
///
/// The accepted window is `[-2, 3]` on both axes rather than `[0, 1]` so
/// shafts fade out instead of popping at the screen edges.
#[must_use]
pub fn light_out_of_screen(screen: Vec3) -> bool {
    screen.z > 1.0
        || screen.x < -2.0
        || screen.x > 3.0
        || screen.y < -2.0
        || screen.y > 3.0
}

/// Resolved uniforms of the god-ray stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GodRayLocations {
    /// `light_screen_pos`
    pub light_screen_pos: Option<UniformLocation>,
    /// `only_pass`
    pub only_pass: Option<UniformLocation>,
    /// `weight`
    pub weight: Option<UniformLocation>,
    /// `decay`
    pub decay: Option<UniformLocation>,
    /// `density`
    pub density: Option<UniformLocation>,
    /// `exposure`
    pub exposure: Option<UniformLocation>,
}

impl GodRayLocations {
    /// Look up every uniform this stage binds.
    #[must_use]
    pub fn resolve(reflection: &ShaderReflection) -> Self {
        let loc = |name| reflection.uniform_location(name);
        Self {
            light_screen_pos: loc("light_screen_pos"),
            only_pass: loc("only_pass"),
            weight: loc("weight"),
            decay: loc("decay"),
            density: loc("density"),
            exposure: loc("exposure"),
        }
    }

    /// Write this frame's values.
    pub fn bind(&self, uniforms: &mut UniformBlock, ctx: &FrameContext<'_>) {
        let light_direction =
            Vec3::from_array(ctx.settings.lighting.light_direction);
        let screen = light_screen_position(ctx.camera, light_direction);

        uniforms.set(self.only_pass, light_out_of_screen(screen));
        uniforms.set(self.light_screen_pos, screen.truncate());

        let tunables = &ctx.settings.god_rays;
        uniforms.set(self.weight, tunables.weight);
        uniforms.set(self.decay, tunables.decay);
        uniforms.set(self.density, tunables.density);
        uniforms.set(self.exposure, tunables.exposure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_boundaries_are_inclusive() {
        assert!(!light_out_of_screen(Vec3::new(-2.0, 0.5, 0.5)));
        assert!(!light_out_of_screen(Vec3::new(3.0, 0.5, 0.5)));
        assert!(!light_out_of_screen(Vec3::new(0.5, -2.0, 0.5)));
        assert!(!light_out_of_screen(Vec3::new(0.5, 3.0, 0.5)));
        assert!(!light_out_of_screen(Vec3::new(0.5, 0.5, 1.0)));
        assert!(!light_out_of_screen(Vec3::new(-2.0, 3.0, 1.0)));
    }

    #[test]
    fn guard_trips_just_past_each_boundary() {
        let eps = 1e-4;
        assert!(light_out_of_screen(Vec3::new(-2.0 - eps, 0.5, 0.5)));
        assert!(light_out_of_screen(Vec3::new(3.0 + eps, 0.5, 0.5)));
        assert!(light_out_of_screen(Vec3::new(0.5, -2.0 - eps, 0.5)));
        assert!(light_out_of_screen(Vec3::new(0.5, 3.0 + eps, 0.5)));
        assert!(light_out_of_screen(Vec3::new(0.5, 0.5, 1.0 + eps)));
    }

    #[test]
    fn guard_is_false_inside_window() {
        assert!(!light_out_of_screen(Vec3::new(0.5, 0.5, 0.9)));
        assert!(!light_out_of_screen(Vec3::new(-1.5, 2.5, 0.0)));
    }
}
