use glam::{Mat4, Vec3};

/// Read-only camera state consumed by post-process stages.
///
/// Valid for the duration of one frame.
pub trait CameraView {
    /// World-to-view transform.
    fn view_matrix(&self) -> Mat4;
    /// View-to-clip transform (wgpu `[0,1]` depth).
    fn projection_matrix(&self) -> Mat4;
    /// Eye position in world space.
    fn position(&self) -> Vec3;
    /// Unit view direction in world space.
    fn forward(&self) -> Vec3;
    /// Vertical field of view in degrees.
    fn fov(&self) -> f32;
}

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.0, 0.0),
            target: Vec3::new(0.0, 1.0, -1.0),
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy: 60.0,
            znear: 0.1,
            zfar: 10_000.0,
        }
    }
}

impl Camera {
    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// Right-handed look-at view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix alone.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Keep the aspect ratio in step with the render size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

impl CameraView for Camera {
    fn view_matrix(&self) -> Mat4 {
        self.build_view()
    }

    fn projection_matrix(&self) -> Mat4 {
        self.build_projection()
    }

    fn position(&self) -> Vec3 {
        self.eye
    }

    fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    fn fov(&self) -> f32 {
        self.fovy
    }
}
