//! Per-frame context handed to every post-process stage.

use glam::UVec2;
use web_time::Instant;

use crate::camera::CameraView;
use crate::gpu::resources::TextureId;
use crate::settings::RenderSettings;

/// Precomputed cloud noise, immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloudNoise {
    /// 3D Perlin-Worley base shape noise (texture unit 0).
    pub perlin_worley: TextureId,
    /// 3D Worley detail noise (texture unit 1).
    pub worley: TextureId,
    /// 2D weather map (texture unit 2).
    pub weather: TextureId,
}

/// Time since start and frame counter, with smoothed FPS.
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    frame: u64,
    seconds: f32,
    smoothed_fps: f32,
    smoothing: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Clock starting now at frame 0.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            frame: 0,
            seconds: 0.0,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Advance to the next frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.seconds = now.duration_since(self.start).as_secs_f32();
        self.frame += 1;

        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            // Exponential moving average for smooth display
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Seconds between construction and the last [`tick`](Self::tick).
    #[must_use]
    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    /// Number of ticks so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

/// Read-only snapshot of everything a stage binds from, valid for one frame.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    /// Active camera.
    pub camera: &'a dyn CameraView,
    /// Tunables, snapshotted for the frame.
    pub settings: &'a RenderSettings,
    /// Seconds since start.
    pub time: f32,
    /// Frame counter.
    pub frame: u64,
    /// Render size in pixels.
    pub resolution: UVec2,
    /// G-buffer depth of the current frame.
    pub depth: Option<TextureId>,
    /// Cloud noise volumes.
    pub noise: Option<CloudNoise>,
}

impl<'a> FrameContext<'a> {
    /// Context at time 0, frame 0, with no G-buffer or noise inputs.
    #[must_use]
    pub fn new(
        camera: &'a dyn CameraView,
        settings: &'a RenderSettings,
        resolution: UVec2,
    ) -> Self {
        Self {
            camera,
            settings,
            time: 0.0,
            frame: 0,
            resolution,
            depth: None,
            noise: None,
        }
    }

    /// Take time and frame counter from `clock`.
    #[must_use]
    pub fn with_clock(mut self, clock: &FrameClock) -> Self {
        self.time = clock.seconds();
        self.frame = clock.frame();
        self
    }

    /// Attach the G-buffer depth texture.
    #[must_use]
    pub fn with_depth(mut self, depth: TextureId) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Attach the cloud noise textures.
    #[must_use]
    pub fn with_noise(mut self, noise: CloudNoise) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Size of one pixel in UV units.
    #[must_use]
    pub fn texel_size(&self) -> glam::Vec2 {
        glam::Vec2::ONE / self.resolution.max(UVec2::ONE).as_vec2()
    }
}
