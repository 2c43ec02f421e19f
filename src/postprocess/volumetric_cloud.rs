//! Ray-marched volumetric clouds in a spherical shell around the camera.
//!
//! Everything is recomputed from the frame context each frame: camera
//! matrices, the shell center (locked to the camera horizontally), sun and
//! sky colors, wind animation, and the noise and depth inputs.

use glam::Vec3;

use crate::frame::FrameContext;
use crate::gpu::reflection::{ShaderReflection, TextureLocation, UniformLocation};
use crate::gpu::uniforms::{TextureBindings, UniformBlock};

/// Registered program name.
pub const PROGRAM_NAME: &str = "VolumetricCloudProgram";
/// Fragment stage source.
pub const FRAGMENT_SHADER: &str = "clouds/volumetric_clouds.wgsl";

/// Texture unit of the Perlin-Worley base noise.
pub const PERLIN_WORLEY_UNIT: u32 = 0;
/// Texture unit of the Worley detail noise.
pub const WORLEY_UNIT: u32 = 1;
/// Texture unit of the weather map.
pub const WEATHER_UNIT: u32 = 2;
/// Texture unit of the G-buffer depth.
pub const DEPTH_UNIT: u32 = 3;

/// Resolved uniforms and texture units of the cloud stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloudLocations {
    /// `inv_view`
    pub inv_view: Option<UniformLocation>,
    /// `proj_view`
    pub proj_view: Option<UniformLocation>,
    /// `cam_pos`
    pub cam_pos: Option<UniformLocation>,
    /// `sphere_center`
    pub sphere_center: Option<UniformLocation>,
    /// `inner_sphere_radius`
    pub inner_sphere_radius: Option<UniformLocation>,
    /// `outer_sphere_radius`
    pub outer_sphere_radius: Option<UniformLocation>,
    /// `max_render_dist`
    pub max_render_dist: Option<UniformLocation>,
    /// `cloud_top_offset`
    pub cloud_top_offset: Option<UniformLocation>,
    /// `weather_scale`
    pub weather_scale: Option<UniformLocation>,
    /// `base_noise_scale`
    pub base_noise_scale: Option<UniformLocation>,
    /// `high_freq_noise_scale`
    pub high_freq_noise_scale: Option<UniformLocation>,
    /// `high_freq_noise_uv_scale`
    pub high_freq_noise_uv_scale: Option<UniformLocation>,
    /// `high_freq_noise_h_scale`
    pub high_freq_noise_h_scale: Option<UniformLocation>,
    /// `light_dir`
    pub light_dir: Option<UniformLocation>,
    /// `real_light_color`
    pub real_light_color: Option<UniformLocation>,
    /// `light_factor`
    pub light_factor: Option<UniformLocation>,
    /// `zenit_color`
    pub zenit_color: Option<UniformLocation>,
    /// `horizon_color`
    pub horizon_color: Option<UniformLocation>,
    /// `cloud_color`
    pub cloud_color: Option<UniformLocation>,
    /// `time`
    pub time: Option<UniformLocation>,
    /// `cloud_speed`
    pub cloud_speed: Option<UniformLocation>,
    /// `wind_direction`
    pub wind_direction: Option<UniformLocation>,
    /// `cloud_type`
    pub cloud_type: Option<UniformLocation>,
    /// `coverage_multiplier`
    pub coverage_multiplier: Option<UniformLocation>,
    /// `screen_resolution`
    pub screen_resolution: Option<UniformLocation>,
    /// `fov`
    pub fov: Option<UniformLocation>,
    /// `frame`
    pub frame: Option<UniformLocation>,
    /// `perlinworley` texture
    pub perlin_worley: Option<TextureLocation>,
    /// `worley` texture
    pub worley: Option<TextureLocation>,
    /// `weather` texture
    pub weather: Option<TextureLocation>,
    /// `current_pixel_depth` texture
    pub current_pixel_depth: Option<TextureLocation>,
}

impl CloudLocations {
    /// Look up every uniform and texture this stage binds.
    #[must_use]
    pub fn resolve(reflection: &ShaderReflection) -> Self {
        let loc = |name| reflection.uniform_location(name);
        let tex = |name, unit| {
            let location = reflection.texture_location(name);
            if let Some(l) = location.filter(|l| l.unit != unit) {
                log::warn!(
                    "cloud texture '{name}' is on unit {}, expected {unit}",
                    l.unit
                );
            }
            location
        };
        Self {
            inv_view: loc("inv_view"),
            proj_view: loc("proj_view"),
            cam_pos: loc("cam_pos"),
            sphere_center: loc("sphere_center"),
            inner_sphere_radius: loc("inner_sphere_radius"),
            outer_sphere_radius: loc("outer_sphere_radius"),
            max_render_dist: loc("max_render_dist"),
            cloud_top_offset: loc("cloud_top_offset"),
            weather_scale: loc("weather_scale"),
            base_noise_scale: loc("base_noise_scale"),
            high_freq_noise_scale: loc("high_freq_noise_scale"),
            high_freq_noise_uv_scale: loc("high_freq_noise_uv_scale"),
            high_freq_noise_h_scale: loc("high_freq_noise_h_scale"),
            light_dir: loc("light_dir"),
            real_light_color: loc("real_light_color"),
            light_factor: loc("light_factor"),
            zenit_color: loc("zenit_color"),
            horizon_color: loc("horizon_color"),
            cloud_color: loc("cloud_color"),
            time: loc("time"),
            cloud_speed: loc("cloud_speed"),
            wind_direction: loc("wind_direction"),
            cloud_type: loc("cloud_type"),
            coverage_multiplier: loc("coverage_multiplier"),
            screen_resolution: loc("screen_resolution"),
            fov: loc("fov"),
            frame: loc("frame"),
            perlin_worley: tex("perlinworley", PERLIN_WORLEY_UNIT),
            worley: tex("worley", WORLEY_UNIT),
            weather: tex("weather", WEATHER_UNIT),
            current_pixel_depth: tex("current_pixel_depth", DEPTH_UNIT),
        }
    }

    /// Write this frame's values and texture units.
    pub fn bind(
        &self,
        uniforms: &mut UniformBlock,
        textures: &mut TextureBindings,
        ctx: &FrameContext<'_>,
    ) {
        let camera = ctx.camera;
        let view = camera.view_matrix();
        uniforms.set(self.inv_view, view.inverse());
        uniforms.set(self.proj_view, camera.projection_matrix() * view);

        let cam_pos = camera.position();
        uniforms.set(self.cam_pos, cam_pos);

        let clouds = &ctx.settings.clouds;
        let center = Vec3::new(cam_pos.x, clouds.sphere_y_offset, cam_pos.z);
        uniforms.set(self.sphere_center, center);
        uniforms.set(self.inner_sphere_radius, clouds.inner_sphere_radius);
        uniforms.set(self.outer_sphere_radius, clouds.outer_sphere_radius);
        uniforms.set(self.max_render_dist, clouds.max_render_distance);
        uniforms.set(self.cloud_top_offset, clouds.cloud_top_offset);
        uniforms.set(self.weather_scale, clouds.weather_texture_scale);
        uniforms.set(self.base_noise_scale, clouds.base_noise_scale);
        uniforms.set(
            self.high_freq_noise_scale,
            clouds.high_frequency_noise_scale,
        );
        uniforms.set(
            self.high_freq_noise_uv_scale,
            clouds.high_frequency_noise_uv_scale,
        );
        uniforms.set(
            self.high_freq_noise_h_scale,
            clouds.high_frequency_noise_h_scale,
        );

        let lighting = &ctx.settings.lighting;
        let light_dir =
            Vec3::from_array(lighting.light_direction).normalize_or_zero();
        uniforms.set(self.light_dir, light_dir);
        uniforms.set(self.real_light_color, lighting.real_light_color);
        uniforms.set(self.light_factor, lighting.light_factor);
        uniforms.set(self.zenit_color, lighting.sky_zenith_color);
        uniforms.set(self.horizon_color, lighting.sky_horizon_color);

        uniforms.set(self.cloud_color, clouds.cloud_color);
        uniforms.set(self.time, ctx.time);
        uniforms.set(self.cloud_speed, clouds.wind_strength);
        uniforms.set(self.wind_direction, clouds.wind_direction);
        uniforms.set(self.cloud_type, clouds.cloud_type);
        uniforms.set(self.coverage_multiplier, clouds.coverage_multiplier);

        uniforms.set(self.screen_resolution, ctx.resolution.as_vec2());
        uniforms.set(self.fov, camera.fov());
        uniforms.set(self.frame, ctx.frame as i32);

        if let Some(noise) = ctx.noise {
            textures.bind(self.perlin_worley, noise.perlin_worley);
            textures.bind(self.worley, noise.worley);
            textures.bind(self.weather, noise.weather);
        }
        if let Some(depth) = ctx.depth {
            textures.bind(self.current_pixel_depth, depth);
        }
    }
}
