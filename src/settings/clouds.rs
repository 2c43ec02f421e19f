use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Volumetric cloud layer geometry, noise and animation.
///
/// The layer is the shell between two concentric spheres whose center
/// follows the camera horizontally and sits `sphere_y_offset` below it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Clouds", inline)]
#[serde(default)]
pub struct CloudSettings {
    /// World-space height of the shell center.
    #[schemars(skip)]
    pub sphere_y_offset: f32,
    /// Radius of the cloud layer floor.
    #[schemars(skip)]
    pub inner_sphere_radius: f32,
    /// Radius of the cloud layer ceiling.
    #[schemars(skip)]
    pub outer_sphere_radius: f32,
    /// Height below the ceiling where cloud tops start to round off.
    #[schemars(title = "Top Offset", range(min = 0.0, max = 3000.0), extend("step" = 50.0))]
    pub cloud_top_offset: f32,
    /// Ray-march cutoff distance.
    #[schemars(title = "Max Distance", range(min = 10000.0, max = 400000.0), extend("step" = 5000.0))]
    pub max_render_distance: f32,
    /// World-to-UV scale of the weather texture.
    #[schemars(skip)]
    pub weather_texture_scale: f32,
    /// World-to-UVW scale of the base shape noise.
    #[schemars(skip)]
    pub base_noise_scale: f32,
    /// World-to-UVW scale of the detail noise.
    #[schemars(skip)]
    pub high_frequency_noise_scale: f32,
    /// Horizontal tiling of the detail noise.
    #[schemars(skip)]
    pub high_frequency_noise_uv_scale: f32,
    /// Vertical tiling of the detail noise.
    #[schemars(skip)]
    pub high_frequency_noise_h_scale: f32,
    /// Albedo of the clouds.
    #[schemars(skip)]
    pub cloud_color: [f32; 3],
    /// Wind speed in world units per second.
    #[schemars(title = "Wind Strength", range(min = 0.0, max = 500.0), extend("step" = 5.0))]
    pub wind_strength: f32,
    /// Wind direction (world space).
    #[schemars(skip)]
    pub wind_direction: [f32; 3],
    /// 0 = stratus, 0.5 = stratocumulus, 1 = cumulus.
    #[schemars(title = "Cloud Type", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub cloud_type: f32,
    /// Scales the weather-map coverage.
    #[schemars(title = "Coverage", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub coverage_multiplier: f32,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            sphere_y_offset: -198_500.0,
            inner_sphere_radius: 200_000.0,
            outer_sphere_radius: 206_000.0,
            cloud_top_offset: 750.0,
            max_render_distance: 150_000.0,
            weather_texture_scale: 0.000_03,
            base_noise_scale: 0.000_15,
            high_frequency_noise_scale: 0.0015,
            high_frequency_noise_uv_scale: 150.0,
            high_frequency_noise_h_scale: 4.0,
            cloud_color: [1.0, 1.0, 1.0],
            wind_strength: 50.0,
            wind_direction: [1.0, 0.0, 0.0],
            cloud_type: 0.5,
            coverage_multiplier: 0.45,
        }
    }
}
