use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sun and sky parameters shared by the god-ray and cloud stages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
pub struct LightingSettings {
    /// Direction from the scene toward the sun (normalized before use).
    #[schemars(skip)]
    pub light_direction: [f32; 3],
    /// Sun color as it reaches the clouds.
    #[schemars(skip)]
    pub real_light_color: [f32; 3],
    /// Sun intensity multiplier.
    #[schemars(title = "Light Factor", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub light_factor: f32,
    /// Sky color straight up.
    #[schemars(skip)]
    pub sky_zenith_color: [f32; 3],
    /// Sky color at the horizon.
    #[schemars(skip)]
    pub sky_horizon_color: [f32; 3],
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            light_direction: [-0.2, 0.35, -1.0],
            real_light_color: [1.0, 0.95, 0.85],
            light_factor: 1.0,
            sky_zenith_color: [0.22, 0.38, 0.68],
            sky_horizon_color: [0.68, 0.78, 0.9],
        }
    }
}
