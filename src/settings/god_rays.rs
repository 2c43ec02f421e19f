use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Radial-blur tunables of the screen-space god-ray stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "God Rays", inline)]
#[serde(default)]
pub struct GodRaySettings {
    /// Contribution of each blur sample.
    #[schemars(title = "Weight", range(min = 0.0, max = 0.2), extend("step" = 0.005))]
    pub weight: f32,
    /// Per-sample falloff.
    #[schemars(title = "Decay", range(min = 0.8, max = 1.0), extend("step" = 0.005))]
    pub decay: f32,
    /// Fraction of the distance to the sun covered by the samples.
    #[schemars(title = "Density", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub density: f32,
    /// Final shaft intensity.
    #[schemars(title = "Exposure", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub exposure: f32,
}

impl Default for GodRaySettings {
    fn default() -> Self {
        Self {
            weight: 0.04,
            decay: 0.97,
            density: 0.9,
            exposure: 0.6,
        }
    }
}
