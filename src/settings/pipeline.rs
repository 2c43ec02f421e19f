use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::postprocess::{god_ray, ssaa, volumetric_cloud};

/// One entry of the post-process chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct StageSettings {
    /// Registered program name (e.g. `SSGodRayProgram`).
    pub program: String,
    /// Whether the stage takes part in the frame walk.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// `ProgramParameters` bits.
    #[serde(default)]
    pub parameters: u64,
}

fn enabled_by_default() -> bool {
    true
}

impl StageSettings {
    /// Enabled stage with no parameter bits.
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_owned(),
            enabled: true,
            parameters: 0,
        }
    }
}

/// Stage order and shader source location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Pipeline", inline)]
#[serde(default)]
pub struct PipelineSettings {
    /// Stages in execution order; the last enabled one writes the screen.
    pub stages: Vec<StageSettings>,
    /// Directory searched for edited shaders before the embedded ones.
    #[schemars(skip)]
    pub shader_dir: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            stages: vec![
                StageSettings::new(volumetric_cloud::PROGRAM_NAME),
                StageSettings::new(god_ray::PROGRAM_NAME),
                StageSettings::new(ssaa::PROGRAM_NAME),
            ],
            shader_dir: None,
        }
    }
}
