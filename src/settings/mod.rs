//! Tunable render settings with TOML preset support.
//!
//! Everything the post-process stages read per frame (sun, god-ray and
//! cloud tunables) plus the stage list itself. Settings serialize to/from
//! TOML presets such as `assets/settings/default.toml`.

mod clouds;
mod god_rays;
mod lighting;
mod pipeline;

use std::path::Path;

pub use clouds::CloudSettings;
pub use god_rays::GodRaySettings;
pub use lighting::LightingSettings;
pub use pipeline::{PipelineSettings, StageSettings};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PostFxError;

/// Top-level settings container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[god_rays]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct RenderSettings {
    /// Sun and sky parameters.
    pub lighting: LightingSettings,
    /// God-ray stage tunables.
    pub god_rays: GodRaySettings,
    /// Volumetric cloud tunables.
    pub clouds: CloudSettings,
    /// Stage order and shader location.
    #[schemars(skip)]
    pub pipeline: PipelineSettings,
}

impl RenderSettings {
    /// Generate JSON Schema describing the UI-exposed settings.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(RenderSettings)
    }

    /// Load settings from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PostFxError::Io`] if the file cannot be read and
    /// [`PostFxError::SettingsParse`] if it is not valid settings TOML.
    pub fn load(path: &Path) -> Result<Self, PostFxError> {
        let content = std::fs::read_to_string(path).map_err(PostFxError::Io)?;
        toml::from_str(&content)
            .map_err(|e| PostFxError::SettingsParse(e.to_string()))
    }

    /// Save settings to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`PostFxError::SettingsParse`] if serialization fails and
    /// [`PostFxError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), PostFxError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PostFxError::SettingsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PostFxError::Io)?;
        }
        std::fs::write(path, content).map_err(PostFxError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess::{god_ray, ssaa, volumetric_cloud};

    #[test]
    fn default_round_trips_through_toml() {
        let settings = RenderSettings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: RenderSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[god_rays]
exposure = 1.25
";
        let settings: RenderSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.god_rays.exposure, 1.25);
        // Everything else should be default
        assert_eq!(settings.god_rays.decay, 0.97);
        assert_eq!(settings.clouds, CloudSettings::default());
        assert_eq!(settings.pipeline.stages.len(), 3);
    }

    #[test]
    fn shipped_settings_match_defaults() {
        let shipped = include_str!("../../assets/settings/default.toml");
        let parsed: RenderSettings = toml::from_str(shipped).unwrap();
        assert_eq!(parsed, RenderSettings::default());
    }

    #[test]
    fn stage_list_parses_with_defaults_per_entry() {
        let toml_str = r#"
[pipeline]
stages = [
    { program = "SSAAProgram" },
    { program = "SSGodRayProgram", enabled = false, parameters = 3 },
]
"#;
        let settings: RenderSettings = toml::from_str(toml_str).unwrap();
        let stages = &settings.pipeline.stages;
        assert_eq!(stages[0], StageSettings::new(ssaa::PROGRAM_NAME));
        assert_eq!(stages[1].program, god_ray::PROGRAM_NAME);
        assert!(!stages[1].enabled);
        assert_eq!(stages[1].parameters, 3);
    }

    #[test]
    fn default_order_is_clouds_then_rays_then_resolve() {
        let names: Vec<_> = PipelineSettings::default()
            .stages
            .into_iter()
            .map(|s| s.program)
            .collect();
        assert_eq!(
            names,
            [
                volumetric_cloud::PROGRAM_NAME,
                god_ray::PROGRAM_NAME,
                ssaa::PROGRAM_NAME
            ]
        );
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("postfx-settings-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut settings = RenderSettings::default();
        settings.clouds.coverage_multiplier = 0.8;
        settings.save(&path).unwrap();

        let loaded = RenderSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = std::env::temp_dir()
            .join(format!("postfx-settings-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[clouds\ncloud_type = ").unwrap();

        let err = RenderSettings::load(&path).unwrap_err();
        assert!(matches!(err, PostFxError::SettingsParse(_)));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(RenderSettings::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("god_rays"));
        assert!(props.contains_key("clouds"));
        assert!(!props.contains_key("pipeline"));

        let clouds = &props["clouds"]["properties"];
        assert!(clouds.get("coverage_multiplier").is_some());
        assert!(clouds.get("inner_sphere_radius").is_none());
    }
}
