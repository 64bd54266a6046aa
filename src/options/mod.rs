//! Runtime options with TOML preset support.
//!
//! Effect parameters, camera, demo scene and display settings live here.
//! Options serialize to/from TOML for presets stored in `assets/presets/`.

mod camera;
mod display;
mod godrays;
mod scene;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use godrays::GodraysOptions;
pub use scene::SceneOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GodraysError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[godrays]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Light shaft parameters.
    pub godrays: GodraysOptions,
    /// Camera projection and follow parameters.
    pub camera: CameraOptions,
    /// Demo scene layout.
    pub scene: SceneOptions,
    /// Presentation settings.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::Io`] if the file cannot be read and
    /// [`GodraysError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, GodraysError> {
        let content = std::fs::read_to_string(path)?;
        let options = toml::from_str(&content)
            .map_err(|e| GodraysError::OptionsParse(e.to_string()))?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GodraysError::OptionsParse`] if serialization fails and
    /// [`GodraysError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GodraysError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GodraysError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[godrays]
intensity = 0.4
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.godrays.intensity, 0.4);
        assert_eq!(opts.godrays.taps, 6.0);
        assert!(opts.godrays.enabled);
        assert_eq!(opts.camera, CameraOptions::default());
        assert_eq!(opts.scene.orbit_radius, 200.0);
    }

    #[test]
    fn defaults_match_demo_setup() {
        let opts = Options::default();
        assert_eq!(opts.camera.fovy, 70.0);
        assert_eq!(opts.camera.znear, 1.0);
        assert_eq!(opts.camera.zfar, 3000.0);
        assert_eq!(opts.scene.sun_position, [0.0, 1000.0, -1000.0]);
        assert_eq!(opts.godrays.filter_length, 1.0);
    }

    #[test]
    fn invalid_toml_is_an_options_error() {
        let dir = std::env::temp_dir().join("godrays-options-invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[godrays\nintensity = ").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(GodraysError::OptionsParse(_))
        ));
        assert!(matches!(
            Options::load(&dir.join("missing.toml")),
            Err(GodraysError::Io(_))
        ));
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir().join("godrays-options-presets");
        let _ = std::fs::remove_dir_all(&dir);
        let mut opts = Options::default();
        opts.godrays.intensity = 1.25;
        opts.save(&dir.join("bright.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::load(&dir.join("bright.toml")).unwrap(), opts);
        assert_eq!(Options::list_presets(&dir), ["bright", "default"]);
    }

    #[test]
    fn shipped_presets_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/presets");
        let names = Options::list_presets(&dir);
        assert!(names.iter().any(|n| n == "default"));
        for name in names {
            let _ = Options::load(&dir.join(format!("{name}.toml"))).unwrap();
        }
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("godrays"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("scene"));
        assert!(props.contains_key("display"));

        let godrays = &props["godrays"]["properties"];
        assert!(godrays.get("intensity").is_some());
        assert!(godrays.get("taps").is_some());
        assert!(godrays.get("sun_color").is_none());

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("znear").is_none());
    }
}
