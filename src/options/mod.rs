//! Centralized simulation options with TOML preset support.
//!
//! Layout, animation timing, container sizing and the value-kind palette are
//! consolidated here. Options serialize to/from TOML so a classroom setup can
//! be saved as a named preset.

mod animation;
mod colors;
mod containers;
mod layout;

use std::path::{Path, PathBuf};

pub use animation::AnimationOptions;
pub use colors::ColorOptions;
pub use containers::ContainerOptions;
pub use layout::LayoutOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[containers]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Cell geometry and grid shape.
    pub layout: LayoutOptions,
    /// Fade, movement and highlight timing.
    pub animation: AnimationOptions,
    /// Initial capacities, load factor and concurrency level.
    pub containers: ContainerOptions,
    /// Value-kind palette.
    #[schemars(skip)]
    pub colors: ColorOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse a TOML preset and reject values no container can work with.
    pub fn from_toml(text: &str) -> Result<Self, VizError> {
        let options: Self =
            toml::from_str(text).map_err(|e| VizError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Pretty-printed TOML form.
    pub fn to_toml(&self) -> Result<String, VizError> {
        toml::to_string_pretty(self).map_err(|e| VizError::OptionsParse(e.to_string()))
    }

    /// Load a preset file. Fields it leaves out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, VizError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Write this preset to `path`, creating missing directories.
    pub fn save(&self, path: &Path) -> Result<(), VizError> {
        let text = self.to_toml()?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, text).map_err(VizError::from)
    }

    /// File a preset called `name` lives in under `dir`.
    #[must_use]
    pub fn preset_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.toml"))
    }

    /// Names of the `.toml` presets in `dir`, sorted. Unreadable
    /// directories have none.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_owned))
            .collect();
        names.sort();
        names
    }

    /// Reject settings that would stall or divide by zero: a load factor
    /// that is not a positive number, a zero concurrency level, zero grid
    /// columns or a negative fade.
    pub fn validate(&self) -> Result<(), VizError> {
        let c = &self.containers;
        if !(c.load_factor.is_finite() && c.load_factor > 0.0) {
            return Err(VizError::OptionsParse(format!(
                "containers.load_factor must be positive, got {}",
                c.load_factor
            )));
        }
        if c.concurrency_level == 0 {
            return Err(VizError::OptionsParse(
                "containers.concurrency_level must be at least 1".to_owned(),
            ));
        }
        if self.layout.columns == 0 {
            return Err(VizError::OptionsParse(
                "layout.columns must be at least 1".to_owned(),
            ));
        }
        if self.animation.fade_seconds < 0.0 {
            return Err(VizError::OptionsParse(format!(
                "animation.fade_seconds must not be negative, got {}",
                self.animation.fade_seconds
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::easing::EasingFunction;
    use crate::value::ValueKind;

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
[containers]
load_factor = 0.5
concurrency_level = 4
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.containers.load_factor, 0.5);
        assert_eq!(opts.containers.concurrency_level, 4);
        // Everything else should be default
        assert_eq!(opts.containers.hash_capacity, 16);
        assert_eq!(opts.layout.columns, 10);
        assert_eq!(opts.animation.easing, EasingFunction::DEFAULT);
    }

    #[test]
    fn easing_curve_is_configurable() {
        let toml_str = r#"
[animation.easing]
curve = "quadratic_out"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.animation.easing, EasingFunction::QuadraticOut);
    }

    #[test]
    fn palette_lookup_by_kind() {
        let colors = ColorOptions::default();
        assert_eq!(colors.color_for(ValueKind::Integer), colors.integer);
        assert_eq!(colors.color_for(ValueKind::Other), [0.55, 0.55, 0.55]);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("collectviz-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.containers.array_capacity = 4;
        opts.save(&dir.join("small.toml")).unwrap();
        opts.save(&dir.join("another.toml")).unwrap();

        let loaded = Options::load(&dir.join("small.toml")).unwrap();
        assert_eq!(loaded.containers.array_capacity, 4);
        assert_eq!(Options::list_presets(&dir), vec!["another", "small"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unusable_values_are_rejected() {
        for text in [
            "[containers]\nload_factor = 0.0",
            "[containers]\nload_factor = -1.5",
            "[containers]\nconcurrency_level = 0",
            "[layout]\ncolumns = 0",
            "[animation]\nfade_seconds = -0.1",
        ] {
            assert!(
                matches!(Options::from_toml(text), Err(VizError::OptionsParse(_))),
                "{text} should be rejected"
            );
        }
        assert!(Options::from_toml("[containers]\nload_factor = 2.0").is_ok());
    }

    #[test]
    fn preset_path_appends_extension() {
        let path = Options::preset_path(Path::new("presets"), "classroom");
        assert_eq!(path, Path::new("presets").join("classroom.toml"));
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = std::env::temp_dir()
            .join(format!("collectviz-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[layout\ncolumns = ").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(VizError::OptionsParse(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("layout"));
        assert!(props.contains_key("animation"));
        assert!(props.contains_key("containers"));
        assert!(!props.contains_key("colors"));

        let animation = &props["animation"]["properties"];
        assert!(animation.get("fade_seconds").is_some());
        assert!(animation.get("easing").is_none());
    }
}
