//! Centralized viewer options with TOML preset support.
//!
//! Filter thresholds, slice selection, dataset choice, layout and color
//! settings are consolidated here. Options serialize to/from TOML presets
//! and expose a JSON schema for the parameter panel.

mod colors;
mod data;
mod filter;
mod layout;
pub mod panel;

use std::path::Path;

pub use colors::ColorOptions;
pub use data::{
    DataOptions, DatasetCatalog, DatasetKey, ReplicaEntry, SimulationEntry,
};
pub use filter::FilterParameters;
pub use layout::LayoutOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::DccmError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[filter]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Dead-zone thresholds and slice selection.
    pub filter: FilterParameters,
    /// Dataset source and active dataset.
    pub data: DataOptions,
    /// Point grid layout.
    pub layout: LayoutOptions,
    /// Correlation color mapping.
    pub colors: ColorOptions,
}

/// What a transition between two option sets requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionsChange {
    /// A different dataset file must be loaded.
    pub dataset: bool,
    /// Slice visuals must be rebuilt from cached matrices.
    pub visuals: bool,
}

impl OptionsChange {
    /// Nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.dataset && !self.visuals
    }
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
    /// [`DccmError::Io`] if the file cannot be read,
    /// [`DccmError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, DccmError> {
        let content = std::fs::read_to_string(path).map_err(DccmError::Io)?;
        toml::from_str(&content)
            .map_err(|e| DccmError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Serialization or I/O failure.
    pub fn save(&self, path: &Path) -> Result<(), DccmError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DccmError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DccmError::Io)?;
        }
        std::fs::write(path, content).map_err(DccmError::Io)
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

    /// Classify the work needed to move from `self` to `next`.
    #[must_use]
    pub fn change_to(&self, next: &Self) -> OptionsChange {
        OptionsChange {
            dataset: self.data.active_location() != next.data.active_location(),
            visuals: self.filter != next.filter
                || self.layout != next.layout
                || self.colors != next.colors,
        }
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
        let toml_str = r#"
[filter]
positive_threshold = 0.65

[data.dataset]
simulation = "asp294his"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.filter.positive_threshold, 0.65);
        // Everything else should be default
        assert_eq!(opts.filter.negative_threshold, 0.4);
        assert_eq!(opts.data.dataset.simulation, "asp294his");
        assert_eq!(opts.data.dataset.replica, "1");
        assert_eq!(opts.layout, LayoutOptions::default());
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = Options::default();
        opts.filter = opts.filter.with_thresholds(0.1, 0.9);
        opts.save(&dir.path().join("presets/strict.toml")).unwrap();
        Options::default()
            .save(&dir.path().join("presets/default.toml"))
            .unwrap();
        std::fs::write(dir.path().join("presets/notes.txt"), "x").unwrap();

        let presets = Options::list_presets(&dir.path().join("presets"));
        assert_eq!(presets, ["default", "strict"]);
        let loaded =
            Options::load(&dir.path().join("presets/strict.toml")).unwrap();
        assert_eq!(loaded, opts);
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[filter]\nnegative_threshold = \"x\"").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(DccmError::OptionsParse(_))
        ));
    }

    #[test]
    fn change_classification() {
        let base = Options::default();
        assert!(base.change_to(&base).is_empty());

        let mut next = base.clone();
        next.filter.show_unselected_layers = false;
        assert_eq!(
            base.change_to(&next),
            OptionsChange {
                dataset: false,
                visuals: true,
            }
        );

        let mut next = base.clone();
        next.data.dataset.file_variant = "50".to_owned();
        assert_eq!(
            base.change_to(&next),
            OptionsChange {
                dataset: true,
                visuals: false,
            }
        );
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("filter"));
        assert!(props.contains_key("data"));
        assert!(props.contains_key("layout"));
        assert!(props.contains_key("colors"));

        let filter = &props["filter"]["properties"];
        assert_eq!(filter["negative_threshold"]["maximum"], 1.0);
        assert_eq!(filter["positive_threshold"]["step"], 0.05);
        assert!(filter.get("show_unselected_layers").is_some());

        // Source plumbing is not exposed to the panel
        let data = &props["data"]["properties"];
        assert!(data.get("dataset").is_some());
        assert!(data.get("catalog").is_none());
        assert!(data.get("base_url").is_none());
    }
}
