//! Configuration schema types for `fgrid.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::expand::{ExpandOptions, DEFAULT_MAX_CELLS};

/// Largest accepted PNG scale factor
pub const MAX_SCALE: u32 = 128;

/// Rendering defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Depth rendered when none is given on the command line
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Integer scale factor for PNG output
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Background color; replaces the pattern file's background when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Output directory used when no `-o` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            scale: default_scale(),
            background: None,
            out: None,
        }
    }
}

fn default_depth() -> usize {
    3
}

fn default_scale() -> u32 {
    1
}

/// Expansion engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Refuse expansions with more cells than this
    #[serde(default = "default_max_cells")]
    pub max_cells: usize,
    /// Expand independent colors of one level in parallel
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Worker threads; rayon's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cells: default_max_cells(),
            parallel: true,
            jobs: None,
        }
    }
}

fn default_max_cells() -> usize {
    DEFAULT_MAX_CELLS
}

fn default_true() -> bool {
    true
}

impl EngineConfig {
    /// Expander options for these settings.
    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions { max_cells: self.max_cells, parallel: self.parallel }
    }
}

/// Complete fgrid.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FgridConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fgrid.toml: '{}' {}", self.field, self.message)
    }
}

impl FgridConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.render.scale == 0 || self.render.scale > MAX_SCALE {
            push("render.scale", format!("must be between 1 and {}", MAX_SCALE));
        }

        if let Some(background) = &self.render.background {
            if let Err(e) = crate::color::parse_color(background) {
                push("render.background", format!("is not a valid color: {}", e));
            }
        }

        if self.engine.max_cells == 0 {
            push("engine.max_cells", "must be a positive integer".to_string());
        }

        if self.engine.jobs == Some(0) {
            push("engine.jobs", "must be a positive integer".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FgridConfig = toml::from_str("").unwrap();
        assert_eq!(config, FgridConfig::default());
        assert_eq!(config.render.depth, 3);
        assert_eq!(config.render.scale, 1);
        assert_eq!(config.engine.max_cells, DEFAULT_MAX_CELLS);
        assert!(config.engine.parallel);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_full_config() {
        let toml = r##"
[render]
depth = 5
scale = 8
background = "#000"
out = "renders"

[engine]
max_cells = 1000
parallel = false
jobs = 2
"##;
        let config: FgridConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.render.depth, 5);
        assert_eq!(config.render.scale, 8);
        assert_eq!(config.render.background.as_deref(), Some("#000"));
        assert_eq!(config.render.out, Some(PathBuf::from("renders")));
        assert_eq!(config.engine.jobs, Some(2));
        assert_eq!(
            config.engine.expand_options(),
            ExpandOptions { max_cells: 1000, parallel: false }
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_field() {
        let mut config = FgridConfig::default();
        config.render.scale = 0;
        config.render.background = Some("nope".to_string());
        config.engine.max_cells = 0;
        config.engine.jobs = Some(0);

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["render.scale", "render.background", "engine.max_cells", "engine.jobs"]
        );
    }

    #[test]
    fn test_validate_scale_upper_bound() {
        let mut config = FgridConfig::default();
        config.render.scale = MAX_SCALE;
        assert!(config.validate().is_empty());
        config.render.scale = MAX_SCALE + 1;
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_validation_error_display() {
        let error = ConfigValidationError {
            field: "render.scale".to_string(),
            message: "must be between 1 and 128".to_string(),
        };
        assert_eq!(error.to_string(), "fgrid.toml: 'render.scale' must be between 1 and 128");
    }
}
