//! Configuration loading and discovery for `fgrid.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::FgridConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "fgrid.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse fgrid.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override default depth
    pub depth: Option<usize>,
    /// Override scale factor
    pub scale: Option<u32>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override parallel expansion
    pub parallel: Option<bool>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Find fgrid.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for fgrid.toml
/// 2. Check XDG_CONFIG_HOME/fractgrid/fgrid.toml (or ~/.config/fractgrid/fgrid.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find fgrid.toml in XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("fractgrid").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find fgrid.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a fgrid.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate one. With no config file the defaults apply.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("renders/fgrid.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<FgridConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => Ok(FgridConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<FgridConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: FgridConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut FgridConfig, overrides: &CliOverrides) {
    if let Some(depth) = overrides.depth {
        config.render.depth = depth;
    }
    if let Some(scale) = overrides.scale {
        config.render.scale = scale;
    }
    if let Some(ref out) = overrides.out {
        config.render.out = Some(out.clone());
    }
    if let Some(parallel) = overrides.parallel {
        config.engine.parallel = parallel;
    }
    if let Some(jobs) = overrides.jobs {
        config.engine.jobs = Some(jobs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[render]\ndepth = 2\n");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let subdir = temp.path().join("patterns").join("carpets");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    #[serial]
    fn test_find_xdg_config() {
        let temp = TempDir::new().expect("should create temp dir");
        let dir = temp.path().join("fractgrid");
        fs::create_dir_all(&dir).expect("should create xdg dir");
        let config_path = write_config(&dir, "");

        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", temp.path());
        let found = find_xdg_config();
        match previous {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[render]\ndepth = 4\nscale = 2\n");

        let config = load_config(Some(&config_path)).expect("should load config");
        assert_eq!(config.render.depth, 4);
        assert_eq!(config.render.scale, 2);
        assert!(config.engine.parallel);
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[render\ndepth = ");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[render]\nscale = 0\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("render.scale"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = FgridConfig::default();
        let overrides = CliOverrides {
            depth: Some(6),
            scale: Some(4),
            out: Some(PathBuf::from("dist")),
            parallel: Some(false),
            jobs: Some(3),
        };

        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.render.depth, 6);
        assert_eq!(config.render.scale, 4);
        assert_eq!(config.render.out, Some(PathBuf::from("dist")));
        assert!(!config.engine.parallel);
        assert_eq!(config.engine.jobs, Some(3));
    }

    #[test]
    fn test_merge_cli_overrides_empty_keeps_config() {
        let mut config = FgridConfig::default();
        config.render.depth = 2;
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert_eq!(config, FgridConfig { render: config.render.clone(), ..Default::default() });
        assert_eq!(config.render.depth, 2);
    }
}
