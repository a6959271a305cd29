//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/gvtree/gvtree.toml`
//! 3. Local config: `<project_dir>/.gvtree.toml`
//! 4. Environment variables: `GVTREE_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Direction, DotStyle};

/// Raw render settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub layer_space: Option<f64>,
    pub edge_color: Option<String>,
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so that a layer only overrides what it names.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub delimiter: Option<String>,
    pub cutoff: Option<f64>,
    pub layer_max: Option<i64>,
    pub direction: Option<Direction>,
    pub output_dir: Option<PathBuf>,
    pub render: RawRenderConfig,
}

/// Unified configuration for gvtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Edge-list field separator by name (default: whitespace)
    pub delimiter: String,
    /// Minimum edge weight (default: 0.0)
    pub cutoff: f64,
    /// Number of layers to grow (default: 3)
    pub layer_max: i64,
    /// Search direction (default: up)
    pub direction: Direction,
    /// Directory that relative output paths resolve against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// DOT / image cosmetics
    pub render: DotStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiter: "whitespace".into(),
            cutoff: 0.0,
            layer_max: 3,
            direction: Direction::Up,
            output_dir: None,
            render: DotStyle::default(),
        }
    }
}

/// Get the XDG config directory for gvtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gvtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("gvtree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".gvtree.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where it is set.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            delimiter: overlay
                .delimiter
                .clone()
                .unwrap_or_else(|| self.delimiter.clone()),
            cutoff: overlay.cutoff.unwrap_or(self.cutoff),
            layer_max: overlay.layer_max.unwrap_or(self.layer_max),
            direction: overlay.direction.unwrap_or(self.direction),
            output_dir: overlay.output_dir.clone().or_else(|| self.output_dir.clone()),
            render: DotStyle {
                layer_space: overlay.render.layer_space.unwrap_or(self.render.layer_space),
                edge_color: overlay
                    .render
                    .edge_color
                    .clone()
                    .unwrap_or_else(|| self.render.edge_color.clone()),
            },
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.output_dir = self.output_dir.as_deref().map(expand_path);
    }

    /// Resolve an output path against `output_dir` when it is relative.
    pub fn resolve_output(&self, path: &Path) -> PathBuf {
        let path = expand_path(path);
        match &self.output_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.gvtree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/gvtree/gvtree.toml`
    /// 3. Local config: `<project_dir>/.gvtree.toml`
    /// 4. Environment variables: `GVTREE_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        let local = project_dir.map(local_config_path);

        let current = Self::load_from(global.as_deref(), local.as_deref())?;
        let mut current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Merge config files over the compiled defaults, later files winning.
    ///
    /// Files that do not exist are skipped. Environment variables are not consulted.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();
        for path in [global, local].into_iter().flatten() {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }
        Ok(current)
    }

    /// Apply GVTREE_* environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore: `GVTREE_RENDER__EDGE_COLOR`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("GVTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("delimiter") {
            settings.delimiter = val;
        }
        if let Ok(val) = config.get_float("cutoff") {
            settings.cutoff = val;
        }
        if let Ok(val) = config.get_int("layer_max") {
            settings.layer_max = val;
        }
        if let Ok(val) = config.get_string("direction") {
            settings.direction = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("GVTREE_DIRECTION: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_float("render.layer_space") {
            settings.render.layer_space = val;
        }
        if let Ok(val) = config.get_string("render.edge_color") {
            settings.render.edge_color = val;
        }

        Ok(settings)
    }

    /// Render the settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}

/// Commented template written by `gvtree config init`.
pub fn config_template() -> String {
    r#"# gvtree configuration
#
# Field separator of edge-list files: whitespace, tab, comma, semicolon,
# space, pipe, or any literal string.
# delimiter = "whitespace"

# Minimum edge weight kept in the graph.
# cutoff = 0.0

# Number of layers to grow from the root.
# layer_max = 3

# Search direction: "up" follows incoming edges, "down" outgoing ones.
# direction = "up"

# Directory that relative --output/--image paths resolve against.
# output_dir = "~/trees"

[render]
# Space between layers in DOT output.
# layer_space = 3.0
# edge_color = "crimson"
"#
    .to_string()
}
