// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration (RON).

use glslgen_editor_graph::GraphLayout;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable naming an optional RON config file
pub const CONFIG_ENV_VAR: &str = "GLSLGEN_CONFIG";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Path that failed
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid RON for [`EditorConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Unknown key name for the add-node command
    #[error("Unknown key name: {0}")]
    UnknownKey(String),

    /// Target frame rate must be positive
    #[error("Invalid target fps: {0}")]
    InvalidFps(u32),

    /// Window size must be non-zero in both dimensions
    #[error("Invalid window size: {0}x{1}")]
    InvalidWindowSize(u32, u32),

    /// Layout geometry must be finite and positive
    #[error("Invalid layout {field}: {value}")]
    InvalidLayout {
        /// Offending field
        field: &'static str,
        /// Rejected value
        value: f32,
    },
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Window title
    pub title: String,
    /// Window inner size (logical pixels)
    pub window_size: [u32; 2],
    /// Frames per second the loop is paced to
    pub target_fps: u32,
    /// Name of the key that adds a node (egui key name, e.g. "Space", "A")
    pub create_key: String,
    /// Node and pin geometry
    pub layout: GraphLayout,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title: "GLSL Generator".to_string(),
            window_size: [800, 450],
            target_fps: 60,
            create_key: "Space".to_string(),
            layout: GraphLayout::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a RON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or use defaults if unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                tracing::info!("Loading config from {:?}", path);
                Self::load(Path::new(&path))
            }
            None => Ok(Self::default()),
        }
    }

    /// Resolve the add-node key
    pub fn create_key(&self) -> Result<egui::Key, ConfigError> {
        egui::Key::from_name(&self.create_key).ok_or_else(|| ConfigError::UnknownKey(self.create_key.clone()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::InvalidFps(self.target_fps));
        }
        let [width, height] = self.window_size;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidWindowSize(width, height));
        }

        let layout = &self.layout;
        let fields = [
            ("node_size.x", layout.node_size[0]),
            ("node_size.y", layout.node_size[1]),
            ("pin_spacing", layout.pin_spacing),
            ("pin_hit_radius", layout.pin_hit_radius),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::InvalidLayout { field, value });
        }

        self.create_key()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.title, "GLSL Generator");
        assert_eq!(config.window_size, [800, 450]);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.create_key().unwrap(), egui::Key::Space);
        assert_eq!(config.layout, GraphLayout::default());
    }

    #[test]
    fn test_partial_document() {
        let config = EditorConfig::from_ron_str(r#"(target_fps: 30, create_key: "N", layout: (pin_spacing: 25.0))"#).unwrap();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.create_key().unwrap(), egui::Key::N);
        assert_eq!(config.layout.pin_spacing, 25.0);
        assert_eq!(config.layout.node_size, [100.0, 100.0]);
        assert_eq!(config.title, "GLSL Generator");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EditorConfig::from_ron_str(r#"(create_key: "NotAKey")"#),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            EditorConfig::from_ron_str("(target_fps: 0)"),
            Err(ConfigError::InvalidFps(0))
        ));
        assert!(matches!(EditorConfig::from_ron_str("(title: 3"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            EditorConfig::from_ron_str("(window_size: (0, 0))"),
            Err(ConfigError::InvalidWindowSize(0, 0))
        ));
        assert!(matches!(
            EditorConfig::from_ron_str("(window_size: (800, 0))"),
            Err(ConfigError::InvalidWindowSize(800, 0))
        ));
    }

    #[test]
    fn test_rejects_bad_layout() {
        let cases = [
            ("(layout: (pin_hit_radius: -1.0))", "pin_hit_radius"),
            ("(layout: (pin_hit_radius: 0.0))", "pin_hit_radius"),
            ("(layout: (pin_spacing: 0.0))", "pin_spacing"),
            ("(layout: (node_size: (0.0, 100.0)))", "node_size.x"),
            ("(layout: (node_size: (100.0, -5.0)))", "node_size.y"),
        ];
        for (source, expected) in cases {
            match EditorConfig::from_ron_str(source) {
                Err(ConfigError::InvalidLayout { field, .. }) => assert_eq!(field, expected, "{source}"),
                other => panic!("{source}: expected InvalidLayout, got {other:?}"),
            }
        }

        let mut config = EditorConfig::default();
        config.layout.pin_spacing = f32::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLayout { field: "pin_spacing", .. })));
        config.layout.pin_spacing = 30.0;
        config.layout.pin_hit_radius = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLayout { field: "pin_hit_radius", .. })));

        let custom = EditorConfig::from_ron_str("(layout: (node_size: (80.0, 60.0), pin_hit_radius: 4.0))").unwrap();
        assert_eq!(custom.layout.node_size, [80.0, 60.0]);
    }
}
