use ballstick_render::RenderStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a viewer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("surface size must be non-zero, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
}

/// Viewer configuration: surface size and render style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub style: RenderStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            style: RenderStyle::default(),
        }
    }
}

impl ViewerConfig {
    /// Load from a `.yaml`, `.yml` or `.json` file. Missing keys keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = match ext.as_str() {
            "yaml" | "yml" | "json" => std::fs::read_to_string(path)?,
            _ => return Err(ConfigError::UnsupportedFormat(ext)),
        };
        let config = if ext == "json" {
            Self::from_json(&text)?
        } else {
            Self::from_yaml(&text)?
        };
        tracing::debug!(path = %path.display(), width = config.width, height = config.height, "config loaded");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Override the surface size, keeping the style.
    pub fn with_size(mut self, width: u32, height: u32) -> Result<Self, ConfigError> {
        self.width = width;
        self.height = height;
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballstick_common::Rgba;

    #[test]
    fn defaults() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.style, RenderStyle::default());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ViewerConfig::from_yaml(
            "width: 320\nstyle:\n  bond_color: \"#102030\"\n  shadow_offset: [1.0, 2.0]\n",
        )
        .unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 600);
        assert_eq!(config.style.bond_color, Rgba::rgb(0x10, 0x20, 0x30));
        assert_eq!(config.style.shadow_offset.y, 2.0);
        assert_eq!(config.style.outline_width, RenderStyle::default().outline_width);
    }

    #[test]
    fn bad_color_is_a_yaml_error() {
        let err = ViewerConfig::from_yaml("style:\n  bond_color: \"red\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            ViewerConfig::from_json(r#"{"height": 0}"#),
            Err(ConfigError::EmptySurface { height: 0, .. })
        ));
        assert!(ViewerConfig::default().with_size(0, 10).is_err());
    }

    #[test]
    fn load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("viewer.yml");
        std::fs::write(&yaml, "height: 240\n").unwrap();
        assert_eq!(ViewerConfig::load(&yaml).unwrap().height, 240);

        let json = dir.path().join("viewer.json");
        std::fs::write(&json, r#"{"width": 100, "height": 50}"#).unwrap();
        assert_eq!(ViewerConfig::load(&json).unwrap().width, 100);

        let toml = dir.path().join("viewer.toml");
        std::fs::write(&toml, "width = 1").unwrap();
        assert!(matches!(
            ViewerConfig::load(&toml),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let config = ViewerConfig::default().with_size(64, 48).unwrap();
        let text = config.to_yaml().unwrap();
        assert_eq!(ViewerConfig::from_yaml(&text).unwrap(), config);
    }
}
