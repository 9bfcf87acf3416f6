// config.rs — 查看器配置（JSON 文件 + 命令行覆盖）

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::input::DEFAULT_DRAG_SENSITIVITY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Every field is optional in the file; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub image_path: PathBuf,
    pub lang: String,
    pub drag_sensitivity: f32,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("images").join("panorama.jpg"),
            lang: "en".to_string(),
            drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
            window_width: 1280,
            window_height: 720,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command-line values on top of the file/default values.
    pub fn with_overrides(mut self, image: Option<PathBuf>, lang: Option<String>) -> Self {
        if let Some(image) = image {
            self.image_path = image;
        }
        if let Some(lang) = lang.filter(|l| !l.trim().is_empty()) {
            self.lang = lang;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{ "image_path": "rooms/gym.jpg", "drag_sensitivity": 0.2 }"#)
            .unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.image_path, PathBuf::from("rooms/gym.jpg"));
        assert_eq!(config.drag_sensitivity, 0.2);
        assert_eq!(config.lang, "en");
        assert_eq!((config.window_width, config.window_height), (1280, 720));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewerConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, "{ image_path: ").unwrap();
        assert!(matches!(
            ViewerConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = ViewerConfig::default()
            .with_overrides(Some(PathBuf::from("a.jpg")), Some("  ".to_string()));
        assert_eq!(config.image_path, PathBuf::from("a.jpg"));
        assert_eq!(config.lang, "en");

        let config = config.with_overrides(None, Some("zh-Hans".to_string()));
        assert_eq!(config.image_path, PathBuf::from("a.jpg"));
        assert_eq!(config.lang, "zh-Hans");
    }
}
