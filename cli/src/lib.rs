use scan::{ColorConfig, DetectorConfig, OcrPrepConfig, ScanManager};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Settings for every scan operation; all sections are optional in files
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    pub detector: DetectorConfig,
    pub color: ColorConfig,
    pub ocr: OcrPrepConfig,
}

enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFileFormat),
        }
    }
}

impl ScanConfig {
    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        match format {
            ConfigFormat::Toml => Self::from_toml(&content),
            ConfigFormat::Json => Self::from_json(&content),
        }
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert configuration to JSON string
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Save configuration, format chosen by extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => self.to_toml()?,
            ConfigFormat::Json => self.to_json()?,
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Manager wired with these settings
    pub fn manager(&self) -> ScanManager {
        ScanManager::from_configs(&self.detector, self.color.clone(), self.ocr.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ScanConfig::from_toml(
            r#"
            [detector]
            min_area = 300
            "#,
        )
        .expect("Should parse TOML");

        assert_eq!(config.detector.min_area, 300);
        assert_eq!(config.detector.area_tolerance, 200);
        assert_eq!(config.color, ColorConfig::default());
        assert_eq!(config.ocr.target_width, 1200);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = ScanConfig::from_json("{}").expect("Should parse JSON");
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ScanConfig::default();
        config.ocr.threshold = 90;
        config.color.target_samples_per_axis = 50;

        let toml = config.to_toml().expect("Should serialize");
        assert_eq!(ScanConfig::from_toml(&toml).expect("Should parse"), config);
    }

    #[test]
    fn test_file_formats() {
        let dir = std::env::temp_dir().join(format!("imagescan-config-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("Should create temp dir");

        let config = ScanConfig {
            detector: DetectorConfig { min_area: 42, area_tolerance: 7 },
            ..Default::default()
        };

        for name in ["scan.toml", "scan.json"] {
            let path = dir.join(name);
            config.to_file(&path).expect("Should write config");
            assert_eq!(ScanConfig::from_file(&path).expect("Should read config"), config);
        }

        assert!(matches!(
            config.to_file(dir.join("scan.yaml")),
            Err(ConfigError::UnsupportedFileFormat)
        ));
        assert!(matches!(
            ScanConfig::from_file(dir.join("scan.yaml")),
            Err(ConfigError::UnsupportedFileFormat)
        ));

        fs::remove_dir_all(&dir).expect("Should clean up");
    }

    #[test]
    fn test_load_or_default() {
        let config = ScanConfig::load_or_default(None::<&Path>).expect("Should default");
        assert_eq!(config, ScanConfig::default());
    }
}
