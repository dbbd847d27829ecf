//! Configuration file support for the BMI calculator.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/bmi/config.toml`.

use crate::bands::BandScheme;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Which banding scheme the classifier uses
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub scheme: BandScheme,
}

/// In-session history configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

/// Inclusive numeric range used to clamp inputs
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range. Non-finite values pass through unchanged.
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        value.max(self.min).min(self.max)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min <= 0.0 {
            return Err(Error::Config(format!(
                "limits.{} must be finite and positive",
                name
            )));
        }
        if self.min > self.max {
            return Err(Error::Config(format!(
                "limits.{}: min {} is greater than max {}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Clamp ranges applied to user input before classification
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    #[serde(default = "default_weight_range")]
    pub weight: Range,

    #[serde(default = "default_height_range")]
    pub height: Range,

    #[serde(default = "default_age_range")]
    pub age: Range,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            weight: default_weight_range(),
            height: default_height_range(),
            age: default_age_range(),
        }
    }
}

/// Report export configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

// Default value functions
fn default_history_capacity() -> usize {
    10
}

fn default_weight_range() -> Range {
    Range::new(30.0, 200.0)
}

fn default_height_range() -> Range {
    Range::new(112.0, 190.0)
}

fn default_age_range() -> Range {
    Range::new(15.0, 100.0)
}

fn default_export_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("bmi").join("reports")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("bmi").join("config.toml")
    }

    /// Check values that serde cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.history.capacity == 0 {
            return Err(Error::Config(
                "history.capacity must be at least 1".into(),
            ));
        }
        self.limits.weight.validate("weight")?;
        self.limits.height.validate("height")?;
        self.limits.age.validate("age")?;
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.classifier.scheme, BandScheme::FourBand);
        assert_eq!(config.limits.weight, Range::new(30.0, 200.0));
        assert_eq!(config.limits.height, Range::new(112.0, 190.0));
        assert_eq!(config.limits.age, Range::new(15.0, 100.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.classifier.scheme = BandScheme::SixBand;
        config.history.capacity = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[classifier]
scheme = "six_band"

[limits.weight]
min = 30.0
max = 300.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.classifier.scheme, BandScheme::SixBand);
        assert_eq!(config.limits.weight.max, 300.0);
        assert_eq!(config.limits.height, Range::new(112.0, 190.0)); // default
        assert_eq!(config.history.capacity, 10); // default
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[history]\ncapacity = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut config = Config::default();
        config.limits.height = Range::new(190.0, 112.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_range_clamp() {
        let r = Range::new(30.0, 200.0);
        assert_eq!(r.clamp(10.0), 30.0);
        assert_eq!(r.clamp(250.0), 200.0);
        assert_eq!(r.clamp(72.5), 72.5);
        assert!(r.clamp(f64::NAN).is_nan());
    }
}
