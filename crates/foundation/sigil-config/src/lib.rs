//! # Sigil Config
//!
//! User defaults stored as YAML at `~/.config/sigil/config.yaml`.
//! A missing file means defaults; `SIGIL_*` environment variables win over
//! both.
//!
//! ```yaml
//! method: kamea
//! strict: true
//! latitude: 51.5074
//! longitude: -0.1278
//! ```

use serde::{Deserialize, Serialize};
use sigil_core::{AlphabetVariant, Intention, Method, RenderStyle, RulerMode};
use std::path::{Path, PathBuf};

pub const ENV_LATITUDE: &str = "SIGIL_LAT";
pub const ENV_LONGITUDE: &str = "SIGIL_LON";
pub const ENV_METHOD: &str = "SIGIL_METHOD";
pub const ENV_STRICT: &str = "SIGIL_STRICT";

/// Config errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Defaults applied to every generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigilConfig {
    pub method: Method,
    pub style: RenderStyle,
    pub intention: Intention,
    pub show_guides: bool,
    pub alphabet: AlphabetVariant,
    /// Force the decan ruler onto the Kamea
    pub strict: bool,
    /// Degrees north
    pub latitude: Option<f64>,
    /// Degrees east
    pub longitude: Option<f64>,
}

impl Default for SigilConfig {
    fn default() -> Self {
        Self {
            method: Method::Classical,
            style: RenderStyle::Modern,
            intention: Intention::Protection,
            show_guides: true,
            alphabet: AlphabetVariant::Latin,
            strict: false,
            latitude: None,
            longitude: None,
        }
    }
}

impl SigilConfig {
    pub fn mode(&self) -> RulerMode {
        if self.strict {
            RulerMode::Strict
        } else {
            RulerMode::Flexible
        }
    }

    /// Both coordinates, when configured
    pub fn location(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Apply `SIGIL_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_LATITUDE) {
            self.latitude = Some(parse_coordinate(ENV_LATITUDE, &value)?);
        }
        if let Some(value) = lookup(ENV_LONGITUDE) {
            self.longitude = Some(parse_coordinate(ENV_LONGITUDE, &value)?);
        }
        if let Some(value) = lookup(ENV_METHOD) {
            self.method = value.parse().map_err(|_| invalid(ENV_METHOD, &value))?;
        }
        if let Some(value) = lookup(ENV_STRICT) {
            self.strict = value != "false" && value != "0";
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_coordinate(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(key, value))
}

/// Where the config lives on disk
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// `~/.config/sigil/config.yaml`
    pub fn default_location() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sigil");
        Self {
            path: dir.join("config.yaml"),
        }
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load from disk; defaults if the file does not exist
    pub fn load(&self) -> Result<SigilConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(SigilConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let config = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), "loaded config");
        Ok(config)
    }

    /// Load from disk, then apply environment overrides
    pub fn load_effective(&self) -> Result<SigilConfig> {
        let mut config = self.load()?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn save(&self, config: &SigilConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(config)?;

        // Write to temp file first, then rename (atomic)
        let temp_path = self.path.with_extension("yaml.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &self.path)?;

        tracing::info!(path = %self.path.display(), "saved config");
        Ok(())
    }
}
