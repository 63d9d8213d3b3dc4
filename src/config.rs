//! File configuration for the `nanoid` tool.
//!
//! Every section is optional; command-line flags override file values.

use crate::entropy::Backend;
use crate::generator::{Alphabet, AlphabetError, DEFAULT_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Symbols per identifier.
    pub length: usize,
    /// Custom alphabet; the default alphabet when unset.
    pub alphabet: Option<String>,
    /// Pinned entropy backend; the best available when unset.
    pub backend: Option<Backend>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_SIZE,
            alphabet: None,
            backend: None,
        }
    }
}

impl GenerateConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length == 0 {
            return Err(ConfigError::InvalidLength);
        }
        if let Some(alphabet) = &self.alphabet {
            Alphabet::new(alphabet.as_bytes())?;
        }
        if let Some(backend) = self.backend {
            if !backend.is_available() {
                return Err(ConfigError::UnavailableBackend(backend));
            }
        }
        Ok(())
    }

    /// The alphabet as bytes, if one is set.
    pub fn alphabet_bytes(&self) -> Option<&[u8]> {
        self.alphabet.as_deref().map(str::as_bytes)
    }
}

/// Speed test settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Timed iterations.
    pub count: usize,
    /// Untimed warm-up iterations; `count / 10` when unset.
    pub burnin: Option<usize>,
    /// Symbols per identifier.
    pub length: usize,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            count: 1_000_000,
            burnin: None,
            length: DEFAULT_SIZE,
        }
    }
}

impl SpeedConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::InvalidCount);
        }
        if self.burnin == Some(0) {
            return Err(ConfigError::InvalidBurnin);
        }
        if self.length == 0 {
            return Err(ConfigError::InvalidLength);
        }
        Ok(())
    }

    /// Burn-in iterations to run.
    pub fn effective_burnin(&self) -> usize {
        self.burnin.unwrap_or(self.count / 10)
    }
}

/// Uniformity check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Identifiers to sample.
    pub samples: usize,
    /// Symbols per identifier.
    pub length: usize,
    /// Alphabet under test; the default alphabet when unset.
    pub alphabet: Option<String>,
    /// Significance level (0 to 1, exclusive).
    pub alpha: f64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            samples: 100_000,
            length: 20,
            alphabet: None,
            alpha: 0.05,
        }
    }
}

impl CheckConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::InvalidCount);
        }
        if self.length == 0 {
            return Err(ConfigError::InvalidLength);
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if let Some(alphabet) = &self.alphabet {
            Alphabet::new(alphabet.as_bytes())?;
        }
        Ok(())
    }

    /// The alphabet as bytes, if one is set.
    pub fn alphabet_bytes(&self) -> Option<&[u8]> {
        self.alphabet.as_deref().map(str::as_bytes)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Length is zero.
    #[error("invalid length (must be at least 1)")]
    InvalidLength,
    /// Speed test count is zero.
    #[error("invalid count (must be at least 1)")]
    InvalidCount,
    /// Burn-in is zero.
    #[error("invalid burn-in (must be at least 1)")]
    InvalidBurnin,
    /// Significance level outside (0, 1).
    #[error("invalid significance level {0} (must be between 0 and 1)")]
    InvalidAlpha(f64),
    /// The alphabet failed validation.
    #[error("invalid alphabet: {0}")]
    Alphabet(#[from] AlphabetError),
    /// The pinned backend is not compiled in for this target.
    #[error("entropy backend {0} is not available on this platform")]
    UnavailableBackend(Backend),
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[generate]` section.
    #[serde(default)]
    pub generate: GenerateConfig,
    /// `[speed]` section.
    #[serde(default)]
    pub speed: SpeedConfig,
    /// `[check]` section.
    #[serde(default)]
    pub check: CheckConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generate.validate()?;
        self.speed.validate()?;
        self.check.validate()
    }
}
