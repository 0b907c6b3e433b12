//! TOML configuration shared by the sampling and training tools.
//!
//! Config keys:
//! - `[learner]`: `eta`, `mu`, `n_feature`
//! - `[sampling]`: `n_model`, `ratio`, `seed`
//!
//! Missing keys fall back to defaults; command-line flags override both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::bagging::sampler::{DEFAULT_SAMPLER_SEED, SamplerError, StreamSampler};
use crate::ml::sgd_logreg::{DEFAULT_N_FEATURE, TrainOptions, check_hyperparameters};

/// Default filename used to store the configuration.
pub const CONFIG_FILE_NAME: &str = "lrsgd.toml";

/// Errors raised while loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to resolve config directory: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error("Invalid config value {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Aggregate configuration for both tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LrsgdConfig {
    #[serde(default)]
    pub learner: LearnerSettings,
    #[serde(default)]
    pub sampling: SamplingSettings,
}

/// Hyperparameters applied to every ensemble member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerSettings {
    /// Gradient step size.
    #[serde(default = "default_eta")]
    pub eta: f64,
    /// Decay strength; zero disables it.
    #[serde(default)]
    pub mu: f64,
    /// Weight vector length; every feature index must be below it.
    #[serde(default = "default_n_feature")]
    pub n_feature: usize,
}

impl Default for LearnerSettings {
    fn default() -> Self {
        Self {
            eta: default_eta(),
            mu: 0.0,
            n_feature: default_n_feature(),
        }
    }
}

/// Controls how the input stream is split across ensemble members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingSettings {
    #[serde(default = "default_n_model")]
    pub n_model: usize,
    /// Fraction of the draw space selected per model, in `[0, 1]`.
    #[serde(default = "default_ratio")]
    pub ratio: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            n_model: default_n_model(),
            ratio: default_ratio(),
            seed: default_seed(),
        }
    }
}

fn default_eta() -> f64 {
    0.1
}

fn default_n_feature() -> usize {
    DEFAULT_N_FEATURE
}

fn default_n_model() -> usize {
    10
}

fn default_ratio() -> f64 {
    0.5
}

fn default_seed() -> u64 {
    DEFAULT_SAMPLER_SEED
}

impl LrsgdConfig {
    /// Check value ranges for both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_hyperparameters(self.learner.eta, self.learner.mu).map_err(|err| {
            ConfigError::Invalid {
                key: "learner",
                reason: err.to_string(),
            }
        })?;
        if self.learner.n_feature == 0 {
            return Err(ConfigError::Invalid {
                key: "learner.n_feature",
                reason: "must be at least 1".to_string(),
            });
        }
        self.sampler().map(|_| ()).map_err(|err| ConfigError::Invalid {
            key: "sampling",
            reason: err.to_string(),
        })
    }

    /// Training options derived from the `[learner]` section.
    pub fn train_options(&self, strict: bool) -> TrainOptions {
        TrainOptions {
            eta: self.learner.eta,
            mu: self.learner.mu,
            n_feature: self.learner.n_feature,
            strict,
        }
    }

    /// A sampler built from the `[sampling]` section.
    pub fn sampler(&self) -> Result<StreamSampler, SamplerError> {
        StreamSampler::new(self.sampling.n_model, self.sampling.ratio, self.sampling.seed)
    }
}

/// Resolve the default configuration file path.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the default configuration file, returning defaults if it is missing.
pub fn load_or_default() -> Result<LrsgdConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!("No config at {}; using defaults", path.display());
        return Ok(LrsgdConfig::default());
    }
    load_from(&path)
}

/// Load configuration from a specific TOML file.
pub fn load_from(path: &Path) -> Result<LrsgdConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Save configuration to a specific path, creating parent directories as needed.
pub fn save_to_path(config: &LrsgdConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
