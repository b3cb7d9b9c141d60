//! Tool configuration module.
//!
//! Handles loading and validating `pipeline-meta.toml`. Stock
//! defaults reproduce the paths the CI pipeline has always used, so the file
//! is optional; a repository only adds one when its layout differs.
//!
//! ## Precedence
//!
//! ```text
//! stock defaults  <  pipeline-meta.toml  <  command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [image]
//! registry = "ghcr.io/cloud-neutral-toolkit"  # Prefix for image references
//! output_dir = "."                            # Where image-metadata-<name>.json goes
//!
//! [media]
//! public_dir = "public"          # Root holding images/ and videos/
//! output_dir = "public/_media"   # Where images.json and videos.json go
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::image_metadata::DEFAULT_REGISTRY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILENAME: &str = "pipeline-meta.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Full tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Image metadata generator settings.
    pub image: ImageConfig,
    /// Media index generator settings.
    pub media: MediaConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Registry namespace, without trailing slash.
    pub registry: String,
    pub output_dir: PathBuf,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    pub public_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            output_dir: PathBuf::from("public/_media"),
        }
    }
}

impl ToolConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let registry = &self.image.registry;
        if registry.is_empty() {
            return Err(ConfigError::Validation(
                "image.registry must not be empty".into(),
            ));
        }
        if registry.ends_with('/') {
            return Err(ConfigError::Validation(
                "image.registry must not end with '/'".into(),
            ));
        }
        if registry.contains("://") {
            return Err(ConfigError::Validation(
                "image.registry must be a registry host/namespace, not a URL".into(),
            ));
        }
        for (key, path) in [
            ("image.output_dir", &self.image.output_dir),
            ("media.public_dir", &self.media.public_dir),
            ("media.output_dir", &self.media.output_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub registry: Option<String>,
    pub image_output_dir: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub media_output_dir: Option<PathBuf>,
}

impl Overrides {
    /// Apply the overrides on top of `config` and re-validate.
    pub fn apply(self, mut config: ToolConfig) -> Result<ToolConfig, ConfigError> {
        if let Some(registry) = self.registry {
            config.image.registry = registry;
        }
        if let Some(dir) = self.image_output_dir {
            config.image.output_dir = dir;
        }
        if let Some(dir) = self.public_dir {
            config.media.public_dir = dir;
        }
        if let Some(dir) = self.media_output_dir {
            config.media.output_dir = dir;
        }
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse config file contents, fill unset keys from stock defaults, and validate.
///
/// Every section carries `#[serde(default)]`, so a sparse file only needs the
/// keys it overrides.
pub fn parse_config(content: &str) -> Result<ToolConfig, ConfigError> {
    let config: ToolConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// With `explicit` set, that file must exist. Otherwise `pipeline-meta.toml`
/// in `cwd` is used when present and stock defaults when not.
pub fn load_config(cwd: &Path, explicit: Option<&Path>) -> Result<ToolConfig, ConfigError> {
    let path = match explicit {
        Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => cwd.join(CONFIG_FILENAME),
    };
    if !path.exists() {
        return Ok(ToolConfig::default());
    }
    parse_config(&fs::read_to_string(&path)?)
}

/// Returns a fully-commented stock `pipeline-meta.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pipeline-meta configuration
# ==========================
# All keys are optional. Values shown are the built-in defaults.
# Command-line flags override anything set here.

[image]
# Registry namespace used to build `image` and `image_with_digest`.
# No scheme, no trailing slash.
registry = "ghcr.io/cloud-neutral-toolkit"
# Directory that receives image-metadata-<name>.json.
output_dir = "."

[media]
# Root that holds the images/ and videos/ asset directories.
public_dir = "public"
# Directory that receives images.json and videos.json.
# Created automatically when missing.
output_dir = "public/_media"
"##
}
