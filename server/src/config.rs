//! Server configuration, read from `tollgate.toml`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tollgate_license::LicenseSource;

/// Where the license file comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Inline license file contents.
    #[serde(default)]
    pub contents: String,
    /// Path to a license file, relative to the configuration file. Takes
    /// precedence over `contents`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default)]
    pub license: LicenseConfig,
}

fn default_http_port() -> u16 {
    4100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            license: LicenseConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration file at `path`. A relative `license.path` is
    /// resolved against the config file's directory but not read; see
    /// [`ServerConfig::read_license`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Some(license_path) = config.license.path.take() {
            config.license.path = Some(match path.parent() {
                Some(dir) if license_path.is_relative() => dir.join(license_path),
                _ => license_path,
            });
        }

        Ok(config)
    }

    /// Reads `license.path`, if set, into `license.contents`. On failure the
    /// contents are left untouched.
    pub fn read_license(&mut self) -> Result<()> {
        if let Some(license_path) = &self.license.path {
            self.license.contents = fs::read_to_string(license_path).with_context(|| {
                format!("Failed to read license file {}", license_path.display())
            })?;
        }
        Ok(())
    }
}

impl LicenseSource for ServerConfig {
    fn license_file(&self) -> String {
        self.license.contents.clone()
    }
}
