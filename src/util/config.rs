//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.create-xcframework/config.toml` - User-wide defaults
//! - Project: `<package>/.create-xcframework/config.toml` - Package-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::build_config::{BuildConfiguration, BuildSetting};
use crate::core::platform::TargetPlatform;

/// Directory holding the config file, under home and under the package.
pub const CONFIG_DIR: &str = ".create-xcframework";

/// Tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Distribution packaging settings
    pub package: PackageConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default configuration (debug, release)
    pub configuration: Option<BuildConfiguration>,

    /// Platforms to build for
    pub platforms: Vec<TargetPlatform>,

    /// Library products to build
    pub products: Vec<String>,

    /// Build/cache directory, relative to the package
    pub build_path: Option<PathBuf>,

    /// Output directory for xcframeworks
    pub output: Option<PathBuf>,

    pub stack_evolution: Option<bool>,

    pub debug_symbols: Option<bool>,

    /// Clean before building
    pub clean: Option<bool>,

    /// xcconfig applied to archive builds
    pub xcconfig: Option<String>,

    /// Extra `NAME=VALUE` build settings
    pub xc_settings: Vec<BuildSetting>,
}

/// Packaging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Zip each xcframework
    pub zip: Option<bool>,

    /// Version appended to zip names
    pub zip_version: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let build = other.build;
        if build.configuration.is_some() {
            self.build.configuration = build.configuration;
        }
        if !build.platforms.is_empty() {
            self.build.platforms = build.platforms;
        }
        if !build.products.is_empty() {
            self.build.products = build.products;
        }
        if build.build_path.is_some() {
            self.build.build_path = build.build_path;
        }
        if build.output.is_some() {
            self.build.output = build.output;
        }
        if build.stack_evolution.is_some() {
            self.build.stack_evolution = build.stack_evolution;
        }
        if build.debug_symbols.is_some() {
            self.build.debug_symbols = build.debug_symbols;
        }
        if build.clean.is_some() {
            self.build.clean = build.clean;
        }
        if build.xcconfig.is_some() {
            self.build.xcconfig = build.xcconfig;
        }
        if !build.xc_settings.is_empty() {
            self.build.xc_settings = build.xc_settings;
        }

        if other.package.zip.is_some() {
            self.package.zip = other.package.zip;
        }
        if other.package.zip_version.is_some() {
            self.package.zip_version = other.package.zip_version;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`<package>/.create-xcframework/config.toml`)
/// 2. Global config (`~/.create-xcframework/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (`~/.create-xcframework`).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (`~/.create-xcframework/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`<package>/.create-xcframework/config.toml`).
pub fn project_config_path(package_dir: &Path) -> PathBuf {
    package_dir.join(CONFIG_DIR).join("config.toml")
}
