//! Build configuration and user-supplied build settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which named configuration xcodebuild builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfiguration {
    Debug,
    #[default]
    Release,
}

impl BuildConfiguration {
    /// The configuration name as Xcode spells it.
    pub fn xcode_name(&self) -> &'static str {
        match self {
            BuildConfiguration::Debug => "Debug",
            BuildConfiguration::Release => "Release",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildConfiguration::Debug => f.write_str("debug"),
            BuildConfiguration::Release => f.write_str("release"),
        }
    }
}

impl FromStr for BuildConfiguration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildConfiguration::Debug),
            "release" => Ok(BuildConfiguration::Release),
            _ => Err(format!(
                "invalid configuration '{}'; expected 'debug' or 'release'",
                s
            )),
        }
    }
}

/// A build setting passed straight to xcodebuild, e.g.
/// `IPHONEOS_DEPLOYMENT_TARGET=13.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BuildSetting {
    /// The name of the build setting, e.g. `IPHONEOS_DEPLOYMENT_TARGET`
    pub name: String,
    /// The value of the build setting
    pub value: String,
}

impl BuildSetting {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        BuildSetting {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for BuildSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl FromStr for BuildSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('=').collect();
        match parts.as_slice() {
            [name, value] if !name.trim().is_empty() => {
                Ok(BuildSetting::new(name.trim(), value.trim()))
            }
            _ => Err(format!(
                "invalid build setting '{}'; expected NAME=VALUE",
                s
            )),
        }
    }
}

impl TryFrom<String> for BuildSetting {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BuildSetting> for String {
    fn from(setting: BuildSetting) -> Self {
        setting.to_string()
    }
}
