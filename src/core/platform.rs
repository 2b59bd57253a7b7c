//! Platform and SDK catalog.
//!
//! A [`TargetPlatform`] is what the user asks for (`ios`, `macos`, ...). Each
//! platform is built as one or more [`Sdk`] slices, and every SDK knows the
//! destination string, archive name, and products folder `xcodebuild` uses
//! for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::build_config::BuildConfiguration;

/// A platform an XCFramework can contain slices for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetPlatform {
    Ios,
    Macos,
    MacCatalyst,
    Tvos,
    Watchos,
    Visionos,
}

impl TargetPlatform {
    /// Every supported platform, in declaration order.
    pub const ALL: [TargetPlatform; 6] = [
        TargetPlatform::Ios,
        TargetPlatform::Macos,
        TargetPlatform::MacCatalyst,
        TargetPlatform::Tvos,
        TargetPlatform::Watchos,
        TargetPlatform::Visionos,
    ];

    /// Platforms built when neither the user nor the package names any.
    ///
    /// Mac Catalyst is opt-in.
    pub fn defaults() -> Vec<TargetPlatform> {
        Self::ALL
            .into_iter()
            .filter(|p| *p != TargetPlatform::MacCatalyst)
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Ios => "ios",
            TargetPlatform::Macos => "macos",
            TargetPlatform::MacCatalyst => "maccatalyst",
            TargetPlatform::Tvos => "tvos",
            TargetPlatform::Watchos => "watchos",
            TargetPlatform::Visionos => "visionos",
        }
    }

    /// Whether a platform declared in a package manifest covers this platform.
    pub fn matches_manifest_platform(&self, platform_name: &str) -> bool {
        let name = platform_name.to_ascii_lowercase();
        match self {
            TargetPlatform::MacCatalyst => name == "maccatalyst" || name == "ios",
            // xros is the SDK-level spelling used by some manifests
            TargetPlatform::Visionos => name == "visionos" || name == "xros",
            other => name == other.as_str(),
        }
    }

    /// The SDK slices built for this platform, device first.
    pub fn sdks(&self) -> &'static [Sdk] {
        match self {
            TargetPlatform::Ios => &[Sdk::IphoneOs, Sdk::IphoneSimulator],
            TargetPlatform::Macos => &[Sdk::MacOs],
            TargetPlatform::MacCatalyst => &[Sdk::MacCatalyst],
            TargetPlatform::Tvos => &[Sdk::AppleTvOs, Sdk::AppleTvSimulator],
            TargetPlatform::Watchos => &[Sdk::WatchOs, Sdk::WatchSimulator],
            TargetPlatform::Visionos => &[Sdk::XrOs, Sdk::XrSimulator],
        }
    }

    /// Accepted names joined with `|`, for help text.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(TargetPlatform::Ios),
            "macos" => Ok(TargetPlatform::Macos),
            "maccatalyst" => Ok(TargetPlatform::MacCatalyst),
            "tvos" => Ok(TargetPlatform::Tvos),
            "watchos" => Ok(TargetPlatform::Watchos),
            "visionos" | "xros" => Ok(TargetPlatform::Visionos),
            _ => Err(format!(
                "unknown platform '{}'; expected one of {}",
                s,
                TargetPlatform::names()
            )),
        }
    }
}

impl TryFrom<String> for TargetPlatform {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetPlatform> for String {
    fn from(platform: TargetPlatform) -> Self {
        platform.as_str().to_string()
    }
}

/// One buildable slice of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sdk {
    IphoneOs,
    IphoneSimulator,
    MacOs,
    MacCatalyst,
    AppleTvOs,
    AppleTvSimulator,
    WatchOs,
    WatchSimulator,
    XrOs,
    XrSimulator,
}

impl Sdk {
    pub const ALL: [Sdk; 10] = [
        Sdk::IphoneOs,
        Sdk::IphoneSimulator,
        Sdk::MacOs,
        Sdk::MacCatalyst,
        Sdk::AppleTvOs,
        Sdk::AppleTvSimulator,
        Sdk::WatchOs,
        Sdk::WatchSimulator,
        Sdk::XrOs,
        Sdk::XrSimulator,
    ];

    /// The `-destination` value selecting this SDK.
    pub fn destination(&self) -> &'static str {
        match self {
            Sdk::IphoneOs => "generic/platform=iOS",
            Sdk::IphoneSimulator => "generic/platform=iOS Simulator",
            Sdk::MacOs => "generic/platform=macOS,name=Any Mac",
            Sdk::MacCatalyst => "generic/platform=macOS,variant=Mac Catalyst",
            Sdk::AppleTvOs => "generic/platform=tvOS",
            Sdk::AppleTvSimulator => "generic/platform=tvOS Simulator",
            Sdk::WatchOs => "generic/platform=watchOS",
            Sdk::WatchSimulator => "generic/platform=watchOS Simulator",
            Sdk::XrOs => "generic/platform=visionOS",
            Sdk::XrSimulator => "generic/platform=visionOS Simulator",
        }
    }

    /// Directory name of this SDK's archive under the target's build folder.
    pub fn archive_name(&self) -> &'static str {
        match self {
            Sdk::IphoneOs => "iphoneos.xcarchive",
            Sdk::IphoneSimulator => "iphonesimulator.xcarchive",
            Sdk::MacOs => "macos.xcarchive",
            Sdk::MacCatalyst => "maccatalyst.xcarchive",
            Sdk::AppleTvOs => "appletvos.xcarchive",
            Sdk::AppleTvSimulator => "appletvsimulator.xcarchive",
            Sdk::WatchOs => "watchos.xcarchive",
            Sdk::WatchSimulator => "watchsimulator.xcarchive",
            Sdk::XrOs => "xros.xcarchive",
            Sdk::XrSimulator => "xrsimulator.xcarchive",
        }
    }

    /// Suffix xcodebuild appends to the configuration name for this SDK's
    /// products folder. macOS has none.
    fn products_suffix(&self) -> &'static str {
        match self {
            Sdk::IphoneOs => "-iphoneos",
            Sdk::IphoneSimulator => "-iphonesimulator",
            Sdk::MacOs => "",
            Sdk::MacCatalyst => "-maccatalyst",
            Sdk::AppleTvOs => "-appletvos",
            Sdk::AppleTvSimulator => "-appletvsimulator",
            Sdk::WatchOs => "-watchos",
            Sdk::WatchSimulator => "-watchsimulator",
            Sdk::XrOs => "-xros",
            Sdk::XrSimulator => "-xrsimulator",
        }
    }

    /// Products folder under `BUILD_DIR`, e.g. `Release-iphoneos`.
    pub fn release_folder(&self, configuration: BuildConfiguration) -> String {
        format!("{}{}", configuration.xcode_name(), self.products_suffix())
    }

    /// Build settings forced for every archive of this SDK.
    pub fn build_settings(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Sdk::MacCatalyst => &[("SUPPORTS_MACCATALYST", "YES")],
            _ => &[],
        }
    }

    /// The platform this SDK belongs to.
    pub fn platform(&self) -> TargetPlatform {
        match self {
            Sdk::IphoneOs | Sdk::IphoneSimulator => TargetPlatform::Ios,
            Sdk::MacOs => TargetPlatform::Macos,
            Sdk::MacCatalyst => TargetPlatform::MacCatalyst,
            Sdk::AppleTvOs | Sdk::AppleTvSimulator => TargetPlatform::Tvos,
            Sdk::WatchOs | Sdk::WatchSimulator => TargetPlatform::Watchos,
            Sdk::XrOs | Sdk::XrSimulator => TargetPlatform::Visionos,
        }
    }
}

/// Flatten platforms into the SDK build order: platform order, then SDK order.
pub fn sdks_for(platforms: &[TargetPlatform]) -> Vec<Sdk> {
    platforms.iter().flat_map(|p| p.sdks().iter().copied()).collect()
}
