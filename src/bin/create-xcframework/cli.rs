//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use create_xcframework::util::shell::ColorChoice;
use create_xcframework::{BuildConfiguration, BuildSetting, TargetPlatform};

/// Creates an XCFramework out of a Swift Package using xcodebuild
#[derive(Parser)]
#[command(name = "create-xcframework")]
#[command(author, version, about)]
#[command(
    long_about = "Creates an XCFramework out of a Swift Package using xcodebuild.\n\n\
                  Only Apple platforms are supported: ios, macos, maccatalyst, tvos, watchos, visionos."
)]
pub struct Cli {
    /// The location of the Package
    #[arg(long, value_name = "directory", default_value = ".")]
    pub package_path: PathBuf,

    /// The location of the build/cache directory to use [default: .build]
    #[arg(long, value_name = "directory")]
    pub build_path: Option<PathBuf>,

    /// Build with a specific configuration [default: release]
    #[arg(long, value_name = "debug|release")]
    pub configuration: Option<BuildConfiguration>,

    /// Clean before we build (default)
    #[arg(long, overrides_with = "no_clean")]
    pub clean: bool,

    /// Do not clean before we build
    #[arg(long, overrides_with = "clean")]
    pub no_clean: bool,

    /// Include debug symbols in the built XCFramework (default)
    #[arg(long, overrides_with = "no_debug_symbols")]
    pub debug_symbols: bool,

    /// Do not include debug symbols
    #[arg(long, overrides_with = "debug_symbols")]
    pub no_debug_symbols: bool,

    /// Prints the available products and stops
    #[arg(long)]
    pub list_products: bool,

    /// An .xcconfig file used to override Xcode build settings, relative to the package path
    #[arg(long, value_name = "file")]
    pub xcconfig: Option<String>,

    /// Enables Library Evolution for the whole build stack through the xcconfig
    #[arg(long)]
    pub stack_evolution: bool,

    /// Arbitrary Xcode build setting passed directly to xcodebuild (repeatable)
    #[arg(long = "xc-setting", value_name = "NAME=VALUE")]
    pub xc_settings: Vec<BuildSetting>,

    /// Platform to build for (repeatable). Defaults to the platforms in
    /// Package.swift, or all Apple platforms except maccatalyst
    #[arg(
        long = "platform",
        visible_alias = "platforms",
        value_name = "ios|macos|maccatalyst|tvos|watchos|visionos"
    )]
    pub platforms: Vec<TargetPlatform>,

    /// Library product to build (repeatable). Defaults to all library products
    #[arg(long = "product", visible_alias = "products", value_name = "name")]
    pub products: Vec<String>,

    /// Build from this Xcode project instead of the package workspace
    #[arg(long, value_name = "path", conflicts_with = "workspace")]
    pub project: Option<PathBuf>,

    /// Build from this Xcode workspace instead of the package workspace
    #[arg(long, value_name = "path")]
    pub workspace: Option<PathBuf>,

    /// Where to place the compiled .xcframework(s) [default: .]
    #[arg(long, value_name = "directory")]
    pub output: Option<PathBuf>,

    /// Wrap the .xcframework(s) in a versioned zip file ready for deployment
    #[arg(long)]
    pub zip: bool,

    /// The version number to append to the name of the zip file
    #[arg(long, value_name = "version")]
    pub zip_version: Option<String>,

    #[arg(long, hide = true)]
    pub github_action: bool,

    /// Print the output of every tool invocation
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

/// Resolve a `--flag` / `--no-flag` pair; `None` when neither was given.
pub fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
