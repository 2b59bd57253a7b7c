//! create-xcframework - Build multi-platform XCFrameworks from a Swift package
//!
//! This crate provides the library behind the `create-xcframework` binary:
//! the platform catalog, the archive and merge pipeline driven through
//! `xcodebuild`, and distribution packaging.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for filesystem
/// probing and process execution.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildContext, BuildError, Framework, XcFramework};
pub use core::{BuildConfiguration, BuildSetting, PackageDescription, Sdk, TargetPlatform};
pub use ops::{create_xcframeworks, CreateOptions, CreateResult};
