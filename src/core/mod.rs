//! Core data structures.
//!
//! This module contains the types the pipeline is built from:
//! - The platform and SDK catalog
//! - Build configuration and user build settings
//! - Product name normalization
//! - The Swift package description

pub mod build_config;
pub mod naming;
pub mod package;
pub mod platform;

pub use build_config::{BuildConfiguration, BuildSetting};
pub use naming::normalize_product_name;
pub use package::{PackageDescription, PackageError, ValidationError, MANIFEST_NAME};
pub use platform::{sdks_for, Sdk, TargetPlatform};
